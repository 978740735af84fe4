pub mod build;
pub mod check;
pub mod decls;
pub mod loader;

#[cfg(test)]
mod check_tests;
