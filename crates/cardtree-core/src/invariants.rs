//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::{DeclId, Declaration, DeclarationTable};

impl DeclarationTable {
    pub(crate) fn ensure_decl(&self, id: DeclId) -> &Declaration {
        self.try_get(id).unwrap_or_else(|| {
            panic!(
                "DeclarationTable: {id} not found \
                 (ids are only minted by this table)"
            )
        })
    }
}
