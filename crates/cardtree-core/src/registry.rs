//! Type compatibility: single-parent subtype chains and implied coercions.

use indexmap::IndexMap;

use crate::{ElementType, Result, Symbol, TableError};

/// An indirect match: a `source` value may fill a `target` slot once it is
/// wrapped in a `wrapper` element (which produces `target`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coercion {
    pub source: ElementType,
    pub target: ElementType,
    pub wrapper: Symbol,
}

#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    parents: IndexMap<ElementType, ElementType>,
    coercions: Vec<Coercion>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `child` as a subtype of `parent`.
    ///
    /// Multiple inheritance and cycles are rejected.
    pub fn add_subtype(&mut self, child: ElementType, parent: ElementType) -> Result<()> {
        if let Some(&existing) = self.parents.get(&child) {
            return Err(TableError::MultipleInheritance { child, existing });
        }
        if self.ancestors(parent).any(|t| t == child) {
            return Err(TableError::InheritanceCycle { child, parent });
        }
        self.parents.insert(child, parent);
        Ok(())
    }

    #[inline]
    pub fn parent(&self, ty: ElementType) -> Option<ElementType> {
        self.parents.get(&ty).copied()
    }

    /// `ty` followed by its parent chain.
    pub fn ancestors(&self, ty: ElementType) -> impl Iterator<Item = ElementType> + '_ {
        std::iter::successors(Some(ty), |t| self.parent(*t))
    }

    /// Admission test: `candidate` or one of its ancestors is in `required`.
    pub fn satisfies(&self, required: ElementType, candidate: ElementType) -> bool {
        if candidate.is_empty() {
            return false;
        }
        self.ancestors(candidate).any(|t| required.intersects(t))
    }

    /// Every single type that satisfies `required`, including subtypes.
    pub fn expand(&self, required: ElementType) -> ElementType {
        ElementType::all()
            .iter()
            .filter(|&t| self.satisfies(required, t))
            .fold(ElementType::empty(), |acc, t| acc | t)
    }

    pub(crate) fn add_coercion(&mut self, coercion: Coercion) {
        self.coercions.push(coercion);
    }

    pub fn coercions(&self) -> &[Coercion] {
        &self.coercions
    }

    /// Wrapper element to auto-insert so that `source` can fill a slot that
    /// accepts `target`. First declared coercion wins.
    pub fn implied_wrapper_for(&self, source: ElementType, target: ElementType) -> Option<Symbol> {
        self.coercions
            .iter()
            .find(|c| self.satisfies(target, c.target) && self.satisfies(c.source, source))
            .map(|c| c.wrapper)
    }

    /// Union of the source types (with their subtypes) that coerce into `target`.
    pub fn coercible_sources(&self, target: ElementType) -> ElementType {
        self.coercions
            .iter()
            .filter(|c| self.satisfies(target, c.target))
            .fold(ElementType::empty(), |acc, c| acc | self.expand(c.source))
    }
}
