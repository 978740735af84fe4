//! Types the tree would accept next.
//!
//! The walk mirrors [`Tree::append`] without mutating: every scanned slot
//! contributes the types it accepts directly, through subtypes and through
//! coercions; every complete node with an owner offers itself as the left
//! argument of a splice.

use indexmap::IndexMap;
use serde::Serialize;

use cardtree_core::{Declaration, ElementType, SlotSpec, TypeRegistry};

use crate::builder::continues_run;
use crate::{NodeId, Slot, SlotAddr, Tree};

/// Non-element tokens a session understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Instruction {
    Evaluate,
    Cancel,
    Skip,
    Undo,
    Redo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AllowedType {
    pub ty: ElementType,
    /// Placed by splicing: the new element takes an existing node as its
    /// left argument.
    pub is_left: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AllowedTypes {
    /// Distinct candidates in scan order.
    pub priority: Vec<AllowedType>,
    /// Open right positions per type.
    pub total_right: IndexMap<ElementType, usize>,
    /// Complete nodes per type that could become a left argument.
    pub total_left: IndexMap<ElementType, usize>,
    /// Offered instructions with their counts. Instructions that cannot run
    /// are absent.
    pub instructions: IndexMap<Instruction, usize>,
    /// The root is satisfied.
    pub complete: bool,
    #[serde(skip)]
    splices: Vec<Splice>,
}

/// A complete node that a new element could take as its left argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Splice {
    ty: ElementType,
    owner_accepts: ElementType,
}

impl AllowedTypes {
    /// Highest number of positions any single type has, minus one: the
    /// largest skip that still leads somewhere.
    pub fn skip_budget(&self) -> usize {
        let left = |ty: &ElementType| self.total_left.get(ty).copied().unwrap_or(0);
        let right = |ty: &ElementType| self.total_right.get(ty).copied().unwrap_or(0);
        self.total_right
            .keys()
            .chain(self.total_left.keys())
            .map(|ty| left(ty) + right(ty))
            .max()
            .unwrap_or(0)
            .saturating_sub(1)
    }

    pub fn instruction(&self, instruction: Instruction) -> usize {
        self.instructions.get(&instruction).copied().unwrap_or(0)
    }

    /// Number of positions an element of `decl` could be placed in.
    pub fn placements(&self, registry: &TypeRegistry, decl: &Declaration) -> usize {
        let left_required = decl.left.as_ref().is_some_and(SlotSpec::is_required);
        let right = if left_required {
            0
        } else {
            self.total_right.get(&decl.ty).copied().unwrap_or(0)
        };
        let left = match &decl.left {
            Some(spec) => self
                .splices
                .iter()
                .filter(|s| {
                    registry.satisfies(spec.accepts, s.ty)
                        && registry.satisfies(s.owner_accepts, decl.ty)
                })
                .count(),
            None => 0,
        };
        right + left
    }

    pub(crate) fn set_instruction(&mut self, instruction: Instruction, count: usize) {
        if count > 0 {
            self.instructions.insert(instruction, count);
        }
    }

    fn add_right(&mut self, registry: &TypeRegistry, accepting: ElementType) {
        if accepting.is_empty() {
            return;
        }
        let subtypes = registry.expand(accepting) - accepting;
        let coerced = registry.coercible_sources(accepting) - accepting - subtypes;
        for ty in accepting.iter().chain(subtypes.iter()).chain(coerced.iter()) {
            *self.total_right.entry(ty).or_default() += 1;
            self.prioritize(ty, false);
        }
    }

    fn add_left(&mut self, ty: ElementType, owner_accepts: ElementType) {
        *self.total_left.entry(ty).or_default() += 1;
        self.splices.push(Splice { ty, owner_accepts });
        self.prioritize(ty, true);
    }

    fn prioritize(&mut self, ty: ElementType, is_left: bool) {
        let entry = AllowedType { ty, is_left };
        if !self.priority.contains(&entry) {
            self.priority.push(entry);
        }
    }
}

impl Tree<'_> {
    /// Allowed types below the root. Instruction counts are left to the
    /// caller, which owns the undo log.
    pub fn allowed(&self) -> AllowedTypes {
        let mut allowed = AllowedTypes::default();
        if let Some(root) = self.root() {
            self.collect(root, &mut allowed);
            allowed.complete = self.is_satisfied(root);
        }
        allowed
    }

    /// Returns false once an unmet required slot ends the walk.
    fn collect(&self, node: NodeId, out: &mut AllowedTypes) -> bool {
        let registry = self.registry();
        let specs = &self.decl(node).right;
        let mut unmet = false;

        for index in self.active_start(node)..specs.len() {
            let addr = SlotAddr::right(node, index);
            match self.slot(addr) {
                Slot::Implied {
                    options,
                    chosen: Some(i),
                } => {
                    if !self.collect(options[*i], out) {
                        return false;
                    }
                }
                Slot::Implied { options, .. } => {
                    for &option in options {
                        self.collect(option, out);
                    }
                }
                slot => {
                    if let Some(last) = slot.last_child()
                        && !self.collect(last, out)
                    {
                        return false;
                    }
                    out.add_right(registry, slot.accepting(&specs[index]));
                }
            }

            if !self.slot_satisfied(addr) {
                unmet = true;
            }
            if unmet && !continues_run(specs, index) {
                return false;
            }
        }

        if let Some(owner) = self.node(node).owner {
            let slot = self.slot(owner);
            if !matches!(slot, Slot::Implied { .. }) {
                let owner_accepts = slot.effective(self.spec(owner)).accepts;
                out.add_left(self.ty(node), owner_accepts);
            }
        }
        true
    }
}
