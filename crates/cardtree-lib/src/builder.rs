//! Placement of a new node into a partially built tree.
//!
//! The walk follows the active path: from the slot holding the most recent
//! explicit branch, slots are scanned left to right, recursing into each
//! slot's last child before testing the slot itself. Right-slot matches win
//! over a left splice; `skip` passes over candidates in scan order.

use cardtree_core::{DeclId, ElementType, SlotSpec, Symbol};

use crate::{BuildError, Implicit, NodeId, Result, Slot, SlotAddr, Tree};

impl Tree<'_> {
    /// Place `next` below `node`.
    ///
    /// Every candidate position passed over decrements `skip`. Returns
    /// `Ok(false)` when nothing on the active path takes `next`; the tree is
    /// then unchanged.
    pub fn append(&mut self, node: NodeId, next: NodeId, skip: &mut usize) -> Result<bool> {
        let decl = self.decl(node);
        let registry = self.registry();
        let ty = self.ty(next);
        let needs_left = self.needs_left(next);
        let mut unmet = false;

        for index in self.active_start(node)..decl.right.len() {
            let addr = SlotAddr::right(node, index);
            let spec = &decl.right[index];

            if matches!(self.slot(addr), Slot::Implied { .. }) {
                if self.append_implied(addr, next, skip)? {
                    return Ok(true);
                }
            } else {
                if let Some(last) = self.slot(addr).last_child()
                    && self.append(last, next, skip)?
                {
                    return Ok(true);
                }

                let accepting = if needs_left {
                    ElementType::empty()
                } else {
                    self.slot(addr).accepting(spec)
                };
                if registry.satisfies(accepting, ty) {
                    if *skip == 0 {
                        self.attach(addr, next);
                        tracing::debug!(
                            element = self.name(next),
                            owner = self.name(node),
                            slot = index,
                            "placed"
                        );
                        return Ok(true);
                    }
                    *skip -= 1;
                } else if let Some(wrapper) = registry.implied_wrapper_for(ty, accepting) {
                    if *skip == 0 {
                        if self.wrap(addr, wrapper, next)? {
                            return Ok(true);
                        }
                    } else {
                        *skip -= 1;
                    }
                }
            }

            if !self.slot_satisfied(addr) {
                unmet = true;
            }
            if unmet && !continues_run(&decl.right, index) {
                return Err(BuildError::UnmetPrecedingParameter {
                    element: self.name(node).to_owned(),
                });
            }
        }

        self.splice_left(node, next, skip)
    }

    /// First slot the scan visits: the slot holding the newest explicit
    /// branch, moved back to the start of its permutable run.
    pub(crate) fn active_start(&self, node: NodeId) -> usize {
        let slots = &self.node(node).right;
        let active = (0..slots.len())
            .rev()
            .find(|&i| slots[i].last_child().is_some_and(|c| self.is_explicit_branch(c)));
        match active {
            Some(index) => run_start(&self.decl(node).right, index),
            None => 0,
        }
    }

    /// Delegate into an implied slot: the chosen possibility, or each one in
    /// turn until one takes `next`.
    fn append_implied(&mut self, addr: SlotAddr, next: NodeId, skip: &mut usize) -> Result<bool> {
        let Slot::Implied { options, chosen } = self.slot(addr).clone() else {
            return Ok(false);
        };
        if let Some(i) = chosen {
            return self.append(options[i], next, skip);
        }

        for (i, option) in options.into_iter().enumerate() {
            let before = *skip;
            if let Ok(true) = self.append(option, next, skip) {
                if let Slot::Implied { chosen, .. } = self.slot_mut(addr) {
                    *chosen = Some(i);
                }
                tracing::debug!(option = self.name(option), "implied option chosen");
                return Ok(true);
            }
            if *skip != before {
                break;
            }
        }
        Ok(false)
    }

    /// Insert a coercion wrapper holding `next` into the slot at `addr`.
    fn wrap(&mut self, addr: SlotAddr, wrapper: Symbol, next: NodeId) -> Result<bool> {
        let decl = self.decl_by_symbol(wrapper)?;
        let wrapper = self.instantiate(decl, Implicit::Parent)?;
        let mut no_skip = 0;
        match self.append(wrapper, next, &mut no_skip) {
            Ok(true) => {
                self.attach(addr, wrapper);
                tracing::debug!(
                    element = self.name(next),
                    wrapper = self.name(wrapper),
                    owner = self.name(addr.node),
                    "placed through implied wrapper"
                );
                Ok(true)
            }
            Ok(false) | Err(_) => {
                self.free(wrapper);
                Ok(false)
            }
        }
    }

    /// Put `next` where `node` is and move `node` into `next`'s left slot.
    fn splice_left(&mut self, node: NodeId, next: NodeId, skip: &mut usize) -> Result<bool> {
        let registry = self.registry();
        let Some(left) = &self.decl(next).left else {
            return Ok(false);
        };
        let Some(owner) = self.node(node).owner else {
            return Ok(false);
        };
        let owner_slot = self.slot(owner);
        if matches!(owner_slot, Slot::Implied { .. }) {
            return Ok(false);
        }
        let owner_accepts = owner_slot.effective(self.spec(owner)).accepts;
        let left_open = self.node(next).left.as_ref().is_some_and(Slot::is_empty);

        if !left_open
            || !registry.satisfies(left.accepts, self.ty(node))
            || !registry.satisfies(owner_accepts, self.ty(next))
        {
            return Ok(false);
        }
        if *skip > 0 {
            *skip -= 1;
            return Ok(false);
        }

        self.replace_in_owner(node, next);
        self.attach(SlotAddr::left(next), node);
        tracing::debug!(
            element = self.name(next),
            left = self.name(node),
            "spliced above left argument"
        );
        Ok(true)
    }

    /// A required left slot can only be filled by splicing, so such nodes
    /// never go straight into a right slot.
    fn needs_left(&self, id: NodeId) -> bool {
        let node = self.node(id);
        let required = self.decl(id).left.as_ref().is_some_and(SlotSpec::is_required);
        required && node.left.as_ref().is_some_and(Slot::is_empty)
    }

    pub(crate) fn decl_by_symbol(&self, sym: Symbol) -> Result<DeclId> {
        let table = self.table();
        table
            .by_symbol(sym)
            .ok_or_else(|| BuildError::DeclarationNotFound(table.resolve(sym).to_owned()))
    }
}

/// Start of the permutable run containing `index`, or `index` itself.
pub(crate) fn run_start(specs: &[SlotSpec], index: usize) -> usize {
    let mut start = index;
    if !specs[index].permutable {
        return start;
    }
    while start > 0 && specs[start - 1].permutable {
        start -= 1;
    }
    start
}

/// The slot after `index` belongs to the same permutable run.
pub(crate) fn continues_run(specs: &[SlotSpec], index: usize) -> bool {
    specs[index].permutable && specs.get(index + 1).is_some_and(|s| s.permutable)
}
