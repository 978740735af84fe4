//! Undo support: removal of the most recent explicit node.

use crate::builder::run_start;
use crate::{Implicit, NodeId, Slot, SlotAddr, Tree};

impl Tree<'_> {
    /// Remove the newest explicit node below `node`, together with any
    /// coercion wrapper left without an explicit descendant.
    ///
    /// Returns true when `node` itself has to go; the caller detaches it.
    /// A node that goes while holding a left argument is replaced by that
    /// argument instead and reports false.
    pub fn remove_last_explicit(&mut self, node: NodeId) -> bool {
        let mut had_explicit = false;

        if let Some(index) = self.last_explicit_slot(node) {
            had_explicit = true;
            let addr = SlotAddr::right(node, index);
            if let Some(child) = self.slot(addr).last_child()
                && self.remove_last_explicit(child)
                && !matches!(self.slot(addr), Slot::Implied { .. })
            {
                tracing::debug!(element = self.name(child), owner = self.name(node), "removed");
                self.detach(child);
                self.free(child);
            }
            self.reopen(addr);
        }

        let implicit = self.node(node).implicit;
        let should_remove =
            !had_explicit || (implicit == Implicit::Parent && !self.is_explicit_branch(node));
        if !should_remove {
            return false;
        }

        if let Some(left) = self.node(node).left.as_ref().and_then(Slot::last_child)
            && (self.node(left).implicit == Implicit::Child || self.is_explicit_branch(left))
        {
            tracing::debug!(
                element = self.name(node),
                left = self.name(left),
                "removed, left argument takes its place"
            );
            self.detach(left);
            self.replace_in_owner(node, left);
            self.free(node);
            return false;
        }
        true
    }

    /// Right slot holding the newest explicit branch. Outside permutable
    /// runs this is simply the last slot whose last child is explicit.
    fn last_explicit_slot(&self, node: NodeId) -> Option<usize> {
        let slots = &self.node(node).right;
        let explicit = |i: usize| slots[i].last_child().filter(|&c| self.is_explicit_branch(c));

        let last = (0..slots.len()).rev().find(|&i| explicit(i).is_some())?;
        let specs = &self.decl(node).right;
        if !specs[last].permutable {
            return Some(last);
        }
        (run_start(specs, last)..=last)
            .filter_map(|i| explicit(i).map(|c| (i, self.newest(c))))
            .max_by_key(|&(_, newest)| newest)
            .map(|(i, _)| i)
    }

    /// Reopen an implied slot whose chosen possibility lost its last
    /// explicit descendant. One-of slots reopen as they empty.
    fn reopen(&mut self, addr: SlotAddr) {
        let stale = match self.slot(addr) {
            Slot::Implied {
                options,
                chosen: Some(i),
            } => !self.is_explicit_branch(options[*i]),
            _ => false,
        };
        if stale && let Slot::Implied { chosen, .. } = self.slot_mut(addr) {
            *chosen = None;
        }
    }
}
