//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::{Node, NodeId, Slot, SlotAddr, Tree};

impl Tree<'_> {
    pub(crate) fn ensure_node(&self, id: NodeId) -> &Node {
        self.get(id).unwrap_or_else(|| dangling(id))
    }

    pub(crate) fn ensure_node_mut(&mut self, id: NodeId) -> &mut Node {
        self.get_mut(id).unwrap_or_else(|| dangling(id))
    }

    pub(crate) fn ensure_root(&self) -> NodeId {
        self.root().unwrap_or_else(|| {
            tracing::error!("session tree has no root");
            panic!("Tree: sessions always hold a root between operations")
        })
    }

    pub(crate) fn ensure_left<'n>(&self, node: &'n Node, addr: SlotAddr) -> &'n Slot {
        node.left.as_ref().unwrap_or_else(|| missing_left_slot(addr))
    }
}

fn dangling(id: NodeId) -> ! {
    tracing::error!(node = %id, "dangling node handle");
    panic!("Tree: {id} is not a live node (handles die with undo and cancel)")
}

pub(crate) fn missing_left_slot(addr: SlotAddr) -> ! {
    tracing::error!(node = %addr.node, "left slot addressed on a node without one");
    panic!("Tree: {} has no left slot", addr.node)
}

pub(crate) fn owner_mismatch(child: NodeId, addr: SlotAddr) -> ! {
    tracing::error!(node = %child, owner = %addr.node, "owner slot does not hold node");
    panic!(
        "Tree: {child} names {} as owner but is not in that slot",
        addr.node
    )
}

pub(crate) fn unreachable_push_into_implied() -> ! {
    tracing::error!("push into implied slot");
    panic!("Slot: implied possibilities are fixed at instantiation")
}
