//! Arena of instantiated elements.
//!
//! Nodes are addressed by [`NodeId`] handles. A node is owned by exactly one
//! slot of its parent; the back reference is a [`SlotAddr`] resolved through
//! the arena, never a pointer.

use cardtree_core::{
    Declaration, DeclId, DeclarationTable, ElementType, SlotKind, SlotSpec, TypeRegistry,
};

use crate::{BuildError, Result, Slot};

/// Nesting limit when instantiating templates inside templates.
pub(crate) const MAX_TEMPLATE_DEPTH: usize = 32;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "N{}", self.0)
    }
}

/// Why a node exists without the user having typed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Implicit {
    /// Typed by the user.
    #[default]
    None,
    /// Instantiated from a template: an implied option, a default, a body.
    Child,
    /// Coercion wrapper inserted above an explicit node.
    Parent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotPos {
    Left,
    Right(u16),
}

/// Handle to one slot of one node. `option` is set for the possibilities of
/// an implied slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotAddr {
    pub node: NodeId,
    pub pos: SlotPos,
    pub option: Option<u16>,
}

impl SlotAddr {
    pub fn left(node: NodeId) -> Self {
        Self {
            node,
            pos: SlotPos::Left,
            option: None,
        }
    }

    pub fn right(node: NodeId, index: usize) -> Self {
        Self {
            node,
            pos: SlotPos::Right(index as u16),
            option: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) decl: DeclId,
    pub(crate) implicit: Implicit,
    pub(crate) owner: Option<SlotAddr>,
    pub(crate) left: Option<Slot>,
    pub(crate) right: Vec<Slot>,
    /// Creation order, used to find the newest branch of a permutable run.
    pub(crate) serial: u32,
}

impl Node {
    #[inline]
    pub fn decl(&self) -> DeclId {
        self.decl
    }

    #[inline]
    pub fn implicit(&self) -> Implicit {
        self.implicit
    }

    #[inline]
    pub fn owner(&self) -> Option<SlotAddr> {
        self.owner
    }

    pub fn left(&self) -> Option<&Slot> {
        self.left.as_ref()
    }

    pub fn right(&self) -> &[Slot] {
        &self.right
    }

    /// Left slot followed by the right slots, in argument order.
    pub fn slots(&self) -> impl Iterator<Item = &Slot> {
        self.left.iter().chain(self.right.iter())
    }
}

#[derive(Debug, Clone)]
pub struct Tree<'t> {
    pub(crate) table: &'t DeclarationTable,
    nodes: Vec<Option<Node>>,
    vacant: Vec<NodeId>,
    root: Option<NodeId>,
    next_serial: u32,
}

impl<'t> Tree<'t> {
    pub fn new(table: &'t DeclarationTable) -> Self {
        Self {
            table,
            nodes: Vec::new(),
            vacant: Vec::new(),
            root: None,
            next_serial: 0,
        }
    }

    #[inline]
    pub fn table(&self) -> &'t DeclarationTable {
        self.table
    }

    #[inline]
    pub fn registry(&self) -> &'t TypeRegistry {
        self.table.registry()
    }

    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    /// Number of live nodes, hidden implied options included.
    pub fn len(&self) -> usize {
        self.nodes.len() - self.vacant.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Create a detached node for `decl` with empty slots. Implied slots
    /// get their possibilities instantiated right away.
    pub fn instantiate(&mut self, decl: DeclId, implicit: Implicit) -> Result<NodeId> {
        self.instantiate_at(decl, implicit, 0)
    }

    pub(crate) fn instantiate_at(&mut self, decl_id: DeclId, implicit: Implicit, depth: usize) -> Result<NodeId> {
        if depth > MAX_TEMPLATE_DEPTH {
            return Err(BuildError::TemplateDepthExceeded(MAX_TEMPLATE_DEPTH));
        }
        let decl = self.table.get(decl_id);
        let node = Node {
            decl: decl_id,
            implicit,
            owner: None,
            left: decl.left.as_ref().map(Slot::for_spec),
            right: decl.right.iter().map(Slot::for_spec).collect(),
            serial: self.next_serial,
        };
        self.next_serial += 1;
        let id = self.alloc(node);

        for (index, spec) in decl.right.iter().enumerate() {
            let SlotKind::Implied(templates) = &spec.kind else {
                continue;
            };
            for (option, template) in templates.iter().enumerate() {
                let child = match self.instantiate_template_at(template, Implicit::Child, depth + 1) {
                    Ok(child) => child,
                    Err(err) => {
                        self.free(id);
                        return Err(err);
                    }
                };
                let addr = SlotAddr {
                    option: Some(option as u16),
                    ..SlotAddr::right(id, index)
                };
                self.node_mut(child).owner = Some(addr);
                if let Slot::Implied { options, .. } = &mut self.node_mut(id).right[index] {
                    options.push(child);
                }
            }
        }

        tracing::trace!(node = %id, element = self.name(id), "instantiated");
        Ok(id)
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        match self.vacant.pop() {
            Some(id) => {
                self.nodes[id.0 as usize] = Some(node);
                id
            }
            None => {
                let id = NodeId(self.nodes.len() as u32);
                self.nodes.push(Some(node));
                id
            }
        }
    }

    /// Release `id` and everything below it.
    pub fn free(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id.0 as usize).and_then(Option::take) else {
            return;
        };
        for slot in node.left.iter().chain(node.right.iter()) {
            for &child in slot.nodes() {
                self.free(child);
            }
        }
        self.vacant.push(id);
        if self.root == Some(id) {
            self.root = None;
        }
    }

    /// Drop every node.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.vacant.clear();
        self.root = None;
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize).and_then(Option::as_mut)
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        self.ensure_node(id)
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        self.ensure_node_mut(id)
    }

    pub fn decl(&self, id: NodeId) -> &'t Declaration {
        self.table.get(self.node(id).decl)
    }

    pub fn name(&self, id: NodeId) -> &'t str {
        self.table.name(self.node(id).decl)
    }

    #[inline]
    pub fn ty(&self, id: NodeId) -> ElementType {
        self.decl(id).ty
    }

    pub fn slot(&self, addr: SlotAddr) -> &Slot {
        let node = self.node(addr.node);
        match addr.pos {
            SlotPos::Left => self.ensure_left(node, addr),
            SlotPos::Right(i) => &node.right[i as usize],
        }
    }

    pub(crate) fn slot_mut(&mut self, addr: SlotAddr) -> &mut Slot {
        let node = self.ensure_node_mut(addr.node);
        match addr.pos {
            SlotPos::Left => match node.left.as_mut() {
                Some(slot) => slot,
                None => crate::invariants::missing_left_slot(addr),
            },
            SlotPos::Right(i) => &mut node.right[i as usize],
        }
    }

    /// Declared spec of the slot at `addr`.
    pub fn spec(&self, addr: SlotAddr) -> &'t SlotSpec {
        let decl = self.decl(addr.node);
        match addr.pos {
            SlotPos::Left => match decl.left.as_ref() {
                Some(spec) => spec,
                None => crate::invariants::missing_left_slot(addr),
            },
            SlotPos::Right(i) => &decl.right[i as usize],
        }
    }

    /// Every required slot filled, recursively.
    pub fn is_satisfied(&self, id: NodeId) -> bool {
        let node = self.node(id);
        let left = node.left.iter().map(|_| SlotAddr::left(id));
        let right = (0..node.right.len()).map(|i| SlotAddr::right(id, i));
        left.chain(right).all(|addr| self.slot_satisfied(addr))
    }

    pub fn slot_satisfied(&self, addr: SlotAddr) -> bool {
        let spec = self.spec(addr);
        match self.slot(addr) {
            Slot::Implied {
                options,
                chosen: Some(i),
            } => self.is_satisfied(options[*i]),
            Slot::Implied { options, .. } => {
                options.iter().any(|&o| self.is_satisfied(o)) || !spec.is_required()
            }
            slot => match slot.last_child() {
                Some(last) => self.is_satisfied(last),
                None => !spec.is_required(),
            },
        }
    }

    /// Nodes that make up the slot's value. An implied slot nothing has
    /// chosen yet stands for its first satisfied option.
    pub fn slot_value(&self, addr: SlotAddr) -> &[NodeId] {
        match self.slot(addr) {
            Slot::Implied {
                options,
                chosen: None,
            } => match options.iter().position(|&o| self.is_satisfied(o)) {
                Some(i) => std::slice::from_ref(&options[i]),
                None => &[],
            },
            slot => slot.children(),
        }
    }

    /// True when the node was typed by the user or holds something that was.
    pub fn is_explicit_branch(&self, id: NodeId) -> bool {
        let node = self.node(id);
        node.implicit == Implicit::None
            || node
                .slots()
                .flat_map(|s| s.children())
                .any(|&c| self.is_explicit_branch(c))
    }

    /// Highest creation serial in the subtree.
    pub(crate) fn newest(&self, id: NodeId) -> u32 {
        let node = self.node(id);
        node.slots()
            .flat_map(|s| s.children())
            .map(|&c| self.newest(c))
            .fold(node.serial, u32::max)
    }

    /// Append `child` to the slot at `addr` and record ownership.
    pub(crate) fn attach(&mut self, addr: SlotAddr, child: NodeId) {
        let spec = self.spec(addr);
        let registry = self.registry();
        let ty = self.ty(child);
        self.slot_mut(addr).push(spec, registry, child, ty);
        self.node_mut(child).owner = Some(addr);
    }

    /// Put `new` in the place `old` occupies in its owner slot.
    pub(crate) fn replace_in_owner(&mut self, old: NodeId, new: NodeId) {
        let owner = self.node(old).owner;
        match owner {
            Some(addr) => {
                if !self.slot_mut(addr).replace(old, new) {
                    crate::invariants::owner_mismatch(old, addr);
                }
            }
            None => self.root = Some(new),
        }
        self.node_mut(new).owner = owner;
        self.node_mut(old).owner = None;
    }

    /// Detach `child` from its owner slot without freeing it.
    pub(crate) fn detach(&mut self, child: NodeId) {
        let Some(addr) = self.node_mut(child).owner.take() else {
            return;
        };
        if !self.slot_mut(addr).remove(child) {
            crate::invariants::owner_mismatch(child, addr);
        }
    }

    /// Live node ids in arena order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_some())
            .map(|(i, _)| NodeId(i as u32))
    }
}
