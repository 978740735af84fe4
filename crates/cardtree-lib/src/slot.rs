//! Runtime slots: the children a node holds for one of its declared
//! parameters.

use cardtree_core::{ElementType, SlotKind, SlotSpec, TypeRegistry};

use crate::NodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// Zero or more children, one at most unless repeatable.
    Basic(Vec<NodeId>),
    /// A choice among possibility slots. `chosen` is set by the first
    /// argument and cleared again when the slot empties.
    OneOf {
        chosen: Option<usize>,
        children: Vec<NodeId>,
    },
    /// Pre-instantiated possibilities; the first one that takes a token
    /// becomes the active branch.
    Implied {
        options: Vec<NodeId>,
        chosen: Option<usize>,
    },
}

impl Slot {
    /// Empty slot for `spec`. Implied options are filled in by the tree.
    pub(crate) fn for_spec(spec: &SlotSpec) -> Self {
        match spec.kind {
            SlotKind::Basic { .. } => Slot::Basic(Vec::new()),
            SlotKind::OneOf(_) => Slot::OneOf {
                chosen: None,
                children: Vec::new(),
            },
            SlotKind::Implied(_) => Slot::Implied {
                options: Vec::new(),
                chosen: None,
            },
        }
    }

    /// Children that make up the slot's value.
    pub fn children(&self) -> &[NodeId] {
        match self {
            Slot::Basic(children) | Slot::OneOf { children, .. } => children,
            Slot::Implied {
                options,
                chosen: Some(i),
            } => std::slice::from_ref(&options[*i]),
            Slot::Implied { chosen: None, .. } => &[],
        }
    }

    /// Every node the slot keeps alive, including unchosen implied options.
    pub fn nodes(&self) -> &[NodeId] {
        match self {
            Slot::Implied { options, .. } => options,
            _ => self.children(),
        }
    }

    #[inline]
    pub fn last_child(&self) -> Option<NodeId> {
        self.children().last().copied()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children().is_empty()
    }

    pub fn chosen(&self) -> Option<usize> {
        match self {
            Slot::Basic(_) => None,
            Slot::OneOf { chosen, .. } | Slot::Implied { chosen, .. } => *chosen,
        }
    }

    /// The spec governing the current contents: the chosen possibility of a
    /// one-of slot, the slot's own spec otherwise.
    pub fn effective<'s>(&self, spec: &'s SlotSpec) -> &'s SlotSpec {
        match (self, &spec.kind) {
            (Slot::OneOf { chosen: Some(i), .. }, SlotKind::OneOf(options)) => &options[*i],
            _ => spec,
        }
    }

    /// Types a new argument may have right now. Full slots accept nothing;
    /// implied slots are examined by delegation instead.
    pub fn accepting(&self, spec: &SlotSpec) -> ElementType {
        if matches!(self, Slot::Implied { .. }) {
            return ElementType::empty();
        }
        let effective = self.effective(spec);
        if !effective.is_repeatable() && !self.is_empty() {
            return ElementType::empty();
        }
        effective.accepts
    }

    /// Add an argument of type `ty`, choosing a possibility if needed.
    pub(crate) fn push(&mut self, spec: &SlotSpec, registry: &TypeRegistry, child: NodeId, ty: ElementType) {
        match self {
            Slot::Basic(children) => children.push(child),
            Slot::OneOf { chosen, children } => {
                if chosen.is_none()
                    && let SlotKind::OneOf(options) = &spec.kind
                {
                    *chosen = options
                        .iter()
                        .position(|o| registry.satisfies(o.accepts, ty));
                }
                children.push(child);
            }
            Slot::Implied { .. } => {
                crate::invariants::unreachable_push_into_implied();
            }
        }
    }

    /// Detach `child`. Returns false when the slot does not hold it.
    pub(crate) fn remove(&mut self, child: NodeId) -> bool {
        let children = match self {
            Slot::Basic(children) | Slot::OneOf { children, .. } => children,
            Slot::Implied { .. } => return false,
        };
        let Some(index) = children.iter().position(|&c| c == child) else {
            return false;
        };
        children.remove(index);
        if let Slot::OneOf { chosen, children } = self
            && children.is_empty()
        {
            *chosen = None;
        }
        true
    }

    /// Put `new` where `old` was.
    pub(crate) fn replace(&mut self, old: NodeId, new: NodeId) -> bool {
        let children = match self {
            Slot::Basic(children) | Slot::OneOf { children, .. } => children,
            Slot::Implied { options, .. } => options,
        };
        match children.iter_mut().find(|c| **c == old) {
            Some(slot) => {
                *slot = new;
                true
            }
            None => false,
        }
    }
}
