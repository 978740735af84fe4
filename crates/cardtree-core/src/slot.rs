//! Parameter slot declarations.

use crate::{ElementType, Symbol};

/// Occurrence contract of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cardinality {
    pub repeatable: bool,
    pub required: bool,
}

impl Cardinality {
    pub const SINGLE: Self = Self {
        repeatable: false,
        required: true,
    };
    pub const OPTIONAL: Self = Self {
        repeatable: false,
        required: false,
    };
    pub const REPEATABLE: Self = Self {
        repeatable: true,
        required: true,
    };
    pub const ANY_NUMBER: Self = Self {
        repeatable: true,
        required: false,
    };
}

/// Uninstantiated element tree: used for defaults, implied options and
/// function bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: Symbol,
    pub left: Option<Box<Template>>,
    pub children: Vec<Template>,
}

impl Template {
    pub fn leaf(name: Symbol) -> Self {
        Self {
            name,
            left: None,
            children: Vec::new(),
        }
    }

    pub fn with_child(mut self, child: Template) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_left(mut self, left: Template) -> Self {
        self.left = Some(Box::new(left));
        self
    }

    /// Pre-order walk over the template and every nested template.
    pub fn walk(&self, f: &mut impl FnMut(&Template)) {
        f(self);
        if let Some(left) = &self.left {
            left.walk(f);
        }
        for child in &self.children {
            child.walk(f);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotKind {
    /// Plain slot, optionally with a default value used when left empty.
    Basic { default: Option<Template> },
    /// Choice among several possibility slots.
    OneOf(Vec<SlotSpec>),
    /// Pre-instantiated possibilities examined by delegation.
    Implied(Vec<Template>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotSpec {
    pub name: Option<Symbol>,
    pub accepts: ElementType,
    pub cardinality: Cardinality,
    pub permutable: bool,
    pub kind: SlotKind,
}

impl SlotSpec {
    pub fn new(accepts: ElementType, cardinality: Cardinality) -> Self {
        Self {
            name: None,
            accepts,
            cardinality,
            permutable: false,
            kind: SlotKind::Basic { default: None },
        }
    }

    pub fn required(accepts: ElementType) -> Self {
        Self::new(accepts, Cardinality::SINGLE)
    }

    pub fn optional(accepts: ElementType) -> Self {
        Self::new(accepts, Cardinality::OPTIONAL)
    }

    pub fn repeatable(accepts: ElementType, required: bool) -> Self {
        let cardinality = if required {
            Cardinality::REPEATABLE
        } else {
            Cardinality::ANY_NUMBER
        };
        Self::new(accepts, cardinality)
    }

    /// One-of slot; accepted types are the union of the options.
    pub fn one_of(options: Vec<SlotSpec>, required: bool) -> Self {
        let accepts = options
            .iter()
            .fold(ElementType::empty(), |acc, o| acc | o.accepts);
        let cardinality = Cardinality {
            repeatable: false,
            required,
        };
        Self {
            name: None,
            accepts,
            cardinality,
            permutable: false,
            kind: SlotKind::OneOf(options),
        }
    }

    pub fn implied(accepts: ElementType, options: Vec<Template>, required: bool) -> Self {
        let cardinality = Cardinality {
            repeatable: false,
            required,
        };
        Self {
            name: None,
            accepts,
            cardinality,
            permutable: false,
            kind: SlotKind::Implied(options),
        }
    }

    pub fn named(mut self, name: Symbol) -> Self {
        self.name = Some(name);
        self
    }

    pub fn permutable(mut self, value: bool) -> Self {
        self.permutable = value;
        self
    }

    pub fn with_default(mut self, default: Template) -> Self {
        self.kind = SlotKind::Basic {
            default: Some(default),
        };
        self
    }

    #[inline]
    pub fn is_required(&self) -> bool {
        self.cardinality.required
    }

    #[inline]
    pub fn is_repeatable(&self) -> bool {
        self.cardinality.repeatable
    }

    /// Default value template, for basic slots that carry one.
    pub fn default(&self) -> Option<&Template> {
        match &self.kind {
            SlotKind::Basic { default } => default.as_ref(),
            _ => None,
        }
    }
}
