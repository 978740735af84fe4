use crate::{ElementType, SlotSpec, Symbol, Template};

/// How a bound builtin receives its environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinScope {
    /// Free function of its arguments.
    Global,
    /// Receives the mutable evaluation context.
    Context,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    /// Evaluate every slot in order and yield the last value.
    Sequence,
    /// Externally bound function, looked up by element name.
    Builtin(BuiltinScope),
    /// Declared function: evaluate the body with the arguments in scope.
    Function { body: Template },
    /// Reference to an argument of the enclosing function. `index` counts the
    /// left slot first, then the right slots.
    Argument { function: Symbol, index: usize },
}

/// Immutable element declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: Symbol,
    pub ty: ElementType,
    pub left: Option<SlotSpec>,
    pub right: Vec<SlotSpec>,
    pub evaluation: Evaluation,
    /// First slot value goes on the actor stack while the call runs.
    pub actors: bool,
}

impl Declaration {
    pub fn new(name: Symbol, ty: ElementType, evaluation: Evaluation) -> Self {
        Self {
            name,
            ty,
            left: None,
            right: Vec::new(),
            evaluation,
            actors: false,
        }
    }

    pub fn with_left(mut self, slot: SlotSpec) -> Self {
        self.left = Some(slot);
        self
    }

    pub fn with_right(mut self, slot: SlotSpec) -> Self {
        self.right.push(slot);
        self
    }

    pub fn with_actors(mut self, value: bool) -> Self {
        self.actors = value;
        self
    }

    /// Left slot followed by the right slots, in argument order.
    pub fn slots(&self) -> impl Iterator<Item = &SlotSpec> {
        self.left.iter().chain(self.right.iter())
    }

    /// Argument elements are only reachable from function bodies.
    pub fn is_argument(&self) -> bool {
        matches!(self.evaluation, Evaluation::Argument { .. })
    }
}
