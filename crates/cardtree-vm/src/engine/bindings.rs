//! Host closures bound to builtin elements by name.

use std::fmt;

use indexmap::IndexMap;

use cardtree_core::{BuiltinScope, DeclarationTable, Evaluation};

use super::{Args, Value};
use crate::Result;

type GlobalFn = Box<dyn Fn(&Args) -> Result<Value>>;
type ContextFn<C> = Box<dyn Fn(&mut CallContext<'_, C>, &Args) -> Result<Value>>;

pub(crate) enum Binding<C> {
    Global(GlobalFn),
    Context(ContextFn<C>),
}

impl<C> Binding<C> {
    pub(crate) fn scope(&self) -> BuiltinScope {
        match self {
            Binding::Global(_) => BuiltinScope::Global,
            Binding::Context(_) => BuiltinScope::Context,
        }
    }
}

/// What a `Context` builtin sees: the host state and the actor stack.
pub struct CallContext<'a, C> {
    pub state: &'a mut C,
    actors: &'a [Value],
}

impl<'a, C> CallContext<'a, C> {
    pub(crate) fn new(state: &'a mut C, actors: &'a [Value]) -> Self {
        Self { state, actors }
    }

    /// Actors of the innermost enclosing actor-consuming element.
    pub fn actors(&self) -> Option<&Value> {
        self.actors.last()
    }

    /// Outermost first.
    pub fn actor_stack(&self) -> &[Value] {
        self.actors
    }
}

/// Builtin implementations for one host state type `C`.
pub struct Bindings<C> {
    map: IndexMap<String, Binding<C>>,
}

impl<C> Default for Bindings<C> {
    fn default() -> Self {
        Self {
            map: IndexMap::new(),
        }
    }
}

impl<C> fmt::Debug for Bindings<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.map.keys()).finish()
    }
}

impl<C> Bindings<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a `Global` builtin: a function of its arguments only.
    pub fn global(mut self, name: &str, f: impl Fn(&Args) -> Result<Value> + 'static) -> Self {
        self.map.insert(name.to_owned(), Binding::Global(Box::new(f)));
        self
    }

    /// Bind a `Context` builtin.
    pub fn context(
        mut self,
        name: &str,
        f: impl Fn(&mut CallContext<'_, C>, &Args) -> Result<Value> + 'static,
    ) -> Self {
        self.map.insert(name.to_owned(), Binding::Context(Box::new(f)));
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Builtins of `table` without a binding of the declared scope.
    pub fn unbound<'t>(&self, table: &'t DeclarationTable) -> Vec<&'t str> {
        table
            .iter()
            .filter_map(|(id, decl)| match decl.evaluation {
                Evaluation::Builtin(scope) => Some((table.name(id), scope)),
                _ => None,
            })
            .filter(|(name, scope)| self.get(name).is_none_or(|b| b.scope() != *scope))
            .map(|(name, _)| name)
            .collect()
    }

    pub(crate) fn get(&self, name: &str) -> Option<&Binding<C>> {
        self.map.get(name)
    }
}
