//! Tree evaluator.

use cardtree_core::{BuiltinScope, DeclarationTable, Evaluation, SlotSpec, Symbol, Template};
use cardtree_lib::{Implicit, NodeId, SlotAddr, Tree};

use super::bindings::Binding;
use super::frame::FrameStack;
use super::{Arg, Args, Bindings, CallContext, EvalError, Value};
use crate::Result;

/// Runtime limits for evaluation.
#[derive(Clone, Copy, Debug)]
pub struct FuelLimits {
    /// Maximum number of evaluated elements (default: 1,000,000).
    pub(crate) exec_fuel: u32,
    /// Maximum nesting of declared-function calls (default: 64).
    pub(crate) recursion_limit: u32,
}

impl Default for FuelLimits {
    fn default() -> Self {
        Self {
            exec_fuel: 1_000_000,
            recursion_limit: 64,
        }
    }
}

impl FuelLimits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.exec_fuel = fuel;
        self
    }

    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn get_exec_fuel(&self) -> u32 {
        self.exec_fuel
    }
    pub fn get_recursion_limit(&self) -> u32 {
        self.recursion_limit
    }
}

/// Evaluates satisfied trees against a host state `C`.
///
/// Elements declared with `Actors` push the value of their first slot onto
/// the actor stack before the remaining slots are evaluated, and pop it once
/// the call returns, whether or not it succeeded.
pub struct Evaluator<'b, C> {
    bindings: &'b Bindings<C>,
    limits: FuelLimits,
    fuel: u32,
    actors: Vec<Value>,
    frames: FrameStack,
}

impl<'b, C> Evaluator<'b, C> {
    pub fn new(bindings: &'b Bindings<C>) -> Self {
        let limits = FuelLimits::default();
        Self {
            bindings,
            limits,
            fuel: limits.exec_fuel,
            actors: Vec::new(),
            frames: FrameStack::default(),
        }
    }

    pub fn with_limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Current depth of the actor stack.
    pub fn actor_depth(&self) -> usize {
        self.actors.len()
    }

    /// Evaluate from the root. An empty tree evaluates to `Null`.
    pub fn evaluate(&mut self, tree: &Tree<'_>, state: &mut C) -> Result<Value> {
        match tree.root() {
            Some(root) => self.evaluate_node(tree, root, state),
            None => Ok(Value::Null),
        }
    }

    /// Evaluate the subtree below `node`, which must be satisfied.
    pub fn evaluate_node(&mut self, tree: &Tree<'_>, node: NodeId, state: &mut C) -> Result<Value> {
        if !tree.is_satisfied(node) {
            return Err(EvalError::Incomplete(tree.name(node).to_owned()));
        }
        self.fuel = self.limits.exec_fuel;
        self.actors.clear();
        self.frames.clear();
        let value = self.eval_node(tree, node, state)?;
        tracing::debug!(
            element = tree.name(node),
            used = self.limits.exec_fuel - self.fuel,
            "evaluated"
        );
        Ok(value)
    }

    fn eval_node(&mut self, tree: &Tree<'_>, node: NodeId, state: &mut C) -> Result<Value> {
        if self.fuel == 0 {
            return Err(EvalError::ExecFuelExhausted(self.limits.exec_fuel));
        }
        self.fuel -= 1;

        let mut pushed = false;
        let result = self.eval_call(tree, node, state, &mut pushed);
        if pushed {
            self.actors.pop();
        }
        result
    }

    fn eval_call(&mut self, tree: &Tree<'_>, node: NodeId, state: &mut C, pushed: &mut bool) -> Result<Value> {
        let decl = tree.decl(node);
        let left = decl.left.as_ref().map(|spec| (SlotAddr::left(node), spec));
        let right = decl.right.iter().enumerate().map(|(i, spec)| (SlotAddr::right(node, i), spec));

        let mut args = Vec::with_capacity(decl.right.len() + 1);
        for (addr, spec) in left.into_iter().chain(right) {
            let arg = self.eval_slot(tree, addr, spec, state)?;
            if decl.actors && args.is_empty() {
                self.actors.push(arg.clone().into_value());
                *pushed = true;
            }
            args.push(arg);
        }
        let args = Args::new(tree.name(node), args);

        match &decl.evaluation {
            Evaluation::Sequence => Ok(last_value(&args)),
            Evaluation::Builtin(scope) => self.call_builtin(*scope, &args, state),
            Evaluation::Function { body } => self.call_function(tree.table(), decl.name, body, args, state),
            Evaluation::Argument { function, index } => self
                .frames
                .argument(*function, *index)
                .cloned()
                .ok_or_else(|| EvalError::MissingArgument {
                    element: tree.name(node).to_owned(),
                    index: *index,
                }),
        }
    }

    fn eval_slot(&mut self, tree: &Tree<'_>, addr: SlotAddr, spec: &SlotSpec, state: &mut C) -> Result<Arg> {
        let effective = tree.slot(addr).effective(spec);
        let nodes = tree.slot_value(addr);
        let mut values = Vec::with_capacity(nodes.len());
        for &child in nodes {
            values.push(self.eval_node(tree, child, state)?);
        }
        if values.is_empty()
            && let Some(default) = effective.default()
        {
            values.push(self.eval_template(tree.table(), default, state)?);
        }

        if effective.is_repeatable() {
            return Ok(Arg::Repeated(values));
        }
        Ok(match values.pop() {
            Some(value) => Arg::Single(value),
            None => Arg::Missing,
        })
    }

    /// Instantiate `template` in a scratch tree and evaluate it.
    fn eval_template(&mut self, table: &DeclarationTable, template: &Template, state: &mut C) -> Result<Value> {
        let mut scratch = Tree::new(table);
        let root = scratch.instantiate_template(template, Implicit::Child)?;
        if !scratch.is_satisfied(root) {
            return Err(EvalError::Incomplete(scratch.name(root).to_owned()));
        }
        self.eval_node(&scratch, root, state)
    }

    fn call_builtin(&mut self, scope: BuiltinScope, args: &Args, state: &mut C) -> Result<Value> {
        let bindings = self.bindings;
        let binding = bindings
            .get(args.element())
            .ok_or_else(|| EvalError::UnboundBuiltin(args.element().to_owned()))?;
        if binding.scope() != scope {
            return Err(EvalError::ScopeMismatch(args.element().to_owned()));
        }

        tracing::debug!(element = args.element(), actors = self.actors.len(), "builtin call");
        match binding {
            Binding::Global(f) => f(args),
            Binding::Context(f) => {
                let mut cx = CallContext::new(state, &self.actors);
                f(&mut cx, args)
            }
        }
    }

    fn call_function(
        &mut self,
        table: &DeclarationTable,
        function: Symbol,
        body: &Template,
        args: Args,
        state: &mut C,
    ) -> Result<Value> {
        if self.frames.depth() >= self.limits.recursion_limit as usize {
            return Err(EvalError::RecursionLimitExceeded(self.limits.recursion_limit));
        }

        tracing::debug!(function = args.element(), depth = self.frames.depth(), "function call");
        self.frames.push(function, args.into_values());
        let result = self.eval_template(table, body, state);
        self.frames.pop();
        result
    }
}

/// Value of the last filled slot, `Null` when every slot is empty.
fn last_value(args: &Args) -> Value {
    (0..args.len())
        .rev()
        .find_map(|i| args.arg(i).and_then(Arg::last))
        .cloned()
        .unwrap_or(Value::Null)
}
