//! Argument frames of declared-function calls.

use cardtree_core::Symbol;

use super::Value;

#[derive(Debug)]
struct Frame {
    function: Symbol,
    args: Vec<Value>,
}

/// Frames of the functions currently being evaluated, innermost last.
#[derive(Debug, Default)]
pub(crate) struct FrameStack {
    frames: Vec<Frame>,
}

impl FrameStack {
    pub fn push(&mut self, function: Symbol, args: Vec<Value>) {
        self.frames.push(Frame { function, args });
    }

    pub fn pop(&mut self) {
        self.frames.pop();
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Argument `index` of the innermost call of `function`.
    pub fn argument(&self, function: Symbol, index: usize) -> Option<&Value> {
        self.frames
            .iter()
            .rev()
            .find(|f| f.function == function)
            .and_then(|f| f.args.get(index))
    }
}
