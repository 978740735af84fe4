//! One command under construction, with its undo log.

use std::fmt;

use cardtree_core::{DeclId, DeclarationTable};

use crate::{AllowedTypes, BuildError, Implicit, Instruction, NodeId, Result, Tree};

/// Name of the element every command starts from, unless configured.
pub const DEFAULT_ROOT: &str = "Command";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Element instantiated as the root of every command.
    pub root: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT.to_owned(),
        }
    }
}

impl SessionConfig {
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }
}

/// A unit of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Element(String),
    Skip,
    Undo,
    Redo,
    Cancel,
}

impl Token {
    /// `:skip`, `:undo`, `:redo` and `:cancel` are instructions; anything
    /// else names an element.
    pub fn parse(text: &str) -> Self {
        match text {
            ":skip" => Token::Skip,
            ":undo" => Token::Undo,
            ":redo" => Token::Redo,
            ":cancel" => Token::Cancel,
            name => Token::Element(name.to_owned()),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Element(name) => write!(f, "{name}"),
            Token::Skip => write!(f, ":skip"),
            Token::Undo => write!(f, ":undo"),
            Token::Redo => write!(f, ":redo"),
            Token::Cancel => write!(f, ":cancel"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LogEntry {
    Append { name: String, skip_before: usize },
    Skip,
}

/// Builds one command tree from a stream of tokens.
///
/// Accepted tokens go into a linear log. The last `undone` entries are the
/// redo tail; accepting a new token drops it.
#[derive(Debug)]
pub struct Session<'t> {
    table: &'t DeclarationTable,
    root_decl: DeclId,
    tree: Tree<'t>,
    log: Vec<LogEntry>,
    undone: usize,
    skip: usize,
}

impl<'t> Session<'t> {
    pub fn new(table: &'t DeclarationTable, config: SessionConfig) -> Result<Self> {
        let root_decl = table
            .lookup(&config.root)
            .filter(|&id| !table.get(id).is_argument())
            .ok_or(BuildError::DeclarationNotFound(config.root))?;
        let mut session = Self {
            table,
            root_decl,
            tree: Tree::new(table),
            log: Vec::new(),
            undone: 0,
            skip: 0,
        };
        session.start()?;
        Ok(session)
    }

    fn start(&mut self) -> Result<()> {
        self.tree.clear();
        let root = self.tree.instantiate(self.root_decl, Implicit::None)?;
        self.tree.set_root(root);
        Ok(())
    }

    #[inline]
    pub fn tree(&self) -> &Tree<'t> {
        &self.tree
    }

    #[inline]
    pub fn table(&self) -> &'t DeclarationTable {
        self.table
    }

    pub fn root(&self) -> NodeId {
        self.tree.ensure_root()
    }

    /// Candidates the next element passes over.
    #[inline]
    pub fn skip_count(&self) -> usize {
        self.skip
    }

    pub fn apply(&mut self, token: &Token) -> Result<()> {
        match token {
            Token::Element(name) => self.append(name),
            Token::Skip => {
                self.skip();
                Ok(())
            }
            Token::Undo => self.undo(),
            Token::Redo => self.redo(),
            Token::Cancel => self.cancel(),
        }
    }

    /// Place a new `name` element, passing over as many candidate positions
    /// as there were skips since the last append.
    pub fn append(&mut self, name: &str) -> Result<()> {
        let skip_before = self.skip;
        self.place(name, skip_before)?;
        self.truncate_redo();
        self.log.push(LogEntry::Append {
            name: name.to_owned(),
            skip_before,
        });
        self.skip = 0;
        Ok(())
    }

    pub fn skip(&mut self) {
        self.truncate_redo();
        self.log.push(LogEntry::Skip);
        self.skip += 1;
    }

    pub fn undo(&mut self) -> Result<()> {
        let Some(index) = self.log.len().checked_sub(self.undone + 1) else {
            return Err(BuildError::UndoImpossible);
        };
        match &self.log[index] {
            LogEntry::Skip => self.skip = self.skip.saturating_sub(1),
            LogEntry::Append { skip_before, .. } => {
                let skip_before = *skip_before;
                let root = self.root();
                if self.tree.remove_last_explicit(root) {
                    return Err(BuildError::UndoImpossible);
                }
                self.skip = skip_before;
            }
        }
        self.undone += 1;
        Ok(())
    }

    pub fn redo(&mut self) -> Result<()> {
        if self.undone == 0 {
            return Err(BuildError::RedoImpossible);
        }
        match self.log[self.log.len() - self.undone].clone() {
            LogEntry::Skip => self.skip += 1,
            LogEntry::Append { name, skip_before } => {
                self.place(&name, skip_before)?;
                self.skip = 0;
            }
        }
        self.undone -= 1;
        Ok(())
    }

    /// Discard the command and start over.
    pub fn cancel(&mut self) -> Result<()> {
        tracing::debug!(tokens = self.log.len(), "command cancelled");
        self.reset()
    }

    /// Hand over the complete tree and start a fresh command.
    pub fn finish(&mut self) -> Result<Tree<'t>> {
        let root = self.root();
        if !self.tree.is_satisfied(root) {
            return Err(BuildError::Incomplete(self.tree.name(root).to_owned()));
        }
        let tree = std::mem::replace(&mut self.tree, Tree::new(self.table));
        self.reset()?;
        Ok(tree)
    }

    fn reset(&mut self) -> Result<()> {
        self.log.clear();
        self.undone = 0;
        self.skip = 0;
        self.start()
    }

    /// Allowed types with instruction counts for the current state.
    pub fn allowed(&self) -> AllowedTypes {
        let mut allowed = self.tree.allowed();
        let skip_budget = allowed.skip_budget();
        allowed.set_instruction(Instruction::Evaluate, allowed.complete as usize);
        allowed.set_instruction(Instruction::Cancel, 1);
        allowed.set_instruction(Instruction::Skip, skip_budget.saturating_sub(self.skip));
        allowed.set_instruction(Instruction::Undo, self.log.len() - self.undone);
        allowed.set_instruction(Instruction::Redo, self.undone);
        allowed
    }

    /// Whether appending `name` now could succeed.
    pub fn is_allowed(&self, name: &str) -> bool {
        let Ok(decl) = self.lookup(name) else {
            return false;
        };
        let allowed = self.tree.allowed();
        self.skip < allowed.placements(self.table.registry(), self.table.get(decl))
    }

    /// Declared elements that could be appended now, in declaration order.
    pub fn allowed_elements(&self) -> Vec<&'t str> {
        let allowed = self.tree.allowed();
        let registry = self.table.registry();
        self.table
            .iter()
            .filter(|(_, decl)| !decl.is_argument())
            .filter(|(_, decl)| self.skip < allowed.placements(registry, decl))
            .map(|(id, _)| self.table.name(id))
            .collect()
    }

    fn place(&mut self, name: &str, skip: usize) -> Result<()> {
        let result = self.try_place(name, skip);
        if let Err(err) = &result {
            tracing::warn!(element = name, skip, error = %err, "token rejected");
        }
        result
    }

    fn try_place(&mut self, name: &str, skip: usize) -> Result<()> {
        let decl = self.lookup(name)?;
        let next = self.tree.instantiate(decl, Implicit::None)?;
        let root = self.root();
        let mut remaining = skip;

        let err = match self.tree.append(root, next, &mut remaining) {
            Ok(true) => return Ok(()),
            Ok(false) => BuildError::TypeMismatch {
                element: name.to_owned(),
                ty: self.tree.ty(next),
            },
            Err(err) => err,
        };
        self.tree.free(next);
        Err(err)
    }

    /// Argument elements only exist inside function bodies.
    fn lookup(&self, name: &str) -> Result<DeclId> {
        self.table
            .lookup(name)
            .filter(|&id| !self.table.get(id).is_argument())
            .ok_or_else(|| BuildError::DeclarationNotFound(name.to_owned()))
    }

    fn truncate_redo(&mut self) {
        self.log.truncate(self.log.len() - self.undone);
        self.undone = 0;
    }
}
