//! Builder-pattern printer for command trees.
//!
//! One element per line, four spaces per level. Left arguments carry a `< `
//! marker, inserted elements an `(implied)` note, and unfilled optional
//! slots with a default show the default in parentheses.

use std::fmt::Write;

use cardtree_core::SlotSpec;

use crate::{Implicit, NodeId, Slot, Tree};

const INDENT: &str = "    ";

pub struct TreePrinter<'a, 't> {
    tree: &'a Tree<'t>,
    ids: bool,
    types: bool,
}

impl<'a, 't> TreePrinter<'a, 't> {
    pub fn new(tree: &'a Tree<'t>) -> Self {
        Self {
            tree,
            ids: false,
            types: false,
        }
    }

    /// Prefix each element with its node handle.
    pub fn with_ids(mut self, value: bool) -> Self {
        self.ids = value;
        self
    }

    /// Suffix each element with its produced type.
    pub fn with_types(mut self, value: bool) -> Self {
        self.types = value;
        self
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.format(&mut out).expect("String write never fails");
        out
    }

    pub fn format(&self, w: &mut impl Write) -> std::fmt::Result {
        match self.tree.root() {
            Some(root) => self.format_node(w, root, 0, false),
            None => Ok(()),
        }
    }

    /// Print the subtree below `id` as if it were the root.
    pub fn format_subtree(&self, w: &mut impl Write, id: NodeId) -> std::fmt::Result {
        self.format_node(w, id, 0, false)
    }

    fn format_node(&self, w: &mut impl Write, id: NodeId, depth: usize, is_left: bool) -> std::fmt::Result {
        let tree = self.tree;
        let node = tree.node(id);
        let decl = tree.decl(id);

        self.indent(w, depth, is_left)?;
        if self.ids {
            write!(w, "{id} ")?;
        }
        write!(w, "{}", tree.name(id))?;
        if node.implicit() != Implicit::None {
            write!(w, " (implied)")?;
        }
        if self.types {
            write!(w, " : {}", decl.ty)?;
        }
        writeln!(w)?;

        if let (Some(slot), Some(spec)) = (node.left(), decl.left.as_ref()) {
            self.format_slot(w, slot, spec, depth + 1, true)?;
        }
        for (slot, spec) in node.right().iter().zip(&decl.right) {
            self.format_slot(w, slot, spec, depth + 1, false)?;
        }
        Ok(())
    }

    fn format_slot(
        &self,
        w: &mut impl Write,
        slot: &Slot,
        spec: &SlotSpec,
        depth: usize,
        is_left: bool,
    ) -> std::fmt::Result {
        if slot.is_empty() {
            if let Some(default) = slot.effective(spec).default() {
                self.indent(w, depth, is_left)?;
                writeln!(w, "({})", self.tree.table().resolve(default.name))?;
            }
            return Ok(());
        }
        for &child in slot.children() {
            self.format_node(w, child, depth, is_left)?;
        }
        Ok(())
    }

    fn indent(&self, w: &mut impl Write, depth: usize, is_left: bool) -> std::fmt::Result {
        for _ in 0..depth {
            w.write_str(INDENT)?;
        }
        if is_left {
            w.write_str("< ")?;
        }
        Ok(())
    }
}
