//! Instantiation of templates: slot defaults, implied options and function
//! bodies.
//!
//! Template children fill the right slots in declaration order. Unlike
//! [`Tree::append`] there is no active path and no left splicing: a child
//! listed after another always lands in the same slot or a later one.

use cardtree_core::{Symbol, Template};

use crate::{BuildError, Implicit, NodeId, Result, Slot, SlotAddr, Tree};

impl Tree<'_> {
    /// Instantiate `template` as a detached subtree. Every node is tagged
    /// `implicit` except coercion wrappers, which are tagged as parents.
    pub fn instantiate_template(&mut self, template: &Template, implicit: Implicit) -> Result<NodeId> {
        self.instantiate_template_at(template, implicit, 0)
    }

    pub(crate) fn instantiate_template_at(
        &mut self,
        template: &Template,
        implicit: Implicit,
        depth: usize,
    ) -> Result<NodeId> {
        let decl = self.decl_by_symbol(template.name)?;
        let id = self.instantiate_at(decl, implicit, depth)?;
        if let Err(err) = self.fill(id, template, implicit, depth) {
            self.free(id);
            return Err(err);
        }
        Ok(id)
    }

    fn fill(&mut self, id: NodeId, template: &Template, implicit: Implicit, depth: usize) -> Result<()> {
        if let Some(left) = &template.left {
            let child = self.instantiate_template_at(left, implicit, depth + 1)?;
            if let Err(err) = self.attach_left(id, child) {
                self.free(child);
                return Err(err);
            }
        }

        let mut index = 0;
        for child in &template.children {
            let child = self.instantiate_template_at(child, implicit, depth + 1)?;
            if let Err(err) = self.place_in_order(id, &mut index, child, depth + 1) {
                self.free(child);
                return Err(err);
            }
        }
        Ok(())
    }

    /// Fill the left slot of `node` with `child`.
    pub fn attach_left(&mut self, node: NodeId, child: NodeId) -> Result<()> {
        let ty = self.ty(child);
        let accepted = self
            .decl(node)
            .left
            .as_ref()
            .is_some_and(|spec| self.registry().satisfies(spec.accepts, ty));
        if !accepted {
            return Err(BuildError::TypeMismatch {
                element: self.name(child).to_owned(),
                ty,
            });
        }
        let addr = SlotAddr::left(node);
        if !self.slot(addr).is_empty() {
            return Err(BuildError::SlotOccupied {
                owner: self.name(node).to_owned(),
                element: self.name(child).to_owned(),
            });
        }
        self.attach(addr, child);
        Ok(())
    }

    /// Put `child` into the first slot at or after `index` that takes it,
    /// directly, through a coercion wrapper, or inside an implied option.
    fn place_in_order(&mut self, node: NodeId, index: &mut usize, child: NodeId, depth: usize) -> Result<()> {
        let decl = self.decl(node);
        let registry = self.registry();
        let ty = self.ty(child);

        while *index < decl.right.len() {
            let addr = SlotAddr::right(node, *index);
            let spec = &decl.right[*index];
            let slot = self.slot(addr).clone();

            match &slot {
                Slot::Implied {
                    options,
                    chosen: None,
                } => {
                    for (i, &option) in options.iter().enumerate() {
                        let mut cursor = 0;
                        if self.place_in_order(option, &mut cursor, child, depth + 1).is_ok() {
                            if let Slot::Implied { chosen, .. } = self.slot_mut(addr) {
                                *chosen = Some(i);
                            }
                            *index += 1;
                            return Ok(());
                        }
                    }
                }
                Slot::Implied { .. } => {}
                _ => {
                    let accepting = slot.accepting(spec);
                    let placed = if registry.satisfies(accepting, ty) {
                        self.attach(addr, child);
                        true
                    } else if let Some(wrapper) = registry.implied_wrapper_for(ty, accepting) {
                        self.wrap_template_child(addr, wrapper, child, depth)?
                    } else {
                        false
                    };
                    if placed {
                        if !self.slot(addr).effective(spec).is_repeatable() {
                            *index += 1;
                        }
                        return Ok(());
                    }
                }
            }
            *index += 1;
        }

        let fits = decl
            .right
            .iter()
            .any(|spec| registry.satisfies(spec.accepts, ty));
        Err(if fits {
            BuildError::SlotOccupied {
                owner: self.name(node).to_owned(),
                element: self.name(child).to_owned(),
            }
        } else {
            BuildError::TypeMismatch {
                element: self.name(child).to_owned(),
                ty,
            }
        })
    }

    fn wrap_template_child(
        &mut self,
        addr: SlotAddr,
        wrapper: Symbol,
        child: NodeId,
        depth: usize,
    ) -> Result<bool> {
        let decl = self.decl_by_symbol(wrapper)?;
        let wrapper = self.instantiate_at(decl, Implicit::Parent, depth + 1)?;
        let mut cursor = 0;
        if self.place_in_order(wrapper, &mut cursor, child, depth + 1).is_err() {
            self.free(wrapper);
            return Ok(false);
        }
        self.attach(addr, wrapper);
        Ok(true)
    }
}
