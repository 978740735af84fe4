//! Table-wide template check.

use std::fmt;

use cardtree_core::{DeclarationTable, Evaluation, SlotKind, SlotSpec, Template};

use crate::{BuildError, Implicit, Tree};

/// A template that does not instantiate into a complete tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateIssue {
    /// Declaration the template belongs to.
    pub owner: String,
    /// Root element of the template.
    pub template: String,
    pub error: BuildError,
}

impl fmt::Display for TemplateIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "template `{}` in `{}`: {}", self.template, self.owner, self.error)
    }
}

/// Instantiate every default, implied option and function body.
pub fn check_templates(table: &DeclarationTable) -> Vec<TemplateIssue> {
    let mut issues = Vec::new();
    for (id, decl) in table.iter() {
        let mut templates = Vec::new();
        for spec in decl.slots() {
            slot_templates(spec, &mut templates);
        }
        if let Evaluation::Function { body } = &decl.evaluation {
            templates.push(body);
        }

        for template in templates {
            if let Err(error) = check(table, template) {
                issues.push(TemplateIssue {
                    owner: table.name(id).to_owned(),
                    template: table.resolve(template.name).to_owned(),
                    error,
                });
            }
        }
    }
    tracing::debug!(issues = issues.len(), "templates checked");
    issues
}

fn slot_templates<'s>(spec: &'s SlotSpec, out: &mut Vec<&'s Template>) {
    match &spec.kind {
        SlotKind::Basic { default } => out.extend(default.iter()),
        SlotKind::OneOf(options) => {
            for option in options {
                slot_templates(option, out);
            }
        }
        SlotKind::Implied(options) => out.extend(options.iter()),
    }
}

fn check(table: &DeclarationTable, template: &Template) -> Result<(), BuildError> {
    let mut tree = Tree::new(table);
    let root = tree.instantiate_template(template, Implicit::Child)?;
    if !tree.is_satisfied(root) {
        return Err(BuildError::Incomplete(tree.name(root).to_owned()));
    }
    Ok(())
}
