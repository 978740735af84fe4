//! The immutable declaration table and its builder.

use indexmap::IndexMap;

use crate::{
    Coercion, Declaration, ElementType, Evaluation, Interner, Result, SlotKind, SlotSpec, Symbol,
    TableError, Template, TypeRegistry,
};

/// Name of the built-in sequencing element that folds multiple function bodies.
pub const SEQUENCE: &str = "Sequence";

/// Index of a declaration inside its table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct DeclId(u32);

impl DeclId {
    #[inline]
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for DeclId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "D{}", self.0)
    }
}

/// Name-keyed declarations plus the type registry they were checked against.
#[derive(Debug, Clone)]
pub struct DeclarationTable {
    interner: Interner,
    decls: IndexMap<Symbol, Declaration>,
    registry: TypeRegistry,
}

impl DeclarationTable {
    pub fn lookup(&self, name: &str) -> Option<DeclId> {
        let sym = self.interner.get(name)?;
        self.by_symbol(sym)
    }

    pub fn by_symbol(&self, sym: Symbol) -> Option<DeclId> {
        self.decls.get_index_of(&sym).map(|i| DeclId(i as u32))
    }

    #[inline]
    pub fn get(&self, id: DeclId) -> &Declaration {
        self.ensure_decl(id)
    }

    pub(crate) fn try_get(&self, id: DeclId) -> Option<&Declaration> {
        self.decls.get_index(id.0 as usize).map(|(_, d)| d)
    }

    pub fn name(&self, id: DeclId) -> &str {
        self.interner.resolve(self.get(id).name)
    }

    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        self.interner.resolve(sym)
    }

    #[inline]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn iter(&self) -> impl Iterator<Item = (DeclId, &Declaration)> {
        self.decls
            .values()
            .enumerate()
            .map(|(i, d)| (DeclId(i as u32), d))
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

/// Assembles a [`DeclarationTable`]. Checks run in [`TableBuilder::finish`],
/// once every name is known.
#[derive(Debug, Default)]
pub struct TableBuilder {
    interner: Interner,
    decls: IndexMap<Symbol, Declaration>,
    registry: TypeRegistry,
    coercions: Vec<(Symbol, ElementType)>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, s: &str) -> Symbol {
        self.interner.intern(s)
    }

    pub fn resolve(&self, sym: Symbol) -> &str {
        self.interner.resolve(sym)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.interner
            .get(name)
            .is_some_and(|sym| self.decls.contains_key(&sym))
    }

    pub fn subtype(&mut self, child: ElementType, parent: ElementType) -> Result<()> {
        self.registry.add_subtype(child, parent)
    }

    /// Register `wrapper` as the implied element for `source` values.
    pub fn coerce(&mut self, wrapper: &str, source: ElementType) {
        let wrapper = self.interner.intern(wrapper);
        self.coercions.push((wrapper, source));
    }

    pub fn declare(&mut self, decl: Declaration) -> Result<()> {
        let name = self.interner.resolve(decl.name).to_owned();
        if !decl.ty.is_single() {
            return Err(TableError::NotSingleType { name, ty: decl.ty });
        }
        if self.decls.contains_key(&decl.name) {
            return Err(TableError::DuplicateDeclaration(name));
        }
        self.decls.insert(decl.name, decl);
        Ok(())
    }

    /// Declare the built-in `Sequence` element if missing.
    pub fn sequence(&mut self) -> Symbol {
        let sym = self.interner.intern(SEQUENCE);
        self.decls.entry(sym).or_insert_with(|| {
            Declaration::new(sym, ElementType::COMMAND, Evaluation::Sequence)
                .with_right(SlotSpec::repeatable(ElementType::all(), true))
        });
        sym
    }

    pub fn finish(mut self) -> Result<DeclarationTable> {
        for (wrapper, source) in std::mem::take(&mut self.coercions) {
            let Some(decl) = self.decls.get(&wrapper) else {
                return Err(self.unknown(wrapper));
            };
            let has_slot = decl
                .right
                .iter()
                .any(|slot| self.registry.satisfies(slot.accepts, source));
            if !has_slot {
                return Err(TableError::CoercionWithoutSlot {
                    wrapper: self.interner.resolve(wrapper).to_owned(),
                    source_ty: source,
                });
            }
            let target = decl.ty;
            self.registry.add_coercion(Coercion {
                source,
                target,
                wrapper,
            });
        }

        for decl in self.decls.values() {
            for slot in decl.slots() {
                self.check_slot(decl.name, slot)?;
            }
            if let Evaluation::Function { body } = &decl.evaluation {
                self.check_names(body)?;
            }
        }

        Ok(DeclarationTable {
            interner: self.interner,
            decls: self.decls,
            registry: self.registry,
        })
    }

    fn check_slot(&self, owner: Symbol, slot: &SlotSpec) -> Result<()> {
        match &slot.kind {
            SlotKind::Basic { default: None } => Ok(()),
            SlotKind::Basic {
                default: Some(default),
            } => self.check_template(owner, default, slot.accepts),
            SlotKind::OneOf(options) => {
                if options.is_empty() {
                    return Err(TableError::EmptyOneOf(self.resolve(owner).to_owned()));
                }
                options.iter().try_for_each(|o| self.check_slot(owner, o))
            }
            SlotKind::Implied(options) => {
                if options.is_empty() {
                    return Err(TableError::EmptyImplied(self.resolve(owner).to_owned()));
                }
                options
                    .iter()
                    .try_for_each(|t| self.check_template(owner, t, slot.accepts))
            }
        }
    }

    fn check_template(&self, owner: Symbol, template: &Template, expected: ElementType) -> Result<()> {
        self.check_names(template)?;
        let found = self.decls[&template.name].ty;
        if !self.registry.satisfies(expected, found) {
            return Err(TableError::TemplateTypeMismatch {
                owner: self.resolve(owner).to_owned(),
                template: self.resolve(template.name).to_owned(),
                expected,
                found,
            });
        }
        Ok(())
    }

    fn check_names(&self, template: &Template) -> Result<()> {
        let mut missing = None;
        template.walk(&mut |t| {
            if missing.is_none() && !self.decls.contains_key(&t.name) {
                missing = Some(t.name);
            }
        });
        match missing {
            Some(sym) => Err(self.unknown(sym)),
            None => Ok(()),
        }
    }

    fn unknown(&self, sym: Symbol) -> TableError {
        TableError::UnknownElement(self.resolve(sym).to_owned())
    }
}
