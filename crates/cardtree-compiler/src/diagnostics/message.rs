use super::Span;

/// Diagnostic kinds ordered by severity of the underlying mistake: syntax
/// problems first, then naming, then table-level semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Lexing and layout
    UnexpectedFragment,
    UnexpectedIndent,
    InconsistentIndent,

    // Something required is missing
    ExpectedItem,
    ExpectedName,
    ExpectedTypeName,
    ExpectedParameter,

    // Something present does not belong
    UnexpectedToken,
    UnknownFlag,
    DuplicateLeftParameter,
    BodyInBuiltin,
    ScopeOnFunction,
    MisplacedTemplate,
    MisplacedOptions,
    TooManyDefaults,
    DefaultOnRequired,

    // Valid syntax, invalid semantics
    UnknownType,
    DuplicateDeclaration,
    UndefinedElement,
    MissingBody,
    MissingImpliedElement,
    InvalidSubtype,
    TableCheck,

    // Observations
    UnusedArgument,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::UnusedArgument => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Base message, used when no detail is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnexpectedFragment => "unexpected characters",
            Self::UnexpectedIndent => "unexpected indentation",
            Self::InconsistentIndent => "indentation does not match any enclosing block",

            Self::ExpectedItem => "expected `Builtin`, `Function`, `Subtype` or `Coerce`",
            Self::ExpectedName => "expected a name",
            Self::ExpectedTypeName => "expected an element type",
            Self::ExpectedParameter => "expected `Parameter`",

            Self::UnexpectedToken => "unexpected token",
            Self::UnknownFlag => "unknown parameter flag",
            Self::DuplicateLeftParameter => "an element has at most one left parameter",
            Self::BodyInBuiltin => "builtins cannot have a body",
            Self::ScopeOnFunction => "functions take no binding scope",
            Self::MisplacedTemplate => "one-of parameters take `Parameter` options, not values",
            Self::MisplacedOptions => "only one-of parameters take nested `Parameter` blocks",
            Self::TooManyDefaults => "a parameter has at most one default value",
            Self::DefaultOnRequired => "only optional parameters take a default value",

            Self::UnknownType => "unknown element type",
            Self::DuplicateDeclaration => "duplicate declaration",
            Self::UndefinedElement => "undefined element",
            Self::MissingBody => "function has no body",
            Self::MissingImpliedElement => "implied parameter names no element",
            Self::InvalidSubtype => "invalid subtype relation",
            Self::TableCheck => "declaration table check failed",

            Self::UnusedArgument => "parameter is never used in the body",
        }
    }

    /// Template for custom messages; `{}` is replaced by caller detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::UnknownType => "`{}` is not an element type".to_string(),
            Self::DuplicateDeclaration => "`{}` is already declared".to_string(),
            Self::UndefinedElement => "`{}` is not declared".to_string(),
            Self::UnknownFlag => "`{}` is not a parameter flag".to_string(),
            Self::UnusedArgument => "parameter `{}` is never used in the body".to_string(),
            Self::TableCheck | Self::InvalidSubtype => "{}".to_string(),
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    pub fn message(&self, detail: Option<&str>) -> String {
        match detail {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) span: Span,
    pub(crate) message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    pub(crate) span: Span,
    pub(crate) message: String,
    pub(crate) related: Vec<RelatedInfo>,
}

impl DiagnosticMessage {
    pub(crate) fn with_default_message(kind: DiagnosticKind, span: Span) -> Self {
        Self {
            kind,
            span,
            message: kind.fallback_message().to_string(),
            related: Vec::new(),
        }
    }

    pub(crate) fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub(crate) fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }
}

impl std::fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}: {}",
            self.severity(),
            self.span.start,
            self.span.end,
            self.message
        )?;
        for related in &self.related {
            write!(
                f,
                " (related: {} at {}..{})",
                related.message, related.span.start, related.span.end
            )?;
        }
        Ok(())
    }
}
