use thiserror::Error;

use crate::model::{ErrorLevel, ModifyRecord};

/// A character range in the original input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub length: usize,
}

impl Span {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }
}

/// The structured payload of a [`Diagnostic`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiagnosticKind {
    #[error("Unterminated quote.")]
    UnterminatedQuote,

    #[error("Unterminated tuple.")]
    UnterminatedTuple,

    #[error("Tuples cannot nest.")]
    NestedTuple,

    #[error("Unexpected value '{0}'.")]
    UnexpectedValue(String),

    #[error("Required argument '{0}' was not provided.")]
    RequiredNotPresent(String),

    #[error("Multiple arguments used in the exclusive group '{0}'.")]
    MultipleInExclusive(String),

    #[error("'{0}' cannot be combined with other arguments.")]
    UniqueCombinedWithOthers(String),

    #[error("Not enough values for '{name}' (provided={provided}, expected={expected}).")]
    InsufficientValues {
        name: String,
        provided: usize,
        expected: u8,
    },

    #[error("The tuple for '{name}' holds {provided} values (expected {expected}).")]
    TupleArityMismatch {
        name: String,
        provided: usize,
        expected: String,
    },

    #[error("Too many occurrences of '{name}' (allowed={allowed}).")]
    TooManyOccurrences { name: String, allowed: u32 },

    #[error("'{token}' is not a valid {target}.")]
    NumberOutOfRange { token: String, target: &'static str },

    #[error("The file '{0}' does not exist.")]
    FileNotFound(String),

    #[error("'{0}' is not a 'key=value' pair.")]
    MalformedKeyValue(String),

    #[error("{0}")]
    Custom(String),
}

impl DiagnosticKind {
    fn default_level(&self) -> ErrorLevel {
        // Every built-in kind reports at the error level; custom
        // diagnostics pick their own via Diagnostic::with_level.
        ErrorLevel::Error
    }
}

/// A positioned, severity-tagged message. Diagnostics are accumulated,
/// never thrown; whether one ends up displayed or contributes to the
/// exit code depends on the owning command's thresholds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    kind: DiagnosticKind,
    level: ErrorLevel,
    // None refers to the whole command rather than a spot in the input.
    span: Option<Span>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind) -> Self {
        let level = kind.default_level();
        Self {
            kind,
            level,
            span: None,
        }
    }

    pub fn at(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_level(mut self, level: ErrorLevel) -> Self {
        self.level = level;
        self
    }

    pub fn kind(&self) -> &DiagnosticKind {
        &self.kind
    }

    pub fn level(&self) -> ErrorLevel {
        self.level
    }

    pub fn span(&self) -> Option<Span> {
        self.span
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{level}: {kind}", level = self.level, kind = self.kind)
    }
}

/// An ordered accumulator of diagnostics with the two severity
/// thresholds: one gating what is shown, one gating the exit code.
#[derive(Debug, Clone)]
pub struct ErrorLog {
    diagnostics: Vec<Diagnostic>,
    min_display: ModifyRecord<ErrorLevel>,
    min_exit: ModifyRecord<ErrorLevel>,
}

impl Default for ErrorLog {
    fn default() -> Self {
        Self {
            diagnostics: Vec::default(),
            min_display: ModifyRecord::new(ErrorLevel::Info),
            min_exit: ModifyRecord::new(ErrorLevel::Error),
        }
    }
}

impl ErrorLog {
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }

    pub fn minimum_display_level(&self) -> ErrorLevel {
        *self.min_display.get()
    }

    pub fn minimum_exit_level(&self) -> ErrorLevel {
        *self.min_exit.get()
    }

    pub fn set_minimum_display_level(&mut self, level: ErrorLevel) {
        self.min_display.set(level);
    }

    pub fn set_minimum_exit_level(&mut self, level: ErrorLevel) {
        self.min_exit.set(level);
    }

    /// Whether any accumulated diagnostic meets the exit threshold.
    pub fn has_exit_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.level().is_in_minimum(self.minimum_exit_level()))
    }

    /// Whether any accumulated diagnostic meets the display threshold.
    pub fn has_display_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.level().is_in_minimum(self.minimum_display_level()))
    }

    pub(crate) fn inherit_thresholds(&mut self, parent: &ErrorLog) {
        self.min_display.set_if_not_modified(&parent.min_display);
        self.min_exit.set_if_not_modified(&parent.min_exit);
    }
}

/// An error raised while building the command schema. These indicate
/// programming mistakes and abort construction, unlike [`Diagnostic`]s
/// which describe user input and are accumulated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Config error: '{name}' already exists in command '{command}'.")]
    DuplicateIdentifier { name: String, command: String },

    #[error("Config error: cannot add the root command '{0}' as a sub-command.")]
    InvalidChild(String),

    #[error("Config error: the command name '{0}' must be alphabetic.")]
    InvalidName(String),

    #[error("Config error: the error code must be positive (got {0}).")]
    InvalidErrorCode(i32),

    #[error("Config error: the unique argument '{0}' must accept zero values.")]
    InvalidUnique(String),

    #[error("Config error: the group '{group}' references the unknown argument '{name}'.")]
    UnknownMember { group: String, name: String },
}
