/// The classification assigned to a lexed word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// A prefixed word matching one known long name, e.g. `--verbose`.
    ArgumentName,
    /// A single-prefix cluster of distinct single-character names, e.g. `-abc`.
    ArgumentNameList,
    /// A plain value word (unknown prefixed words also land here).
    ArgumentValue,
    /// A value word inside a tuple span.
    ArgumentValueTupled,
    /// A bare word matching a sub-command of the current command.
    SubCommand,
    /// The verbatim remainder following the `--` marker.
    Forward,
    /// The opening tuple bracket.
    TupleOpen,
    /// The closing tuple bracket.
    TupleClose,
}

/// A lexed word with its classification and character offset into the
/// original input line. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    text: String,
    position: usize,
}

impl Token {
    pub(crate) fn new(kind: TokenKind, text: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// 0-based character offset into the original input.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Character length of the token text.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
