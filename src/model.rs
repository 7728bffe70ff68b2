/// The severity of a [`Diagnostic`](crate::Diagnostic).
///
/// Levels are totally ordered with `Error` as the most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorLevel {
    /// Internal chatter; never shown by default.
    Debug,
    /// Informational message.
    Info,
    /// Suspicious but not fatal.
    Warning,
    /// A problem with the input.
    Error,
}

impl ErrorLevel {
    /// Whether this level meets the given minimum (minimum-inclusive).
    pub fn is_in_minimum(&self, minimum: ErrorLevel) -> bool {
        *self >= minimum
    }
}

impl std::fmt::Display for ErrorLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorLevel::Debug => "debug",
            ErrorLevel::Info => "info",
            ErrorLevel::Warning => "warning",
            ErrorLevel::Error => "error",
        };
        write!(f, "{name}")
    }
}

/// The cardinality of value tokens an argument type consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Between `min` and `max` values (inclusive).
    Range(u8, u8),
    /// At least `min` values, no upper bound.
    AtLeast(u8),
}

impl Arity {
    /// Precisely `n` values.
    pub fn exactly(n: u8) -> Self {
        Arity::Range(n, n)
    }

    /// Zero or one value.
    pub fn optional() -> Self {
        Arity::Range(0, 1)
    }

    pub fn minimum(&self) -> u8 {
        match self {
            Arity::Range(min, _) => *min,
            Arity::AtLeast(min) => *min,
        }
    }

    /// `None` means unbounded.
    pub fn maximum(&self) -> Option<u8> {
        match self {
            Arity::Range(_, max) => Some(*max),
            Arity::AtLeast(_) => None,
        }
    }

    pub(crate) fn accepts(&self, count: usize) -> bool {
        count >= self.minimum() as usize
            && self.maximum().map_or(true, |max| count <= max as usize)
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arity::Range(min, max) if min == max => write!(f, "{min}"),
            Arity::Range(min, max) => write!(f, "{min}..{max}"),
            Arity::AtLeast(min) => write!(f, "{min}.."),
        }
    }
}

/// The bracket pair used to group tuple values on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TupleChars {
    #[default]
    Square,
    Round,
    Curly,
}

impl TupleChars {
    pub fn open(&self) -> char {
        match self {
            TupleChars::Square => '[',
            TupleChars::Round => '(',
            TupleChars::Curly => '{',
        }
    }

    pub fn close(&self) -> char {
        match self {
            TupleChars::Square => ']',
            TupleChars::Round => ')',
            TupleChars::Curly => '}',
        }
    }
}

/// A configuration slot that remembers whether the user set it.
///
/// Sub-commands inherit each slot from their parent unless it was
/// explicitly overridden on the child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModifyRecord<T> {
    value: T,
    modified: bool,
}

impl<T> ModifyRecord<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            modified: false,
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Set the value and mark the slot as user-modified.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.modified = true;
    }

    /// Copy the other slot's value, only when this slot is untouched.
    /// Does not mark this slot as modified, so it keeps inheriting.
    pub fn set_if_not_modified(&mut self, other: &ModifyRecord<T>)
    where
        T: Clone,
    {
        if !self.modified {
            self.value = other.value.clone();
        }
    }

    /// Like [`ModifyRecord::set_if_not_modified`], with the replacement
    /// produced lazily. Used where the inherited value must be a fresh
    /// copy rather than a shared one.
    pub fn set_if_not_modified_with(&mut self, supplier: impl FnOnce() -> T) {
        if !self.modified {
            self.value = supplier();
        }
    }
}

impl<T: Default> Default for ModifyRecord<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// A pool that yields its elements in order, cycling forever.
#[derive(Debug, Clone)]
pub struct LoopPool<T> {
    items: Vec<T>,
    // None until the first yield, so that the pool starts at element 0.
    cursor: Option<usize>,
}

impl<T> LoopPool<T> {
    pub fn new(items: Vec<T>) -> Self {
        assert!(!items.is_empty(), "a LoopPool cannot be empty");
        Self {
            items,
            cursor: None,
        }
    }

    pub fn next(&mut self) -> &T {
        let cursor = match self.cursor {
            Some(previous) => (previous + 1) % self.items.len(),
            None => 0,
        };
        self.cursor = Some(cursor);
        &self.items[cursor]
    }
}
