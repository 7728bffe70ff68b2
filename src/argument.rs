use std::any::Any;

use crate::constant::DEFAULT_PREFIX;
use crate::diagnostic::Diagnostic;
use crate::model::{Arity, ErrorLevel};
use crate::tokens::Token;
use crate::types::{AnonymousType, ArgumentType, ErasedType, TypeReport};

type OkCallback = Box<dyn FnMut(&dyn Any)>;
type ErrCallback = Box<dyn FnMut()>;
type DefaultProducer = Box<dyn Fn() -> Box<dyn Any>>;

/// A named, typed slot that may receive zero or more input tokens.
///
/// Built fluently, then handed to
/// [`Command::add_argument`](crate::Command::add_argument):
///
/// ```
/// use argtree::{Argument, NumberType};
///
/// let hey = Argument::new("hey", NumberType::<i8>::default())
///     .name("h")
///     .required();
/// ```
pub struct Argument<A: ArgumentType> {
    names: Vec<String>,
    prefix: char,
    description: Option<String>,
    typ: A,
    required: bool,
    positional: bool,
    allow_unique: bool,
    max_usage: Option<u32>,
    default: Option<DefaultProducer>,
    on_ok: Option<OkCallback>,
    on_err: Option<ErrCallback>,
}

impl<A: ArgumentType> Argument<A> {
    /// Create an argument with its canonical name.
    pub fn new(name: impl Into<String>, typ: A) -> Self {
        Self {
            names: vec![name.into()],
            prefix: DEFAULT_PREFIX,
            description: None,
            typ,
            required: false,
            positional: false,
            allow_unique: false,
            max_usage: None,
            default: None,
            on_ok: None,
            on_err: None,
        }
    }

    /// Add an alias. A single-character alias also participates in
    /// `-abc` style clusters.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.names.push(name.into());
        self
    }

    /// Override the prefix character (default `-`).
    pub fn prefix(mut self, prefix: char) -> Self {
        self.prefix = prefix;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The argument must appear, unless it carries a default.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// The argument is filled from bare values in declaration order
    /// instead of being addressed by name.
    pub fn positional(mut self) -> Self {
        self.positional = true;
        self
    }

    /// The argument may appear alone, suppressing the required-argument
    /// checks of its command (the built-in `help` works this way).
    pub fn allow_unique(mut self) -> Self {
        self.allow_unique = true;
        self
    }

    /// Cap the number of occurrences in a single parse.
    pub fn max_usage(mut self, max: u32) -> Self {
        self.max_usage = Some(max);
        self
    }

    /// The value used when the argument does not appear.
    pub fn default_value(mut self, value: A::Value) -> Self
    where
        A::Value: Clone,
    {
        self.default = Some(Box::new(move || Box::new(value.clone())));
        self
    }

    /// Invoked after parsing when the argument received a value.
    pub fn on_ok<F>(mut self, mut callback: F) -> Self
    where
        F: FnMut(&A::Value) + 'static,
    {
        self.on_ok = Some(Box::new(move |value: &dyn Any| {
            if let Some(value) = value.downcast_ref::<A::Value>() {
                callback(value);
            }
        }));
        self
    }

    /// Invoked after parsing when the argument accumulated exit-level
    /// diagnostics.
    pub fn on_err<F>(mut self, callback: F) -> Self
    where
        F: FnMut() + 'static,
    {
        self.on_err = Some(Box::new(callback));
        self
    }

    pub(crate) fn bind(self) -> BoundArgument {
        let Argument {
            names,
            prefix,
            description,
            typ,
            required,
            positional,
            allow_unique,
            max_usage,
            default,
            on_ok,
            on_err,
        } = self;

        BoundArgument {
            names,
            prefix,
            description,
            typ: Box::new(ErasedType::bind(typ)),
            required,
            positional,
            allow_unique,
            max_usage,
            default,
            on_ok,
            on_err,
            usage_count: 0,
            color: 0,
            diagnostics: Vec::default(),
        }
    }
}

/// An argument bound into a command, with its type erased.
///
/// This is the post-schema view exposed to help formatters; the typed
/// builder surface lives on [`Argument`].
pub struct BoundArgument {
    names: Vec<String>,
    prefix: char,
    description: Option<String>,
    typ: Box<dyn AnonymousType>,
    required: bool,
    positional: bool,
    allow_unique: bool,
    max_usage: Option<u32>,
    default: Option<DefaultProducer>,
    on_ok: Option<OkCallback>,
    on_err: Option<ErrCallback>,
    usage_count: u32,
    color: u8,
    diagnostics: Vec<Diagnostic>,
}

impl std::fmt::Debug for BoundArgument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundArgument")
            .field("names", &self.names)
            .field("required", &self.required)
            .field("positional", &self.positional)
            .field("usage_count", &self.usage_count)
            .finish()
    }
}

impl BoundArgument {
    /// The canonical (first declared) name.
    pub fn name(&self) -> &str {
        &self.names[0]
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn prefix(&self) -> char {
        self.prefix
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn arity(&self) -> Arity {
        self.typ.arity()
    }

    pub fn required(&self) -> bool {
        self.required
    }

    pub fn positional(&self) -> bool {
        self.positional
    }

    pub fn allow_unique(&self) -> bool {
        self.allow_unique
    }

    pub fn usage_count(&self) -> u32 {
        self.usage_count
    }

    /// The color index assigned from the command's rotating palette.
    pub fn color(&self) -> u8 {
        self.color
    }

    pub fn type_description(&self) -> Option<String> {
        self.typ.description()
    }

    pub(crate) fn max_usage(&self) -> Option<u32> {
        self.max_usage
    }

    pub(crate) fn has_default(&self) -> bool {
        self.default.is_some()
    }

    pub(crate) fn set_color(&mut self, color: u8) {
        self.color = color;
    }

    /// Case-sensitive match against any of the argument's names.
    pub(crate) fn matches_name(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub(crate) fn shares_name(&self, other: &BoundArgument) -> bool {
        self.names.iter().any(|n| other.matches_name(n))
    }

    pub(crate) fn record_use(&mut self) -> u32 {
        self.usage_count += 1;
        self.usage_count
    }

    pub(crate) fn deliver(&mut self, values: &[Token], report: &mut TypeReport) {
        self.typ.parse_values(values, report);
    }

    pub(crate) fn take_value(&mut self) -> Option<Box<dyn Any>> {
        match self.typ.take_value() {
            Some(value) => Some(value),
            None if self.usage_count == 0 => self.default.as_ref().map(|produce| produce()),
            None => None,
        }
    }

    pub(crate) fn push_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub(crate) fn has_errors_in(&self, minimum: ErrorLevel) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.level().is_in_minimum(minimum))
    }

    pub(crate) fn invoke_ok(&mut self, value: &dyn Any) {
        if let Some(callback) = self.on_ok.as_mut() {
            callback(value);
        }
    }

    pub(crate) fn invoke_err(&mut self) {
        if let Some(callback) = self.on_err.as_mut() {
            callback();
        }
    }

    pub(crate) fn reset(&mut self) {
        self.usage_count = 0;
        self.diagnostics.clear();
        self.typ.reset();
    }
}
