//! `argtree` is a declarative command line parser for Rust.
//!
//! Describe a tree of commands — each with typed arguments, argument
//! groups, and nested sub-commands — then feed it a raw input line.
//! The result is either a structured, type-safe [`ParsedArguments`]
//! tree or a collection of [`Diagnostic`]s pinned to positions in the
//! input. Specifically, `argtree` prioritizes the following design
//! concerns:
//! * *Diagnostics over exceptions*:
//! Problems with the input never abort the parse. They accumulate with
//! a severity and a position, the whole tree is always traversed, and
//! only afterwards do the configured thresholds decide what is shown
//! and what drives the exit code.
//! * *Composable value parsing*:
//! Every argument delegates to an [`ArgumentType`] which declares its
//! own arity and consumes its own slice of tokens. The built-in kernel
//! ([`StringType`], [`NumberType`], [`FileType`], [`FlagType`],
//! [`CounterType`], [`KeyValueType`], [`TupleType`]) covers the common
//! shapes; implementing the trait plugs in anything else.
//! * *Inheritance-unless-overridden configuration*:
//! Tuple brackets, error codes, severity thresholds and help
//! formatters flow from parent commands into children through
//! [`ModifyRecord`] slots, so a tree is configured at the root and
//! specialized only where needed.
//!
//! # Usage
//!
//! ```
//! use argtree::{Argument, Command, CommandLine, NumberType, StringType};
//!
//! let mut greet = Command::new("greet").unwrap();
//! greet
//!     .add_argument(Argument::new("name", StringType::default()).positional())
//!     .unwrap();
//! greet
//!     .add_argument(Argument::new("times", NumberType::<u32>::default()).name("t"))
//!     .unwrap();
//!
//! let mut cli = CommandLine::new(greet);
//! let parsed = cli.parse("world --times 3");
//!
//! assert_eq!(parsed.get::<String>("name"), Some(&"world".to_string()));
//! assert_eq!(parsed.get::<u32>("times"), Some(&3));
//! assert_eq!(cli.error_code(), 0);
//! ```
//!
//! # Input syntax
//!
//! * Named arguments are addressed as `--name` or `-name` (any prefix
//! repeated once or twice), with values following as separate words or
//! joined with `=`. Single-character names combine into `-abc`
//! clusters.
//! * Values quote with `"` or `'`; a backslash escapes the active
//! quote character, and `\ ` escapes a space outside quotes.
//! * A bracketed span such as `[1 2 3]` binds all enclosed values to
//! one argument, overriding its greedy matching. The bracket pair is
//! configurable per command ([`TupleChars`]).
//! * A bare word matching a sub-command name hands the rest of the
//! line to that sub-command.
//! * Everything after `-- ` is not interpreted; it is captured
//! verbatim as the command's forward value.
//!
//! # Exit codes
//!
//! Each command carries an error code (default 1). After parsing, the
//! codes of every failed command along the tokenized path are combined
//! with bitwise OR, so `process::exit(cli.error_code())` produces a
//! single integer a caller can still decompose.

mod argument;
mod command;
mod constant;
mod diagnostic;
mod group;
mod help;
mod model;
mod parser;
mod tokens;
mod types;

pub use argument::{Argument, BoundArgument};
pub use command::{Command, CommandLine, ParsedArguments};
pub use diagnostic::{ConfigError, Diagnostic, DiagnosticKind, ErrorLog, Span};
pub use group::ArgumentGroup;
pub use help::{DefaultHelpFormatter, HelpFormatter};
pub use model::{Arity, ErrorLevel, LoopPool, ModifyRecord, TupleChars};
pub use parser::UserInterface;
pub use tokens::{Token, TokenKind};
pub use types::{
    ArgumentType, CounterType, FileType, FlagType, KeyValueType, NumberType, StringType,
    TupleType, TypeReport,
};
