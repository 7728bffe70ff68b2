use std::any::Any;
use std::collections::{HashMap, HashSet};

use crate::argument::{Argument, BoundArgument};
use crate::constant::{DEFAULT_ERROR_CODE, HELP_NAME};
use crate::diagnostic::{ConfigError, Diagnostic, DiagnosticKind, ErrorLog};
use crate::group::ArgumentGroup;
use crate::help::{DefaultHelpFormatter, HelpFormatter};
use crate::model::{ErrorLevel, LoopPool, ModifyRecord, TupleChars};
use crate::parser::{render_diagnostic, ConsoleInterface, Parser, UserInterface};
use crate::tokens::{scan, ScanSchema, Token};
use crate::types::{ArgumentType, FlagType};

// The ANSI bright color codes arguments rotate through for help
// rendering.
const BRIGHT_COLORS: [u8; 6] = [91, 92, 93, 94, 95, 96];

type CorrectCallback = Box<dyn FnMut(&ParsedArguments)>;
type ErrorCallback = Box<dyn FnMut(&[Diagnostic])>;

#[derive(Default)]
struct TokenizerState {
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
    tokenized_sub: Option<usize>,
    finished: bool,
}

/// A node in the schema tree: a named container of arguments, argument
/// groups and nested sub-commands.
///
/// A `Command` describes what the input may look like; handing the root
/// to a [`CommandLine`] and calling
/// [`parse`](CommandLine::parse) produces a [`ParsedArguments`] tree
/// plus accumulated diagnostics.
///
/// Every command installs a built-in unique `help` flag at
/// construction.
pub struct Command {
    name: String,
    description: Option<String>,
    arguments: Vec<BoundArgument>,
    groups: Vec<ArgumentGroup>,
    sub_commands: Vec<Command>,
    tuple_chars: ModifyRecord<TupleChars>,
    error_code: ModifyRecord<i32>,
    errors: ErrorLog,
    help_formatter: ModifyRecord<Box<dyn HelpFormatter>>,
    colors: LoopPool<u8>,
    tokenizer: TokenizerState,
    parser: Parser,
    on_correct: Option<CorrectCallback>,
    on_error: Option<ErrorCallback>,
    is_root: bool,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("arguments", &self.arguments)
            .field("sub_commands", &self.sub_commands)
            .finish()
    }
}

impl Command {
    /// Create a command. The name must be non-empty and alphabetic.
    pub fn new(name: impl Into<String>) -> Result<Self, ConfigError> {
        let name = name.into();

        if name.is_empty() || !name.chars().all(char::is_alphabetic) {
            return Err(ConfigError::InvalidName(name));
        }

        let mut command = Self {
            name,
            description: None,
            arguments: Vec::default(),
            groups: Vec::default(),
            sub_commands: Vec::default(),
            tuple_chars: ModifyRecord::new(TupleChars::default()),
            error_code: ModifyRecord::new(DEFAULT_ERROR_CODE),
            errors: ErrorLog::default(),
            help_formatter: ModifyRecord::new(
                Box::new(DefaultHelpFormatter::default()) as Box<dyn HelpFormatter>
            ),
            colors: LoopPool::new(BRIGHT_COLORS.to_vec()),
            tokenizer: TokenizerState::default(),
            parser: Parser::default(),
            on_correct: None,
            on_error: None,
            is_root: false,
        };
        command.add_argument(
            Argument::new(HELP_NAME, FlagType::default())
                .description("Shows this message.")
                .allow_unique(),
        )?;
        Ok(command)
    }

    /// Create a command marked as a tree root. A root can never be added
    /// as a sub-command.
    pub fn root(name: impl Into<String>) -> Result<Self, ConfigError> {
        let mut command = Self::new(name)?;
        command.is_root = true;
        Ok(command)
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    /// Bind an argument into this command.
    ///
    /// Fails when any of the argument's names is already taken, or when
    /// a unique argument declares a non-zero minimum arity.
    pub fn add_argument<A: ArgumentType>(
        &mut self,
        argument: Argument<A>,
    ) -> Result<(), ConfigError> {
        let mut bound = argument.bind();

        if self.arguments.iter().any(|other| other.shares_name(&bound)) {
            return Err(ConfigError::DuplicateIdentifier {
                name: bound.name().to_string(),
                command: self.name.clone(),
            });
        }

        if bound.allow_unique() && bound.arity().minimum() > 0 {
            return Err(ConfigError::InvalidUnique(bound.name().to_string()));
        }

        let color = *self.colors.next();
        bound.set_color(color);
        self.arguments.push(bound);
        Ok(())
    }

    /// Attach a group. Members must reference arguments already added.
    pub fn add_group(&mut self, group: ArgumentGroup) -> Result<(), ConfigError> {
        if self.groups.iter().any(|other| other.name() == group.name()) {
            return Err(ConfigError::DuplicateIdentifier {
                name: group.name().to_string(),
                command: self.name.clone(),
            });
        }

        for member in group.transitive_members() {
            if !self
                .arguments
                .iter()
                .any(|argument| argument.matches_name(member))
            {
                return Err(ConfigError::UnknownMember {
                    group: group.name().to_string(),
                    name: member.to_string(),
                });
            }
        }

        self.groups.push(group);
        Ok(())
    }

    /// Nest a sub-command.
    pub fn add_sub_command(&mut self, command: Command) -> Result<(), ConfigError> {
        if self
            .sub_commands
            .iter()
            .any(|other| other.name == command.name)
        {
            return Err(ConfigError::DuplicateIdentifier {
                name: command.name.clone(),
                command: self.name.clone(),
            });
        }

        if command.is_root {
            return Err(ConfigError::InvalidChild(command.name));
        }

        self.sub_commands.push(command);
        Ok(())
    }

    pub fn set_tuple_chars(&mut self, tuple_chars: TupleChars) {
        self.tuple_chars.set(tuple_chars);
    }

    /// The code this command contributes when it fails to parse. Codes
    /// across the tree combine with bitwise OR, so distinct powers of
    /// two let a caller tell failing commands apart.
    pub fn set_error_code(&mut self, error_code: i32) -> Result<(), ConfigError> {
        if error_code <= 0 {
            return Err(ConfigError::InvalidErrorCode(error_code));
        }

        self.error_code.set(error_code);
        Ok(())
    }

    pub fn set_help_formatter(&mut self, formatter: Box<dyn HelpFormatter>) {
        self.help_formatter.set(formatter);
    }

    pub fn set_minimum_exit_level(&mut self, level: ErrorLevel) {
        self.errors.set_minimum_exit_level(level);
    }

    pub fn set_minimum_display_level(&mut self, level: ErrorLevel) {
        self.errors.set_minimum_display_level(level);
    }

    /// Append a free-form diagnostic to this command.
    pub fn add_error(&mut self, message: impl Into<String>, level: ErrorLevel) {
        self.errors
            .push(Diagnostic::new(DiagnosticKind::Custom(message.into())).with_level(level));
    }

    pub fn on_correct<F: FnMut(&ParsedArguments) + 'static>(&mut self, callback: F) {
        self.on_correct = Some(Box::new(callback));
    }

    pub fn on_error<F: FnMut(&[Diagnostic]) + 'static>(&mut self, callback: F) {
        self.on_error = Some(Box::new(callback));
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn arguments(&self) -> &[BoundArgument] {
        &self.arguments
    }

    pub fn groups(&self) -> &[ArgumentGroup] {
        &self.groups
    }

    pub fn sub_commands(&self) -> &[Command] {
        &self.sub_commands
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }

    pub fn tuple_chars(&self) -> TupleChars {
        *self.tuple_chars.get()
    }

    /// The configured (not computed) error code slot.
    pub fn own_error_code(&self) -> i32 {
        *self.error_code.get()
    }

    pub fn minimum_exit_level(&self) -> ErrorLevel {
        self.errors.minimum_exit_level()
    }

    pub fn minimum_display_level(&self) -> ErrorLevel {
        self.errors.minimum_display_level()
    }

    /// Render this command's help text with its formatter.
    pub fn help(&self) -> String {
        self.help_formatter.get().format(self)
    }

    /// Whether an `allow_unique` argument received a value here or in
    /// any descendant.
    pub fn unique_argument_used(&self) -> bool {
        self.arguments
            .iter()
            .any(|argument| argument.allow_unique() && argument.usage_count() > 0)
            || self
                .sub_commands
                .iter()
                .any(Command::unique_argument_used)
    }

    /// The sub-command the tokenizer handed off to, if any.
    pub fn tokenized_sub_command(&self) -> Option<&Command> {
        self.tokenizer
            .tokenized_sub
            .map(|index| &self.sub_commands[index])
    }

    /// The raw text following the `--` marker, if the last parse saw
    /// one.
    pub fn forward_value(&self) -> Option<&str> {
        self.parser.forward()
    }

    // ------------------------------------------------------------------
    // The three parse phases: inherit, tokenize, parse.
    // ------------------------------------------------------------------

    /// Phase 1: push every unmodified configuration slot down the tree.
    pub(crate) fn inherit_into_children(&mut self) {
        let tuple_chars = self.tuple_chars.clone();
        let error_code = self.error_code.clone();
        let errors = &self.errors;
        let formatter = self.help_formatter.get();

        for child in &mut self.sub_commands {
            child.tuple_chars.set_if_not_modified(&tuple_chars);
            child.error_code.set_if_not_modified(&error_code);
            child.errors.inherit_thresholds(errors);
            // The formatter must be a fresh copy; shared state across
            // siblings bleeds configuration between commands.
            child
                .help_formatter
                .set_if_not_modified_with(|| formatter.clone_boxed());
            child.inherit_into_children();
        }
    }

    /// Phase 2: scan the input, recursing into the tokenized
    /// sub-command at a boundary.
    pub(crate) fn tokenize(&mut self, input: &str) {
        self.tokenize_slice(input, 0);
    }

    fn tokenize_slice(&mut self, remaining: &str, char_base: usize) {
        let schema = self.scan_schema();
        let result = scan(remaining, char_base, &schema);
        self.tokenizer.tokens = result.tokens;
        self.tokenizer.diagnostics = result.diagnostics;
        self.tokenizer.finished = true;

        if let Some(handoff) = result.handoff {
            let index = self
                .sub_commands
                .iter()
                .position(|child| child.name == handoff.name)
                .expect("internal error - the scanner only hands off to known sub-commands");
            self.tokenizer.tokenized_sub = Some(index);
            self.sub_commands[index].tokenize_slice(
                &remaining[handoff.resume_byte..],
                char_base + handoff.resume_chars,
            );
        }
    }

    fn scan_schema(&self) -> ScanSchema {
        let mut prefixes = HashSet::new();
        let mut long_names = HashSet::new();
        let mut flag_chars = HashSet::new();

        for argument in self.arguments.iter().filter(|a| !a.positional()) {
            prefixes.insert(argument.prefix());

            for name in argument.names() {
                long_names.insert(name.clone());

                let mut chars = name.chars();

                if let (Some(single), None) = (chars.next(), chars.next()) {
                    flag_chars.insert(single);
                }
            }
        }

        ScanSchema {
            prefixes,
            tuple: *self.tuple_chars.get(),
            long_names,
            flag_chars,
            sub_commands: self
                .sub_commands
                .iter()
                .map(|child| child.name.clone())
                .collect(),
        }
    }

    /// Phase 3: walk the tokens into typed values, recursing down the
    /// tokenized path.
    pub(crate) fn parse_tokens(&mut self) {
        let mut parser = std::mem::take(&mut self.parser);
        parser.set_tokens(self.tokenizer.tokens.clone());
        parser.parse(&mut self.arguments, &self.groups);
        self.parser = parser;

        if let Some(index) = self.tokenizer.tokenized_sub {
            self.sub_commands[index].parse_tokens();
        }
    }

    /// Move the final values out of the argument types into an immutable
    /// result tree. Untokenized sub-commands yield empty nodes.
    pub(crate) fn collect_values(&mut self) -> ParsedArguments {
        let mut values: HashMap<String, Box<dyn Any>> = HashMap::default();

        for argument in &mut self.arguments {
            if let Some(value) = argument.take_value() {
                values.insert(argument.name().to_string(), value);
            }
        }

        ParsedArguments {
            command: self.name.clone(),
            values,
            forward: self.parser.forward().map(|s| s.to_string()),
            sub_results: self
                .sub_commands
                .iter_mut()
                .map(Command::collect_values)
                .collect(),
        }
    }

    // ------------------------------------------------------------------
    // Error aggregation.
    // ------------------------------------------------------------------

    fn has_errors_in(&self, minimum: ErrorLevel) -> bool {
        self.errors
            .diagnostics()
            .iter()
            .chain(self.tokenizer.diagnostics.iter())
            .chain(self.parser.diagnostics().iter())
            .any(|d| d.level().is_in_minimum(minimum))
            || self
                .arguments
                .iter()
                .any(|argument| argument.has_errors_in(minimum))
    }

    /// Whether this command or its tokenized descendants accumulated a
    /// diagnostic at or above the exit threshold.
    pub fn has_exit_errors(&self) -> bool {
        self.has_errors_in(self.errors.minimum_exit_level())
            || self
                .tokenized_sub_command()
                .map_or(false, Command::has_exit_errors)
    }

    /// Whether anything at or above the display threshold accumulated.
    pub fn has_display_errors(&self) -> bool {
        self.has_errors_in(self.errors.minimum_display_level())
            || self
                .tokenized_sub_command()
                .map_or(false, Command::has_display_errors)
    }

    /// The effective diagnostics of this command in pass order:
    /// command-level first, then tokenizer, parser, and per-argument.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        let mut all: Vec<Diagnostic> = Vec::default();
        all.extend_from_slice(self.errors.diagnostics());
        all.extend_from_slice(&self.tokenizer.diagnostics);
        all.extend_from_slice(self.parser.diagnostics());

        for argument in &self.arguments {
            all.extend_from_slice(argument.diagnostics());
        }

        all
    }

    fn display_diagnostics(&self) -> Vec<Diagnostic> {
        let minimum = self.errors.minimum_display_level();
        let mut shown: Vec<Diagnostic> = self
            .diagnostics()
            .into_iter()
            .filter(|d| d.level().is_in_minimum(minimum))
            .collect();

        if let Some(sub) = self.tokenized_sub_command() {
            shown.extend(sub.display_diagnostics());
        }

        shown
    }

    /// The bitwise OR of this command's code (when it has exit errors)
    /// with the codes gathered from tokenized sub-commands whose exit
    /// threshold is within this command's minimum.
    pub fn error_code(&self) -> i32 {
        let own_minimum = self.errors.minimum_exit_level();
        let mut code = self
            .sub_commands
            .iter()
            .filter(|child| child.tokenizer.finished)
            .map(|child| {
                if child
                    .errors
                    .minimum_exit_level()
                    .is_in_minimum(own_minimum)
                {
                    child.error_code()
                } else {
                    0
                }
            })
            .fold(0, |a, b| a | b);

        // A failing descendant taints this command as well, so the
        // caller can trace the path from the combined code.
        if self.has_exit_errors() || code != 0 {
            code |= *self.error_code.get();
        }

        code
    }

    // ------------------------------------------------------------------
    // Callbacks and reset.
    // ------------------------------------------------------------------

    pub(crate) fn invoke_callbacks(
        &mut self,
        parsed: &ParsedArguments,
        interface: &dyn UserInterface,
    ) {
        let has_exit = self.has_exit_errors();
        let help_text = self
            .arguments
            .iter()
            .find(|argument| argument.matches_name(HELP_NAME) && argument.usage_count() > 0)
            .map(|_| self.help());

        if has_exit {
            let diagnostics = self.diagnostics();

            if let Some(callback) = self.on_error.as_mut() {
                callback(&diagnostics);
            }
        } else if let Some(callback) = self.on_correct.as_mut() {
            callback(parsed);
        }

        if let Some(help_text) = help_text {
            interface.print(help_text);
        }

        let exit_minimum = self.errors.minimum_exit_level();

        for argument in &mut self.arguments {
            match parsed.values.get(argument.name()) {
                Some(value) => argument.invoke_ok(value.as_ref()),
                None if argument.has_errors_in(exit_minimum) => argument.invoke_err(),
                None => {}
            }
        }

        for (index, child) in self.sub_commands.iter_mut().enumerate() {
            child.invoke_callbacks(&parsed.sub_results[index], interface);
        }
    }

    /// Restore the tree to a fresh parseable state. Idempotent.
    pub fn reset_state(&mut self) {
        self.tokenizer = TokenizerState::default();
        self.parser = Parser::default();
        self.errors.clear();

        for argument in &mut self.arguments {
            argument.reset();
        }

        for child in &mut self.sub_commands {
            child.reset_state();
        }
    }
}

/// The immutable result of a parse: per-argument values keyed by
/// canonical name, the forwarded remainder, and one node per
/// sub-command.
pub struct ParsedArguments {
    command: String,
    values: HashMap<String, Box<dyn Any>>,
    forward: Option<String>,
    sub_results: Vec<ParsedArguments>,
}

impl ParsedArguments {
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Look up an argument's value by canonical name, downcast to its
    /// declared type. `None` when the argument was absent (and had no
    /// default) or when `T` does not match.
    pub fn get<T: 'static>(&self, name: &str) -> Option<&T> {
        self.values.get(name).and_then(|value| value.downcast_ref())
    }

    /// The raw text following the `--` marker, if present.
    pub fn forward(&self) -> Option<&str> {
        self.forward.as_deref()
    }

    pub fn sub_results(&self) -> &[ParsedArguments] {
        &self.sub_results
    }

    /// The result node of a sub-command, by name.
    pub fn sub(&self, name: &str) -> Option<&ParsedArguments> {
        self.sub_results.iter().find(|sub| sub.command == name)
    }
}

impl std::fmt::Debug for ParsedArguments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedArguments")
            .field("command", &self.command)
            .field("values", &self.values.keys().collect::<Vec<_>>())
            .field("forward", &self.forward)
            .field("sub_results", &self.sub_results)
            .finish()
    }
}

/// The host wrapping a root [`Command`]: feeds it input, renders the
/// displayable diagnostics, and exposes the combined error code.
pub struct CommandLine {
    root: Command,
    interface: Box<dyn UserInterface>,
}

impl CommandLine {
    pub fn new(mut root: Command) -> Self {
        root.is_root = true;
        Self {
            root,
            interface: Box::new(ConsoleInterface::default()),
        }
    }

    /// Replace the output sinks (defaults to stdout/stderr).
    pub fn interface(mut self, interface: Box<dyn UserInterface>) -> Self {
        self.interface = interface;
        self
    }

    pub fn root(&self) -> &Command {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Command {
        &mut self.root
    }

    /// Run the full pipeline over one input line: reset, inherit,
    /// tokenize, parse, collect, display, callbacks.
    pub fn parse(&mut self, input: &str) -> ParsedArguments {
        self.root.reset_state();
        self.root.inherit_into_children();
        self.root.tokenize(input);
        self.root.parse_tokens();
        let parsed = self.root.collect_values();

        for diagnostic in self.root.display_diagnostics() {
            self.interface
                .print_error(render_diagnostic(input, &diagnostic));
        }

        self.root.invoke_callbacks(&parsed, self.interface.as_ref());
        parsed
    }

    /// Parse pre-split tokens, re-quoting any containing whitespace.
    pub fn parse_tokens(&mut self, argv: &[&str]) -> ParsedArguments {
        let joined = argv
            .iter()
            .map(|token| {
                if token.is_empty() || token.chars().any(|c| c.is_whitespace() || c == '"') {
                    format!("\"{}\"", token.replace('"', "\\\""))
                } else {
                    token.to_string()
                }
            })
            .collect::<Vec<String>>()
            .join(" ");
        self.parse(&joined)
    }

    pub fn error_code(&self) -> i32 {
        self.root.error_code()
    }

    pub fn has_exit_errors(&self) -> bool {
        self.root.has_exit_errors()
    }

    pub fn has_display_errors(&self) -> bool {
        self.root.has_display_errors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::InMemoryInterface;
    use crate::types::{NumberType, StringType};
    use assert_matches::assert_matches;
    use rstest::rstest;

    fn quiet(root: Command) -> CommandLine {
        CommandLine::new(root).interface(Box::new(InMemoryInterface::default()))
    }

    #[rstest]
    #[case("")]
    #[case("has space")]
    #[case("digits1")]
    #[case("hy-phen")]
    fn new_invalid_name(#[case] name: &str) {
        assert_matches!(Command::new(name), Err(ConfigError::InvalidName(_)));
    }

    #[test]
    fn new_installs_help() {
        let command = Command::new("tool").unwrap();
        assert_eq!(command.arguments().len(), 1);
        assert_eq!(command.arguments()[0].name(), HELP_NAME);
        assert!(command.arguments()[0].allow_unique());
    }

    #[test]
    fn add_argument_duplicate() {
        // Setup
        let mut command = Command::new("tool").unwrap();
        command
            .add_argument(Argument::new("num", NumberType::<u32>::default()))
            .unwrap();

        // Execute
        let result = command.add_argument(Argument::new("num", StringType::default()));

        // Verify
        assert_matches!(result, Err(ConfigError::DuplicateIdentifier { .. }));
    }

    #[test]
    fn add_argument_duplicate_alias() {
        let mut command = Command::new("tool").unwrap();
        command
            .add_argument(Argument::new("num", NumberType::<u32>::default()).name("n"))
            .unwrap();
        let result = command.add_argument(Argument::new("n", StringType::default()));
        assert_matches!(result, Err(ConfigError::DuplicateIdentifier { .. }));
    }

    #[test]
    fn add_argument_invalid_unique() {
        let mut command = Command::new("tool").unwrap();
        let result =
            command.add_argument(Argument::new("num", NumberType::<u32>::default()).allow_unique());
        assert_matches!(result, Err(ConfigError::InvalidUnique(_)));
    }

    #[test]
    fn add_argument_colors_rotate() {
        let mut command = Command::new("tool").unwrap();
        command
            .add_argument(Argument::new("a", StringType::default()))
            .unwrap();
        command
            .add_argument(Argument::new("b", StringType::default()))
            .unwrap();
        // The built-in help takes the first color.
        let colors: Vec<u8> = command.arguments().iter().map(|a| a.color()).collect();
        assert_eq!(colors, vec![91, 92, 93]);
    }

    #[test]
    fn add_group_unknown_member() {
        let mut command = Command::new("tool").unwrap();
        let result = command.add_group(ArgumentGroup::new("modes").member("missing"));
        assert_matches!(result, Err(ConfigError::UnknownMember { .. }));
    }

    #[test]
    fn add_group_duplicate() {
        let mut command = Command::new("tool").unwrap();
        command.add_group(ArgumentGroup::new("modes")).unwrap();
        let result = command.add_group(ArgumentGroup::new("modes"));
        assert_matches!(result, Err(ConfigError::DuplicateIdentifier { .. }));
    }

    #[test]
    fn add_sub_command_duplicate() {
        let mut command = Command::new("tool").unwrap();
        command.add_sub_command(Command::new("sub").unwrap()).unwrap();
        let result = command.add_sub_command(Command::new("sub").unwrap());
        assert_matches!(result, Err(ConfigError::DuplicateIdentifier { .. }));
    }

    #[test]
    fn add_sub_command_root() {
        let mut command = Command::new("tool").unwrap();
        let result = command.add_sub_command(Command::root("other").unwrap());
        assert_matches!(result, Err(ConfigError::InvalidChild(_)));
    }

    #[rstest]
    #[case(0)]
    #[case(-3)]
    fn set_error_code_invalid(#[case] code: i32) {
        let mut command = Command::new("tool").unwrap();
        assert_matches!(
            command.set_error_code(code),
            Err(ConfigError::InvalidErrorCode(_))
        );
    }

    #[test]
    fn parse_named_values() {
        // Setup
        let mut root = Command::new("tool").unwrap();
        root.add_argument(Argument::new("num", NumberType::<u32>::default()))
            .unwrap();
        root.add_argument(Argument::new("word", StringType::default()))
            .unwrap();
        let mut cli = quiet(root);

        // Execute
        let parsed = cli.parse("--num 7 --word hello");

        // Verify
        assert_eq!(parsed.get::<u32>("num"), Some(&7));
        assert_eq!(parsed.get::<String>("word"), Some(&"hello".to_string()));
        assert_eq!(cli.error_code(), 0);
        assert!(!cli.has_exit_errors());
    }

    #[test]
    fn parse_positional() {
        // Setup
        let mut root = Command::new("tool").unwrap();
        root.add_argument(Argument::new("target", StringType::default()).positional())
            .unwrap();
        let mut cli = quiet(root);

        // Execute
        let parsed = cli.parse("somewhere");

        // Verify
        assert_eq!(
            parsed.get::<String>("target"),
            Some(&"somewhere".to_string())
        );
    }

    #[test]
    fn parse_sub_command() {
        // Setup
        let mut sub = Command::new("sub").unwrap();
        sub.add_argument(Argument::new("num", NumberType::<u32>::default()))
            .unwrap();
        let mut root = Command::new("tool").unwrap();
        root.add_sub_command(sub).unwrap();
        let mut cli = quiet(root);

        // Execute
        let parsed = cli.parse("sub --num 3");

        // Verify
        assert_eq!(parsed.sub("sub").unwrap().get::<u32>("num"), Some(&3));
        assert_eq!(cli.error_code(), 0);
    }

    #[test]
    fn parse_forward() {
        let mut cli = quiet(Command::new("tool").unwrap());
        let parsed = cli.parse("-- raw --stuff here");
        assert_eq!(parsed.forward(), Some("raw --stuff here"));
    }

    #[test]
    fn parse_tokens_joins() {
        // Setup
        let mut root = Command::new("tool").unwrap();
        root.add_argument(Argument::new("path", StringType::default()))
            .unwrap();
        let mut cli = quiet(root);

        // Execute
        let parsed = cli.parse_tokens(&["--path", "C:\\Program Files\\app"]);

        // Verify
        assert_eq!(
            parsed.get::<String>("path"),
            Some(&"C:\\Program Files\\app".to_string())
        );
    }

    #[test]
    fn error_code_own() {
        // Setup
        let mut root = Command::new("tool").unwrap();
        root.add_argument(Argument::new("num", NumberType::<u32>::default()))
            .unwrap();
        let mut cli = quiet(root);

        // Execute
        cli.parse("--num abc");

        // Verify
        assert!(cli.has_exit_errors());
        assert_eq!(cli.error_code(), 1);
    }

    #[test]
    fn error_code_or_combination() {
        // Setup: root code 2, sub code 5; the sub fails.
        let mut sub = Command::new("sub").unwrap();
        sub.set_error_code(5).unwrap();
        sub.add_argument(Argument::new("num", NumberType::<u32>::default()).required())
            .unwrap();
        let mut root = Command::new("tool").unwrap();
        root.set_error_code(2).unwrap();
        root.add_sub_command(sub).unwrap();
        let mut cli = quiet(root);

        // Execute
        cli.parse("sub");

        // Verify: 2 | 5 == 7.
        assert_eq!(cli.error_code(), 7);
    }

    #[test]
    fn error_code_untokenized_sub_ignored() {
        // Setup: the sub would fail, but it is never reached.
        let mut sub = Command::new("sub").unwrap();
        sub.add_argument(Argument::new("num", NumberType::<u32>::default()).required())
            .unwrap();
        let mut root = Command::new("tool").unwrap();
        root.add_sub_command(sub).unwrap();
        let mut cli = quiet(root);

        // Execute
        cli.parse("");

        // Verify
        assert_eq!(cli.error_code(), 0);
    }

    #[test]
    fn inheritance() {
        // Setup
        let sub = Command::new("sub").unwrap();
        let mut overridden = Command::new("other").unwrap();
        overridden.set_error_code(8).unwrap();
        let mut root = Command::new("tool").unwrap();
        root.set_tuple_chars(TupleChars::Curly);
        root.set_error_code(2).unwrap();
        root.set_minimum_exit_level(ErrorLevel::Warning);
        root.add_sub_command(sub).unwrap();
        root.add_sub_command(overridden).unwrap();
        let mut cli = quiet(root);

        // Execute
        cli.parse("");

        // Verify
        let root = cli.root();
        assert_eq!(root.sub_commands()[0].tuple_chars(), TupleChars::Curly);
        assert_eq!(root.sub_commands()[0].own_error_code(), 2);
        assert_eq!(
            root.sub_commands()[0].minimum_exit_level(),
            ErrorLevel::Warning
        );
        assert_eq!(root.sub_commands()[1].own_error_code(), 8);
    }

    #[test]
    fn repeat_parse_equal() {
        // Setup
        let mut root = Command::new("tool").unwrap();
        root.add_argument(Argument::new("num", NumberType::<u32>::default()))
            .unwrap();
        let mut cli = quiet(root);

        // Execute
        let first = cli.parse("--num 7");
        let first_code = cli.error_code();
        let second = cli.parse("--num 7");
        let second_code = cli.error_code();

        // Verify
        assert_eq!(first.get::<u32>("num"), second.get::<u32>("num"));
        assert_eq!(first_code, second_code);
    }

    #[test]
    fn reset_state_idempotent() {
        let mut root = Command::new("tool").unwrap();
        root.add_argument(Argument::new("num", NumberType::<u32>::default()))
            .unwrap();
        let mut cli = quiet(root);
        cli.parse("--num abc");
        assert!(cli.has_exit_errors());

        cli.root_mut().reset_state();
        cli.root_mut().reset_state();
        assert!(!cli.has_exit_errors());
        assert_eq!(cli.error_code(), 0);
    }

    #[test]
    fn callbacks_on_correct() {
        // Setup
        use std::cell::Cell;
        use std::rc::Rc;

        let witnessed = Rc::new(Cell::new(0u32));
        let inner = Rc::clone(&witnessed);
        let mut root = Command::new("tool").unwrap();
        root.add_argument(
            Argument::new("num", NumberType::<u32>::default())
                .on_ok(move |value: &u32| inner.set(*value)),
        )
        .unwrap();
        let correct = Rc::new(Cell::new(false));
        let correct_inner = Rc::clone(&correct);
        root.on_correct(move |_parsed| correct_inner.set(true));
        let mut cli = quiet(root);

        // Execute
        cli.parse("--num 9");

        // Verify
        assert_eq!(witnessed.get(), 9);
        assert!(correct.get());
    }

    #[test]
    fn callbacks_on_error() {
        // Setup
        use std::cell::Cell;
        use std::rc::Rc;

        let failed = Rc::new(Cell::new(false));
        let failed_inner = Rc::clone(&failed);
        let mut root = Command::new("tool").unwrap();
        root.add_argument(Argument::new("num", NumberType::<u32>::default()))
            .unwrap();
        root.on_error(move |diagnostics| failed_inner.set(!diagnostics.is_empty()));
        let mut cli = quiet(root);

        // Execute
        cli.parse("--num abc");

        // Verify
        assert!(failed.get());
    }

    #[test]
    fn help_prints() {
        // Setup
        let mut root = Command::new("tool").unwrap();
        root.add_argument(Argument::new("num", NumberType::<u32>::default()))
            .unwrap();
        let interface = InMemoryInterface::default();
        let messages = interface.messages();
        let mut cli = CommandLine::new(root).interface(Box::new(interface));

        // Execute
        cli.parse("--help");

        // Verify
        assert_eq!(cli.error_code(), 0);
        let printed = messages.borrow().join("\n");
        crate::test::assert_contains!(printed, "usage: tool");
    }

    #[test]
    fn diagnostics_rendered_with_caret() {
        // Setup
        let mut root = Command::new("tool").unwrap();
        root.add_argument(Argument::new("num", NumberType::<u32>::default()))
            .unwrap();
        let interface = InMemoryInterface::default();
        let errors = interface.errors();
        let mut cli = CommandLine::new(root).interface(Box::new(interface));

        // Execute
        cli.parse("--num abc");

        // Verify: the caret run sits under the offending token.
        let printed = errors.borrow().join("\n");
        crate::test::assert_contains!(printed, "--num abc\n      ^^^");
    }

    #[test]
    fn unique_argument_used_recurses() {
        // Setup
        let mut sub = Command::new("sub").unwrap();
        sub.add_argument(Argument::new("num", NumberType::<u32>::default()))
            .unwrap();
        let mut root = Command::new("tool").unwrap();
        root.add_sub_command(sub).unwrap();
        let mut cli = quiet(root);

        // Execute
        cli.parse("sub --help");

        // Verify
        assert!(cli.root().unique_argument_used());
        assert_eq!(cli.error_code(), 0);
    }

    #[test]
    fn custom_command_error() {
        let mut root = Command::new("tool").unwrap();
        root.add_error("schema-level concern", ErrorLevel::Warning);
        assert!(!root.has_exit_errors());
        assert!(root.has_display_errors());
    }
}
