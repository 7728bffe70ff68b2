use std::path::PathBuf;

use argtree::{
    Argument, ArgumentGroup, Arity, Command, CommandLine, DiagnosticKind, FileType, FlagType,
    NumberType, StringType, TupleType, UserInterface,
};

/// Swallows rendered output so failing-input scenarios stay silent.
struct Quiet {}

impl UserInterface for Quiet {
    fn print(&self, _message: String) {}

    fn print_error(&self, _message: String) {}
}

fn quiet(root: Command) -> CommandLine {
    CommandLine::new(root).interface(Box::new(Quiet {}))
}

fn usage_of(cli: &CommandLine, name: &str) -> u32 {
    cli.root()
        .arguments()
        .iter()
        .find(|argument| argument.name() == name)
        .unwrap()
        .usage_count()
}

#[test]
fn sub_command_with_file_and_byte() {
    // Setup
    let path = std::env::temp_dir().join("argtree_scenario_what.txt");
    std::fs::write(&path, "content").unwrap();

    let mut sub = Command::new("subcommand").unwrap();
    sub.add_argument(Argument::new("what", FileType::default()))
        .unwrap();
    sub.add_argument(Argument::new("hey", NumberType::<i8>::default()))
        .unwrap();
    let mut root = Command::new("tester").unwrap();
    root.add_sub_command(sub).unwrap();
    let mut cli = quiet(root);

    // Execute
    let parsed = cli.parse(&format!(
        "subcommand --what \"{}\" --hey 12",
        path.display()
    ));

    // Verify
    let sub = parsed.sub("subcommand").unwrap();
    assert_eq!(sub.get::<PathBuf>("what"), Some(&path));
    assert_eq!(sub.get::<i8>("hey"), Some(&12));
    assert_eq!(cli.error_code(), 0);

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn tuple_values() {
    // Setup
    let mut root = Command::new("tester").unwrap();
    root.add_argument(Argument::new(
        "count",
        TupleType::new(NumberType::<i64>::default(), Arity::AtLeast(1)),
    ))
    .unwrap();
    let mut cli = quiet(root);

    // Execute
    let parsed = cli.parse("--count [1 2 3]");

    // Verify
    assert_eq!(parsed.get::<Vec<i64>>("count"), Some(&vec![1, 2, 3]));
    assert_eq!(cli.error_code(), 0);
}

#[test]
fn flag_cluster() {
    // Setup
    let mut root = Command::new("tester").unwrap();

    for name in ["a", "b", "c"] {
        root.add_argument(Argument::new(name, FlagType::default()))
            .unwrap();
    }

    let mut cli = quiet(root);

    // Execute
    let parsed = cli.parse("-abc");

    // Verify: equivalent to -a -b -c.
    for name in ["a", "b", "c"] {
        assert_eq!(parsed.get::<bool>(name), Some(&true));
    }

    assert_eq!(cli.error_code(), 0);
}

#[test]
fn flag_cluster_equivalent_to_separate() {
    // Setup
    let build = || {
        let mut root = Command::new("tester").unwrap();

        for name in ["a", "b", "c"] {
            root.add_argument(Argument::new(name, FlagType::default()))
                .unwrap();
        }

        quiet(root)
    };
    let mut combined = build();
    let mut separate = build();

    // Execute
    let combined_parsed = combined.parse("-abc");
    let separate_parsed = separate.parse("-a -b -c");

    // Verify
    for name in ["a", "b", "c"] {
        assert_eq!(
            combined_parsed.get::<bool>(name),
            separate_parsed.get::<bool>(name)
        );
    }
}

#[test]
fn numeric_failure_sets_exit_code() {
    // Setup
    let mut root = Command::new("tester").unwrap();
    root.add_argument(Argument::new("num", NumberType::<i64>::default()))
        .unwrap();
    let mut cli = quiet(root);

    // Execute
    cli.parse("--num abc");

    // Verify
    assert!(cli.has_exit_errors());
    assert_eq!(cli.error_code(), 1);
    let diagnostics = cli.root().diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert!(matches!(
        diagnostics[0].kind(),
        DiagnosticKind::NumberOutOfRange { .. }
    ));
    // The diagnostic points at the "abc" token.
    let span = diagnostics[0].span().unwrap();
    assert_eq!(span.start, 6);
    assert_eq!(span.length, 3);
}

#[test]
fn repeated_usage_counts() {
    // Setup
    let mut root = Command::new("tester").unwrap();
    root.add_argument(Argument::new("x", NumberType::<u32>::default()))
        .unwrap();
    let mut cli = quiet(root);

    // Execute
    let parsed = cli.parse("--x 2 --x 3");

    // Verify: both occurrences count; the last value wins.
    assert_eq!(usage_of(&cli, "x"), 2);
    assert_eq!(parsed.get::<u32>("x"), Some(&3));
    assert_eq!(cli.error_code(), 0);
}

#[test]
fn repeated_usage_capped() {
    // Setup
    let mut root = Command::new("tester").unwrap();
    root.add_argument(Argument::new("x", NumberType::<u32>::default()).max_usage(1))
        .unwrap();
    let mut cli = quiet(root);

    // Execute
    cli.parse("--x 2 --x 3");

    // Verify
    assert!(cli
        .root()
        .diagnostics()
        .iter()
        .any(|d| matches!(d.kind(), DiagnosticKind::TooManyOccurrences { .. })));
    assert_eq!(cli.error_code(), 1);
}

#[test]
fn exclusive_group_violation() {
    // Setup
    let mut root = Command::new("tester").unwrap();
    root.set_error_code(4).unwrap();
    root.add_argument(Argument::new("a", NumberType::<u32>::default()))
        .unwrap();
    root.add_argument(Argument::new("b", NumberType::<u32>::default()))
        .unwrap();
    root.add_group(ArgumentGroup::new("choice").exclusive().member("a").member("b"))
        .unwrap();
    let mut cli = quiet(root);

    // Execute
    cli.parse("--a 1 --b 2");

    // Verify
    assert!(cli
        .root()
        .diagnostics()
        .iter()
        .any(|d| matches!(d.kind(), DiagnosticKind::MultipleInExclusive(_))));
    assert_eq!(cli.error_code(), 4);
}

#[test]
fn quoted_path_preserved() {
    // Setup
    let mut root = Command::new("tester").unwrap();
    root.add_argument(Argument::new("path", StringType::default()))
        .unwrap();
    let mut cli = quiet(root);

    // Execute
    let parsed = cli.parse(r#"--path "C:\Program Files\app""#);

    // Verify: quotes removed, spaces and backslashes preserved.
    assert_eq!(
        parsed.get::<String>("path"),
        Some(&r"C:\Program Files\app".to_string())
    );
    assert_eq!(cli.error_code(), 0);
}

#[test]
fn forward_value_passes_through() {
    // Setup
    let mut root = Command::new("tester").unwrap();
    root.add_argument(Argument::new("num", NumberType::<u32>::default()))
        .unwrap();
    let mut cli = quiet(root);

    // Execute
    let parsed = cli.parse("--num 1 -- anything at all --even --flags");

    // Verify
    assert_eq!(parsed.get::<u32>("num"), Some(&1));
    assert_eq!(parsed.forward(), Some("anything at all --even --flags"));
    assert_eq!(cli.error_code(), 0);
}

#[test]
fn parse_reset_parse_is_stable() {
    // Setup
    let mut sub = Command::new("sub").unwrap();
    sub.add_argument(Argument::new("n", NumberType::<u32>::default()))
        .unwrap();
    let mut root = Command::new("tester").unwrap();
    root.add_argument(Argument::new("flag", FlagType::default()))
        .unwrap();
    root.add_sub_command(sub).unwrap();
    let mut cli = quiet(root);
    let input = "--flag sub --n 9";

    // Execute
    let first = cli.parse(input);
    let first_code = cli.error_code();
    let second = cli.parse(input);
    let second_code = cli.error_code();

    // Verify
    assert_eq!(first.get::<bool>("flag"), second.get::<bool>("flag"));
    assert_eq!(
        first.sub("sub").unwrap().get::<u32>("n"),
        second.sub("sub").unwrap().get::<u32>("n")
    );
    assert_eq!(first_code, second_code);
    assert_eq!(first_code, 0);
}

#[test]
fn error_code_or_distinguishes_commands() {
    // Setup: root 2 and sub 5 combine to 7 when the sub fails.
    let mut sub = Command::new("sub").unwrap();
    sub.set_error_code(5).unwrap();
    sub.add_argument(Argument::new("n", NumberType::<u32>::default()).required())
        .unwrap();
    let mut root = Command::new("tester").unwrap();
    root.set_error_code(2).unwrap();
    root.add_sub_command(sub).unwrap();
    let mut cli = quiet(root);

    // Execute
    cli.parse("sub --n oops");

    // Verify
    assert_eq!(cli.error_code(), 7);
}

#[test]
fn inherited_configuration_reaches_children() {
    // Setup
    let grandchild = Command::new("leaf").unwrap();
    let mut child = Command::new("mid").unwrap();
    child.add_sub_command(grandchild).unwrap();
    let mut root = Command::new("tester").unwrap();
    root.set_error_code(16).unwrap();
    root.add_sub_command(child).unwrap();
    let mut cli = quiet(root);

    // Execute
    cli.parse("");

    // Verify: the slot flows through every level.
    let mid = &cli.root().sub_commands()[0];
    assert_eq!(mid.own_error_code(), 16);
    assert_eq!(mid.sub_commands()[0].own_error_code(), 16);
}

#[test]
fn help_does_not_fail_required() {
    // Setup
    let mut root = Command::new("tester").unwrap();
    root.add_argument(Argument::new("must", NumberType::<u32>::default()).required())
        .unwrap();
    let mut cli = quiet(root);

    // Execute
    cli.parse("--help");

    // Verify: the unique help flag suppresses the required check.
    assert_eq!(cli.error_code(), 0);
}
