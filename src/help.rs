use crate::argument::BoundArgument;
use crate::command::Command;
use crate::group::ArgumentGroup;

const DEFAULT_WIDTH: usize = 100;
const PADDING: usize = 3;

/// Produces a command's help text. The core guarantees access to the
/// declaration-ordered argument list, the group tree, descriptions,
/// arity, required/positional flags, and each argument's palette color.
///
/// Formatters are deep-copied when inherited by sub-commands, so an
/// implementation must be able to clone itself behind the trait.
pub trait HelpFormatter {
    fn format(&self, command: &Command) -> String;
    fn clone_boxed(&self) -> Box<dyn HelpFormatter>;
}

/// A plain columnar formatter: a usage synopsis, the argument table,
/// and the sub-command list.
#[derive(Debug, Clone, Default)]
pub struct DefaultHelpFormatter {
    width: Option<usize>,
}

impl DefaultHelpFormatter {
    /// Fix the wrap width instead of reading the terminal geometry.
    pub fn with_width(width: usize) -> Self {
        Self { width: Some(width) }
    }

    fn wrap_width(&self) -> usize {
        self.width.unwrap_or_else(|| {
            terminal_size::terminal_size()
                .map(|(width, _)| width.0 as usize)
                .unwrap_or(DEFAULT_WIDTH)
        })
    }
}

impl HelpFormatter for DefaultHelpFormatter {
    fn format(&self, command: &Command) -> String {
        let mut lines: Vec<String> = Vec::default();
        lines.push(format!(
            "usage: {name}{synopsis}",
            name = command.name(),
            synopsis = synopsis_line(command)
        ));

        if let Some(description) = command.description() {
            lines.push(String::default());
            lines.push(description.to_string());
        }

        let rows: Vec<(String, String)> = command
            .arguments()
            .iter()
            .map(|argument| (listing_name(argument), listing_description(argument)))
            .collect();

        if !rows.is_empty() {
            lines.push(String::default());
            lines.push("arguments:".to_string());
            lines.extend(render_rows(&rows, self.wrap_width()));
        }

        if !command.sub_commands().is_empty() {
            let rows: Vec<(String, String)> = command
                .sub_commands()
                .iter()
                .map(|child| {
                    (
                        child.name().to_string(),
                        child.description().unwrap_or_default().to_string(),
                    )
                })
                .collect();
            lines.push(String::default());
            lines.push("sub-commands:".to_string());
            lines.extend(render_rows(&rows, self.wrap_width()));
        }

        lines.join("\n")
    }

    fn clone_boxed(&self) -> Box<dyn HelpFormatter> {
        Box::new(self.clone())
    }
}

fn synopsis_line(command: &Command) -> String {
    let grouped: Vec<&str> = command
        .groups()
        .iter()
        .flat_map(|group| group.transitive_members())
        .collect();
    let mut parts: Vec<String> = Vec::default();

    for argument in command.arguments() {
        if !grouped.contains(&argument.name()) {
            parts.push(argument_synopsis(argument, true));
        }
    }

    for group in command.groups() {
        let rendered = group_synopsis(command, group);

        if !rendered.is_empty() {
            parts.push(rendered);
        }
    }

    if !command.sub_commands().is_empty() {
        let names: Vec<&str> = command
            .sub_commands()
            .iter()
            .map(|child| child.name())
            .collect();
        parts.push(format!("{{{}}}", names.join(", ")));
    }

    parts
        .iter()
        .map(|part| format!(" {part}"))
        .collect::<String>()
}

fn argument_synopsis(argument: &BoundArgument, bracket_optional: bool) -> String {
    let mut synopsis = if argument.positional() {
        argument.name().to_uppercase()
    } else {
        let prefix = argument.prefix();
        let mut flag = if argument.name().chars().count() == 1 {
            format!("{prefix}{name}", name = argument.name())
        } else {
            format!("{prefix}{prefix}{name}", name = argument.name())
        };

        if argument.arity().maximum() != Some(0) {
            flag.push(' ');
            flag.push_str(&argument.name().to_uppercase());
        }

        flag
    };

    if argument.arity().maximum().is_none() {
        synopsis.push_str(" [...]");
    }

    if bracket_optional && !argument.required() && !argument.positional() {
        synopsis = format!("[{synopsis}]");
    }

    synopsis
}

/// An exclusive group renders as `(a | b)`; a plain group just lists
/// its members.
fn group_synopsis(command: &Command, group: &ArgumentGroup) -> String {
    let separator = if group.is_exclusive() { " | " } else { " " };
    let mut parts: Vec<String> = Vec::default();

    for member in group.members() {
        if let Some(argument) = command
            .arguments()
            .iter()
            .find(|argument| argument.matches_name(member))
        {
            parts.push(argument_synopsis(argument, false));
        }
    }

    for sub_group in group.sub_groups() {
        let rendered = group_synopsis(command, sub_group);

        if !rendered.is_empty() {
            parts.push(rendered);
        }
    }

    if parts.is_empty() {
        String::default()
    } else if group.is_exclusive() {
        format!("({})", parts.join(separator))
    } else {
        parts.join(separator)
    }
}

fn listing_name(argument: &BoundArgument) -> String {
    if argument.positional() {
        return argument.name().to_uppercase();
    }

    let prefix = argument.prefix();
    argument
        .names()
        .iter()
        .map(|name| {
            if name.chars().count() == 1 {
                format!("{prefix}{name}")
            } else {
                format!("{prefix}{prefix}{name}")
            }
        })
        .collect::<Vec<String>>()
        .join(", ")
}

fn listing_description(argument: &BoundArgument) -> String {
    let mut pieces: Vec<String> = Vec::default();

    if let Some(description) = argument.description() {
        pieces.push(description.to_string());
    }

    if let Some(description) = argument.type_description() {
        pieces.push(description);
    }

    pieces.join(" ")
}

fn render_rows(rows: &[(String, String)], width: usize) -> Vec<String> {
    let left_width = rows
        .iter()
        .map(|(left, _)| left.chars().count())
        .max()
        .unwrap_or(0);
    let middle_width = width
        .saturating_sub(1 + left_width + PADDING)
        .max(MINIMUM_MIDDLE_WIDTH);
    let padding = PADDING;
    let mut out: Vec<String> = Vec::default();

    for (left, middle) in rows {
        let parts = chunk(middle, middle_width);

        if parts.is_empty() {
            out.push(format!(" {left}"));
            continue;
        }

        for (i, part) in parts.iter().enumerate() {
            if i == 0 {
                out.push(format!(" {left:left_width$}{:padding$}{part}", ""));
            } else {
                out.push(format!(" {:left_width$}{:padding$}{part}", "", ""));
            }
        }
    }

    out
}

// With an average word length of 5, this fits three words per line.
pub(crate) const MINIMUM_MIDDLE_WIDTH: usize = 17;

/// Break a paragraph into lines no wider than `width`, splitting
/// overlong words with a hyphen.
fn chunk(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines: Vec<String> = Vec::default();
    let mut current = String::default();

    for word in paragraph.split(' ') {
        if word.is_empty() {
            continue;
        }

        if !current.is_empty() {
            if current.chars().count() + word.chars().count() + 1 <= width {
                current.push(' ');
                current.push_str(word);
                continue;
            }

            lines.push(std::mem::take(&mut current));
        }

        hyphenate(width, &mut lines, &mut current, word);
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn hyphenate(width: usize, lines: &mut Vec<String>, current: &mut String, word: &str) {
    let chars: Vec<char> = word.chars().collect();
    let increment = width - 1;
    let mut left = 0;

    while left + increment < chars.len() {
        let piece: String = chars[left..left + increment].iter().collect();
        lines.push(format!("{piece}-"));
        left += increment;
    }

    current.extend(&chars[left..]);
}
