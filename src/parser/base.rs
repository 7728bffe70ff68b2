use std::collections::VecDeque;

use crate::argument::BoundArgument;
use crate::diagnostic::{Diagnostic, DiagnosticKind, Span};
use crate::group::ArgumentGroup;
use crate::tokens::{Token, TokenKind};

#[cfg(feature = "debug")]
use tracing::debug;

/// Walks one command's token list, dispatching value slices to the
/// bound arguments. Diagnostics accumulate; nothing unwinds.
#[derive(Default)]
pub(crate) struct Parser {
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
    forward: Option<String>,
}

impl Parser {
    pub(crate) fn set_tokens(&mut self, tokens: Vec<Token>) {
        self.tokens = tokens;
    }

    pub(crate) fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub(crate) fn forward(&self) -> Option<&str> {
        self.forward.as_deref()
    }

    pub(crate) fn parse(&mut self, arguments: &mut [BoundArgument], groups: &[ArgumentGroup]) {
        let mut positionals: VecDeque<usize> = arguments
            .iter()
            .enumerate()
            .filter(|(_, argument)| argument.positional())
            .map(|(index, _)| index)
            .collect();
        let mut i = 0;

        while i < self.tokens.len() {
            let token = self.tokens[i].clone();

            #[cfg(feature = "debug")]
            debug!("Dispatching token {i}: {token:?}.");

            match token.kind() {
                TokenKind::ArgumentName => match resolve_name(arguments, token.text()) {
                    Some(index) => {
                        i = self.consume_occurrence(arguments, index, i + 1, span_of(&token));
                    }
                    None => {
                        // The scanner only classifies known names; an
                        // unmatched one still degrades to a plain value.
                        self.diagnostics.push(unexpected(&token));
                        i += 1;
                    }
                },
                TokenKind::ArgumentNameList => {
                    i = self.consume_cluster(arguments, &token, i);
                }
                TokenKind::ArgumentValue | TokenKind::TupleOpen => {
                    match positionals.front().copied() {
                        Some(index) => {
                            positionals.pop_front();
                            let next =
                                self.consume_occurrence(arguments, index, i, span_of(&token));
                            // A zero-arity positional consumes nothing;
                            // step anyway to guarantee progress.
                            i = next.max(i + 1);
                        }
                        None => {
                            self.diagnostics.push(unexpected(&token));
                            i += 1;
                        }
                    }
                }
                TokenKind::SubCommand => break,
                TokenKind::Forward => {
                    self.forward = Some(token.text().to_string());
                    i += 1;
                }
                TokenKind::ArgumentValueTupled | TokenKind::TupleClose => {
                    // Only reachable on malformed spans; already reported
                    // by the tokenizer.
                    i += 1;
                }
            }
        }

        self.check_usage(arguments, groups);
    }

    /// Gather the value slice starting at `start` and hand it to the
    /// argument at `index`. Returns the index of the next unconsumed
    /// token.
    fn consume_occurrence(
        &mut self,
        arguments: &mut [BoundArgument],
        index: usize,
        start: usize,
        anchor: Span,
    ) -> usize {
        let (values, next, tupled) = self.gather(start, &arguments[index]);
        let argument = &mut arguments[index];
        let usage = argument.record_use();

        if let Some(max) = argument.max_usage() {
            if usage > max {
                self.diagnostics.push(
                    Diagnostic::new(DiagnosticKind::TooManyOccurrences {
                        name: argument.name().to_string(),
                        allowed: max,
                    })
                    .at(anchor),
                );
                return next;
            }
        }

        let arity = argument.arity();

        if tupled {
            // The tuple span overrides the arity bounds for gathering,
            // but the count must still line up.
            if !arity.accepts(values.len()) {
                self.diagnostics.push(
                    Diagnostic::new(DiagnosticKind::TupleArityMismatch {
                        name: argument.name().to_string(),
                        provided: values.len(),
                        expected: arity.to_string(),
                    })
                    .at(anchor),
                );
                return next;
            }
        } else if values.len() < arity.minimum() as usize {
            self.diagnostics.push(
                Diagnostic::new(DiagnosticKind::InsufficientValues {
                    name: argument.name().to_string(),
                    provided: values.len(),
                    expected: arity.minimum(),
                })
                .at(anchor),
            );
            return next;
        }

        let mut report = crate::types::TypeReport::default();
        argument.deliver(&values, &mut report);

        for entry in report.entries() {
            let span = entry
                .index
                .and_then(|k| values.get(k))
                .map(span_of)
                .unwrap_or(anchor);
            argument.push_diagnostic(
                Diagnostic::new(entry.kind)
                    .with_level(entry.level)
                    .at(span),
            );
        }

        next
    }

    /// Gather the tokens one occurrence consumes: a whole tuple span if
    /// one is present, otherwise value tokens greedily up to the arity
    /// maximum.
    fn gather(&self, start: usize, argument: &BoundArgument) -> (Vec<Token>, usize, bool) {
        if self
            .tokens
            .get(start)
            .map_or(false, |t| t.kind() == TokenKind::TupleOpen)
        {
            let mut j = start + 1;

            while self
                .tokens
                .get(j)
                .map_or(false, |t| t.kind() == TokenKind::ArgumentValueTupled)
            {
                j += 1;
            }

            let values = self.tokens[start + 1..j].to_vec();
            // Step over the closer (the tokenizer synthesizes one even
            // when the input lacked it).
            let next = if j < self.tokens.len() { j + 1 } else { j };
            return (values, next, true);
        }

        let maximum = argument.arity().maximum();
        let mut j = start;

        while self
            .tokens
            .get(j)
            .map_or(false, |t| t.kind() == TokenKind::ArgumentValue)
            && maximum.map_or(true, |max| j - start < max as usize)
        {
            j += 1;
        }

        (self.tokens[start..j].to_vec(), j, false)
    }

    /// A `-abc` cluster: every character addresses an argument; only the
    /// final one may consume values.
    fn consume_cluster(
        &mut self,
        arguments: &mut [BoundArgument],
        token: &Token,
        i: usize,
    ) -> usize {
        let cluster: Vec<char> = token.text().chars().skip(1).collect();
        let mut next = i + 1;

        for (k, single) in cluster.iter().enumerate() {
            let name = single.to_string();

            match arguments
                .iter()
                .position(|argument| !argument.positional() && argument.matches_name(&name))
            {
                Some(index) => {
                    let anchor = Span::new(token.position() + 1 + k, 1);

                    if k + 1 == cluster.len() {
                        next = self.consume_occurrence(arguments, index, i + 1, anchor);
                    } else {
                        self.consume_inline(arguments, index, anchor);
                    }
                }
                None => {
                    self.diagnostics.push(unexpected(token));
                }
            }
        }

        next
    }

    /// An occurrence with no room for values (a non-final cluster
    /// member).
    fn consume_inline(&mut self, arguments: &mut [BoundArgument], index: usize, anchor: Span) {
        let argument = &mut arguments[index];
        let usage = argument.record_use();

        if let Some(max) = argument.max_usage() {
            if usage > max {
                self.diagnostics.push(
                    Diagnostic::new(DiagnosticKind::TooManyOccurrences {
                        name: argument.name().to_string(),
                        allowed: max,
                    })
                    .at(anchor),
                );
                return;
            }
        }

        if argument.arity().minimum() > 0 {
            self.diagnostics.push(
                Diagnostic::new(DiagnosticKind::InsufficientValues {
                    name: argument.name().to_string(),
                    provided: 0,
                    expected: argument.arity().minimum(),
                })
                .at(anchor),
            );
            return;
        }

        let mut report = crate::types::TypeReport::default();
        argument.deliver(&[], &mut report);

        for entry in report.entries() {
            argument.push_diagnostic(
                Diagnostic::new(entry.kind)
                    .with_level(entry.level)
                    .at(anchor),
            );
        }
    }

    /// The after-pass checks: required presence, exclusive groups, and
    /// unique-argument isolation.
    fn check_usage(&mut self, arguments: &[BoundArgument], groups: &[ArgumentGroup]) {
        let unique_used = arguments
            .iter()
            .find(|argument| argument.allow_unique() && argument.usage_count() > 0);

        if unique_used.is_none() {
            for argument in arguments.iter() {
                if argument.required() && argument.usage_count() == 0 && !argument.has_default() {
                    self.diagnostics
                        .push(Diagnostic::new(DiagnosticKind::RequiredNotPresent(
                            argument.name().to_string(),
                        )));
                }
            }
        }

        for group in groups {
            self.check_group(arguments, group);
        }

        if let Some(unique) = unique_used {
            let others_used = arguments
                .iter()
                .any(|argument| !argument.allow_unique() && argument.usage_count() > 0);

            if others_used {
                self.diagnostics
                    .push(Diagnostic::new(DiagnosticKind::UniqueCombinedWithOthers(
                        unique.name().to_string(),
                    )));
            }
        }
    }

    fn check_group(&mut self, arguments: &[BoundArgument], group: &ArgumentGroup) {
        if group.is_exclusive() {
            let used = group
                .transitive_members()
                .iter()
                .filter(|name| {
                    arguments
                        .iter()
                        .any(|argument| argument.matches_name(name) && argument.usage_count() > 0)
                })
                .count();

            if used > 1 {
                self.diagnostics
                    .push(Diagnostic::new(DiagnosticKind::MultipleInExclusive(
                        group.name().to_string(),
                    )));
            }
        }

        for sub_group in group.sub_groups() {
            self.check_group(arguments, sub_group);
        }
    }
}

fn span_of(token: &Token) -> Span {
    Span::new(token.position(), token.len().max(1))
}

fn unexpected(token: &Token) -> Diagnostic {
    Diagnostic::new(DiagnosticKind::UnexpectedValue(token.text().to_string())).at(span_of(token))
}

/// Resolve a raw name token (prefixes included) against the bound
/// arguments, matching each argument's own prefix character.
fn resolve_name(arguments: &[BoundArgument], raw: &str) -> Option<usize> {
    let prefix = raw.chars().next()?;
    let stripped = raw.trim_start_matches(prefix);

    arguments.iter().position(|argument| {
        !argument.positional() && argument.prefix() == prefix && argument.matches_name(stripped)
    })
}
