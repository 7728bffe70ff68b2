use std::collections::HashSet;

use crate::constant::FORWARD_MARKER;
use crate::diagnostic::{Diagnostic, DiagnosticKind, Span};
use crate::model::TupleChars;
use crate::tokens::{Token, TokenKind};

#[cfg(feature = "debug")]
use tracing::debug;

/// The slice of a command's schema the scanner needs: how names look,
/// which brackets group tuples, and where the command tree branches.
#[derive(Debug, Clone)]
pub(crate) struct ScanSchema {
    pub(crate) prefixes: HashSet<char>,
    pub(crate) tuple: TupleChars,
    pub(crate) long_names: HashSet<String>,
    pub(crate) flag_chars: HashSet<char>,
    pub(crate) sub_commands: HashSet<String>,
}

/// Where scanning stopped to hand the rest of the input to a sub-command.
/// Offsets are relative to the scanned slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Handoff {
    pub(crate) name: String,
    pub(crate) resume_byte: usize,
    pub(crate) resume_chars: usize,
}

#[derive(Debug)]
pub(crate) struct ScanResult {
    pub(crate) tokens: Vec<Token>,
    pub(crate) diagnostics: Vec<Diagnostic>,
    pub(crate) handoff: Option<Handoff>,
}

enum Flush {
    Nothing,
    Plain,
    Forward,
    SubCommand(String),
}

struct Scanner<'s> {
    schema: &'s ScanSchema,
    tokens: Vec<Token>,
    diagnostics: Vec<Diagnostic>,
    word: String,
    word_start: Option<usize>,
    word_quoted: bool,
    quote: Option<(char, usize)>,
    tuple_open: Option<usize>,
}

/// Scan one command's worth of `input`, producing positioned tokens.
///
/// `char_base` is the character offset of `input` within the original
/// line; every emitted position is absolute with respect to that line.
/// Scanning stops early at a sub-command boundary (see
/// [`ScanResult::handoff`]) or at a `--` forward marker.
pub(crate) fn scan(input: &str, char_base: usize, schema: &ScanSchema) -> ScanResult {
    let mut scanner = Scanner {
        schema,
        tokens: Vec::default(),
        diagnostics: Vec::default(),
        word: String::default(),
        word_start: None,
        word_quoted: false,
        quote: None,
        tuple_open: None,
    };
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        let (byte, c) = chars[i];
        let pos = char_base + i;

        if let Some((q, _)) = scanner.quote {
            match c {
                '\\' => {
                    // A backslash only escapes the active quote character;
                    // anything else keeps the backslash literal.
                    if let Some(&(_, next)) = chars.get(i + 1) {
                        if next == q {
                            scanner.push_char(pos, q);
                            i += 2;
                            continue;
                        }
                    }
                    scanner.push_char(pos, '\\');
                }
                _ if c == q => {
                    scanner.quote = None;
                }
                _ => scanner.push_char(pos, c),
            }
            i += 1;
            continue;
        }

        match c {
            '"' | '\'' => {
                scanner.quote = Some((c, pos));
                scanner.word_quoted = true;
                if scanner.word_start.is_none() {
                    scanner.word_start = Some(pos);
                }
            }
            '\\' => match chars.get(i + 1) {
                Some(&(_, ' ')) => {
                    scanner.push_char(pos, ' ');
                    i += 1;
                }
                _ => scanner.push_char(pos, '\\'),
            },
            _ if c.is_whitespace() => match scanner.flush() {
                Flush::Forward => {
                    let rest = &input[byte + c.len_utf8()..];
                    scanner
                        .tokens
                        .push(Token::new(TokenKind::Forward, rest, pos + 1));
                    return scanner.finish(char_base + chars.len(), None);
                }
                Flush::SubCommand(name) => {
                    #[cfg(feature = "debug")]
                    debug!("Handing off to sub-command '{name}' at {pos}.");

                    return scanner.finish(
                        pos,
                        Some(Handoff {
                            name,
                            resume_byte: byte + c.len_utf8(),
                            resume_chars: i + 1,
                        }),
                    );
                }
                Flush::Nothing | Flush::Plain => {}
            },
            _ if c == schema.tuple.open() && scanner.tuple_open.is_none() => {
                if scanner.word_start.is_none() {
                    scanner
                        .tokens
                        .push(Token::new(TokenKind::TupleOpen, c.to_string(), pos));
                    scanner.tuple_open = Some(pos);
                } else {
                    // Mid-word bracket characters stay literal.
                    scanner.push_char(pos, c);
                }
            }
            _ if c == schema.tuple.open() && scanner.tuple_open.is_some() => {
                scanner.flush();
                scanner
                    .diagnostics
                    .push(Diagnostic::new(DiagnosticKind::NestedTuple).at(Span::new(pos, 1)));
            }
            _ if c == schema.tuple.close() && scanner.tuple_open.is_some() => {
                scanner.flush();
                scanner
                    .tokens
                    .push(Token::new(TokenKind::TupleClose, c.to_string(), pos));
                scanner.tuple_open = None;
            }
            _ => scanner.push_char(pos, c),
        }

        i += 1;
    }

    let end = char_base + chars.len();

    if let Some((_, quote_start)) = scanner.quote.take() {
        // Recover by closing the quote at end of input.
        scanner
            .diagnostics
            .push(Diagnostic::new(DiagnosticKind::UnterminatedQuote).at(Span::new(quote_start, 1)));
    }

    match scanner.flush() {
        Flush::Forward => {
            scanner
                .tokens
                .push(Token::new(TokenKind::Forward, "", end));
            scanner.finish(end, None)
        }
        Flush::SubCommand(name) => scanner.finish(
            end,
            Some(Handoff {
                name,
                resume_byte: input.len(),
                resume_chars: chars.len(),
            }),
        ),
        Flush::Nothing | Flush::Plain => scanner.finish(end, None),
    }
}

impl<'s> Scanner<'s> {
    fn push_char(&mut self, pos: usize, c: char) {
        if self.word_start.is_none() {
            self.word_start = Some(pos);
        }
        self.word.push(c);
    }

    fn flush(&mut self) -> Flush {
        let start = match self.word_start.take() {
            Some(start) => start,
            None => return Flush::Nothing,
        };
        let text = std::mem::take(&mut self.word);
        let quoted = std::mem::replace(&mut self.word_quoted, false);

        if self.tuple_open.is_some() {
            self.tokens
                .push(Token::new(TokenKind::ArgumentValueTupled, text, start));
            return Flush::Plain;
        }

        if !quoted {
            if text == FORWARD_MARKER {
                return Flush::Forward;
            }

            if self.schema.sub_commands.contains(&text) {
                self.tokens
                    .push(Token::new(TokenKind::SubCommand, text.clone(), start));
                return Flush::SubCommand(text);
            }

            if self.classify_name(&text, start) {
                return Flush::Plain;
            }
        }

        self.tokens
            .push(Token::new(TokenKind::ArgumentValue, text, start));
        Flush::Plain
    }

    /// Classify a prefixed word, emitting its token(s) on success.
    ///
    /// A word is an [`TokenKind::ArgumentName`] when the remainder after
    /// one or two prefixes equals a known name (an `=`-joined value
    /// splits off as a separate value token), and an
    /// [`TokenKind::ArgumentNameList`] when every character after a
    /// single prefix is a distinct single-character name. Anything else
    /// is left to the caller as a plain value: unknown names are not
    /// errors here, the parser decides.
    fn classify_name(&mut self, text: &str, start: usize) -> bool {
        let prefix = match text.chars().next() {
            Some(c) if self.schema.prefixes.contains(&c) => c,
            _ => return false,
        };
        let rest = match text.strip_prefix(prefix) {
            Some(rest) if !rest.is_empty() => rest,
            _ => return false,
        };
        let (body, double) = match rest.strip_prefix(prefix) {
            Some(body) if !body.is_empty() => (body, true),
            Some(_) => return false,
            None => (rest, false),
        };
        let (name, joined) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (body, None),
        };

        if self.schema.long_names.contains(name) {
            let prefix_count = if double { 2 } else { 1 };
            let name_text: String = text
                .chars()
                .take(prefix_count + name.chars().count())
                .collect();
            self.tokens
                .push(Token::new(TokenKind::ArgumentName, name_text, start));

            if let Some(value) = joined {
                let value_start = start + prefix_count + name.chars().count() + 1;
                self.tokens
                    .push(Token::new(TokenKind::ArgumentValue, value, value_start));
            }

            return true;
        }

        if !double && joined.is_none() && name.chars().count() >= 2 {
            let mut seen = HashSet::new();
            let clustered = name
                .chars()
                .all(|c| self.schema.flag_chars.contains(&c) && seen.insert(c));

            if clustered {
                self.tokens
                    .push(Token::new(TokenKind::ArgumentNameList, text, start));
                return true;
            }
        }

        false
    }

    fn finish(mut self, end: usize, handoff: Option<Handoff>) -> ScanResult {
        if let Some(tuple_start) = self.tuple_open.take() {
            // Recover by synthesizing the closer, so downstream spans
            // stay uniform.
            self.diagnostics
                .push(Diagnostic::new(DiagnosticKind::UnterminatedTuple).at(Span::new(
                    tuple_start,
                    1,
                )));
            self.tokens.push(Token::new(
                TokenKind::TupleClose,
                self.schema.tuple.close().to_string(),
                end,
            ));
        }

        ScanResult {
            tokens: self.tokens,
            diagnostics: self.diagnostics,
            handoff,
        }
    }
}
