use crate::diagnostic::Diagnostic;

/// Render one diagnostic against the input line it refers to: the
/// message, the line itself, and a caret run under the offending span.
///
/// Diagnostics without a span (whole-command problems, e.g. a missing
/// required argument) render as the message alone.
pub(crate) fn render_diagnostic(input: &str, diagnostic: &Diagnostic) -> String {
    match diagnostic.span() {
        Some(span) => {
            let carets = "^".repeat(span.length.max(1));
            format!(
                "{diagnostic}\n{input}\n{:width$}{carets}",
                "",
                width = span.start
            )
        }
        None => diagnostic.to_string(),
    }
}
