use std::str::FromStr;

use crate::diagnostic::DiagnosticKind;
use crate::tokens::Token;
use crate::types::{ArgumentType, TypeReport};

/// Parses a single numeric value of type `N`.
///
/// Any `FromStr` failure (malformed digits, overflow) reports
/// [`DiagnosticKind::NumberOutOfRange`] positioned at the offending
/// token.
#[derive(Debug)]
pub struct NumberType<N> {
    current: Option<N>,
}

impl<N> Default for NumberType<N> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<N> ArgumentType for NumberType<N>
where
    N: FromStr + 'static,
{
    type Value = N;

    fn parse_values(&mut self, values: &[Token], report: &mut TypeReport) {
        if let Some(token) = values.first() {
            match N::from_str(token.text()) {
                Ok(value) => {
                    self.current = Some(value);
                }
                Err(_) => {
                    report.error(
                        DiagnosticKind::NumberOutOfRange {
                            token: token.text().to_string(),
                            target: std::any::type_name::<N>(),
                        },
                        0,
                    );
                }
            }
        }
    }

    fn take_value(&mut self) -> Option<N> {
        self.current.take()
    }

    fn reset(&mut self) {
        self.current = None;
    }

    fn description(&self) -> Option<String> {
        Some(format!(
            "A numeric value ({}).",
            std::any::type_name::<N>()
        ))
    }
}
