use crate::tokens::Token;
use crate::types::{ArgumentType, TypeReport};

/// Takes a single value verbatim.
#[derive(Debug, Default)]
pub struct StringType {
    current: Option<String>,
}

impl ArgumentType for StringType {
    type Value = String;

    fn parse_values(&mut self, values: &[Token], _report: &mut TypeReport) {
        if let Some(token) = values.first() {
            self.current = Some(token.text().to_string());
        }
    }

    fn take_value(&mut self) -> Option<String> {
        self.current.take()
    }

    fn reset(&mut self) {
        self.current = None;
    }
}
