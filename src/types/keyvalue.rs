use std::collections::HashMap;

use crate::diagnostic::DiagnosticKind;
use crate::model::Arity;
use crate::tokens::Token;
use crate::types::{ArgumentType, TypeReport};

/// Parses `key=value` pairs into a map, accumulating across
/// occurrences. A pair without `=` is reported and skipped.
#[derive(Debug, Default)]
pub struct KeyValueType {
    entries: HashMap<String, String>,
    matched: bool,
}

impl ArgumentType for KeyValueType {
    type Value = HashMap<String, String>;

    fn arity(&self) -> Arity {
        Arity::AtLeast(1)
    }

    fn parse_values(&mut self, values: &[Token], report: &mut TypeReport) {
        self.matched = true;

        for (index, token) in values.iter().enumerate() {
            match token.text().split_once('=') {
                Some((key, value)) => {
                    self.entries.insert(key.to_string(), value.to_string());
                }
                None => {
                    report.error(
                        DiagnosticKind::MalformedKeyValue(token.text().to_string()),
                        index,
                    );
                }
            }
        }
    }

    fn take_value(&mut self) -> Option<HashMap<String, String>> {
        std::mem::take(&mut self.matched).then(|| std::mem::take(&mut self.entries))
    }

    fn reset(&mut self) {
        self.entries.clear();
        self.matched = false;
    }
}
