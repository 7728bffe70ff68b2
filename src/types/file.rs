use std::path::{Path, PathBuf};

use crate::diagnostic::DiagnosticKind;
use crate::tokens::Token;
use crate::types::{ArgumentType, TypeReport};

/// Takes a single path value, checking that it exists on disk.
#[derive(Debug, Default)]
pub struct FileType {
    current: Option<PathBuf>,
}

impl ArgumentType for FileType {
    type Value = PathBuf;

    fn parse_values(&mut self, values: &[Token], report: &mut TypeReport) {
        if let Some(token) = values.first() {
            let path = Path::new(token.text());

            if path.exists() {
                self.current = Some(path.to_path_buf());
            } else {
                report.error(DiagnosticKind::FileNotFound(token.text().to_string()), 0);
            }
        }
    }

    fn take_value(&mut self) -> Option<PathBuf> {
        self.current.take()
    }

    fn reset(&mut self) {
        self.current = None;
    }

    fn description(&self) -> Option<String> {
        Some("An existing file path.".to_string())
    }
}
