use crate::model::Arity;
use crate::tokens::Token;
use crate::types::{ArgumentType, TypeReport};

/// A zero-value switch: present means `true`.
#[derive(Debug, Default)]
pub struct FlagType {
    matched: bool,
}

impl ArgumentType for FlagType {
    type Value = bool;

    fn arity(&self) -> Arity {
        Arity::exactly(0)
    }

    fn parse_values(&mut self, _values: &[Token], _report: &mut TypeReport) {
        self.matched = true;
    }

    fn take_value(&mut self) -> Option<bool> {
        std::mem::take(&mut self.matched).then_some(true)
    }

    fn reset(&mut self) {
        self.matched = false;
    }
}

/// A zero-value switch whose value is the number of occurrences.
#[derive(Debug, Default)]
pub struct CounterType {
    count: u32,
}

impl ArgumentType for CounterType {
    type Value = u32;

    fn arity(&self) -> Arity {
        Arity::exactly(0)
    }

    fn parse_values(&mut self, _values: &[Token], _report: &mut TypeReport) {
        self.count += 1;
    }

    fn take_value(&mut self) -> Option<u32> {
        match std::mem::take(&mut self.count) {
            0 => None,
            count => Some(count),
        }
    }

    fn reset(&mut self) {
        self.count = 0;
    }
}
