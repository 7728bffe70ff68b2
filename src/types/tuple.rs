use crate::model::Arity;
use crate::tokens::Token;
use crate::types::{ArgumentType, TypeReport};

/// A multi-value type delegating each element to an inner type.
///
/// The collected value is a `Vec` of the inner values, accumulating
/// across occurrences; the arity is configurable so the same shape
/// serves pairs, triples and open-ended lists.
#[derive(Debug)]
pub struct TupleType<A: ArgumentType> {
    inner: A,
    arity: Arity,
    collected: Vec<A::Value>,
    matched: bool,
}

impl<A: ArgumentType> TupleType<A> {
    pub fn new(inner: A, arity: Arity) -> Self {
        Self {
            inner,
            arity,
            collected: Vec::default(),
            matched: false,
        }
    }
}

impl<A: ArgumentType> ArgumentType for TupleType<A> {
    type Value = Vec<A::Value>;

    fn arity(&self) -> Arity {
        self.arity
    }

    fn parse_values(&mut self, values: &[Token], report: &mut TypeReport) {
        self.matched = true;

        for (index, token) in values.iter().enumerate() {
            let mut element_report = TypeReport::default();
            self.inner
                .parse_values(std::slice::from_ref(token), &mut element_report);

            // Re-anchor element positions onto this occurrence's slice.
            for mut entry in element_report.entries() {
                entry.index = Some(index + entry.index.unwrap_or(0));
                report.push(entry);
            }

            if let Some(value) = self.inner.take_value() {
                self.collected.push(value);
            }
        }
    }

    fn take_value(&mut self) -> Option<Vec<A::Value>> {
        std::mem::take(&mut self.matched).then(|| std::mem::take(&mut self.collected))
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.collected.clear();
        self.matched = false;
    }

    fn description(&self) -> Option<String> {
        self.inner.description()
    }
}
