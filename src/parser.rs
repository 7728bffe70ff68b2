mod base;
mod interface;
mod printer;

pub(crate) use base::Parser;
pub use interface::UserInterface;
pub(crate) use interface::ConsoleInterface;
#[cfg(test)]
pub(crate) use interface::test::InMemoryInterface;
pub(crate) use printer::render_diagnostic;
