pub(crate) const HELP_NAME: &str = "help";
pub(crate) const DEFAULT_PREFIX: char = '-';
pub(crate) const DEFAULT_ERROR_CODE: i32 = 1;
pub(crate) const FORWARD_MARKER: &str = "--";
