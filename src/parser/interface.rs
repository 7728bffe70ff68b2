/// The sinks rendered output goes to: `print` for regular messages
/// (help text), `print_error` for diagnostics. Defaults to the process
/// standard streams; swap in your own to capture or redirect.
pub trait UserInterface {
    fn print(&self, message: String);
    fn print_error(&self, message: String);
}

#[derive(Default)]
pub(crate) struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        println!("{message}");
    }

    fn print_error(&self, message: String) {
        eprintln!("{message}");
    }
}
