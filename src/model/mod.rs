mod clipboard;
mod host;
mod terminal;

pub use clipboard::Clipboard;
pub use host::{Host, OpenTarget};
pub use terminal::{Prompter, TerminalHost};
