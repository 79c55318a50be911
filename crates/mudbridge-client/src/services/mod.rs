//! Built-in listeners.

pub mod console;

pub use console::TextConsole;
