//! Child process execution with timeouts

mod command;

pub use command::Command;
