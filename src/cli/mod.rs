//! Terminal front-end: input, output and commands.

pub mod convert;
pub mod interactive;
pub mod setup;
pub mod ui;
