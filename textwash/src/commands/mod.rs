// textwash/src/commands/mod.rs
//! Command implementations for the textwash CLI.

pub mod run;
