// textwash/src/lib.rs
//! # Textwash CLI Application
//!
//! This crate provides the command-line interface for the textwash
//! sanitization engine. All engine logic lives in `textwash-core`; this
//! crate only parses arguments, wires up logging and configuration, and
//! prints envelopes.

pub mod cli;
pub mod commands;
pub mod logger;
