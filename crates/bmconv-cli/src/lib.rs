//! Command line interface of the `bmconv` binary.

pub mod cli;

pub use cli::{Args, ModeArg};
