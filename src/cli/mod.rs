//! Shared pieces of the `snmptrap-*` command-line tools.

pub mod args;
