//! File formats the command line reads and writes.

pub mod csv;
pub mod json;
