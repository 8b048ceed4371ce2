//! Application layer: the session aggregate that owns a bill in progress,
//! and the receipt scanner that feeds dish suggestions into it.

pub mod scanner;
pub mod session;
