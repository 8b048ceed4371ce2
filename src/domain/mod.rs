//! Bill model, the allocation engine and receipt text heuristics.
//!
//! Everything here is synchronous and free of I/O except the
//! [`ports::TextRecognizer`] seam, which infrastructure adapters implement.

pub mod allocation;
pub mod bill;
pub mod ports;
pub mod suggest;
