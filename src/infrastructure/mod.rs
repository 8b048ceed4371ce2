//! Adapters implementing the domain's [`crate::domain::ports::TextRecognizer`].

pub mod plain_text;
pub mod tesseract;
