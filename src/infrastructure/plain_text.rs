use crate::domain::ports::TextRecognizer;
use crate::error::{Result, TallyError};
use async_trait::async_trait;

/// A recognizer for payloads that are already text, such as a saved OCR
/// transcript. Decodes the bytes as UTF-8.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextRecognizer;

#[async_trait]
impl TextRecognizer for PlainTextRecognizer {
    async fn recognize(&self, image: &[u8]) -> Result<String> {
        String::from_utf8(image.to_vec())
            .map_err(|e| TallyError::RecognitionError(format!("transcript is not UTF-8: {e}")))
    }
}
