use crate::domain::ports::TextRecognizerBox;
use crate::domain::suggest::suggest_dish_names;
use serde::Serialize;

/// Shown in place of the recognized text when recognition fails.
pub const RECOGNITION_FAILED: &str = "Error processing image. Please try again.";

#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct ScanOutcome {
    pub extracted_text: String,
    pub suggestions: Vec<String>,
    pub failed: bool,
}

/// Reads a receipt image and proposes dish names from it.
///
/// Recognition failures are reported through the outcome's status text
/// and never abort the caller.
pub struct ReceiptScanner {
    recognizer: TextRecognizerBox,
}

impl ReceiptScanner {
    pub fn new(recognizer: TextRecognizerBox) -> Self {
        Self { recognizer }
    }

    pub async fn scan(&self, image: &[u8]) -> ScanOutcome {
        match self.recognizer.recognize(image).await {
            Ok(text) => {
                let suggestions = suggest_dish_names(&text);
                tracing::info!(
                    chars = text.len(),
                    suggestions = suggestions.len(),
                    "receipt recognized"
                );
                ScanOutcome {
                    extracted_text: text,
                    suggestions,
                    failed: false,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "receipt recognition failed");
                ScanOutcome {
                    extracted_text: RECOGNITION_FAILED.to_string(),
                    suggestions: Vec::new(),
                    failed: true,
                }
            }
        }
    }
}
