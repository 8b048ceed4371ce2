use crate::error::Result;
use async_trait::async_trait;

/// Turns an image payload into whatever text can be read from it.
///
/// No structure is guaranteed on the returned text.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    async fn recognize(&self, image: &[u8]) -> Result<String>;
}

pub type TextRecognizerBox = Box<dyn TextRecognizer>;
