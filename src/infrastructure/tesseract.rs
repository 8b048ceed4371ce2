use crate::domain::ports::TextRecognizer;
use crate::error::{Result, TallyError};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// Recognizes text by piping the image through the `tesseract` executable.
///
/// Runs `tesseract stdin stdout -l <language>`. There is no timeout or
/// retry; a failed run surfaces as [`TallyError::RecognitionError`].
#[derive(Debug, Clone)]
pub struct TesseractRecognizer {
    program: PathBuf,
    language: String,
}

impl Default for TesseractRecognizer {
    fn default() -> Self {
        Self::new("tesseract", "eng")
    }
}

impl TesseractRecognizer {
    pub fn new(program: impl Into<PathBuf>, language: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            language: language.into(),
        }
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("stdin")
            .arg("stdout")
            .arg("-l")
            .arg(&self.language)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        cmd
    }
}

#[async_trait]
impl TextRecognizer for TesseractRecognizer {
    async fn recognize(&self, image: &[u8]) -> Result<String> {
        let mut child = self.command().spawn().map_err(|e| {
            TallyError::RecognitionError(format!(
                "failed to start {}: {e}",
                self.program.display()
            ))
        })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(image).await?;
            // Closing stdin tells tesseract the image is complete
            drop(stdin);
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TallyError::RecognitionError(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        tracing::debug!(bytes = output.stdout.len(), "tesseract finished");
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
