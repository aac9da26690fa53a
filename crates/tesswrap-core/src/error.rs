use std::time::Duration;

use tesswrap_types::{EngineVersion, UnknownExtension};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("tesseract is not installed or not in PATH")]
    TesseractNotFound,

    #[error("specified language data not found: {0}")]
    LanguageNotFound(String),

    #[error("OCR process timeout after {0:?}")]
    Timeout(Duration),

    #[error("OCR process cancelled")]
    Cancelled,

    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid Tesseract config: {0}")]
    InvalidConfig(String),

    #[error("unsupported output extension: {0}")]
    UnsupportedExtension(String),

    #[error("tesseract version {found} is not supported (minimum {required} required)")]
    UnsupportedVersion {
        found: EngineVersion,
        required: EngineVersion,
    },

    #[error("OCR produced no output")]
    EmptyOutput,

    #[error("invalid OCR output: {0}")]
    InvalidOutput(String),

    #[error("tesseract error (code {}): {}", display_code(.code), display_stderr(.stderr))]
    Process { code: Option<i32>, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Timeout(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::TesseractNotFound)
    }
}

impl From<UnknownExtension> for Error {
    fn from(err: UnknownExtension) -> Self {
        Error::UnsupportedExtension(err.0)
    }
}

fn display_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |c| c.to_string())
}

fn display_stderr(stderr: &str) -> &str {
    let msg = stderr.trim();
    if msg.is_empty() { "unknown error" } else { msg }
}
