//! Engine configuration
//!
//! Settings come from defaults, `TESSERACT_*` environment variables and
//! TOML files.

use std::path::Path;

use tesswrap_core::{Error, Result};

pub mod ocr;

pub use self::ocr::OcrConfig;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<OcrConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: OcrConfig = toml::from_str(&content)
        .map_err(|e| Error::InvalidConfig(format!("{}: {}", path.display(), e.message())))?;
    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Save configuration to a TOML file
pub fn save_config(config: &OcrConfig, path: &Path) -> Result<()> {
    let content =
        toml::to_string_pretty(config).map_err(|e| Error::InvalidConfig(e.to_string()))?;
    std::fs::write(path, content)?;
    Ok(())
}
