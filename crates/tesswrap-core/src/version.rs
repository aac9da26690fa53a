use std::sync::LazyLock;

use regex::Regex;
use tesswrap_types::EngineVersion;

use crate::error::{Error, Result};

static VERSION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"tesseract\s+v?(\d+)\.(\d+)\.(\d+)(?:\.\d+)?").expect("valid version regex")
});

/// Parse the banner printed by `tesseract --version`.
///
/// Only the first line is inspected, e.g. `tesseract 5.3.0` or
/// `tesseract v4.1.1.20191227`.
pub fn parse_version(banner: &str) -> Result<EngineVersion> {
    let first_line = banner.lines().next().unwrap_or_default().trim();
    let caps = VERSION_RE.captures(first_line).ok_or_else(|| {
        Error::InvalidOutput(format!("unrecognized tesseract version format: {first_line}"))
    })?;

    let number = |i: usize| -> Result<u32> {
        caps[i].parse().map_err(|_| {
            Error::InvalidOutput(format!("version component out of range: {first_line}"))
        })
    };

    Ok(EngineVersion::new(number(1)?, number(2)?, number(3)?))
}

/// Fail with [`Error::UnsupportedVersion`] unless `found >= required`
pub fn ensure_version(found: EngineVersion, required: EngineVersion) -> Result<()> {
    if found < required {
        return Err(Error::UnsupportedVersion { found, required });
    }
    Ok(())
}
