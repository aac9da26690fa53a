use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tesswrap_core::{Error, Result};
use tesswrap_types::OutputType;

fn default_timeout() -> Option<Duration> {
    Some(Duration::from_secs(30))
}

fn default_nice() -> i32 {
    0
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Custom path to the tesseract executable, `tesseract` on PATH otherwise
    pub tesseract_cmd: Option<PathBuf>,
    /// Default language(s) when a call passes none, e.g. "eng" or "eng+fra"
    pub language: Option<String>,
    /// Tesseract config file appended to every invocation
    pub config_file: Option<PathBuf>,
    /// Deadline for a single engine run. Zero or `None` disables it
    #[serde(rename = "timeout_secs", with = "timeout_secs", default = "default_timeout")]
    pub timeout: Option<Duration>,
    /// Process priority (Unix only)
    #[serde(default = "default_nice")]
    pub nice: i32,
    pub output_type: OutputType,
    /// `--psm`
    pub page_segmentation_mode: Option<u8>,
    /// `--oem`
    pub engine_mode: Option<u8>,
    /// Extra `-c key=value` variables
    pub variables: BTreeMap<String, String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_cmd: None,
            language: None,
            config_file: None,
            timeout: default_timeout(),
            nice: default_nice(),
            output_type: OutputType::default(),
            page_segmentation_mode: None,
            engine_mode: None,
            variables: BTreeMap::new(),
        }
    }
}

impl OcrConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `TESSERACT_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        config.apply_lookup(lookup)?;
        Ok(config)
    }

    /// Apply any `TESSERACT_*` variables `lookup` knows about over `self`
    pub fn apply_lookup(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(cmd) = lookup("TESSERACT_CMD") {
            self.tesseract_cmd = Some(PathBuf::from(cmd));
        }
        if let Some(lang) = lookup("TESSERACT_LANG") {
            self.language = Some(lang);
        }
        if let Some(file) = lookup("TESSERACT_CONFIG_FILE") {
            self.config_file = Some(PathBuf::from(file));
        }
        let timeout = lookup("TESSERACT_TIMEOUT_SECS");
        if let Some(secs) = parse_var::<u64>("TESSERACT_TIMEOUT_SECS", timeout)? {
            self.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(nice) = parse_var("TESSERACT_NICE", lookup("TESSERACT_NICE"))? {
            self.nice = nice;
        }
        if let Some(psm) = parse_var("TESSERACT_PSM", lookup("TESSERACT_PSM"))? {
            self.page_segmentation_mode = Some(psm);
        }
        if let Some(oem) = parse_var("TESSERACT_OEM", lookup("TESSERACT_OEM"))? {
            self.engine_mode = Some(oem);
        }
        Ok(())
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_tesseract_cmd(mut self, cmd: impl Into<PathBuf>) -> Self {
        self.tesseract_cmd = Some(cmd.into());
        self
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    /// Deadline to enforce, `None` when disabled
    pub fn effective_timeout(&self) -> Option<Duration> {
        self.timeout.filter(|t| !t.is_zero())
    }

    /// Check values that would only fail once the engine runs
    pub fn validate(&self) -> Result<()> {
        if let Some(file) = &self.config_file {
            if !file.is_file() {
                return Err(Error::InvalidConfig(format!(
                    "config file not found: {}",
                    file.display()
                )));
            }
        }
        if let Some(psm) = self.page_segmentation_mode {
            if psm > 13 {
                return Err(Error::InvalidConfig(format!(
                    "page segmentation mode {psm} out of range 0-13"
                )));
            }
        }
        if let Some(oem) = self.engine_mode {
            if oem > 3 {
                return Err(Error::InvalidConfig(format!(
                    "engine mode {oem} out of range 0-3"
                )));
            }
        }
        let invalid = |k: &&String| k.is_empty() || k.contains(['=', ' ']);
        if let Some(key) = self.variables.keys().find(invalid) {
            return Err(Error::InvalidConfig(format!("invalid variable name: {key:?}")));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(key: &str, value: Option<String>) -> Result<Option<T>> {
    value
        .map(|v| {
            v.trim()
                .parse()
                .map_err(|_| Error::InvalidConfig(format!("{key}={v} is not a valid value")))
        })
        .transpose()
}

mod timeout_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(timeout: &Option<Duration>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(timeout.map_or(0, |t| t.as_secs()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok((secs > 0).then(|| Duration::from_secs(secs)))
    }
}
