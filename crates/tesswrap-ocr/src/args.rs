use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tesswrap_config::OcrConfig;

/// Where the engine writes its result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputBase {
    Stdout,
    /// Path without extension, the engine appends `.txt`, `.box`, ...
    File(PathBuf),
}

impl OutputBase {
    /// Path of the file the engine writes for `extension`
    pub fn with_extension(&self, extension: &str) -> Option<PathBuf> {
        match self {
            OutputBase::Stdout => None,
            OutputBase::File(base) => {
                let mut path = base.clone().into_os_string();
                path.push(".");
                path.push(extension);
                Some(PathBuf::from(path))
            }
        }
    }
}

/// Command line for one engine run:
/// `image output [-l lang] [--psm N] [--oem N] [-c k=v]... [configfile] [configs]...`
#[derive(Debug, Clone)]
pub struct Invocation {
    image: PathBuf,
    output: OutputBase,
    language: Option<String>,
    page_segmentation_mode: Option<u8>,
    engine_mode: Option<u8>,
    variables: Vec<String>,
    config_file: Option<PathBuf>,
    configs: Vec<String>,
}

impl Invocation {
    pub fn new(image: &Path, output: OutputBase) -> Self {
        Self {
            image: image.to_path_buf(),
            output,
            language: None,
            page_segmentation_mode: None,
            engine_mode: None,
            variables: Vec::new(),
            config_file: None,
            configs: Vec::new(),
        }
    }

    /// Carry over the per-client settings
    pub fn configured(mut self, config: &OcrConfig) -> Self {
        self.page_segmentation_mode = config.page_segmentation_mode;
        self.engine_mode = config.engine_mode;
        self.config_file = config.config_file.clone();
        self.variables
            .extend(config.variables.iter().map(|(k, v)| format!("{k}={v}")));
        self
    }

    pub fn language(mut self, language: Option<&str>) -> Self {
        self.language = language.map(str::to_string);
        self
    }

    pub fn variable(mut self, assignment: &str) -> Self {
        self.variables.push(assignment.to_string());
        self
    }

    pub fn config(mut self, name: &str) -> Self {
        self.configs.push(name.to_string());
        self
    }

    pub fn output(&self) -> &OutputBase {
        &self.output
    }

    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![self.image.clone().into()];
        args.push(match &self.output {
            OutputBase::Stdout => "stdout".into(),
            OutputBase::File(base) => base.clone().into(),
        });

        if let Some(lang) = &self.language {
            args.push("-l".into());
            args.push(lang.into());
        }
        if let Some(psm) = self.page_segmentation_mode {
            args.push("--psm".into());
            args.push(psm.to_string().into());
        }
        if let Some(oem) = self.engine_mode {
            args.push("--oem".into());
            args.push(oem.to_string().into());
        }
        for var in &self.variables {
            args.push("-c".into());
            args.push(var.into());
        }
        if let Some(file) = &self.config_file {
            args.push(file.clone().into());
        }
        args.extend(self.configs.iter().map(OsString::from));
        args
    }
}
