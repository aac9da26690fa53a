use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use tesswrap_config::OcrConfig;
use tesswrap_core::{
    Error, Result, ensure_version, missing_language, parse_boxes, parse_languages, parse_tsv,
    parse_version,
};
use tesswrap_types::{BoundingBox, EngineVersion, Extension, OcrOutput, OutputType, TsvTable};
use tokio_util::sync::CancellationToken;

use crate::args::{Invocation, OutputBase};
use crate::input::OcrInput;
use crate::process::{self, RunOutput};

const OUTPUT_NAME: &str = "output";

/// Handle on a located, version-checked tesseract executable.
///
/// Cheap to clone. Every call runs one engine process in a fresh scratch
/// directory that is removed when the call returns.
#[derive(Debug, Clone)]
pub struct Client {
    config: Arc<OcrConfig>,
    program: PathBuf,
    version: EngineVersion,
    cancel: Option<CancellationToken>,
}

impl Client {
    /// Locate the executable and check it is at least 3.05
    pub async fn new(config: OcrConfig) -> Result<Self> {
        config.validate()?;
        let program = process::resolve_program(config.tesseract_cmd.as_deref())?;

        let output = process::run(
            process::command(&program, &["--version".into()], 0),
            config.effective_timeout(),
            None,
        )
        .await?;
        let version = parse_version(&output.text())?;
        ensure_version(version, EngineVersion::MINIMUM)?;

        tracing::debug!("Using tesseract {} at {}", version, program.display());
        Ok(Self {
            config: Arc::new(config),
            program,
            version,
            cancel: None,
        })
    }

    /// Client with default settings (tesseract on PATH, 30 second timeout)
    pub async fn default_client() -> Result<Self> {
        Self::new(OcrConfig::default()).await
    }

    /// Abort in-flight and future runs when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn version(&self) -> EngineVersion {
        self.version
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn config(&self) -> &OcrConfig {
        &self.config
    }

    /// Languages with installed traineddata
    pub async fn available_languages(&self) -> Result<Vec<String>> {
        let output = self
            .exec(vec!["--list-langs".into()])
            .await
            .map_err(|e| match e {
                Error::Process { .. } | Error::Io(_) => {
                    tracing::warn!("Failed to list tesseract languages: {e}");
                    Error::TesseractNotFound
                }
                other => other,
            })?;
        Ok(parse_languages(&output.text()))
    }

    #[tracing::instrument(level = "debug", skip_all, fields(lang = ?lang))]
    pub async fn image_to_string(&self, input: &OcrInput, lang: Option<&str>) -> Result<String> {
        let stdout = self.run_stdout(input, lang, None).await?;
        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }

    #[tracing::instrument(level = "debug", skip_all, fields(lang = ?lang, ?output_type))]
    pub async fn image_to_output(
        &self,
        input: &OcrInput,
        lang: Option<&str>,
        output_type: OutputType,
    ) -> Result<OcrOutput> {
        match output_type {
            OutputType::String => Ok(OcrOutput::Text(self.image_to_string(input, lang).await?)),
            OutputType::Bytes => Ok(OcrOutput::Bytes(self.run_stdout(input, lang, None).await?)),
            OutputType::Dict => Ok(OcrOutput::Dict(self.image_to_data(input, lang).await?)),
        }
    }

    /// [`Client::image_to_output`] with the configured default output type
    pub async fn image_to_default_output(
        &self,
        input: &OcrInput,
        lang: Option<&str>,
    ) -> Result<OcrOutput> {
        self.image_to_output(input, lang, self.config.output_type).await
    }

    /// Word-level layout data parsed from TSV on stdout
    #[tracing::instrument(level = "debug", skip_all, fields(lang = ?lang))]
    pub async fn image_to_data(&self, input: &OcrInput, lang: Option<&str>) -> Result<TsvTable> {
        let stdout = self.run_stdout(input, lang, Some("tsv")).await?;
        Ok(parse_tsv(&String::from_utf8_lossy(&stdout)))
    }

    /// Write recognised text to `<output_base>.txt` and return that path
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(lang = ?lang, output = %output_base.display())
    )]
    pub async fn image_to_file(
        &self,
        input: &OcrInput,
        lang: Option<&str>,
        output_base: &Path,
    ) -> Result<PathBuf> {
        let scratch = scratch_dir()?;
        let output = OutputBase::File(output_base.to_path_buf());
        let written = output.with_extension("txt").ok_or(Error::EmptyOutput)?;

        let invocation = self.prepare(input, lang, scratch.path(), output).await?;
        self.exec(invocation.args()).await?;

        if !written.is_file() {
            return Err(Error::EmptyOutput);
        }
        Ok(written)
    }

    /// Run with a file extension output (`hocr`, `xml`, `tsv`, `pdf`) and
    /// return the generated file's content
    #[tracing::instrument(level = "debug", skip_all, fields(lang = ?lang, %extension))]
    pub async fn image_to_extension(
        &self,
        input: &OcrInput,
        lang: Option<&str>,
        extension: Extension,
    ) -> Result<Vec<u8>> {
        input.validate()?;
        ensure_version(self.version, extension.min_version())?;

        let scratch = scratch_dir()?;
        let invocation = self
            .prepare(input, lang, scratch.path(), scratch_output(&scratch))
            .await?
            .variable(extension.config_variable());
        let generated = output_file(&invocation, extension.as_str())?;

        self.exec(invocation.args()).await?;
        read_output(&generated)
    }

    /// [`Client::image_to_extension`] with the extension given by name
    pub async fn image_to_extension_named(
        &self,
        input: &OcrInput,
        lang: Option<&str>,
        extension: &str,
    ) -> Result<Vec<u8>> {
        let extension: Extension = extension.parse()?;
        self.image_to_extension(input, lang, extension).await
    }

    pub async fn image_to_hocr(&self, input: &OcrInput, lang: Option<&str>) -> Result<String> {
        self.extension_text(input, lang, Extension::Hocr).await
    }

    /// ALTO XML, needs tesseract 4.1 or newer
    pub async fn image_to_alto_xml(&self, input: &OcrInput, lang: Option<&str>) -> Result<String> {
        self.extension_text(input, lang, Extension::Xml).await
    }

    pub async fn image_to_tsv(&self, input: &OcrInput, lang: Option<&str>) -> Result<String> {
        self.extension_text(input, lang, Extension::Tsv).await
    }

    /// Searchable PDF
    pub async fn image_to_pdf(&self, input: &OcrInput, lang: Option<&str>) -> Result<Vec<u8>> {
        self.image_to_extension(input, lang, Extension::Pdf).await
    }

    /// Character bounding boxes from a `makebox` run
    #[tracing::instrument(level = "debug", skip_all, fields(lang = ?lang))]
    pub async fn image_to_boxes(
        &self,
        input: &OcrInput,
        lang: Option<&str>,
    ) -> Result<Vec<BoundingBox>> {
        let scratch = scratch_dir()?;
        let invocation = self
            .prepare(input, lang, scratch.path(), scratch_output(&scratch))
            .await?
            .variable("tessedit_create_boxfile=1")
            .config("batch.nochop")
            .config("makebox");
        let box_file = output_file(&invocation, "box")?;

        self.exec(invocation.args()).await?;

        let content = String::from_utf8_lossy(&read_output(&box_file)?).into_owned();
        let boxes = parse_boxes(&content);
        tracing::debug!("Parsed {} boxes", boxes.len());
        Ok(boxes)
    }

    async fn extension_text(
        &self,
        input: &OcrInput,
        lang: Option<&str>,
        extension: Extension,
    ) -> Result<String> {
        let bytes = self.image_to_extension(input, lang, extension).await?;
        String::from_utf8(bytes)
            .map_err(|e| Error::InvalidOutput(format!("{extension} output is not UTF-8: {e}")))
    }

    async fn run_stdout(
        &self,
        input: &OcrInput,
        lang: Option<&str>,
        config: Option<&str>,
    ) -> Result<Vec<u8>> {
        let scratch = scratch_dir()?;
        let mut invocation = self
            .prepare(input, lang, scratch.path(), OutputBase::Stdout)
            .await?;
        if let Some(config) = config {
            invocation = invocation.config(config);
        }
        Ok(self.exec(invocation.args()).await?.stdout)
    }

    /// Validate the input and language, then stage the image in `scratch`
    async fn prepare(
        &self,
        input: &OcrInput,
        lang: Option<&str>,
        scratch: &Path,
        output: OutputBase,
    ) -> Result<Invocation> {
        input.validate()?;
        let lang = self.language(lang);
        if let Some(lang) = lang {
            self.validate_language(lang).await?;
        }
        let image = input.stage(scratch)?;

        Ok(Invocation::new(&image, output)
            .configured(&self.config)
            .language(lang))
    }

    /// Call argument first, then the configured default
    fn language<'a>(&'a self, lang: Option<&'a str>) -> Option<&'a str> {
        lang.or(self.config.language.as_deref())
            .map(str::trim)
            .filter(|l| !l.is_empty())
    }

    async fn validate_language(&self, lang: &str) -> Result<()> {
        let available = self.available_languages().await?;
        match missing_language(lang, &available) {
            Some(code) => Err(Error::LanguageNotFound(code.to_string())),
            None => Ok(()),
        }
    }

    async fn exec(&self, args: Vec<OsString>) -> Result<RunOutput> {
        tracing::debug!("Running {} {:?}", self.program.display(), args);
        process::run(
            process::command(&self.program, &args, self.config.nice),
            self.config.effective_timeout(),
            self.cancel.as_ref(),
        )
        .await
    }
}

fn scratch_dir() -> Result<TempDir> {
    let dir = tempfile::Builder::new().prefix("tesseract_").tempdir()?;
    tracing::debug!("Created scratch directory {}", dir.path().display());
    Ok(dir)
}

fn scratch_output(scratch: &TempDir) -> OutputBase {
    OutputBase::File(scratch.path().join(OUTPUT_NAME))
}

fn output_file(invocation: &Invocation, extension: &str) -> Result<PathBuf> {
    invocation
        .output()
        .with_extension(extension)
        .ok_or(Error::EmptyOutput)
}

fn read_output(path: &Path) -> Result<Vec<u8>> {
    match fs::read(path) {
        Ok(bytes) if bytes.is_empty() => Err(Error::EmptyOutput),
        Ok(bytes) => Ok(bytes),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!("Expected output file missing: {}", path.display());
            Err(Error::EmptyOutput)
        }
        Err(e) => Err(e.into()),
    }
}
