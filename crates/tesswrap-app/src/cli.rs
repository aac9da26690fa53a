use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use tesswrap_config::OcrConfig;

#[derive(Parser, Debug)]
#[command(name = "tesswrap")]
#[command(version, about = "Run the tesseract OCR engine and parse its output", long_about = None)]
pub struct Cli {
    /// TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Path to the tesseract executable
    #[arg(long, global = true)]
    pub tesseract: Option<PathBuf>,

    /// Timeout in seconds for each engine run, 0 disables it
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Recognise an image
    Ocr {
        /// Input image path
        image: PathBuf,

        /// OCR language(s), e.g. eng or eng+fra
        #[arg(short, long)]
        lang: Option<String>,

        /// Output kind
        #[arg(short, long, value_enum, default_value_t = Output::Text)]
        output: Output,

        /// Write the result to a file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,

        /// Page segmentation mode
        #[arg(long)]
        psm: Option<u8>,
    },

    /// List installed languages
    Langs,

    /// Show the engine version
    Version,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Output {
    Text,
    Bytes,
    Tsv,
    Hocr,
    Xml,
    Pdf,
    Boxes,
    /// TSV layout data as JSON
    Data,
}

impl Cli {
    /// Apply command-line overrides on top of file and environment settings
    pub fn apply(&self, config: &mut OcrConfig) {
        if let Some(cmd) = &self.tesseract {
            config.tesseract_cmd = Some(cmd.clone());
        }
        if let Some(secs) = self.timeout {
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Commands::Ocr { lang, psm, .. } = &self.command {
            if let Some(lang) = lang {
                config.language = Some(lang.clone());
            }
            if psm.is_some() {
                config.page_segmentation_mode = *psm;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ocr_command() {
        let cli = Cli::try_parse_from([
            "tesswrap", "ocr", "scan.png", "--lang", "eng+fra", "--output", "boxes",
        ])
        .unwrap();

        match cli.command {
            Commands::Ocr {
                image, lang, output, out, ..
            } => {
                assert_eq!(image, PathBuf::from("scan.png"));
                assert_eq!(lang.as_deref(), Some("eng+fra"));
                assert_eq!(output, Output::Boxes);
                assert!(out.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_default_output_is_text() {
        let cli = Cli::try_parse_from(["tesswrap", "ocr", "scan.png"]).unwrap();
        assert!(matches!(cli.command, Commands::Ocr { output: Output::Text, .. }));
    }

    #[test]
    fn test_unknown_output_is_rejected() {
        assert!(Cli::try_parse_from(["tesswrap", "ocr", "scan.png", "-o", "docx"]).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "tesswrap",
            "--tesseract",
            "/opt/bin/tesseract",
            "--timeout",
            "0",
            "ocr",
            "scan.png",
            "-l",
            "deu",
            "--psm",
            "7",
        ])
        .unwrap();

        let mut config = OcrConfig::default().with_language("eng");
        cli.apply(&mut config);

        assert_eq!(config.tesseract_cmd, Some(PathBuf::from("/opt/bin/tesseract")));
        assert_eq!(config.timeout, None);
        assert_eq!(config.language.as_deref(), Some("deu"));
        assert_eq!(config.page_segmentation_mode, Some(7));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["tesswrap", "langs", "--timeout", "3"]).unwrap();
        let mut config = OcrConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.timeout, Some(Duration::from_secs(3)));
        assert!(config.language.is_none());
    }
}
