use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One symbol from a box file. Coordinates have their origin at the bottom-left
/// corner of the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Usually one character, but ligatures and combining marks may span several
    pub symbol: String,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
    pub top: i32,
    pub page: u32,
}

impl BoundingBox {
    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.top - self.bottom
    }
}

/// String-keyed table of parallel columns, in header order.
///
/// Every column holds exactly [`TsvTable::len`] cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TsvTable {
    headers: Vec<String>,
    columns: Vec<Vec<String>>,
}

impl TsvTable {
    pub fn new(headers: Vec<String>) -> Self {
        let columns = vec![Vec::new(); headers.len()];
        Self { headers, columns }
    }

    /// Append a row, padding missing cells with empty strings and dropping
    /// cells past the last header.
    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut cells = cells.into_iter();
        for column in &mut self.columns {
            column.push(cells.next().map(Into::into).unwrap_or_default());
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column(&self, header: &str) -> Option<&[String]> {
        self.headers
            .iter()
            .position(|h| h == header)
            .map(|i| self.columns[i].as_slice())
    }

    /// Iterate `(header, column)` pairs in header order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.headers
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn row(&self, index: usize) -> Option<Vec<&str>> {
        if index >= self.len() {
            return None;
        }
        Some(self.columns.iter().map(|c| c[index].as_str()).collect())
    }

    /// Typed rows for tables carrying Tesseract's standard TSV header.
    ///
    /// Returns an empty list when a required column is missing. Rows with
    /// non-numeric fields are skipped.
    pub fn words(&self) -> Vec<TsvWord> {
        let Some(cols) = WordColumns::locate(self) else {
            return Vec::new();
        };
        (0..self.len()).filter_map(|i| cols.word(i)).collect()
    }
}

struct WordColumns<'a> {
    level: &'a [String],
    page_num: &'a [String],
    block_num: &'a [String],
    par_num: &'a [String],
    line_num: &'a [String],
    word_num: &'a [String],
    left: &'a [String],
    top: &'a [String],
    width: &'a [String],
    height: &'a [String],
    conf: &'a [String],
    text: &'a [String],
}

impl<'a> WordColumns<'a> {
    fn locate(table: &'a TsvTable) -> Option<Self> {
        Some(Self {
            level: table.column("level")?,
            page_num: table.column("page_num")?,
            block_num: table.column("block_num")?,
            par_num: table.column("par_num")?,
            line_num: table.column("line_num")?,
            word_num: table.column("word_num")?,
            left: table.column("left")?,
            top: table.column("top")?,
            width: table.column("width")?,
            height: table.column("height")?,
            conf: table.column("conf")?,
            text: table.column("text")?,
        })
    }

    fn word(&self, i: usize) -> Option<TsvWord> {
        Some(TsvWord {
            level: self.level[i].trim().parse().ok()?,
            page_num: self.page_num[i].trim().parse().ok()?,
            block_num: self.block_num[i].trim().parse().ok()?,
            par_num: self.par_num[i].trim().parse().ok()?,
            line_num: self.line_num[i].trim().parse().ok()?,
            word_num: self.word_num[i].trim().parse().ok()?,
            left: self.left[i].trim().parse().ok()?,
            top: self.top[i].trim().parse().ok()?,
            width: self.width[i].trim().parse().ok()?,
            height: self.height[i].trim().parse().ok()?,
            conf: self.conf[i].trim().parse().ok()?,
            text: self.text[i].clone(),
        })
    }
}

/// A row of Tesseract TSV output. Origin is the top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TsvWord {
    /// 1 page, 2 block, 3 paragraph, 4 line, 5 word
    pub level: u8,
    pub page_num: u32,
    pub block_num: u32,
    pub par_num: u32,
    pub line_num: u32,
    pub word_num: u32,
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
    /// -1 for non-word levels
    pub conf: f32,
    pub text: String,
}

impl TsvWord {
    pub fn is_word(&self) -> bool {
        self.level == 5
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    #[default]
    String,
    Bytes,
    Dict,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OcrOutput {
    Text(String),
    Bytes(Vec<u8>),
    Dict(TsvTable),
}

impl OcrOutput {
    pub fn output_type(&self) -> OutputType {
        match self {
            OcrOutput::Text(_) => OutputType::String,
            OcrOutput::Bytes(_) => OutputType::Bytes,
            OcrOutput::Dict(_) => OutputType::Dict,
        }
    }
}

/// File outputs the engine can generate next to the output base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Extension {
    Hocr,
    /// ALTO XML
    Xml,
    Tsv,
    Pdf,
}

impl Extension {
    pub const ALL: [Extension; 4] = [
        Extension::Hocr,
        Extension::Xml,
        Extension::Tsv,
        Extension::Pdf,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Extension::Hocr => "hocr",
            Extension::Xml => "xml",
            Extension::Tsv => "tsv",
            Extension::Pdf => "pdf",
        }
    }

    /// `-c` variable that makes the engine write this file
    pub fn config_variable(&self) -> &'static str {
        match self {
            Extension::Hocr => "tessedit_create_hocr=1",
            Extension::Xml => "tessedit_create_alto=1",
            Extension::Tsv => "tessedit_create_tsv=1",
            Extension::Pdf => "tessedit_create_pdf=1",
        }
    }

    pub fn min_version(&self) -> EngineVersion {
        match self {
            Extension::Xml => EngineVersion::new(4, 1, 0),
            Extension::Hocr | Extension::Tsv | Extension::Pdf => EngineVersion::new(3, 5, 0),
        }
    }

    pub fn is_text(&self) -> bool {
        !matches!(self, Extension::Pdf)
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported output extension: {0}")]
pub struct UnknownExtension(pub String);

impl FromStr for Extension {
    type Err = UnknownExtension;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().trim_start_matches('.').to_ascii_lowercase();
        Extension::ALL
            .into_iter()
            .find(|ext| ext.as_str() == lower)
            .ok_or_else(|| UnknownExtension(s.to_string()))
    }
}

/// Engine version as reported by `tesseract --version`.
///
/// `3.05` is stored as minor `5` and displayed as `3.5.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EngineVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl EngineVersion {
    pub const MINIMUM: EngineVersion = EngineVersion::new(3, 5, 0);

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Image formats the engine can read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Pbm,
    Pgm,
    Ppm,
    Tiff,
    Bmp,
    Gif,
    Webp,
}

impl ImageFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        let format = match ext.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => ImageFormat::Jpeg,
            "png" => ImageFormat::Png,
            "pbm" => ImageFormat::Pbm,
            "pgm" => ImageFormat::Pgm,
            "ppm" => ImageFormat::Ppm,
            "tiff" | "tif" => ImageFormat::Tiff,
            "bmp" => ImageFormat::Bmp,
            "gif" => ImageFormat::Gif,
            "webp" => ImageFormat::Webp,
            _ => return None,
        };
        Some(format)
    }

    /// Extension used when staging a buffer of this format
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
            ImageFormat::Pbm => "pbm",
            ImageFormat::Pgm => "pgm",
            ImageFormat::Ppm => "ppm",
            ImageFormat::Tiff => "tif",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Gif => "gif",
            ImageFormat::Webp => "webp",
        }
    }
}
