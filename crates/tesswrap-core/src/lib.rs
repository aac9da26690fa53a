pub mod boxes;
pub mod error;
pub mod language;
pub mod tsv;
pub mod version;

pub use boxes::parse_boxes;
pub use error::{Error, Result};
pub use language::{missing_language, parse_languages, split_languages};
pub use tsv::parse_tsv;
pub use version::{ensure_version, parse_version};
