pub mod types;

pub use types::{
    BoundingBox, EngineVersion, Extension, ImageFormat, OcrOutput, OutputType, TsvTable, TsvWord,
    UnknownExtension,
};
