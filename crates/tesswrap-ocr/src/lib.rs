mod args;
mod client;
mod input;
mod process;

pub use args::{Invocation, OutputBase};
pub use client::Client;
pub use input::OcrInput;
pub use process::{DEFAULT_COMMAND, resolve_program};
pub use tesswrap_config::OcrConfig;
pub use tesswrap_core::{Error, Result};
pub use tesswrap_types::{
    BoundingBox, EngineVersion, Extension, OcrOutput, OutputType, TsvTable, TsvWord,
};
pub use tokio_util::sync::CancellationToken;
