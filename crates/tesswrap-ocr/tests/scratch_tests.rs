//! Scratch directory cleanup. Kept in its own binary because it redirects
//! `TMPDIR` for the whole process.
#![cfg(unix)]

mod common;

use std::path::Path;
use std::time::Duration;

use common::{config, fake_tesseract, sample_image};
use tesswrap_ocr::{Client, Error, Extension};

fn scratch_dirs(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("tesseract_"))
        .collect()
}

#[tokio::test]
async fn test_scratch_dirs_removed_on_every_exit() {
    // Write the fake engine before redirecting the temp dir
    fake_tesseract();
    let tmp = tempfile::tempdir().unwrap();
    // SAFETY: the only test in this binary, and the runtime is single threaded
    unsafe { std::env::set_var("TMPDIR", tmp.path()) };

    let client = Client::new(config().with_timeout(Some(Duration::from_millis(300))))
        .await
        .unwrap();
    let input = sample_image();

    let text = client.image_to_string(&input, Some("eng")).await.unwrap();
    assert_eq!(text.trim(), "Hello world [lang=eng]");
    assert!(!client.image_to_boxes(&input, Some("eng")).await.unwrap().is_empty());

    let err = client
        .image_to_string(&input, Some("slow"))
        .await
        .unwrap_err();
    assert!(err.is_timeout(), "unexpected error: {err}");

    let err = client
        .image_to_string(&input, Some("fail"))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Process { .. }), "unexpected error: {err}");

    let err = client
        .image_to_extension(&input, Some("empty"), Extension::Hocr)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::EmptyOutput), "unexpected error: {err}");

    assert_eq!(scratch_dirs(tmp.path()), Vec::<String>::new());
}
