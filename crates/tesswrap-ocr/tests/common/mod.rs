//! Scripted stand-in for the tesseract executable.
//!
//! Behaviour is keyed on the `-l` language:
//! `slow` sleeps, `fail` exits non-zero, `empty` writes empty output files.
//! Any other language recognises "Hello world [lang=<lang>]".

#![allow(dead_code)]

use std::fs;
use std::io::Cursor;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use image::DynamicImage;
use tempfile::TempDir;
use tesswrap_ocr::{OcrConfig, OcrInput};

const SCRIPT: &str = r#"#!/bin/sh
case "$1" in
  --version)
    __VERSION__
    exit 0
    ;;
  --list-langs)
    echo 'List of available languages in "/fake/tessdata/" (5):'
    printf 'eng\nfra\nslow\nfail\nempty\n'
    exit 0
    ;;
esac

image="$1"
out="$2"
shift 2
lang=""
ext=""
boxes=0
tsv=0
while [ $# -gt 0 ]; do
  case "$1" in
    -l) lang="$2"; shift ;;
    --psm|--oem) shift ;;
    -c)
      case "$2" in
        tessedit_create_hocr=1) ext=hocr ;;
        tessedit_create_alto=1) ext=xml ;;
        tessedit_create_tsv=1) ext=tsv ;;
        tessedit_create_pdf=1) ext=pdf ;;
        tessedit_create_boxfile=1) boxes=1 ;;
      esac
      shift
      ;;
    tsv) tsv=1 ;;
  esac
  shift
done

if [ ! -f "$image" ]; then
  echo "Error, cannot read input file $image" >&2
  exit 1
fi

case "$lang" in
  slow) exec sleep 10 ;;
  fail) echo "Failed loading language 'fail'" >&2; exit 1 ;;
esac

text="Hello world [lang=$lang]"

if [ "$boxes" = 1 ]; then
  if [ "$lang" = empty ]; then : > "$out.box"; exit 0; fi
  printf 'H 10 20 30 40 0\ne 31 20 40 36 0\nmalformed line\n' > "$out.box"
  exit 0
fi

if [ -n "$ext" ]; then
  if [ "$lang" = empty ]; then : > "$out.$ext"; exit 0; fi
  case "$ext" in
    hocr) printf '<div class="ocr_page">%s</div>\n' "$text" > "$out.hocr" ;;
    xml) printf '<alto><String CONTENT="Hello"/></alto>\n' > "$out.xml" ;;
    tsv) printf 'level\ttext\n5\tHello\n' > "$out.tsv" ;;
    pdf) printf '%%PDF-1.5\n%s\n%%%%EOF\n' "$text" > "$out.pdf" ;;
  esac
  exit 0
fi

if [ "$out" = stdout ]; then
  if [ "$tsv" = 1 ]; then
    printf 'level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext\n'
    printf '1\t1\t0\t0\t0\t0\t0\t0\t8\t8\t-1\t\n'
    printf '5\t1\t1\t1\t1\t1\t1\t2\t3\t4\t91.5\tHello\n'
    printf '5\t1\t1\t1\t1\t2\t5\t2\t3\t4\t88\tworld\n'
  else
    echo "$text"
  fi
else
  echo "$text" > "$out.txt"
fi
exit 0
"#;

struct Fakes {
    _dir: TempDir,
    current: PathBuf,
    legacy: PathBuf,
    pre_alto: PathBuf,
}

fn fakes() -> &'static Fakes {
    static FAKES: OnceLock<Fakes> = OnceLock::new();
    FAKES.get_or_init(|| {
        let dir = tempfile::tempdir().expect("create fake tesseract dir");
        let current = write_script(
            dir.path(),
            "tesseract",
            "echo 'tesseract 5.3.0'; echo ' leptonica-1.82.0'",
        );
        let legacy = write_script(dir.path(), "tesseract-3.02", "echo 'tesseract 3.02.02' >&2");
        let pre_alto = write_script(dir.path(), "tesseract-4.0", "echo 'tesseract v4.0.0'");
        Fakes {
            _dir: dir,
            current,
            legacy,
            pre_alto,
        }
    })
}

fn write_script(dir: &Path, name: &str, version: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, SCRIPT.replace("__VERSION__", version)).expect("write fake tesseract");
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).expect("chmod fake tesseract");
    path
}

/// Fake reporting tesseract 5.3.0
pub fn fake_tesseract() -> &'static Path {
    &fakes().current
}

/// Fake reporting 3.02 on stderr, below the supported floor
pub fn legacy_tesseract() -> &'static Path {
    &fakes().legacy
}

/// Fake reporting 4.0.0, too old for ALTO output
pub fn pre_alto_tesseract() -> &'static Path {
    &fakes().pre_alto
}

pub fn config() -> OcrConfig {
    OcrConfig::default().with_tesseract_cmd(fake_tesseract())
}

pub fn sample_image() -> OcrInput {
    OcrInput::Image(DynamicImage::new_luma8(8, 8))
}

pub fn sample_png() -> OcrInput {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::new_luma8(8, 8)
        .write_to(&mut buffer, image::ImageFormat::Png)
        .expect("encode sample png");
    OcrInput::Encoded(buffer.into_inner())
}
