//! Ultralytics-style YOLO label writer.
//!
//! Each image gets `labels/<stem>.txt` with one
//! `<class> <cx> <cy> <w> <h>` row per object, coordinates normalized to the
//! image size and printed with 6 decimal places. Images without objects get
//! no file at all; YOLO trainers read a missing label file as "no objects".

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::Builder;
use tracing::{debug, info};

use super::{BBoxCxCyWh, Normalized};
use crate::error::ConvertError;

pub const IMAGES_DIR: &str = "images";
pub const LABELS_DIR: &str = "labels";
pub const LABEL_EXTENSION: &str = "txt";

/// Label cache written by Ultralytics next to the split; it goes stale as
/// soon as any label file changes.
pub const CACHE_FILE_NAME: &str = "labels.cache";

/// One row of a YOLO label file.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelLine {
    pub class_index: usize,
    pub bbox: BBoxCxCyWh<Normalized>,
}

impl LabelLine {
    pub fn new(class_index: usize, bbox: BBoxCxCyWh<Normalized>) -> Self {
        Self { class_index, bbox }
    }
}

impl fmt::Display for LabelLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:.6} {:.6} {:.6} {:.6}",
            self.class_index, self.bbox.cx, self.bbox.cy, self.bbox.w, self.bbox.h
        )
    }
}

/// Label rows grouped by image stem, each group in insertion order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LabelSet {
    by_stem: BTreeMap<String, Vec<LabelLine>>,
}

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row to the label file for `stem`.
    pub fn push(&mut self, stem: &str, line: LabelLine) {
        match self.by_stem.get_mut(stem) {
            Some(lines) => lines.push(line),
            None => {
                self.by_stem.insert(stem.to_string(), vec![line]);
            }
        }
    }

    /// Rows for one stem, if any were pushed.
    pub fn lines(&self, stem: &str) -> Option<&[LabelLine]> {
        self.by_stem.get(stem).map(Vec::as_slice)
    }

    /// Iterates `(stem, rows)` in stem order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[LabelLine])> {
        self.by_stem
            .iter()
            .map(|(stem, lines)| (stem.as_str(), lines.as_slice()))
    }

    /// Number of label files this set produces.
    pub fn file_count(&self) -> usize {
        self.by_stem.len()
    }

    /// Total number of rows across all files.
    pub fn line_count(&self) -> usize {
        self.by_stem.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_stem.is_empty()
    }
}

/// Renders rows as label file content: every row newline-terminated.
pub fn render_label_file(lines: &[LabelLine]) -> String {
    let mut content = String::with_capacity(lines.len() * 48);
    for line in lines {
        content.push_str(&line.to_string());
        content.push('\n');
    }
    content
}

/// Writes one label file per stem into `labels_dir`, creating the directory
/// if needed. Returns the number of files written.
///
/// Each file is written to a temporary file in `labels_dir` first and then
/// renamed over the destination, so readers never observe a partial file.
pub fn write_label_files(labels_dir: &Path, labels: &LabelSet) -> Result<usize, ConvertError> {
    fs::create_dir_all(labels_dir).map_err(ConvertError::file_op("create", labels_dir))?;

    let mut written = 0;
    for (stem, lines) in labels.iter() {
        let path = labels_dir.join(format!("{stem}.{LABEL_EXTENSION}"));
        write_atomic(labels_dir, &path, render_label_file(lines).as_bytes())?;
        debug!(path = %path.display(), rows = lines.len(), "wrote label file");
        written += 1;
    }

    Ok(written)
}

fn write_atomic(dir: &Path, path: &Path, content: &[u8]) -> Result<(), ConvertError> {
    #[allow(unused_mut)]
    let mut builder = Builder::new();
    // Temp files default to 0600; label files must be readable like any
    // `fs::write` output. The process umask still applies.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }

    let mut tmp = builder
        .tempfile_in(dir)
        .map_err(ConvertError::file_op("create temp file in", dir))?;
    tmp.write_all(content).map_err(ConvertError::file_op("write", path))?;
    tmp.persist(path)
        .map_err(|err| ConvertError::file_op("replace", path)(err.error))?;
    Ok(())
}

/// Deletes `<split_dir>/labels.cache`. Returns whether a file was removed.
pub fn remove_stale_cache(split_dir: &Path) -> Result<bool, ConvertError> {
    let path = split_dir.join(CACHE_FILE_NAME);
    match fs::remove_file(&path) {
        Ok(()) => {
            info!(path = %path.display(), "removed stale label cache");
            Ok(true)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(err) => Err(ConvertError::file_op("remove", path)(err)),
    }
}

/// Parses one row of a label file. Blank lines yield `Ok(None)`.
///
/// Used to read back what [`write_label_files`] produced.
pub fn parse_label_line(line: &str) -> Result<Option<LabelLine>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    // Take at most 6 tokens so pathological inputs do not allocate unbounded memory.
    let tokens: Vec<&str> = trimmed.split_whitespace().take(6).collect();
    if tokens.len() != 5 {
        return Err(format!("expected 5 tokens, found {}", tokens.len()));
    }

    let class_index = tokens[0]
        .parse::<usize>()
        .map_err(|_| format!("invalid class index '{}'", tokens[0]))?;

    let mut values = [0.0; 4];
    for (slot, (raw, name)) in values
        .iter_mut()
        .zip(tokens[1..].iter().zip(["x_center", "y_center", "width", "height"]))
    {
        *slot = raw
            .parse::<f64>()
            .map_err(|_| format!("invalid {name} '{raw}'"))?;
    }

    let [cx, cy, w, h] = values;
    Ok(Some(LabelLine::new(class_index, BBoxCxCyWh::new(cx, cy, w, h))))
}
