//! Split directory layout normalization.
//!
//! YOLO trainers expect `<split>/images/` next to `<split>/labels/`. Exports
//! that drop image files directly into the split root are fixed up here by
//! moving them into a freshly created `images/` directory.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::ConvertError;
use crate::ir::io_yolo::IMAGES_DIR;

/// Extensions treated as images when relocating loose files. Matching is
/// ASCII case-insensitive.
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// What [`ensure_images_dir`] did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutOutcome {
    pub images_dir: PathBuf,
    /// True if `images/` did not exist and was created.
    pub created: bool,
    /// Number of files moved into `images/`.
    pub moved: usize,
}

/// Makes sure `<split_dir>/images/` exists.
///
/// If it already exists nothing is touched. Otherwise it is created and every
/// image file sitting directly in `split_dir` is moved into it; files in
/// subdirectories are left alone.
pub fn ensure_images_dir(split_dir: &Path) -> Result<LayoutOutcome, ConvertError> {
    let images_dir = split_dir.join(IMAGES_DIR);
    if images_dir.is_dir() {
        return Ok(LayoutOutcome {
            images_dir,
            created: false,
            moved: 0,
        });
    }

    let loose = collect_loose_images(split_dir)?;
    fs::create_dir_all(&images_dir).map_err(ConvertError::file_op("create", &images_dir))?;

    let mut moved = 0;
    for source in loose {
        let Some(file_name) = source.file_name() else {
            continue;
        };
        let target = images_dir.join(file_name);
        fs::rename(&source, &target).map_err(ConvertError::file_op("move", &source))?;
        debug!(from = %source.display(), to = %target.display(), "moved image");
        moved += 1;
    }

    if moved > 0 {
        info!(count = moved, dir = %images_dir.display(), "moved loose images");
    }

    Ok(LayoutOutcome {
        images_dir,
        created: true,
        moved,
    })
}

fn collect_loose_images(split_dir: &Path) -> Result<Vec<PathBuf>, ConvertError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(split_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| ConvertError::FileOp {
            action: "list",
            path: split_dir.to_path_buf(),
            source: err.into(),
        })?;

        if entry.file_type().is_file() && is_image_file(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Returns true if `path` has one of [`IMAGE_EXTENSIONS`], in any case.
pub fn is_image_file(path: &Path) -> bool {
    let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
        return false;
    };

    IMAGE_EXTENSIONS
        .iter()
        .any(|allowed| ext.eq_ignore_ascii_case(allowed))
}
