//! Notes folder listing and display-name derivation.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::errors::note_index_error::NoteIndexError;
use crate::structs::note_entry::NoteEntry;

/// Lists files in `folder` (non-recursive) whose name ends with `.{extension}`,
/// case-insensitively, sorted by filename.
///
/// A missing folder yields an empty list and a warning, not an error.
pub fn scan_notes_folder(folder: &Path, extension: &str) -> Result<Vec<NoteEntry>, NoteIndexError> {
    if !folder.is_dir() {
        warn!(
            target: "note_index::scan",
            folder = %folder.display(),
            "notes folder does not exist; starting with an empty index"
        );
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let entry = entry?;
        let Ok(filename) = entry.file_name().into_string() else {
            debug!(target: "note_index::scan", "skipping non UTF-8 file name");
            continue;
        };
        if strip_extension(&filename, extension).is_none() {
            continue;
        }
        if !entry.path().is_file() {
            continue;
        }
        let display_name = display_name(&filename, extension);
        out.push(NoteEntry {
            filename,
            display_name,
        });
    }

    out.sort_by(|a, b| a.filename.cmp(&b.filename));

    if out.is_empty() {
        info!(
            target: "note_index::scan",
            folder = %folder.display(),
            extension,
            "no matching files in notes folder"
        );
    }

    Ok(out)
}

/// `Linear_Algebra_Notes.pdf` → `Linear Algebra Notes`.
pub fn display_name(filename: &str, extension: &str) -> String {
    strip_extension(filename, extension)
        .unwrap_or(filename)
        .replace('_', " ")
}

/// Returns the stem when `filename` ends with `.{extension}` (ASCII case-insensitive).
fn strip_extension<'a>(filename: &'a str, extension: &str) -> Option<&'a str> {
    let suffix_len = extension.len() + 1;
    if filename.len() < suffix_len {
        return None;
    }
    let split = filename.len() - suffix_len;
    if !filename.is_char_boundary(split) {
        return None;
    }
    let (stem, suffix) = filename.split_at(split);
    let ext = suffix.strip_prefix('.')?;
    ext.eq_ignore_ascii_case(extension).then_some(stem)
}
