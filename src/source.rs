//! Reading manifests from the filesystem.
//!
//! A path may name a single file or a directory. Directory entries are read in
//! file-name order, descending into subdirectories only when asked to, and
//! only `.yaml`, `.yml` and `.json` files are considered.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::manifest::{Manifest, YamlDecoder};

const MANIFEST_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Loads one file, or every manifest file below a directory.
pub fn load_path(path: &Path, recursive: bool) -> Result<Manifest> {
    let files = manifest_files(path, recursive)?;
    let mut resources = Vec::new();
    for file in &files {
        resources.extend(load_file(file)?);
    }
    let manifest = Manifest::from_resources(resources);
    info!(
        path = %path.display(),
        files = files.len(),
        resources = manifest.len(),
        "loaded manifest"
    );
    Ok(manifest)
}

/// Loads several paths and concatenates them in the order given.
pub fn load_paths<P: AsRef<Path>>(paths: &[P], recursive: bool) -> Result<Manifest> {
    let mut resources = Vec::new();
    for path in paths {
        resources.extend(load_path(path.as_ref(), recursive)?);
    }
    Ok(Manifest::from_resources(resources))
}

/// Loads a single file. JSON files are read with the YAML decoder, which
/// accepts them as well.
pub fn load_file(path: &Path) -> Result<Manifest> {
    let text = fs::read_to_string(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    let manifest = Manifest::from_str_with(&text, &YamlDecoder).map_err(|source| {
        Error::DecodeFile {
            path: path.to_path_buf(),
            source,
        }
    })?;
    debug!(path = %path.display(), resources = manifest.len(), "read manifest file");
    Ok(manifest)
}

/// Lists the manifest files `path` stands for, in load order.
pub fn manifest_files(path: &Path, recursive: bool) -> Result<Vec<PathBuf>> {
    let metadata = fs::metadata(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    if !metadata.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();
    for entry in WalkDir::new(path)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
    {
        let entry = entry?;
        if entry.file_type().is_file() && has_manifest_extension(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn has_manifest_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| MANIFEST_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
}
