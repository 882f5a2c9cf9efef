use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::{DirEntry, WalkDir};

use super::SourceRegistry;
use crate::error::Result;

const IGNORED_DIRS: &[&str] = &["target", "node_modules", "build", "dist", "__pycache__"];

fn is_ignored(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || (entry.file_type().is_dir() && IGNORED_DIRS.contains(&name.as_ref()))
}

/// Collect the documents under `root` that a registered source can read.
///
/// A file path is returned as-is. Hidden entries and build output
/// directories are skipped. Results are sorted by path.
pub fn discover_documents(root: &Path, registry: &SourceRegistry) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let mut documents = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !is_ignored(e))
    {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }

        if registry.supports(entry.path()) {
            documents.push(entry.into_path());
        } else {
            warn!(path = %entry.path().display(), "skipping unsupported file");
        }
    }

    documents.sort();
    info!(root = %root.display(), documents = documents.len(), "discovered documents");
    Ok(documents)
}
