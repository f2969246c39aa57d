//! Where post records come from

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::ledger::{self, LedgerEntry};

/// The record source for one listing call.
///
/// A ledger with at least one section is authoritative; otherwise the posts
/// directory is scanned for markdown files.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentSource {
    Ledger(Vec<LedgerEntry>),
    DirectoryScan(Vec<PathBuf>),
}

impl ContentSource {
    /// Decide the source once, creating the ledger stub if it is missing
    pub fn resolve(ledger_path: &Path, posts_dir: &Path) -> Self {
        let entries = read_ledger(ledger_path);
        if !entries.is_empty() {
            tracing::debug!(
                "Using metadata ledger {:?} ({} entries)",
                ledger_path,
                entries.len()
            );
            return ContentSource::Ledger(entries);
        }

        let files = scan_directory(posts_dir);
        tracing::debug!(
            "Ledger empty, scanned {:?} ({} markdown files)",
            posts_dir,
            files.len()
        );
        ContentSource::DirectoryScan(files)
    }

    /// Number of records this source will yield
    pub fn len(&self) -> usize {
        match self {
            ContentSource::Ledger(entries) => entries.len(),
            ContentSource::DirectoryScan(files) => files.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Ledger entries, or none if the ledger cannot be read or created
pub fn read_ledger(ledger_path: &Path) -> Vec<LedgerEntry> {
    match ledger::load_or_init(ledger_path) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!("Could not read metadata ledger {:?}: {}", ledger_path, e);
            Vec::new()
        }
    }
}

/// Markdown files directly inside `posts_dir`, sorted by file name
pub fn scan_directory(posts_dir: &Path) -> Vec<PathBuf> {
    if !posts_dir.is_dir() {
        return Vec::new();
    }

    let mut files: Vec<PathBuf> = WalkDir::new(posts_dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|e| e.into_path())
        .filter(|path| path.is_file() && is_markdown_file(path))
        .collect();
    files.sort();
    files
}

/// Check if a file is a markdown file
pub fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("md") || e.eq_ignore_ascii_case("markdown"))
        .unwrap_or(false)
}

/// Slug of a directory-scanned post: its file name without extension
pub fn file_slug(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_scan_directory_filters_extensions() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.md"), "b").unwrap();
        fs::write(dir.path().join("a.markdown"), "a").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(dir.path().join("images")).unwrap();
        fs::write(dir.path().join("images").join("nested.md"), "n").unwrap();

        let files = scan_directory(dir.path());
        let names: Vec<_> = files.iter().filter_map(|p| file_slug(p)).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_missing_posts_dir_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scan_directory(&dir.path().join("missing")).is_empty());
    }

    #[test]
    fn test_resolve_prefers_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = dir.path().join("metadata.md");
        let posts = dir.path().join("posts");
        fs::create_dir(&posts).unwrap();
        fs::write(posts.join("scan.md"), "---\ntitle: Scan\n---\n").unwrap();

        // Missing ledger: stub is written and the directory is used
        let source = ContentSource::resolve(&ledger, &posts);
        assert!(matches!(source, ContentSource::DirectoryScan(ref f) if f.len() == 1));
        assert!(ledger.exists());

        fs::write(&ledger, "### From Ledger\n- Title- From Ledger\n").unwrap();
        let source = ContentSource::resolve(&ledger, &posts);
        assert!(matches!(source, ContentSource::Ledger(ref e) if e.len() == 1));
    }
}
