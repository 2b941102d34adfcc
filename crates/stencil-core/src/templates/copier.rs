//! Template file copying and project file enumeration

use super::ignore::{is_hidden, IgnoreSet};
use crate::error::{Result, ScaffoldError};
use std::path::{Path, PathBuf};
use tokio::fs;
use walkdir::WalkDir;

/// Recursively copy `source` into `target`, overwriting existing files
///
/// Both directories are created if missing. Returns the copied paths relative
/// to `target`.
pub async fn copy_template(source: &Path, target: &Path) -> Result<Vec<String>> {
    for dir in [source, target] {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| ScaffoldError::io(format!("creating {}", dir.display()), e))?;
    }

    let mut copied_files = Vec::new();

    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry.map_err(|e| {
            ScaffoldError::io(
                format!("reading {}", source.display()),
                std::io::Error::other(e),
            )
        })?;
        let relative = entry
            .path()
            .strip_prefix(source)
            .unwrap_or(entry.path())
            .to_path_buf();
        let target_path = target.join(&relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target_path).await.map_err(|e| {
                ScaffoldError::io(format!("creating {}", target_path.display()), e)
            })?;
            continue;
        }

        // Ensure parent directories exist
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| ScaffoldError::io(format!("creating {}", parent.display()), e))?;
        }

        fs::copy(entry.path(), &target_path).await.map_err(|e| {
            ScaffoldError::io(format!("copying to {}", target_path.display()), e)
        })?;
        copied_files.push(relative_string(&relative));
    }

    Ok(copied_files)
}

/// Files under `root` eligible for rendering
///
/// Skips hidden paths and anything matching `ignores`. Ignored directories are
/// not descended into.
pub fn renderable_files(root: &Path, ignores: &IgnoreSet) -> Result<Vec<PathBuf>> {
    let walker = WalkDir::new(root).min_depth(1).into_iter().filter_entry(|entry| {
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let relative = relative_string(relative);
        !is_hidden(&relative) && !ignores.is_ignored(&relative)
    });

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| {
            ScaffoldError::io(
                format!("reading {}", root.display()),
                std::io::Error::other(e),
            )
        })?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn relative_string(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_copy_merges_and_overwrites() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("template");
        let target = temp.path().join("project");
        std_fs::create_dir_all(source.join("src")).unwrap();
        std_fs::create_dir_all(&target).unwrap();
        std_fs::write(source.join("package.json"), "{\"name\": \"<%= name %>\"}").unwrap();
        std_fs::write(source.join("src/main.js"), "console.log(1)").unwrap();
        std_fs::write(target.join("package.json"), "old").unwrap();
        std_fs::write(target.join("keep.txt"), "mine").unwrap();

        let mut copied = copy_template(&source, &target).await.unwrap();
        copied.sort();

        assert_eq!(copied, vec!["package.json", "src/main.js"]);
        assert_eq!(
            std_fs::read_to_string(target.join("package.json")).unwrap(),
            "{\"name\": \"<%= name %>\"}"
        );
        assert_eq!(std_fs::read_to_string(target.join("keep.txt")).unwrap(), "mine");
    }

    #[tokio::test]
    async fn test_copy_creates_missing_directories() {
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("pkg/template");
        let target = temp.path().join("new/project");

        let copied = copy_template(&source, &target).await.unwrap();

        assert!(copied.is_empty());
        assert!(source.is_dir());
        assert!(target.is_dir());
    }

    #[test]
    fn test_renderable_files_skip_ignored_and_hidden() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        for dir in ["src", "public", "node_modules/dep", ".git"] {
            std_fs::create_dir_all(root.join(dir)).unwrap();
        }
        for file in [
            "package.json",
            "src/main.js",
            "public/index.html",
            "node_modules/dep/index.js",
            ".git/HEAD",
            ".env",
        ] {
            std_fs::write(root.join(file), "x").unwrap();
        }

        let ignores = IgnoreSet::with_defaults(&["public/**"]);
        let mut files: Vec<String> = renderable_files(root, &ignores)
            .unwrap()
            .iter()
            .map(|p| relative_string(p.strip_prefix(root).unwrap()))
            .collect();
        files.sort();

        assert_eq!(files, vec!["package.json", "src/main.js"]);
    }
}
