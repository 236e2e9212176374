//! Startup File
//!
//! Decides which file a surface should open when the workspace loads: the
//! provisioned file when it exists, otherwise the default readme. The
//! decision rides an `openFile` message; opening the editor is the surface's
//! job.

use log::{info, warn};
use std::path::{Path, PathBuf};

/// What a surface should open on startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupAction {
    pub path: PathBuf,
    /// Render as markdown preview instead of raw text
    pub markdown_preview: bool,
}

/// Default file opened when the config does not name one.
fn default_readme() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/home/ubuntu"))
        .join("readme.md")
}

/// Resolve the startup file decision against the filesystem.
pub fn resolve_startup_file(configured: Option<&Path>) -> Option<StartupAction> {
    resolve_with_default(configured, &default_readme())
}

fn resolve_with_default(configured: Option<&Path>, readme: &Path) -> Option<StartupAction> {
    match configured {
        Some(path) => {
            if path.exists() {
                info!("Opening provided startup file: {}", path.display());
                Some(StartupAction {
                    path: path.to_path_buf(),
                    markdown_preview: is_markdown(path),
                })
            } else {
                warn!("The startup file provided does not exist: {}", path.display());
                None
            }
        }
        None => {
            if readme.exists() {
                info!("Opening default readme file");
                Some(StartupAction {
                    path: readme.to_path_buf(),
                    // The default readme is always previewed
                    markdown_preview: true,
                })
            } else {
                None
            }
        }
    }
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provided_markdown_file_previews() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guide.md");
        std::fs::write(&path, "# hello").unwrap();

        let action = resolve_with_default(Some(&path), &dir.path().join("readme.md")).unwrap();
        assert_eq!(action.path, path);
        assert!(action.markdown_preview);
    }

    #[test]
    fn test_provided_plain_file_opens_raw() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "plain").unwrap();

        let action = resolve_with_default(Some(&path), &dir.path().join("readme.md")).unwrap();
        assert!(!action.markdown_preview);
    }

    #[test]
    fn test_missing_provided_file_opens_nothing() {
        let dir = tempfile::tempdir().unwrap();
        // Even with a readme present, a bad explicit path opens nothing.
        let readme = dir.path().join("readme.md");
        std::fs::write(&readme, "# readme").unwrap();

        let absent = dir.path().join("absent.md");
        assert!(resolve_with_default(Some(&absent), &readme).is_none());
    }

    #[test]
    fn test_default_readme_used_when_unconfigured() {
        let dir = tempfile::tempdir().unwrap();
        let readme = dir.path().join("readme.md");
        std::fs::write(&readme, "# readme").unwrap();

        let action = resolve_with_default(None, &readme).unwrap();
        assert_eq!(action.path, readme);
        assert!(action.markdown_preview);
    }

    #[test]
    fn test_nothing_to_open() {
        let dir = tempfile::tempdir().unwrap();
        assert!(resolve_with_default(None, &dir.path().join("readme.md")).is_none());
    }

    #[test]
    fn test_markdown_detection_is_case_insensitive() {
        assert!(is_markdown(Path::new("README.MD")));
        assert!(is_markdown(Path::new("a/b/c.md")));
        assert!(!is_markdown(Path::new("script.sh")));
        assert!(!is_markdown(Path::new("no_extension")));
    }
}
