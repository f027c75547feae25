//! Finding artifacts in a decrypted store.
//!
//! Artifacts live at `<kind dir>/<sub-type>/<name>.<ext>`. Listings are in
//! glob order (sorted by file name) and the last entry counts as the most
//! recent one.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::domain::ArtifactKind;

/// Directory holding artifacts of `kind` and `subtype`.
pub fn directory(root: &Path, kind: ArtifactKind, subtype: &str) -> PathBuf {
    root.join(kind.dir()).join(subtype)
}

/// All artifacts of `kind` and `subtype`, optionally restricted to one file
/// stem. Never fails: a missing or unreadable directory is an empty result.
pub fn find(root: &Path, kind: ArtifactKind, subtype: &str, name: Option<&str>) -> Vec<PathBuf> {
    let dir = directory(root, kind, subtype);
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut found: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some(kind.extension()))
        .filter(|path| match name {
            Some(stem) => path.file_stem().and_then(|s| s.to_str()) == Some(stem),
            None => true,
        })
        .collect();
    found.sort();

    debug!(dir = %dir.display(), count = found.len(), "located artifacts");
    found
}

/// The most recent artifact of `kind` and `subtype`, if any.
pub fn latest(root: &Path, kind: ArtifactKind, subtype: &str, name: Option<&str>) -> Option<PathBuf> {
    find(root, kind, subtype, name).pop()
}

/// File stem of an artifact, used as the certificate identifier.
pub fn identifier(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(find(tmp.path(), ArtifactKind::Certificate, "distribution", None).is_empty());
        assert!(latest(tmp.path(), ArtifactKind::Certificate, "distribution", None).is_none());
    }

    #[test]
    fn test_filters_by_extension_and_subtype() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "certs/distribution/AAA.cer");
        touch(tmp.path(), "certs/distribution/AAA.p12");
        touch(tmp.path(), "certs/development/BBB.cer");

        let certs = find(tmp.path(), ArtifactKind::Certificate, "distribution", None);
        assert_eq!(certs.len(), 1);
        assert!(certs[0].ends_with("certs/distribution/AAA.cer"));

        let keys = find(tmp.path(), ArtifactKind::PrivateKey, "distribution", None);
        assert_eq!(keys.len(), 1);
        assert!(keys[0].ends_with("AAA.p12"));
    }

    #[test]
    fn test_last_listed_wins() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "certs/distribution/AAA.cer");
        touch(tmp.path(), "certs/distribution/CCC.cer");
        touch(tmp.path(), "certs/distribution/BBB.cer");

        let newest = latest(tmp.path(), ArtifactKind::Certificate, "distribution", None).unwrap();
        assert_eq!(identifier(&newest).as_deref(), Some("CCC"));
    }

    #[test]
    fn test_name_filter() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "profiles/appstore/AppStore_tools.fastlane.app.mobileprovision");
        touch(tmp.path(), "profiles/appstore/AppStore_other.app.mobileprovision");

        let found = find(
            tmp.path(),
            ArtifactKind::Profile,
            "appstore",
            Some("AppStore_tools.fastlane.app"),
        );
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("AppStore_tools.fastlane.app.mobileprovision"));
    }
}
