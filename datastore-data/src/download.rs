//! Download helpers for the remote datasets.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use datastore_core::DatastoreError;
use log::{debug, info};
use tempfile::NamedTempFile;

/// Expands a leading `~` to the current user's home directory.
pub fn expand_user<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

/// Creates `dir` and its parents, succeeding if it already exists.
pub fn makedir_exist_ok<P: AsRef<Path>>(dir: P) -> Result<(), DatastoreError> {
    fs::create_dir_all(dir.as_ref())?;
    Ok(())
}

/// Returns the last path segment of `url`.
pub fn file_name_from_url(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Downloads `url` into `root/file_name`.
///
/// A file already present at the destination is kept and no request is
/// made. A failed request or a non-success status is returned as
/// `DatastoreError::Transport`; nothing is retried.
pub fn download_url<P: AsRef<Path>>(
    url: &str,
    root: P,
    file_name: &str,
) -> Result<PathBuf, DatastoreError> {
    let path = root.as_ref().join(file_name);
    if path.exists() {
        debug!("Using downloaded file {:?}", path);
        return Ok(path);
    }
    makedir_exist_ok(root.as_ref())?;

    info!("Downloading {} to {:?}", url, path);
    let transport = |source: reqwest::Error| DatastoreError::Transport {
        url: url.to_string(),
        source: Box::new(source),
    };
    let bytes = reqwest::blocking::get(url)
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.bytes())
        .map_err(transport)?;

    write_complete(&path, &bytes)?;
    debug!("Wrote {} bytes to {:?}", bytes.len(), path);
    Ok(path)
}

/// Writes `bytes` to a temporary file next to `path`, then renames it into
/// place. A failed write never leaves a partial file under `path`.
fn write_complete(path: &Path, bytes: &[u8]) -> Result<(), DatastoreError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(bytes)?;
    file.flush()?;
    file.persist(path).map_err(|e| DatastoreError::Io(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_from_url() {
        assert_eq!(
            file_name_from_url("https://example.org/data/kmnist-train-imgs.npz"),
            "kmnist-train-imgs.npz"
        );
        assert_eq!(file_name_from_url("plain.npy"), "plain.npy");
    }

    #[test]
    fn test_expand_user_leaves_other_paths() {
        assert_eq!(expand_user("/tmp/data"), PathBuf::from("/tmp/data"));
        assert_eq!(expand_user("data/raw"), PathBuf::from("data/raw"));
    }

    #[test]
    fn test_expand_user_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_user("~/datasets"), home.join("datasets"));
        }
    }

    #[test]
    fn test_download_url_skips_existing_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let existing = dir.path().join("train-data.npy");
        fs::write(&existing, b"cached").unwrap();
        // The URL is unreachable; reaching the network would fail the test.
        let path = download_url("http://127.0.0.1:9/train-data.npy", dir.path(), "train-data.npy")
            .unwrap();
        assert_eq!(path, existing);
        assert_eq!(fs::read(&path).unwrap(), b"cached");
    }

    #[test]
    fn test_write_complete_leaves_only_the_final_file() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("train-labels.npy");
        fs::write(&path, b"stale").unwrap();

        write_complete(&path, b"fresh archive").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"fresh archive");
        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_write_complete_missing_directory_leaves_nothing() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("absent").join("test-data.npy");
        assert!(matches!(
            write_complete(&path, b"bytes"),
            Err(DatastoreError::Io(_))
        ));
        assert!(!path.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_makedir_exist_ok_twice() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let nested = dir.path().join("a").join("b");
        makedir_exist_ok(&nested).unwrap();
        makedir_exist_ok(&nested).unwrap();
        assert!(nested.is_dir());
    }
}
