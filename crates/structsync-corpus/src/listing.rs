//! Catalog listing snapshots.
//!
//! The listing endpoint answers with a JSON array of catalog entries. A
//! snapshot of that response is what the reconciler reads.

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use structsync_core::RemoteCatalogEntry;

/// Errors from listing reads.
#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("{}: I/O error: {message}", path.display())]
    Io { path: PathBuf, message: String },

    #[error("{}: invalid listing: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

/// Read a listing snapshot from a file path.
pub fn read_listing(path: impl AsRef<Path>) -> Result<Vec<RemoteCatalogEntry>, ListingError> {
    let path = path.as_ref();
    let file = fs::File::open(path).map_err(|e| ListingError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let entries = read_entries(file).map_err(|err| err.at(path))?;
    tracing::debug!(path = %path.display(), entries = entries.len(), "read catalog listing");
    Ok(entries)
}

/// Read a listing snapshot from any reader (stdin, a buffer).
pub fn read_listing_from(reader: impl Read) -> Result<Vec<RemoteCatalogEntry>, ListingError> {
    read_entries(reader).map_err(|err| err.at(Path::new("<input>")))
}

enum ReadFailure {
    Io(String),
    Parse(String),
}

impl ReadFailure {
    fn at(self, path: &Path) -> ListingError {
        let path = path.to_path_buf();
        match self {
            Self::Io(message) => ListingError::Io { path, message },
            Self::Parse(message) => ListingError::Parse { path, message },
        }
    }
}

fn read_entries(mut reader: impl Read) -> Result<Vec<RemoteCatalogEntry>, ReadFailure> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| ReadFailure::Io(e.to_string()))?;
    // An empty catalog may come back as `null` rather than `[]`.
    let entries: Option<Vec<RemoteCatalogEntry>> =
        serde_json::from_str(&text).map_err(|e| ReadFailure::Parse(e.to_string()))?;
    Ok(entries.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};
    use structsync_core::Env;

    fn temp_path(name: &str) -> PathBuf {
        let unique = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "structsync-listing-{name}-{}-{unique}.json",
            std::process::id()
        ))
    }

    const LISTING: &str = r#"[
      {
        "hash": "8bdf79369d28cf587d3c0cee4aa266a0962350739e0397c014874759aeb343e3",
        "vendor": "com.acme",
        "name": "click",
        "format": "jsonschema",
        "meta": {"hidden": false, "schemaType": "event", "customData": null},
        "deployments": [
          {"version": "1-0-0", "env": "DEV", "contentHash": "abc"},
          {"version": "1-0-0", "env": "PROD", "contentHash": "abc"}
        ]
      },
      {
        "hash": "f00",
        "vendor": "com.acme",
        "name": "view",
        "format": "jsonschema",
        "meta": {"hidden": true},
        "deployments": null
      }
    ]"#;

    #[test]
    fn parses_listing_snapshot() {
        let entries = read_listing_from(LISTING.as_bytes()).expect("listing should parse");
        assert_eq!(entries.len(), 2);

        let click = &entries[0];
        assert_eq!(click.name, "click");
        assert_eq!(click.deployments.len(), 2);
        assert_eq!(
            click.deployment("1-0-0", Env::Prod).map(|d| d.content_hash.as_str()),
            Some("abc")
        );
        assert!(click.meta.custom_data.is_empty());

        let view = &entries[1];
        assert!(view.meta.hidden);
        assert!(view.deployments.is_empty());
    }

    #[test]
    fn null_listing_is_empty() {
        let entries = read_listing_from("null".as_bytes()).unwrap();
        assert!(entries.is_empty());
    }

    #[test]
    fn reads_from_path() {
        let path = temp_path("path");
        fs::write(&path, LISTING).unwrap();
        let entries = read_listing(&path).expect("listing should load");
        let _ = fs::remove_file(&path);
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = temp_path("missing");
        match read_listing(&path) {
            Err(ListingError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn bad_json_is_parse_error_with_path() {
        let path = temp_path("bad");
        fs::write(&path, r#"[{"vendor": "com.acme"}]"#).unwrap();
        let err = read_listing(&path).unwrap_err();
        let _ = fs::remove_file(&path);
        assert!(matches!(err, ListingError::Parse { .. }));
        assert!(err.to_string().contains(&path.display().to_string()));
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let text = r#"[{"hash": "x", "vendor": "v", "name": "n", "format": "f",
            "deployments": [{"version": "1-0-0", "env": "STAGING", "contentHash": "h"}]}]"#;
        assert!(matches!(
            read_listing_from(text.as_bytes()),
            Err(ListingError::Parse { .. })
        ));
    }
}
