//! Local corpus loading: one schema document per file.
//!
//! Every path given is walked recursively. Files ending in `.yaml`, `.yml`
//! or `.json` are parsed by extension; anything else is skipped. Each
//! document is labelled by its path as reached from the given root, which is
//! what reports and errors show the operator.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use structsync_core::{IdentityTriple, SchemaDocument, identity};

/// File extensions recognised as schema sources.
pub const SOURCE_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// Serialization format of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Yaml,
    Json,
}

impl SourceFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Errors from corpus loading.
#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("{}: I/O error: {message}", path.display())]
    Io { path: PathBuf, message: String },

    #[error("{}: corrupted source: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    #[error("{}: parse error: {message}", path.display())]
    Parse { path: PathBuf, message: String },
}

/// One identity claimed by more than one local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateIdentity {
    pub triple: IdentityTriple,
    pub labels: Vec<String>,
}

/// Load every schema file under `paths`, keyed by label.
pub fn load_corpus<P: AsRef<Path>>(
    paths: &[P],
) -> Result<BTreeMap<String, SchemaDocument>, CorpusError> {
    let mut files = Vec::new();
    for root in paths {
        let root = root.as_ref();
        if !root.exists() {
            return Err(CorpusError::NotFound(root.to_path_buf()));
        }
        collect_files(root, &mut files)?;
    }

    let mut corpus = BTreeMap::new();
    for path in files {
        let Some(format) = SourceFormat::from_path(&path) else {
            tracing::debug!(path = %path.display(), "skipping non-schema file");
            continue;
        };
        let bytes = fs::read(&path).map_err(|e| CorpusError::Io {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let document = parse_document(&path, &bytes, format)?;
        corpus.insert(path.display().to_string(), document);
    }

    tracing::debug!(documents = corpus.len(), "loaded local corpus");
    Ok(corpus)
}

/// Parse one source file's bytes.
pub fn parse_document(
    path: &Path,
    bytes: &[u8],
    format: SourceFormat,
) -> Result<SchemaDocument, CorpusError> {
    let text = validate_source_bytes(path, bytes)?;
    let parsed = match format {
        SourceFormat::Json => serde_json::from_str(text).map_err(|e| e.to_string()),
        SourceFormat::Yaml => serde_yaml::from_str(text).map_err(|e| e.to_string()),
    };
    parsed.map_err(|message| CorpusError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

/// Identities claimed by more than one file, in triple order.
///
/// Documents without a readable identity are skipped here; reconciliation
/// reports them.
pub fn duplicate_identities(corpus: &BTreeMap<String, SchemaDocument>) -> Vec<DuplicateIdentity> {
    let mut by_triple: BTreeMap<IdentityTriple, Vec<String>> = BTreeMap::new();
    for (label, document) in corpus {
        if let Ok(id) = identity(document) {
            by_triple.entry(id.triple()).or_default().push(label.clone());
        }
    }
    by_triple
        .into_iter()
        .filter(|(_, labels)| labels.len() > 1)
        .map(|(triple, labels)| DuplicateIdentity { triple, labels })
        .collect()
}

fn io_error(path: &Path) -> impl Fn(std::io::Error) -> CorpusError + '_ {
    move |e| CorpusError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

/// A root given explicitly is followed even when it is a symlink.
fn collect_files(root: &Path, out: &mut Vec<PathBuf>) -> Result<(), CorpusError> {
    let metadata = fs::metadata(root).map_err(io_error(root))?;
    if metadata.is_dir() {
        walk_dir(root, out)
    } else {
        out.push(root.to_path_buf());
        Ok(())
    }
}

/// Below a root, symlinked directories are not descended into.
fn walk_dir(dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), CorpusError> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .map_err(io_error(dir))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<_, _>>()
        .map_err(io_error(dir))?;
    entries.sort();

    for entry in entries {
        let metadata = fs::symlink_metadata(&entry).map_err(io_error(&entry))?;
        if metadata.is_dir() {
            walk_dir(&entry, out)?;
        } else if metadata.is_symlink() && entry.is_dir() {
            tracing::debug!(path = %entry.display(), "skipping symlinked directory");
        } else {
            out.push(entry);
        }
    }
    Ok(())
}

fn validate_source_bytes<'a>(path: &Path, bytes: &'a [u8]) -> Result<&'a str, CorpusError> {
    if bytes.contains(&0) {
        return Err(CorpusError::Corrupt {
            path: path.to_path_buf(),
            reason: "contains NUL byte(s)".to_string(),
        });
    }
    std::str::from_utf8(bytes).map_err(|_| CorpusError::Corrupt {
        path: path.to_path_buf(),
        reason: "contains non-UTF-8 byte sequence(s)".to_string(),
    })
}
