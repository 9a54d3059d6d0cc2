//! Canonical content hashing.
//!
//! Algorithm:
//! 1. Serialize the tree as compact JSON: mapping keys sorted byte-wise,
//!    sequences in order, strings with minimal escaping (non-ASCII is written
//!    as literal UTF-8, never as `\u` escapes).
//! 2. Integral numbers are written as integers whatever their source type.
//! 3. contentHash = lowercase hex of SHA256(canonical bytes)
//!
//! Two documents that differ only in key order, source format (JSON or YAML)
//! or in how their text was escaped hash identically.

use crate::document::{Document, Number};
use crate::error::EncodingError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Lowercase hex SHA-256 over a document's canonical bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl ContentHash {
    pub fn from_bytes(data: &[u8]) -> Self {
        let hash = Sha256::digest(data);
        Self(format!("{hash:x}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<str> for ContentHash {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// Hash a document body.
pub fn content_hash(document: &Document) -> Result<ContentHash, EncodingError> {
    let bytes = canonical_bytes(document)?;
    Ok(ContentHash::from_bytes(&bytes))
}

/// The canonical byte form of a document.
pub fn canonical_bytes(document: &Document) -> Result<Vec<u8>, EncodingError> {
    let mut out = Vec::new();
    let mut path = String::new();
    write_canonical(document, &mut path, &mut out)?;
    Ok(out)
}

fn write_canonical(
    value: &Document,
    path: &mut String,
    out: &mut Vec<u8>,
) -> Result<(), EncodingError> {
    match value {
        Document::Null => out.extend_from_slice(b"null"),
        Document::Bool(true) => out.extend_from_slice(b"true"),
        Document::Bool(false) => out.extend_from_slice(b"false"),
        Document::Number(n) => write_number(n, path, out)?,
        Document::String(s) => write_string(s, out),
        Document::Binary(_) => {
            return Err(EncodingError::UnsupportedScalar {
                kind: "binary",
                path: display_path(path),
            });
        }
        Document::Sequence(items) => {
            out.push(b'[');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push(b',');
                }
                let mark = path.len();
                path.push('/');
                path.push_str(&idx.to_string());
                write_canonical(item, path, out)?;
                path.truncate(mark);
            }
            out.push(b']');
        }
        Document::Mapping(entries) => {
            // Byte-wise key order; `str` ordering is byte ordering.
            let mut sorted: Vec<&(String, Document)> = entries.iter().collect();
            sorted.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));

            out.push(b'{');
            for (idx, (key, item)) in sorted.into_iter().enumerate() {
                if idx > 0 {
                    out.push(b',');
                }
                write_string(key, out);
                out.push(b':');
                let mark = path.len();
                path.push('/');
                path.push_str(key);
                write_canonical(item, path, out)?;
                path.truncate(mark);
            }
            out.push(b'}');
        }
    }
    Ok(())
}

fn write_number(n: &Number, path: &str, out: &mut Vec<u8>) -> Result<(), EncodingError> {
    if !n.is_finite() {
        return Err(EncodingError::NonFiniteNumber {
            path: display_path(path),
        });
    }
    if let Some(i) = n.as_integer() {
        out.extend_from_slice(i.to_string().as_bytes());
        return Ok(());
    }
    match n {
        Number::Float(f) => match serde_json::Number::from_f64(*f) {
            Some(num) => out.extend_from_slice(num.to_string().as_bytes()),
            None => {
                return Err(EncodingError::NonFiniteNumber {
                    path: display_path(path),
                });
            }
        },
        // Integers always take the branch above.
        Number::PosInt(u) => out.extend_from_slice(u.to_string().as_bytes()),
        Number::NegInt(i) => out.extend_from_slice(i.to_string().as_bytes()),
    }
    Ok(())
}

fn write_string(s: &str, out: &mut Vec<u8>) {
    serde_json::to_writer(&mut *out, s).expect("string serialization should not fail");
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}
