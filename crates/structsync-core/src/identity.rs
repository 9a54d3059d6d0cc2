//! Schema identity and remote matching.
//!
//! A schema is identified across versions by the triple (vendor, name,
//! format) found in its `self` block. Matching against the catalog uses that
//! triple only: never the version, never the catalog's server-side key.

use crate::document::Document;
use crate::error::MalformedDocumentError;
use crate::model::{RemoteCatalogEntry, SchemaDocument};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// The version-independent identity of a schema.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IdentityTriple {
    pub vendor: String,
    pub name: String,
    pub format: String,
}

impl IdentityTriple {
    /// Exact, case-sensitive comparison against a catalog entry.
    pub fn matches(&self, remote: &RemoteCatalogEntry) -> bool {
        self.vendor == remote.vendor && self.name == remote.name && self.format == remote.format
    }

    /// The catalog's key for this identity within an organization:
    /// lowercase hex SHA256 of `"{org}-{vendor}-{name}-{format}"`.
    pub fn catalog_key(&self, org_id: &str) -> String {
        let material = format!("{org_id}-{}-{}-{}", self.vendor, self.name, self.format);
        let hash = Sha256::digest(material.as_bytes());
        format!("{hash:x}")
    }
}

impl fmt::Display for IdentityTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.vendor, self.name, self.format)
    }
}

/// The identity block of one schema version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaIdentity {
    pub vendor: String,
    pub name: String,
    pub format: String,
    /// `MODEL-REVISION-ADDITION`, compared only for equality.
    pub version: String,
}

impl SchemaIdentity {
    pub fn triple(&self) -> IdentityTriple {
        IdentityTriple {
            vendor: self.vendor.clone(),
            name: self.name.clone(),
            format: self.format.clone(),
        }
    }

    /// `iglu:vendor/name/format/version`
    pub fn uri(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SchemaIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "iglu:{}/{}/{}/{}",
            self.vendor, self.name, self.format, self.version
        )
    }
}

/// Extract the identity fields from `body.self`.
pub fn identity(doc: &SchemaDocument) -> Result<SchemaIdentity, MalformedDocumentError> {
    let self_block = match doc.body.get("self") {
        None | Some(Document::Null) => return Err(MalformedDocumentError::MissingSelf),
        Some(block) if block.as_mapping().is_none() => {
            return Err(MalformedDocumentError::SelfNotMapping);
        }
        Some(block) => block,
    };

    Ok(SchemaIdentity {
        vendor: required_field(self_block, "vendor")?,
        name: required_field(self_block, "name")?,
        format: required_field(self_block, "format")?,
        version: required_field(self_block, "version")?,
    })
}

fn required_field(
    block: &Document,
    field: &'static str,
) -> Result<String, MalformedDocumentError> {
    let value = match block.get(field) {
        None | Some(Document::Null) => return Err(MalformedDocumentError::MissingField { field }),
        Some(value) => value,
    };
    let text = value
        .as_str()
        .ok_or(MalformedDocumentError::NotAString { field })?;
    if text.is_empty() {
        return Err(MalformedDocumentError::EmptyField { field });
    }
    Ok(text.to_string())
}

/// Find the catalog entry for a local document's identity.
///
/// The first entry with an equal triple wins if the listing has duplicates.
pub fn match_remote<'a>(
    local: &SchemaDocument,
    remotes: &'a [RemoteCatalogEntry],
) -> Result<Option<&'a RemoteCatalogEntry>, MalformedDocumentError> {
    let triple = identity(local)?.triple();
    Ok(remotes.iter().find(|remote| triple.matches(remote)))
}
