//! Local documents, remote catalog entries and deployment environments.
//!
//! Field names on the wire follow the catalog service's listing format
//! (`schemaType`, `customData`, `contentHash`, ...). Local files wrap the
//! schema body in an envelope whose payload lives under `data`.

use crate::document::Document;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_API_VERSION: &str = "v1";
pub const DEFAULT_RESOURCE_TYPE: &str = "data-structure";

/// A deployment environment in the catalog.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Env {
    /// Development. Content may be patched in place here.
    Dev,
    /// Passed server-side validation, not yet deployed.
    Validated,
    /// Production.
    Prod,
}

impl Env {
    /// The environment a deployment to `self` is promoted from.
    ///
    /// Development deployments come from validated content and production
    /// deployments come from development. Nothing is promoted into
    /// `VALIDATED`; content reaches it by validation.
    pub fn promotion_source(self) -> Option<Env> {
        match self {
            Env::Dev => Some(Env::Validated),
            Env::Prod => Some(Env::Dev),
            Env::Validated => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Env::Dev => "DEV",
            Env::Validated => "VALIDATED",
            Env::Prod => "PROD",
        }
    }
}

impl Default for Env {
    fn default() -> Self {
        Self::Dev
    }
}

impl std::fmt::Display for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Env {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Ok(Self::Dev),
            "validated" => Ok(Self::Validated),
            "prod" | "production" => Ok(Self::Prod),
            _ => Err(format!("unknown environment: {s}")),
        }
    }
}

/// Catalog metadata attached to a schema identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaMeta {
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub schema_type: String,
    /// Compared as a set of pairs; absent, `null` and `{}` are all empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_data: BTreeMap<String, String>,
}

/// One versioned schema from the local corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDocument {
    #[serde(default = "default_api_version")]
    pub api_version: String,
    #[serde(default = "default_resource_type")]
    pub resource_type: String,
    #[serde(default)]
    pub meta: SchemaMeta,
    /// The self-describing schema payload, including its `self` block.
    #[serde(rename = "data")]
    pub body: Document,
}

impl SchemaDocument {
    pub fn new(meta: SchemaMeta, body: Document) -> Self {
        Self {
            api_version: DEFAULT_API_VERSION.to_string(),
            resource_type: DEFAULT_RESOURCE_TYPE.to_string(),
            meta,
            body,
        }
    }
}

/// A record that `version` was placed at `env` with the observed content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deployment {
    pub version: String,
    pub env: Env,
    pub content_hash: String,
}

/// The catalog's view of one identity (vendor, name, format).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteCatalogEntry {
    /// Server-assigned catalog key. Not a content hash.
    #[serde(rename = "hash")]
    pub identity_hash: String,
    pub vendor: String,
    pub name: String,
    pub format: String,
    #[serde(default)]
    pub meta: SchemaMeta,
    /// In the order received; may contain duplicates.
    #[serde(default, deserialize_with = "null_as_default")]
    pub deployments: Vec<Deployment>,
}

impl RemoteCatalogEntry {
    /// The first deployment of `version` at `env`, if any.
    pub fn deployment(&self, version: &str, env: Env) -> Option<&Deployment> {
        self.deployments
            .iter()
            .find(|d| d.version == version && d.env == env)
    }
}

fn default_api_version() -> String {
    DEFAULT_API_VERSION.to_string()
}

fn default_resource_type() -> String {
    DEFAULT_RESOURCE_TYPE.to_string()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
