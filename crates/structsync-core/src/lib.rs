//! # structsync core
//!
//! Reconciliation of a local corpus of self-describing schema documents
//! against a remote catalog organised by deployment environment.
//!
//! Given the local documents and the catalog listing, the core decides which
//! entities must be created, patched, deployed as a new version, or have their
//! metadata updated. It never performs those actions.
//!
//! ## Architecture
//!
//! ```text
//! Document            ← Tagged tree parsed from JSON or YAML
//!     │
//! canonical           ← Sorted-key canonical bytes + SHA-256 content hash
//!     │
//! identity            ← (vendor, name, format, version) and remote matching
//!     │
//! classify            ← Per-entity action flags for one target environment
//!     │
//! changes             ← ChangeSet over the whole corpus
//! ```

pub mod canonical;
pub mod changes;
pub mod classify;
pub mod document;
pub mod error;
pub mod identity;
pub mod model;

pub use canonical::{ContentHash, canonical_bytes, content_hash};
pub use changes::{ChangeSet, compute_changes};
pub use classify::{Action, Classification, classify};
pub use document::{Document, Number};
pub use error::{EncodingError, MalformedDocumentError, ReconcileError, SchemaError};
pub use identity::{IdentityTriple, SchemaIdentity, identity, match_remote};
pub use model::{Deployment, Env, RemoteCatalogEntry, SchemaDocument, SchemaMeta};
