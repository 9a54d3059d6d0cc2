//! # structsync-corpus
//!
//! The collaborators that feed the reconciliation core.
//!
//! This crate provides:
//! - the local corpus loader (`.yaml`, `.yml` and `.json` schema files)
//! - the catalog listing reader (a JSON snapshot of the listing endpoint)
//! - duplicate-identity detection across the corpus
//!
//! It never talks to the catalog service. Fetching the listing and executing
//! the computed actions belong to other layers.
//!
//! ## Data model
//!
//! ```text
//! files on disk  ──load_corpus──▶  BTreeMap<label, SchemaDocument>
//! listing.json   ──read_listing─▶  Vec<RemoteCatalogEntry>
//! ```

pub mod corpus;
pub mod listing;

pub use corpus::{
    CorpusError, DuplicateIdentity, SOURCE_EXTENSIONS, SourceFormat, duplicate_identities,
    load_corpus, parse_document,
};
pub use listing::{ListingError, read_listing, read_listing_from};
