//! Change set aggregation over a whole corpus.

use crate::classify::{Classification, classify};
use crate::error::{ReconcileError, SchemaError};
use crate::identity::{identity, match_remote};
use crate::model::{Env, RemoteCatalogEntry, SchemaDocument};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Labels of local entities grouped by the action they need.
///
/// A label may sit in both `to_update_meta` and `to_update_new_version` (or
/// `to_update_patch`). A label in `to_create` is in no other bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSet {
    pub to_create: Vec<String>,
    pub to_update_meta: Vec<String>,
    pub to_update_patch: Vec<String>,
    pub to_update_new_version: Vec<String>,
}

impl ChangeSet {
    /// Whether the catalog already agrees with the corpus.
    pub fn is_empty(&self) -> bool {
        self.to_create.is_empty()
            && self.to_update_meta.is_empty()
            && self.to_update_patch.is_empty()
            && self.to_update_new_version.is_empty()
    }

    /// Number of distinct entities that need at least one action.
    pub fn len(&self) -> usize {
        self.to_create
            .iter()
            .chain(&self.to_update_meta)
            .chain(&self.to_update_patch)
            .chain(&self.to_update_new_version)
            .collect::<BTreeSet<_>>()
            .len()
    }

    fn record(&mut self, label: &str, classification: Classification) {
        if classification.create {
            self.to_create.push(label.to_string());
        }
        if classification.update_meta {
            self.to_update_meta.push(label.to_string());
        }
        if classification.update_patch {
            self.to_update_patch.push(label.to_string());
        }
        if classification.update_new_version {
            self.to_update_new_version.push(label.to_string());
        }
    }
}

/// Classify every local document against the remote listing.
///
/// Entities are visited in label order, so bucket order is deterministic.
/// The first failing entity aborts the run; no partial change set is
/// returned.
pub fn compute_changes(
    locals: &BTreeMap<String, SchemaDocument>,
    remotes: &[RemoteCatalogEntry],
    target_env: Env,
) -> Result<ChangeSet, ReconcileError> {
    let mut changes = ChangeSet::default();

    for (label, local) in locals {
        let classification =
            classify_entity(label, local, remotes, target_env).map_err(|source| {
                ReconcileError {
                    label: label.clone(),
                    source,
                }
            })?;
        changes.record(label, classification);
    }

    tracing::debug!(
        env = %target_env,
        locals = locals.len(),
        remotes = remotes.len(),
        pending = changes.len(),
        "computed change set"
    );

    Ok(changes)
}

fn classify_entity(
    label: &str,
    local: &SchemaDocument,
    remotes: &[RemoteCatalogEntry],
    target_env: Env,
) -> Result<Classification, SchemaError> {
    let remote = match_remote(local, remotes)?;
    let classification = classify(local, remote, target_env)?;

    if tracing::enabled!(tracing::Level::DEBUG) {
        let uri = identity(local)?.uri();
        let actions: Vec<String> = classification
            .actions()
            .iter()
            .map(ToString::to_string)
            .collect();
        tracing::debug!(label, %uri, actions = ?actions, "classified");
    }

    Ok(classification)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::error::{EncodingError, MalformedDocumentError};
    use crate::model::{Deployment, SchemaMeta};

    fn local(name: &str, version: &str) -> SchemaDocument {
        SchemaDocument::new(
            SchemaMeta::default(),
            Document::mapping([
                (
                    "self",
                    Document::mapping([
                        ("vendor", Document::from("com.acme")),
                        ("name", Document::from(name)),
                        ("format", Document::from("jsonschema")),
                        ("version", Document::from(version)),
                    ]),
                ),
                ("type", Document::from("object")),
            ]),
        )
    }

    fn remote(name: &str, hidden: bool, deployments: Vec<Deployment>) -> RemoteCatalogEntry {
        RemoteCatalogEntry {
            identity_hash: format!("key-{name}"),
            vendor: "com.acme".to_string(),
            name: name.to_string(),
            format: "jsonschema".to_string(),
            meta: SchemaMeta {
                hidden,
                ..SchemaMeta::default()
            },
            deployments,
        }
    }

    fn deployed(version: &str, env: Env, hash: &str) -> Deployment {
        Deployment {
            version: version.to_string(),
            env,
            content_hash: hash.to_string(),
        }
    }

    #[test]
    fn empty_listing_creates_everything() {
        let locals = BTreeMap::from([
            ("b.yaml".to_string(), local("view", "1-0-0")),
            ("a.yaml".to_string(), local("click", "1-0-0")),
        ]);
        let changes = compute_changes(&locals, &[], Env::Dev).unwrap();
        assert_eq!(changes.to_create, vec!["a.yaml", "b.yaml"]);
        assert!(changes.to_update_meta.is_empty());
        assert!(changes.to_update_patch.is_empty());
        assert!(changes.to_update_new_version.is_empty());
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn buckets_collect_each_axis() {
        let click = local("click", "1-0-1");
        let click_hash = crate::canonical::content_hash(&click.body).unwrap();
        let locals = BTreeMap::from([
            ("click.yaml".to_string(), click),
            ("view.yaml".to_string(), local("view", "1-0-0")),
            ("new.yaml".to_string(), local("signup", "1-0-0")),
        ]);
        let remotes = vec![
            remote(
                "click",
                true,
                vec![deployed("1-0-1", Env::Dev, click_hash.as_str())],
            ),
            remote("view", false, vec![deployed("1-0-0", Env::Dev, "stale")]),
        ];

        let changes = compute_changes(&locals, &remotes, Env::Dev).unwrap();
        assert_eq!(changes.to_create, vec!["new.yaml"]);
        assert_eq!(changes.to_update_meta, vec!["click.yaml"]);
        assert_eq!(changes.to_update_patch, vec!["view.yaml"]);
        assert!(changes.to_update_new_version.is_empty());
        assert_eq!(changes.len(), 3);
    }

    #[test]
    fn unchanged_corpus_is_empty_and_idempotent() {
        let doc = local("click", "2-0-0");
        let hash = crate::canonical::content_hash(&doc.body).unwrap();
        let locals = BTreeMap::from([("click.json".to_string(), doc)]);
        let remotes = vec![remote(
            "click",
            false,
            vec![
                deployed("2-0-0", Env::Dev, hash.as_str()),
                deployed("2-0-0", Env::Prod, hash.as_str()),
            ],
        )];

        let first = compute_changes(&locals, &remotes, Env::Prod).unwrap();
        let second = compute_changes(&locals, &remotes, Env::Prod).unwrap();
        assert!(first.is_empty());
        assert_eq!(first, second);
    }

    #[test]
    fn one_malformed_entity_aborts_the_run() {
        let mut broken = local("click", "1-0-0");
        broken.body = Document::mapping([("type", Document::from("object"))]);
        let locals = BTreeMap::from([
            ("a.yaml".to_string(), local("view", "1-0-0")),
            ("b.yaml".to_string(), broken),
        ]);

        let err = compute_changes(&locals, &[], Env::Dev).unwrap_err();
        assert_eq!(err.label, "b.yaml");
        assert_eq!(
            err.source,
            SchemaError::Malformed(MalformedDocumentError::MissingSelf)
        );
        assert_eq!(
            err.to_string(),
            "b.yaml: malformed document: document body has no `self` block"
        );
    }

    fn with_nan_maximum(mut doc: SchemaDocument) -> SchemaDocument {
        if let Document::Mapping(entries) = &mut doc.body {
            entries.push(("maximum".to_string(), Document::from(f64::NAN)));
        }
        doc
    }

    #[test]
    fn unhashable_matched_entity_aborts_the_run() {
        let locals = BTreeMap::from([
            ("a.yaml".to_string(), local("view", "1-0-0")),
            ("b.yaml".to_string(), with_nan_maximum(local("click", "1-0-0"))),
        ]);
        let remotes = vec![remote(
            "click",
            false,
            vec![deployed("1-0-0", Env::Dev, "abc")],
        )];

        let err = compute_changes(&locals, &remotes, Env::Dev).unwrap_err();
        assert_eq!(err.label, "b.yaml");
        assert_eq!(
            err.source,
            SchemaError::Encoding(EncodingError::NonFiniteNumber {
                path: "/maximum".to_string()
            })
        );
    }

    #[test]
    fn unhashable_new_entity_is_still_created() {
        let locals = BTreeMap::from([(
            "click.yaml".to_string(),
            with_nan_maximum(local("click", "1-0-0")),
        )]);

        let changes = compute_changes(&locals, &[], Env::Dev).unwrap();
        assert_eq!(changes.to_create, vec!["click.yaml"]);
        assert_eq!(changes.len(), 1);
    }

    #[derive(Clone, Default)]
    struct CapturedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn classified_event_carries_the_label() {
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let locals = BTreeMap::from([(
            "schemas/click.yaml".to_string(),
            local("click", "1-0-0"),
        )]);

        tracing::subscriber::with_default(subscriber, || {
            compute_changes(&locals, &[], Env::Dev).unwrap();
        });

        let text = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        let line = text
            .lines()
            .find(|line| line.contains("classified"))
            .unwrap_or_else(|| panic!("no classified event in:\n{text}"));
        assert!(line.contains("label"));
        assert!(line.contains("schemas/click.yaml"));
        assert!(line.contains("iglu:com.acme/click/jsonschema/1-0-0"));
    }

    #[test]
    fn change_set_serializes_camel_case() {
        let changes = ChangeSet {
            to_create: vec!["a.yaml".to_string()],
            ..ChangeSet::default()
        };
        insta::assert_json_snapshot!(changes, @r###"
        {
          "toCreate": [
            "a.yaml"
          ],
          "toUpdateMeta": [],
          "toUpdatePatch": [],
          "toUpdateNewVersion": []
        }
        "###);
    }
}
