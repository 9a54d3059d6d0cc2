//! Per-entity change classification.
//!
//! For one local document and its matched catalog entry (if any), decide
//! which actions bring the catalog in line for a target environment:
//!
//! 1. No match: `Create`, and nothing else is checked.
//! 2. Look up the deployment of the local version at the target env.
//!    - none: `UpdateNewVersion` (never deployed there, possibly known elsewhere)
//!    - content hash differs: `UpdatePatch`
//!    - content hash equal: nothing for content
//! 3. Independently, metadata differs: `UpdateMeta`.
//! 4. Nothing added: `NoChange`.
//!
//! The flags are a record rather than a single state because `UpdateMeta`
//! co-occurs with either content action.

use crate::canonical::content_hash;
use crate::error::SchemaError;
use crate::identity::identity;
use crate::model::{Env, RemoteCatalogEntry, SchemaDocument};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One reconciliation action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    UpdateMeta,
    UpdatePatch,
    UpdateNewVersion,
    NoChange,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Action::Create => "create",
            Action::UpdateMeta => "update-meta",
            Action::UpdatePatch => "update-patch",
            Action::UpdateNewVersion => "update-new-version",
            Action::NoChange => "no-change",
        };
        f.write_str(label)
    }
}

/// The action flags for one entity.
///
/// `create` excludes every other flag; `update_patch` and
/// `update_new_version` exclude each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub create: bool,
    pub update_meta: bool,
    pub update_patch: bool,
    pub update_new_version: bool,
}

impl Classification {
    fn create_only() -> Self {
        Self {
            create: true,
            ..Self::default()
        }
    }

    pub fn is_no_change(&self) -> bool {
        !(self.create || self.update_meta || self.update_patch || self.update_new_version)
    }

    /// The set flags in canonical order, or `[NoChange]`.
    pub fn actions(&self) -> Vec<Action> {
        let flags = [
            (self.create, Action::Create),
            (self.update_meta, Action::UpdateMeta),
            (self.update_patch, Action::UpdatePatch),
            (self.update_new_version, Action::UpdateNewVersion),
        ];
        let actions: Vec<Action> = flags
            .into_iter()
            .filter_map(|(set, action)| set.then_some(action))
            .collect();
        if actions.is_empty() {
            vec![Action::NoChange]
        } else {
            actions
        }
    }
}

/// Classify one local document against its matched remote entry.
///
/// Identity is resolved even when there is no match, so a malformed document
/// never classifies as `Create`.
pub fn classify(
    local: &SchemaDocument,
    remote: Option<&RemoteCatalogEntry>,
    target_env: Env,
) -> Result<Classification, SchemaError> {
    let local_identity = identity(local)?;
    let Some(remote) = remote else {
        return Ok(Classification::create_only());
    };

    let local_hash = content_hash(&local.body)?;
    let mut result = Classification::default();

    match remote.deployment(&local_identity.version, target_env) {
        None => result.update_new_version = true,
        Some(deployed) if deployed.content_hash != local_hash.as_str() => {
            result.update_patch = true;
        }
        Some(_) => {}
    }

    result.update_meta = remote.meta != local.meta;

    Ok(result)
}
