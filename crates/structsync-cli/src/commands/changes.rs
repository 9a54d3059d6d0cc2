use crate::config::Config;
use crate::support::{
    load_corpus_or_exit, load_listing_or_exit, parse_env_or_exit, render_bucket, yes_no,
};
use serde_json::json;
use std::collections::BTreeMap;
use structsync_core::{ChangeSet, Env, SchemaDocument, compute_changes, identity};
use structsync_corpus::duplicate_identities;

pub struct Args {
    pub paths: Vec<String>,
    pub listing: Option<String>,
    pub env: Option<String>,
    pub json: bool,
}

pub fn run(args: Args, config: &Config) {
    let env = parse_env_or_exit(&config.resolve_env(args.env));
    let paths = config.resolve_paths(args.paths);
    let Some(listing_path) = config.resolve_listing(args.listing) else {
        eprintln!("error: no catalog listing given; pass --listing or set `listing` in the config");
        std::process::exit(1);
    };

    let locals = load_corpus_or_exit(&paths);
    tracing::info!(count = locals.len(), "loaded local schemas");
    for duplicate in duplicate_identities(&locals) {
        tracing::warn!(
            identity = %duplicate.triple,
            files = ?duplicate.labels,
            "identity defined by more than one file"
        );
    }

    let remotes = load_listing_or_exit(&listing_path);
    tracing::info!(count = remotes.len(), "loaded catalog listing");

    let changes = compute_changes(&locals, &remotes, env).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    });

    if args.json {
        let payload = json!({
            "env": env,
            "promoted_from": env.promotion_source(),
            "local_count": locals.len(),
            "remote_count": remotes.len(),
            "pending_count": changes.len(),
            "changes": changes,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        print!("{}", render_report(env, &locals, remotes.len(), &changes));
    }
}

fn render_report(
    env: Env,
    locals: &BTreeMap<String, SchemaDocument>,
    remote_count: usize,
    changes: &ChangeSet,
) -> String {
    let describe = |labels: &[String]| -> Vec<String> {
        labels
            .iter()
            .map(|label| match locals.get(label).map(identity) {
                Some(Ok(id)) => format!("{label} ({})", id.uri()),
                _ => label.clone(),
            })
            .collect()
    };
    let deploy_header = match env.promotion_source() {
        Some(source) => format!("Deploy new version {source} -> {env}"),
        None => format!("Deploy new version to {env}"),
    };

    let mut out = format!("structsync changes --env {env}\n");
    out.push_str(&format!("  Local schemas: {}\n", locals.len()));
    out.push_str(&format!("  Catalog entries: {remote_count}\n"));
    out.push_str(&format!("  Up to date: {}\n", yes_no(changes.is_empty())));
    out.push_str(&render_bucket("Create", &describe(&changes.to_create)));
    out.push_str(&render_bucket(
        "Update metadata",
        &describe(&changes.to_update_meta),
    ));
    out.push_str(&render_bucket(
        &format!("Patch in place at {env}"),
        &describe(&changes.to_update_patch),
    ));
    out.push_str(&render_bucket(
        &deploy_header,
        &describe(&changes.to_update_new_version),
    ));
    out
}
