use crate::config::Config;
use std::collections::BTreeMap;
use std::path::Path;
use structsync_core::{Env, RemoteCatalogEntry, SchemaDocument};
use structsync_corpus::{SourceFormat, load_corpus, parse_document, read_listing};

pub fn load_config_or_exit(path: Option<&str>) -> Config {
    Config::load(path).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn parse_env_or_exit(env: &str) -> Env {
    env.parse().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn load_corpus_or_exit(paths: &[String]) -> BTreeMap<String, SchemaDocument> {
    load_corpus(paths).unwrap_or_else(|e| {
        eprintln!("error: failed to load local schemas: {e}");
        std::process::exit(1);
    })
}

pub fn load_listing_or_exit(path: &str) -> Vec<RemoteCatalogEntry> {
    read_listing(path).unwrap_or_else(|e| {
        eprintln!("error: failed to load catalog listing: {e}");
        std::process::exit(1);
    })
}

pub fn load_document_or_exit(file: &str) -> SchemaDocument {
    let path = Path::new(file);
    let Some(format) = SourceFormat::from_path(path) else {
        eprintln!("error: unsupported file extension: {file} (expected .yaml, .yml or .json)");
        std::process::exit(1);
    };
    let bytes = std::fs::read(path).unwrap_or_else(|e| {
        eprintln!("error: failed to read {file}: {e}");
        std::process::exit(1);
    });
    parse_document(path, &bytes, format).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

pub fn render_bucket(header: &str, items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }
    let mut out = format!("  {header} ({}):\n", items.len());
    for item in items {
        out.push_str(&format!("    - {item}\n"));
    }
    out
}

pub fn yes_no(ok: bool) -> &'static str {
    if ok { "yes" } else { "no" }
}
