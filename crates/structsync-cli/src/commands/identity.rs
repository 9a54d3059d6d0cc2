use crate::config::Config;
use crate::support::load_document_or_exit;
use serde_json::json;
use structsync_core::identity;

pub fn run(file: String, org_id: Option<String>, json_output: bool, config: &Config) {
    let document = load_document_or_exit(&file);
    let id = identity(&document).unwrap_or_else(|e| {
        eprintln!("error: {file}: {e}");
        std::process::exit(1);
    });
    let org_id = config.resolve_org_id(org_id);
    let catalog_key = org_id.as_deref().map(|org| id.triple().catalog_key(org));

    if json_output {
        let payload = json!({
            "file": file,
            "vendor": id.vendor,
            "name": id.name,
            "format": id.format,
            "version": id.version,
            "uri": id.uri(),
            "org_id": org_id,
            "catalog_key": catalog_key,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("structsync identity {file}");
        println!("  Vendor: {}", id.vendor);
        println!("  Name: {}", id.name);
        println!("  Format: {}", id.format);
        println!("  Version: {}", id.version);
        println!("  URI: {}", id.uri());
        if let Some(key) = catalog_key {
            println!("  Catalog key: {key}");
        }
    }
}
