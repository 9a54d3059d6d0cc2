use crate::support::load_document_or_exit;
use serde_json::json;
use structsync_core::{content_hash, identity};

pub fn run(file: String, json_output: bool) {
    let document = load_document_or_exit(&file);
    let id = identity(&document).unwrap_or_else(|e| {
        eprintln!("error: {file}: {e}");
        std::process::exit(1);
    });
    let hash = content_hash(&document.body).unwrap_or_else(|e| {
        eprintln!("error: {file}: {e}");
        std::process::exit(1);
    });

    if json_output {
        let payload = json!({
            "file": file,
            "uri": id.uri(),
            "content_hash": hash.as_str(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&payload).expect("json serialization")
        );
    } else {
        println!("structsync hash {file}");
        println!("  URI: {}", id.uri());
        println!("  Content hash: {hash}");
    }
}
