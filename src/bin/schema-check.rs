//! # Schema Document Checker
//!
//! A command-line utility that runs the startup-time schema document checks
//! standalone, so a broken document is caught before deploying the process
//! that embeds the pipeline.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin schema-check schemas/users-api.json
//! ```
//!
//! ## Output
//!
//! ```text
//! Checking schema document: schemas/users-api.json
//! ✓ Document is valid!
//!
//! Operations:
//!   GET /v1/users (listUsers) - 1 parameter(s)
//!   POST /v1/users (createUser) - 3 body field(s)
//!   GET /v1/users/{userId} (getUserById) - 1 parameter(s)
//! ```
//!
//! Exits with status 1 when the document cannot be loaded, the same condition
//! that would abort startup.

use user_api_stub::SchemaRegistry;

fn main() {
    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("Usage: schema-check <schema-file>");
        std::process::exit(2);
    };

    println!("Checking schema document: {path}");
    match SchemaRegistry::from_file(&path) {
        Ok(registry) => {
            println!("✓ Document is valid!");
            println!();
            println!("Operations:");
            for operation in registry.operations() {
                let detail = match &operation.body {
                    Some(body) => format!("{} body field(s)", body.fields.len()),
                    None => format!("{} parameter(s)", operation.parameters.len()),
                };
                println!(
                    "  {} {} ({}) - {}",
                    operation.method, operation.path, operation.id, detail
                );
            }
        }
        Err(err) => {
            eprintln!("✗ {err}");
            std::process::exit(1);
        }
    }
}
