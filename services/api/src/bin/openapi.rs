//! services/api/src/bin/openapi.rs
//!
//! Writes the OpenAPI document for the schedule routes (`/api/schedule/...`)
//! to disk, for client generation without running the server.

use api_lib::web::rest::ApiDoc;
use clap::Parser;
use std::path::PathBuf;
use utoipa::OpenApi;

#[derive(Parser)]
#[command(name = "openapi", about = "Export the schedule API's OpenAPI document")]
struct Args {
    /// Where to write the document.
    #[arg(default_value = "openapi.json")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let doc = ApiDoc::openapi();
    let route_count = doc.paths.paths.len();
    std::fs::write(&args.output, doc.to_pretty_json()?)?;

    println!("Wrote {} schedule API routes to {}", route_count, args.output.display());
    Ok(())
}
