//! Demonstrates wrapping `meshlink-cli`'s command functions directly,
//! rather than going through the `meshlink` binary, to build a custom
//! inspection tool or automated pipeline.

use meshlink_cli::commands::{check, dump, OutputFormat};
use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    println!("--- Programmatic CLI Usage Example ---");

    let model_path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "..", "meshlink-core", "tests", "fixtures", "sphere_ml.xml"]
        .iter()
        .collect();
    if !model_path.exists() {
        println!("Expected a MeshLink fixture at {:?}.", model_path);
        return Ok(());
    }

    check(model_path.clone(), None, false, OutputFormat::Json)?;
    dump(model_path, OutputFormat::Text)?;

    Ok(())
}
