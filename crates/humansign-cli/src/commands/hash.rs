//! Hash command implementation.

use humansign_canonical::HexDigest;
use std::fs::File;
use std::path::PathBuf;

pub fn run(file: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let reader =
        File::open(&file).map_err(|e| format!("Failed to open {}: {}", file.display(), e))?;
    let digest = HexDigest::of_reader(reader)
        .map_err(|e| format!("Failed to read {}: {}", file.display(), e))?;
    println!("{}", digest);
    Ok(())
}
