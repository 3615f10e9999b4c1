//! Basic example of using code-dump as a library
//!
//! Dumps this crate's own sources into ./output and prints the totals.

use code_dump::{DumpConfig, Pipeline};

fn main() -> anyhow::Result<()> {
    let config = DumpConfig::builder()
        .source_dir("./src")
        .output_dir("./output")
        .title("code-dump")
        .extensions(".rs,.toml")
        .exclude_dirs("target")
        .build()?;

    let pipeline = Pipeline::new(config)?;
    let result = pipeline.run()?;

    println!(
        "✓ Dumped {} files ({} lines, {} declarations)",
        result.file_count, result.line_count, result.class_count
    );
    println!("✓ Output written to: {}", result.output_path.display());

    Ok(())
}
