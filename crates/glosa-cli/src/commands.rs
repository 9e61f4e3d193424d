use std::fs;
use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use tracing::{debug, info};
use walkdir::WalkDir;

use glosa_dom::Document;
use glosa_merge::Merger;

use crate::cli::Cli;

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(workdir) = cli.path else {
        println!("glosa [path]");
        return Ok(());
    };

    let source_dir = workdir.join("source");
    let target_dir = workdir.join("target");
    if !source_dir.exists() || !target_dir.exists() {
        println!(
            "{} or {} does not exist.",
            source_dir.display(),
            target_dir.display()
        );
        return Ok(());
    }

    let output_dir = workdir.join("output");
    if !output_dir.exists() {
        fs::create_dir_all(&output_dir)
            .with_context(|| format!("creating {}", output_dir.display()))?;
    }

    let names = discover_targets(&target_dir)?;
    if names.is_empty() {
        println!("No .html files in {}.", target_dir.display());
        return Ok(());
    }
    info!(count = names.len(), "discovered file pairs");

    let merger = Merger::new();
    let mut merged = 0usize;
    let mut failed = 0usize;
    for name in &names {
        println!("Start merge: {}", name.bold());
        let output_path = output_dir.join(name);
        match process_pair(
            &merger,
            &source_dir.join(name),
            &target_dir.join(name),
            &output_path,
        ) {
            Ok(html) => {
                if cli.verbose {
                    println!("{html}");
                }
                println!("  {} wrote {}", "✓".green(), output_path.display());
                merged += 1;
            }
            Err(err) => {
                println!("  {} {}: {:#}", "✗".red(), name.bold(), err);
                failed += 1;
            }
        }
    }

    println!("\n{} merged, {} failed.", merged, failed);
    if merged == 0 {
        anyhow::bail!("all {failed} file pairs failed");
    }
    Ok(())
}

/// Names of the `.html` files directly inside the target directory, sorted
/// for a deterministic processing order. Each name is expected to have a
/// same-named counterpart in the source directory.
fn discover_targets(target_dir: &Path) -> anyhow::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in WalkDir::new(target_dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.ends_with(".html") {
            names.push(name.into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Merge one file pair and write the result. Returns the serialized output
/// so the caller can echo it. Any failure leaves the output file unwritten.
fn process_pair(
    merger: &Merger,
    source_path: &Path,
    target_path: &Path,
    output_path: &Path,
) -> anyhow::Result<String> {
    debug!(source = %source_path.display(), target = %target_path.display(), "merging pair");

    let source_bytes =
        fs::read(source_path).with_context(|| format!("reading {}", source_path.display()))?;
    let target_bytes =
        fs::read(target_path).with_context(|| format!("reading {}", target_path.display()))?;

    let source_doc = Document::parse(&source_bytes)?;
    let mut target_doc = Document::parse(&target_bytes)?;
    merger.merge_documents(&source_doc, &mut target_doc)?;

    let html = target_doc.to_html();
    fs::write(output_path, html.as_bytes())
        .with_context(|| format!("writing {}", output_path.display()))?;
    Ok(html)
}
