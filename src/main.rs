//! Tagxml CLI - inspect and edit tag documents from the command line.
//!
//! This is the main entry point for the `tagxml` command-line application.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use tagxml::prelude::*;

/// Tagxml - project and keyframe file tool
#[derive(Parser)]
#[command(name = "tagxml")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log debug output to stderr
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the tags and text of a document
    Dump {
        /// Input document
        #[arg(short, long, env = "TAGXML_INPUT")]
        input: PathBuf,

        /// Print one JSON object per line
        #[arg(long)]
        json: bool,
    },

    /// Print an attribute of the first tag with a title
    Get {
        /// Input document
        #[arg(short, long, env = "TAGXML_INPUT")]
        input: PathBuf,

        /// Tag title, matched ignoring case
        #[arg(short, long)]
        title: String,

        /// Attribute key
        #[arg(short, long)]
        key: String,

        /// Which occurrence of a repeated key to print
        #[arg(short = 'n', long, default_value_t = 0)]
        instance: usize,
    },

    /// Change an attribute of the first tag with a title
    Set {
        /// Input document
        #[arg(short, long, env = "TAGXML_INPUT")]
        input: PathBuf,

        /// Output document (defaults to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Tag title, matched ignoring case
        #[arg(short, long)]
        title: String,

        /// Attribute key
        #[arg(short, long)]
        key: String,

        /// New value
        #[arg(short, long)]
        value: String,
    },

    /// Parse every document matching the patterns and report problems
    Check {
        /// Glob patterns, e.g. "projects/**/*.xml"
        #[arg(required = true)]
        patterns: Vec<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Dump { input, json } => {
            cmd_dump(&input, json)?;
        }
        Commands::Get {
            input,
            title,
            key,
            instance,
        } => {
            cmd_get(&input, &title, &key, instance)?;
        }
        Commands::Set {
            input,
            output,
            title,
            key,
            value,
        } => {
            let output = output.unwrap_or_else(|| input.clone());
            cmd_set(&input, &output, &title, &key, &value)?;
        }
        Commands::Check { patterns } => {
            cmd_check(&patterns)?;
        }
    }

    Ok(())
}

fn load_document(path: &Path) -> Result<Document<'static>> {
    let mut doc = Document::new();
    doc.read_from_file(path, true)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(doc)
}

/// Advance to the next tag titled `title`. Malformed tags are skipped.
fn find_tag(doc: &mut Document<'_>, title: &str) -> bool {
    while doc.position() < doc.len() {
        if doc.read_tag() && doc.tag().title_is(title) {
            return true;
        }
    }
    false
}

fn cmd_dump(input: &Path, json: bool) -> Result<()> {
    let mut doc = load_document(input)?;
    doc.dump();

    while doc.position() < doc.len() {
        let offset = doc.position();
        let text = doc.read_text();
        if !text.trim().is_empty() {
            if json {
                println!("{}", serde_json::json!({ "offset": offset, "text": text }));
            } else {
                println!("{:>8}  {:?}", offset, text);
            }
        }

        if !doc.read_tag() {
            continue;
        }

        let offset = doc.tag_start();
        if json {
            println!("{}", serde_json::json!({ "offset": offset, "tag": doc.tag() }));
        } else {
            println!("{:>8}  {}", offset, doc.tag());
        }
    }

    Ok(())
}

fn cmd_get(input: &Path, title: &str, key: &str, instance: usize) -> Result<()> {
    let mut doc = load_document(input)?;

    if !find_tag(&mut doc, title) {
        anyhow::bail!("No {} tag in {}", title, input.display());
    }

    let value = doc
        .tag()
        .attributes()
        .text_instance(key, instance)
        .with_context(|| format!("{} has no {} #{}", title, key, instance))?;
    println!("{}", value);

    Ok(())
}

fn cmd_set(input: &Path, output: &Path, title: &str, key: &str, value: &str) -> Result<()> {
    let mut doc = load_document(input)?;

    if !find_tag(&mut doc, title) {
        anyhow::bail!("No {} tag in {}", title, input.display());
    }

    // Only the tag itself is rewritten; the rest of the file is kept byte for byte.
    let span = doc.tag_start()..doc.position();
    doc.tag_mut().attributes_mut().set(key, value);
    let replacement = doc.tag().serialize();
    log::debug!("rewriting bytes {:?} as {}", span, replacement);

    let mut text = doc.into_string();
    text.replace_range(span, &replacement);
    fs::write(output, text).with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Updated {} {} in {}", title, key, output.display());

    Ok(())
}

/// Tag statistics of one checked document.
struct CheckReport {
    tags: usize,
    malformed: usize,
    unclosed_keyframes: usize,
}

fn check_document(path: &Path) -> Result<CheckReport> {
    let mut doc = load_document(path)?;
    let mut report = CheckReport {
        tags: 0,
        malformed: 0,
        unclosed_keyframes: 0,
    };

    while doc.position() < doc.len() {
        doc.read_text();
        if doc.position() >= doc.len() {
            break;
        }

        if !doc.read_tag() {
            report.malformed += 1;
            continue;
        }
        report.tags += 1;

        if doc.tag().title_is(tagxml::keyframe::TITLE) {
            let mut keyframe = Keyframe::default();
            if !keyframe.load(&mut doc) {
                report.unclosed_keyframes += 1;
            }
        }
    }

    Ok(report)
}

fn cmd_check(patterns: &[String]) -> Result<()> {
    let mut paths = Vec::new();
    for pattern in patterns {
        let matches = glob::glob(pattern).with_context(|| format!("Invalid pattern {}", pattern))?;
        for entry in matches {
            match entry {
                Ok(path) if path.is_file() => paths.push(path),
                Ok(_) => {}
                Err(e) => log::warn!("{}", e),
            }
        }
    }

    println!("Checking {} documents...", paths.len());

    let pb = ProgressBar::new(paths.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let tags = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    let problems: Vec<String> = paths
        .par_iter()
        .filter_map(|path| {
            let result = check_document(path);
            pb.inc(1);

            match result {
                Ok(report) => {
                    tags.fetch_add(report.tags, Ordering::Relaxed);
                    if report.malformed == 0 && report.unclosed_keyframes == 0 {
                        return None;
                    }
                    failed.fetch_add(1, Ordering::Relaxed);
                    Some(format!(
                        "{}: {} malformed tags, {} unclosed keyframes",
                        path.display(),
                        report.malformed,
                        report.unclosed_keyframes
                    ))
                }
                Err(e) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                    Some(format!("{:#}", e))
                }
            }
        })
        .collect();

    pb.finish_with_message("Done");

    for problem in &problems {
        eprintln!("{}", problem);
    }

    println!(
        "Checked {} documents in {:?}: {} tags ({} with problems)",
        paths.len(),
        start.elapsed(),
        tags.load(Ordering::Relaxed),
        failed.load(Ordering::Relaxed)
    );

    if !problems.is_empty() {
        anyhow::bail!("{} documents have problems", problems.len());
    }

    Ok(())
}
