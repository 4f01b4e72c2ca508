use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use webkit_filters::config::{Config, DEFAULT_CONFIG};
use webkit_filters::content_blocking::CbRule;
use webkit_filters::convert::{convert_list, ConversionStats};
use webkit_filters::fetch::Fetcher;
use webkit_filters::manifest::{CombinedInfo, ListResult, Manifest};
use webkit_filters::split::{dedup_rules, split_rules};

#[derive(Parser)]
#[command(
    name = "webkit-filters",
    version,
    about = "Convert uBlock filter lists to WebKit content blocker JSON"
)]
struct Cli {
    /// Config file
    #[arg(short, long, global = true, default_value = "configs/filter_lists.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch, convert, and write content blocker JSON
    Convert {
        /// Output directory
        #[arg(short, long, default_value = "output")]
        output: PathBuf,
        /// Parse and convert without writing files
        #[arg(long)]
        dry_run: bool,
        /// Generate the combined, deduplicated output
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        combined: bool,
        /// Print per-list statistics and skip breakdowns
        #[arg(short, long)]
        verbose: bool,
    },
    /// List configured filter lists
    List,
    /// Create a default config file
    Init,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_target(false)
        .init();

    match cli.command {
        Command::Convert {
            output,
            dry_run,
            combined,
            verbose,
        } => run_convert(&cli.config, &output, dry_run, combined, verbose).await,
        Command::List => run_list(&cli.config),
        Command::Init => run_init(&cli.config),
    }
}

async fn run_convert(
    config_path: &Path,
    output: &Path,
    dry_run: bool,
    combined: bool,
    verbose: bool,
) -> anyhow::Result<()> {
    let config = Config::load(config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    let lists: Vec<_> = config.enabled_lists().cloned().collect();
    if lists.is_empty() {
        bail!("no enabled filter lists found in config");
    }

    println!("Converting {} filter lists...", lists.len());
    if dry_run {
        println!("[DRY RUN] No files will be written");
    }

    let fetcher = Fetcher::new(&config.http)?;
    let mut all_rules: Vec<CbRule> = Vec::new();
    let mut totals = ConversionStats::default();
    let mut results: BTreeMap<String, ListResult> = BTreeMap::new();

    for list in &lists {
        println!("\n  Processing {}...", list.name);

        let bytes = match fetcher.fetch(&list.url).await {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::error!(list = %list.name, error = %err, "fetch failed, skipping list");
                println!("    ERROR: {err}");
                continue;
            }
        };
        println!("    Downloaded: {} bytes", bytes.len());

        let text = String::from_utf8_lossy(&bytes);
        let (rules, stats) = convert_list(&text);
        println!(
            "    Converted: {} rules (skipped: {})",
            rules.len(),
            stats.skipped
        );
        if verbose {
            println!(
                "    Parsed: {} total, {} network, {} cosmetic, {} exceptions",
                stats.total, stats.network, stats.cosmetic, stats.exceptions
            );
            if !stats.skip_reasons.is_empty() {
                println!("    Skips:");
                for (reason, count) in &stats.skip_reasons {
                    println!("      - {reason}: {count}");
                }
            }
        }

        results.insert(
            list.name.clone(),
            ListResult {
                name: list.name.clone(),
                url: list.url.clone(),
                rules_count: rules.len(),
                skipped_count: stats.skipped,
            },
        );

        if !dry_run {
            for (name, part) in split_rules(&rules, &list.name, config.output.max_rules_per_file) {
                if let Err(err) = write_json(output, &format!("{name}.json"), &part) {
                    println!("    ERROR writing {name}: {err}");
                }
            }
        }

        totals.merge(&stats);
        all_rules.extend(rules);
    }

    if !totals.skip_reasons.is_empty() {
        println!("\nSkipped filters summary:");
        for (reason, count) in &totals.skip_reasons {
            println!("  {reason}: {count}");
        }
    }

    if combined && !all_rules.is_empty() {
        println!("\nGenerating combined output...");
        let all_rules = dedup_rules(all_rules);
        println!("  Total rules: {} (after deduplication)", all_rules.len());

        if !dry_run {
            let parts = split_rules(&all_rules, "combined", config.output.max_rules_per_file);
            let mut part_names = Vec::new();
            for (name, part) in &parts {
                let file_name = format!("{name}.json");
                if let Err(err) = write_json(output, &file_name, part) {
                    println!("  ERROR writing {name}: {err}");
                }
                part_names.push(file_name);
            }

            if config.output.generate_manifest {
                let manifest = Manifest::new(
                    results,
                    CombinedInfo {
                        total_rules: all_rules.len(),
                        files: part_names,
                    },
                );
                write_json(output, "manifest.json", &manifest)
                    .context("writing manifest.json")?;
            }
        }
    }

    println!("\nDone!");
    Ok(())
}

fn run_list(config_path: &Path) -> anyhow::Result<()> {
    let config = Config::load(config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;

    println!("Configured filter lists:\n");
    for list in &config.lists {
        let status = if list.enabled { "enabled" } else { "disabled" };
        println!("  [{status}] {}", list.name);
        println!("         {}\n", list.url);
    }
    Ok(())
}

fn run_init(config_path: &Path) -> anyhow::Result<()> {
    if config_path.exists() {
        bail!("config file already exists: {}", config_path.display());
    }
    if let Some(dir) = config_path.parent() {
        fs::create_dir_all(dir)?;
    }
    fs::write(config_path, DEFAULT_CONFIG)?;
    println!("Created config file: {}", config_path.display());
    Ok(())
}

fn write_json<T: serde::Serialize>(dir: &Path, file_name: &str, data: &T) -> anyhow::Result<()> {
    fs::create_dir_all(dir)?;
    let path = dir.join(file_name);
    let json = serde_json::to_vec_pretty(data)?;
    fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
