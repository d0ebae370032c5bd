use clap::{Parser, Subcommand};
use docnav::{config, generate, output};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "docnav")]
#[command(about = "Sidebar builder and cross-reference linker for documentation sites")]
#[command(long_about = "\
Sidebar builder and cross-reference linker for documentation sites

Your directory layout is the table of contents. Top-level directories become
sidebar groups, documents become items, and numeric prefixes set the order
without showing up in labels.

Content structure:

  docs/
  ├── config.toml                  # Site config (optional)
  ├── 00-preface.md                # Top-level document → item \"preface\"
  ├── 01-intro/                    # Group \"intro\"
  │   ├── index.md                 # Group link (never listed as an item)
  │   └── 01-overview.md           # Item \"overview\"
  ├── 03-ownership/
  │   └── 第 3 章 所有权.md          # \"第 3 章\" anywhere in the site links here
  └── node_modules/                # Ignored

Cross-references: any page text mentioning a chapter (第 N 章) or part
(第X部分) whose label appears in the sidebar becomes a link to it.

Run 'docnav gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "docs", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the documents found under every mount
    Scan,
    /// Print the navigation trees as JSON, keyed by mount
    Sidebar,
    /// Print the flat catalogue used for cross-reference linking
    Catalog,
    /// Render every document into the output directory
    Build,
    /// Validate config and content without writing anything
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Scan => {
            let site_config = config::load_config(&cli.source)?;
            let trees = generate::build_trees(&cli.source, &site_config)?;
            output::print_scan_output(&trees);
        }
        Command::Sidebar => {
            let site_config = config::load_config(&cli.source)?;
            let trees = generate::build_trees(&cli.source, &site_config)?;
            let sidebars: BTreeMap<&str, _> = trees
                .iter()
                .map(|t| (t.mount.as_str(), &t.tree))
                .collect();
            println!("{}", serde_json::to_string_pretty(&sidebars)?);
        }
        Command::Catalog => {
            let site_config = config::load_config(&cli.source)?;
            let trees = generate::build_trees(&cli.source, &site_config)?;
            output::print_catalogue(&generate::catalogue(&trees));
        }
        Command::Build => {
            let site_config = config::load_config(&cli.source)?;
            println!("==> Building {} → {}", cli.source.display(), cli.output.display());
            let report = generate::generate(&cli.source, &cli.output, &site_config)?;
            output::print_build_output(&report);
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let site_config = config::load_config(&cli.source)?;
            let trees = generate::build_trees(&cli.source, &site_config)?;
            let catalogue = generate::catalogue(&trees);
            site_config.linker(&catalogue)?;
            output::print_check_output(&trees, catalogue.len());
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
