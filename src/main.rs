use autodoc_index::write::WriteMode;
use autodoc_index::{config, output, paths};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "autodoc-index")]
#[command(about = "Generate Sphinx autodoc pages and toctree indexes for a source tree")]
#[command(long_about = "\
Generate Sphinx autodoc pages and toctree indexes for a source tree

Every source file gets one .rst page that either pulls in its Python
docstrings (automodule) or embeds the file with syntax highlighting
(literalinclude). Index pages list the generated pages and nested indexes
in a toctree.

Layout:

  project/
  ├── autodoc.toml                 # What to document and where
  ├── src/
  │   ├── pkg/core.py              # → docs/source/autodoc/src/pkg/core.py.rst
  │   └── native/thing.h           # → docs/source/autodoc/src/native/thing.h.rst
  └── docs/source/autodoc/
      └── _index.rst               # toctree of everything above

Existing files are never replaced unless --overwrite is given.

Run 'autodoc-index gen-config' to generate a documented autodoc.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// Log debug detail (pattern expansion, path mapping)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write every page and index described by the config
    Build {
        /// Replace files that already exist
        #[arg(long)]
        overwrite: bool,
        /// Report what would be written without touching the filesystem
        #[arg(long)]
        dry_run: bool,
    },
    /// Show the index tree without writing anything
    Plan {
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock autodoc.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("autodoc_index=debug")
        } else {
            EnvFilter::new("autodoc_index=info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Build { overwrite, dry_run } => {
            let base = std::env::current_dir()?;
            let config = config::load_config(&cli.config)?;
            let index = config.build_index(&base)?;
            let written = index.write_index_and_rst_files(WriteMode::new(overwrite, dry_run))?;
            let project_root = paths::resolve_against(&config.project_root, &base);
            output::print_write_report(&written, &project_root, dry_run);
        }
        Command::Plan { json } => {
            let base = std::env::current_dir()?;
            let config = config::load_config(&cli.config)?;
            let plan = config.build_index(&base)?.plan();
            if json {
                println!("{}", serde_json::to_string_pretty(&plan)?);
            } else {
                output::print_plan(&plan);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
