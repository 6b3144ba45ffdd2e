use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use nanopub_core::{TranslatorPlugin, TranslatorRegistry};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod config;
mod state;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "nanopub", version, about = "Translate BEL nanopubs between formats")]
struct Cli {
    /// Config file (default: ~/.nanopub/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level (overrides [log] level; RUST_LOG still wins)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered translators
    Formats,

    /// Read a nanopub file and print the records as JSON
    Read {
        file: PathBuf,

        /// Translator id (default: chosen by file extension)
        #[arg(long)]
        format: Option<String>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Read a nanopub file and write it back out with normalized statements
    Convert {
        file: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Translator id (default: chosen by file extension)
        #[arg(long)]
        format: Option<String>,
    },

    /// Write a default config file if none exists
    InitConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(p) => p.clone(),
        None => config::default_config_path()?,
    };
    let cfg = config::load_config(&config_path)?;
    init_logging(&cfg, cli.verbose);
    tracing::debug!(config = %config_path.display(), "loaded config");

    let registry = build_registry()?;

    match cli.command {
        Command::Formats => {
            for d in registry.descriptors() {
                println!(
                    "{:<6} {} | media: {} | ext: {}",
                    d.id,
                    d.name,
                    d.media_types.join(", "),
                    d.extensions.join(", ")
                );
            }
        }

        Command::Read {
            file,
            format,
            pretty,
        } => {
            let plugin = select_plugin(&registry, &file, format.as_deref())?;
            let translator = plugin.create(&cfg.translator_options(plugin.descriptor.id)?)?;

            let data = read_input(&file)?;
            let nanopubs = translator
                .read(&data)
                .with_context(|| format!("parsing {}", file.display()))?;

            let json = if pretty {
                serde_json::to_string_pretty(&nanopubs)?
            } else {
                serde_json::to_string(&nanopubs)?
            };
            println!("{json}");
        }

        Command::Convert {
            file,
            output,
            format,
        } => {
            let plugin = select_plugin(&registry, &file, format.as_deref())?;
            let translator = plugin.create(&cfg.translator_options(plugin.descriptor.id)?)?;

            let data = read_input(&file)?;
            let nanopubs = translator
                .read(&data)
                .with_context(|| format!("parsing {}", file.display()))?;

            match output {
                Some(out_path) => {
                    let mut out = io::BufWriter::new(
                        fs::File::create(&out_path)
                            .with_context(|| format!("create {}", out_path.display()))?,
                    );
                    translator.write(&nanopubs, &mut out)?;
                    out.flush()?;
                    eprintln!(
                        "Wrote {} nanopubs to {}",
                        nanopubs.len(),
                        out_path.display()
                    );
                }
                None => {
                    let stdout = io::stdout();
                    let mut out = stdout.lock();
                    translator.write(&nanopubs, &mut out)?;
                    out.flush()?;
                }
            }
        }

        Command::InitConfig => {
            config::init_config(cli.config.as_deref())?;
        }
    }

    Ok(())
}

/// Translators known to this binary. New formats are added here.
fn build_registry() -> Result<TranslatorRegistry> {
    let mut registry = TranslatorRegistry::new();
    registry.register(nanopub_tsv::plugin())?;
    Ok(registry)
}

fn select_plugin<'r>(
    registry: &'r TranslatorRegistry,
    file: &Path,
    format: Option<&str>,
) -> Result<&'r TranslatorPlugin> {
    tracing::debug!(file = %file.display(), format, "selecting translator");
    match format {
        Some(id) => registry
            .get(id)
            .with_context(|| format!("unknown format: {id} (see `nanopub formats`)")),
        None => registry.for_path(file).with_context(|| {
            format!(
                "cannot pick a translator for {} (pass --format <id>)",
                file.display()
            )
        }),
    }
}

fn read_input(file: &Path) -> Result<String> {
    if !file.exists() {
        bail!("file not found: {}", file.display());
    }
    fs::read_to_string(file).with_context(|| format!("read {}", file.display()))
}

fn init_logging(cfg: &Config, verbose: bool) {
    let fallback = if verbose { "debug" } else { cfg.log.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
