use anyhow::{Context as AnyhowContext, Result};
use bundle_resolver::{BundleResolver, ResolverConfig};
use clap::Parser;
use std::io;
use std::path::{Path, PathBuf};

mod dispatch;
mod report;
mod scan;

use dispatch::Dispatcher;
use scan::BundleScanner;

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "bundle-inspect")]
#[command(about = "Report the Transformers model bundles found in directories", long_about = None)]
#[command(version)]
struct Cli {
    /// Files or directories to inspect
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,

    /// Resolver configuration (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Drop siblings whose content disagrees with their file name
    #[arg(long)]
    strict_roles: bool,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Print the JSON schema of the output and exit
    #[arg(long)]
    schema: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors (stdout is reserved for JSON)
    #[arg(long)]
    quiet: bool,
}

fn init_logging(cli: &Cli) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();
}

fn load_config(path: Option<&Path>) -> Result<ResolverConfig> {
    let Some(path) = path else {
        return Ok(ResolverConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("Failed to parse config {}", path.display()))
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    if cli.schema {
        return print_stdout(&report::render_schema()?);
    }

    let mut config = load_config(cli.config.as_deref())?;
    if cli.strict_roles {
        config.strict_roles = true;
    }
    let resolver = BundleResolver::new(config).context("Invalid resolver configuration")?;

    let batches = BundleScanner::new(cli.paths.iter().cloned()).scan()?;
    let reports = Dispatcher::new(resolver).dispatch(&batches).await;
    print_stdout(&report::render_reports(&reports, cli.pretty)?)
}
