//! mfm - Manifest merge CLI tool
//!
//! A command line tool for inspecting multi-document manifests and previewing
//! how desired resources merge onto live ones.

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use manifest_merge::manifest::{by_kind, by_namespace, Predicate};
use manifest_merge::value::{self, Value};
use manifest_merge::{apply, merge_into_with_changes, source, ApplyOptions, MemoryClient};

#[derive(Debug, Parser)]
#[command(name = "mfm", version, about = "Manifest merge CLI tool")]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output location. Use '-' for stdout
    #[arg(short, long, global = true, default_value = "-")]
    output: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct Sources {
    /// Manifest files or directories, loaded in the order given
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Descend into subdirectories
    #[arg(short = 'R', long)]
    recursive: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the identity of every resource, in apply order
    Ids {
        #[command(flatten)]
        sources: Sources,

        /// Only resources in this namespace
        #[arg(short, long)]
        namespace: Option<String>,

        /// Only resources of this kind
        #[arg(long)]
        kind: Option<String>,
    },

    /// Print one resource as YAML
    Find {
        #[command(flatten)]
        sources: Sources,

        #[arg(long)]
        api_version: String,

        #[arg(long)]
        kind: String,

        #[arg(short, long, default_value = "")]
        namespace: String,

        #[arg(long)]
        name: String,
    },

    /// Merge a desired document onto a live document
    Merge {
        #[arg(long)]
        desired: PathBuf,

        #[arg(long)]
        live: PathBuf,
    },

    /// Show what applying the desired manifest onto the live one would do
    Plan {
        #[arg(long)]
        desired: PathBuf,

        #[arg(long)]
        live: PathBuf,

        /// Descend into subdirectories
        #[arg(short = 'R', long)]
        recursive: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut output: Box<dyn Write> = if cli.output == "-" {
        Box::new(io::stdout())
    } else {
        Box::new(
            fs::File::create(&cli.output)
                .map_err(|e| format!("Failed to create output file {:?}: {}", cli.output, e))?,
        )
    };

    match cli.command {
        Command::Ids {
            sources,
            namespace,
            kind,
        } => ids(&sources, namespace, kind, &mut output),
        Command::Find {
            sources,
            api_version,
            kind,
            namespace,
            name,
        } => {
            let manifest = source::load_paths(&sources.paths, sources.recursive)?;
            let resource = manifest
                .find(&api_version, &kind, &namespace, &name)
                .ok_or_else(|| format!("{}/{} {}/{} not found", api_version, kind, namespace, name))?;
            write!(output, "{}", value::to_yaml(resource.value())?)?;
            Ok(())
        }
        Command::Merge { desired, live } => merge(&desired, &live, &mut output),
        Command::Plan {
            desired,
            live,
            recursive,
        } => plan(&desired, &live, recursive, &mut output),
    }
}

fn ids(
    sources: &Sources,
    namespace: Option<String>,
    kind: Option<String>,
    output: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let manifest = source::load_paths(&sources.paths, sources.recursive)?;

    let mut predicates: Vec<Predicate> = Vec::new();
    if let Some(namespace) = namespace {
        predicates.push(by_namespace(namespace));
    }
    if let Some(kind) = kind {
        predicates.push(by_kind(kind));
    }

    for id in manifest.filter(&predicates).identities()? {
        writeln!(output, "{}", id)?;
    }
    Ok(())
}

fn merge(
    desired_file: &PathBuf,
    live_file: &PathBuf,
    output: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let desired = first_document(desired_file)?;
    let mut live = first_document(live_file)?;

    let desired_map = desired
        .as_map()
        .ok_or_else(|| format!("Desired document in {:?} is not a map", desired_file))?;
    let live_map = live
        .as_map_mut()
        .ok_or_else(|| format!("Live document in {:?} is not a map", live_file))?;

    let changes = merge_into_with_changes(desired_map, live_map);
    if changes.is_empty() {
        eprintln!("No changes");
    } else {
        eprintln!("Changed fields:");
        for path in &changes {
            eprintln!("  ~ {}", path);
        }
    }

    write!(output, "{}", value::to_yaml(&live)?)?;
    Ok(())
}

fn plan(
    desired: &PathBuf,
    live: &PathBuf,
    recursive: bool,
    output: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    let desired = source::load_path(desired, recursive)?;
    let live = source::load_path(live, recursive)?;
    let mut client = MemoryClient::from_manifest(&live)?;

    let report = apply(&desired, &mut client, &ApplyOptions::new().dry_run(true))?;
    for (id, outcome) in &report.entries {
        writeln!(output, "{}: {}", id, outcome)?;
        if let manifest_merge::Outcome::Updated(paths) = outcome {
            for path in paths {
                writeln!(output, "  ~ {}", path)?;
            }
        }
    }
    writeln!(output, "{}", report.summary())?;
    Ok(())
}

fn first_document(file: &PathBuf) -> Result<Value, Box<dyn std::error::Error>> {
    let manifest = source::load_file(file)?;
    manifest
        .resources()
        .first()
        .map(|r| r.to_value())
        .ok_or_else(|| format!("No documents in {:?}", file).into())
}
