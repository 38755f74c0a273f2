//! Command-line interface for choreodoc.

use clap::{ArgAction, Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::catalog::Catalog;
use crate::conventions::Conventions;
use crate::diagram::{self, CommandDiagram};
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Default conventions file names to search for.
const DEFAULT_CONVENTIONS_NAMES: &[&str] = &["choreodoc.yaml", ".choreodoc.yaml"];

/// Conventions template written by `init`.
const CONVENTIONS_TEMPLATE: &str = include_str!("templates/conventions.yaml");

/// Sequence diagrams from the message flows of an analyzed codebase.
///
/// Choreodoc reads a catalog of analyzed types, follows every command
/// through the handlers reacting to it and the messages they publish, and
/// renders the resulting choreography as PlantUML sequence diagrams.
#[derive(Parser)]
#[command(name = "choreodoc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render sequence diagrams for commands
    Render(RenderArgs),
    /// List the commands and events of a catalog
    #[command(visible_alias = "ls")]
    List(ListArgs),
    /// Create a conventions file from the template
    Init(InitArgs),
}

/// Arguments for the render command.
#[derive(Parser)]
pub struct RenderArgs {
    /// Path to the analyzed catalog (JSON)
    pub catalog: PathBuf,

    /// Command name or glob to render (default: all commands)
    #[arg(short, long)]
    pub message: Option<String>,

    /// Path to conventions YAML file (default: auto-discover, then built-in)
    #[arg(short, long)]
    pub conventions: Option<PathBuf>,

    /// Write diagrams to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the list command.
#[derive(Parser)]
pub struct ListArgs {
    /// Path to the analyzed catalog (JSON)
    pub catalog: PathBuf,

    /// Output format: pretty or json
    #[arg(short, long, default_value = "pretty")]
    pub format: String,

    /// Path to conventions YAML file (default: auto-discover, then built-in)
    #[arg(short, long)]
    pub conventions: Option<PathBuf>,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "choreodoc.yaml")]
    pub output: PathBuf,
}

/// Initialize logging on stderr. `RUST_LOG` wins over the default filter;
/// `-v` flags win over both.
pub fn init_logging(verbose: u8) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    match verbose {
        0 => {}
        1 => {
            builder.filter_level(log::LevelFilter::Info);
        }
        _ => {
            builder.filter_level(log::LevelFilter::Debug);
        }
    }
    builder.target(env_logger::Target::Stderr).init();
}

/// Discover a conventions file in the current directory.
fn discover_conventions() -> Option<PathBuf> {
    DEFAULT_CONVENTIONS_NAMES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

/// Load and validate conventions: the explicit path, a discovered file, or
/// the built-in defaults.
fn load_conventions(path: Option<&Path>) -> anyhow::Result<Conventions> {
    let path = path.map(Path::to_path_buf).or_else(discover_conventions);
    let conventions = match path {
        Some(path) => {
            log::info!("Using conventions from {}", path.display());
            Conventions::parse_file(&path)
                .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?
        }
        None => {
            log::info!("Using built-in conventions");
            Conventions::default()
        }
    };
    conventions.validate()?;
    Ok(conventions)
}

/// Run the render command.
pub fn run_render(args: &RenderArgs) -> anyhow::Result<i32> {
    let conventions = load_conventions(args.conventions.as_deref())?;
    let catalog = Catalog::load(&args.catalog)?;

    let diagrams = diagram::render_all(&catalog, &conventions, args.message.as_deref())?;
    if diagrams.is_empty() {
        match &args.message {
            Some(pattern) => eprintln!("Error: no command matches {:?}", pattern),
            None => eprintln!("Error: no commands found in {}", args.catalog.display()),
        }
        return Ok(EXIT_FAILED);
    }

    let mut markup = String::new();
    let mut missing = 0;
    for rendered in &diagrams {
        match &rendered.diagram {
            CommandDiagram::Rendered { markup: text, .. } => {
                if !markup.is_empty() {
                    markup.push('\n');
                }
                markup.push_str(text);
            }
            CommandDiagram::NoHandler => {
                missing += 1;
                eprintln!("{}: no handler found", rendered.message);
            }
        }
    }

    match &args.output {
        Some(path) => {
            std::fs::write(path, &markup)?;
            eprintln!(
                "Wrote {} diagram(s) to {}",
                diagrams.len() - missing,
                path.display()
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(markup.as_bytes())?;
        }
    }

    if missing > 0 {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the list command.
pub fn run_list(args: &ListArgs) -> anyhow::Result<i32> {
    if args.format != "pretty" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'pretty' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    let conventions = load_conventions(args.conventions.as_deref())?;
    let catalog = Catalog::load(&args.catalog)?;
    let inventory = report::inventory(&catalog, &conventions);

    let mut stdout = std::io::stdout().lock();
    match args.format.as_str() {
        "json" => report::write_json(&mut stdout, &inventory)?,
        _ => report::write_pretty(&mut stdout, &args.catalog.to_string_lossy(), &inventory)?,
    }

    Ok(EXIT_SUCCESS)
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    // Check if output already exists
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    // Create output directory if needed
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    if let Err(e) = std::fs::write(&args.output, CONVENTIONS_TEMPLATE) {
        eprintln!("Error: failed to write conventions: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to match your message conventions", args.output.display());
    println!(
        "  2. Run: choreodoc render <catalog.json> --conventions {}",
        args.output.display()
    );

    Ok(EXIT_SUCCESS)
}
