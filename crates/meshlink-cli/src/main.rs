mod commands;
use clap::{Parser, Subcommand};
use commands::OutputFormat;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "meshlink")]
#[command(about = "A CLI tool for inspecting, validating, and round-tripping MeshLink associativity files", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all logging below warnings
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a MeshLink file and report element counts and diagnostics
    ///
    /// Reproduces the minimal diagnostic-harness contract: exit 0 on a
    /// clean parse, 255 on a parse, schema (with --strict), or kernel
    /// error.
    ///
    /// Examples:
    ///
    /// # Check a file, reporting diagnostics but never failing on them
    ///
    /// $ meshlink check model.xml
    ///
    /// # Validate against an XSD and fail the process on any error
    ///
    /// $ meshlink check model.xml --schema MeshLink.xsd --strict
    Check {
        /// Path to the MeshLink XML file
        file: PathBuf,

        /// Path to an XSD schema to validate against
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Fail (non-zero exit) if validation reports any error
        #[arg(long)]
        strict: bool,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Parse, write back out, and verify the round trip preserves element counts
    ///
    /// Examples:
    ///
    /// # Round-trip through a temp file
    ///
    /// $ meshlink roundtrip model.xml
    ///
    /// # Round-trip to a specific path
    ///
    /// $ meshlink roundtrip model.xml --output copy.xml
    Roundtrip {
        /// Path to the MeshLink XML file
        file: PathBuf,

        /// Where to write the round-tripped document (defaults to a temp file)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Print the parsed associativity graph's structure
    ///
    /// Examples:
    ///
    /// # Dump a human-readable tree of models/sheets/strings
    ///
    /// $ meshlink dump model.xml
    ///
    /// # Dump element counts as JSON
    ///
    /// $ meshlink dump model.xml --format json
    Dump {
        /// Path to the MeshLink XML file
        file: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Look up a mesh point by index, using lowest/highest topology lookup
    ///
    /// Examples:
    ///
    /// # Innermost-scope lookup (default)
    ///
    /// $ meshlink find-point model.xml --index 42
    ///
    /// # Outermost-scope lookup
    ///
    /// $ meshlink find-point model.xml --index 42 --highest
    FindPoint {
        /// Path to the MeshLink XML file
        file: PathBuf,

        /// Point index to look up
        #[arg(long)]
        index: i64,

        /// Use highest-topology (outermost-scope) lookup instead of lowest
        #[arg(long)]
        highest: bool,
    },
    /// Look up a mesh edge by its two endpoint indices
    ///
    /// Examples:
    ///
    /// $ meshlink find-edge model.xml --indices 3,9
    FindEdge {
        /// Path to the MeshLink XML file
        file: PathBuf,

        /// Comma-separated endpoint indices, e.g. "3,9"
        #[arg(long)]
        indices: String,
    },
    /// Look up a mesh face by its three or four point indices
    ///
    /// Examples:
    ///
    /// # Triangle
    ///
    /// $ meshlink find-face model.xml --indices 1,2,3
    ///
    /// # Quad
    ///
    /// $ meshlink find-face model.xml --indices 1,2,3,4
    FindFace {
        /// Path to the MeshLink XML file
        file: PathBuf,

        /// Comma-separated point indices, e.g. "1,2,3" or "1,2,3,4"
        #[arg(long)]
        indices: String,
    },
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "warn"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("meshlink={level}")));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

/// Exit code for a parse, schema, or kernel failure (§6.3). Clap itself
/// exits with its own usage-error code before this function ever runs, so
/// everything reaching here is either a clean run (0) or a data failure.
const EXIT_DATA_ERROR: i32 = 255;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Check { file, schema, strict, format } => commands::check(file, schema, strict, format),
        Commands::Roundtrip { file, output } => commands::roundtrip(file, output),
        Commands::Dump { file, format } => commands::dump(file, format),
        Commands::FindPoint { file, index, highest } => commands::find_point(file, index, highest),
        Commands::FindEdge { file, indices } => commands::find_edge(file, indices),
        Commands::FindFace { file, indices } => commands::find_face(file, indices),
    };

    if let Err(err) = result {
        eprintln!("error: {err:#}");
        std::process::exit(EXIT_DATA_ERROR);
    }
}
