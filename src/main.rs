use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use linkheal::commands::{self, RunOptions};
use linkheal::diagnostics;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "linkheal", version, about = "Find every link in a markdown corpus and report the broken ones")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Log malformed lines and ambiguous resolutions to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

/// Flags shared by commands that analyse the whole corpus.
#[derive(Args)]
struct AnalysisArgs {
    /// Compare paths case-insensitively (overrides `.linkheal.toml`)
    #[arg(long)]
    case_insensitive: bool,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
    /// Corpus root directory
    #[arg(default_value = ".")]
    root: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the ordered candidate paths tried for one link target
    Candidates {
        /// Compare paths case-insensitively (overrides `.linkheal.toml`)
        #[arg(long)]
        case_insensitive: bool,
        /// Corpus root directory
        #[arg(long, default_value = ".")]
        root: PathBuf,
        /// Document containing the link, relative to the root
        source_file: String,
        /// Link target as written
        target: String,
    },
    /// Report broken links (exit 2 if any, 1 if files were skipped)
    Check(AnalysisArgs),
    /// List every link and whether it resolved
    Status(AnalysisArgs),
}

impl AnalysisArgs {
    /// Convert parsed flags into command options.
    const fn options(&self) -> RunOptions {
        return RunOptions {
            case_insensitive: self.case_insensitive,
            json: self.json,
        };
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Candidates { case_insensitive, root, source_file, target } => {
            let options = RunOptions { case_insensitive: *case_insensitive, json: false };
            commands::candidates(root, source_file, target, options).map(|()| return ExitCode::SUCCESS)
        },
        Commands::Check(args) => commands::check(&args.root, args.options()),
        Commands::Status(args) => commands::status(&args.root, args.options()).map(|()| return ExitCode::SUCCESS),
    };

    return match result {
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::FAILURE
        },
        Ok(code) => code,
    };
}

/// Install the stderr subscriber. `RUST_LOG` is honoured; the default
/// level is `warn`, or `debug` with `--verbose`.
fn init_tracing(verbose: bool) {
    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::WARN };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .init();
    return;
}
