#![forbid(unsafe_code)]

//! `un` is a command-line explorer for user-needs catalogs.
//!
//! It reads a JSON snapshot of needs, user groups, entities, and workflow
//! phases, then answers the questions a product team keeps asking: what
//! needs exist for this group, how are they distributed, what references
//! what. Every command speaks pretty, text, and JSON.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

mod cmd;
mod output;

use output::{OutputMode, resolve_output_mode};

#[derive(Parser, Debug)]
#[command(
    name = "un",
    author,
    version,
    about = "Explore user-needs catalogs from the command line",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to the catalog snapshot (overrides project config)
    #[arg(short = 's', long, global = true, value_name = "FILE")]
    snapshot: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Shorthand for --format json
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }

    fn snapshot_flag(&self) -> Option<&Path> {
        self.snapshot.as_deref()
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List needs, optionally narrowed by filters
    #[command(
        next_help_heading = "Read",
        long_about = "List needs from the catalog, optionally narrowed by group, super \
                      group, entity, workflow phase, and refinement state. Filters are \
                      conjunctive: a need must match every active dimension.",
        after_help = "EXAMPLES:\n    un list\n    un list --group patient --refined refined\n    un list --super-group aykua --phase intake\n    un list --entity appointment --limit 10 --json"
    )]
    List(cmd::list::ListArgs),

    /// Show full details for one need
    #[command(
        next_help_heading = "Read",
        after_help = "EXAMPLES:\n    un show AYK-012\n    un show AYK-012 --json"
    )]
    Show(cmd::show::ShowArgs),

    /// Aggregate statistics over the catalog
    #[command(
        next_help_heading = "Reporting",
        long_about = "Count needs by user group (or super group), and with --extended \
                      also by workflow phase and by most-used entities. --drill narrows \
                      a single dimension and reports the matching need ids.",
        after_help = "EXAMPLES:\n    un stats\n    un stats --by super-group --extended\n    un stats --top 5 --json\n    un stats --drill entity=appointment"
    )]
    Stats(cmd::stats::StatsArgs),

    /// Summarize the reference graph between needs and their dimensions
    #[command(
        next_help_heading = "Reporting",
        after_help = "EXAMPLES:\n    un graph\n    un graph --group patient\n    un graph --dot | dot -Tsvg > needs.svg"
    )]
    Graph(cmd::graph::GraphArgs),

    /// List user groups (or super groups with --super)
    #[command(
        next_help_heading = "Reference Data",
        after_help = "EXAMPLES:\n    un groups\n    un groups --super --json"
    )]
    Groups(cmd::groups::GroupsArgs),

    /// List entities referenced by needs
    #[command(next_help_heading = "Reference Data")]
    Entities(cmd::entities::EntitiesArgs),

    /// List workflow phases in display order
    #[command(next_help_heading = "Reference Data")]
    Phases(cmd::phases::PhasesArgs),

    /// Compute the next free need id for a user group
    #[command(
        name = "next-id",
        next_help_heading = "Authoring",
        long_about = "Compute the next sequential need id for a user group. The id \
                      prefix comes from the group's super group, and the sequence \
                      number is one past the highest existing need with that prefix.",
        after_help = "EXAMPLES:\n    un next-id patient\n    un next-id partner --json"
    )]
    NextId(cmd::next_id::NextIdArgs),

    /// Generate shell completion scripts
    #[command(
        next_help_heading = "Project Maintenance",
        after_help = "EXAMPLES:\n    un completions bash > /etc/bash_completion.d/un\n    un completions zsh > ~/.zfunc/_un"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("NEEDS_LOG").unwrap_or_else(|_| {
        if verbose || std::env::var("DEBUG").is_ok() {
            EnvFilter::new("needs_cli=debug,needs_core=debug,info")
        } else {
            EnvFilter::new("needs_cli=info,needs_core=info,warn")
        }
    });

    let use_json =
        std::env::var("NEEDS_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = std::env::current_dir()?;
    let output = cli.output_mode();

    match cli.command {
        Commands::List(ref args) => cmd::list::run_list(args, cli.snapshot_flag(), output, &cwd),
        Commands::Show(ref args) => cmd::show::run_show(args, cli.snapshot_flag(), output, &cwd),
        Commands::Stats(ref args) => cmd::stats::run_stats(args, cli.snapshot_flag(), output, &cwd),
        Commands::Graph(ref args) => cmd::graph::run_graph(args, cli.snapshot_flag(), output, &cwd),
        Commands::Groups(ref args) => {
            cmd::groups::run_groups(args, cli.snapshot_flag(), output, &cwd)
        }
        Commands::Entities(ref args) => {
            cmd::entities::run_entities(args, cli.snapshot_flag(), output, &cwd)
        }
        Commands::Phases(ref args) => {
            cmd::phases::run_phases(args, cli.snapshot_flag(), output, &cwd)
        }
        Commands::NextId(ref args) => {
            cmd::next_id::run_next_id(args, cli.snapshot_flag(), output, &cwd)
        }
        Commands::Completions(ref args) => {
            cmd::completions::run_completions(args.shell, &mut Cli::command())
        }
    }
}
