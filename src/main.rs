use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

use cli::commands;

/// The main CLI command line interface.
#[derive(Parser)]
#[command(name = "quotes")]
#[command(version)]
#[command(about = "A quote collection kept in step with a remote endpoint")]
#[command(long_about = "Keeps a local collection of quotes, shows them at random or by\n\
    category, and reconciles the collection with a remote endpoint.\n\n\
    Sync pulls every remote quote, adds the ones missing locally, and lets\n\
    the remote win when a quote's category differs.")]
#[command(after_help = "EXAMPLES:\n    \
    quotes show                     Show a random quote\n    \
    quotes add \"Be kind.\" Life      Add a quote and post it\n    \
    quotes filter Motivation        Only show Motivation quotes\n    \
    quotes sync                     Reconcile with the remote now\n    \
    quotes watch                    Keep reconciling every 10 seconds\n\n\
    For more information about a command, run 'quotes <command> --help'.")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available CLI subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show a random quote
    Show(commands::show::Args),

    /// List quotes
    List(commands::list::Args),

    /// Add a quote and post it to the remote
    #[command(long_about = "Validates and saves a new quote, then posts it to the remote.\n\
        The quote is kept locally even if the post fails.")]
    Add(commands::add::Args),

    /// List categories
    Categories,

    /// Show or set the saved category filter
    Filter(commands::filter::Args),

    /// Reconcile with the remote once
    #[command(long_about = "Pulls the remote quote set and merges it into the local\n\
        collection. Quotes missing locally are added; quotes whose category\n\
        differs take the remote category.")]
    Sync,

    /// Reconcile with the remote periodically until Ctrl+C
    Watch(commands::watch::Args),

    /// Export quotes to a JSON file
    Export(commands::export::Args),

    /// Import quotes from a JSON file
    Import(commands::import::Args),

    /// Show collection and sync status
    Status,

    /// View and manage configuration settings
    #[command(long_about = "Provides subcommands to show, get, and set configuration values.\n\
        Configuration is stored in config.yaml in the data directory\n\
        ($QUOTES_HOME, or ~/.quotes).")]
    Config(commands::config::Args),

    /// Generate shell completion scripts
    Completions(commands::completions::Args),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_to_file = matches!(&cli.command, Commands::Watch(args) if args.log_file);
    let _guard = init_logging(cli.verbose, log_to_file)?;

    match cli.command {
        Commands::Show(args) => commands::show::run(args),
        Commands::List(args) => commands::list::run(args),
        Commands::Add(args) => commands::add::run(args),
        Commands::Categories => commands::categories::run(),
        Commands::Filter(args) => commands::filter::run(args),
        Commands::Sync => commands::sync::run(),
        Commands::Watch(args) => commands::watch::run(args),
        Commands::Export(args) => commands::export::run(args),
        Commands::Import(args) => commands::import::run(args),
        Commands::Status => commands::status::run(),
        Commands::Config(args) => commands::config::run(args),
        Commands::Completions(args) => {
            commands::completions::generate_completions(&mut Cli::command(), args.shell);
            Ok(())
        }
    }
}

/// Installs the global subscriber.
///
/// Logs go to stderr. With `log_to_file`, they are also written to
/// `sync.log` in the data directory; the returned guard must live until exit.
fn init_logging(verbose: bool, log_to_file: bool) -> Result<Option<WorkerGuard>> {
    let filter = if verbose {
        "quote_sync=debug,quotes=debug"
    } else {
        "quote_sync=info,quotes=info"
    };

    let (file_layer, guard) = if log_to_file {
        let dir = quote_sync::config::data_dir()?;
        let file_appender = tracing_appender::rolling::never(dir, "sync.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .without_time(),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}
