//! gitlist - browse and query git repositories from the terminal.
//!
//! A small host for the gitlist git driver: it keeps named connections,
//! prints the schema tree, runs queries over the top-level collections
//! and invokes the status and stash commands.

mod dialog;
mod query;
mod terminal;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{bail, eyre, WrapErr};
use color_eyre::Result;
use gitlist_core::{
    render_tree, CommandContext, ConnectionInfo, ConnectionStore, DataContextDriver,
    DetachedLauncher,
};
use gitlist_git::{ConnectionProperties, GitContext, GitDriver, StashCommand, StatusCommand};
use query::{Collection, OutputFormat};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use terminal::{StdinPrompt, TerminalSink};
use tracing_subscriber::EnvFilter;

/// Browse and query git repositories
#[derive(Parser, Debug)]
#[command(name = "gitlist", version, about, author)]
struct Cli {
    #[command(flatten)]
    target: TargetArgs,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug, Default)]
struct TargetArgs {
    /// Saved connection to use
    #[arg(short, long, global = true, conflicts_with = "repo")]
    connection: Option<String>,

    /// Repository path, bypassing saved connections
    #[arg(short, long, global = true)]
    repo: Option<PathBuf>,

    /// External diff tool, overriding the connection's setting
    #[arg(long, global = true)]
    diff_tool: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create or edit a saved connection
    Connect {
        /// Connection name
        name: String,
    },

    /// List saved connections
    Connections,

    /// Print the schema tree
    Schema {
        #[arg(long)]
        json: bool,
    },

    /// Print a collection or property
    Query {
        #[arg(value_enum)]
        collection: Collection,

        #[arg(long)]
        json: bool,
    },

    /// Run a command against a status path or a stash
    Run {
        /// Command name or label (stage, unstage, commit, discard,
        /// view-diff, apply, pop, drop)
        command: String,

        /// File path for status commands, stash index or stash@{n} for
        /// stash commands
        target: String,
    },
}

fn init_logging(verbose: bool) -> Result<()> {
    // Target prefixes also cover gitlist_git and gitlist_core.
    let filter = if verbose {
        EnvFilter::from_default_env().add_directive("gitlist=debug".parse()?)
    } else {
        EnvFilter::from_default_env().add_directive("gitlist=info".parse()?)
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let driver = GitDriver::new();
    match cli.command {
        Command::Connect { name } => connect(&driver, &name),
        Command::Connections => list_connections(&driver),
        Command::Schema { json } => {
            let info = resolve_connection(&driver, &cli.target, load_store)?;
            let schema = driver.schema(&info);
            if json {
                println!("{}", serde_json::to_string_pretty(&schema)?);
            } else {
                print!("{}", render_tree(&schema));
            }
            Ok(())
        }
        Command::Query { collection, json } => {
            let info = resolve_connection(&driver, &cli.target, load_store)?;
            let mut context = open_context(&driver, &info)?;
            let format = if json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            };
            let result = query::run(context.session()?, collection, format, &mut io::stdout());
            driver.on_query_finishing(&info, &mut context);
            result.wrap_err("query failed")
        }
        Command::Run { command, target } => {
            let info = resolve_connection(&driver, &cli.target, load_store)?;
            let mut context = open_context(&driver, &info)?;
            run_command(&mut context, &command, &target)?;
            driver.on_query_finishing(&info, &mut context);
            Ok(())
        }
    }
}

fn load_store() -> Result<ConnectionStore> {
    ConnectionStore::load().wrap_err("failed to load saved connections")
}

/// Pick the connection to use: `--repo`, then `--connection`, then the
/// only saved connection, then the current directory.
fn resolve_connection(
    driver: &GitDriver,
    target: &TargetArgs,
    store: impl FnOnce() -> Result<ConnectionStore>,
) -> Result<ConnectionInfo> {
    let mut info = match (&target.repo, &target.connection) {
        (Some(repo), _) => info_for_path(driver, repo.to_string_lossy().into_owned()),
        (None, Some(name)) => store()?.require(name)?.clone(),
        (None, None) => {
            let store = store().unwrap_or_else(|err| {
                tracing::debug!(error = %err, "ignoring connection store");
                ConnectionStore::in_memory()
            });
            let mut saved = store.iter();
            match (saved.next(), saved.next()) {
                (Some((name, info)), None) => {
                    tracing::debug!(connection = %name, "using the only saved connection");
                    info.clone()
                }
                _ => {
                    let cwd = std::env::current_dir()?;
                    info_for_path(driver, cwd.to_string_lossy().into_owned())
                }
            }
        }
    };

    if let Some(tool) = &target.diff_tool {
        let mut props = ConnectionProperties::from_info(&info);
        props.external_diff_tool_path = tool.to_string_lossy().into_owned();
        props.apply_to(&mut info);
    }
    Ok(info)
}

fn info_for_path(driver: &GitDriver, path: String) -> ConnectionInfo {
    let mut info = driver.new_connection();
    let props = ConnectionProperties {
        repository_path: path,
        ..ConnectionProperties::from_info(&info)
    };
    props.apply_to(&mut info);
    info
}

fn open_context(driver: &GitDriver, info: &ConnectionInfo) -> Result<GitContext> {
    let mut context = GitContext::default();
    driver
        .initialize_context(info, &mut context)
        .wrap_err_with(|| format!("cannot open {}", driver.connection_description(info)))?;
    Ok(context)
}

fn connect(driver: &GitDriver, name: &str) -> Result<()> {
    let mut store = load_store()?;
    let mut info = store
        .get(name)
        .cloned()
        .unwrap_or_else(|| driver.new_connection());

    let Some(props) = dialog::run_dialog(ConnectionProperties::from_info(&info))? else {
        println!("Cancelled");
        return Ok(());
    };

    props.apply_to(&mut info);
    let description = driver.connection_description(&info);
    store.insert(name, info);
    store.save()?;
    tracing::info!(connection = name, "saved connection");
    println!("Saved {name}: {description}");
    Ok(())
}

fn list_connections(driver: &GitDriver) -> Result<()> {
    let store = load_store()?;
    let mut empty = true;
    for (name, info) in store.iter() {
        empty = false;
        println!("{name}\t{}", driver.connection_description(info));
    }
    if empty {
        println!("No saved connections. Create one with `gitlist connect <name>`.");
    }
    Ok(())
}

/// Accepts `3` or `stash@{3}`.
fn parse_stash_index(target: &str) -> Option<usize> {
    let target = target.trim();
    let index = target
        .strip_prefix("stash@{")
        .and_then(|rest| rest.strip_suffix('}'))
        .unwrap_or(target);
    index.parse().ok()
}

enum Invocation {
    Status(StatusCommand),
    Stash(StashCommand),
}

fn parse_invocation(command: &str) -> Result<Invocation> {
    if let Ok(command) = command.parse::<StatusCommand>() {
        return Ok(Invocation::Status(command));
    }
    command
        .parse::<StashCommand>()
        .map(Invocation::Stash)
        .map_err(|err| eyre!(err))
}

fn run_command(context: &mut GitContext, command: &str, target: &str) -> Result<()> {
    let invocation = parse_invocation(command)?;

    let mut sink = TerminalSink::stdout(io::stdout().is_terminal());
    let mut prompt = StdinPrompt::stdin();
    let mut launcher = DetachedLauncher;
    let mut ctx = CommandContext::new(&mut sink, &mut prompt, &mut launcher);

    match invocation {
        Invocation::Status(command) => {
            let session = context.session()?;
            let entry = session
                .status_entry(target)
                .wrap_err_with(|| format!("no status entry for {target}"))?;
            session.run_status_command(command, &entry, &mut ctx);
        }
        Invocation::Stash(command) => {
            let Some(index) = parse_stash_index(target) else {
                bail!("expected a stash index or stash@{{n}}, got {target:?}");
            };
            let session = context.session_mut()?;
            let stash = session.stash(index)?;
            session.run_stash_command(command, &stash, &mut ctx);
        }
    }
    Ok(())
}
