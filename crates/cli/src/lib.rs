use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand};
use command::{CommandAction, CommandHandler, CommandReply};
use config::{AppConfig, DATA_FILE_ENV};
use contact_protocol::serialize_json;
use contact_store::JsonAddressBookStorage;
use std::io::{self, BufRead};
use std::path::PathBuf;

mod command;
mod config;
mod report;

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
#[command(name = "contact-finder")]
#[command(about = "Find, filter and tag contacts", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Print one JSON response per command instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Address book data file
    #[arg(long, global = true, env = DATA_FILE_ENV)]
    data_file: Option<PathBuf>,

    /// Config file (default: ./contact-finder.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Find persons by name keywords, tag=TAG and company=COMPANY
    Find(LineArgs),

    /// List persons whose company contains the given words
    #[command(name = "filtercompany")]
    FilterCompany(LineArgs),

    /// List every person
    List,

    /// Add a person
    Add(LineArgs),

    /// Attach allowed tags to a displayed person
    Tag(LineArgs),

    /// Delete a displayed person
    Delete(LineArgs),

    /// Schedule a meeting with a displayed person
    Meet(LineArgs),

    /// Register an allowed tag
    #[command(name = "addtag")]
    AddTag(LineArgs),

    /// Unregister an allowed tag
    #[command(name = "deltag")]
    DelTag(LineArgs),

    /// List allowed tags with usage counts
    #[command(name = "listtag")]
    ListTag,

    /// Read commands from stdin, one per line, until `exit` or EOF
    Shell,
}

#[derive(Args)]
struct LineArgs {
    /// Command arguments, e.g. `alice tag=friend company=Google`
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

impl Commands {
    /// The equivalent shell line, or `None` for `shell` itself.
    fn line(&self) -> Option<String> {
        let (action, args) = match self {
            Commands::Find(args) => (CommandAction::Find, Some(args)),
            Commands::FilterCompany(args) => (CommandAction::FilterCompany, Some(args)),
            Commands::List => (CommandAction::List, None),
            Commands::Add(args) => (CommandAction::Add, Some(args)),
            Commands::Tag(args) => (CommandAction::Tag, Some(args)),
            Commands::Delete(args) => (CommandAction::Delete, Some(args)),
            Commands::Meet(args) => (CommandAction::Meet, Some(args)),
            Commands::AddTag(args) => (CommandAction::AddTag, Some(args)),
            Commands::DelTag(args) => (CommandAction::DelTag, Some(args)),
            Commands::ListTag => (CommandAction::ListTag, None),
            Commands::Shell => return None,
        };
        let args = args.map(|line| line.args.join(" ")).unwrap_or_default();
        Some(format!("{} {args}", action.as_str()))
    }
}

pub fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();
    if cli.json {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = AppConfig::load(cli.config.as_deref())?;
    let data_file = config.resolve_data_file(cli.data_file.take());
    let storage = JsonAddressBookStorage::new(&data_file);
    let mut handler = CommandHandler::open(storage, &config.seed_tags)
        .with_context(|| format!("Failed to open address book {}", data_file.display()))?;
    log::debug!(
        "Address book {} has {} persons",
        data_file.display(),
        handler.book().contacts().len()
    );

    match cli.command.line() {
        Some(line) => run_once(&mut handler, &line, cli.json),
        None => run_shell(&mut handler, cli.json),
    }
}

fn emit(reply: &CommandReply, json: bool) -> Result<()> {
    if json {
        print_stdout(&serialize_json(&reply.response)?)
    } else {
        print_stdout(&reply.text)
    }
}

fn run_once(handler: &mut CommandHandler, line: &str, json: bool) -> Result<()> {
    let reply = handler.execute(line);
    emit(&reply, json)?;
    if reply.response.is_error() {
        std::process::exit(1);
    }
    Ok(())
}

fn run_shell(handler: &mut CommandHandler, json: bool) -> Result<()> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read command from stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        let reply = handler.execute(&line);
        emit(&reply, json)?;
        if reply.exit {
            break;
        }
    }
    Ok(())
}
