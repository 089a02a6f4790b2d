use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use planner_core::{Amount, FileStorage, Planner, StatementType, Store, Summary, SystemClock};
use std::path::{Path, PathBuf};

mod config;
mod form;
mod logging;
mod render;
mod state;
mod tui;

use config::Config;
use logging::LogSink;

#[derive(Parser, Debug)]
#[command(
    name = "planner",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("PLANNER_BUILD_SHA"), ")"),
    about = "Track income and spending with a running balance"
)]
struct Cli {
    /// State directory (default: ~/.expense-planner)
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive view: balance, list, entry form (default)
    Tui,

    /// Append an entry; amount and remarks are stored as given
    Add {
        #[arg(value_enum)]
        kind: KindArg,

        /// Amount as entered (may be omitted)
        #[arg(allow_hyphen_values = true)]
        amount: Option<String>,

        #[arg(long)]
        remarks: Option<String>,
    },

    /// Delete every entry with this id
    Remove { id: i64 },

    /// Print all entries in insertion order
    List,

    /// Print balance, income and spendings
    Summary,

    /// Config helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write ~/.expense-planner/config.toml with defaults
    Init,
    /// Print the effective config
    Show,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum KindArg {
    Income,
    #[value(alias = "spending")]
    Expense,
}

impl From<KindArg> for StatementType {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Income => StatementType::Income,
            KindArg::Expense => StatementType::Expense,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let home = state::ensure_planner_home(cli.home.as_deref())?;
    let cfg = config::load_config(&home)?;
    let command = cli.command.unwrap_or(Command::Tui);

    let sink = match command {
        Command::Tui => LogSink::File(state::log_path(&home)),
        _ => LogSink::Stderr,
    };
    logging::init(&cfg.log.level, sink)?;
    tracing::debug!(home = %home.display(), "starting");

    match command {
        Command::Tui => {
            let store = open_store(&home, &cfg)?;
            let mut app = tui::App::new(Planner::new(store), cfg.display.clone());
            tui::run(&mut app)?;
            tracing::debug!(count = app.planner().statements().len(), "tui closed");
        }

        Command::Add {
            kind,
            amount,
            remarks,
        } => {
            let mut store = open_store(&home, &cfg)?;
            let list = store
                .add(kind.into(), amount.map(Amount::Text), remarks)
                .context("saving statements")?;
            if let Some(added) = list.last() {
                tracing::info!(id = added.id, "statement added");
                println!("Added {}", render::entry_line(added, &cfg.display));
            }
            print_summary(&Summary::of(list), &cfg);
        }

        Command::Remove { id } => {
            let mut store = open_store(&home, &cfg)?;
            let before = store.statements().len();
            let after = store.remove(id).context("saving statements")?.len();
            tracing::info!(id, removed = before - after, "remove");
            println!("Removed {} entr{}", before - after, if before - after == 1 { "y" } else { "ies" });
            print_summary(&Summary::of(store.statements()), &cfg);
        }

        Command::List => {
            let store = open_store(&home, &cfg)?;
            if store.statements().is_empty() {
                println!("(no statements yet; add one with `planner add income <amount>`)");
            }
            for s in store.statements() {
                println!("{}", render::entry_line(s, &cfg.display));
            }
        }

        Command::Summary => {
            let store = open_store(&home, &cfg)?;
            print_summary(&Summary::of(store.statements()), &cfg);
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => match config::init_config(&home)? {
                config::InitOutcome::Written(p) => println!("Wrote {}", p.display()),
                config::InitOutcome::Kept(p) => println!("Config already exists: {}", p.display()),
            },
            ConfigCommand::Show => config::show_config(&cfg)?,
        },
    }

    Ok(())
}

fn open_store(home: &Path, cfg: &Config) -> Result<Store<FileStorage, SystemClock>> {
    let clock = cfg.clock()?;
    let path = cfg.storage_path(home);
    let store = Store::with_key(FileStorage::new(path), clock, cfg.storage.key.clone());
    tracing::debug!(
        path = %store.storage().path().display(),
        key = %cfg.storage.key,
        timezone = ?cfg.clock.timezone,
        count = store.statements().len(),
        "store opened"
    );
    Ok(store)
}

fn print_summary(summary: &Summary, cfg: &Config) {
    println!("\nBalance: {}", render::balance_line(summary, &cfg.display));
    println!("{}", render::totals_line(summary, &cfg.display));
}
