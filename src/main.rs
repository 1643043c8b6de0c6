use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{get_config_path, Config, MAX_SEED};
use menu::{MainMenu, Terminal};
use std::io;
use std::path::PathBuf;
use store::CardStore;
use tracing_subscriber::EnvFilter;

mod card;
mod config;
mod error;
mod menu;
mod narration;
mod practice;
mod review;
mod serve;
mod spaced_repetition;
mod store;
mod utils;

#[derive(Parser)]
#[command(
    name = "flashcards-cli-rs",
    version,
    about = "Flashcards with spoken questions and answers"
)]
struct Cli {
    /// config file (default: <config dir>/flashcards-cli-rs/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// card file, overrides `cards_file`
    #[arg(long, short, global = true)]
    file: Option<PathBuf>,

    /// fixed shuffle seed for practice
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(..=MAX_SEED))]
    seed: Option<u64>,

    /// language code passed to the speech service
    #[arg(long, global = true)]
    language: Option<String>,

    #[arg(long, global = true)]
    no_narration: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive main menu (default)
    Menu,
    /// Add one card
    Add { question: String, answer: String },
    /// Print all cards
    List,
    /// Practice in the terminal
    Practice,
    /// Practice in the browser
    Serve {
        /// listen address, overrides `server.addr`
        #[arg(long)]
        addr: Option<String>,
    },
    /// Print the effective configuration
    Config,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let path = match &self.config {
            Some(path) => path.clone(),
            None => get_config_path()?,
        };
        let mut config = Config::load(&path)?;
        if let Some(file) = &self.file {
            config.cards_file = file.clone();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(language) = &self.language {
            config.narration.language = language.clone();
        }
        if self.no_narration {
            config.narration.enabled = false;
        }
        Ok(config)
    }
}

fn main() {
    let cli = Cli::parse();
    init_logging(matches!(cli.command, Some(Commands::Serve { .. })));

    if let Err(e) = run(cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging(serve: bool) {
    if serve {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));
        tracing_subscriber::fmt().with_env_filter(filter).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = cli.config()?;
    let mut store = CardStore::load(&config.cards_file);

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => {
            let narrator = narration::from_config(&config.narration);
            let mut menu = MainMenu::new(store, narrator, config.seed);
            menu.run(&mut Terminal::new(io::stdin().lock(), io::stdout()))?;
        }
        Commands::Add { question, answer } => {
            let card = store.add(&question, &answer)?.clone();
            println!("added #{} to {:?}: {card}", store.len() - 1, store.path());
        }
        Commands::List => {
            menu::list_cards(&store, &mut Terminal::new(io::empty(), io::stdout()))?;
        }
        Commands::Practice => {
            if store.is_empty() {
                anyhow::bail!(error::SessionError::EmptyDeck);
            }
            let narrator = narration::from_config(&config.narration);
            menu::practice(
                store.cards(),
                config.seed,
                narrator,
                &mut Terminal::new(io::stdin().lock(), io::stdout()),
            )?;
        }
        Commands::Serve { addr } => {
            if store.is_empty() {
                log::warn!("no flashcards yet, add some on the page");
            }
            let addr = addr.unwrap_or_else(|| config.server.addr.clone());
            // built outside the runtime: the blocking http client must not be
            // created or dropped on a runtime thread
            let narrator = narration::from_config(&config.narration);
            let state = serve::AppState::new(store, narrator.clone(), config.seed);
            let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
            runtime.block_on(serve::serve(&addr, state))?;
            drop(runtime);
            drop(narrator);
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }
    Ok(())
}
