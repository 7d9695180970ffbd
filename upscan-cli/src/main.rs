use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use upscan_core::FilterCriteria;
use upscan_finance::{description_breakdown, flow_totals, ledger_rows};
use upscan_ingest::{
    AccountRegistry, AccountSelector, HttpTransport, RetrievalEngine, RetrievalResult,
};

mod auth;
mod config;
mod dates;
mod render;
mod state;

use config::Config;
use render::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "upscan", version, about = "Fetch and filter Up bank transactions")]
struct Cli {
    /// Config file (default: ~/.upscan/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level for stderr diagnostics (overrides config)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a default config file
    Init,

    /// List accounts from the config
    Accounts,

    /// Fetch transactions matching every given filter
    Transactions {
        #[command(flatten)]
        filters: FilterArgs,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Withdrawal/deposit totals and a deposit breakdown for matching transactions
    Summary {
        #[command(flatten)]
        filters: FilterArgs,
    },
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Account name from the config (repeatable)
    #[arg(long = "account", conflicts_with = "all")]
    accounts: Vec<String>,

    /// Every account in the config, in config order
    #[arg(long)]
    all: bool,

    /// Start date, YYYY-MM-DD (start of day in the configured timezone)
    #[arg(long)]
    since: Option<String>,

    /// End date, YYYY-MM-DD (end of day in the configured timezone)
    #[arg(long)]
    until: Option<String>,

    /// Comma-separated category or parent-category ids
    #[arg(long)]
    category: Option<String>,

    /// Text contained in the description (case and spaces ignored)
    #[arg(long)]
    description: Option<String>,

    /// Minimum amount, inclusive (negative for spending)
    #[arg(long, allow_negative_numbers = true)]
    min: Option<f64>,

    /// Maximum amount, inclusive
    #[arg(long, allow_negative_numbers = true)]
    max: Option<f64>,

    /// Only food purchases (grocery keywords or restaurant/takeaway categories)
    #[arg(long)]
    food: bool,
}

impl FilterArgs {
    fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::new()
            .with_amount_range(self.min, self.max)
            .with_food_related(self.food);
        if let Some(list) = &self.category {
            criteria = criteria.with_categories(split_categories(list));
        }
        if let Some(needle) = &self.description {
            criteria = criteria.with_description(needle.as_str());
        }
        criteria
    }

    fn selector(&self, registry: &impl AccountRegistry) -> Result<AccountSelector> {
        if self.all {
            return Ok(AccountSelector::All);
        }

        let mut ids = Vec::with_capacity(self.accounts.len());
        for name in &self.accounts {
            match registry.find(name) {
                Some(account) => ids.push(account.id),
                None => {
                    let known: Vec<String> =
                        registry.accounts().into_iter().map(|a| a.name).collect();
                    bail!(
                        "account {:?} not found in config. Available accounts: {}",
                        name,
                        if known.is_empty() { "(none)".to_string() } else { known.join(", ") }
                    );
                }
            }
        }
        Ok(AccountSelector::Many(ids))
    }
}

fn split_categories(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config(cli.config.as_deref())?;

    init_logging(cli.log_level.as_deref().unwrap_or(&cfg.api.log_level));

    match cli.command {
        Command::Init => {
            config::init_config(cli.config.as_deref())?;
        }

        Command::Accounts => {
            if cfg.accounts.is_empty() {
                println!("No accounts configured. Run: upscan init");
            }
            for account in &cfg.accounts {
                if account.id.trim().is_empty() {
                    println!("{} (missing id)", account.name);
                } else {
                    println!("{}", account.name);
                }
            }
        }

        Command::Transactions { filters, format } => {
            let result = retrieve(&cfg, &filters)?;
            render::print_transactions(&result, format)?;
        }

        Command::Summary { filters } => {
            let result = retrieve(&cfg, &filters)?;
            let rows = ledger_rows(&result);
            let totals = flow_totals(&rows);
            let shares = description_breakdown(&rows);
            render::print_summary(result.len(), &rows, &totals, &shares);
        }
    }

    Ok(())
}

fn retrieve(cfg: &Config, filters: &FilterArgs) -> Result<RetrievalResult> {
    let selector = filters.selector(&cfg.accounts)?;
    if selector == AccountSelector::Many(Vec::new()) {
        eprintln!("No accounts selected (pass --account NAME or --all)");
    }

    let window = dates::window(
        filters.since.as_deref(),
        filters.until.as_deref(),
        cfg.api.tz()?,
    )?;
    tracing::debug!(?selector, ?window, "starting retrieval");

    let token = auth::load_token()?;
    let transport = HttpTransport::new(cfg.api.timeout()).context("building HTTP client")?;

    let engine = RetrievalEngine::new(transport, token, cfg.accounts.clone())
        .with_base_url(cfg.api.base_url.as_str())
        .with_page_size(cfg.api.page_size)
        .with_food_rules(cfg.food.clone());

    engine
        .retrieve(&selector, window, &filters.criteria())
        .map_err(|err| anyhow::anyhow!("retrieval failed [{}]: {err}", err.reason()))
}

fn init_logging(level: &str) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(format!(
            "upscan={level},upscan_ingest={level},upscan_core={level},upscan_finance={level}"
        ))
        .init();
}
