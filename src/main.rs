mod config;
mod db;
mod error;
mod models;
mod operations;
mod session;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use config::{GlobalArgs, init_logging};
use db::connection::establish_connection;
use db::kv_store::SqliteStore;
use db::settings_store::{self, Theme};
use error::{TrackerError, TrackerResult};
use models::amount::format_money;
use models::category::style_for;
use operations::add::NewTransaction;
use operations::search::CategoryFilter;
use session::Session;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "spendlog", version, about = "Track monthly expenses against your income")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: UserCommands,
}

#[derive(Subcommand, Debug)]
enum UserCommands {
    /// Record an expense in the selected month
    Add {
        #[arg(long, short)]
        description: String,
        /// One of the fixed categories, e.g. Food or Housing
        #[arg(long, short)]
        category: String,
        #[arg(long, short)]
        amount: String,
        /// YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Show the month's transactions, newest first
    List {
        /// Case-insensitive text matched against description and category
        #[arg(long, short, default_value = "")]
        search: String,
        /// A category name or "all"
        #[arg(long, short, default_value = "all")]
        category: String,
    },
    /// Delete one transaction by id
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Delete every transaction of the selected month
    Clear {
        #[arg(long)]
        yes: bool,
    },
    /// Show the month's income, or set it when AMOUNT is given
    Income { amount: Option<String> },
    /// Totals, balance and top category for the month
    Stats,
    /// Chart dataset (labels, data, colors) as JSON
    Chart,
    /// Months that have stored data
    Periods,
    /// Write every month's data to a JSON file
    Export {
        /// Directory for finance-data-YYYY-MM-DD.json
        #[arg(long, default_value = ".", conflicts_with = "output")]
        dir: PathBuf,
        /// Exact output file
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Replace all stored months with the contents of an export file
    Import {
        file: PathBuf,
        #[arg(long)]
        yes: bool,
    },
    /// Show or change the color theme
    Theme {
        #[arg(value_enum)]
        mode: Option<ThemeMode>,
    },
    /// Interactive overview of the month
    Dashboard,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ThemeMode {
    Dark,
    Light,
    Toggle,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let conn = establish_connection(&cli.global.db)
        .with_context(|| format!("Failed to open database '{}'", cli.global.db.display()))?;
    let store = SqliteStore::new(conn, cli.global.quota_bytes);
    let session = Session::new(&store, cli.global.period());

    run_command(&session, cli.command)?;
    Ok(())
}

fn run_command(session: &Session, command: UserCommands) -> TrackerResult<()> {
    let period = session.period();
    match command {
        UserCommands::Add {
            description,
            category,
            amount,
            date,
        } => {
            let input = NewTransaction {
                description,
                category,
                amount,
                date,
            };
            let transaction = session.add_transaction(&input)?;
            println!(
                "Expense added successfully! (id {}, {} {})",
                transaction.id,
                format_money(transaction.amount),
                transaction.category
            );
        }
        UserCommands::List { search, category } => {
            let filter = CategoryFilter::parse(&category);
            let transactions = session.filter(&search, &filter)?;
            if transactions.is_empty() {
                println!("No transactions found. Add your first expense!");
            }
            for transaction in &transactions {
                println!(
                    "{:>14}  {}  {} {:<14} {:>12}  {}",
                    transaction.id,
                    transaction.date.format("%Y-%m-%d"),
                    style_for(&transaction.category).icon,
                    transaction.category,
                    format_money(transaction.amount),
                    transaction.description
                );
            }
        }
        UserCommands::Delete { id, yes } => {
            let id = operations::remove::parse_transaction_id(&id)?;
            if !session.transactions()?.iter().any(|t| t.id == id) {
                println!("Transaction with ID {} not found in {}.", id, period);
                return Ok(());
            }
            if !yes && !confirm("Are you sure you want to delete this transaction?")? {
                return Ok(());
            }
            let remaining = session.delete_transaction(id)?;
            println!("Transaction deleted ({} left in {}).", remaining.len(), period);
        }
        UserCommands::Clear { yes } => {
            if !yes
                && !confirm(
                    "Are you sure you want to delete all transactions for this period? This cannot be undone!",
                )?
            {
                return Ok(());
            }
            session.clear_transactions()?;
            println!("All transactions cleared for {}.", period);
        }
        UserCommands::Income { amount } => match amount {
            Some(input) => {
                let amount = session.set_income(&input)?;
                println!("Income for {} set to {}.", period, format_money(amount));
            }
            None => println!("Income for {}: {}", period, format_money(session.income()?)),
        },
        UserCommands::Stats => print_stats(session)?,
        UserCommands::Chart => {
            let chart = session.chart_data()?;
            println!("{}", serde_json::to_string_pretty(&chart)?);
        }
        UserCommands::Periods => {
            let summaries = operations::periods::list_periods(session.store())?;
            if summaries.is_empty() {
                println!("No data stored yet.");
            }
            for summary in summaries {
                let transactions = match (summary.transaction_count, summary.total_expenses) {
                    (Some(count), Some(total)) => format!("{:>4} transactions  {:>12}", count, format_money(total)),
                    _ => "unreadable transactions".to_string(),
                };
                println!(
                    "{:<16} {}  income {}",
                    summary.period.to_string(),
                    transactions,
                    format_money(summary.income)
                );
            }
        }
        UserCommands::Export { dir, output } => {
            let now = Utc::now();
            let path = match output {
                Some(path) => {
                    let document = operations::export::build_export(session.store(), now)?;
                    operations::export::write_export(&document, &path)?;
                    path
                }
                None => operations::export::export_to_dir(session.store(), &dir, now)?,
            };
            println!("Data exported successfully to {}", path.display());
        }
        UserCommands::Import { file, yes } => {
            let summary = if yes {
                operations::import::import_from_file(session.store(), &file)?
            } else {
                let text = operations::import::read_import_file(&file)?;
                let document = operations::import::parse_import_document(&text)?;
                if !confirm("This will replace all existing data. Continue?")? {
                    return Ok(());
                }
                operations::import::apply_import(session.store(), &document)?
            };
            println!(
                "Data imported successfully! ({} entries written, {} replaced)",
                summary.written, summary.removed
            );
        }
        UserCommands::Theme { mode } => {
            let theme = match mode {
                None => settings_store::get_theme(session.store())?,
                Some(ThemeMode::Toggle) => settings_store::toggle_theme(session.store())?,
                Some(ThemeMode::Dark) => set_theme(session, Theme::Dark)?,
                Some(ThemeMode::Light) => set_theme(session, Theme::Light)?,
            };
            println!("Theme: {}", theme);
        }
        UserCommands::Dashboard => operations::dashboard::run_dashboard(session)?,
    }
    Ok(())
}

fn set_theme(session: &Session, theme: Theme) -> TrackerResult<Theme> {
    settings_store::set_theme(session.store(), theme)?;
    Ok(theme)
}

fn print_stats(session: &Session) -> TrackerResult<()> {
    let stats = session.stats()?;
    let top = match stats.top_category.as_deref() {
        Some(category) => format!("{} {}", style_for(category).icon, category),
        None => stats.top_category_label().to_string(),
    };

    println!("{}", session.period());
    println!("Income:        {}", format_money(stats.income));
    println!("Expenses:      {}", format_money(stats.total_expenses));
    println!("Balance:       {}", format_money(stats.balance));
    println!(
        "Spent:         {:.1}% ({})",
        stats.percent_spent.round_dp(1),
        stats.severity.label()
    );
    println!("Transactions:  {}", stats.transaction_count);
    println!("Top category:  {}", top);
    Ok(())
}

fn confirm(prompt: &str) -> TrackerResult<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout()
        .flush()
        .map_err(|e| TrackerError::Terminal(format!("Failed to write prompt: {}", e)))?;
    let answer = read_user_input()?;
    Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes"))
}

fn read_user_input() -> TrackerResult<String> {
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .map_err(|e| TrackerError::Terminal(format!("Failed to read line: {}", e)))?;
    Ok(input.trim().to_string())
}
