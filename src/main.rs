use anyhow::Context;
use clap::{Parser, Subcommand};
use formula_review::clock::format_timestamp;
use formula_review::config::Config;
use formula_review::database::{
    ReviewStore, SqliteStore, WriteBuffer, delete_record, due_items, ensure_record, item_status,
};
use formula_review::export::json::{backup_file_name, export_to_path, import_from_path};
use formula_review::models::format::{format_interval, format_next_review};
use formula_review::models::{Quality, ReviewRecord, ReviewSession, map_user_signal_to_quality, status};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "calc-review", about = "Spaced repetition for calculus formulas", version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start tracking an item; it is due immediately
    Add { item: String },

    /// Record a remembered/forgot answer for an item
    Review {
        item: String,
        #[arg(long, conflicts_with = "forgot", required_unless_present = "forgot")]
        remembered: bool,
        #[arg(long)]
        forgot: bool,
        /// The answer was shown before answering
        #[arg(long)]
        revealed: bool,
    },

    /// Record a raw quality score (0-5, out-of-range values are clamped)
    Grade {
        item: String,
        #[arg(allow_negative_numbers = true)]
        quality: i32,
    },

    /// List due items, most urgent first
    Due,

    /// Show the status of one item, or of every tracked item
    Status { item: Option<String> },

    /// Review every due item interactively
    Session,

    /// Stop tracking an item
    Delete { item: String },

    /// Move the simulated clock forward one day
    AdvanceDay,

    /// Write all records to a JSON backup
    Export { path: Option<PathBuf> },

    /// Replace all records with the contents of a JSON backup
    Import { path: PathBuf },

    /// Delete every record
    Reset,
}

fn print_record(record: &ReviewRecord, now: i64) {
    let view = status(record, now);
    println!(
        "{:<32} {:<9} mastery {:>3}%  ef {:.2}  interval {:>4}  {}",
        record.item_id,
        view.state,
        view.mastery,
        record.ease_factor,
        format_interval(record.interval),
        format_next_review(record.next_review_time, now)
    );
}

fn prompt(line: &str) -> anyhow::Result<String> {
    print!("{}", line);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().lock().read_line(&mut input)?;
    Ok(input.trim().to_lowercase())
}

fn run_session(db: SqliteStore) -> anyhow::Result<()> {
    let now = db.current_time()?;
    let mut buffer = WriteBuffer::new(db);
    {
        let mut session = ReviewSession::from_due(&mut buffer, now)?;
        if session.is_complete() {
            println!("Nothing is due.");
        }

        while let Some(record) = session.current() {
            let item_id = record.item_id.clone();
            let [forgot, _, hinted, easy] = session.preview(now).unwrap_or_default();
            println!("\n{}  ({} left)", session.phase_message(), session.remaining());
            println!("  {}", item_id);

            match prompt(&format!(
                "  [y] remembered ({})  [n] forgot ({})  [r] reveal ({} if remembered)  [q] quit > ",
                format_interval(easy),
                format_interval(forgot),
                format_interval(hinted)
            ))?
            .as_str()
            {
                "y" => {
                    session.answer(true, now)?;
                }
                "n" => {
                    session.answer(false, now)?;
                }
                "r" => session.reveal(),
                "q" => break,
                other => println!("  unknown choice '{}'", other),
            }
        }

        let summary = session.summary();
        println!(
            "\nReviewed {} ({} remembered, {} forgotten) over {} round(s).",
            session.reviewed(),
            summary.correct,
            summary.incorrect,
            summary.rounds
        );
    }
    buffer.flush().context("saving review results")?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("loading configuration")?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_filter))
        .init();

    let mut db = SqliteStore::open(&config.database_path)
        .with_context(|| format!("opening {}", config.database_path.display()))?;
    let now = db.current_time()?;

    match cli.command {
        Command::Add { item } => {
            let record = ensure_record(&mut db, &item, now)?;
            println!("Tracking '{}' (added {}).", item, format_timestamp(record.last_review_time));
        }
        Command::Review {
            item,
            remembered,
            forgot: _,
            revealed,
        } => {
            let quality = map_user_signal_to_quality(remembered, revealed);
            let record = db.record_review(&item, quality, now)?;
            print_record(&record, now);
        }
        Command::Grade { item, quality } => {
            let record = db.record_review(&item, Quality::clamped(quality), now)?;
            print_record(&record, now);
        }
        Command::Due => {
            let due = due_items(&db, now)?;
            println!("{} item(s) due", due.len());
            for record in &due {
                print_record(record, now);
            }
        }
        Command::Status { item: Some(item) } => match db.get(&item)? {
            Some(record) => {
                print_record(&record, now);
                println!(
                    "  last reviewed {}, next review {}",
                    format_timestamp(record.last_review_time),
                    format_timestamp(record.next_review_time)
                );
            }
            None => {
                let view = item_status(&db, &item, now)?;
                println!("{:<32} {} (not tracked yet)", item, view.state);
            }
        },
        Command::Status { item: None } => {
            for record in db.list()? {
                print_record(&record, now);
            }
        }
        Command::Session => run_session(db)?,
        Command::Delete { item } => {
            delete_record(&mut db, &item)?;
            println!("Deleted '{}'.", item);
        }
        Command::AdvanceDay => {
            db.advance_day()?;
            println!("Simulated date is now {}.", format_timestamp(db.current_time()?));
        }
        Command::Export { path } => {
            let path = path.unwrap_or_else(|| config.backup_dir().join(backup_file_name(now)));
            let count = export_to_path(&db, &path, now)?;
            println!("Exported {} record(s) to {}.", count, path.display());
        }
        Command::Import { path } => {
            let count = import_from_path(&mut db, &path)
                .with_context(|| format!("importing {}", path.display()))?;
            println!("Imported {} record(s).", count);
        }
        Command::Reset => {
            db.clear()?;
            println!("All review records deleted.");
        }
    }

    Ok(())
}
