//! Command-line interface: deck management and interactive study sessions.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use maestro_app::database::db;
use maestro_app::error::SessionError;
use maestro_app::export::json::{export_deck_to_path, import_deck};
use maestro_app::models::{Deck, Grade, ReviewSession, queue};
use rusqlite::Connection;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "maestro", version, about = "Spaced repetition flashcards")]
pub struct Cli {
    /// Path to the sqlite database
    #[arg(long, default_value = "maestro.sqlite3")]
    pub db: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List decks with card and due counts
    Decks,
    /// Create an empty deck
    NewDeck { name: String },
    /// Add a card to a deck
    AddCard {
        deck: String,
        front: String,
        back: String,
    },
    /// Show the due queue of a deck
    Due { deck: String },
    /// Run an interactive study session over a deck's due cards
    Study {
        deck: String,
        /// Cap the number of cards in this sitting
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Export a deck to a JSON file
    Export { deck: String, path: PathBuf },
    /// Import a deck from a JSON file
    Import { path: PathBuf },
    /// Advance the simulated date by one day
    NextDay,
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let conn = db::init_database(&cli.db).context("failed to open database")?;
    seed_sample_deck(&conn)?;

    match cli.command {
        Command::Decks => list_decks(&conn),
        Command::NewDeck { name } => {
            db::new_deck(&name, &conn).context("failed to create deck")?;
            println!("Deck '{name}' created.");
            Ok(())
        }
        Command::AddCard { deck, front, back } => {
            if !db::deck_exists(&deck, &conn)? {
                bail!("no such deck: {deck}");
            }
            let id = db::add_card(&deck, &front, &back, &conn)?;
            println!("Card {id} added to '{deck}'.");
            Ok(())
        }
        Command::Due { deck } => show_due(&conn, &deck),
        Command::Study { deck, limit } => study(&conn, &deck, limit),
        Command::Export { deck, path } => export(&conn, &deck, &path),
        Command::Import { path } => import(&conn, &path),
        Command::NextDay => {
            let day = db::advance_day(&conn)?;
            println!("Current date is now {}.", day.format("%Y-%m-%d"));
            Ok(())
        }
    }
}

/// First run: create a small deck to study, as a fresh install would.
fn seed_sample_deck(conn: &Connection) -> anyhow::Result<()> {
    if !db::get_all_decks(conn)?.is_empty() {
        return Ok(());
    }

    let deck = "Advanced JavaScript Concepts";
    db::new_deck(deck, conn)?;
    db::add_card(
        deck,
        "What is closure in JavaScript?",
        "A closure is a function that has access to variables in its outer \
         (enclosing) scope even after the outer function has returned.",
        conn,
    )?;
    db::add_card(
        deck,
        "Explain the difference between let, const, and var",
        "var is function-scoped and can be redeclared, let is block-scoped \
         and can be reassigned but not redeclared, const is block-scoped and \
         cannot be reassigned or redeclared.",
        conn,
    )?;
    db::add_card(
        deck,
        "What is the event loop in JavaScript?",
        "The mechanism that handles asynchronous operations: it continuously \
         checks the call stack and task queues, moving tasks onto the stack \
         when it is empty.",
        conn,
    )?;

    tracing::info!(deck, "sample deck created");
    Ok(())
}

fn list_decks(conn: &Connection) -> anyhow::Result<()> {
    let deck_set = db::load_all_decks(conn)?;
    let now = db::get_current_date(conn)?;

    println!("Today is {} (simulated).", now.format("%Y-%m-%d"));
    for deck in &deck_set.decks {
        println!(
            "  {} ({} cards, {} due)",
            deck.name,
            deck.cards.len(),
            deck.due_count(now)
        );
    }
    Ok(())
}

fn show_due(conn: &Connection, deck: &str) -> anyhow::Result<()> {
    if !db::deck_exists(deck, conn)? {
        bail!("no such deck: {deck}");
    }
    let cards = db::get_cards_for_deck(deck, conn)?;
    let now = db::get_current_date(conn)?;

    let due = queue::select_due(&cards, now);
    if due.is_empty() {
        println!("Nothing due in '{deck}'.");
        return Ok(());
    }

    println!("{} card(s) due in '{deck}':", due.len());
    for card in due {
        println!(
            "  #{:<4} due {}  reps {}  {}",
            card.id,
            card.review.due_at.format("%Y-%m-%d %H:%M"),
            card.review.repetitions,
            card.front
        );
    }
    Ok(())
}

fn study(conn: &Connection, deck: &str, limit: Option<usize>) -> anyhow::Result<()> {
    if !db::deck_exists(deck, conn)? {
        bail!("no such deck: {deck}");
    }
    let mut cards = db::get_cards_for_deck(deck, conn)?;
    let now = db::get_current_date(conn)?;

    let mut session = match ReviewSession::start(&cards, now, limit) {
        Ok(session) => session,
        Err(SessionError::EmptyQueue) => {
            println!("Nothing due in '{deck}' right now. Come back later.");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    println!("Studying '{deck}': {} card(s) due.", session.total_count());

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    while !session.is_complete() {
        let card = session.current_card(&cards)?;
        println!();
        println!("{}", session.progress_message());
        println!("Front: {}", card.front);
        print!("(press Enter to reveal) ");
        std::io::stdout().flush()?;
        if lines.next().is_none() {
            // stdin closed: abandon the sitting; everything graded so far
            // is already committed
            return Ok(());
        }

        let card = session.current_card(&cards)?;
        println!("Back:  {}", card.back);

        let grade = loop {
            print!("Grade [0=again 1=hard 2=good 3=easy, q=quit]: ");
            std::io::stdout().flush()?;
            let Some(line) = lines.next() else {
                return Ok(());
            };
            let line = line?;
            let answer = line.trim();
            if answer.eq_ignore_ascii_case("q") {
                println!("Session abandoned; graded cards stay updated.");
                return Ok(());
            }
            match answer.parse::<u8>() {
                Ok(value) => match Grade::from_value(value) {
                    Ok(grade) => break grade,
                    Err(err) => println!("{err}"),
                },
                Err(_) => println!("Enter a number 0-3 or q."),
            }
        };

        let graded_id = session.grade(&mut cards, grade, now)?;
        if let Some(card) = cards.iter().find(|card| card.id == graded_id) {
            db::update_review_state(card.id, &card.review, conn)?;
            println!(
                "{}: next review in {} day(s).",
                grade.label(),
                card.review.interval_days
            );
        }
    }

    let tally = session.tally();
    println!();
    println!(
        "Session complete: {} reviewed ({} again, {} hard, {} good, {} easy).",
        tally.total(),
        tally.again,
        tally.hard,
        tally.good,
        tally.easy
    );
    Ok(())
}

fn export(conn: &Connection, deck_name: &str, path: &Path) -> anyhow::Result<()> {
    if !db::deck_exists(deck_name, conn)? {
        bail!("no such deck: {deck_name}");
    }
    let deck = Deck {
        name: deck_name.to_string(),
        cards: db::get_cards_for_deck(deck_name, conn)?,
    };

    export_deck_to_path(&deck, path).context("export failed")?;
    println!(
        "Deck '{}' exported to {} ({} cards).",
        deck.name,
        path.display(),
        deck.cards.len()
    );
    Ok(())
}

fn import(conn: &Connection, path: &Path) -> anyhow::Result<()> {
    let deck = import_deck(path).context("import failed")?;
    if db::deck_exists(&deck.name, conn)? {
        bail!(
            "deck '{}' already exists; rename it in the JSON file first",
            deck.name
        );
    }

    // Cards are keyed by (deck, front) in storage, so duplicate fronts in
    // the file would silently collapse into one row. Reject them up front.
    let mut fronts = std::collections::HashSet::new();
    for card in &deck.cards {
        if !fronts.insert(card.front.as_str()) {
            bail!(
                "deck '{}' contains more than one card with front '{}'",
                deck.name,
                card.front
            );
        }
    }

    db::new_deck(&deck.name, conn)?;
    for card in &deck.cards {
        // Imported cards get fresh ids; their review state carries over
        let id = db::add_card(&deck.name, &card.front, &card.back, conn)?;
        db::update_review_state(id, &card.review, conn)?;
    }

    println!(
        "Deck '{}' imported with {} cards.",
        deck.name,
        deck.cards.len()
    );
    Ok(())
}
