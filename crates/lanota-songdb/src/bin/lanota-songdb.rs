use clap::{Parser, Subcommand};
use std::path::PathBuf;

use lanota_core::search::{find_songs, SearchOutcome, DEFAULT_MAX_DISPLAY};
use lanota_songdb::{AliasRemoval, AliasStore, AliasWrite, SongDb, ALIASES_FILE, SONGS_FILE};
use models::Song;

#[derive(Parser, Debug)]
#[command(name = "lanota-songdb")]
#[command(about = "Lanota song catalog inspection and alias administration", long_about = None)]
struct Args {
    /// Directory holding lanota_songs.json and lanota_aliases.json
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Catalog totals per category
    Stats,
    /// Look a song up by chapter code, id, alias, or title
    Find { term: String },
    /// Alias administration
    Alias {
        #[command(subcommand)]
        action: AliasAction,
    },
}

#[derive(Subcommand, Debug)]
enum AliasAction {
    /// Register an alias for the song the term resolves to
    Add { alias: String, term: String },
    /// Remove an alias wherever it is registered
    Del { alias: String },
    /// List a song's aliases
    Show { term: String },
}

fn main() -> eyre::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lanota_songdb=info".into()),
        )
        .init();

    let args = Args::parse();
    let db = SongDb::load_or_empty(&args.data_dir.join(SONGS_FILE));
    let store = AliasStore::new(args.data_dir.join(ALIASES_FILE));

    match args.command {
        Command::Stats => {
            println!("total songs: {}", db.len());
            for (category, count) in db.category_counts() {
                println!("  {category}: {count}");
            }
        }
        Command::Find { term } => {
            let aliases = store.load();
            let outcome = find_songs(&term, db.songs(), &aliases, DEFAULT_MAX_DISPLAY);
            match outcome.tier {
                None => println!("no song matches [{term}]"),
                Some(tier) => {
                    println!("[{tier}] match, {} song(s):", outcome.total);
                    print_matches(&outcome);
                }
            }
        }
        Command::Alias { action } => run_alias(&db, &store, action)?,
    }

    Ok(())
}

fn run_alias(db: &SongDb, store: &AliasStore, action: AliasAction) -> eyre::Result<()> {
    match action {
        AliasAction::Add { alias, term } => {
            let Some(song) = resolve_single(db, store, &term) else {
                return Ok(());
            };
            let title = song.title.clone();
            match store.add_alias(db, &title, &alias)? {
                AliasWrite::Added { title } => println!("added alias [{alias}] for [{title}]"),
                AliasWrite::IsCanonicalTitle => {
                    println!("[{alias}] is a song's canonical title and cannot be an alias")
                }
                AliasWrite::UsedBy { title } => {
                    println!("alias [{alias}] is already used by [{title}]")
                }
                AliasWrite::AlreadyPresent { .. } => println!("alias [{alias}] already exists"),
            }
        }
        AliasAction::Del { alias } => match store.remove_alias(&alias)? {
            AliasRemoval::Removed { title } => {
                println!("removed alias [{alias}] from [{title}]")
            }
            AliasRemoval::NotFound => println!("alias [{alias}] not found"),
        },
        AliasAction::Show { term } => {
            let Some(song) = resolve_single(db, store, &term) else {
                return Ok(());
            };
            let aliases = store.load();
            let list = aliases.aliases_for(&song.title);
            if list.is_empty() {
                println!("[{}] has no aliases", song.title);
            } else {
                println!("aliases of [{}] ({}):", song.title, list.len());
                for (i, alias) in list.iter().enumerate() {
                    println!("  {}. {alias}", i + 1);
                }
            }
        }
    }
    Ok(())
}

/// Resolve a term to exactly one song, printing the ambiguity or the miss
/// otherwise.
fn resolve_single<'a>(db: &'a SongDb, store: &AliasStore, term: &str) -> Option<&'a Song> {
    let aliases = store.load();
    let outcome = find_songs(term, db.songs(), &aliases, DEFAULT_MAX_DISPLAY);
    if outcome.is_empty() {
        println!("no song matches [{term}]");
        return None;
    }
    if outcome.total > 1 {
        println!(
            "[{term}] is ambiguous ({} matches); use a chapter code, id, or exact title:",
            outcome.total
        );
        print_matches(&outcome);
        return None;
    }
    outcome.matches.into_iter().next()
}

fn print_matches(outcome: &SearchOutcome<'_>) {
    for (i, song) in outcome.matches.iter().enumerate() {
        println!(
            "  {}. {} (chapter: {}, id: {})",
            i + 1,
            song.title,
            song.chapter,
            song.id
        );
    }
    if outcome.total > outcome.matches.len() {
        println!("  ... {} in total", outcome.total);
    }
}
