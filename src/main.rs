use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;
use tagcache_sync::{import, CatalogStore, Field, ImportOptions, Ledger};

/// Inspect a tagcache database and import play counts from a scrobble export.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Directory containing database_idx.tcd and the database_<n>.tcd string tables
    #[arg(long)]
    dbdir: PathBuf,

    /// Semicolon-delimited scrobble export (Artist; Album; Track)
    #[arg(long)]
    lastfm: Option<PathBuf>,

    /// Print the database header and exit
    #[arg(short = 'I', long)]
    info: bool,

    /// Print tracks whose match key contains TEXT
    #[arg(long, value_name = "TEXT")]
    find: Option<String>,

    /// Print every entry
    #[arg(short = 'L', long)]
    list_tracks: bool,

    /// Merge ledger play counts into the database
    #[arg(long, requires = "lastfm")]
    import_counts: bool,

    /// Run the import without writing any file
    #[arg(long)]
    dry_run: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let mut clog = colog::default_builder();
    clog.filter(None, level);
    clog.init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> tagcache_sync::Result<()> {
    let mut store = CatalogStore::open(&args.dbdir)?;

    println!("File: {}", store.index_path().display());
    println!("{}", store.header);

    if args.info {
        return Ok(());
    }

    let ledger = args.lastfm.as_ref().map(|path| Ledger::from_path(path)).transpose()?;
    if let Some(ledger) = &ledger {
        println!(
            "LastFM tracks: {}, artists: {}, albums: {}",
            ledger.len(),
            ledger.artist_count(),
            ledger.album_count()
        );
    }

    if args.list_tracks {
        for entry in store.entries() {
            let entry = entry?;
            let text = |f| entry.text(f).unwrap_or_default();
            let number = |f| entry.number(f).unwrap_or_default();
            println!(
                "{} - {}- {} - {:02} - {} - {}, {}",
                text(Field::Artist),
                number(Field::Year),
                text(Field::Album),
                number(Field::TrackNo),
                text(Field::Title),
                number(Field::LastPlayed),
                number(Field::PlayTime)
            );
        }
        return Ok(());
    }

    if let Some(query) = &args.find {
        for track in store.find(query)? {
            println!("{}", track);
        }
        return Ok(());
    }

    if args.import_counts {
        let Some(ledger) = &ledger else {
            return Ok(());
        };
        let report = import(&mut store, ledger, ImportOptions::default())?;
        for change in &report.changes {
            println!("{}", change);
        }
        println!("Import: Done {} Missing {}", report.done, report.missing);

        if args.dry_run {
            println!("Dry run: no files written");
            return Ok(());
        }

        let commit = store.commit();
        for path in &commit.written {
            println!("Wrote {}", path.display());
        }
        let mut failed = commit.failed.into_iter();
        if let Some((_, first)) = failed.next() {
            for (path, err) in failed {
                eprintln!("Failed to write {}: {}", path.display(), err);
            }
            return Err(first);
        }
    }

    Ok(())
}
