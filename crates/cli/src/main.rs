use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use cli::console::Console;
use cli::presenter::{self, Palette, TerminalPresenter};
use cli::review::{self, ReviewExit, ReviewOptions};
use curator_core::config::{self, AppConfig};
use curator_core::{
    navigator, Decision, EmptyCause, Ledger, LedgerError, LedgerStore, Record, Session,
    SessionView, Status, Summary,
};
use std::io::{self, Write};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let cfg = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Init { json } => run_init(cfg, json),
        Commands::Review {
            start,
            auto_advance,
        } => run_review(cfg, start, auto_advance),
        Commands::Summary { json } => run_summary(cfg, json),
        Commands::Set { index, decision } => run_set(cfg, index, decision),
        Commands::List { status, json } => run_list(cfg, status, json),
        Commands::Show { index } => run_show(cfg, index),
    }
}

#[derive(Parser)]
#[command(name = "curator")]
#[command(about = "Review a directory of images as keep/remove/unsure", long_about = None)]
struct Cli {
    /// Path to config file (INI or TOML)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Debug logging on stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the ledger from the source directory, or load the existing one
    Init {
        /// Output JSON summary
        #[arg(long)]
        json: bool,
    },
    /// Step through records interactively
    Review {
        /// Start at this index instead of the first unassigned record
        #[arg(long)]
        start: Option<usize>,
        /// Move to the next record after each decision
        #[arg(long, default_value_t = false)]
        auto_advance: bool,
    },
    /// Count records per status
    Summary {
        /// Output JSON summary
        #[arg(long)]
        json: bool,
    },
    /// Set one record's status and save
    Set {
        /// Record index (0-based)
        index: usize,
        /// keep|remove|unsure
        decision: Decision,
    },
    /// List records, optionally filtered by status
    List {
        /// keep|remove|unsure|unassigned
        #[arg(long)]
        status: Option<Status>,
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the record table around an index
    Show {
        /// Centre index; defaults to the first unassigned record
        #[arg(long)]
        index: Option<usize>,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_existing(cfg: &AppConfig) -> Result<(LedgerStore, Ledger)> {
    let store = LedgerStore::from_config(cfg);
    if !store.exists() {
        return Err(anyhow!(
            "no ledger at {}; run `curator init` first",
            store.path().display()
        ));
    }
    let ledger = store.load()?;
    Ok((store, ledger))
}

fn print_summary(summary: &Summary) {
    println!(
        "total {}: keep {}, remove {}, unsure {}, unassigned {}",
        summary.total, summary.keep, summary.remove, summary.unsure, summary.unassigned
    );
}

fn run_init(cfg: AppConfig, json: bool) -> Result<()> {
    let store = LedgerStore::from_config(&cfg);
    let existed = store.exists();
    let source = cfg.source_dir();
    let ledger = store
        .initialize(&source)
        .with_context(|| format!("initialize ledger from {}", source.display()))?;
    let summary = ledger.summary();
    if json {
        let out = serde_json::json!({
            "status": "ok",
            "ledger": store.path(),
            "created": !existed,
            "summary": summary,
            "first_unassigned": ledger.first_unassigned(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let verb = if existed { "loaded" } else { "created" };
        println!("{} {}", verb, store.path().display());
        print_summary(&summary);
    }
    Ok(())
}

fn run_review(cfg: AppConfig, start: Option<usize>, auto_advance: bool) -> Result<()> {
    let store = LedgerStore::from_config(&cfg);
    let source = cfg.source_dir();
    let opened = match start {
        Some(index) => Session::open_at(store, &source, index),
        None => Session::open(store, &source),
    };
    let mut session = opened.map_err(|e| match e {
        LedgerError::EmptyLedger(EmptyCause::AllReviewed) => {
            anyhow!("every record is reviewed; pass --start N to revisit one")
        }
        other => other.into(),
    })?;

    let mut console = Console::stdout();
    session.subscribe(Box::new(TerminalPresenter::new(
        console.clone(),
        Palette::from_accent(&cfg.display.accent),
        cfg.display.window,
    )));
    writeln!(console, "h for help")?;
    session.refresh();

    let stdin = io::stdin();
    let report = review::run(
        &mut session,
        stdin.lock(),
        &mut console,
        ReviewOptions { auto_advance },
    )?;
    let exit = match report.exit {
        ReviewExit::Quit => "quit",
        ReviewExit::Discarded => "discarded unsaved changes",
        ReviewExit::EndOfInput => "end of input",
    };
    println!("{} after {} decisions", exit, report.decisions);
    print_summary(&session.ledger().summary());
    Ok(())
}

fn run_summary(cfg: AppConfig, json: bool) -> Result<()> {
    let (_, ledger) = load_existing(&cfg)?;
    let summary = ledger.summary();
    if json {
        let out = serde_json::json!({
            "summary": summary,
            "reviewed": summary.reviewed(),
            "first_unassigned": ledger.first_unassigned(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_summary(&summary);
        match ledger.first_unassigned() {
            Some(i) => println!("next unassigned: {}", i),
            None => println!("all records reviewed"),
        }
    }
    Ok(())
}

fn run_set(cfg: AppConfig, index: usize, decision: Decision) -> Result<()> {
    let (store, mut ledger) = load_existing(&cfg)?;
    let before = ledger.set_status(index, decision)?;
    store.save(&ledger)?;
    let record = ledger.get(index)?;
    println!("{} {}: {} -> {}", index, record.path, before, decision);
    Ok(())
}

fn run_list(cfg: AppConfig, status: Option<Status>, json: bool) -> Result<()> {
    let (_, ledger) = load_existing(&cfg)?;
    let indices = match status {
        Some(s) => ledger.indices_with(s),
        None => (0..ledger.len()).collect(),
    };
    let rows: Vec<(usize, &Record)> = indices
        .into_iter()
        .map(|i| (i, &ledger.records()[i]))
        .collect();
    if json {
        let out: Vec<serde_json::Value> = rows
            .iter()
            .map(|(i, r)| {
                serde_json::json!({
                    "index": i,
                    "status": r.status(),
                    "path": r.path,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for (i, r) in rows {
            println!("{:>5}  {:<10}  {}", i, r.status().to_string(), r.path);
        }
    }
    Ok(())
}

fn run_show(cfg: AppConfig, index: Option<usize>) -> Result<()> {
    let (_, ledger) = load_existing(&cfg)?;
    let cursor = match index {
        Some(i) => navigator::jump(i, ledger.len())?,
        None => navigator::init(&ledger).unwrap_or(0),
    };
    let palette = Palette::from_accent(&cfg.display.accent);
    let view = SessionView {
        ledger: &ledger,
        cursor,
        dirty: false,
        last_saved: None,
    };
    let mut out = io::stdout().lock();
    presenter::render_header(&mut out, &view, &palette)?;
    presenter::render_window(&mut out, &ledger, cursor, cfg.display.window, &palette)?;
    Ok(())
}
