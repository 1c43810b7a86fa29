//! `quotes` command-line front end

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use quote_composition::Resolution;
use quote_core::{
    init_logging, render_conflicts, AppError, LogOptions, QuoteApp, QuoteConfig, DEFAULT_EXPORT_FILE,
};
use quote_model::CategoryFilter;
use quote_store::AddPolicy;
use quote_sync::{AutoSync, PendingResolution, SyncEngine, SyncEvent, SyncReport, SyncStep};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};

fn resolve_arg() -> Arg {
    Arg::new("resolve")
        .long("resolve")
        .value_parser(["server", "local", "merge"])
        .help("Apply this resolution instead of prompting when conflicts are found")
}

fn cli() -> Command {
    Command::new("quotes")
        .version(quote_core::VERSION)
        .about("Dynamic quote generator with server sync")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Configuration file (defaults to $QUOTES_CONFIG)"),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Directory holding stored quotes"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging"),
        )
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log as JSON lines"),
        )
        .subcommand(
            Command::new("show")
                .about("Show a random quote")
                .arg(
                    Arg::new("category")
                        .long("category")
                        .short('c')
                        .help("Select this category first (\"All\" clears the filter)"),
                ),
        )
        .subcommand(
            Command::new("add")
                .about("Add a quote")
                .arg(Arg::new("text").required(true).help("Quote text"))
                .arg(Arg::new("category").required(true).help("Quote category"))
                .arg(
                    Arg::new("allow-duplicates")
                        .long("allow-duplicates")
                        .action(ArgAction::SetTrue)
                        .help("Add even if the exact quote already exists"),
                ),
        )
        .subcommand(Command::new("categories").about("List categories"))
        .subcommand(
            Command::new("filter")
                .about("Show or select the category filter")
                .arg(Arg::new("name").help("Category to select (\"All\" clears the filter)")),
        )
        .subcommand(
            Command::new("export")
                .about("Export quotes as JSON")
                .arg(
                    Arg::new("path")
                        .default_value(DEFAULT_EXPORT_FILE)
                        .value_parser(value_parser!(PathBuf))
                        .help("Output file"),
                ),
        )
        .subcommand(
            Command::new("import")
                .about("Import quotes from a JSON file")
                .arg(
                    Arg::new("path")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON array of {text, category} objects"),
                ),
        )
        .subcommand(
            Command::new("sync")
                .about("Sync with the server once")
                .arg(resolve_arg()),
        )
        .subcommand(
            Command::new("watch")
                .about("Auto-sync until interrupted")
                .arg(resolve_arg()),
        )
        .subcommand(Command::new("check").about("Check the server for new quotes without merging"))
        .subcommand(
            Command::new("session")
                .about("Show the current session")
                .arg(
                    Arg::new("end")
                        .long("end")
                        .action(ArgAction::SetTrue)
                        .help("End the session and clear it"),
                ),
        )
        .subcommand(Command::new("status").about("Show storage and filter status"))
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_logging(LogOptions {
        verbose: matches.get_flag("verbose"),
        json: matches.get_flag("log-json"),
    });

    match run(&matches).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = e.downcast_ref::<AppError>().map_or(1, AppError::exit_code);
            eprintln!("Error: {e:#}");
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}

async fn run(matches: &ArgMatches) -> anyhow::Result<()> {
    let mut config = QuoteConfig::discover(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;
    if let Some(dir) = matches.get_one::<PathBuf>("data-dir") {
        config = config.with_data_dir(dir.clone());
    }
    let mut app = QuoteApp::open(config);

    match matches.subcommand() {
        None => println!("{}", app.show_random()),
        Some(("show", args)) => {
            if let Some(category) = args.get_one::<String>("category") {
                app.select_filter(CategoryFilter::category(category.as_str()))?;
            }
            println!("{}", app.show_random());
        }
        Some(("add", args)) => {
            let text = args.get_one::<String>("text").map_or("", String::as_str);
            let category = args.get_one::<String>("category").map_or("", String::as_str);
            let quote = if args.get_flag("allow-duplicates") {
                app.add_quote_with(text, category, AddPolicy::AllowDuplicates)?
            } else {
                app.add_quote(text, category)?
            };
            println!("Added {quote}");
            println!("Filter set to \"{}\".", app.filter());
        }
        Some(("categories", _)) => {
            let selected = app.filter().label().to_string();
            for category in app.categories().iter() {
                let marker = if *category == selected { '*' } else { ' ' };
                println!("{marker} {category}");
            }
        }
        Some(("filter", args)) => {
            if let Some(name) = args.get_one::<String>("name") {
                app.select_filter(CategoryFilter::category(name.as_str()))?;
            }
            println!("Filter: {}", app.filter());
        }
        Some(("export", args)) => {
            let path = args
                .get_one::<PathBuf>("path")
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_FILE));
            let count = app.export_to(&path)?;
            println!("Exported {count} quotes to {}", path.display());
        }
        Some(("import", args)) => {
            let path = args
                .get_one::<PathBuf>("path")
                .context("import needs a file path")?;
            let summary = app.import_from(path)?;
            println!("Quotes imported successfully! ({} added)", summary.accepted);
            if summary.rejected > 0 {
                println!("Skipped {} invalid entries.", summary.rejected);
            }
        }
        Some(("sync", args)) => {
            let preset = parse_resolution(args)?;
            let engine = app.sync_engine();
            match engine.sync().await? {
                SyncStep::Synced(report) => print_report(&report),
                SyncStep::NeedsResolution(pending) => {
                    settle(&engine, &pending, preset).await?;
                }
            }
        }
        Some(("watch", args)) => watch(&app, parse_resolution(args)?).await?,
        Some(("check", _)) => {
            let fresh = app.sync_engine().check_for_new().await?;
            if fresh.is_empty() {
                println!("No new quotes on the server.");
            } else {
                println!("{} new quote(s) on the server:", fresh.len());
                for quote in &fresh {
                    println!("  {quote}");
                }
            }
        }
        Some(("session", args)) => {
            if args.get_flag("end") {
                app.end_session()?;
                println!("Session ended.");
            } else {
                print_session(&app);
            }
        }
        Some(("status", _)) => {
            let config = app.config();
            println!("Quotes:     {}", app.store().len());
            println!("Categories: {}", app.categories().suggestions().join(", "));
            println!("Filter:     {}", app.filter());
            println!("Data dir:   {}", config.storage.data_dir.display());
            println!("Server:     {}", config.remote.base_url);
            print_session(&app);
        }
        Some((other, _)) => anyhow::bail!("unknown command '{other}'"),
    }
    Ok(())
}

fn parse_resolution(args: &ArgMatches) -> anyhow::Result<Option<Resolution>> {
    args.get_one::<String>("resolve")
        .map(|name| name.parse::<Resolution>())
        .transpose()
        .map_err(Into::into)
}

fn print_session(app: &QuoteApp) {
    match app.session() {
        Some(session) => {
            println!("Session started {}", session.session_started_at.to_rfc3339());
            if let Some(quote) = session.last_viewed {
                println!("Last viewed: {quote}");
            }
        }
        None => println!("No active session."),
    }
}

fn print_report(report: &SyncReport) {
    match report.resolution {
        Some(resolution) => println!(
            "Resolved with '{resolution}': {} quotes ({} categories updated, {} added).",
            report.quote_count, report.categories_overwritten, report.appended
        ),
        None => println!("Synced {} quotes.", report.quote_count),
    }
    if report.used_fallback {
        println!("Server unreachable; fallback server quotes were used.");
    }
    if !report.pushed {
        println!("Changes saved locally but not confirmed by the server.");
    }
}

/// Ask on stdin until a valid resolution or a blank line
async fn prompt_resolution() -> anyhow::Result<Option<Resolution>> {
    let mut stdin = BufReader::new(tokio::io::stdin());
    loop {
        print!("Resolve with [s]erver, [l]ocal or [m]erge (blank cancels): ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line).await? == 0 {
            return Ok(None);
        }
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        match line.parse::<Resolution>() {
            Ok(resolution) => return Ok(Some(resolution)),
            Err(e) => println!("{e}"),
        }
    }
}

async fn settle(
    engine: &SyncEngine,
    pending: &PendingResolution,
    preset: Option<Resolution>,
) -> anyhow::Result<()> {
    for line in render_conflicts(&pending.conflicts) {
        println!("{line}");
    }
    let choice = match preset {
        Some(resolution) => Some(resolution),
        None => prompt_resolution().await?,
    };
    match choice {
        Some(resolution) => print_report(&engine.resolve(resolution).await?),
        None => {
            engine.abandon().await?;
            println!("Sync cancelled; local quotes unchanged.");
        }
    }
    Ok(())
}

async fn watch(app: &QuoteApp, preset: Option<Resolution>) -> anyhow::Result<()> {
    let engine = app.sync_engine();
    let intervals = app.config().auto_sync();
    let (auto, mut events) = AutoSync::start(engine.clone(), intervals);
    println!(
        "Auto-sync every {}s, new-quote check every {}s. Press Ctrl-C to stop.",
        intervals.sync_interval.as_secs(),
        intervals.check_interval.as_secs()
    );

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            _ = &mut ctrl_c => break,
            event = events.recv() => match event {
                None => break,
                Some(SyncEvent::Synced(report)) => print_report(&report),
                Some(SyncEvent::ConflictsDetected { .. }) => {
                    if let Some(pending) = engine.pending() {
                        settle(&engine, &pending, preset).await?;
                    }
                }
                Some(SyncEvent::NewQuotesAvailable(fresh)) => {
                    println!("{} new quote(s) available on the server.", fresh.len());
                }
                Some(SyncEvent::Skipped(reason)) => tracing::debug!(%reason, "scheduled sync skipped"),
                Some(SyncEvent::Failed(reason)) => eprintln!("Auto-sync failed: {reason}"),
            },
        }
    }

    auto.stop();
    println!("Auto-sync stopped.");
    Ok(())
}
