use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use scout_client::{BrowserNavigator, Endpoint, SearchClient, StreamController};
use scout_core::{
    ActionFeedback, AttemptOutcome, Effect, FilterMode, Navigator, SearchSession, SelectionStore,
    Snapshot, project,
};
use scout_cli::config::ScoutConfig;
use scout_cli::render::{self, LoadingIndicator, log_line, print_results};
use scout_cli::shell::{self, HELP, ShellCommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{Instrument, info, info_span, warn};

use crate::cli::{OnceArgs, SearchArgs};

/// Prints links instead of launching a browser (`open_links = false`).
struct EchoNavigator;

impl Navigator for EchoNavigator {
    fn dispatch(&self, target: &str) {
        println!("open {target}");
    }
}

fn navigator(config: &ScoutConfig) -> Result<Box<dyn Navigator>> {
    if config.open_links {
        Ok(Box::new(
            BrowserNavigator::from_current().context("start browser launcher")?,
        ))
    } else {
        Ok(Box::new(EchoNavigator))
    }
}

fn endpoint(config: &ScoutConfig) -> Result<Endpoint> {
    Endpoint::parse(&config.server_url).context("parse server url")
}

pub async fn run_search(args: &SearchArgs, config: &ScoutConfig) -> Result<i32> {
    let query = args.query_text();
    let mut controller = StreamController::new(endpoint(config)?);
    let attempt = controller.submit(&query).context("start search")?;
    follow(&mut controller, &query)
        .instrument(info_span!("search", %attempt))
        .await;

    let navigator = navigator(config)?;
    let session = controller.session_mut();
    if args.select_all {
        session.set_all_selected(true);
    }
    for &row in &args.select {
        if !select_row(session, row) {
            eprintln!("no row {row}");
        }
    }
    if args.save {
        println!("{}", session.save_selected());
    }
    if args.saved_only {
        session.set_filter(FilterMode::SavedOnly);
    }

    print_results(session);
    if args.open {
        println!("{}", session.open_selected(navigator.as_ref()));
    }
    if let Some(path) = &args.export {
        let path = path.as_deref().unwrap_or(config.export_path.as_path());
        let feedback = write_export(session, path)?;
        println!("{feedback} ({})", path.display());
    }
    if args.markdown {
        print_markdown(session);
    }
    Ok(exit_code(session))
}

/// Apply events until loading clears, echoing the step log.
async fn follow(controller: &mut StreamController, query: &str) {
    let indicator = LoadingIndicator::start(format!("searching for {query}"));
    controller
        .run_until_settled(|effect| match effect {
            Effect::Logged(entry) => indicator.println(&log_line(entry)),
            Effect::SnapshotReplaced { len } => {
                indicator.set_message(format!("searching for {query} ({len} results so far)"));
            }
            Effect::Loading(_) | Effect::CloseConnection => {}
        })
        .await;
    indicator.finish();
}

/// Select the visible row numbered `row` (1-based).
fn select_row(session: &mut SearchSession, row: usize) -> bool {
    let Some(identity) = row
        .checked_sub(1)
        .and_then(|index| session.rows().get(index).map(|r| r.identity.clone()))
    else {
        return false;
    };
    session.set_selected(identity, true);
    true
}

fn write_export(session: &SearchSession, path: &Path) -> Result<ActionFeedback> {
    let csv = session.export_csv().context("build csv export")?;
    std::fs::write(path, csv).with_context(|| format!("write {}", path.display()))?;
    info!(path = %path.display(), "exported results");
    Ok(ActionFeedback::Exported(session.rows().len()))
}

fn print_markdown(session: &SearchSession) {
    match session.attempt().result_markdown() {
        Some(markdown) if !markdown.trim().is_empty() => println!("\n{markdown}"),
        _ => println!("(no report)"),
    }
}

/// Non-zero unless the attempt completed or the server closed cleanly.
fn exit_code(session: &SearchSession) -> i32 {
    match session.attempt().outcome() {
        Some(AttemptOutcome::Completed | AttemptOutcome::Disconnected) => 0,
        Some(AttemptOutcome::Failed(_) | AttemptOutcome::TransportFailed(_)) => 1,
        None => {
            warn!("search stalled before a terminal message");
            1
        }
    }
}

pub async fn run_shell(config: &ScoutConfig) -> Result<()> {
    let navigator = navigator(config)?;
    let mut controller = StreamController::new(endpoint(config)?);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!(
        "opportunity-scout shell on {}. Type `help` for commands.",
        controller.endpoint().base()
    );
    prompt();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("read stdin")? else {
                    break;
                };
                match shell::parse(&line) {
                    Ok(Some(ShellCommand::Quit)) => break,
                    Ok(Some(command)) => execute(&mut controller, navigator.as_ref(), config, command),
                    Ok(None) => {}
                    Err(err) => eprintln!("{err}"),
                }
                prompt();
            }
            handled = controller.next() => {
                for effect in handled.effects() {
                    match effect {
                        Effect::Logged(entry) => println!("{}", log_line(entry)),
                        Effect::Loading(false) => {
                            print_results(controller.session());
                            prompt();
                        }
                        Effect::SnapshotReplaced { .. } | Effect::Loading(true) | Effect::CloseConnection => {}
                    }
                }
            }
        }
    }
    Ok(())
}

fn execute(
    controller: &mut StreamController,
    navigator: &dyn Navigator,
    config: &ScoutConfig,
    command: ShellCommand,
) {
    match command {
        ShellCommand::Search(query) => {
            if let Err(err) = controller.submit(&query) {
                eprintln!("error: {err}");
            }
        }
        ShellCommand::List => print_results(controller.session()),
        ShellCommand::Log => {
            let log = controller.session().log();
            if log.is_empty() {
                println!("(no steps)");
            }
            for entry in log {
                println!("{}", log_line(entry));
            }
        }
        ShellCommand::Toggle(indices) => {
            let session = controller.session_mut();
            for index in indices {
                if session.toggle_row(index).is_none() {
                    eprintln!("no row {}", index + 1);
                }
            }
            println!("{}", session.summary());
        }
        ShellCommand::ToggleAll => {
            let session = controller.session_mut();
            let all = session.all_selected();
            session.set_all_selected(!all);
            println!("{}", session.summary());
        }
        ShellCommand::ClearSelection => {
            let session = controller.session_mut();
            session.clear_selection();
            println!("{}", session.summary());
        }
        ShellCommand::Open => println!("{}", controller.session().open_selected(navigator)),
        ShellCommand::Save => println!("{}", controller.session_mut().save_selected()),
        ShellCommand::Export(path) => {
            let path = path.as_deref().unwrap_or(config.export_path.as_path());
            match write_export(controller.session(), path) {
                Ok(feedback) => println!("{feedback} ({})", path.display()),
                Err(err) => eprintln!("error: {err:#}"),
            }
        }
        ShellCommand::Filter(mode) => {
            let session = controller.session_mut();
            let mode = mode.unwrap_or_else(|| session.filter().toggled());
            session.set_filter(mode);
            print_results(session);
        }
        ShellCommand::Markdown => print_markdown(controller.session()),
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Quit => {}
    }
}

fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

pub async fn run_once(args: &OnceArgs, config: &ScoutConfig) -> Result<()> {
    let client = SearchClient::new(endpoint(config)?);
    let query = args.query.join(" ");
    let outcome = client.search(&query).await.context("one-shot search")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
        return Ok(());
    }
    for step in &outcome.steps {
        println!("- {step}");
    }
    let snapshot = Snapshot::new(outcome.opportunities);
    let rows = project(&snapshot, FilterMode::All, &SelectionStore::new());
    if rows.is_empty() {
        println!("(no results)");
    } else {
        println!("{}", render::results_table(&rows));
    }
    if !outcome.result_markdown.trim().is_empty() {
        println!("\n{}", outcome.result_markdown);
    }
    Ok(())
}

pub async fn run_health(config: &ScoutConfig) -> Result<i32> {
    let endpoint = endpoint(config)?;
    let base = endpoint.base().clone();
    let status = SearchClient::new(endpoint)
        .health()
        .await
        .with_context(|| format!("reach {base}"))?;
    println!("{base}: {}", status.status);
    Ok(if status.is_ok() { 0 } else { 1 })
}
