use clap::{ArgAction, Parser};
use commander::config::Config;
use commander::input::{self, Action};
use commander::io::{spawn_worker, MemoryStore, Request};
use commander::model::{Host, Prompter, TerminalHost};
use commander::state::history::HistoryAction;
use commander::state::{NavigationHistory, PersistedNavigation};
use commander::{view, Commander};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[command(name = "commander", about, version)]
struct Args {
    /// Bookmark file to work on
    #[arg(long, value_name = "FILE")]
    store: Option<PathBuf>,

    /// Load configuration from a specific file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Where navigation state is saved between sessions
    #[arg(long, value_name = "FILE")]
    state: Option<PathBuf>,

    /// Ignore the saved navigation state and start at the root
    #[arg(long)]
    fresh: bool,

    /// Write a default config file and exit
    #[arg(long)]
    init_config: bool,

    /// Increase logging verbosity (repeat for more detail)
    #[arg(short = 'v', action = ArgAction::Count)]
    verbosity: u8,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn save_state(state: &PersistedNavigation, path: Option<&PathBuf>) {
    if let Some(path) = path {
        if let Err(e) = state.save(path) {
            log::warn!("Failed to save navigation state: {}", e);
        }
    }
}

/// Commit debounced history entries and persist each one as it lands.
async fn flush_history(history: Arc<Mutex<NavigationHistory>>, path: Option<PathBuf>, period: Duration) {
    let mut tick = tokio::time::interval(period);
    loop {
        tick.tick().await;
        let committed = history.lock().poll(Instant::now());
        match committed {
            Some(HistoryAction::Replace(state)) | Some(HistoryAction::Push(state)) => {
                log::debug!("history committed {:?}", state);
                save_state(&state, path.as_ref());
            }
            None => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbosity);

    if args.init_config {
        match Config::create_default()? {
            Some(path) => println!("{}", path.display()),
            None => eprintln!("Could not determine config directory"),
        }
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    if let Some(path) = args.store {
        config.store.path = Some(path);
    }

    let store = match config.store_path() {
        Some(path) => MemoryStore::open(&path)?,
        None => {
            log::warn!("No data directory; bookmarks will not be saved");
            MemoryStore::new()
        }
    };

    let state_path = args.state.or_else(Config::state_path);
    let persisted = match (&state_path, args.fresh) {
        (Some(path), false) => PersistedNavigation::load(path),
        _ => PersistedNavigation::default(),
    };

    let prompter = Arc::new(Prompter::stdin());
    let host = Arc::new(TerminalHost::new(prompter.clone()));
    let debounce = Duration::from_millis(config.history.debounce_ms.max(1));

    let mut commander = Commander::new(Arc::new(store), host.clone(), config);
    commander.start(&persisted).await;
    let queue = spawn_worker(commander);

    let history = Arc::new(Mutex::new(NavigationHistory::new(debounce)));
    tokio::spawn(flush_history(history.clone(), state_path.clone(), debounce));

    let Some(reply) = queue.send(Request::Show).await else {
        return Ok(());
    };
    let mut frame = reply.frame;
    history.lock().record(frame.snapshot.clone(), Instant::now());
    println!("{}", view::window_title(&frame));
    print!("{}", view::render(&frame));

    while let Some(line) = prompter.read_line(&view::prompt(&frame)).await {
        let action = match input::parse_line(&line, &frame) {
            Ok(Some(action)) => action,
            Ok(None) => continue,
            Err(e) => {
                host.notify(&e.to_string());
                continue;
            }
        };

        let request = match action {
            Action::Quit => break,
            Action::Help => {
                print!("{}", view::help());
                continue;
            }
            Action::Back => match history.lock().back() {
                Some(state) => Request::Restore(state),
                None => continue,
            },
            Action::Forward => match history.lock().forward() {
                Some(state) => Request::Restore(state),
                None => continue,
            },
            Action::Request(request) => request,
        };

        let Some(reply) = queue.send(request).await else {
            break;
        };
        frame = reply.frame;
        history.lock().record(frame.snapshot.clone(), Instant::now());
        println!("{}", view::window_title(&frame));
        print!("{}", view::render(&frame));
    }

    save_state(&frame.snapshot, state_path.as_ref());
    Ok(())
}
