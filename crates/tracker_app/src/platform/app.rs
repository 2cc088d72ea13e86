use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use anyhow::{Context, Result};
use tracker_core::{update, ListState, Msg};
use tracker_engine::ensure_state_dir;
use tracker_logging::{tracker_debug, tracker_info, tracker_warn};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::persistence;
use super::ui;

pub struct LaunchOptions {
    pub config_path: PathBuf,
    /// Overrides the saved location when present.
    pub location: Option<String>,
    pub log: LogDestination,
}

/// Everything the main loop reacts to: list messages from the console or the
/// engine, plus front-end control.
#[derive(Debug)]
pub enum AppMsg {
    List(Msg),
    Show,
    Help,
    Invalid(String),
    Quit,
}

pub fn run_app(options: LaunchOptions) -> Result<()> {
    logging::initialize(options.log);

    let config = AppConfig::load(&options.config_path)?;
    ensure_state_dir(&config.state_dir)
        .with_context(|| format!("prepare state dir {}", config.state_dir.display()))?;

    let location = options
        .location
        .or_else(|| persistence::load_location(&config.state_dir))
        .unwrap_or_default();
    tracker_info!("Starting with location {:?}", location);

    let (msg_tx, msg_rx) = mpsc::channel::<AppMsg>();
    let runner = EffectRunner::new(config.api_settings(), config.state_dir.clone(), msg_tx.clone())?;
    spawn_input_reader(msg_tx.clone());

    let mut app = App {
        state: ListState::from_query_string(&location).with_debounce(config.debounce()),
        runner,
    };
    print_lines(&[ui::commands::USAGE.to_string()]);
    app.dispatch(Msg::Mounted);

    while let Ok(msg) = msg_rx.recv() {
        match msg {
            AppMsg::List(msg) => app.dispatch(msg),
            AppMsg::Show => print_lines(&ui::render::render(&app.state.view())),
            AppMsg::Help => print_lines(&[ui::commands::USAGE.to_string()]),
            AppMsg::Invalid(reason) => print_lines(&[format!("? {reason}")]),
            AppMsg::Quit => break,
        }
    }

    tracker_info!("Shutting down");
    Ok(())
}

struct App {
    state: ListState,
    runner: EffectRunner,
}

impl App {
    fn dispatch(&mut self, msg: Msg) {
        tracker_debug!("dispatch {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);

        if self.state.consume_dirty() {
            print_lines(&ui::render::render(&self.state.view()));
        }
    }
}

fn spawn_input_reader(msg_tx: mpsc::Sender<AppMsg>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    tracker_warn!("stdin read failed: {}", err);
                    break;
                }
            };
            let msg = match ui::commands::parse_command(&line) {
                Ok(ui::commands::Command::List(msg)) => AppMsg::List(msg),
                Ok(ui::commands::Command::Show) => AppMsg::Show,
                Ok(ui::commands::Command::Help) => AppMsg::Help,
                Ok(ui::commands::Command::Quit) => AppMsg::Quit,
                Err(reason) => AppMsg::Invalid(reason),
            };
            if msg_tx.send(msg).is_err() {
                return;
            }
        }
        let _ = msg_tx.send(AppMsg::Quit);
    });
}

fn print_lines(lines: &[String]) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    for line in lines {
        if writeln!(out, "{line}").is_err() {
            return;
        }
    }
    let _ = writeln!(out);
    let _ = out.flush();
}
