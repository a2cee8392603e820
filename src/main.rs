mod app;
mod backend;
mod config;
mod constants;
mod dialog;
mod input;
mod pager;
mod scene;
mod ui;

use anyhow::Result;
use clap::Parser;
use directories::ProjectDirs;
use ratatui::{
  DefaultTerminal,
  crossterm::event::{self, Event, KeyEventKind},
};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use app::App;
use backend::HunterClient;
use config::Config;
use constants::constants;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
struct Args {
  /// Backend base URL (e.g. 'http://localhost:5000'); overrides config.toml
  #[arg(short, long)]
  backend: Option<String>,
}

// --- Logging ---

/// Route tracing output to a file under the platform data dir — the TUI owns
/// stdout. The returned appender guard must stay alive for the whole run.
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
  let proj_dirs = ProjectDirs::from("", "", "hunt")?;
  let log_dir = proj_dirs.data_dir();
  std::fs::create_dir_all(log_dir).ok()?;
  let appender = tracing_appender::rolling::never(log_dir, &constants().log_file);
  let (writer, guard) = tracing_appender::non_blocking(appender);
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(writer)
    .with_ansi(false)
    .init();
  Some(guard)
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();
  let _log_guard = init_logging();

  // Config is fully resolved before the client exists, so every request
  // targets the configured host from the first tick.
  let base_url = args.backend.unwrap_or_else(|| Config::load().base_url());
  let client = HunterClient::new(base_url);
  info!(base_url = %client.base_url(), "starting");

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::init();
  let result = run(&mut terminal, client).await;
  ratatui::restore();
  result
}

async fn run(terminal: &mut DefaultTerminal, client: HunterClient) -> Result<()> {
  let mut app = App::new(client);

  loop {
    app.check_pending();
    app.expire_notices();

    terminal.draw(|frame| ui::ui(frame, &mut app))?;

    if event::poll(Duration::from_millis(100))? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
          input::handle_key_event(&mut app, key);
        }
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }
  Ok(())
}
