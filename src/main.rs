// ABOUTME: Main entry point for fieldvisit with TUI and CLI support
//
// Binary: fieldvisit
// Usage: fieldvisit [COMMAND]
// - No command: launches TUI
// - tui: launch TUI, optionally on a form with the guided tour running
// - steps: print the guided tour steps for a screen and role
// - config: print the effective configuration

#![allow(missing_docs)]

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::Backend, prelude::*, Terminal};
use std::{
    io::{self, IsTerminal},
    time::{Duration, Instant},
};

use fieldvisit::app::{state::View, App, EventHandler};
use fieldvisit::cli::{self, Screen, TuiArgs};
use fieldvisit::components::LayoutComponent;
use fieldvisit::config::AppConfig;

/// Terminal cleanup utility to ensure proper restoration
fn cleanup_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

fn cleanup_terminal_with_instance<B: Backend + std::io::Write>(
    terminal: &mut Terminal<B>,
) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();
    setup_panic_handler();

    let args = cli::Cli::parse();

    let result = match args.command {
        Some(cli::Commands::Steps(steps_args)) => cli::steps::execute(steps_args, args.format),
        Some(cli::Commands::Config) => cli::config::execute(args.format),
        Some(cli::Commands::Tui(tui_args)) => launch_tui(tui_args).await,
        None => launch_tui(TuiArgs::default()).await,
    };

    if result.is_err() {
        cleanup_terminal();
    }

    result
}

async fn launch_tui(args: TuiArgs) -> Result<()> {
    let mut config = AppConfig::load()?;
    if let Some(role) = args.role {
        config.role = role;
    }
    tracing::info!(role = ?config.role, "Starting fieldvisit");

    let tick_rate = config.ui.tick_rate;
    let mut app = App::new(config);
    let mut layout = LayoutComponent::new();

    if let Some(screen) = args.screen {
        let view = match screen {
            Screen::Order => View::Order,
            Screen::Report => View::Report,
        };
        if args.tour {
            app.state.open_with_tour(view, Instant::now());
        } else {
            app.state.open_view(view);
        }
    }

    // Flush any pending terminal events so stray keypresses don't reach the first view
    while event::poll(Duration::from_millis(10)).unwrap_or(false) {
        let _ = event::read();
    }

    run_tui(&mut app, &mut layout, tick_rate).await
}

async fn run_tui(app: &mut App, layout: &mut LayoutComponent, tick_rate: Duration) -> Result<()> {
    if !IsTerminal::is_terminal(&io::stdout()) {
        return Err(anyhow::anyhow!(
            "No TTY detected. This application requires a terminal.\n\
             Try running directly in a terminal instead of redirecting output."
        ));
    }

    if let Err(e) = crossterm::terminal::is_raw_mode_enabled() {
        eprintln!("Cannot check terminal raw mode: {}", e);
        return Err(anyhow::anyhow!("Terminal not compatible: {}", e));
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_tui_loop(app, layout, &mut terminal, tick_rate).await;

    if let Err(e) = cleanup_terminal_with_instance(&mut terminal) {
        tracing::error!("Failed to cleanup terminal: {}", e);
        cleanup_terminal();
    }

    result
}

async fn run_tui_loop(
    app: &mut App,
    layout: &mut LayoutComponent,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    tick_rate: Duration,
) -> Result<()> {
    let mut last_tick = Instant::now();

    // Ignore key events briefly after startup so buffered keys don't trigger actions
    let startup_time = Instant::now();
    const STARTUP_GUARD_MS: u64 = 100;

    loop {
        terminal.draw(|frame| {
            layout.render(frame, &mut app.state);
        })?;

        let timeout = tick_rate.checked_sub(last_tick.elapsed()).unwrap_or(Duration::ZERO);

        if event::poll(timeout)? {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind != KeyEventKind::Press {
                    continue;
                }
                if startup_time.elapsed() < Duration::from_millis(STARTUP_GUARD_MS) {
                    tracing::debug!(
                        "Ignoring key event {:?} during startup guard period",
                        key_event.code
                    );
                    continue;
                }

                if let Some(app_event) = EventHandler::handle_key_event(key_event, &mut app.state) {
                    EventHandler::process_event(app_event, &mut app.state);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }

        // Let spawned locate jobs make progress between frames
        tokio::task::yield_now().await;

        if app.state.should_quit {
            break;
        }
    }

    Ok(())
}

fn setup_logging() {
    use std::fs::OpenOptions;
    use tracing_subscriber::prelude::*;

    let log_dir = match AppConfig::data_dir() {
        Ok(dir) => dir.join("logs"),
        Err(_) => std::path::PathBuf::from(".fieldvisit/logs"),
    };

    let _ = std::fs::create_dir_all(&log_dir);

    let log_file = log_dir.join(format!(
        "fieldvisit-{}.jsonl",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));

    // The TUI owns stdout, so without a log file we run unlogged
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_file) else {
        return;
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_writer(file)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fieldvisit=info".into()),
        )
        .init();
}

fn setup_panic_handler() {
    use tracing::error;

    std::panic::set_hook(Box::new(|panic_info| {
        // Restore the terminal before reporting
        cleanup_terminal();

        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs for more details.");
    }));
}
