//! couchdeck - couch-friendly app launcher overlay.
//!
//! Runs the navigation core inside the terminal: crossterm events become the
//! core's raw input, a frame timer drives fades and deferred focus, and the
//! catalog file and the compositor's window list feed reloads and auto-hide.

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEventKind,
        KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use std::io;
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, Instant};

mod cli;
mod colors;
mod render;

use cli::{Cli, Commands};
use couchdeck_core::config::{Config, Directories};
use couchdeck_core::layout::{GridGeometry, LayoutParams, compute_layout, content_height, place};
use couchdeck_core::services::{
    Activator, AppInventory, FeedbackGate, InputFeedback, InputGrab, Notifier,
};
use couchdeck_core::{CellBox, GridView, LauncherEvent, ModalController, ModalPhase};
use couchdeck_tui::catalog::Catalog;
use couchdeck_tui::compositor::Compositor;
use couchdeck_tui::host::{StatusLine, TerminalGrab};
use couchdeck_tui::keys;
use couchdeck_tui::launcher::ProcessLauncher;
use couchdeck_tui::sound::SoundFeedback;
use couchdeck_tui::watcher::{CATALOG_DEBOUNCE, CatalogWatcher, spawn_catalog_watcher};
use render::Screen;

const FRAME_INTERVAL: Duration = Duration::from_millis(33);
const RUNNING_POLL_INTERVAL: Duration = Duration::from_secs(2);

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

fn setup_logging(debug_flag: bool, log_dir: &Path) {
    let level = if debug_flag { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let log_dir = if std::fs::create_dir_all(log_dir).is_ok() {
        log_dir.to_path_buf()
    } else {
        std::env::temp_dir()
    };

    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let log_filename = format!("couchdeck-{timestamp}.log");
    let log_path = log_dir.join(&log_filename);

    let symlink_path = log_dir.join("couchdeck.log");
    let _ = std::fs::remove_file(&symlink_path);
    let _ = std::os::unix::fs::symlink(&log_path, &symlink_path);

    let file_appender = tracing_appender::rolling::never(&log_dir, &log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    std::mem::forget(guard);

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true),
        )
        .with(filter)
        .init();
}

fn load_config(path: &Path) -> Config {
    match Config::load(path) {
        Ok(config) => {
            info!("Loaded config from {:?}", path);
            config
        }
        Err(e) => {
            warn!("Using default config, {:?} is invalid: {e}", path);
            Config::default()
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let dirs = Directories::new();

    setup_logging(cli.debug, &dirs.cache);

    let config_path = cli.config.unwrap_or_else(|| dirs.config_file.clone());
    let catalog_path = cli.catalog.unwrap_or_else(|| dirs.catalog_file.clone());
    let config = load_config(&config_path);

    match cli.command {
        Some(Commands::Layout {
            width,
            height,
            count,
        }) => print_layout(&config, width, height, count)?,
        Some(Commands::Order) => print_order(&catalog_path)?,
        Some(Commands::Run) | None => run_launcher(config, &catalog_path).await?,
    }

    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LayoutReport {
    geometry: GridGeometry,
    content_height: f64,
    cells: Vec<CellBox>,
}

fn print_layout(config: &Config, width: f64, height: f64, count: usize) -> Result<()> {
    let geometry = compute_layout(&LayoutParams::from_config(&config.layout, width, height));
    let report = LayoutReport {
        geometry,
        content_height: content_height(&geometry, count),
        cells: (0..count).filter_map(|i| place(&geometry, i)).collect(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn print_order(catalog_path: &Path) -> Result<()> {
    let catalog = Catalog::load(catalog_path)
        .with_context(|| format!("Failed to load app catalog {}", catalog_path.display()))?;
    catalog.set_running(&Compositor::detect().running_app_ids());

    for entry in catalog.snapshot().ordered() {
        let mut flags = Vec::new();
        if entry.is_favorite {
            flags.push("favorite");
        }
        if entry.is_running() {
            flags.push("running");
        }
        println!("{:<24} {:<24} {}", entry.id, entry.display_name, flags.join(","));
    }
    Ok(())
}

/// Collaborators shared between the controller and the event loop
struct Host {
    catalog: Rc<Catalog>,
    compositor: Rc<Compositor>,
    status: Rc<StatusLine>,
    _watcher: Option<CatalogWatcher>,
}

fn build_controller(config: Config, host: &Host) -> ModalController {
    let sound: Rc<dyn InputFeedback> = Rc::new(SoundFeedback::detect());
    let feedback = Rc::new(FeedbackGate::new(sound, config.navigation.sound_feedback));

    let inventory: Rc<dyn AppInventory> = host.catalog.clone();
    let activator: Rc<dyn Activator> = Rc::new(ProcessLauncher::new(
        Rc::clone(&host.compositor),
        Rc::clone(&host.catalog),
    ));
    let grid_feedback: Rc<dyn InputFeedback> = feedback.clone();
    let mut grid = GridView::new(
        config.layout.clone(),
        config.navigation.wrap,
        inventory,
        activator,
        grid_feedback,
    );
    grid.reload();

    let grab: Rc<dyn InputGrab> = Rc::new(TerminalGrab::default());
    let notifier: Rc<dyn Notifier> = host.status.clone();
    ModalController::new(config, grid, feedback, grab, notifier)
}

async fn run_launcher(config: Config, catalog_path: &Path) -> Result<()> {
    let catalog = Rc::new(
        Catalog::load(catalog_path)
            .with_context(|| format!("Failed to load app catalog {}", catalog_path.display()))?,
    );
    let compositor = Rc::new(Compositor::detect());
    catalog.set_running(&compositor.running_app_ids());

    let (reload_tx, reload_rx) = mpsc::unbounded_channel();
    let watcher = match spawn_catalog_watcher(catalog_path, CATALOG_DEBOUNCE, reload_tx) {
        Ok(watcher) => Some(watcher),
        Err(e) => {
            warn!("Catalog hot reload disabled: {e}");
            None
        }
    };

    let host = Host {
        catalog,
        compositor,
        status: Rc::new(StatusLine::default()),
        _watcher: watcher,
    };
    let start_shown = config.overlay.start_shown;
    let mut controller = build_controller(config, &host);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, &mut controller, &host, reload_rx, start_shown).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn is_quit(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(key)
            if key.kind == KeyEventKind::Press
                && key.code == KeyCode::Char('c')
                && key.modifiers.contains(KeyModifiers::CONTROL)
    )
}

fn is_animating(controller: &ModalController) -> bool {
    matches!(controller.phase(), ModalPhase::Showing | ModalPhase::Hiding)
}

fn body_of(width: u16, height: u16) -> Rect {
    Screen::split(Rect::new(0, 0, width, height)).body
}

fn resize(controller: &mut ModalController, body: Rect) {
    controller.handle_event(LauncherEvent::Resized {
        width: f64::from(body.width),
        height: f64::from(body.height),
    });
}

// Event loop - input, frame timer, catalog reloads and the running-app poll
#[allow(clippy::too_many_lines)]
async fn event_loop(
    terminal: &mut Tui,
    controller: &mut ModalController,
    host: &Host,
    mut reload_rx: mpsc::UnboundedReceiver<()>,
    start_shown: bool,
) -> Result<()> {
    let size = terminal.size()?;
    let mut body = body_of(size.width, size.height);
    resize(controller, body);

    let mut last_running = host.catalog.running_count();
    if start_shown {
        controller.show();
    }
    controller.handle_event(LauncherEvent::RunningCountChanged(last_running));

    let mut event_stream = EventStream::new();
    let mut frames = tokio::time::interval(FRAME_INTERVAL);
    let mut running_poll = tokio::time::interval(RUNNING_POLL_INTERVAL);
    running_poll.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut needs_render = true;
    let mut status_shown = false;

    loop {
        if needs_render {
            let status = host.status.current(Instant::now());
            terminal.draw(|f| render::draw(f, &*controller, status.as_ref()))?;
            needs_render = false;
        }

        tokio::select! {
            Some(event_result) = event_stream.next() => {
                let event = match event_result {
                    Ok(e) => e,
                    Err(e) => {
                        error!("Event stream error: {}", e);
                        continue;
                    }
                };

                if is_quit(&event) {
                    info!("Quit requested");
                    break;
                }

                if let Event::Resize(width, height) = event {
                    body = body_of(width, height);
                    resize(controller, body);
                } else if let Some(raw) = keys::map_event(&event, (body.x, body.y)) {
                    let outcome = controller.handle_event(LauncherEvent::Input(raw));
                    debug!("Input {:?} -> {:?}", raw, outcome);
                }
                needs_render = true;
            }

            _ = frames.tick() => {
                let was_animating = is_animating(controller);
                controller.handle_event(LauncherEvent::Frame);
                controller.handle_event(LauncherEvent::Tick(Instant::now()));

                let has_status = host.status.current(Instant::now()).is_some();
                if was_animating
                    || is_animating(controller)
                    || controller.pending_tasks() > 0
                    || has_status != status_shown
                {
                    needs_render = true;
                }
                status_shown = has_status;
            }

            Some(()) = reload_rx.recv() => {
                if let Err(e) = host.catalog.refresh() {
                    warn!("Keeping previous catalog: {e}");
                    host.status.notify_error("Catalog not reloaded", &e.to_string());
                } else {
                    controller.handle_event(LauncherEvent::InventoryChanged);
                }
                needs_render = true;
            }

            _ = running_poll.tick() => {
                let probe = *host.compositor;
                let ids = match tokio::task::spawn_blocking(move || probe.running_app_ids()).await {
                    Ok(ids) => ids,
                    Err(e) => {
                        warn!("Running app probe failed: {e}");
                        continue;
                    }
                };

                if host.catalog.set_running(&ids) {
                    controller.handle_event(LauncherEvent::InventoryChanged);
                    needs_render = true;
                }

                let count = host.catalog.running_count();
                if count != last_running {
                    last_running = count;
                    controller.handle_event(LauncherEvent::RunningCountChanged(count));
                    needs_render = true;
                }
            }
        }
    }

    Ok(())
}
