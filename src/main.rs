use clap::Parser;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};
use tagdan::app::{AppState, SessionOverrides, TaskRequest};
use tagdan::async_tasks::{AsyncTaskRunner, TaskMessage};
use tagdan::cli::Cli;
use tagdan::constants::{FRAME_DURATION_MS, MIN_TERMINAL_HEIGHT, MIN_TERMINAL_WIDTH};
use tagdan::error::{AppError, Result};
use tagdan::persistence::PersistenceManager;
use tagdan::types::Config;
use tagdan::ui::{self, InputHandler};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Validate CLI arguments
    cli.validate().map_err(AppError::InvalidInput)?;

    // Initialize logging if requested; the guard flushes on drop
    let _log_guard = match &cli.log_file {
        Some(log_file) => {
            let guard = init_logging(log_file)?;
            tracing::info!("=== tagdan starting ===");
            tracing::info!("Log file: {}", log_file);
            if let Some(dir) = &cli.data_dir {
                tracing::info!("Data directory override: {}", dir.display());
            }
            Some(guard)
        }
        None => None,
    };

    // Check terminal size
    let (width, height) = crossterm::terminal::size()?;
    if width < MIN_TERMINAL_WIDTH || height < MIN_TERMINAL_HEIGHT {
        tracing::error!(
            "Terminal too small: {}x{} (minimum: {}x{})",
            width,
            height,
            MIN_TERMINAL_WIDTH,
            MIN_TERMINAL_HEIGHT
        );
        return Err(AppError::TerminalTooSmall);
    }
    tracing::debug!("Terminal size: {}x{}", width, height);

    let app = initialize_app_state(&cli)?;

    // Setup terminal
    setup_terminal()?;
    tracing::debug!("Terminal setup completed");

    // Setup Ctrl-C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        tracing::info!("Ctrl-C received, shutting down");
        r.store(false, Ordering::SeqCst);
    })
    .map_err(|e| AppError::Other(format!("Failed to set Ctrl-C handler: {}", e)))?;

    // Run the application
    let result = run_app(app, running).await;

    // Cleanup terminal
    cleanup_terminal()?;
    tracing::debug!("Terminal cleanup completed");

    result
}

fn setup_terminal() -> Result<()> {
    enable_raw_mode()?;
    execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture, Hide)?;

    // Set panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = cleanup_terminal();
        original_hook(panic_info);
    }));

    Ok(())
}

fn cleanup_terminal() -> Result<()> {
    execute!(io::stdout(), Show, DisableMouseCapture, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

fn init_logging(log_file: &str) -> Result<WorkerGuard> {
    let path = Path::new(log_file);
    let file_name = path
        .file_name()
        .ok_or_else(|| AppError::InvalidInput(format!("Invalid log file path: {}", log_file)))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    // Start every session with an empty log
    std::fs::File::create(path)
        .map_err(|e| AppError::Other(format!("Failed to open log file: {}", e)))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(
        dir, file_name,
    ));
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tagdan=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| AppError::Other(format!("Failed to initialize logging: {}", e)))?;

    Ok(guard)
}

fn initialize_app_state(cli: &Cli) -> Result<AppState> {
    tracing::debug!("Initializing application state");

    // Initialize persistence manager
    let persistence = match &cli.data_dir {
        Some(dir) => PersistenceManager::with_dir(dir),
        None => PersistenceManager::new(),
    }
    .map_err(|e| {
        tracing::error!("Failed to initialize persistence: {:#}", e);
        AppError::Persistence(format!("{:#}", e))
    })?;
    tracing::info!("Data directory: {}", persistence.data_dir().display());

    // Load config
    let config = persistence.load_config().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {:#}. Using defaults.", e);
        Config::default()
    });
    tracing::debug!(
        "Config loaded: animation_ms={}, page_size={}, sidebar_width={}",
        config.animation_ms,
        config.page_size,
        config.sidebar_width
    );

    // CLI values apply to this session only
    let overrides = SessionOverrides {
        animation_ms: cli.animation_ms,
        page_size: cli.page_size,
    };
    let mut app = AppState::new(config, overrides, persistence);

    let (width, height) = crossterm::terminal::size()?;
    app.update_screen(width, height);

    Ok(app)
}

async fn run_app(mut app: AppState, running: Arc<AtomicBool>) -> Result<()> {
    // Create backend and terminal
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    // Create task channel and runner
    let (task_tx, mut task_rx) = mpsc::unbounded_channel();
    let task_runner = AsyncTaskRunner::new(task_tx);

    // Run main event loop
    run_event_loop(&mut terminal, &mut app, &mut task_rx, &task_runner, running).await?;

    // Save state before quitting
    save_app_state(&mut app);

    tracing::info!("tagdan shutting down");
    Ok(())
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState,
    task_rx: &mut mpsc::UnboundedReceiver<TaskMessage>,
    task_runner: &AsyncTaskRunner,
    running: Arc<AtomicBool>,
) -> Result<()> {
    let frame_duration = Duration::from_millis(FRAME_DURATION_MS);

    while running.load(Ordering::SeqCst) && !app.should_quit {
        let frame_start = Instant::now();

        // Process all pending task messages (non-blocking)
        while let Ok(msg) = task_rx.try_recv() {
            app.handle_task_message(msg);
        }

        // Advance modal transitions, then hand queued work to the runner
        app.tick(frame_start);
        for request in app.take_requests() {
            match request {
                TaskRequest::Copy(url) => task_runner.spawn_copy(url),
                TaskRequest::Open(url) => task_runner.spawn_open_url(url),
            }
        }

        // Render UI
        terminal.draw(|f| {
            ui::layout::render(f, app);
        })?;

        // Poll for input events (non-blocking)
        if event::poll(Duration::from_millis(0))? {
            let ev = event::read()?;
            handle_event(app, ev);
        }

        // Sleep to maintain frame rate
        let elapsed = frame_start.elapsed();
        if elapsed < frame_duration {
            tokio::time::sleep(frame_duration - elapsed).await;
        }
    }

    Ok(())
}

fn handle_event(app: &mut AppState, ev: Event) {
    let now = Instant::now();
    match ev {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            InputHandler::handle_key(app, key, now);
        }
        Event::Mouse(mouse) => {
            InputHandler::handle_mouse(app, mouse, now);
        }
        Event::Resize(width, height) => {
            app.update_screen(width, height);
        }
        _ => {}
    }
}

fn save_app_state(app: &mut AppState) {
    if let Err(e) = app.save_state() {
        tracing::error!("Failed to save state: {:#}", e);
    }
}
