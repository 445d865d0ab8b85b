use clap::Parser;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use std::io::stdout;
use std::panic;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use vendor_console::config::{ConfigOverrides, ConsoleConfig};
use vendor_console::deboard::{self, DeboardApp};
use vendor_console::error::{ConsoleError, Result};
use vendor_console::event::{Event, EventHandler};
use vendor_console::service::{self, VendorService};

#[derive(Parser, Debug)]
#[command(name = "vendor-deboard")]
#[command(author, version, about = "Interactive wizard that permanently removes a vendor")]
struct Args {
    /// Path to config file (default: <config dir>/vendor-console/config.toml)
    #[arg(long)]
    config: Option<String>,

    /// Base URL of the onboarding API, overriding the config file
    #[arg(long, env = "VENDOR_CONSOLE_API_URL")]
    api_url: Option<String>,

    /// Simulate all backend calls without making real changes
    #[arg(long)]
    dryrun: bool,

    /// Log file path (logging disabled if not specified)
    #[arg(long)]
    log_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Never log to the terminal the wizard draws on
    if let Some(ref log_path) = args.log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .ok();

        if let Some(file) = file {
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .with_ansi(false)
                .init();

            info!("Starting vendor-deboard");
        }
    }

    // A broken config file must stop us before any live call can be made
    let overrides = ConfigOverrides {
        api_url: args.api_url.clone(),
        catalog_url: None,
        dryrun: args.dryrun,
    };
    let config = ConsoleConfig::resolve(args.config.as_deref(), &overrides).inspect_err(|e| {
        error!("Refusing to start with unusable config: {}", e);
    })?;
    let service = service::create_service(&config)?;
    info!("Backend target: {}", service.target());

    // Set up panic handler to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;

    let result = run(&mut terminal, &config, service).await;

    restore_terminal()?;

    if let Err(ref e) = result {
        error!("Deboard wizard error: {}", e);
    }

    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode().map_err(|e| ConsoleError::Terminal(e.to_string()))?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
        .map_err(|e| ConsoleError::Terminal(e.to_string()))?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).map_err(|e| ConsoleError::Terminal(e.to_string()))?;
    Ok(terminal)
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode().map_err(|e| ConsoleError::Terminal(e.to_string()))?;
    execute!(stdout(), DisableBracketedPaste, LeaveAlternateScreen)
        .map_err(|e| ConsoleError::Terminal(e.to_string()))?;
    Ok(())
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    config: &ConsoleConfig,
    service: Arc<dyn VendorService>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut events = EventHandler::new(tick_rate);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let mut app = DeboardApp::new(config.general.title.clone(), service.target(), config.general.dryrun);
    if config.general.dryrun {
        app.set_info("Dryrun: no request reaches the API".to_string());
    }

    loop {
        terminal
            .draw(|frame| deboard::ui::draw(frame, &app))
            .map_err(|e| ConsoleError::Terminal(e.to_string()))?;

        tokio::select! {
            event = events.next() => match event {
                Some(Event::Key(key)) => {
                    if let Some(action) = app.handle_key(key) {
                        deboard::spawn_action(action, Arc::clone(&service), tx.clone());
                    }
                }
                Some(Event::Paste(text)) => app.handle_paste(&text),
                Some(Event::Resize) => {}
                Some(Event::Tick) => app.tick(),
                None => break,
            },
            Some(msg) = rx.recv() => {
                app.handle_execution_message(msg);
            }
        }

        if app.should_exit {
            if app.wizard.is_busy() {
                warn!("Exiting with a request still in flight");
            }
            break;
        }
    }

    Ok(())
}
