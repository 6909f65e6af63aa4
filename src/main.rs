// ABOUTME: Main entry point for the ws-repl console and job action commands

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{prelude::*, Terminal};
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    time::Duration,
};
use tracing::{error, info};
use ws_repl::{
    app::App,
    components::ConsoleViewComponent,
    config::{ConfigOverrides, ReplConfig, ReplMode},
    repl::ReplWidget,
    terminal::{Channel, WebSocketChannel},
    web::{page, JobAction, JobActionClient},
};

#[derive(Parser)]
#[command(name = "ws-repl", version, about = "Stream an experiment's console output over WebSocket")]
struct Cli {
    /// Config file (defaults to the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    console: ConsoleArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Args)]
struct ConsoleArgs {
    #[arg(long)]
    host: Option<String>,

    #[arg(long)]
    port: Option<u16>,

    /// ws or wss
    #[arg(long)]
    protocol: Option<String>,

    /// Experiment namespace to attach to
    #[arg(long)]
    namespace: Option<String>,

    /// Experiment id to attach to
    #[arg(long)]
    id: Option<String>,

    /// Maximum retained lines
    #[arg(long)]
    capacity: Option<usize>,

    /// Compose and send lines instead of only displaying output
    #[arg(long)]
    full_duplex: bool,

    /// Write the final console as a standalone HTML page on exit
    #[arg(long, value_name = "FILE")]
    dump_html: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Stop a running experiment
    Stop(ActionArgs),
    /// Delete an experiment
    Delete(ActionArgs),
}

#[derive(Args)]
struct ActionArgs {
    /// Experiment id
    id: String,

    /// Experiment server base URL
    #[arg(long, default_value = "http://127.0.0.1:8086")]
    server: String,

    /// Skip the confirmation prompt
    #[arg(long)]
    yes: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging();

    match cli.command {
        Some(Command::Stop(args)) => run_action(JobAction::Stop, args).await,
        Some(Command::Delete(args)) => run_action(JobAction::Delete, args).await,
        None => {
            setup_panic_handler();
            run_console(cli.config, cli.console)
        }
    }
}

fn run_console(config_path: Option<PathBuf>, args: ConsoleArgs) -> Result<()> {
    let overrides = ConfigOverrides {
        mode: args.full_duplex.then_some(ReplMode::FullDuplex),
        host: args.host,
        port: args.port,
        protocol: args.protocol,
        experiment_namespace: args.namespace,
        experiment_id: args.id,
        capacity: args.capacity,
    };
    let config = ReplConfig::resolve(config_path.as_deref(), overrides)?;

    let mut widget = ReplWidget::new(&config, WebSocketChannel::new())?;
    widget.open();

    let title = match config.mode {
        ReplMode::HalfDuplex => format!("{}/{}", config.experiment_namespace, config.experiment_id),
        ReplMode::FullDuplex => config.effective_endpoint().url(),
    };
    let mut app = App::new(widget, title);

    let result = run_tui(&mut app);
    app.widget.close();
    result?;

    if let Some(path) = args.dump_html {
        std::fs::write(&path, page(&config, app.widget.pane()))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Wrote console page to {}", path.display());
    }
    Ok(())
}

fn run_tui<C: Channel>(app: &mut App<C>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let view = ConsoleViewComponent::new();
    let poll_interval = Duration::from_millis(50);

    let result = (|| -> Result<()> {
        loop {
            app.tick();
            terminal.draw(|frame| {
                let area = frame.size();
                view.render(frame, area, &app.widget, &app.title);
            })?;

            if event::poll(poll_interval)? {
                if let Event::Key(key_event) = event::read()? {
                    app.handle_key(key_event);
                }
            }

            if app.should_quit {
                return Ok(());
            }
        }
    })();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_action(action: JobAction, args: ActionArgs) -> Result<()> {
    let client = JobActionClient::new(args.server);
    let skip_prompt = args.yes;
    let outcome = client
        .trigger(action, &args.id, |prompt| skip_prompt || confirm(prompt))
        .await
        .with_context(|| format!("{} {} failed", action.verb(), args.id));

    match outcome {
        Ok(Some(body)) => println!("{body}"),
        Ok(None) => println!("Not {} {}", action.gerund(), args.id),
        Err(e) => {
            error!("{:#}", e);
            return Err(e);
        }
    }
    Ok(())
}

fn confirm(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

fn setup_logging() {
    use directories::ProjectDirs;
    use std::fs::OpenOptions;
    use tracing_subscriber::prelude::*;

    let log_dir = ProjectDirs::from("", "", "ws-repl")
        .map(|dirs| dirs.data_local_dir().join("logs"))
        .unwrap_or_else(|| PathBuf::from(".ws-repl/logs"));

    let _ = std::fs::create_dir_all(&log_dir);

    let log_file = log_dir.join(format!(
        "ws-repl-{}.log",
        chrono::Local::now().format("%Y%m%d-%H%M%S")
    ));

    // The console owns the terminal, so logs only ever go to the file
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&log_file) else {
        return;
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(file)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ws_repl=info".into()),
        )
        .init();
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info| {
        // Restore the terminal before reporting
        let _ = disable_raw_mode();
        let _ = execute!(std::io::stderr(), LeaveAlternateScreen);

        error!("Application panicked: {}", panic_info);
        eprintln!("Application panicked: {}", panic_info);
        eprintln!("Please check the logs for more details.");
    }));
}
