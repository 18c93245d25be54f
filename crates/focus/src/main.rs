//! focus - Focus timer with distraction tracking
//!
//! "Protect the sacred space of deep work."
//!
//! Usage:
//!   focus [run] [MINS]          Open the timer (default: 25 mins)
//!   focus report                Show today / all-time / weekly / category stats
//!   focus log                   List recorded sessions
//!   focus add                   Record a session by hand
//!   focus clear                 Delete all recorded sessions
//!   focus categories            List categories
//!   focus config                Show or initialize configuration

mod app;
mod theme;
mod ui;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, Utc};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, DisableFocusChange, EnableFocusChange, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use odak_core::config::MAX_DURATION_MINUTES;
use odak_core::{format, Config, Paths};
use ratatui::prelude::*;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use focus::{
    Category, NewSession, Report, SessionRecord, SessionStore, Step, Timer, TimerController,
};

use app::{Action, App};

/// Focus - timer with distraction tracking and session reports
#[derive(Parser)]
#[command(name = "focus")]
#[command(about = "Focus timer with distraction tracking and session reports")]
#[command(version)]
#[command(after_help = r#"WHEN TO USE:
    Before starting focused work. Pick a category, run the countdown, and
    every finished session is added to your history.

DISTRACTIONS:
    Switching away from the terminal while the timer runs counts as a
    distraction and pauses the clock. Needs a terminal that reports focus
    changes (most modern terminals and tmux with focus-events on).

EXAMPLES:
    focus                       # Open the timer with the configured default
    focus run 45 -c coding      # 45-minute coding session
    focus report                # Today, all time, last 7 days, per category
    focus report --json         # Same, machine readable
    focus log --today           # Sessions recorded today
    focus add -c reading -m 30  # Record a session you did away from the keyboard
    focus clear --yes           # Wipe the history

ALIASES:
    focus r     # run
    focus rep   # report
    focus ls    # log
"#)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive timer
    #[command(alias = "r")]
    Run {
        /// Duration in minutes (default: from config, 25)
        #[arg(
            value_name = "MINS",
            value_parser = clap::value_parser!(u32).range(1..=MAX_DURATION_MINUTES as i64)
        )]
        minutes: Option<u32>,

        /// Category id (study, coding, project, reading, other)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Show focus statistics
    #[command(alias = "rep", alias = "stats")]
    Report {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List recorded sessions
    #[command(alias = "ls")]
    Log {
        /// Only sessions from today's calendar date
        #[arg(long, conflicts_with = "days")]
        today: bool,

        /// Only sessions from the last N days (rolling window)
        #[arg(long)]
        days: Option<u32>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Record a session by hand
    Add {
        /// Category id
        #[arg(short, long)]
        category: String,

        /// Focused minutes
        #[arg(
            short,
            long,
            default_value = "0",
            value_parser = clap::value_parser!(u32).range(0..=MAX_DURATION_MINUTES as i64)
        )]
        minutes: u32,

        /// Extra focused seconds
        #[arg(short, long, default_value = "0", value_parser = clap::value_parser!(u32).range(0..=59))]
        seconds: u32,

        /// Distractions during the session
        #[arg(short, long, default_value = "0")]
        distractions: u32,

        /// When it happened (RFC 3339, default: now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Delete every recorded session
    Clear {
        /// Don't ask for confirmation
        #[arg(long)]
        yes: bool,
    },

    /// List categories
    Categories,

    /// Show configuration
    Config {
        /// Write the default configuration file if none exists
        #[arg(long)]
        init: bool,
    },
}

// ANSI color codes
const GREEN: &str = "\x1b[0;32m";
const YELLOW: &str = "\x1b[0;33m";
const CYAN: &str = "\x1b[0;36m";
const MAGENTA: &str = "\x1b[0;35m";
const BOLD: &str = "\x1b[1m";
const NC: &str = "\x1b[0m";

/// Check if stdout is a TTY and colors should be used
fn use_colors() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stdout())
}

/// Conditionally apply color
fn color(code: &str, text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", code, text, NC)
    } else {
        text.to_string()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = Paths::new();
    let config = Config::load(&paths.config_file())?;
    let paths = match &config.data_dir {
        Some(dir) => paths.with_data_dir(dir),
        None => paths,
    };
    let focus_dir = paths.state("focus");

    let interactive = matches!(cli.command, None | Some(Commands::Run { .. }));
    init_logging(&focus_dir, interactive)?;

    let store = SessionStore::open(&focus_dir)
        .with_context(|| format!("Failed to open session store in {}", focus_dir.display()))?;

    match cli.command {
        Some(Commands::Run { minutes, category }) => cmd_run(store, &config, minutes, category),
        Some(Commands::Report { json }) => cmd_report(&store, json),
        Some(Commands::Log { today, days, json }) => cmd_log(&store, today, days, json),
        Some(Commands::Add {
            category,
            minutes,
            seconds,
            distractions,
            at,
        }) => cmd_add(&store, &category, minutes, seconds, distractions, at),
        Some(Commands::Clear { yes }) => cmd_clear(&store, yes),
        Some(Commands::Categories) => cmd_categories(),
        Some(Commands::Config { init }) => cmd_config(&paths, &config, init),
        None => cmd_run(store, &config, None, None),
    }
}

/// Log to stderr, or to a file while the TUI owns the terminal
fn init_logging(focus_dir: &Path, interactive: bool) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env());

    if interactive {
        std::fs::create_dir_all(focus_dir)?;
        let log_path = focus_dir.join("focus.log");
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .with_context(|| format!("Failed to open log file: {}", log_path.display()))?;
        builder.with_writer(Mutex::new(file)).with_ansi(false).init();
    } else {
        builder.with_writer(io::stderr).init();
    }
    Ok(())
}

fn parse_category(id: &str) -> Result<Category> {
    match Category::from_id(id) {
        Some(category) => Ok(category),
        None => {
            let known: Vec<_> = Category::ALL.iter().map(|c| c.id()).collect();
            bail!("Unknown category '{}'. Expected one of: {}", id, known.join(", "))
        }
    }
}

/// Run the interactive timer
fn cmd_run(
    store: SessionStore,
    config: &Config,
    minutes: Option<u32>,
    category: Option<String>,
) -> Result<()> {
    config.validate().context("Invalid configuration")?;

    let category = match category {
        Some(id) => parse_category(&id)?,
        None => Category::from_id(&config.default_category).unwrap_or_else(|| {
            warn!("Unknown default category '{}' in config", config.default_category);
            Category::default()
        }),
    };
    let minutes = minutes.unwrap_or(config.default_duration_minutes);

    let mut controller = TimerController::new(Timer::with_minutes(minutes, category), store);
    let mut app = App::new(config.theme, config.duration_presets.clone());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let (tx, mut rx) = mpsc::channel(64);
    let stop = Arc::new(AtomicBool::new(false));
    let reader = spawn_input_reader(tx, Arc::clone(&stop));

    let result = tokio::runtime::Runtime::new()
        .map_err(anyhow::Error::from)
        .and_then(|rt| {
            rt.block_on(run_app(&mut terminal, &mut app, &mut controller, &mut rx))
        });

    // Tear down: the ticker goes with the controller, the reader with the channel
    stop.store(true, Ordering::Relaxed);
    drop(rx);
    let _ = reader.join();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    result?;

    if let Some(summary) = controller.timer().summary() {
        println!(
            "{} Last session: {} of {}",
            color(GREEN, "[ok]"),
            format::human(summary.duration_seconds as u64),
            summary.category
        );
    }

    Ok(())
}

/// Forward terminal events to the timer loop from a blocking thread
fn spawn_input_reader(
    tx: mpsc::Sender<Event>,
    stop: Arc<AtomicBool>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        while !stop.load(Ordering::Relaxed) {
            match event::poll(Duration::from_millis(100)) {
                Ok(true) => match event::read() {
                    Ok(ev) => {
                        if tx.blocking_send(ev).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to read terminal event: {}", e);
                        break;
                    }
                },
                Ok(false) => {}
                Err(e) => {
                    warn!("Failed to poll terminal events: {}", e);
                    break;
                }
            }
        }
    })
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    controller: &mut TimerController,
    inputs: &mut mpsc::Receiver<Event>,
) -> Result<()> {
    app.refresh(controller.store());

    loop {
        terminal.draw(|f| ui::draw(f, app, controller.timer()))?;

        let Some(step) = controller.next(inputs).await else {
            return Ok(());
        };

        match step {
            Step::Tick(transition) => app.observe(&transition, controller.store()),
            Step::Input(event) => match app.on_event(event, controller.timer()) {
                Action::Quit => return Ok(()),
                Action::Timer(timer_event) => {
                    let transition = controller.dispatch(timer_event);
                    app.observe(&transition, controller.store());
                }
                Action::Refresh => app.refresh(controller.store()),
                Action::ClearHistory => app.clear_history(controller.store()),
                Action::None => {}
            },
        }
    }
}

/// Show focus statistics
fn cmd_report(store: &SessionStore, json: bool) -> Result<()> {
    let report = Report::from_store(store);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}Focus Report{}", BOLD, NC);
    println!();
    println!("  {}         {}", color(CYAN, "Today:"), format::human(report.today_total_seconds));
    println!(
        "  {}      {}",
        color(CYAN, "All time:"),
        format::human(report.all_time_total_seconds)
    );
    println!("  {}  {}", color(CYAN, "Distractions:"), report.total_distractions);
    println!("  {}      {}", color(CYAN, "Sessions:"), report.session_count);

    println!();
    println!("{}", color(&format!("{}{}", BOLD, MAGENTA), "Last 7 days"));
    let peak = report.weekly_peak_minutes();
    for day in &report.weekly_series {
        println!(
            "  {:>6}  {} {} min",
            day.label,
            color(GREEN, &ui::bar(day.minutes, peak, 30)),
            day.minutes
        );
    }

    println!();
    println!("{}", color(&format!("{}{}", BOLD, MAGENTA), "By category"));
    if report.category_breakdown.is_empty() {
        println!("  No sessions yet. Start one with: focus run");
    }
    let peak = report
        .category_breakdown
        .iter()
        .map(|c| c.minutes)
        .max()
        .unwrap_or(0);
    for share in &report.category_breakdown {
        println!(
            "  {:<8} {} {} min",
            share.label,
            color(YELLOW, &ui::bar(share.minutes, peak, 30)),
            share.minutes
        );
    }

    Ok(())
}

/// List recorded sessions
fn cmd_log(store: &SessionStore, today: bool, days: Option<u32>, json: bool) -> Result<()> {
    let (sessions, scope): (Vec<SessionRecord>, String) = if today {
        (store.get_today(), "today".to_string())
    } else if let Some(days) = days {
        (store.get_last_n_days(days), format!("last {} days", days))
    } else {
        (store.get_all(), "all time".to_string())
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    println!("{}Sessions ({}){}", BOLD, scope, NC);
    println!();
    if sessions.is_empty() {
        println!("  No sessions recorded");
        return Ok(());
    }

    for session in &sessions {
        let label = session
            .category()
            .map(|c| c.to_string())
            .unwrap_or_else(|| session.category_id.clone());
        let local: DateTime<Local> = session.timestamp.into();
        println!(
            "  {}  {:<12} {:>9}  {} distractions  {}",
            color(CYAN, &local.format("%Y-%m-%d %H:%M").to_string()),
            label,
            format::clock(session.duration_seconds),
            session.distraction_count,
            color(MAGENTA, &format::relative_time(session.timestamp)),
        );
    }

    Ok(())
}

/// Record a session by hand
fn cmd_add(
    store: &SessionStore,
    category: &str,
    minutes: u32,
    seconds: u32,
    distractions: u32,
    at: Option<String>,
) -> Result<()> {
    let category = parse_category(category)?;
    let duration = session_seconds(minutes, seconds)?;

    let mut session = NewSession::new(category, duration, distractions);
    if let Some(at) = at {
        let timestamp = DateTime::parse_from_rfc3339(&at)
            .with_context(|| format!("Invalid --at timestamp '{}', expected RFC 3339", at))?;
        session = session.at(timestamp.with_timezone(&Utc));
    }

    let record = store.save(session).context("Failed to save session")?;

    println!("{} Session recorded", color(GREEN, "[ok]"));
    println!("  {}        {}", color(CYAN, "Id:"), record.id);
    println!("  {}  {}", color(CYAN, "Category:"), category);
    println!("  {}  {}", color(CYAN, "Duration:"), format::human(duration as u64));

    Ok(())
}

/// Total seconds of a hand-entered session
fn session_seconds(minutes: u32, seconds: u32) -> Result<u32> {
    let duration = minutes
        .checked_mul(60)
        .and_then(|s| s.checked_add(seconds))
        .with_context(|| format!("Session of {} min {} s is too long", minutes, seconds))?;
    if duration == 0 {
        bail!("Session duration must be greater than zero (use --minutes or --seconds)");
    }
    Ok(duration)
}

/// Delete every recorded session
fn cmd_clear(store: &SessionStore, yes: bool) -> Result<()> {
    let count = store.get_all().len();

    if !yes {
        print!("Delete {} recorded sessions? This cannot be undone. [y/N] ", count);
        io::Write::flush(&mut io::stdout())?;
        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        if !matches!(answer.trim(), "y" | "Y" | "yes") {
            println!("{} Kept history", color(CYAN, "[info]"));
            return Ok(());
        }
    }

    store.clear_all().context("Failed to clear sessions")?;
    println!("{} Cleared {} sessions", color(GREEN, "[ok]"), count);

    Ok(())
}

/// List categories
fn cmd_categories() -> Result<()> {
    for category in Category::ALL {
        println!(
            "  {} {:<8} {:<8} {}",
            category.icon(),
            category.id(),
            category.label(),
            category.color()
        );
    }
    Ok(())
}

/// Show or initialize configuration
fn cmd_config(paths: &Paths, config: &Config, init: bool) -> Result<()> {
    let path = paths.config_file();

    if init {
        if path.exists() {
            println!("{} Config already exists: {}", color(CYAN, "[info]"), path.display());
        } else {
            Config::default().save(&path)?;
            println!("{} Wrote {}", color(GREEN, "[ok]"), path.display());
        }
        return Ok(());
    }

    println!("{}", color(CYAN, &path.display().to_string()));
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(())
}
