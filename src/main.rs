//! serline - interactive console host
//!
//! Runs the serline line editor against the local terminal, standing in
//! for the serial link of a small device. Key presses are translated into
//! the bytes a serial terminal would send and fed to the editor one at a
//! time; submitted lines are dispatched to a small command table.
//!
//! # Quick Start
//!
//! ```text
//! serline                    # Interactive, raw-mode terminal
//! serline -p < keys.bin      # Feed raw bytes from stdin
//! serline -c ./serline.toml  # Use a specific config file
//! ```

use std::env;
use std::io::{self, Read, Stdout, Write};
use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use serline::commands::{CommandTable, Flow};
use serline::config::{Config, LogConfig};
use serline::core::{Args, Console, Session};
use serline::ui::{KeyMapper, EOT};

/// Command line options
#[derive(Default)]
struct Options {
    /// Explicit config file
    config: Option<PathBuf>,
    /// Read raw bytes from stdin instead of key events
    pipe: bool,
}

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    eprintln!("serline {}", VERSION);
}

fn print_help() {
    eprintln!("serline {} - line editor console for small devices", VERSION);
    eprintln!();
    eprintln!("Usage: serline [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --config <PATH>   Config file (default: ~/.serline/config.toml)");
    eprintln!("  -p, --pipe            Read raw input bytes from stdin");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("Editing keys:");
    eprintln!("  Left/Right, Ctrl+B/F  Move cursor");
    eprintln!("  Home/End, Ctrl+A/E    Line start / end");
    eprintln!("  Backspace, Delete     Delete before / at cursor");
    eprintln!("  Ctrl+U, Ctrl+K        Delete to line start / end");
    eprintln!("  Enter                 Run command");
    eprintln!();
    eprintln!("Exit: type 'exit' or press Ctrl+D");
}

fn parse_args() -> Result<Options, String> {
    let args: Vec<String> = env::args().collect();
    let mut options = Options::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "-c" | "--config" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing config path".to_string());
                }
                options.config = Some(PathBuf::from(&args[i]));
            }
            "-p" | "--pipe" => {
                options.pipe = true;
            }
            arg => {
                return Err(format!("Unknown argument: {}. Use -h for help.", arg));
            }
        }
        i += 1;
    }

    Ok(options)
}

/// Console writing to stdout and running commands from a table
struct HostConsole {
    out: Stdout,
    commands: CommandTable,
    flow: Flow,
}

impl HostConsole {
    fn new(commands: CommandTable) -> Self {
        Self {
            out: io::stdout(),
            commands,
            flow: Flow::Continue,
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl Console for HostConsole {
    fn write_char(&mut self, byte: u8) {
        if let Err(e) = self.out.write_all(&[byte]) {
            error!("Write failed: {}", e);
        }
    }

    fn write_str(&mut self, bytes: &[u8]) {
        if let Err(e) = self.out.write_all(bytes) {
            error!("Write failed: {}", e);
        }
    }

    fn execute(&mut self, args: &Args<'_>) {
        match self.commands.dispatch(args, &mut self.out) {
            Ok(flow) => self.flow = flow,
            Err(e) => error!("Command output failed: {}", e),
        }
    }
}

/// Restores cooked mode when dropped
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn init_logging(log: &LogConfig) {
    let log_path = log.file_path();

    // Create log directory if needed
    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    // Open log file (append mode)
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let filter = EnvFilter::try_new(&log.level).unwrap_or_else(|_| EnvFilter::new("info"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn main() -> anyhow::Result<()> {
    let options = match parse_args() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    let (config, load_error) = match &options.config {
        Some(path) => (Config::load_from(path)?, None),
        None => Config::load(),
    };

    init_logging(&config.log);
    info!("serline starting...");
    if let Some(e) = load_error {
        warn!("Using default config: {}", e);
    }

    let mut session = Session::new(HostConsole::new(CommandTable::builtin()), &config.editor);
    session.show_prompt();
    session.console_mut().flush()?;

    if options.pipe {
        run_pipe(&mut session)?;
    } else {
        run_interactive(&mut session)?;
    }

    session.console_mut().write_str(b"\r\n");
    session.console_mut().flush()?;
    info!("serline exiting");
    Ok(())
}

/// Main event loop for a raw-mode terminal
fn run_interactive(session: &mut Session<HostConsole>) -> anyhow::Result<()> {
    let _raw = RawModeGuard::enable()?;
    let poll_timeout = Duration::from_millis(100);

    loop {
        if !event::poll(poll_timeout)? {
            continue;
        }

        let Event::Key(key_event) = event::read()? else {
            continue;
        };
        // Only process key press events
        if key_event.kind != KeyEventKind::Press {
            continue;
        }
        let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key_event.code == KeyCode::Char('d') {
            info!("Ctrl+D received");
            break;
        }

        if let Some(bytes) = KeyMapper::map(&key_event) {
            session.ingest_all(&bytes);
            session.console_mut().flush()?;
        }

        if session.console().flow == Flow::Exit {
            break;
        }
    }

    Ok(())
}

/// Feed raw bytes from stdin until end of input, EOT or `exit`
fn run_pipe(session: &mut Session<HostConsole>) -> anyhow::Result<()> {
    let mut stdin = io::stdin().lock();
    let mut chunk = [0u8; 256];

    loop {
        let n = stdin.read(&mut chunk)?;
        if n == 0 {
            info!("End of input");
            return Ok(());
        }
        for &byte in &chunk[..n] {
            if byte == EOT {
                return Ok(());
            }
            session.ingest(byte);
            if session.console().flow == Flow::Exit {
                session.console_mut().flush()?;
                return Ok(());
            }
        }
        session.console_mut().flush()?;
    }
}
