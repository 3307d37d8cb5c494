// javasim: validate and simulate small Java-style programs

use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use javasim::compile_and_run;
use javasim::ui::App;

/// Validate a Java teaching program and simulate its main method
#[derive(Debug, Parser)]
#[command(name = "javasim", version, about)]
struct Args {
    /// Java source file to run
    file: PathBuf,

    /// Print the result to stdout instead of opening the viewer
    #[arg(long)]
    plain: bool,
}

/// Logs go to stderr and only when RUST_LOG is set, so the viewer stays clean
fn init_tracing() {
    if std::env::var_os("RUST_LOG").is_none() {
        return;
    }
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(false),
        )
        .init();
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing();

    let source = match fs::read_to_string(&args.file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("Error: cannot read '{}': {}", args.file.display(), err);
            return Ok(ExitCode::FAILURE);
        }
    };

    if args.plain {
        let result = compile_and_run(&source);
        eprintln!("{}", result.message);
        print!("{}", result.output);
        return Ok(if result.success {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(source, Some(args.file));
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
        return Ok(ExitCode::FAILURE);
    }

    Ok(if app.result.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
