use clap::Parser;
use comfy_table::{Cell, Table as ComfyTable, presets::UTF8_FULL};
use config::{Config, Environment, File};
use flatsql::{QueryOutcome, Session, StorageEngine};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// flatsql interactive session shell
#[derive(Parser, Debug)]
#[command(name = "flatsql")]
#[command(about = "flatsql interactive session shell", long_about = None)]
struct Args {
    /// Authenticated username for this session
    #[arg(short, long)]
    user: Option<String>,

    /// Storage root directory
    #[arg(short = 'D', long)]
    data_dir: Option<String>,
}

/// Session configuration
#[derive(Debug, Deserialize)]
struct SessionConfig {
    #[serde(default = "default_user")]
    user: String,
    #[serde(default = "default_data_dir")]
    data_dir: String,
}

fn default_user() -> String {
    "guest".to_string()
}
fn default_data_dir() -> String {
    "./storage".to_string()
}

impl SessionConfig {
    /// Load configuration with priority: CLI args > ENV > config file > defaults
    fn load(args: &Args) -> Self {
        let config_paths = ["/etc/flatsql/flatsql.toml", "./flatsql.toml"];

        let mut builder = Config::builder();
        for path in &config_paths {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
                eprintln!("Loaded config from: {path}");
                break;
            }
        }

        // Override with FLATSQL_* environment variables
        builder = builder.add_source(Environment::with_prefix("FLATSQL"));

        let base = builder
            .build()
            .ok()
            .and_then(|c| c.try_deserialize::<Self>().ok())
            .unwrap_or_else(|| Self {
                user: default_user(),
                data_dir: default_data_dir(),
            });

        // CLI args override everything
        Self {
            user: args.user.clone().unwrap_or(base.user),
            data_dir: args.data_dir.clone().unwrap_or(base.data_dir),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = SessionConfig::load(&args);

    println!("flatsql session shell");
    println!("User: {}, Storage: {}", config.user, config.data_dir);
    println!("Commands end with ';'. Type 'quit' or 'exit' to leave.\n");

    let engine = Arc::new(StorageEngine::new(&config.data_dir));
    let mut session = Session::new(engine, config.user);

    let mut rl = DefaultEditor::new()?;
    let history_file = dirs::home_dir().map(|mut p| {
        p.push(".flatsql_history");
        p
    });
    if let Some(ref path) = history_file {
        let _ = rl.load_history(path); // Ignore error if file doesn't exist
    }

    loop {
        match rl.readline("flatsql> ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line);

                if line.eq_ignore_ascii_case("quit") || line.eq_ignore_ascii_case("exit") {
                    break;
                }

                // errors surface here and the session stays usable
                match session.execute(line) {
                    Ok(outcome) => print!("{}", render_outcome(&outcome)),
                    Err(err) => println!("Error: {err}"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                break;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("Error: {err:?}");
                break;
            }
        }
    }

    if let Some(ref path) = history_file {
        let _ = rl.save_history(path);
    }
    println!("Session closed.");
    Ok(())
}

fn render_outcome(outcome: &QueryOutcome) -> String {
    match outcome {
        QueryOutcome::Success(message) => format!("{message}\n"),
        QueryOutcome::Rows { columns, rows } => {
            let mut table = ComfyTable::new();
            table.load_preset(UTF8_FULL);
            table.set_header(columns.iter().map(Cell::new));
            for row in rows {
                table.add_row(row.iter().map(Cell::new));
            }
            format!("{table}\n({} rows)\n", rows.len())
        }
    }
}
