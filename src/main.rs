//! EndpointTester - save named HTTP endpoints and fire them through curl
//!
//! Layers:
//! - Store (endpoints.json) - durable collection, atomic writes
//! - Builder / Runner - curl argv, executed synchronously
//! - Formatter - envelope detection and JSON pretty-printing

use std::fs;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing_appender::non_blocking::WorkerGuard;

use endpoint_tester::constants::{APP_NAME, APP_VERSION, LOG_FILE};
use endpoint_tester::storage::PreferencesStore;
use endpoint_tester::{parse_curl, ui, Config, EndpointForm, Error, LoadOutcome, Session};

#[derive(Parser)]
#[command(name = "endpoint-tester")]
#[command(about = "Save named HTTP endpoints, send them with curl, read pretty responses")]
#[command(version)]
struct Cli {
    /// Directory holding endpoints.json (default: ~/.endpoint-tester)
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// HTTP client executable (default: curl)
    #[arg(long, global = true, value_name = "BIN")]
    client: Option<String>,

    /// Debug-level logging to the log file
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List saved endpoints
    List,
    /// Show one endpoint
    Show { name: String },
    /// Save (insert or replace) an endpoint
    Save(FormArgs),
    /// Send an endpoint; with --url and friends it is saved first
    Send(FormArgs),
    /// Delete an endpoint by name or list index
    Delete { target: String },
    /// Import a cURL command line as an endpoint
    Import {
        name: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        command: Vec<String>,
    },
    /// Print the curl command for an endpoint
    Curl { name: String },
    /// Show or replace the stored layout preferences
    Prefs {
        #[command(subcommand)]
        action: Option<PrefsAction>,
    },
}

#[derive(Subcommand)]
enum PrefsAction {
    Show,
    /// Replace the blob with a JSON object
    Set { json: String },
}

#[derive(Args)]
struct FormArgs {
    name: String,

    #[arg(long)]
    url: Option<String>,

    #[arg(short = 'X', long)]
    method: Option<String>,

    /// JSON object or "Key: Value" lines
    #[arg(short = 'H', long, conflicts_with = "headers_file")]
    headers: Option<String>,

    #[arg(long, value_name = "FILE")]
    headers_file: Option<PathBuf>,

    #[arg(short = 'd', long, conflicts_with = "body_file")]
    body: Option<String>,

    #[arg(long, value_name = "FILE")]
    body_file: Option<PathBuf>,
}

impl FormArgs {
    /// Only a name was given: refers to a stored endpoint
    fn is_reference(&self) -> bool {
        self.url.is_none()
            && self.method.is_none()
            && self.headers.is_none()
            && self.headers_file.is_none()
            && self.body.is_none()
            && self.body_file.is_none()
    }

    fn to_form(&self) -> Result<EndpointForm> {
        let headers = match (&self.headers, &self.headers_file) {
            (Some(text), _) => text.clone(),
            (None, Some(path)) => fs::read_to_string(path)
                .with_context(|| format!("reading headers from {}", path.display()))?,
            (None, None) => String::new(),
        };
        let body = match (&self.body, &self.body_file) {
            (Some(text), _) => text.clone(),
            (None, Some(path)) => fs::read_to_string(path)
                .with_context(|| format!("reading body from {}", path.display()))?,
            (None, None) => String::new(),
        };

        Ok(EndpointForm {
            name: self.name.clone(),
            url: self.url.clone().unwrap_or_default(),
            method: self.method.clone().unwrap_or_default(),
            headers,
            body,
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            // bad input gets its own exit status
            let user_error = err.downcast_ref::<Error>().is_some_and(Error::is_user_error);
            if user_error {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::resolve(cli.data_dir.clone(), cli.client.clone());
    let _guard = init_logging(&config, cli.verbose);
    let color = std::io::stdout().is_terminal();

    tracing::info!(
        app = APP_NAME,
        version = APP_VERSION,
        data_dir = %config.data_dir.display(),
        client = %config.client_binary,
        "Starting"
    );

    let (mut session, outcome) = Session::open(&config);
    if let LoadOutcome::Corrupted(reason) = &outcome {
        eprintln!(
            "warning: {} is corrupted ({}); starting empty",
            session.store().path().display(),
            reason
        );
    }

    match cli.command {
        Commands::List => {
            println!("{}", ui::render_list(session.store().iter(), color));
        }
        Commands::Show { name } => {
            print!("{}", ui::render_endpoint(session.endpoint(&name)?, color));
        }
        Commands::Save(args) => {
            let index = session.save(&args.to_form()?)?;
            eprintln!("Endpoint saved at #{}.", index);
        }
        Commands::Send(args) => {
            let outcome = if args.is_reference() {
                session.send_stored(&args.name)?
            } else {
                session.send(&args.to_form()?)?
            };
            println!("{}", ui::render_outcome(&outcome, color));
            eprintln!("{}", ui::render_status(&outcome, color));
        }
        Commands::Delete { target } => {
            let removed = session.delete_target(&target)?;
            eprintln!("Removed: {}", removed.name);
        }
        Commands::Import { name, command } => {
            let line = match command.as_slice() {
                [single] => single.clone(),
                parts => shlex::try_join(parts.iter().map(String::as_str))
                    .context("command contains a NUL byte")?,
            };
            let endpoint = parse_curl(&name, &line)?;
            let index = session.save_endpoint(endpoint)?;
            eprintln!("Imported '{}' at #{}.", name, index);
        }
        Commands::Curl { name } => {
            println!("{}", session.command_for(&name)?.display);
        }
        Commands::Prefs { action } => run_prefs(&config, action.as_ref())?,
    }

    Ok(())
}

fn run_prefs(config: &Config, action: Option<&PrefsAction>) -> Result<()> {
    let prefs = PreferencesStore::new(&config.data_dir);
    match action {
        None | Some(PrefsAction::Show) => {
            println!("{}", serde_json::to_string_pretty(&prefs.load())?);
        }
        Some(PrefsAction::Set { json }) => {
            let Value::Object(blob) = serde_json::from_str::<Value>(json).context("parsing preferences")? else {
                bail!("preferences must be a JSON object");
            };
            prefs.save(&blob)?;
        }
    }
    Ok(())
}

/// Log to a file in the data directory; stdout is reserved for command output
fn init_logging(config: &Config, verbose: bool) -> Option<WorkerGuard> {
    if fs::create_dir_all(&config.data_dir).is_err() {
        return None;
    }
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    let file_appender = tracing_appender::rolling::never(&config.data_dir, LOG_FILE);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_max_level(level)
        .init();
    Some(guard)
}
