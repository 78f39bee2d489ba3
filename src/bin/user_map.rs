//! user-map: command-line client for the user-map contract
//!
//! Every account on the contract owns a single JSON value. The CLI logs in
//! through a delegated signing session, edits and submits that value, and
//! queries what other accounts have stored.
//!
//! ## Example Usage
//!
//! ```bash
//! export USER_MAP_CONTRACT_ADDRESS=xion1...
//! export USER_MAP_SIGNER_URL=http://localhost:8787
//!
//! # Connect the signer's account and load its value
//! user-map login
//!
//! # Submit a new value (typographic quotes are fixed up)
//! user-map update --text '{"theme": "dark"}'
//!
//! # Read the contract
//! user-map users
//! user-map value --user xion1...
//!
//! # Offline editor checks
//! user-map validate --file value.json
//! user-map format --file value.json
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, info, warn};

mod user_map_cli;

use user_map::config::{self, ConfigOverrides};
use user_map::logging::{self, LoggingConfig};
use user_map::CliSession;
use user_map_types::env_utils::env_bool;
use user_map_cli::{
    editor::{FormatCmd, ValidateCmd},
    explorer::ExplorerCmd,
    query::ValueCmd,
    session_cmd::LoginCmd,
    sign::SignArbCmd,
    update::UpdateCmd,
    CliContext,
};

#[derive(Parser)]
#[command(
    name = "user-map",
    author,
    version,
    about = "Edit and query per-account JSON values on the user-map contract"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Network preset (testnet or mainnet)
    #[arg(long, global = true)]
    network: Option<String>,

    /// LCD endpoint for contract queries (default: network preset)
    #[arg(long, global = true)]
    lcd_url: Option<String>,

    /// Delegated signing service endpoint
    #[arg(long, global = true)]
    signer_url: Option<String>,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    json: bool,

    /// Verbose logging (info level)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines on stderr (also USER_MAP_LOG_JSON=1)
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect an account and load its current value
    Login(LoginCmd),

    /// Forget the connected account and local session
    Logout,

    /// Show the connected account, last receipt and pending edit
    Status,

    /// Value stored for an account (default: your own)
    Value(ValueCmd),

    /// Every account with a stored value
    Users,

    /// Every (account, value) pair
    Map,

    /// Fee-token balance of the connected account
    Balance,

    /// Validate, submit and re-read a new value for your account
    Update(UpdateCmd),

    /// Check that text is valid JSON (offline)
    Validate(ValidateCmd),

    /// Pretty-print JSON text (offline)
    Format(FormatCmd),

    /// Sign an arbitrary message with the session key
    SignArb(SignArbCmd),

    /// Print the block-explorer link for a transaction
    Explorer(ExplorerCmd),
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::Login(_) => "login",
            Commands::Logout => "logout",
            Commands::Status => "status",
            Commands::Value(_) => "value",
            Commands::Users => "users",
            Commands::Map => "map",
            Commands::Balance => "balance",
            Commands::Update(_) => "update",
            Commands::Validate(_) => "validate",
            Commands::Format(_) => "format",
            Commands::SignArb(_) => "sign-arb",
            Commands::Explorer(_) => "explorer",
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let Cli {
        command,
        network,
        lcd_url,
        signer_url,
        json,
        verbose,
        log_json,
    } = Cli::parse();

    let dotenv_path = config::load_dotenv();
    let log_json = log_json || env_bool(config::LOG_JSON_VAR);
    logging::init_with_config(&LoggingConfig::new(verbose, log_json))?;
    if let Some(path) = dotenv_path {
        debug!(path = %path.display(), "loaded .env");
    }

    let session_path = config::session_file();
    let session = CliSession::load_or_create(&session_path).unwrap_or_else(|e| {
        warn!(error = %format!("{:#}", e), "ignoring unreadable session file");
        CliSession::new()
    });
    let mut ctx = CliContext {
        overrides: ConfigOverrides {
            network,
            lcd_url,
            signer_url,
        },
        session,
        session_path,
    };

    let command_name = command.name();
    info!(command = command_name, "running");

    let result = match command {
        Commands::Login(cmd) => cmd.execute(&mut ctx, json).await,
        Commands::Logout => user_map_cli::session_cmd::logout(&mut ctx, json),
        Commands::Status => user_map_cli::session_cmd::status(&ctx, json),
        Commands::Value(cmd) => cmd.execute(&mut ctx, json).await,
        Commands::Users => user_map_cli::query::users(&mut ctx, json).await,
        Commands::Map => user_map_cli::query::map(&mut ctx, json).await,
        Commands::Balance => user_map_cli::query::balance(&mut ctx, json).await,
        Commands::Update(cmd) => cmd.execute(&mut ctx, json).await,
        Commands::Validate(cmd) => cmd.execute(json),
        Commands::Format(cmd) => cmd.execute(json),
        Commands::SignArb(cmd) => cmd.execute(&mut ctx, json).await,
        Commands::Explorer(cmd) => cmd.execute(&ctx, json),
    };

    if json {
        if let Err(err) = &result {
            println!("{}", user_map_cli::output::format_error_json(command_name, err));
        }
    }

    // Save session on success
    if result.is_ok() {
        ctx.session.save(&ctx.session_path)?;
    }

    result
}
