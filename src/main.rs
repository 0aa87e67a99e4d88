//! secrets-safe - fetch managed account credentials and Secrets Safe secrets
//!
//! Prints one value per line in the order the references were given, or a JSON
//! array with `--json`. Logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use secrets_safe::config::{
    self, ENV_API_URL, ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_REQUEST_DURATION,
    ENV_REQUEST_REASON, ENV_RETRIEVAL_TYPE, ENV_SECRET_LIST,
};
use secrets_safe::{CheckoutOptions, Credentials, RetrievalOrchestrator, RetrievalType};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "secrets-safe")]
#[command(about = "Retrieve managed account credentials and Secrets Safe secrets")]
#[command(version)]
#[command(after_help = r#"REFERENCES:
    MANAGED_ACCOUNT   system/account        (split on the first '/')
    SECRET            folder/sub/title      (split on the last '/')

    Several references may be given, comma separated. The run is
    all-or-nothing: any failing reference fails the whole command.

ENVIRONMENT:
    Every option can also be set from the environment or a .env file
    found in the current directory or one of its parents."#)]
struct Cli {
    /// Base URL of the vault API
    #[arg(long, env = ENV_API_URL)]
    api_url: String,

    /// OAuth client id
    #[arg(long, env = ENV_CLIENT_ID)]
    client_id: String,

    /// OAuth client secret
    #[arg(long, env = ENV_CLIENT_SECRET, hide_env_values = true)]
    client_secret: String,

    /// MANAGED_ACCOUNT or SECRET
    #[arg(long, env = ENV_RETRIEVAL_TYPE)]
    retrieval_type: RetrievalType,

    /// Comma-separated secret references
    #[arg(long, env = ENV_SECRET_LIST)]
    secret_list: String,

    /// Minutes a managed account checkout request stays open
    #[arg(long, env = ENV_REQUEST_DURATION, default_value_t = 5)]
    request_duration: u32,

    /// Reason recorded on checkout and check-in
    #[arg(long, env = ENV_REQUEST_REASON)]
    request_reason: Option<String>,

    /// Print values as a JSON array
    #[arg(long)]
    json: bool,

    /// Debug logging (RUST_LOG overrides)
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "secrets_safe=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let env_file = config::load_env_file();
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    if let Some(path) = env_file {
        tracing::debug!(path = %path.display(), "environment loaded from file");
    }

    let references = config::parse_secret_list(&cli.secret_list);
    let credentials = Credentials::new(cli.client_id, cli.client_secret, &cli.api_url)
        .context("invalid credentials")?;

    let mut options = CheckoutOptions {
        duration_minutes: cli.request_duration,
        ..CheckoutOptions::default()
    };
    if let Some(reason) = cli.request_reason {
        options.reason = reason;
    }

    let values = RetrievalOrchestrator::new(credentials)
        .with_checkout_options(options)
        .run(&references, cli.retrieval_type)
        .await
        .context("retrieval failed")?;

    if cli.json {
        println!("{}", serde_json::to_string(&values)?);
    } else {
        for value in &values {
            println!("{}", value);
        }
    }

    Ok(())
}
