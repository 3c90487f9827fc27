use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use odata_client::cli::{Cli, Command};
use odata_client::commands;
use odata_client::config::ClientConfig;
use odata_client::connection::ODataConnection;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let mut config = ClientConfig::default();
    if let Some(base_url) = cli.base_url {
        config.base_url = Some(base_url);
    }
    if let Some(username) = cli.username {
        config.username = Some(username);
    }
    if let Some(password) = cli.password {
        config.password = Some(password);
    }
    if let Some(token) = cli.bearer_token {
        config.bearer_token = Some(token);
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }

    let Some(base_url) = config.base_url.clone() else {
        eprintln!("No service base URL. Pass --base-url or set ODATA_BASE_URL.");
        std::process::exit(2);
    };

    let conn = match ODataConnection::new(&config) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("Failed to build HTTP client: {err}");
            std::process::exit(1);
        }
    };

    let result = match &cli.command {
        Command::Get(args) => commands::run_get(&conn, &base_url, args).await,
        Command::Create(args) => commands::run_create(&conn, &base_url, args).await,
        Command::Update(args) => commands::run_update(&conn, &base_url, args).await,
        Command::Delete(args) => commands::run_delete(&conn, &base_url, args).await,
        Command::Probe => commands::run_probe(&conn, &base_url).await,
    };

    if let Err(err) = result {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::from_default_env()
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
