use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "odata-client", version, about = "Command-line client for OData v4 services")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Service base URL (defaults to ODATA_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[arg(long, global = true)]
    pub username: Option<String>,

    #[arg(long, global = true)]
    pub password: Option<String>,

    #[arg(long, global = true)]
    pub bearer_token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Fetch a resource and print the JSON response
    Get(GetArgs),
    /// Create a resource (POST)
    Create(WriteArgs),
    /// Update a resource in place (PATCH)
    Update(WriteArgs),
    /// Delete a resource
    Delete(PathArgs),
    /// Fetch the service document at the base URL
    Probe,
}

#[derive(Debug, Clone, Args)]
pub struct GetArgs {
    /// Resource path relative to the base URL, e.g. "People('russellwhyte')"
    pub path: String,

    /// Query option as key=value, repeatable (e.g. -q '$top=5')
    #[arg(short = 'q', long = "query", value_parser = parse_query_pair)]
    pub query: Vec<(String, String)>,
}

#[derive(Debug, Clone, Args)]
pub struct WriteArgs {
    /// Resource path relative to the base URL
    pub path: String,

    /// JSON document to send as the request body
    #[arg(long)]
    pub data: String,
}

#[derive(Debug, Clone, Args)]
pub struct PathArgs {
    /// Resource path relative to the base URL
    pub path: String,
}

fn parse_query_pair(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::Parser;

    #[test]
    fn parses_get_with_query_options() {
        let cli = Cli::try_parse_from([
            "odata-client",
            "get",
            "People",
            "-q",
            "$top=5",
            "-q",
            "$filter=FirstName eq 'Scott'",
        ])
        .expect("parse");

        match cli.command {
            Command::Get(args) => {
                assert_eq!(args.path, "People");
                assert_eq!(args.query[0], ("$top".to_string(), "5".to_string()));
                assert_eq!(
                    args.query[1],
                    ("$filter".to_string(), "FirstName eq 'Scott'".to_string())
                );
            }
            other => panic!("expected get, got {other:?}"),
        }
    }

    #[test]
    fn rejects_query_option_without_separator() {
        let result = Cli::try_parse_from(["odata-client", "get", "People", "-q", "top5"]);
        assert!(result.is_err());
    }

    #[test]
    fn create_requires_data() {
        let result = Cli::try_parse_from(["odata-client", "create", "People"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_flags_apply_after_subcommand() {
        let cli = Cli::try_parse_from([
            "odata-client",
            "probe",
            "--base-url",
            "https://services.example.com/V4/",
            "-v",
        ])
        .expect("parse");

        assert!(matches!(cli.command, Command::Probe));
        assert_eq!(
            cli.base_url.as_deref(),
            Some("https://services.example.com/V4/")
        );
        assert!(cli.verbose);
    }
}
