use anyhow::{Context, Result};
use bizfly::api::http::format_api_error;
use bizfly::config::{Config, OutputFormat};
use bizfly::{Client, KeyCreateRequest, ListOptions, SnapshotCreateRequest};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Command line client for BizFly Cloud storage keys and snapshots
#[derive(Parser, Debug)]
#[command(name = "bizfly", version, about, long_about = None)]
struct Args {
    #[command(flatten)]
    global: GlobalArgs,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct GlobalArgs {
    /// API base URL
    #[arg(long, env = "BIZFLY_API_URL", global = true)]
    api_url: Option<String>,

    /// Project to act on
    #[arg(long, env = "BIZFLY_PROJECT_ID", global = true)]
    project_id: Option<String>,

    /// Auth token sent as X-Auth-Token
    #[arg(long, env = "BIZFLY_AUTH_TOKEN", hide_env_values = true, global = true)]
    auth_token: Option<String>,

    /// Output format (defaults to the configured one)
    #[arg(short, long, value_enum, global = true)]
    output: Option<OutputFormat>,
}

impl GlobalArgs {
    /// `--output` if given, else the configured format
    fn output_for(&self, config: &Config) -> OutputFormat {
        self.output.unwrap_or(config.output)
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage simple storage access keys
    #[command(subcommand)]
    Key(KeyCommand),
    /// Manage volume snapshots
    #[command(subcommand)]
    Snapshot(SnapshotCommand),
    /// Show or change the saved configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Subcommand, Debug)]
enum KeyCommand {
    /// Create an access key pair for a subuser
    Create {
        #[arg(long)]
        subuser_id: String,
        #[arg(long)]
        access_key: String,
        #[arg(long)]
        secret_key: String,
    },
    Get {
        #[arg(value_parser = parse_item_id)]
        access_key: String,
    },
    Delete {
        #[arg(value_parser = parse_item_id)]
        access_key: String,
    },
    List(ListArgs),
}

#[derive(Subcommand, Debug)]
enum SnapshotCommand {
    /// Snapshot a volume
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        volume_id: String,
        /// Snapshot even if the volume is attached
        #[arg(long)]
        force: bool,
    },
    Get {
        #[arg(value_parser = parse_item_id)]
        id: String,
    },
    Delete {
        #[arg(value_parser = parse_item_id)]
        id: String,
    },
    List(ListArgs),
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    Show,
    SetApiUrl { url: String },
    SetProject { project_id: String },
    /// Route a named service (e.g. simple_storage) to its own base URL
    SetEndpoint { service: String, url: String },
}

#[derive(clap::Args, Debug)]
struct ListArgs {
    #[arg(long)]
    page: Option<u32>,
    #[arg(long)]
    limit: Option<u32>,
    /// Extra query parameter, repeatable
    #[arg(long = "filter", value_name = "KEY=VALUE", value_parser = parse_filter)]
    filters: Vec<(String, String)>,
}

impl ListArgs {
    fn to_options(&self) -> ListOptions {
        let mut options = ListOptions::new();
        options.page = self.page;
        options.limit = self.limit;
        for (key, value) in &self.filters {
            options = options.filter(key, value);
        }
        options
    }
}

/// Ids go into the request path unescaped, so refuse anything that would
/// change which URL is hit
fn parse_item_id(raw: &str) -> std::result::Result<String, String> {
    if raw.is_empty() || raw == "." || raw == ".." {
        return Err(format!("invalid id: {:?}", raw));
    }
    if let Some(c) = raw.chars().find(|c| matches!(c, '/' | '?' | '#' | '\\')) {
        return Err(format!("id must not contain {:?}", c));
    }
    Ok(raw.to_string())
}

fn parse_filter(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {:?}", raw)),
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn as_filter(self) -> Option<&'static str> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some("error"),
            LogLevel::Warn => Some("warn"),
            LogLevel::Info => Some("info"),
            LogLevel::Debug => Some("debug"),
            LogLevel::Trace => Some("trace"),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let directive = level.as_filter()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Warning: cannot open log file {:?}: {}", log_path, err);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    // RUST_LOG wins over --log-level when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("bizfly started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("bizfly").join("bizfly.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".bizfly").join("bizfly.log");
    }
    PathBuf::from("bizfly.log")
}

fn print_output<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    if let Err(err) = run(args).await {
        match err.downcast_ref::<bizfly::Error>() {
            Some(api_err) => eprintln!("Error: {}", format_api_error(api_err)),
            None => eprintln!("Error: {err:#}"),
        }
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = Config::load();

    match args.command {
        Command::Config(command) => {
            let output = args.global.output_for(&config);
            run_config(command, config, output)
        }
        Command::Key(command) => {
            let (client, output) = connect(&args.global, config)?;
            run_key(command, &client, output).await
        }
        Command::Snapshot(command) => {
            let (client, output) = connect(&args.global, config)?;
            run_snapshot(command, &client, output).await
        }
    }
}

/// Build a client from the saved config plus this invocation's overrides
fn connect(global: &GlobalArgs, mut config: Config) -> Result<(Client, OutputFormat)> {
    if let Some(api_url) = &global.api_url {
        config.api_url = Some(api_url.clone());
    }
    if let Some(project_id) = &global.project_id {
        config.project_id = Some(project_id.clone());
    }
    if global.auth_token.is_none() {
        tracing::warn!("No auth token configured, requests will be unauthenticated");
    }

    let transport = config.transport_config(global.auth_token.as_deref())?;
    let client = Client::from_config(transport).context("Failed to create HTTP client")?;

    Ok((client, global.output_for(&config)))
}

async fn run_key(command: KeyCommand, client: &Client, output: OutputFormat) -> Result<()> {
    let keys = client.storage_keys();
    match command {
        KeyCommand::Create {
            subuser_id,
            access_key,
            secret_key,
        } => {
            let request = KeyCreateRequest {
                subuser_id,
                access_key,
                secret_key,
            };
            print_output(&keys.create(&request).await?, output)
        }
        KeyCommand::Get { access_key } => print_output(&keys.get(&access_key).await?, output),
        KeyCommand::Delete { access_key } => {
            keys.delete(&access_key).await?;
            println!("Deleted key {}", access_key);
            Ok(())
        }
        KeyCommand::List(list) => print_output(&keys.list(&list.to_options()).await?, output),
    }
}

async fn run_snapshot(
    command: SnapshotCommand,
    client: &Client,
    output: OutputFormat,
) -> Result<()> {
    let snapshots = client.snapshots();
    match command {
        SnapshotCommand::Create {
            name,
            volume_id,
            force,
        } => {
            let request = SnapshotCreateRequest {
                name,
                volume_id,
                force,
            };
            print_output(&snapshots.create(&request).await?, output)
        }
        SnapshotCommand::Get { id } => print_output(&snapshots.get(&id).await?, output),
        SnapshotCommand::Delete { id } => {
            snapshots.delete(&id).await?;
            println!("Deleted snapshot {}", id);
            Ok(())
        }
        SnapshotCommand::List(list) => {
            print_output(&snapshots.list(&list.to_options()).await?, output)
        }
    }
}

fn run_config(command: ConfigCommand, mut config: Config, output: OutputFormat) -> Result<()> {
    match command {
        ConfigCommand::Show => print_output(&config, output),
        ConfigCommand::SetApiUrl { url } => config.set_api_url(&url),
        ConfigCommand::SetProject { project_id } => config.set_project(&project_id),
        ConfigCommand::SetEndpoint { service, url } => config.set_endpoint(&service, &url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            parse_filter("status=available").unwrap(),
            ("status".to_string(), "available".to_string())
        );
        assert_eq!(
            parse_filter("name=a=b").unwrap(),
            ("name".to_string(), "a=b".to_string())
        );
        assert!(parse_filter("=x").is_err());
        assert!(parse_filter("novalue").is_err());
    }

    #[test]
    fn test_parse_item_id() {
        assert_eq!(parse_item_id("AK123").unwrap(), "AK123");
        assert_eq!(parse_item_id("snap-1.v2").unwrap(), "snap-1.v2");
        for bad in ["", ".", "..", "a/b", "a?b", "a#b", "a\\b"] {
            assert!(parse_item_id(bad).is_err(), "{:?} should be rejected", bad);
        }

        assert!(Args::try_parse_from(["bizfly", "snapshot", "delete", ".."]).is_err());
        assert!(Args::try_parse_from(["bizfly", "key", "get", "AK?x=1"]).is_err());
        assert!(Args::try_parse_from(["bizfly", "key", "get", "AK1"]).is_ok());
    }

    #[test]
    fn test_output_flag_overrides_config() {
        let config = Config {
            output: OutputFormat::Json,
            ..Config::default()
        };

        let args = Args::parse_from(["bizfly", "config", "show", "--output", "yaml"]);
        assert_eq!(args.global.output_for(&config), OutputFormat::Yaml);

        let args = Args::parse_from(["bizfly", "-o", "yaml", "config", "show"]);
        assert_eq!(args.global.output_for(&config), OutputFormat::Yaml);

        let args = Args::parse_from(["bizfly", "config", "show"]);
        assert_eq!(args.global.output_for(&config), OutputFormat::Json);
    }

    #[test]
    fn test_list_args_to_options() {
        let args = Args::parse_from([
            "bizfly", "snapshot", "list", "--page", "2", "--filter", "status=error",
        ]);
        let Command::Snapshot(SnapshotCommand::List(list)) = args.command else {
            panic!("expected snapshot list");
        };
        let options = list.to_options();
        assert_eq!(options.page, Some(2));
        assert_eq!(options.limit, None);
        assert_eq!(options.filters.get("status").map(String::as_str), Some("error"));
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
