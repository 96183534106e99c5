mod api;
mod api_types;
mod config;
mod error;
mod guard;
mod http_client;
mod output;
mod resolve;
mod response;

use anyhow::Context;
use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::config::{default_config_path, Config, Connection};
use crate::error::CliError;
use crate::guard::{check, guard_api, is_valid_url, warn_deprecated_flag};
use crate::http_client::Client;
use crate::output::{format_bytes, print_json_value};
use crate::resolve::AbbreviationExpander;
use crate::response::{explain_response, ResponseMessages};

#[derive(Parser, Debug)]
#[command(name = "deployctl")]
#[command(about = "Workspace deployment CLI", long_about = None)]
struct Args {
    /// Workspace API URL (overrides the saved login)
    #[arg(long, global = true, env = "DEPLOYCTL_WORKSPACE_URL")]
    workspace_url: Option<String>,

    /// Workspace token (Authorization: Bearer ...)
    #[arg(long, global = true, env = "DEPLOYCTL_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Load the workspace record from this path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// HTTP timeout seconds
    #[arg(long, global = true, default_value_t = 60)]
    timeout_secs: u64,

    /// Log level
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Save --workspace-url (and --token) as the current workspace
    Login {
        /// Deprecated spelling of --workspace-url
        #[arg(long, hide = true)]
        url: Option<String>,
    },

    /// Forget the current workspace
    Logout,

    /// Deployment information
    Deployment {
        #[command(subcommand)]
        cmd: DeploymentCmd,
    },

    /// Workspace storage
    Storage {
        #[command(subcommand)]
        cmd: StorageCmd,
    },
}

#[derive(Subcommand, Debug)]
enum DeploymentCmd {
    /// Show the deployment record
    Get { name: String },
    /// List replicas of a deployment
    Replicas { name: String },
    /// Public IP of a single-replica deployment
    Ip { name: String },
    /// Remove a deployment
    Remove { name: String },
}

#[derive(Subcommand, Debug)]
enum StorageCmd {
    /// Disk usage under a storage path
    Du {
        #[arg(default_value = "/")]
        path: String,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let msg = e.to_string();
        if !msg.is_empty() {
            eprintln!("{msg}");
        }
        std::process::exit(e.exit_code());
    }
}

async fn run() -> Result<(), CliError> {
    let command = Args::command();
    let argv = AbbreviationExpander::new(command.clone()).expand(std::env::args_os())?;
    let matches = command
        .try_get_matches_from(argv)
        .unwrap_or_else(|e| e.exit());
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    // Logging
    let lvl = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(lvl)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to install log subscriber")?;

    let cfg_path = args.config.clone().unwrap_or_else(default_config_path);

    match args.cmd {
        Command::Login { url } => {
            if let Some(sub) = matches.subcommand_matches("login") {
                warn_deprecated_flag(sub, "url", "url", "workspace-url");
            }
            run_login(&cfg_path, args.workspace_url.or(url), args.token)
        }
        Command::Logout => {
            Config::default().save(&cfg_path)?;
            println!("Logged out.");
            Ok(())
        }
        Command::Deployment { cmd } => {
            let client = connect(&cfg_path, args.workspace_url, args.token, args.timeout_secs)?;
            run_deployment(&client, cmd).await
        }
        Command::Storage { cmd } => {
            let client = connect(&cfg_path, args.workspace_url, args.token, args.timeout_secs)?;
            run_storage(&client, cmd).await
        }
    }
}

fn connect(
    cfg_path: &Path,
    workspace_url: Option<String>,
    token: Option<String>,
    timeout_secs: u64,
) -> Result<Client, CliError> {
    let cfg = Config::load(cfg_path)?;
    let conn = Connection::resolve(workspace_url, token, &cfg)?;
    Ok(Client::new(&conn, Duration::from_secs(timeout_secs))?)
}

fn run_login(
    cfg_path: &Path,
    workspace_url: Option<String>,
    token: Option<String>,
) -> Result<(), CliError> {
    let url = workspace_url.context("Missing --workspace-url")?;
    check(
        is_valid_url(&url),
        format!("{url} is not a valid URL (expected e.g. https://workspace.example.com)"),
    )?;

    let mut cfg = Config::load(cfg_path)?;
    cfg.workspace_url = Some(url.trim_end_matches('/').to_string());
    cfg.token = token;
    cfg.save(cfg_path)?;
    println!("Logged in to {}", url.trim_end_matches('/'));
    Ok(())
}

async fn run_deployment(client: &Client, cmd: DeploymentCmd) -> Result<(), CliError> {
    match cmd {
        DeploymentCmd::Get { name } => {
            let v = guard_api(
                api::get_deployment(client, &name).await,
                true,
                Some(format!("Cannot obtain deployment {name}. See error above.")),
            )?;
            print_json_value(&v)?;
        }
        DeploymentCmd::Replicas { name } => {
            let replicas = guard_api(
                api::get_replicas(client, &name).await,
                true,
                Some(format!(
                    "Cannot obtain replica info for {name}. See error above."
                )),
            )?;
            let v = serde_json::to_value(&replicas).context("Failed to encode replicas")?;
            print_json_value(&v)?;
        }
        DeploymentCmd::Ip { name } => match api::only_replica_public_ip(client, &name).await? {
            Some(ip) => println!("{ip}"),
            None => println!("Deployment {name} has no public IP."),
        },
        DeploymentCmd::Remove { name } => {
            let resp = guard_api(
                api::delete_deployment(client, &name).await,
                true,
                Some(format!("Failed to remove deployment {name}.")),
            )?;
            explain_response(
                &resp,
                ResponseMessages {
                    if_2xx: &format!("Deployment {name} deleted."),
                    if_4xx: &format!("Deployment {name} does not exist or cannot be removed."),
                    if_others: &format!("Failed to remove deployment {name}."),
                },
                false,
            )?;
        }
    }
    Ok(())
}

async fn run_storage(client: &Client, cmd: StorageCmd) -> Result<(), CliError> {
    match cmd {
        StorageCmd::Du { path } => {
            let usage = guard_api(
                api::storage_du(client, &path).await,
                true,
                Some(format!("Cannot obtain disk usage for {path}. See error above.")),
            )?;
            let shown = usage.path.as_deref().unwrap_or(&path);
            println!("{shown}: {}", format_bytes(usage.size_bytes));
        }
    }
    Ok(())
}
