use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{ClientConfig, CsrfToken};
use crate::message::MessageId;
use crate::render::render;
use crate::store::{MessageStore, RestMessageStore};
use crate::view_model::MessageListViewModel;

/// message-inbox - browse and post messages on a message REST service
#[derive(Parser, Debug)]
#[command(name = "message-inbox")]
#[command(about = "Inbox, detail and compose views for a message REST service")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Configuration file path
    #[arg(long = "config", global = true)]
    pub config_file: Option<PathBuf>,

    /// Override the service base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// CSRF header name sent with every request
    #[arg(long, global = true, requires = "csrf_token")]
    pub csrf_header: Option<String>,

    /// CSRF token value
    #[arg(long, global = true, requires = "csrf_header")]
    pub csrf_token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Show the inbox
    List,

    /// Show a single message
    Show {
        /// Message id
        id: String,
    },

    /// Compose and save a new message
    Compose(ComposeArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ComposeArgs {
    /// Message body
    #[arg(long)]
    pub text: String,

    /// Short summary
    #[arg(long)]
    pub summary: Option<String>,
}

#[derive(Args, Debug, Clone, PartialEq)]
pub struct ConfigArgs {
    /// Write the effective configuration back to the config file
    #[arg(long)]
    pub write: bool,
}

impl Cli {
    pub fn config_path(&self) -> Option<PathBuf> {
        self.config_file.clone().or_else(ClientConfig::default_path)
    }

    /// Layer command line overrides on top of the file configuration
    pub fn apply_overrides(&self, config: &mut ClientConfig) {
        if let Some(ref base_url) = self.base_url {
            config.base_url = base_url.clone();
        }
        if let (Some(header), Some(token)) = (&self.csrf_header, &self.csrf_token) {
            config.csrf = Some(CsrfToken::new(header.clone(), token.clone()));
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout_secs = Some(timeout);
        }
    }
}

/// Runs commands against the message service
pub struct CliHandler {
    config: ClientConfig,
    config_path: Option<PathBuf>,
}

impl CliHandler {
    /// Load configuration and apply command line overrides
    pub async fn new(cli: &Cli) -> Result<Self> {
        let config_path = cli.config_path();
        let mut config = match config_path {
            Some(ref path) => ClientConfig::load_from_file(path)
                .await
                .with_context(|| format!("Loading {}", path.display()))?,
            None => ClientConfig::default(),
        };
        cli.apply_overrides(&mut config);
        config.validate()?;

        Ok(Self {
            config,
            config_path,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Handle a command, printing the rendered screen
    pub async fn handle_command(&self, command: Commands) -> Result<()> {
        if let Commands::Config(args) = command {
            return self.handle_config(args).await;
        }

        let store = RestMessageStore::from_config(&self.config)?;
        let output = run_with_store(store, command).await?;
        print!("{}", output);
        Ok(())
    }

    async fn handle_config(&self, args: ConfigArgs) -> Result<()> {
        if args.write {
            let path = self
                .config_path
                .as_ref()
                .ok_or_else(|| anyhow!("Cannot find config directory"))?;
            self.config.save_to_file(path).await?;
            println!("Configuration written to {}", path.display());
        } else {
            print!("{}", self.config.to_toml()?);
        }
        Ok(())
    }
}

/// Wait for the snapshot watcher; returns false if it panicked or was cancelled
async fn join_watcher(watcher: tokio::task::JoinHandle<()>) -> bool {
    match watcher.await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("View watcher task failed: {}", e);
            false
        }
    }
}

/// Drive a view model through `command` and return the final rendered screen
pub async fn run_with_store<S: MessageStore>(store: S, command: Commands) -> Result<String> {
    let mut view_model = MessageListViewModel::load(store)
        .await
        .context("Loading inbox")?;

    let mut updates = view_model.subscribe();
    let watcher = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update();
            tracing::debug!("view -> {} (revision {})", state.view.name(), state.revision);
        }
    });

    let result = match command {
        Commands::List => Ok(()),
        Commands::Show { id } => {
            let id: MessageId = id.as_str().into();
            view_model.go_to_message_id(id).await
        }
        Commands::Compose(args) => {
            view_model.go_to_compose();
            view_model.edit_draft(|draft| {
                draft.text = Some(args.text);
                draft.summary = args.summary;
            })?;
            view_model.save().await
        }
        Commands::Config(_) => return Err(anyhow!("config does not use the message service")),
    };

    let output = render(view_model.state());
    drop(view_model);
    join_watcher(watcher).await;

    result?;
    Ok(output)
}
