//! Moderator console
//!
//! Interactive terminal client for the moderation API. Lists the queue,
//! shows item details and sends approve, deny and quarantine actions.
//! Actions run in the background; their outcome is printed when it arrives.

mod client;
mod command;
mod config;
mod error;
mod gateway;
mod provider;
mod views;

#[cfg(test)]
mod test_utils;

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use moderation_core::entities::{ModerationFilter, ModerationItemId};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing_subscriber::EnvFilter;

use client::ModerationClient;
use command::{help_text, parse_command, Command};
use config::Config;
use gateway::ModerationGateway;
use provider::{ModerationProvider, QueueEvent};
use views::{render_detail, render_rows, PaneLayout, QueueView, StatsView};

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; stdout is the console itself
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let client = Arc::new(ModerationClient::new(
        &config.api_url,
        &config.api_key,
        config.action_timeout(),
    )?);
    let provider = Arc::new(ModerationProvider::new(client, config.action_timeout()));

    spawn_event_printer(provider.subscribe());

    let mut session = Session::new(provider, config);
    match session.provider.refresh().await {
        Ok(count) => println!("Loaded {} items from {}", count, session.config.api_url),
        Err(e) => println!("!! Could not load the queue: {}", e),
    }
    println!("Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match parse_command(&line) {
            Ok(Command::Quit) => break,
            Ok(command) => session.handle(command).await,
            Err(e) => println!("!! {}", e),
        }
    }

    Ok(())
}

/// Print action outcomes as they arrive
fn spawn_event_printer(mut events: broadcast::Receiver<QueueEvent>) {
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(QueueEvent::ItemModerated { item }) => {
                    println!("\n==> {} is now {}", item.id, item.status);
                }
                Ok(QueueEvent::ActionFailed {
                    item_id,
                    action,
                    error,
                }) => {
                    let hint = if error.is_retryable() {
                        " (retry when the server is reachable)"
                    } else {
                        ""
                    };
                    println!("\n!! {} {} failed: {}{}", action, item_id, error, hint);
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Event printer fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

struct Session<G: ModerationGateway> {
    provider: Arc<ModerationProvider<G>>,
    queue: QueueView<G>,
    filter: ModerationFilter,
    selected: Option<ModerationItemId>,
    config: Config,
}

impl<G: ModerationGateway> Session<G> {
    fn new(provider: Arc<ModerationProvider<G>>, config: Config) -> Self {
        Self {
            queue: QueueView::new(provider.clone()),
            provider,
            filter: ModerationFilter::new(),
            selected: None,
            config,
        }
    }

    async fn handle(&mut self, command: Command) {
        match command {
            Command::List => println!("{}", self.render().await),

            Command::Show { item } => match self.queue.resolve(&item) {
                Some(id) => {
                    self.selected = Some(id);
                    println!("{}", self.render().await);
                }
                None => println!("!! No such row in the last listing"),
            },

            Command::Back => {
                self.selected = None;
                println!("{}", self.render().await);
            }

            Command::Act {
                action,
                item,
                reason,
            } => match self.queue.resolve(&item) {
                Some(id) => {
                    println!("Sending {} for {}...", action, id);
                    // Outcome is reported by the event printer
                    let _ = self
                        .queue
                        .trigger(id, action, reason, self.config.actor_id.clone());
                }
                None => println!("!! No such row in the last listing"),
            },

            Command::Filter { changes } => {
                for change in changes {
                    change.apply(&mut self.filter);
                }
                println!("{}", self.render().await);
            }

            Command::ClearFilter => {
                self.filter = ModerationFilter::new();
                println!("{}", self.render().await);
            }

            Command::Stats => println!("{}", StatsView(&self.provider.stats().await)),

            Command::Refresh => match self.provider.refresh().await {
                Ok(count) => println!("Loaded {} items", count),
                Err(e) => println!("!! Refresh failed: {}", e),
            },

            Command::Help => println!("{}", help_text()),

            Command::Quit => {}
        }
    }

    async fn render(&mut self) -> String {
        let now = Utc::now();
        let layout = PaneLayout::for_viewport(self.config.width, self.selected.is_some());

        let list = match layout.list_width() {
            Some(width) => render_rows(&self.queue.rows(&self.filter).await, now, width),
            None => String::new(),
        };

        let detail = match (&self.selected, layout.detail_width()) {
            (Some(id), Some(width)) => Some(match self.provider.get(id.as_str()).await {
                Some(item) => render_detail(
                    &item,
                    self.provider.pending_action(id).await,
                    now,
                    width,
                ),
                None => format!("{} is no longer in the queue\n", id),
            }),
            _ => None,
        };

        layout.compose(&list, detail.as_deref())
    }
}
