//! Non-interactive subcommands.
//!
//! `adverifier` with no subcommand starts the terminal UI; the subcommands
//! below share the same configuration, credential storage and session.

use std::sync::Arc;

use adverifier_core::auth::{CredentialStorage, MemoryStorage};
use adverifier_core::config::API_URL_ENV;
use adverifier_core::history::{default_date, group_by_date, messages_for_date};
use adverifier_core::models::ChatMessage;
use adverifier_core::utils::format_date;
use adverifier_core::{Config, SessionStore};
use anyhow::{anyhow, bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing::{debug, warn};

use crate::forms::{validate_login, validate_registration};

#[derive(Parser, Debug)]
#[command(name = "adverifier", version, about = "Terminal client for the AdVerifier ad credibility service")]
pub struct Cli {
    /// Backend address, e.g. http://localhost:8000
    #[arg(long, global = true, env = API_URL_ENV)]
    pub api_url: Option<String>,

    /// Keep credentials in memory only; nothing is written to disk
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the session
    Login {
        /// Defaults to the last username used
        username: Option<String>,
    },
    /// Create an account and log in
    Register { username: String, email: String },
    /// Forget the stored session
    Logout,
    /// Show who is logged in
    Whoami,
    /// Send a message to the verification bot
    Send {
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },
    /// Show chat history for one date (newest date by default)
    History {
        /// Date as YYYY-MM-DD
        #[arg(long)]
        date: Option<NaiveDate>,
        /// List dates with message counts instead of messages
        #[arg(long)]
        dates: bool,
    },
}

/// Build the session store the way both the TUI and the subcommands use it,
/// and restore any stored session.
pub fn open_session(config: &Config, api_url: Option<&str>, ephemeral: bool) -> Result<SessionStore> {
    let storage: Arc<dyn CredentialStorage> = if ephemeral {
        Arc::new(MemoryStorage::new())
    } else {
        config.credential_storage()?
    };
    let base_url = api_url
        .map(str::to_string)
        .unwrap_or_else(|| config.api_base_url());
    debug!(base_url = %base_url, ephemeral, "Opening session");

    let session = SessionStore::new(&base_url, config.request_timeout(), storage)?;
    session.hydrate();
    Ok(session)
}

fn prompt_password(prompt: &str) -> Result<String> {
    rpassword::prompt_password(prompt).context("Failed to read password")
}

fn remember_username(config: &mut Config, username: &str) {
    config.last_username = Some(username.to_string());
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }
}

fn print_message(message: &ChatMessage) {
    println!("{} • {}", message.sender().label(), message.local_time());
    for line in message.message.lines() {
        println!("  {}", line);
    }
    println!();
}

fn require_login(session: &SessionStore) -> Result<()> {
    if session.identity().is_none() {
        bail!("Not logged in. Run `adverifier login` first.");
    }
    Ok(())
}

pub async fn run(command: Command, mut config: Config, session: SessionStore) -> Result<()> {
    match command {
        Command::Login { username } => {
            let username = username
                .or_else(|| config.last_username.clone())
                .ok_or_else(|| anyhow!("Username required"))?;
            let password = prompt_password(&format!("Password for {}: ", username))?;
            validate_login(&username, &password).map_err(|msg| anyhow!(msg))?;

            session.login(&username, &password).await.map_err(|e| anyhow!(e.message()))?;
            remember_username(&mut config, &username);
            let shown = session.handle().email().filter(|e| !e.is_empty()).unwrap_or(username);
            println!("Logged in as {}", shown);
        }
        Command::Register { username, email } => {
            let password = prompt_password("Password: ")?;
            let confirm = prompt_password("Confirm password: ")?;
            validate_registration(&username, &email, &password, &confirm).map_err(|msg| anyhow!(msg))?;

            session
                .register(&username, &email, &password)
                .await
                .map_err(|e| anyhow!(e.message()))?;
            remember_username(&mut config, &username);
            println!("Registered and logged in as {}", email);
        }
        Command::Logout => {
            session.logout();
            println!("Logged out");
        }
        Command::Whoami => match session.identity() {
            Some(identity) if identity.email.is_empty() => println!("User {}", identity.id),
            Some(identity) => println!("{} (user {})", identity.email, identity.id),
            None => println!("Not logged in"),
        },
        Command::Send { message } => {
            require_login(&session)?;
            let text = message.join(" ");
            if text.trim().is_empty() {
                bail!("Message is empty");
            }
            let reply = session.api().send_chat_message(text.trim()).await?;
            print_message(&reply.into_message());
        }
        Command::History { date, dates } => {
            require_login(&session)?;
            let messages = session.api().fetch_chat_messages().await?;
            let groups = group_by_date(&messages, &Local);

            if dates {
                for group in &groups {
                    println!("{}  ({} messages)", format_date(group.date), group.messages.len());
                }
                return Ok(());
            }

            let Some(date) = date.or_else(|| default_date(&groups)) else {
                println!("No Chat History");
                return Ok(());
            };
            let selected = messages_for_date(&messages, date, &Local);
            if selected.is_empty() {
                println!("No messages on {}", format_date(date));
                return Ok(());
            }
            println!("{}\n", format_date(date));
            for message in &selected {
                print_message(message);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::parse_from(["adverifier", "--ephemeral", "send", "Verify", "this", "ad"]);
        assert!(cli.ephemeral);
        match cli.command {
            Some(Command::Send { message }) => assert_eq!(message.join(" "), "Verify this ad"),
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::parse_from(["adverifier", "history", "--date", "2025-03-02"]);
        match cli.command {
            Some(Command::History { date, dates }) => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 2));
                assert!(!dates);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = Cli::parse_from(["adverifier"]);
        assert!(cli.command.is_none());
    }

    #[tokio::test]
    async fn test_send_requires_login() {
        let session = open_session(&Config::default(), Some("http://127.0.0.1:9"), true).unwrap();
        let err = run(
            Command::Send { message: vec!["hi".to_string()] },
            Config::default(),
            session,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("Not logged in"));
    }

    #[tokio::test]
    async fn test_ephemeral_session_uses_given_url() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "token": "T", "user_id": 7, "email": "a@x.com"
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/chat/"))
            .and(header("Authorization", "Token T"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user_message": "hi",
                "bot_response": "Hello!",
                "timestamp": "2025-03-02T10:15:00Z"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let session = open_session(&Config::default(), Some(server.uri().as_str()), true).unwrap();
        assert!(session.identity().is_none());
        assert!(!session.is_loading());
        session.login("alice", "pw").await.unwrap();

        run(
            Command::Send { message: vec!["hi".to_string()] },
            Config::default(),
            session,
        )
        .await
        .unwrap();
    }
}
