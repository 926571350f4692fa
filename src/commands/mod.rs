/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `chat`    — Interactive chat session
- `ask`     — One question, one reply
- `account` — Login, signup, profile and account deletion

Handlers are small and delegate to the library components: the chat
session, the completion provider and the backend client.
*/

use crate::backend::BackendClient;
use crate::chat::{ChatSession, Message, Role};
use crate::config::Config;
use crate::error::Result;
use crate::providers::create_provider;
use colored::Colorize;
use prettytable::{format, Table};
use std::sync::Arc;

// Special commands parser for the interactive session
pub mod special_commands;

/// Pick the user id from the command line, falling back to config/env
pub fn resolve_user_id(cli_value: Option<String>, config: &Config) -> Option<String> {
    cli_value
        .filter(|id| !id.trim().is_empty())
        .or_else(|| config.chat.user_id.clone())
}

/// Build a chat session from configuration
///
/// When a user id is known, accepted prompts are forwarded to that user's
/// remote history through `backend`.
///
/// # Errors
///
/// Returns error if the completion provider cannot be created
pub fn build_session(
    config: &Config,
    user_id: Option<String>,
    backend: Arc<BackendClient>,
) -> Result<ChatSession> {
    let provider = create_provider(config)?;
    let session = ChatSession::new(Arc::from(provider));

    Ok(match user_id {
        Some(id) => session.with_history(backend, id),
        None => {
            tracing::warn!("No user id supplied; prompts will not be saved to history");
            session
        }
    })
}

/// Render a transcript message for the terminal
pub fn format_message(message: &Message) -> String {
    let header = match message.role() {
        Role::User => format!("[{}] You", message.display_time()).blue().bold(),
        Role::Assistant => format!("[{}] ZenMedic", message.display_time())
            .cyan()
            .bold(),
    };
    format!("{}\n{}\n", header, message.content())
}

/// Build the table of stored prompts
pub fn history_table(history: &[String]) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BORDERS_ONLY);
    table.add_row(prettytable::row!["#".bold(), "Prompt".bold()]);

    for (index, prompt) in history.iter().enumerate() {
        table.add_row(prettytable::row![index + 1, truncate(prompt, 60)]);
    }

    table
}

fn truncate(text: &str, max_chars: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() > max_chars {
        let cut: String = single_line.chars().take(max_chars - 3).collect();
        format!("{}...", cut)
    } else {
        single_line
    }
}

/// True when a non-empty completion API key is configured
pub fn has_api_key(config: &Config) -> bool {
    config
        .completion
        .api_key
        .as_deref()
        .is_some_and(|key| !key.is_empty())
}

fn print_disclaimer() {
    println!(
        "{}",
        "Medical information provided. If symptoms are serious, consult a healthcare professional."
            .dimmed()
    );
}

// Chat command handler
pub mod chat {
    //! Interactive chat session handler.
    //!
    //! Builds the provider and backend client, creates a `ChatSession`, and
    //! runs a readline loop that submits each line to the session.

    use super::*;
    use crate::chat::SubmitOutcome;
    use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;
    use std::future::Future;

    const PROMPT: &str = "you> ";

    /// Start interactive chat mode
    ///
    /// # Arguments
    ///
    /// * `config` - Global configuration (consumed)
    /// * `user_id` - Optional override for the configured user id
    pub async fn run_chat(config: Config, user_id: Option<String>) -> Result<()> {
        tracing::info!("Starting interactive chat mode");

        let user_id = resolve_user_id(user_id, &config);
        let backend = Arc::new(BackendClient::new(config.backend.clone())?);
        let session = build_session(&config, user_id.clone(), backend.clone())?;

        if !has_api_key(&config) {
            eprintln!(
                "{}",
                "No API key configured (set MISTRAL_API_KEY or ZENMEDIC_API_KEY); replies will fail."
                    .yellow()
            );
        }

        let mut rl = DefaultEditor::new()?;

        print_welcome_banner();

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    match parse_special_command(trimmed) {
                        Ok(SpecialCommand::NewConversation) => {
                            session.new_conversation();
                            print_welcome_banner();
                            continue;
                        }
                        Ok(SpecialCommand::History) => {
                            show_history(&backend, user_id.as_deref()).await;
                            continue;
                        }
                        Ok(SpecialCommand::ShowStatus) => {
                            print_status_display(&session);
                            continue;
                        }
                        Ok(SpecialCommand::Help) => {
                            print_help();
                            continue;
                        }
                        Ok(SpecialCommand::Exit) => break,
                        Ok(SpecialCommand::None) => {
                            // Regular prompt
                        }
                        Err(e) => {
                            eprintln!("{}", e.to_string().red());
                            continue;
                        }
                    }

                    rl.add_history_entry(trimmed)?;

                    println!("{}", "ZenMedic is thinking... (Ctrl-C to cancel)".dimmed());
                    match submit_until(&session, &line, ctrl_c()).await {
                        SubmitOutcome::Replied(message) => println!("\n{}", format_message(&message)),
                        SubmitOutcome::Rejected(reason) => {
                            tracing::debug!("Submission rejected: {:?}", reason);
                        }
                        SubmitOutcome::Discarded => {
                            println!("{}", "Request cancelled.".yellow());
                            print_welcome_banner();
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("CTRL-C");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("CTRL-D");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {:?}", err);
                    break;
                }
            }
        }

        println!("Take care!");
        Ok(())
    }

    /// Submit `line`, starting a new conversation if `interrupt` fires first
    ///
    /// The interrupted submission is still driven to completion so its
    /// history sync finishes; it comes back as `SubmitOutcome::Discarded`.
    async fn submit_until<F>(session: &ChatSession, line: &str, interrupt: F) -> SubmitOutcome
    where
        F: Future<Output = ()>,
    {
        let submit = session.submit(line);
        tokio::pin!(submit);

        tokio::select! {
            outcome = &mut submit => outcome,
            _ = interrupt => {
                tracing::info!("Request interrupted; starting a new conversation");
                session.new_conversation();
                submit.await
            }
        }
    }

    async fn ctrl_c() {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }

    /// Display the welcome banner shown at start and after `/new`
    fn print_welcome_banner() {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                 ZenMedic - Medical Assistant                 ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Describe your symptoms or ask a medical question.");
        print_disclaimer();
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }

    /// Display user, model and transcript status
    fn print_status_display(session: &ChatSession) {
        println!("\n{}", "Session Status".bold());
        println!(
            "  User:          {}",
            session.user_id().unwrap_or("(not logged in)")
        );
        println!(
            "  Model:         {}",
            session.model().unwrap_or_else(|| "-".to_string())
        );
        println!("  Messages:      {}", session.len());
        println!("  Conversation:  #{}\n", session.generation() + 1);
    }

    async fn show_history(backend: &BackendClient, user_id: Option<&str>) {
        let Some(user_id) = user_id else {
            println!("{}", "Log in or pass --user-id to see your history.".yellow());
            return;
        };

        match backend.fetch_history(user_id).await {
            Ok(history) if history.is_empty() => {
                println!("{}", "No prompts in your history yet.".yellow());
            }
            Ok(history) => {
                println!("\nYour History:");
                history_table(&history).printstd();
                println!();
            }
            Err(e) => eprintln!("{}", format!("Could not load history: {}", e).red()),
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::test_utils::{GatedProvider, StaticProvider};

        #[tokio::test]
        async fn test_submit_until_completes_without_interrupt() {
            let session = ChatSession::new(Arc::new(StaticProvider::new("Drink water.")));

            let outcome = submit_until(&session, "I feel thirsty", std::future::pending()).await;
            assert!(matches!(outcome, SubmitOutcome::Replied(_)));
            assert_eq!(session.len(), 2);
        }

        #[tokio::test]
        async fn test_submit_until_interrupt_discards_reply_and_resets() {
            let provider = Arc::new(GatedProvider::new("late reply"));
            let session = ChatSession::new(provider.clone());

            let outcome = submit_until(&session, "I have chest pain", provider.wait_started()).await;

            assert_eq!(outcome, SubmitOutcome::Discarded);
            assert!(session.is_empty());
            assert!(session.is_welcome());
            assert!(!session.is_in_flight());
            assert_eq!(session.generation(), 1);
        }

        #[test]
        fn test_print_welcome_banner() {
            print_welcome_banner();
        }

        #[test]
        fn test_print_status_display_without_user() {
            let session = ChatSession::new(Arc::new(StaticProvider::new("x")));
            print_status_display(&session);
        }

        #[tokio::test]
        async fn test_show_history_without_user_does_not_call_backend() {
            // An unroutable base URL would fail loudly if a request were made
            let backend = BackendClient::new(crate::config::BackendConfig {
                base_url: "http://127.0.0.1:9".to_string(),
                ..Default::default()
            })
            .unwrap();
            show_history(&backend, None).await;
        }
    }
}

// Single-prompt command handler
pub mod ask {
    //! One question, one reply, then exit.

    use super::*;
    use crate::chat::{RejectReason, SubmitOutcome};
    use crate::error::ZenmedicError;

    /// Submit one prompt and print the resulting transcript
    ///
    /// # Returns
    ///
    /// Returns the transcript messages so callers can inspect the exchange
    ///
    /// # Errors
    ///
    /// Returns error if the prompt is empty or the provider cannot be built
    pub async fn run_ask(
        config: Config,
        prompt: String,
        user_id: Option<String>,
    ) -> Result<Vec<Message>> {
        let user_id = resolve_user_id(user_id, &config);
        let backend = Arc::new(BackendClient::new(config.backend.clone())?);
        let session = build_session(&config, user_id, backend)?;

        match session.submit(&prompt).await {
            SubmitOutcome::Rejected(RejectReason::Empty) => {
                return Err(
                    ZenmedicError::Validation(vec!["Prompt cannot be empty".to_string()]).into(),
                );
            }
            outcome => tracing::debug!("Ask outcome: {:?}", outcome),
        }

        let messages = session.messages();
        for message in &messages {
            println!("{}", format_message(message));
        }
        print_disclaimer();

        Ok(messages)
    }
}

// Account command handlers
pub mod account {
    //! Login, signup, profile and account deletion.
    //!
    //! These are thin wrappers over the backend client; credentials are
    //! validated locally before any request is sent.

    use super::*;
    use crate::backend::{validate_login, validate_signup, Profile};
    use crate::error::ZenmedicError;
    use rustyline::DefaultEditor;

    fn backend(config: &Config) -> Result<BackendClient> {
        BackendClient::new(config.backend.clone())
    }

    fn require_user_id(user_id: Option<String>, config: &Config) -> Result<String> {
        resolve_user_id(user_id, config).ok_or_else(|| ZenmedicError::MissingUserId.into())
    }

    /// Log in and print the user id
    ///
    /// # Errors
    ///
    /// Returns error if validation fails or the backend rejects the login
    pub async fn login(config: &Config, email: &str, password: &str) -> Result<String> {
        validate_login(email, password)?;
        let user_id = backend(config)?.login(email, password).await?;

        println!("{}", "Logged in.".green());
        print_user_id_hint(&user_id);
        Ok(user_id)
    }

    /// Create an account and print the new user id
    ///
    /// # Errors
    ///
    /// Returns error if validation fails or the backend rejects the signup
    pub async fn signup(
        config: &Config,
        name: &str,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<String> {
        validate_signup(name, email, password, confirm_password)?;
        let user_id = backend(config)?.signup(name, email, password).await?;

        println!("{}", "Account created.".green());
        print_user_id_hint(&user_id);
        Ok(user_id)
    }

    fn print_user_id_hint(user_id: &str) {
        println!("User id: {}", user_id.cyan());
        println!(
            "Start chatting with {}",
            format!("zenmedic chat --user-id {}", user_id).cyan()
        );
    }

    /// Show account details and stored prompts
    ///
    /// # Errors
    ///
    /// Returns error if no user id is known or the backend request fails
    pub async fn show_profile(config: &Config, user_id: Option<String>) -> Result<Profile> {
        let user_id = require_user_id(user_id, config)?;
        let profile = backend(config)?.profile(&user_id).await?;

        println!("\n{}", "Profile".bold());
        println!("  Name:         {}", profile.name);
        println!("  Email:        {}", profile.email);
        println!("  Total chats:  {}\n", profile.total_chats);

        if profile.history.is_empty() {
            println!("{}", "No prompts in your history yet.".yellow());
        } else {
            history_table(&profile.history).printstd();
            println!();
        }

        Ok(profile)
    }

    /// Permanently delete an account
    ///
    /// Without `yes`, asks the user to type `delete` first.
    ///
    /// # Returns
    ///
    /// Returns true if the account was deleted
    ///
    /// # Errors
    ///
    /// Returns error if no user id is known or the backend request fails
    pub async fn delete_account(config: &Config, user_id: Option<String>, yes: bool) -> Result<bool> {
        let user_id = require_user_id(user_id, config)?;

        if !yes {
            println!(
                "{}",
                "This permanently deletes your account and all stored history."
                    .red()
                    .bold()
            );
            let mut rl = DefaultEditor::new()?;
            let answer = rl.readline("Type 'delete' to confirm: ")?;
            if answer.trim() != "delete" {
                println!("Account deletion cancelled.");
                return Ok(false);
            }
        }

        backend(config)?.delete_account(&user_id).await?;
        println!("{}", format!("Deleted account {}", user_id).green());
        Ok(true)
    }

}
