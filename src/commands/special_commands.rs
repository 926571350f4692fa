//! Special commands parser for interactive chat mode
//!
//! Special commands change the session instead of being sent to the model:
//! - Start a new conversation
//! - Show the remote prompt history
//! - View session status
//! - Display help information
//! - Exit the session
//!
//! Commands are prefixed with `/` and are case-insensitive.

use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),

    /// Command was given an argument it does not take
    #[error("{command} does not take arguments (got: {arg})")]
    UnexpectedArgument { command: String, arg: String },
}

/// Special commands that can be executed during interactive chat
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Clear the transcript and show the welcome banner again
    NewConversation,

    /// Show prompts stored in the remote history
    History,

    /// Display user, model and transcript status
    ShowStatus,

    /// Display help information
    Help,

    /// Exit the interactive session
    Exit,

    /// Not a special command
    ///
    /// The input should be sent to the model.
    None,
}

/// Parse a user input string into a special command
///
/// # Errors
///
/// Returns `CommandError::UnknownCommand` if input starts with "/" but is not
/// a valid command, and `CommandError::UnexpectedArgument` if a command is
/// followed by extra words.
///
/// # Examples
///
/// ```
/// use zenmedic::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/new").unwrap(), SpecialCommand::NewConversation);
/// assert_eq!(parse_special_command("I feel dizzy").unwrap(), SpecialCommand::None);
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();
    let lower = trimmed.to_lowercase();

    // If input doesn't start with "/", it's not a command (except exit/quit)
    if !trimmed.starts_with('/') && lower != "exit" && lower != "quit" {
        return Ok(SpecialCommand::None);
    }

    let mut words = lower.split_whitespace();
    let command = words.next().unwrap_or_default();
    let rest: Vec<&str> = words.collect();

    let parsed = match command {
        "/new" | "/reset" | "/clear" => SpecialCommand::NewConversation,
        "/history" => SpecialCommand::History,
        "/status" => SpecialCommand::ShowStatus,
        "/help" | "/?" => SpecialCommand::Help,
        "exit" | "quit" | "/exit" | "/quit" => SpecialCommand::Exit,
        other => return Err(CommandError::UnknownCommand(other.to_string())),
    };

    if !rest.is_empty() {
        return Err(CommandError::UnexpectedArgument {
            command: command.to_string(),
            arg: rest.join(" "),
        });
    }

    Ok(parsed)
}

/// Display help for interactive chat mode
pub fn print_help() {
    println!(
        r#"
Special Commands for Interactive Chat Mode
===========================================

CONVERSATION:
  /new            - Start a new conversation (clears the transcript)
  /reset, /clear  - Same as /new

HISTORY:
  /history        - Show prompts stored in your account history

SESSION INFORMATION:
  /status         - Show user, model and message count
  /help           - Show this help message
  /?              - Same as /help

SESSION CONTROL:
  exit            - Exit interactive mode
  quit            - Same as exit

NOTES:
  - Commands are case-insensitive
  - Regular text (not starting with /) is sent to the assistant
  - Each question is answered on its own; earlier messages are not sent
  - Replies are general information; consult a healthcare professional
    for serious symptoms
"#
    );
}
