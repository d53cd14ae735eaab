pub mod balance;
pub mod contacts;
pub mod detail;
pub mod feed;
pub mod help;
pub mod send;

use tracing::{debug, error};

use crate::AppContext;

/// What the input loop should do after a line
#[derive(Debug, PartialEq)]
pub enum Reply {
    Text(String),
    Quit,
    Nothing,
}

pub async fn handle_line(ctx: &AppContext, line: &str) -> Reply {
    // Parse command and arguments
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.is_empty() {
        return Reply::Nothing;
    }

    let command = parts[0].to_lowercase();
    let args = &parts[1..];
    debug!("Command {} with {} args", command, args.len());

    let result = match command.as_str() {
        "help" | "?" => Ok(help::execute()),
        "balance" | "bal" => balance::execute(ctx, args).await,
        "feed" | "movements" | "mov" => feed::execute(ctx, args).await,
        "refresh" => feed::refresh(ctx).await,
        "more" => feed::more(ctx).await,
        "detail" | "d" => detail::execute(ctx, args).await,
        "contacts" | "c" => contacts::execute(ctx, args),
        "send" | "sinpe" => send::execute(ctx, args).await,
        "quit" | "exit" => return Reply::Quit,
        other => Err(format!("Unknown command `{}`. Type `help` for the list.", other)),
    };

    match result {
        Ok(text) => Reply::Text(text),
        Err(e) => {
            error!("Error executing command {}: {}", command, e);
            Reply::Text(user_message(&e))
        }
    }
}

/// Turn an error string into what the user sees
fn user_message(error_msg: &str) -> String {
    if error_msg.contains("Rate Limited") {
        "⚠️ Rate Limited: the bank is throttling requests. Please try again in a moment.".to_string()
    } else if error_msg.contains("Request Error") || error_msg.contains("timed out") {
        "⚠️ Network Error: could not reach the bank. Please try again.".to_string()
    } else if !error_msg.trim().is_empty() {
        format!("❌ {}", error_msg.trim())
    } else {
        "❌ An error occurred while executing the command.".to_string()
    }
}
