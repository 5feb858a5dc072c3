//! One-shot chat from the command line.

use anyhow::Result;
use console::style;

use doula_types::turn::ChatRequest;

use crate::state::AppState;

/// Submit `message` to `session` and print the reply.
///
/// # Examples
///
/// ```bash
/// doula chat s1 "Is it safe to drink coffee?"
/// doula chat s1 "Hello" --user patient-7 --json
/// ```
pub async fn send(
    state: &AppState,
    session_id: &str,
    user_id: &str,
    message: &str,
    json: bool,
) -> Result<()> {
    let request = ChatRequest {
        session_id: session_id.to_string(),
        user_id: user_id.to_string(),
        message: message.to_string(),
    };
    let reply = state.chat_service.submit(&request).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&reply)?);
        return Ok(());
    }

    println!();
    println!("  {} {}", style("assistant").magenta().bold(), style("›").dim());
    for line in reply.reply.lines() {
        println!("  {line}");
    }
    println!();
    Ok(())
}
