//! Session log browsing.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use doula_core::chat::repository::TurnStore;
use doula_infra::sqlite::pool::DatabasePool;
use doula_infra::sqlite::turn::SqliteTurnStore;
use doula_types::llm::MessageRole;

use super::truncate;

/// Print a session's stored turns, oldest first.
///
/// # Examples
///
/// ```bash
/// doula history s1
/// doula history s1 -n 20 --json
/// ```
pub async fn show(
    pool: &DatabasePool,
    session_id: &str,
    limit: Option<i64>,
    offset: Option<i64>,
    json: bool,
) -> Result<()> {
    let store = SqliteTurnStore::new(pool.clone());
    let turns = store.list_turns(session_id, limit, offset).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&turns)?);
        return Ok(());
    }

    if turns.is_empty() {
        println!();
        println!(
            "  {} No turns stored for session '{}'.",
            style("i").blue().bold(),
            style(session_id).cyan()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("#").fg(Color::White),
        Cell::new("When").fg(Color::White),
        Cell::new("Role").fg(Color::White),
        Cell::new("Author").fg(Color::White),
        Cell::new("Text").fg(Color::White),
    ]);

    for turn in &turns {
        let role_color = match turn.role {
            MessageRole::User => Color::Cyan,
            MessageRole::Assistant => Color::Magenta,
            MessageRole::System => Color::Yellow,
        };
        table.add_row(vec![
            Cell::new(turn.seq),
            Cell::new(turn.created_at.format("%Y-%m-%d %H:%M:%S").to_string()),
            Cell::new(turn.role.to_string()).fg(role_color),
            Cell::new(&turn.author_id),
            Cell::new(truncate(&turn.text, 60)),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} turn(s) in session {}",
        style(turns.len()).bold(),
        style(session_id).cyan()
    );
    println!();
    Ok(())
}
