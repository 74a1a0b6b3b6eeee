//! Plain-text rendering of the inbox screen

use crate::message::Message;
use crate::view::{View, ViewState};
use std::fmt::Write;

const SUMMARY_WIDTH: usize = 60;

fn field(value: Option<&str>) -> &str {
    value.unwrap_or("")
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

/// One line per message: id, created, summary (falling back to the text)
pub fn render_inbox_line(message: &Message) -> String {
    let id = message.id.as_ref().map(|id| id.to_string()).unwrap_or_default();
    let created = message
        .created
        .as_ref()
        .map(|c| c.to_string())
        .unwrap_or_default();
    let summary = message
        .summary
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(message.text.as_deref())
        .unwrap_or("");

    format!("{:>6}  {:<16}  {}", id, created, truncate(summary, SUMMARY_WIDTH))
}

fn render_message(out: &mut String, message: &Message) {
    if let Some(ref id) = message.id {
        let _ = writeln!(out, "Id:      {}", id);
    }
    if let Some(ref created) = message.created {
        let _ = writeln!(out, "Created: {}", created);
    }
    let _ = writeln!(out, "Summary: {}", field(message.summary.as_deref()));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", field(message.text.as_deref()));
}

/// Render the whole screen for a snapshot
pub fn render(state: &ViewState) -> String {
    let mut out = String::new();

    match &state.view {
        View::Blank => {
            out.push_str("(nothing loaded)\n");
        }
        View::Inbox(messages) => {
            let _ = writeln!(out, "Inbox ({} messages)", messages.len());
            if messages.is_empty() {
                out.push_str("  No messages\n");
            }
            for message in messages {
                let _ = writeln!(out, "{}", render_inbox_line(message));
            }
        }
        View::Detail { id, message: None } => {
            let _ = writeln!(out, "Loading message {}…", id);
        }
        View::Detail {
            message: Some(message),
            ..
        } => render_message(&mut out, message),
        View::Compose(draft) => {
            out.push_str("New message\n");
            let _ = writeln!(out, "Summary: {}", field(draft.summary.as_deref()));
            let _ = writeln!(out, "Text:    {}", field(draft.text.as_deref()));
        }
    }

    if let Some(ref error) = state.last_error {
        let _ = writeln!(out, "Error: {}", error);
    }

    out
}
