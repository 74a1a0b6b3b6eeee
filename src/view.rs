//! View state for the inbox screen
//!
//! The screen shows exactly one of three panes. Keeping them in one enum means
//! an inbox list, an open message and a compose draft can never be visible at
//! the same time.

use crate::message::{Message, MessageId};

/// The pane currently shown
#[derive(Debug, Clone, PartialEq, Default)]
pub enum View {
    /// Nothing loaded yet
    #[default]
    Blank,

    /// Inbox listing
    Inbox(Vec<Message>),

    /// A single message; `None` until the fetch for `id` completes
    Detail {
        id: MessageId,
        message: Option<Message>,
    },

    /// Compose form holding the draft
    Compose(Message),
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Blank => "blank",
            View::Inbox(_) => "inbox",
            View::Detail { .. } => "detail",
            View::Compose(_) => "compose",
        }
    }

    pub fn inbox(&self) -> Option<&[Message]> {
        match self {
            View::Inbox(messages) => Some(messages),
            _ => None,
        }
    }

    pub fn chosen_message(&self) -> Option<&Message> {
        match self {
            View::Detail { message, .. } => message.as_ref(),
            _ => None,
        }
    }

    pub fn compose(&self) -> Option<&Message> {
        match self {
            View::Compose(draft) => Some(draft),
            _ => None,
        }
    }

    pub fn compose_mut(&mut self) -> Option<&mut Message> {
        match self {
            View::Compose(draft) => Some(draft),
            _ => None,
        }
    }

    /// Whether a detail fetch is still outstanding
    pub fn is_loading(&self) -> bool {
        matches!(self, View::Detail { message: None, .. })
    }
}

/// Snapshot handed to observers after every change
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    /// Result of the last full inbox fetch, in server order
    pub messages: Vec<Message>,

    pub view: View,

    /// Message of the last failed operation, cleared by the next successful one
    pub last_error: Option<String>,

    /// Bumped on every published change
    pub revision: u64,
}
