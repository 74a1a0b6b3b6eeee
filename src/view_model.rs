//! Controller for the inbox screen
//!
//! Owns the list of messages and the current pane, performs the network call
//! behind each user action and publishes a fresh [`ViewState`] after every
//! change so renderers can redraw.

use crate::error::{InboxError, InboxResult};
use crate::message::{Message, MessageId};
use crate::store::MessageStore;
use crate::view::{View, ViewState};
use tokio::sync::watch;

pub struct MessageListViewModel<S: MessageStore> {
    store: S,
    state: ViewState,
    notifier: watch::Sender<ViewState>,
}

impl<S: MessageStore> MessageListViewModel<S> {
    /// Create a view model showing nothing; call [`go_to_inbox`](Self::go_to_inbox) to populate it
    pub fn new(store: S) -> Self {
        let state = ViewState::default();
        let (notifier, _) = watch::channel(state.clone());
        Self {
            store,
            state,
            notifier,
        }
    }

    /// Create a view model and load the inbox straight away
    pub async fn load(store: S) -> InboxResult<Self> {
        let mut view_model = Self::new(store);
        view_model.go_to_inbox().await?;
        Ok(view_model)
    }

    /// Receive a snapshot after every state change
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.notifier.subscribe()
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn view(&self) -> &View {
        &self.state.view
    }

    /// Messages from the last successful inbox fetch
    pub fn messages(&self) -> &[Message] {
        &self.state.messages
    }

    pub fn inbox(&self) -> Option<&[Message]> {
        self.state.view.inbox()
    }

    pub fn chosen_message(&self) -> Option<&Message> {
        self.state.view.chosen_message()
    }

    pub fn compose(&self) -> Option<&Message> {
        self.state.view.compose()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.state.last_error.as_deref()
    }

    /// Fetch the collection and show it as the inbox
    pub async fn go_to_inbox(&mut self) -> InboxResult<()> {
        match self.store.list().await {
            Ok(messages) => {
                tracing::info!("Inbox loaded with {} messages", messages.len());
                self.state.messages = messages.clone();
                self.state.view = View::Inbox(messages);
                self.state.last_error = None;
                self.publish();
                Ok(())
            }
            Err(e) => self.fail("load inbox", e),
        }
    }

    /// Open `message` in the detail pane
    pub async fn go_to_message(&mut self, message: &Message) -> InboxResult<()> {
        let id = message.id.clone().ok_or(InboxError::MissingId)?;
        self.go_to_message_id(id).await
    }

    /// Open the message with `id` in the detail pane.
    ///
    /// The inbox is hidden before the request goes out; observers see a
    /// loading detail pane until the record arrives.
    pub async fn go_to_message_id(&mut self, id: MessageId) -> InboxResult<()> {
        self.state.view = View::Detail {
            id: id.clone(),
            message: None,
        };
        self.publish();

        match self.store.get(&id).await {
            Ok(message) => {
                tracing::debug!("Opened message {}", id);
                self.state.view = View::Detail {
                    id,
                    message: Some(message),
                };
                self.state.last_error = None;
                self.publish();
                Ok(())
            }
            Err(e) => self.fail("open message", e),
        }
    }

    /// Show the compose pane with an empty draft
    pub fn go_to_compose(&mut self) {
        self.state.view = View::Compose(Message::draft());
        self.state.last_error = None;
        self.publish();
    }

    /// Change the draft being composed
    pub fn edit_draft<F>(&mut self, edit: F) -> InboxResult<()>
    where
        F: FnOnce(&mut Message),
    {
        let draft = self
            .state
            .view
            .compose_mut()
            .ok_or(InboxError::NotComposing)?;
        edit(draft);
        self.publish();
        Ok(())
    }

    /// Post the draft to the server, then reload the inbox
    pub async fn save(&mut self) -> InboxResult<()> {
        let draft = self.compose().cloned().ok_or(InboxError::NotComposing)?;

        match self.store.create(&draft).await {
            Ok(saved) => {
                tracing::info!("Message saved, server returned {} record(s)", saved.len());
                self.go_to_inbox().await
            }
            Err(e) => self.fail("save message", e),
        }
    }

    fn fail(&mut self, action: &str, error: InboxError) -> InboxResult<()> {
        tracing::warn!("Failed to {}: {}", action, error);
        self.state.last_error = Some(error.to_string());
        self.publish();
        Err(error)
    }

    fn publish(&mut self) {
        self.state.revision += 1;
        self.notifier.send_replace(self.state.clone());
    }
}
