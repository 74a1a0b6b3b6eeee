//! In-memory message store for tests

use crate::error::{InboxError, InboxResult};
use crate::message::{Created, Message, MessageId};
use crate::store::MessageStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Which store operation a call or failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    List,
    Get,
    Create,
}

/// Record of a call made to the mock store
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    List,
    Get(MessageId),
    Create(Message),
}

impl MockCall {
    pub fn operation(&self) -> MockOperation {
        match self {
            MockCall::List => MockOperation::List,
            MockCall::Get(_) => MockOperation::Get,
            MockCall::Create(_) => MockOperation::Create,
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    messages: Vec<Message>,
    failures: HashMap<MockOperation, InboxError>,
    next_id: i64,
}

/// Message store that keeps the collection in memory and records every call.
///
/// Cloning shares the underlying state, so a test can keep a handle while the
/// view model owns another.
#[derive(Debug, Clone, Default)]
pub struct MockMessageStore {
    state: Arc<RwLock<MockState>>,
    call_history: Arc<RwLock<Vec<MockCall>>>,
}

impl MockMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `messages`
    pub fn with_messages(messages: Vec<Message>) -> Self {
        let next_id = messages
            .iter()
            .filter_map(|m| match m.id {
                Some(MessageId::Number(n)) => Some(n),
                _ => None,
            })
            .max()
            .unwrap_or(0);

        Self {
            state: Arc::new(RwLock::new(MockState {
                messages,
                failures: HashMap::new(),
                next_id,
            })),
            call_history: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Replace the stored collection
    pub async fn set_messages(&self, messages: Vec<Message>) {
        self.state.write().await.messages = messages;
    }

    pub async fn messages(&self) -> Vec<Message> {
        self.state.read().await.messages.clone()
    }

    /// Make every call to `operation` fail with `error` until cleared
    pub async fn fail(&self, operation: MockOperation, error: InboxError) {
        self.state.write().await.failures.insert(operation, error);
    }

    pub async fn clear_failures(&self) {
        self.state.write().await.failures.clear();
    }

    pub async fn get_call_history(&self) -> Vec<MockCall> {
        self.call_history.read().await.clone()
    }

    pub async fn clear_call_history(&self) {
        self.call_history.write().await.clear();
    }

    /// Number of calls made for one operation
    pub async fn call_count(&self, operation: MockOperation) -> usize {
        self.call_history
            .read()
            .await
            .iter()
            .filter(|call| call.operation() == operation)
            .count()
    }

    async fn record(&self, call: MockCall) -> InboxResult<()> {
        let operation = call.operation();
        self.call_history.write().await.push(call);

        match self.state.read().await.failures.get(&operation) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

/// A message with every field filled in
pub fn sample_message(id: i64, text: &str, summary: &str) -> Message {
    Message {
        id: Some(MessageId::Number(id)),
        text: Some(text.to_string()),
        summary: Some(summary.to_string()),
        created: Some(Created::Text("2020-01-01".to_string())),
    }
}

#[async_trait]
impl MessageStore for MockMessageStore {
    async fn list(&self) -> InboxResult<Vec<Message>> {
        self.record(MockCall::List).await?;
        Ok(self.state.read().await.messages.clone())
    }

    async fn get(&self, id: &MessageId) -> InboxResult<Message> {
        self.record(MockCall::Get(id.clone())).await?;
        self.state
            .read()
            .await
            .messages
            .iter()
            .find(|m| m.id.as_ref() == Some(id))
            .cloned()
            .ok_or_else(|| InboxError::status(404, format!("rest/{}", id)))
    }

    async fn create(&self, draft: &Message) -> InboxResult<Vec<Message>> {
        self.record(MockCall::Create(draft.clone())).await?;

        let mut state = self.state.write().await;
        state.next_id += 1;
        let saved = Message {
            id: Some(MessageId::Number(state.next_id)),
            created: Some(Created::Millis(chrono::Utc::now().timestamp_millis())),
            ..draft.clone()
        };
        state.messages.push(saved.clone());
        Ok(vec![saved])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_store_records_calls() {
        let store = MockMessageStore::with_messages(vec![sample_message(1, "hi", "s")]);

        assert_eq!(store.list().await.unwrap().len(), 1);
        assert!(store.get(&MessageId::Number(1)).await.is_ok());
        assert!(store.get(&MessageId::Number(2)).await.is_err());

        assert_eq!(store.call_count(MockOperation::List).await, 1);
        assert_eq!(store.call_count(MockOperation::Get).await, 2);
        assert_eq!(
            store.get_call_history().await[1],
            MockCall::Get(MessageId::Number(1))
        );
    }

    #[tokio::test]
    async fn test_create_assigns_next_id() {
        let store = MockMessageStore::with_messages(vec![sample_message(4, "hi", "s")]);
        let saved = store
            .create(&Message::draft().with_text("new"))
            .await
            .unwrap();

        assert_eq!(saved[0].id, Some(MessageId::Number(5)));
        assert!(saved[0].created.is_some());
        assert_eq!(store.messages().await.len(), 2);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let store = MockMessageStore::new();
        store.fail(MockOperation::List, InboxError::network("down")).await;
        assert_eq!(store.list().await, Err(InboxError::network("down")));

        store.clear_failures().await;
        assert!(store.list().await.is_ok());
        assert_eq!(store.call_count(MockOperation::List).await, 2);
    }
}
