pub mod cli;
pub mod config;
pub mod error;
pub mod message;
pub mod render;
pub mod store;
pub mod view;
pub mod view_model;

#[cfg(test)]
pub mod testing;


pub use error::{InboxError, InboxResult};
pub use message::{Created, Message, MessageId};
pub use store::{MessageStore, RestMessageStore};
pub use view::{View, ViewState};
pub use view_model::MessageListViewModel;
