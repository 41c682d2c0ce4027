// Persistence for the portfolio document and contact messages.
// Handlers only see PortfolioStore; MemoryStore keeps everything in process memory.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::{ContactMessage, Portfolio};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait PortfolioStore: Send + Sync {
    async fn portfolio(&self) -> Result<Option<Portfolio>, StoreError>;

    // upsert, stamps updated_at
    async fn replace_portfolio(&self, portfolio: Portfolio) -> Result<(), StoreError>;

    async fn insert_message(&self, message: ContactMessage) -> Result<(), StoreError>;

    // newest first, at most `limit`
    async fn messages(&self, limit: usize) -> Result<Vec<ContactMessage>, StoreError>;

    // false when no message has this id
    async fn mark_read(&self, id: &str) -> Result<bool, StoreError>;

    // short label reported by the detailed health check
    fn kind(&self) -> &'static str;
}

#[derive(Default)]
pub struct MemoryStore {
    portfolio: RwLock<Option<Portfolio>>,
    messages: RwLock<Vec<ContactMessage>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PortfolioStore for MemoryStore {
    async fn portfolio(&self) -> Result<Option<Portfolio>, StoreError> {
        Ok(self.portfolio.read().await.clone())
    }

    async fn replace_portfolio(&self, mut portfolio: Portfolio) -> Result<(), StoreError> {
        portfolio.updated_at = Some(Utc::now());
        *self.portfolio.write().await = Some(portfolio);
        Ok(())
    }

    async fn insert_message(&self, message: ContactMessage) -> Result<(), StoreError> {
        self.messages.write().await.push(message);
        Ok(())
    }

    async fn messages(&self, limit: usize) -> Result<Vec<ContactMessage>, StoreError> {
        let mut messages = self.messages.read().await.clone();
        messages.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        messages.truncate(limit);
        Ok(messages)
    }

    async fn mark_read(&self, id: &str) -> Result<bool, StoreError> {
        let mut messages = self.messages.write().await;
        match messages.iter_mut().find(|m| m.id == id) {
            Some(message) => {
                message.read = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContactMessageCreate;
    use chrono::Duration;

    fn message(name: &str, minutes_ago: i64) -> ContactMessage {
        let mut message = ContactMessage::from(ContactMessageCreate {
            name: name.into(),
            email: "someone@example.com".into(),
            subject: None,
            message: "hi".into(),
        });
        message.created_at = Utc::now() - Duration::minutes(minutes_ago);
        message
    }

    #[tokio::test]
    async fn messages_are_listed_newest_first_and_limited() {
        let store = MemoryStore::new();
        store.insert_message(message("old", 30)).await.unwrap();
        store.insert_message(message("new", 1)).await.unwrap();
        store.insert_message(message("mid", 10)).await.unwrap();

        let names: Vec<_> = store
            .messages(2)
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["new", "mid"]);
    }

    #[tokio::test]
    async fn mark_read_reports_unknown_ids() {
        let store = MemoryStore::new();
        let stored = message("a", 0);
        let id = stored.id.clone();
        store.insert_message(stored).await.unwrap();

        assert!(store.mark_read(&id).await.unwrap());
        assert!(!store.mark_read("missing").await.unwrap());
        assert!(store.messages(10).await.unwrap()[0].read);
    }

    #[tokio::test]
    async fn empty_store_has_no_portfolio() {
        assert!(MemoryStore::new().portfolio().await.unwrap().is_none());
    }
}
