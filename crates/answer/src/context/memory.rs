//! In-process context store for one-off sessions and tests.

use super::{ContextStore, ConversationContext, ExchangeLog, QaExchange};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use wikiqa_core::{AppError, AppResult};

#[derive(Default)]
pub struct InMemoryContextStore {
    contexts: Mutex<HashMap<(String, i64), ConversationContext>>,
    exchanges: Mutex<Vec<QaExchange>>,
}

impl InMemoryContextStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> AppError {
    AppError::ContextStore("Context lock poisoned".to_string())
}

#[async_trait::async_trait]
impl ContextStore for InMemoryContextStore {
    async fn get(
        &self,
        conversation_id: &str,
        installation_id: i64,
    ) -> AppResult<Option<ConversationContext>> {
        let contexts = self.contexts.lock().map_err(poisoned)?;
        Ok(contexts
            .get(&(conversation_id.to_string(), installation_id))
            .cloned())
    }

    async fn upsert(
        &self,
        conversation_id: &str,
        installation_id: i64,
        question: &str,
        answer: &str,
    ) -> AppResult<()> {
        let mut contexts = self.contexts.lock().map_err(poisoned)?;
        let now = Utc::now();

        contexts
            .entry((conversation_id.to_string(), installation_id))
            .and_modify(|context| {
                context.last_question = question.to_string();
                context.last_answer = answer.to_string();
                context.turn_count += 1;
                context.last_updated_at = now;
            })
            .or_insert_with(|| ConversationContext {
                conversation_id: conversation_id.to_string(),
                installation_id,
                last_question: question.to_string(),
                last_answer: answer.to_string(),
                turn_count: 1,
                last_updated_at: now,
            });

        Ok(())
    }
}

#[async_trait::async_trait]
impl ExchangeLog for InMemoryContextStore {
    async fn record_exchange(&self, exchange: &QaExchange) -> AppResult<()> {
        self.exchanges
            .lock()
            .map_err(poisoned)?
            .push(exchange.clone());
        Ok(())
    }

    async fn recent_exchanges(
        &self,
        installation_id: i64,
        limit: usize,
    ) -> AppResult<Vec<QaExchange>> {
        let exchanges = self.exchanges.lock().map_err(poisoned)?;
        Ok(exchanges
            .iter()
            .rev()
            .filter(|e| e.installation_id == installation_id)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upsert_increments_turn_count() {
        let store = InMemoryContextStore::new();

        store.upsert("T1-C1", 1, "q1", "a1").await.unwrap();
        store.upsert("T1-C1", 1, "q2", "a2").await.unwrap();

        let context = store.get("T1-C1", 1).await.unwrap().unwrap();
        assert_eq!(context.turn_count, 2);
        assert_eq!(context.last_question, "q2");
        assert!(store.get("T1-C1", 2).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_recent_exchanges_filters_installation() {
        let store = InMemoryContextStore::new();
        store
            .record_exchange(&QaExchange::new(1, None, "first", "a", Vec::new()))
            .await
            .unwrap();
        store
            .record_exchange(&QaExchange::new(2, None, "other", "a", Vec::new()))
            .await
            .unwrap();
        store
            .record_exchange(&QaExchange::new(1, None, "second", "a", Vec::new()))
            .await
            .unwrap();

        let recent = store.recent_exchanges(1, 10).await.unwrap();
        let questions: Vec<_> = recent.iter().map(|e| e.question.as_str()).collect();
        assert_eq!(questions, vec!["second", "first"]);
    }
}
