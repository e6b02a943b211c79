use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::gateway::{GatewayError, ResumeGateway};
use crate::models::record::StoredResume;
use crate::models::resume::ResumeDocument;
use crate::sync::lock;

struct Slot {
    /// Write order; breaks ties between equal `updated_at` values.
    sequence: u64,
    record: StoredResume,
}

#[derive(Default)]
struct Records {
    next_sequence: u64,
    by_id: HashMap<Uuid, Slot>,
}

/// Process-local gateway. Write latency and failure injection let callers
/// exercise in-flight and transport-failure paths.
#[derive(Default)]
pub struct InMemoryGateway {
    records: Mutex<Records>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
    write_latency: Mutex<Duration>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of create/update calls that reached the store, failed or not.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// While set, create and update fail with a transport error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn set_write_latency(&self, latency: Duration) {
        *lock(&self.write_latency) = latency;
    }

    async fn begin_write(&self) -> Result<(), GatewayError> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let latency = *lock(&self.write_latency);
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(GatewayError::Transport("injected write failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ResumeGateway for InMemoryGateway {
    async fn list(&self, owner: Uuid) -> Result<Vec<StoredResume>, GatewayError> {
        let records = lock(&self.records);
        let mut owned: Vec<&Slot> = records
            .by_id
            .values()
            .filter(|slot| slot.record.user_id == owner)
            .collect();
        owned.sort_by(|a, b| {
            (b.record.updated_at, b.sequence).cmp(&(a.record.updated_at, a.sequence))
        });
        Ok(owned.into_iter().map(|slot| slot.record.clone()).collect())
    }

    async fn get(&self, id: Uuid, owner: Uuid) -> Result<StoredResume, GatewayError> {
        lock(&self.records)
            .by_id
            .get(&id)
            .filter(|slot| slot.record.user_id == owner)
            .map(|slot| slot.record.clone())
            .ok_or(GatewayError::NotFound)
    }

    async fn create(
        &self,
        owner: Uuid,
        document: &ResumeDocument,
    ) -> Result<StoredResume, GatewayError> {
        self.begin_write().await?;
        let now = Utc::now();
        let record = StoredResume {
            id: Uuid::new_v4(),
            user_id: owner,
            document: document.clone().normalized(),
            created_at: now,
            updated_at: now,
        };
        let mut records = lock(&self.records);
        records.next_sequence += 1;
        let sequence = records.next_sequence;
        records.by_id.insert(
            record.id,
            Slot {
                sequence,
                record: record.clone(),
            },
        );
        Ok(record)
    }

    async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        document: &ResumeDocument,
    ) -> Result<StoredResume, GatewayError> {
        self.begin_write().await?;
        let mut records = lock(&self.records);
        records.next_sequence += 1;
        let sequence = records.next_sequence;
        let slot = records
            .by_id
            .get_mut(&id)
            .filter(|slot| slot.record.user_id == owner)
            .ok_or(GatewayError::NotFound)?;
        slot.sequence = sequence;
        slot.record.document = document.clone().normalized();
        slot.record.updated_at = Utc::now();
        Ok(slot.record.clone())
    }

    async fn delete(&self, id: Uuid, owner: Uuid) -> Result<(), GatewayError> {
        let mut records = lock(&self.records);
        let owned = records
            .by_id
            .get(&id)
            .is_some_and(|slot| slot.record.user_id == owner);
        if !owned {
            return Err(GatewayError::NotFound);
        }
        records.by_id.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titled(title: &str) -> ResumeDocument {
        let mut doc = ResumeDocument::default();
        doc.meta.title = title.to_string();
        doc
    }

    #[tokio::test]
    async fn test_foreign_owner_sees_not_found() {
        let gateway = InMemoryGateway::new();
        let alice = Uuid::new_v4();
        let mallory = Uuid::new_v4();
        let created = gateway.create(alice, &titled("Alice CV")).await.unwrap();

        assert_eq!(
            gateway.get(created.id, mallory).await,
            Err(GatewayError::NotFound)
        );
        assert_eq!(
            gateway.update(created.id, mallory, &titled("stolen")).await,
            Err(GatewayError::NotFound)
        );
        assert_eq!(
            gateway.delete(created.id, mallory).await,
            Err(GatewayError::NotFound)
        );
        let still_there = gateway.get(created.id, alice).await.unwrap();
        assert_eq!(still_there.document.meta.title, "Alice CV");
    }

    #[tokio::test]
    async fn test_list_is_scoped_and_newest_first() {
        let gateway = InMemoryGateway::new();
        let owner = Uuid::new_v4();
        let first = gateway.create(owner, &titled("first")).await.unwrap();
        gateway.create(owner, &titled("second")).await.unwrap();
        gateway
            .create(Uuid::new_v4(), &titled("someone else"))
            .await
            .unwrap();
        gateway
            .update(first.id, owner, &titled("first, edited"))
            .await
            .unwrap();

        let titles: Vec<_> = gateway
            .list(owner)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.document.meta.title)
            .collect();
        assert_eq!(titles, vec!["first, edited", "second"]);
    }

    #[tokio::test]
    async fn test_create_normalizes_template() {
        let gateway = InMemoryGateway::new();
        let mut doc = ResumeDocument::default();
        doc.meta.template_id = "holographic".to_string();
        let created = gateway.create(Uuid::new_v4(), &doc).await.unwrap();
        assert_eq!(created.document.meta.template_id, "modern");
    }

    #[tokio::test]
    async fn test_injected_failure_counts_write() {
        let gateway = InMemoryGateway::new();
        gateway.fail_writes(true);
        let result = gateway.create(Uuid::new_v4(), &titled("x")).await;
        assert!(matches!(result, Err(GatewayError::Transport(_))));
        assert_eq!(gateway.write_count(), 1);
        assert!(gateway.list(Uuid::new_v4()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_is_hard() {
        let gateway = InMemoryGateway::new();
        let owner = Uuid::new_v4();
        let created = gateway.create(owner, &titled("gone")).await.unwrap();
        gateway.delete(created.id, owner).await.unwrap();
        assert_eq!(
            gateway.get(created.id, owner).await,
            Err(GatewayError::NotFound)
        );
        assert_eq!(
            gateway.delete(created.id, owner).await,
            Err(GatewayError::NotFound)
        );
    }
}
