use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{InventoryError, InventoryResult};
use crate::models::{InventoryRecord, NewRecord, StockStatus};

/// Repository trait for inventory record persistence
///
/// Query and metrics logic runs over the snapshots returned here, so a
/// persistent backend only needs to provide these operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryRepository: Send + Sync {
    /// Store a new record under the next identifier
    async fn create(&self, record: NewRecord) -> InventoryResult<InventoryRecord>;

    /// Get a record by ID
    async fn get_by_id(&self, id: u64) -> InventoryResult<Option<InventoryRecord>>;

    /// Replace an existing record wholesale
    async fn update(&self, record: InventoryRecord) -> InventoryResult<InventoryRecord>;

    /// Force a stock status together with its fixed quantity
    async fn set_stock(&self, id: u64, status: StockStatus) -> InventoryResult<InventoryRecord>;

    /// Delete a record by ID, returning whether it existed
    async fn delete(&self, id: u64) -> InventoryResult<bool>;

    /// Snapshot of every record
    async fn list_all(&self) -> InventoryResult<Vec<InventoryRecord>>;

    /// Every category ever stored, ascending
    async fn list_categories(&self) -> InventoryResult<Vec<String>>;

    /// Records and categories read together, so every record's category is listed
    async fn snapshot(&self) -> InventoryResult<InventorySnapshot>;
}

/// Consistent view of the store at one point in time
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventorySnapshot {
    pub records: Vec<InventoryRecord>,
    /// Ascending
    pub categories: Vec<String>,
}

#[derive(Debug, Default)]
struct InventoryState {
    records: BTreeMap<u64, InventoryRecord>,
    /// Only grows; deletes leave categories in place
    categories: BTreeSet<String>,
}

impl InventoryState {
    fn register_category(&mut self, category: &str) {
        if !self.categories.contains(category) {
            self.categories.insert(category.to_string());
        }
    }
}

/// In-memory implementation of InventoryRepository
#[derive(Debug, Clone)]
pub struct InMemoryInventoryRepository {
    state: Arc<RwLock<InventoryState>>,
    next_id: Arc<AtomicU64>,
}

impl InMemoryInventoryRepository {
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(InventoryState::default())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }
}

impl Default for InMemoryInventoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InventoryRepository for InMemoryInventoryRepository {
    async fn create(&self, record: NewRecord) -> InventoryResult<InventoryRecord> {
        let mut state = self.state.write().await;

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = record.into_record(id);

        state.register_category(record.category());
        state.records.insert(id, record.clone());

        tracing::info!(record_id = id, category = %record.category(), "Created inventory record");
        Ok(record)
    }

    async fn get_by_id(&self, id: u64) -> InventoryResult<Option<InventoryRecord>> {
        let state = self.state.read().await;
        Ok(state.records.get(&id).cloned())
    }

    async fn update(&self, record: InventoryRecord) -> InventoryResult<InventoryRecord> {
        let mut state = self.state.write().await;

        let id = record.id;
        let stored = state
            .records
            .get_mut(&id)
            .ok_or(InventoryError::NotFound(id))?;
        *stored = record.clone();

        state.register_category(record.category());

        tracing::info!(record_id = id, "Updated inventory record");
        Ok(record)
    }

    async fn set_stock(&self, id: u64, status: StockStatus) -> InventoryResult<InventoryRecord> {
        let mut state = self.state.write().await;

        let record = state
            .records
            .get_mut(&id)
            .ok_or(InventoryError::NotFound(id))?;
        record.force_status(status);

        tracing::info!(record_id = id, %status, quantity = record.quantity, "Changed stock status");
        Ok(record.clone())
    }

    async fn delete(&self, id: u64) -> InventoryResult<bool> {
        let mut state = self.state.write().await;

        if state.records.remove(&id).is_some() {
            tracing::info!(record_id = id, "Deleted inventory record");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn list_all(&self) -> InventoryResult<Vec<InventoryRecord>> {
        let state = self.state.read().await;
        Ok(state.records.values().cloned().collect())
    }

    async fn list_categories(&self) -> InventoryResult<Vec<String>> {
        let state = self.state.read().await;
        Ok(state.categories.iter().cloned().collect())
    }

    async fn snapshot(&self) -> InventoryResult<InventorySnapshot> {
        let state = self.state.read().await;
        Ok(InventorySnapshot {
            records: state.records.values().cloned().collect(),
            categories: state.categories.iter().cloned().collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewProduct;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn new_record(name: &str, category: &str, quantity: i32) -> NewRecord {
        let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        NewRecord {
            product: NewProduct {
                name: name.to_string(),
                category: category.to_string(),
                price: Decimal::new(1250, 2),
                expiry_date: None,
                date_created: day,
                date_updated: day,
            },
            quantity,
            stock_status: StockStatus::InStock,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_sequential_ids() {
        let repo = InMemoryInventoryRepository::new();

        let first = repo.create(new_record("Apple", "Fruit", 3)).await.unwrap();
        let second = repo.create(new_record("Pear", "Fruit", 3)).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(second.product.id, 2);

        let fetched = repo.get_by_id(first.id).await.unwrap();
        assert_eq!(fetched, Some(first));
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let repo = InMemoryInventoryRepository::new();

        let first = repo.create(new_record("Apple", "Fruit", 3)).await.unwrap();
        assert!(repo.delete(first.id).await.unwrap());

        let second = repo.create(new_record("Pear", "Fruit", 3)).await.unwrap();
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_update_missing_record_fails() {
        let repo = InMemoryInventoryRepository::new();
        let record = new_record("Ghost", "None", 1).into_record(42);

        let result = repo.update(record).await;
        assert!(matches!(result, Err(InventoryError::NotFound(42))));
        assert!(repo.list_categories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_registers_new_category() {
        let repo = InMemoryInventoryRepository::new();
        let mut record = repo.create(new_record("Apple", "Fruit", 3)).await.unwrap();

        record.product.category = "Produce".to_string();
        record.quantity = 8;
        let updated = repo.update(record).await.unwrap();

        assert_eq!(updated.quantity, 8);
        assert_eq!(
            repo.list_categories().await.unwrap(),
            vec!["Fruit".to_string(), "Produce".to_string()]
        );
    }

    #[tokio::test]
    async fn test_set_stock_forces_quantity() {
        let repo = InMemoryInventoryRepository::new();
        let record = repo.create(new_record("Apple", "Fruit", 37)).await.unwrap();

        let out = repo.set_stock(record.id, StockStatus::OutOfStock).await.unwrap();
        assert_eq!(out.quantity, 0);
        assert_eq!(out.stock_status, StockStatus::OutOfStock);

        let back = repo.set_stock(record.id, StockStatus::InStock).await.unwrap();
        assert_eq!(back.quantity, 10);

        let missing = repo.set_stock(99, StockStatus::InStock).await;
        assert!(matches!(missing, Err(InventoryError::NotFound(99))));
    }

    #[tokio::test]
    async fn test_delete_keeps_category_index() {
        let repo = InMemoryInventoryRepository::new();
        let record = repo.create(new_record("Drill", "Tools", 1)).await.unwrap();

        assert!(repo.delete(record.id).await.unwrap());
        assert!(!repo.delete(record.id).await.unwrap());

        assert!(repo.list_all().await.unwrap().is_empty());
        assert_eq!(repo.list_categories().await.unwrap(), vec!["Tools".to_string()]);
    }

    #[tokio::test]
    async fn test_categories_are_sorted_and_case_sensitive() {
        let repo = InMemoryInventoryRepository::new();
        for category in ["beverages", "Snacks", "Beverages", "Snacks"] {
            repo.create(new_record("x", category, 1)).await.unwrap();
        }

        assert_eq!(
            repo.list_categories().await.unwrap(),
            vec![
                "Beverages".to_string(),
                "Snacks".to_string(),
                "beverages".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_snapshot_lists_every_record_category() {
        let repo = InMemoryInventoryRepository::new();

        let writers: Vec<_> = (0..30)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.create(new_record("x", &format!("cat-{:02}", i), 1))
                        .await
                        .unwrap();
                })
            })
            .collect();

        for _ in 0..30 {
            let snapshot = repo.snapshot().await.unwrap();
            for record in &snapshot.records {
                assert!(snapshot.categories.iter().any(|c| c == record.category()));
            }
            tokio::task::yield_now().await;
        }

        for writer in writers {
            writer.await.unwrap();
        }

        let snapshot = repo.snapshot().await.unwrap();
        assert_eq!(snapshot.records.len(), 30);
        assert_eq!(snapshot.categories.len(), 30);
        assert_eq!(snapshot.categories[0], "cat-00");
    }

    #[tokio::test]
    async fn test_concurrent_creates_get_unique_ids() {
        let repo = InMemoryInventoryRepository::new();

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let repo = repo.clone();
                tokio::spawn(async move {
                    repo.create(new_record(&format!("item-{}", i), "Bulk", i))
                        .await
                        .unwrap()
                        .id
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), 20);
        assert_eq!(repo.list_all().await.unwrap().len(), 20);
    }
}
