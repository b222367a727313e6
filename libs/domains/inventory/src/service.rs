use chrono::NaiveDate;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{InventoryError, InventoryResult};
use crate::metrics::compute_metrics;
use crate::models::{
    today, InventoryMetrics, InventoryQueryParams, InventoryRecord, NewProduct, NewRecord,
    PageResponse, RecordPayload, StockStatus,
};
use crate::query::{run_query, InventoryQuery};
use crate::repository::InventoryRepository;

/// Service layer for inventory business logic
#[derive(Clone)]
pub struct InventoryService<R: InventoryRepository> {
    repository: Arc<R>,
}

impl<R: InventoryRepository> InventoryService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Filtered, sorted page of records plus the filtered count
    #[instrument(skip(self, params), fields(page = params.page, size = params.size))]
    pub async fn list_records(
        &self,
        params: InventoryQueryParams,
    ) -> InventoryResult<PageResponse> {
        let query = InventoryQuery::try_from(params)?;
        let records = self.repository.list_all().await?;

        let page = run_query(records, &query);
        tracing::debug!(
            total_items = page.total_items,
            returned = page.items.len(),
            "Listed records"
        );
        Ok(page)
    }

    #[instrument(skip(self))]
    pub async fn get_record(&self, id: u64) -> InventoryResult<InventoryRecord> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(InventoryError::NotFound(id))
    }

    /// Create a record. Any id in the payload is ignored.
    #[instrument(skip(self, payload))]
    pub async fn create_record(&self, payload: RecordPayload) -> InventoryResult<InventoryRecord> {
        let today = today();
        let date_created = payload.product.date_created.unwrap_or(today);
        let record = new_record_from(payload, date_created, today)?;

        self.repository.create(record).await
    }

    /// Replace record `id` with the payload contents.
    ///
    /// The path id wins over any id in the body. The stored creation date is
    /// kept unless the payload sends one.
    #[instrument(skip(self, payload))]
    pub async fn update_record(
        &self,
        id: u64,
        payload: RecordPayload,
    ) -> InventoryResult<InventoryRecord> {
        let existing = self.get_record(id).await?;

        let date_created = payload
            .product
            .date_created
            .unwrap_or(existing.product.date_created);
        let record = new_record_from(payload, date_created, today())?.into_record(id);

        self.repository.update(record).await
    }

    #[instrument(skip(self))]
    pub async fn mark_out_of_stock(&self, id: u64) -> InventoryResult<InventoryRecord> {
        self.repository.set_stock(id, StockStatus::OutOfStock).await
    }

    #[instrument(skip(self))]
    pub async fn mark_in_stock(&self, id: u64) -> InventoryResult<InventoryRecord> {
        self.repository.set_stock(id, StockStatus::InStock).await
    }

    /// Delete a record. Unknown ids are not an error.
    #[instrument(skip(self))]
    pub async fn delete_record(&self, id: u64) -> InventoryResult<()> {
        if !self.repository.delete(id).await? {
            tracing::debug!(record_id = id, "Delete of unknown record ignored");
        }
        Ok(())
    }

    pub async fn list_categories(&self) -> InventoryResult<Vec<String>> {
        self.repository.list_categories().await
    }

    /// In-stock metrics over every record, computed on each call
    #[instrument(skip(self))]
    pub async fn metrics(&self) -> InventoryResult<InventoryMetrics> {
        let snapshot = self.repository.snapshot().await?;

        compute_metrics(&snapshot.records, &snapshot.categories)
    }
}

/// Validate a payload and turn it into storable record contents.
///
/// Name, category and price must be present so metrics never see a hole.
fn new_record_from(
    payload: RecordPayload,
    date_created: NaiveDate,
    date_updated: NaiveDate,
) -> InventoryResult<NewRecord> {
    payload.validate()?;

    let product = payload.product;
    let name = product
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| InventoryError::InvalidRecord("product name is required".to_string()))?;
    let category = product
        .category
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| InventoryError::InvalidRecord("product category is required".to_string()))?;
    let price = product
        .price
        .ok_or_else(|| InventoryError::InvalidRecord("product price is required".to_string()))?;

    Ok(NewRecord {
        product: NewProduct {
            name,
            category,
            price,
            expiry_date: product.expiry_date,
            date_created,
            date_updated,
        },
        quantity: payload.quantity,
        stock_status: payload.stock_status,
    })
}
