//! Inventory Domain
//!
//! Product inventory records with stock tracking, a filter/sort/paginate
//! listing pipeline and in-stock value metrics.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Write validation, stock transitions
//! └──┬───────┬──┘
//!    │       │
//!    │  ┌────▼──────────────┐
//!    │  │ Query / Metrics   │  ← Pure functions over a record snapshot
//!    │  └───────────────────┘
//! ┌──▼──────────┐
//! │ Repository  │  ← Data access (trait + in-memory implementation)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, payloads, query parameters
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_inventory::{handlers, InMemoryInventoryRepository, InventoryService};
//!
//! let repository = InMemoryInventoryRepository::new();
//! let service = InventoryService::new(repository);
//!
//! // Mount under /api/products
//! let router = handlers::router(service);
//! ```

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod models;
pub mod query;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{InventoryError, InventoryResult};
pub use handlers::ApiDoc;
pub use models::{
    CategoryMetric, InventoryMetrics, InventoryQueryParams, InventoryRecord, PageResponse, Product,
    ProductPayload, RecordPayload, StockStatus, OUT_OF_STOCK_QUANTITY, RESTOCK_QUANTITY,
};
pub use query::{InventoryQuery, RecordFilter, SortDirection, SortField, SortKey};
pub use repository::{InMemoryInventoryRepository, InventoryRepository, InventorySnapshot};
pub use service::InventoryService;
