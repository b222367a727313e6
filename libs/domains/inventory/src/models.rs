use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Quantity a record is forced to when marked out of stock
pub const OUT_OF_STOCK_QUANTITY: i32 = 0;

/// Fixed restock quantity applied when a record is marked in stock
pub const RESTOCK_QUANTITY: i32 = 10;

/// Default page size for listings
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Stock status of an inventory record
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    #[default]
    InStock,
    OutOfStock,
}

impl StockStatus {
    /// Quantity that a forced transition into this status sets.
    pub fn forced_quantity(self) -> i32 {
        match self {
            StockStatus::InStock => RESTOCK_QUANTITY,
            StockStatus::OutOfStock => OUT_OF_STOCK_QUANTITY,
        }
    }
}

/// Product owned by exactly one inventory record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Same value as the owning record's id
    pub id: u64,
    pub name: String,
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub expiry_date: Option<NaiveDate>,
    pub date_created: NaiveDate,
    pub date_updated: NaiveDate,
}

/// Inventory record - a product paired with its stock level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    pub id: u64,
    pub product: Product,
    pub quantity: i32,
    pub stock_status: StockStatus,
}

impl InventoryRecord {
    pub fn category(&self) -> &str {
        &self.product.category
    }

    /// Forces a status transition, applying the fixed quantity for that status.
    pub fn force_status(&mut self, status: StockStatus) {
        self.stock_status = status;
        self.quantity = status.forced_quantity();
        self.product.date_updated = today();
    }
}

/// Validated product contents that do not have an id yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub category: String,
    pub price: Decimal,
    pub expiry_date: Option<NaiveDate>,
    pub date_created: NaiveDate,
    pub date_updated: NaiveDate,
}

/// Validated record contents handed to the store for id assignment
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub product: NewProduct,
    pub quantity: i32,
    pub stock_status: StockStatus,
}

impl NewRecord {
    /// Attaches `id` to the record and its product.
    pub fn into_record(self, id: u64) -> InventoryRecord {
        let NewProduct {
            name,
            category,
            price,
            expiry_date,
            date_created,
            date_updated,
        } = self.product;

        InventoryRecord {
            id,
            product: Product {
                id,
                name,
                category,
                price,
                expiry_date,
                date_created,
                date_updated,
            },
            quantity: self.quantity,
            stock_status: self.stock_status,
        }
    }
}

/// Product fields as sent by clients.
///
/// `name`, `category` and `price` are optional on the wire so a missing value
/// is reported as an invalid record instead of a generic parse failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    /// Ignored; the store assigns ids
    #[serde(default)]
    pub id: Option<u64>,
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(length(min = 1))]
    pub category: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub date_created: Option<NaiveDate>,
    /// Ignored; set by the server on every write
    #[serde(default)]
    pub date_updated: Option<NaiveDate>,
}

/// Record body for create and update requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordPayload {
    /// Ignored; the path id (update) or the store (create) decides
    #[serde(default)]
    pub id: Option<u64>,
    #[validate(nested)]
    pub product: ProductPayload,
    #[validate(range(min = 0))]
    pub quantity: i32,
    #[serde(default)]
    pub stock_status: StockStatus,
}

/// Query-string parameters of the listing endpoint.
///
/// `sortBy`, `sortOrder` and `categories` accept repeated keys and
/// comma-separated values.
#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct InventoryQueryParams {
    /// 1-indexed page; 0 is treated as the first page
    #[serde(default = "default_page")]
    pub page: usize,
    /// Page size
    #[serde(default = "default_size")]
    pub size: usize,
    /// Sort fields: name, category, price, expiryDate, dateCreated, stock
    #[serde(default)]
    pub sort_by: Vec<String>,
    /// Sort directions matched to `sortBy` by position; `desc` or ascending
    #[serde(default)]
    pub sort_order: Vec<String>,
    /// Exact stock status filter
    pub stock_status: Option<StockStatus>,
    /// Category names to include (exact match)
    #[serde(default)]
    pub categories: Vec<String>,
    /// Case-insensitive substring of the product name
    pub search: Option<String>,
}

fn default_page() -> usize {
    1
}

fn default_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for InventoryQueryParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            size: default_size(),
            sort_by: Vec::new(),
            sort_order: Vec::new(),
            stock_status: None,
            categories: Vec::new(),
            search: None,
        }
    }
}

/// One page of the filtered and sorted listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse {
    pub items: Vec<InventoryRecord>,
    /// Size of the filtered sequence, not of the whole store
    pub total_items: u64,
}

/// In-stock aggregates for one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryMetric {
    pub category: String,
    pub total_products_in_stock: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_value_in_stock: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_price_in_stock: Decimal,
}

/// Global and per-category in-stock aggregates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InventoryMetrics {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_value_in_stock: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub average_price_in_stock: Decimal,
    pub category_metrics: Vec<CategoryMetric>,
}

/// Current UTC calendar date.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}
