//! Filter → sort → paginate pipeline over a record snapshot.
//!
//! Everything here is storage-agnostic: stages take the records they work on
//! and never touch the repository.

use std::cmp::Ordering;
use std::str::FromStr;

use strum::{Display, EnumString};

use crate::error::{InventoryError, InventoryResult};
use crate::models::{InventoryQueryParams, InventoryRecord, PageResponse, StockStatus};

/// Boxed comparator over inventory records
pub type Comparator = Box<dyn Fn(&InventoryRecord, &InventoryRecord) -> Ordering + Send + Sync>;

/// Field a listing can be sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortField {
    Name,
    Category,
    Price,
    ExpiryDate,
    DateCreated,
    /// Stock quantity
    Stock,
}

impl SortField {
    /// Ascending comparison on this field with absent values ordered last.
    pub fn compare(self, a: &InventoryRecord, b: &InventoryRecord) -> Ordering {
        match self {
            SortField::Name => nulls_last(Some(&a.product.name), Some(&b.product.name)),
            SortField::Category => {
                nulls_last(Some(&a.product.category), Some(&b.product.category))
            }
            SortField::Price => nulls_last(Some(a.product.price), Some(b.product.price)),
            SortField::ExpiryDate => nulls_last(a.product.expiry_date, b.product.expiry_date),
            SortField::DateCreated => {
                nulls_last(Some(a.product.date_created), Some(b.product.date_created))
            }
            SortField::Stock => nulls_last(Some(a.quantity), Some(b.quantity)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// `desc` in any case is descending; anything else, including nothing, is ascending.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("desc") => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }

    pub fn parse(field: &str, direction: Option<&str>) -> InventoryResult<Self> {
        let field = SortField::from_str(field.trim())
            .map_err(|_| InventoryError::InvalidSortField(field.to_string()))?;

        Ok(Self::new(field, SortDirection::parse(direction)))
    }

    /// Builds this key's comparator.
    ///
    /// Nulls-last is applied to the ascending order first and the whole thing is
    /// reversed for descending keys, so absent values come first when descending.
    pub fn comparator(self) -> Comparator {
        let field = self.field;
        match self.direction {
            SortDirection::Ascending => {
                Box::new(move |a: &InventoryRecord, b: &InventoryRecord| field.compare(a, b))
            }
            SortDirection::Descending => Box::new(move |a: &InventoryRecord, b: &InventoryRecord| {
                field.compare(a, b).reverse()
            }),
        }
    }
}

/// Chains comparators lexicographically: later ones only break ties of earlier ones.
pub fn chain_comparators(comparators: Vec<Comparator>) -> Comparator {
    Box::new(move |a: &InventoryRecord, b: &InventoryRecord| {
        comparators
            .iter()
            .map(|cmp| cmp(a, b))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    })
}

fn nulls_last<K: Ord>(a: Option<K>, b: Option<K>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Record predicates, ANDed together. Empty parts match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    /// Lowercased name fragment
    pub search: Option<String>,
    pub stock_status: Option<StockStatus>,
    pub categories: Vec<String>,
}

impl RecordFilter {
    pub fn new(
        search: Option<&str>,
        stock_status: Option<StockStatus>,
        categories: Vec<String>,
    ) -> Self {
        let search = search
            .filter(|s| !s.trim().is_empty())
            .map(str::to_lowercase);

        Self {
            search,
            stock_status,
            categories,
        }
    }

    /// Plain substring matching: "pen" also matches "Pencil" and "Open Box".
    pub fn matches(&self, record: &InventoryRecord) -> bool {
        if let Some(ref search) = self.search {
            if !record.product.name.to_lowercase().contains(search.as_str()) {
                return false;
            }
        }
        if let Some(status) = self.stock_status {
            if record.stock_status != status {
                return false;
            }
        }
        if !self.categories.is_empty()
            && !self.categories.iter().any(|c| c == record.category())
        {
            return false;
        }
        true
    }
}

/// Parsed listing request
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryQuery {
    /// 1-indexed
    pub page: usize,
    pub size: usize,
    pub sort: Vec<SortKey>,
    pub filter: RecordFilter,
}

impl TryFrom<InventoryQueryParams> for InventoryQuery {
    type Error = InventoryError;

    fn try_from(params: InventoryQueryParams) -> InventoryResult<Self> {
        let fields = split_values(&params.sort_by);
        let directions = split_values(&params.sort_order);

        // Directions pair with fields by position; missing ones are ascending.
        let sort = fields
            .iter()
            .enumerate()
            .filter(|(_, field)| !field.is_empty())
            .map(|(i, field)| SortKey::parse(field, directions.get(i).map(String::as_str)))
            .collect::<InventoryResult<Vec<_>>>()?;

        let categories = split_values(&params.categories)
            .into_iter()
            .filter(|c| !c.is_empty())
            .collect();

        Ok(Self {
            page: params.page,
            size: params.size,
            sort,
            filter: RecordFilter::new(params.search.as_deref(), params.stock_status, categories),
        })
    }
}

/// Flattens repeated and comma-separated values, keeping positions.
fn split_values(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .map(|v| v.trim().to_string())
        .collect()
}

pub fn filter_records(
    records: Vec<InventoryRecord>,
    filter: &RecordFilter,
) -> Vec<InventoryRecord> {
    records.into_iter().filter(|r| filter.matches(r)).collect()
}

/// Stable multi-key sort. No keys leaves the input order untouched.
pub fn sort_records(records: &mut [InventoryRecord], keys: &[SortKey]) {
    if keys.is_empty() {
        return;
    }

    let comparator = chain_comparators(keys.iter().map(|k| k.comparator()).collect());
    records.sort_by(|a, b| comparator(a, b));
}

/// Half-open slice bounds for a 1-indexed page.
///
/// A page past the end snaps to the last `size` items instead of coming back empty.
pub fn page_bounds(len: usize, page: usize, size: usize) -> (usize, usize) {
    let from = page.saturating_sub(1).saturating_mul(size);
    if from >= len {
        return (len.saturating_sub(size), len);
    }
    (from, from.saturating_add(size).min(len))
}

pub fn paginate(records: Vec<InventoryRecord>, page: usize, size: usize) -> PageResponse {
    let total_items = records.len() as u64;
    let (from, to) = page_bounds(records.len(), page, size);

    let items = records.into_iter().skip(from).take(to - from).collect();

    PageResponse { items, total_items }
}

/// Runs filter, sort and paginate over `records`.
pub fn run_query(records: Vec<InventoryRecord>, query: &InventoryQuery) -> PageResponse {
    let mut records = filter_records(records, &query.filter);
    sort_records(&mut records, &query.sort);
    paginate(records, query.page, query.size)
}
