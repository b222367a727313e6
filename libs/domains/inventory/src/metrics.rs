//! In-stock aggregates over the full record set.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{InventoryError, InventoryResult};
use crate::models::{CategoryMetric, InventoryMetrics, InventoryRecord, StockStatus};

/// Decimal places kept on average prices
const AVERAGE_SCALE: u32 = 2;

#[derive(Debug, Default, Clone, Copy)]
struct StockTotals {
    quantity: i64,
    value: Decimal,
}

impl StockTotals {
    fn add(&mut self, record: &InventoryRecord) -> InventoryResult<()> {
        let line_value = record
            .product
            .price
            .checked_mul(Decimal::from(record.quantity))
            .ok_or_else(|| overflow(format!("record {}", record.id)))?;

        self.quantity += i64::from(record.quantity);
        self.value = self
            .value
            .checked_add(line_value)
            .ok_or_else(|| overflow(format!("record {}", record.id)))?;
        Ok(())
    }

    fn absorb(&mut self, other: &StockTotals, category: &str) -> InventoryResult<()> {
        self.quantity += other.quantity;
        self.value = self
            .value
            .checked_add(other.value)
            .ok_or_else(|| overflow(format!("category {}", category)))?;
        Ok(())
    }

    /// Value per unit, rounded half-up to cents. Zero when nothing is in stock.
    fn average_price(&self) -> Decimal {
        if self.quantity == 0 {
            return Decimal::ZERO;
        }
        self.value
            .checked_div(Decimal::from(self.quantity))
            .unwrap_or_default()
            .round_dp_with_strategy(AVERAGE_SCALE, RoundingStrategy::MidpointAwayFromZero)
    }
}

fn overflow(at: String) -> InventoryError {
    InventoryError::Internal(format!("stock value overflow at {}", at))
}

/// Computes global and per-category in-stock metrics.
///
/// Categories are reported in the order of `categories`. Global totals are the
/// sum of the per-category totals. Category matching is case-insensitive, so an
/// index holding both "Food" and "food" reports the same records under each and
/// the global totals include them once per matching entry.
pub fn compute_metrics(
    records: &[InventoryRecord],
    categories: &[String],
) -> InventoryResult<InventoryMetrics> {
    let in_stock: Vec<&InventoryRecord> = records
        .iter()
        .filter(|r| r.stock_status == StockStatus::InStock)
        .collect();

    let mut global = StockTotals::default();
    let mut category_metrics = Vec::with_capacity(categories.len());
    for category in categories {
        let wanted = category.to_lowercase();
        let mut totals = StockTotals::default();

        for record in in_stock
            .iter()
            .filter(|r| r.category().to_lowercase() == wanted)
        {
            totals.add(record)?;
        }
        global.absorb(&totals, category)?;

        category_metrics.push(CategoryMetric {
            category: category.clone(),
            total_products_in_stock: totals.quantity,
            total_value_in_stock: totals.value,
            average_price_in_stock: totals.average_price(),
        });
    }

    Ok(InventoryMetrics {
        total_value_in_stock: global.value,
        average_price_in_stock: global.average_price(),
        category_metrics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewProduct, NewRecord};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn record(
        id: u64,
        category: &str,
        quantity: i32,
        price: &str,
        status: StockStatus,
    ) -> InventoryRecord {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        NewRecord {
            product: NewProduct {
                name: format!("item-{}", id),
                category: category.to_string(),
                price: Decimal::from_str(price).unwrap(),
                expiry_date: None,
                date_created: today,
                date_updated: today,
            },
            quantity,
            stock_status: status,
        }
        .into_record(id)
    }

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn test_weighted_averages() {
        let records = vec![
            record(1, "Electronics", 10, "1000", StockStatus::InStock),
            record(2, "Electronics", 5, "500", StockStatus::OutOfStock),
            record(3, "Clothing", 15, "20", StockStatus::InStock),
        ];
        let categories = vec!["Clothing".to_string(), "Electronics".to_string()];

        let metrics = compute_metrics(&records, &categories).unwrap();

        assert_eq!(metrics.total_value_in_stock, dec("10300.00"));
        assert_eq!(metrics.average_price_in_stock, dec("412.00"));

        let clothing = &metrics.category_metrics[0];
        assert_eq!(clothing.category, "Clothing");
        assert_eq!(clothing.total_products_in_stock, 15);
        assert_eq!(clothing.total_value_in_stock, dec("300"));
        assert_eq!(clothing.average_price_in_stock, dec("20.00"));

        let electronics = &metrics.category_metrics[1];
        assert_eq!(electronics.total_products_in_stock, 10);
        assert_eq!(electronics.average_price_in_stock, dec("1000.00"));
    }

    #[test]
    fn test_average_rounds_half_up() {
        let records = vec![
            record(1, "Food", 1, "0.01", StockStatus::InStock),
            record(2, "Food", 1, "0.02", StockStatus::InStock),
        ];

        let metrics = compute_metrics(&records, &["Food".to_string()]).unwrap();

        // 0.03 / 2 = 0.015
        assert_eq!(metrics.average_price_in_stock, dec("0.02"));
    }

    #[test]
    fn test_category_without_stock_reports_zero() {
        let records = vec![record(1, "Toys", 4, "9.99", StockStatus::OutOfStock)];

        let categories = vec!["Garden".to_string(), "Toys".to_string()];
        let metrics = compute_metrics(&records, &categories).unwrap();

        assert_eq!(metrics.total_value_in_stock, Decimal::ZERO);
        assert_eq!(metrics.average_price_in_stock, Decimal::ZERO);
        assert!(metrics
            .category_metrics
            .iter()
            .all(|m| m.total_products_in_stock == 0 && m.average_price_in_stock.is_zero()));
    }

    #[test]
    fn test_global_totals_sum_case_variant_categories() {
        let records = vec![
            record(1, "Food", 2, "5", StockStatus::InStock),
            record(2, "food", 2, "5", StockStatus::InStock),
        ];
        let categories = vec!["Food".to_string(), "food".to_string()];

        let metrics = compute_metrics(&records, &categories).unwrap();

        assert_eq!(metrics.category_metrics[0].total_products_in_stock, 4);
        assert_eq!(metrics.category_metrics[1].total_products_in_stock, 4);

        let category_sum: Decimal = metrics
            .category_metrics
            .iter()
            .map(|m| m.total_value_in_stock)
            .sum();
        assert_eq!(metrics.total_value_in_stock, category_sum);
        assert_eq!(metrics.total_value_in_stock, dec("40"));
        assert_eq!(metrics.average_price_in_stock, dec("5.00"));
    }

    #[test]
    fn test_value_overflow_is_internal_error() {
        let mut huge = record(1, "Gold", 2, "1", StockStatus::InStock);
        huge.product.price = Decimal::MAX;

        let result = compute_metrics(&[huge], &["Gold".to_string()]);
        assert!(matches!(result, Err(InventoryError::Internal(msg)) if msg.contains("record 1")));
    }

    #[test]
    fn test_records_outside_index_are_not_counted() {
        let records = vec![record(1, "Unlisted", 3, "7", StockStatus::InStock)];

        let metrics = compute_metrics(&records, &[]).unwrap();
        assert!(metrics.total_value_in_stock.is_zero());
    }

    #[test]
    fn test_empty_store() {
        let metrics = compute_metrics(&[], &[]).unwrap();
        assert!(metrics.category_metrics.is_empty());
        assert!(metrics.total_value_in_stock.is_zero());
    }
}
