use crate::models::inventory::InventoryRecord;
use crate::models::report::{CategoryValue, ReportBreakdown, StatusCount, Summary};

/// Summary metrics over a record sequence. Empty input yields all zeros.
pub fn aggregate(records: &[InventoryRecord]) -> Summary {
    let total_value: f64 = records.iter().map(|r| r.value).sum();
    let critical_items_count = records.iter().filter(|r| r.status.is_critical()).count();

    Summary {
        total_items: records.len(),
        total_value,
        critical_items_count,
    }
}

/// Value per category and count per status, each in first-seen order.
pub fn breakdown(records: &[InventoryRecord]) -> ReportBreakdown {
    let mut value_by_category: Vec<CategoryValue> = Vec::new();
    let mut status_distribution: Vec<StatusCount> = Vec::new();

    for record in records {
        match value_by_category
            .iter_mut()
            .find(|c| c.category == record.category)
        {
            Some(entry) => entry.value += record.value,
            None => value_by_category.push(CategoryValue {
                category: record.category.clone(),
                value: record.value,
            }),
        }

        match status_distribution
            .iter_mut()
            .find(|s| s.status == record.status)
        {
            Some(entry) => entry.count += 1,
            None => status_distribution.push(StatusCount {
                status: record.status,
                count: 1,
            }),
        }
    }

    ReportBreakdown {
        value_by_category,
        status_distribution,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::inventory::InventoryStatus;

    fn record(category: &str, status: InventoryStatus, value: f64) -> InventoryRecord {
        InventoryRecord {
            id: format!("ITEM-{category}-{value}"),
            name: format!("{category} item"),
            sku: "SKU-TEST".to_string(),
            quantity: 10,
            category: category.to_string(),
            last_updated: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            status,
            value,
            turnover_rate: None,
            expiration_date: None,
        }
    }

    #[test]
    fn test_aggregate_three_records() {
        let records = vec![
            record("Tools", InventoryStatus::InStock, 100.0),
            record("Tools", InventoryStatus::OutOfStock, 0.0),
            record("Packaging", InventoryStatus::LowStock, 50.0),
        ];

        let summary = aggregate(&records);
        assert_eq!(summary.total_items, 3);
        assert_eq!(summary.total_value, 150.0);
        assert_eq!(summary.critical_items_count, 2);
    }

    #[test]
    fn test_aggregate_empty() {
        let summary = aggregate(&[]);
        assert_eq!(summary.total_items, 0);
        assert_eq!(summary.total_value, 0.0);
        assert_eq!(summary.critical_items_count, 0);
    }

    #[test]
    fn test_aggregate_overstock_is_not_critical() {
        let records = vec![
            record("Raw Materials", InventoryStatus::Overstock, 499_000.0),
            record("Raw Materials", InventoryStatus::Overstock, 1_000.0),
        ];

        let summary = aggregate(&records);
        assert_eq!(summary.total_items, 2);
        assert_eq!(summary.total_value, 500_000.0);
        assert_eq!(summary.critical_items_count, 0);
    }

    #[test]
    fn test_aggregate_large_values_do_not_overflow() {
        let records: Vec<InventoryRecord> = (0..1_000)
            .map(|_| record("Electronics", InventoryStatus::InStock, 4_000_000_000.0))
            .collect();

        let summary = aggregate(&records);
        assert_eq!(summary.total_value, 4_000_000_000_000.0);
    }

    #[test]
    fn test_breakdown_groups_in_first_seen_order() {
        let records = vec![
            record("Tools", InventoryStatus::InStock, 100.0),
            record("Packaging", InventoryStatus::LowStock, 20.0),
            record("Tools", InventoryStatus::LowStock, 30.0),
        ];

        let result = breakdown(&records);

        assert_eq!(result.value_by_category.len(), 2);
        assert_eq!(result.value_by_category[0].category, "Tools");
        assert_eq!(result.value_by_category[0].value, 130.0);
        assert_eq!(result.value_by_category[1].category, "Packaging");

        assert_eq!(result.status_distribution.len(), 2);
        assert_eq!(
            result.status_distribution[0].status,
            InventoryStatus::InStock
        );
        assert_eq!(result.status_distribution[1].count, 2);
    }

    #[test]
    fn test_breakdown_empty() {
        assert_eq!(breakdown(&[]), ReportBreakdown::default());
    }
}
