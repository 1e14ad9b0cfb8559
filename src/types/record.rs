use serde::{Deserialize, Serialize};

use super::{PricePoint, TimeSeries};

/// One raw history record as delivered by the tracker backend. Timestamps
/// arrive in epoch seconds; everything downstream works in milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceRecord {
    pub timestamp: i64,
    pub buy_price: f64,
    pub sell_price: f64,
}

/// Buy-price series for a record set, in delivery order.
pub fn buy_series(records: &[PriceRecord]) -> TimeSeries {
    records
        .iter()
        .map(|r| PricePoint::new(r.timestamp * 1000, r.buy_price))
        .collect()
}

/// Sell-price series for a record set, in delivery order.
pub fn sell_series(records: &[PriceRecord]) -> TimeSeries {
    records
        .iter()
        .map(|r| PricePoint::new(r.timestamp * 1000, r.sell_price))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_construction_scales_timestamps() {
        let records = vec![
            PriceRecord { timestamp: 10, buy_price: 1.0, sell_price: 2.0 },
            PriceRecord { timestamp: 20, buy_price: 3.0, sell_price: 4.0 },
        ];

        let buy = buy_series(&records);
        assert_eq!(buy.len(), 2);
        assert_eq!(buy.points()[0].timestamp_ms, 10_000);
        assert_eq!(buy.points()[0].value, 1.0);

        let sell = sell_series(&records);
        assert_eq!(sell.points()[1].timestamp_ms, 20_000);
        assert_eq!(sell.points()[1].value, 4.0);
    }

    #[test]
    fn test_empty_records_yield_empty_series() {
        assert!(buy_series(&[]).is_empty());
        assert!(sell_series(&[]).is_empty());
    }

    #[test]
    fn test_record_deserializes_from_backend_shape() {
        let json = r#"{"timestamp": 1700000000, "buy_price": 4.2, "sell_price": 5.1}"#;
        let record: PriceRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.timestamp, 1_700_000_000);
        assert_eq!(record.buy_price, 4.2);
        assert_eq!(record.sell_price, 5.1);
    }
}
