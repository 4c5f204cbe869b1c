//! Test fixtures and common test data.

/// Capture time generators.
pub mod dates {
    use chrono::{DateTime, Duration, Local, TimeZone};

    /// 2022-03-20 14:05:09 local time.
    pub fn capture_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2022, 3, 20, 14, 5, 9).unwrap()
    }

    /// `capture_time()` shifted by a number of milliseconds.
    pub fn capture_time_plus_millis(millis: i64) -> DateTime<Local> {
        capture_time() + Duration::milliseconds(millis)
    }
}

/// Sample upstream payloads.
pub mod payloads {
    use serde_json::{json, Value};

    /// `{"players": [...]}` with identity fields only.
    pub fn basic(assets: &[(i64, &str, f64)]) -> Value {
        let players: Vec<Value> = assets
            .iter()
            .map(|(id, name, price)| json!({"id": id, "display_name": name, "price": price}))
            .collect();
        json!({ "players": players })
    }

    /// Same as [`basic`], serialized.
    pub fn basic_bytes(assets: &[(i64, &str, f64)]) -> Vec<u8> {
        basic(assets).to_string().into_bytes()
    }

    /// An asset carrying every field the derived columns read.
    ///
    /// Change info is fixed at up 60, down 15, selection 40.
    pub fn full_asset(id: i64, price: f64, start_price: f64, weekly_change: f64) -> Value {
        json!({
            "id": id,
            "display_name": format!("Driver {}", id),
            "price": price,
            "weekly_price_change": weekly_change,
            "season_prices": [
                {"game_period_id": 1, "price": start_price}
            ],
            "current_price_change_info": {
                "probability_price_up_percentage": 60,
                "probability_price_down_percentage": 15,
                "current_selection_percentage": 40
            }
        })
    }
}

/// Selection baseline reference data.
pub mod baseline {
    use crate::extract::SelectionBaseline;
    use std::collections::HashMap;

    /// Covers asset ids 1 (31%), 7 (12%) and 44 (20%).
    pub fn sample() -> SelectionBaseline {
        SelectionBaseline::new("2022", HashMap::from([(1, 31), (7, 12), (44, 20)]))
    }
}
