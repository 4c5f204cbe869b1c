use crate::error::{ConfigError, ExtractError, Result};
use crate::extract::baseline::SelectionBaseline;
use crate::extract::payload::{asset_entries, decimal, integer, required, text};
use crate::model::{round1, AssetRecord, DerivedField, FieldSet, FieldValue, Snapshot};
use serde_json::{Map, Value};

const CHANGE_INFO_KEY: &str = "current_price_change_info";
const PERIOD_PRICES_KEY: &str = "season_prices";
const WEEKLY_CHANGE_KEY: &str = "weekly_price_change";

/// Values from `current_price_change_info` used by derived fields.
struct ChangeInfo {
    up: i64,
    down: i64,
    selection: i64,
}

/// Turns a payload into report rows according to a declarative field set.
pub struct SnapshotExtractor {
    fields: FieldSet,
    period_id: i64,
    baseline: Option<SelectionBaseline>,
}

impl SnapshotExtractor {
    /// Creates an extractor.
    ///
    /// `period_id` selects the reference entry of `season_prices`.
    /// `selection_change` needs a baseline; asking for it without one is a
    /// configuration error.
    pub fn new(
        fields: FieldSet,
        period_id: i64,
        baseline: Option<SelectionBaseline>,
    ) -> Result<Self, ConfigError> {
        if fields.contains(DerivedField::SelectionChange) && baseline.is_none() {
            return Err(ConfigError::missing(
                "baseline_file (required by the selection_change field)",
            ));
        }
        Ok(Self {
            fields,
            period_id,
            baseline,
        })
    }

    /// Extracts one record per asset, in payload order.
    ///
    /// Any bad entry rejects the whole snapshot.
    pub fn extract(&self, snapshot: &Snapshot) -> Result<Vec<AssetRecord>, ExtractError> {
        asset_entries(snapshot.body())?
            .iter()
            .enumerate()
            .map(|(index, entry)| self.extract_asset(index, entry, snapshot))
            .collect()
    }

    fn extract_asset(
        &self,
        index: usize,
        entry: &Value,
        snapshot: &Snapshot,
    ) -> Result<AssetRecord, ExtractError> {
        let entry = entry
            .as_object()
            .ok_or_else(|| ExtractError::Malformed(format!("asset #{} is not an object", index)))?;

        let id = integer(required(entry, index, "id")?, index, "id")?;
        let name = text(required(entry, index, "display_name")?, index, "display_name")?;
        let price = decimal(required(entry, index, "price")?, index, "price")?;

        let start_price = if self.fields.needs_start_price() {
            Some(self.start_price(entry, index, id)?)
        } else {
            None
        };
        let change_info = if self.fields.needs_change_info() {
            Some(read_change_info(entry, index, id)?)
        } else {
            None
        };

        let mut derived = Vec::with_capacity(self.fields.len());
        for field in self.fields.iter() {
            let value = match (field, start_price, &change_info) {
                (DerivedField::StartPrice, Some(start), _) => FieldValue::Decimal(start),
                (DerivedField::PriceChange, Some(start), _) => {
                    FieldValue::Decimal(round1(price - start))
                }
                (DerivedField::WeeklyPriceChange, Some(start), _) => {
                    let weekly = decimal(
                        required(entry, index, WEEKLY_CHANGE_KEY)?,
                        index,
                        WEEKLY_CHANGE_KEY,
                    )?;
                    // Upstream sometimes reports the start price instead of a delta.
                    if weekly == start {
                        FieldValue::Decimal(0.0)
                    } else {
                        FieldValue::Decimal(round1(weekly))
                    }
                }
                (DerivedField::ProbabilityUp, _, Some(info)) => FieldValue::Integer(info.up),
                (DerivedField::ProbabilityDown, _, Some(info)) => FieldValue::Integer(info.down),
                (DerivedField::Sentiment, _, Some(info)) => {
                    FieldValue::Integer(percentage_delta(info.up, info.down, index)?)
                }
                (DerivedField::SelectionPercentage, _, Some(info)) => {
                    FieldValue::Integer(info.selection)
                }
                (DerivedField::SelectionChange, _, Some(info)) => {
                    let baseline = self.baseline_selection(id)?;
                    FieldValue::Integer(percentage_delta(info.selection, baseline, index)?)
                }
                (other, _, _) => {
                    return Err(ExtractError::Malformed(format!(
                        "asset {}: inputs for '{}' unavailable",
                        id,
                        other.key()
                    )))
                }
            };
            derived.push(value);
        }

        Ok(AssetRecord::new(id, name, price, derived, snapshot.captured_at()))
    }

    fn start_price(
        &self,
        entry: &Map<String, Value>,
        index: usize,
        id: i64,
    ) -> Result<f64, ExtractError> {
        let prices = required(entry, index, PERIOD_PRICES_KEY)?
            .as_array()
            .ok_or_else(|| ExtractError::invalid_field(index, PERIOD_PRICES_KEY, "list"))?;

        for period in prices {
            let Some(period) = period.as_object() else {
                return Err(ExtractError::invalid_field(index, PERIOD_PRICES_KEY, "list of objects"));
            };
            let period_id = integer(
                required(period, index, "game_period_id")?,
                index,
                "game_period_id",
            )?;
            if period_id == self.period_id {
                return decimal(required(period, index, "price")?, index, "season_prices.price");
            }
        }

        Err(ExtractError::PeriodPriceMissing {
            id,
            period_id: self.period_id,
        })
    }

    fn baseline_selection(&self, id: i64) -> Result<i64, ExtractError> {
        let baseline = self.baseline.as_ref().ok_or_else(|| ExtractError::BaselineMissing {
            id,
            version: "none".to_string(),
        })?;
        baseline
            .get(id)
            .ok_or_else(|| ExtractError::BaselineMissing {
                id,
                version: baseline.version().to_string(),
            })
    }
}

/// Difference of two upstream percentages; an overflow rejects the asset.
fn percentage_delta(lhs: i64, rhs: i64, index: usize) -> Result<i64, ExtractError> {
    lhs.checked_sub(rhs)
        .ok_or_else(|| ExtractError::invalid_field(index, CHANGE_INFO_KEY, "percentage"))
}

fn read_change_info(entry: &Map<String, Value>, index: usize, id: i64) -> Result<ChangeInfo, ExtractError> {
    let info = match entry.get(CHANGE_INFO_KEY) {
        Some(Value::Object(info)) => info,
        _ => return Err(ExtractError::ChangeInfoUnavailable { id }),
    };

    let field = |key: &str| -> Result<i64, ExtractError> {
        integer(required(info, index, key)?, index, key)
    };

    Ok(ChangeInfo {
        up: field("probability_price_up_percentage")?,
        down: field("probability_price_down_percentage")?,
        selection: field("current_selection_percentage")?,
    })
}
