use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// A value computed from an asset entry on top of its identity fields.
///
/// The set of derived fields in use is configuration: adding a column to the
/// report means listing another variant, never branching the extractor.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum DerivedField {
    /// Price at the start of the reference period
    StartPrice,
    /// Current price minus start price
    PriceChange,
    /// Week-over-week price delta reported upstream
    WeeklyPriceChange,
    /// Probability (%) that the price goes up
    ProbabilityUp,
    /// Probability (%) that the price goes down
    ProbabilityDown,
    /// Up probability minus down probability
    Sentiment,
    /// Current selection percentage
    SelectionPercentage,
    /// Selection percentage minus the baseline selection for the asset
    SelectionChange,
}

impl DerivedField {
    /// Every recognised field, in canonical column order.
    pub const ALL: [DerivedField; 8] = [
        DerivedField::StartPrice,
        DerivedField::PriceChange,
        DerivedField::WeeklyPriceChange,
        DerivedField::ProbabilityUp,
        DerivedField::ProbabilityDown,
        DerivedField::Sentiment,
        DerivedField::SelectionPercentage,
        DerivedField::SelectionChange,
    ];

    /// Configuration key used in `SCRAPER_FIELDS`.
    pub fn key(&self) -> &'static str {
        match self {
            DerivedField::StartPrice => "start_price",
            DerivedField::PriceChange => "price_change",
            DerivedField::WeeklyPriceChange => "weekly_price_change",
            DerivedField::ProbabilityUp => "probability_up",
            DerivedField::ProbabilityDown => "probability_down",
            DerivedField::Sentiment => "sentiment",
            DerivedField::SelectionPercentage => "selection_percentage",
            DerivedField::SelectionChange => "selection_change",
        }
    }

    /// Whether computing this field needs `current_price_change_info`.
    pub fn needs_change_info(&self) -> bool {
        matches!(
            self,
            DerivedField::ProbabilityUp
                | DerivedField::ProbabilityDown
                | DerivedField::Sentiment
                | DerivedField::SelectionPercentage
                | DerivedField::SelectionChange
        )
    }

    /// Whether computing this field needs the per-period price list.
    pub fn needs_start_price(&self) -> bool {
        matches!(
            self,
            DerivedField::StartPrice | DerivedField::PriceChange | DerivedField::WeeklyPriceChange
        )
    }
}

/// Column header for the report.
impl fmt::Display for DerivedField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DerivedField::ProbabilityUp => write!(f, "probability_price_up_percentage"),
            DerivedField::ProbabilityDown => write!(f, "probability_price_down_percentage"),
            other => write!(f, "{}", other.key()),
        }
    }
}

impl FromStr for DerivedField {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        DerivedField::ALL
            .into_iter()
            .find(|field| field.key() == key)
            .ok_or_else(|| ConfigError::invalid("fields", format!("unknown derived field '{}'", s)))
    }
}

/// Ordered list of derived fields an extractor computes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet(Vec<DerivedField>);

impl FieldSet {
    pub fn new(fields: Vec<DerivedField>) -> Self {
        Self(fields)
    }

    /// Parses a comma separated list such as `start_price,price_change`.
    ///
    /// Blank input yields an empty set (identity columns only). Repeated keys
    /// are rejected since each column may appear once.
    pub fn parse(list: &str) -> Result<Self, ConfigError> {
        let mut fields = Vec::new();
        for part in list.split(',').filter(|p| !p.trim().is_empty()) {
            let field: DerivedField = part.parse()?;
            if fields.contains(&field) {
                return Err(ConfigError::invalid(
                    "fields",
                    format!("derived field '{}' listed twice", field.key()),
                ));
            }
            fields.push(field);
        }
        Ok(Self::new(fields))
    }

    pub fn iter(&self) -> impl Iterator<Item = &DerivedField> {
        self.0.iter()
    }

    pub fn contains(&self, field: DerivedField) -> bool {
        self.0.contains(&field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn needs_change_info(&self) -> bool {
        self.0.iter().any(DerivedField::needs_change_info)
    }

    pub fn needs_start_price(&self) -> bool {
        self.0.iter().any(DerivedField::needs_start_price)
    }

    /// Full CSV header: identity columns, derived columns, capture time.
    pub fn header(&self) -> Vec<String> {
        let mut header = vec!["id".to_string(), "name".to_string(), "price".to_string()];
        header.extend(self.0.iter().map(|f| f.to_string()));
        header.push("datetime".to_string());
        header.push("timestamp".to_string());
        header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod succeeds {
        use super::*;

        #[test]
        fn test_parse_list() {
            let set = FieldSet::parse("start_price, price_change,Sentiment").unwrap();
            assert_eq!(
                set,
                FieldSet::new(vec![
                    DerivedField::StartPrice,
                    DerivedField::PriceChange,
                    DerivedField::Sentiment,
                ])
            );
        }

        #[test]
        fn test_parse_empty() {
            assert!(FieldSet::parse("").unwrap().is_empty());
            assert!(FieldSet::parse(" , ").unwrap().is_empty());
        }

        #[test]
        fn test_header() {
            let set = FieldSet::new(vec![DerivedField::ProbabilityUp, DerivedField::SelectionChange]);
            assert_eq!(
                set.header(),
                vec![
                    "id",
                    "name",
                    "price",
                    "probability_price_up_percentage",
                    "selection_change",
                    "datetime",
                    "timestamp",
                ]
            );
        }

        #[test]
        fn test_requirements() {
            let set = FieldSet::new(vec![DerivedField::PriceChange]);
            assert!(set.needs_start_price());
            assert!(!set.needs_change_info());

            let set = FieldSet::new(vec![DerivedField::Sentiment]);
            assert!(!set.needs_start_price());
            assert!(set.needs_change_info());
        }

        #[test]
        fn test_every_key_round_trips() {
            for field in DerivedField::ALL {
                assert_eq!(field.key().parse::<DerivedField>().unwrap(), field);
            }
        }
    }

    mod fails {
        use super::*;

        #[test]
        fn test_unknown_field() {
            let err = FieldSet::parse("start_price,market_cap").unwrap_err();
            assert!(err.to_string().contains("unknown derived field 'market_cap'"));
        }

        #[test]
        fn test_duplicate_field() {
            let err = FieldSet::parse("sentiment,sentiment").unwrap_err();
            assert!(err.to_string().contains("listed twice"));
        }
    }
}
