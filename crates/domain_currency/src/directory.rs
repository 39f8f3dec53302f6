//! Country/currency directory data
//!
//! The directory returns one record per country, each listing the
//! currencies used there. [`CurrencyTable`] flattens that into a
//! deduplicated code-to-currency table ordered by code.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Display details for one currency as reported by a country
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CurrencyDetail {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryName {
    pub common: String,
}

/// A country as returned by `?fields=name,currencies`
///
/// Some territories have no currency at all; `currencies` is then empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub name: CountryName,
    #[serde(default)]
    pub currencies: BTreeMap<String, CurrencyDetail>,
}

impl CountryRecord {
    pub fn new(name: impl Into<String>, currencies: impl IntoIterator<Item = (&'static str, &'static str, &'static str)>) -> Self {
        Self {
            name: CountryName { common: name.into() },
            currencies: currencies
                .into_iter()
                .map(|(code, name, symbol)| {
                    (
                        code.to_string(),
                        CurrencyDetail {
                            name: name.to_string(),
                            symbol: symbol.to_string(),
                        },
                    )
                })
                .collect(),
        }
    }
}

/// An entry of the resolved currency table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyInfo {
    pub code: String,
    pub name: String,
    pub symbol: String,
}

/// Deduplicated currency table, iterated in code order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrencyTable {
    entries: BTreeMap<String, CurrencyInfo>,
}

impl CurrencyTable {
    /// Builds the table; the first country to mention a code wins
    pub fn from_countries(countries: &[CountryRecord]) -> Self {
        let mut entries = BTreeMap::new();
        for country in countries {
            for (code, detail) in &country.currencies {
                entries.entry(code.clone()).or_insert_with(|| CurrencyInfo {
                    code: code.clone(),
                    name: detail.name.clone(),
                    symbol: detail.symbol.clone(),
                });
            }
        }
        Self { entries }
    }

    pub fn get(&self, code: &str) -> Option<&CurrencyInfo> {
        self.entries.get(code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CurrencyInfo> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_wins_and_sorted() {
        let countries = vec![
            CountryRecord::new("Zimbabwe", [("USD", "United States dollar", "$"), ("ZWL", "Zimbabwean dollar", "$")]),
            CountryRecord::new("United States", [("USD", "US Dollar", "US$")]),
            CountryRecord::new("Antarctica", Vec::<(&str, &str, &str)>::new()),
            CountryRecord::new("India", [("INR", "Indian rupee", "₹")]),
        ];

        let table = CurrencyTable::from_countries(&countries);
        let codes: Vec<&str> = table.iter().map(|c| c.code.as_str()).collect();

        assert_eq!(codes, vec!["INR", "USD", "ZWL"]);
        assert_eq!(table.get("USD").map(|c| c.symbol.as_str()), Some("$"));
        assert_eq!(table.get("USD").map(|c| c.name.as_str()), Some("United States dollar"));
    }

    #[test]
    fn test_decodes_directory_payload() {
        let payload = r#"[
            {"name": {"common": "India", "official": "Republic of India"},
             "currencies": {"INR": {"name": "Indian rupee", "symbol": "₹"}}},
            {"name": {"common": "Antarctica"}, "currencies": {}},
            {"name": {"common": "Bouvet Island"}}
        ]"#;

        let countries: Vec<CountryRecord> = serde_json::from_str(payload).unwrap();
        assert_eq!(countries.len(), 3);
        assert!(countries[2].currencies.is_empty());
        assert_eq!(CurrencyTable::from_countries(&countries).len(), 1);
    }
}
