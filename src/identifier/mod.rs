//! Brand and series identification against the configured lookup tables.

mod tables;

pub use tables::{BrandPattern, IdentifierTables, SeriesGroup};

pub const UNKNOWN_BRAND: &str = "UNKNOWN";
pub const DEFAULT_SERIES: &str = "其他";

/// Classifies refined titles into (brand, series). Pure: the tables are fixed
/// at construction, so identical titles always yield identical results and
/// concurrent callers need no locking.
pub struct CarIdentifier {
    tables: IdentifierTables,
}

impl CarIdentifier {
    pub fn new(tables: IdentifierTables) -> Self {
        Self { tables }
    }

    /// Brand pass: first configured pattern to match wins, else `UNKNOWN`.
    /// Series pass: longest matching keyword among the brand's series wins,
    /// else `其他`.
    pub fn identify(&self, title: &str) -> (String, String) {
        let brand = self
            .tables
            .brands
            .iter()
            .find(|b| b.pattern.is_match(title))
            .map(|b| b.name.clone())
            .unwrap_or_else(|| UNKNOWN_BRAND.to_string());

        let series = self.identify_series(&brand, title);
        (brand, series)
    }

    fn identify_series(&self, brand: &str, title: &str) -> String {
        let Some(groups) = self.tables.series.get(&brand.to_uppercase()) else {
            return DEFAULT_SERIES.to_string();
        };

        let haystack = title.to_lowercase();
        // (series name, keyword length in chars); strict > keeps the
        // first-configured series on equal-length ties.
        let mut best: Option<(&str, usize)> = None;
        for group in groups {
            for keyword in &group.keywords {
                if haystack.contains(&keyword.to_lowercase()) {
                    let len = keyword.chars().count();
                    if best.is_none_or(|(_, best_len)| len > best_len) {
                        best = Some((group.name.as_str(), len));
                    }
                }
            }
        }

        best.map(|(name, _)| name.to_string())
            .unwrap_or_else(|| DEFAULT_SERIES.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::RegexBuilder;
    use std::collections::HashMap;
    use std::path::Path;

    fn pattern(raw: &str) -> regex::Regex {
        RegexBuilder::new(raw).case_insensitive(true).build().unwrap()
    }

    fn group(name: &str, keywords: &[&str]) -> SeriesGroup {
        SeriesGroup {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn fixture() -> CarIdentifier {
        let brands = vec![
            BrandPattern {
                name: "TOYOTA".to_string(),
                pattern: pattern("toyota|豐田"),
            },
            BrandPattern {
                name: "HONDA".to_string(),
                pattern: pattern("honda|本田"),
            },
        ];
        let mut series = HashMap::new();
        series.insert(
            "TOYOTA".to_string(),
            vec![
                // short keyword first so the longest-match rule, not file
                // order, has to pick the winner
                group("Cross", &["cross"]),
                group("Corolla Cross", &["corolla cross"]),
                group("Wish", &["wish"]),
                group("Vios", &["vios"]),
            ],
        );
        CarIdentifier::new(IdentifierTables::from_tables(brands, series))
    }

    #[test]
    fn unmatched_title_gets_default_sentinels() {
        let identifier = fixture();
        assert_eq!(
            identifier.identify("2018 中古好車 一手車"),
            ("UNKNOWN".to_string(), DEFAULT_SERIES.to_string())
        );
    }

    #[test]
    fn first_matching_brand_pattern_wins() {
        let identifier = fixture();
        let (brand, _) = identifier.identify("2021 Toyota Altis");
        assert_eq!(brand, "TOYOTA");
    }

    #[test]
    fn brand_matching_is_case_insensitive() {
        let identifier = fixture();
        let (brand, _) = identifier.identify("2021 TOYOTA ALTIS");
        assert_eq!(brand, "TOYOTA");
    }

    #[test]
    fn longest_keyword_selects_series() {
        let identifier = fixture();
        let (_, series) = identifier.identify("2022 Toyota Corolla Cross 旗艦");
        assert_eq!(series, "Corolla Cross");
    }

    #[test]
    fn equal_length_tie_goes_to_first_configured_series() {
        let identifier = fixture();
        // "wish" and "vios" both match with length 4; Wish is configured first
        let (_, series) = identifier.identify("toyota wish 換 vios");
        assert_eq!(series, "Wish");
    }

    #[test]
    fn brand_without_series_table_gets_default_series() {
        let identifier = fixture();
        assert_eq!(
            identifier.identify("2019 Honda Fit"),
            ("HONDA".to_string(), DEFAULT_SERIES.to_string())
        );
    }

    #[test]
    fn identify_is_pure() {
        let identifier = fixture();
        let title = "2022 Toyota Corolla Cross";
        assert_eq!(identifier.identify(title), identifier.identify(title));
    }

    #[test]
    fn loads_committed_config_directory() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("config");
        let tables = IdentifierTables::load(&dir);
        assert!(!tables.brands.is_empty());
        assert!(tables.series.contains_key("TOYOTA"));

        let identifier = CarIdentifier::new(tables);
        let (brand, series) = identifier.identify("2021 Toyota Altis");
        assert_eq!(brand, "TOYOTA");
        assert_eq!(series, "Altis");
    }

    #[test]
    fn missing_config_directory_degrades_to_empty_tables() {
        let tables = IdentifierTables::load(Path::new("no_such_config_dir"));
        assert!(tables.brands.is_empty());
        assert!(tables.series.is_empty());

        let identifier = CarIdentifier::new(tables);
        assert_eq!(
            identifier.identify("2021 Toyota Altis"),
            ("UNKNOWN".to_string(), DEFAULT_SERIES.to_string())
        );
    }
}
