//! Immutable brand/series lookup tables loaded from the config directory.
//!
//! `brand_map.json` holds a `BRAND_MAP` object mapping brand name to a regex
//! pattern; `series/<brand>.json` maps series name to a keyword list. File
//! order is significant — brand patterns are tried first-match-wins and series
//! keywords tie-break by position — so both files are parsed with order
//! preserved. Any unreadable or malformed file degrades to an empty table
//! with a warning; classification gets poorer, the process never aborts.

use regex::{Regex, RegexBuilder};
use serde_json::Value;
use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;
use tracing::warn;

const BRAND_MAP_KEY: &str = "BRAND_MAP";

/// One brand row: tried in file order, first regex match wins.
#[derive(Debug, Clone)]
pub struct BrandPattern {
    pub name: String,
    pub pattern: Regex,
}

/// One series row for a brand, keywords in file order.
#[derive(Debug, Clone)]
pub struct SeriesGroup {
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct IdentifierTables {
    pub brands: Vec<BrandPattern>,
    pub series: HashMap<String, Vec<SeriesGroup>>,
}

impl IdentifierTables {
    /// Loads both tables from `config_dir`. Never fails: missing or corrupt
    /// resources leave the corresponding table empty.
    pub fn load(config_dir: &Path) -> Self {
        let brands = match load_brand_map(&config_dir.join("brand_map.json")) {
            Ok(brands) => brands,
            Err(e) => {
                warn!("brand map unavailable ({e}), brand identification degraded");
                Vec::new()
            }
        };

        let mut series = HashMap::new();
        let series_dir = config_dir.join("series");
        match fs::read_dir(&series_dir) {
            Ok(entries) => {
                // Directory order is platform-dependent; sort for determinism.
                let mut paths: Vec<_> = entries
                    .filter_map(|entry| entry.ok().map(|e| e.path()))
                    .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
                    .collect();
                paths.sort();

                for path in paths {
                    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                        continue;
                    };
                    let brand_key = stem.to_uppercase();
                    match load_series_file(&path) {
                        Ok(groups) => {
                            series.insert(brand_key, groups);
                        }
                        Err(e) => {
                            warn!("series file {} unreadable ({e}), skipped", path.display());
                        }
                    }
                }
            }
            Err(e) => {
                warn!(
                    "series directory {} unavailable ({e}), series identification degraded",
                    series_dir.display()
                );
            }
        }

        Self { brands, series }
    }

    /// Direct construction for tests and callers with prebuilt tables.
    pub fn from_tables(
        brands: Vec<BrandPattern>,
        series: HashMap<String, Vec<SeriesGroup>>,
    ) -> Self {
        Self { brands, series }
    }
}

fn load_brand_map(path: &Path) -> Result<Vec<BrandPattern>, Box<dyn Error>> {
    let content = fs::read_to_string(path)?;
    let document: Value = serde_json::from_str(&content)?;
    let map = document
        .get(BRAND_MAP_KEY)
        .and_then(Value::as_object)
        .ok_or_else(|| format!("missing {BRAND_MAP_KEY} object"))?;

    let mut brands = Vec::with_capacity(map.len());
    for (name, pattern_value) in map {
        let Some(pattern_str) = pattern_value.as_str() else {
            warn!("brand {name}: pattern is not a string, entry skipped");
            continue;
        };
        match RegexBuilder::new(pattern_str).case_insensitive(true).build() {
            Ok(pattern) => brands.push(BrandPattern {
                name: name.clone(),
                pattern,
            }),
            Err(e) => warn!("brand {name}: invalid pattern ({e}), entry skipped"),
        }
    }
    Ok(brands)
}

fn load_series_file(path: &Path) -> Result<Vec<SeriesGroup>, Box<dyn Error>> {
    let content = fs::read_to_string(path)?;
    let document: Value = serde_json::from_str(&content)?;
    let map = document
        .as_object()
        .ok_or("series document is not an object")?;

    let mut groups = Vec::with_capacity(map.len());
    for (name, keywords_value) in map {
        let keywords = keywords_value
            .as_array()
            .ok_or_else(|| format!("series {name}: keywords are not a list"))?
            .iter()
            .map(|kw| {
                kw.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| format!("series {name}: keyword is not a string"))
            })
            .collect::<Result<Vec<_>, _>>()?;
        groups.push(SeriesGroup {
            name: name.clone(),
            keywords,
        });
    }
    Ok(groups)
}
