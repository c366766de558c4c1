use crate::domain::{
    entities::{Coordinate, Country},
    repositories::CountryRepository,
};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;

/// Reads the country list from a JSON array on disk.
///
/// Accepts flat records (`code`, `name`, `latlng`) as well as the
/// REST Countries layout (`cca2`, `name.common`, `latlng`).
pub struct JsonCountryRepository {
    path: PathBuf,
}

impl JsonCountryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    fn parse_countries(&self, json: &str) -> Result<Vec<Country>> {
        let data: Value = serde_json::from_str(json).context("Failed to parse country list")?;
        let items = data
            .as_array()
            .ok_or_else(|| anyhow!("Country list must be a JSON array"))?;

        let mut countries = Vec::with_capacity(items.len());
        for item in items {
            let code = item
                .get("code")
                .or_else(|| item.get("cca2"))
                .and_then(|v| v.as_str());
            let name = match item.get("name") {
                Some(Value::String(name)) => Some(name.as_str()),
                Some(name) => name.get("common").and_then(|v| v.as_str()),
                None => None,
            };
            let latlng: Option<Vec<f64>> = item
                .get("latlng")
                .and_then(|v| v.as_array())
                .map(|arr| arr.iter().filter_map(|v| v.as_f64()).collect());

            match (code, name, latlng.as_deref()) {
                (Some(code), Some(name), Some([lat, lon, ..])) => {
                    countries.push(Country::new(code, name, Coordinate::new(*lat, *lon)));
                }
                _ => tracing::warn!("Skipping incomplete country record: {}", item),
            }
        }

        Ok(countries)
    }
}

#[async_trait]
impl CountryRepository for JsonCountryRepository {
    async fn fetch_countries(&self) -> Result<Vec<Country>> {
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read country list {}", self.path.display()))?;
        self.parse_countries(&json)
    }
}
