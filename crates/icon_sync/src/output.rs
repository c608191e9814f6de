//! JSON bundle written at the end of a run

use crate::error::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A downloaded icon
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    /// Display name, e.g. `14px-Close` or `weather-Rain`
    pub name: String,
    /// Raw SVG markup as served
    pub svg: String,
}

/// Data key -> icons, in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IconsData(IndexMap<String, Vec<OutputRecord>>);

impl IconsData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: String, icons: Vec<OutputRecord>) {
        self.0.insert(key, icons);
    }

    pub fn get(&self, key: &str) -> Option<&[OutputRecord]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Record count per key
    pub fn counts(&self) -> Vec<(String, usize)> {
        self.0
            .iter()
            .map(|(key, icons)| (key.clone(), icons.len()))
            .collect()
    }

    pub fn total_icons(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Pretty JSON with two-space indent; non-ASCII is written as-is
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Write the bundle to `path`, replacing any existing file
pub fn write_icons_data(data: &IconsData, path: &Path) -> Result<()> {
    let json = data.to_json()?;
    fs::write(path, json)?;
    Ok(())
}
