//! Icon size buckets

use indexmap::IndexMap;
use std::fmt;

/// One of the fixed icon-size categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeBucket {
    Mini,
    Small,
    Medium,
    Large,
    Weather,
}

impl SizeBucket {
    /// All buckets, in output order
    pub const ALL: [SizeBucket; 5] = [
        SizeBucket::Mini,
        SizeBucket::Small,
        SizeBucket::Medium,
        SizeBucket::Large,
        SizeBucket::Weather,
    ];

    /// Bucket for a size key derived from a component set name
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "mini" => Some(SizeBucket::Mini),
            "small" => Some(SizeBucket::Small),
            "medium" => Some(SizeBucket::Medium),
            "large" => Some(SizeBucket::Large),
            "weather" => Some(SizeBucket::Weather),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SizeBucket::Mini => "mini",
            SizeBucket::Small => "small",
            SizeBucket::Medium => "medium",
            SizeBucket::Large => "large",
            SizeBucket::Weather => "weather",
        }
    }

    /// Icon edge length in pixels; weather icons are not pixel-keyed
    pub fn pixel_size(&self) -> Option<u32> {
        match self {
            SizeBucket::Mini => Some(10),
            SizeBucket::Small => Some(14),
            SizeBucket::Medium => Some(18),
            SizeBucket::Large => Some(24),
            SizeBucket::Weather => None,
        }
    }

    /// Key of this bucket in the output JSON (`"14px"`, `"weather"`)
    pub fn data_key(&self) -> String {
        match self.pixel_size() {
            Some(px) => format!("{}px", px),
            None => self.name().to_string(),
        }
    }

    /// Display name for a variant (`"14px-Close"`, `"weather-Rain"`)
    pub fn display_name(&self, variant: &str) -> String {
        match self.pixel_size() {
            Some(px) => format!("{}px-{}", px, variant),
            None => format!("{}-{}", self.name(), variant),
        }
    }
}

impl fmt::Display for SizeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An icon variant found in the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRecord {
    /// Variant name with the property prefix stripped
    pub name: String,
    /// Remote node id
    pub id: String,
}

/// Component records grouped by bucket, in [`SizeBucket::ALL`] order
#[derive(Debug, Clone)]
pub struct IconBuckets {
    buckets: IndexMap<SizeBucket, Vec<ComponentRecord>>,
}

impl Default for IconBuckets {
    fn default() -> Self {
        Self::new()
    }
}

impl IconBuckets {
    pub fn new() -> Self {
        Self {
            buckets: SizeBucket::ALL.iter().map(|b| (*b, Vec::new())).collect(),
        }
    }

    pub fn push(&mut self, bucket: SizeBucket, record: ComponentRecord) {
        self.buckets.entry(bucket).or_default().push(record);
    }

    pub fn get(&self, bucket: SizeBucket) -> &[ComponentRecord] {
        self.buckets.get(&bucket).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Buckets that hold at least one record
    pub fn non_empty(&self) -> impl Iterator<Item = (SizeBucket, &[ComponentRecord])> {
        self.buckets
            .iter()
            .filter(|(_, records)| !records.is_empty())
            .map(|(bucket, records)| (*bucket, records.as_slice()))
    }

    pub fn total(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}
