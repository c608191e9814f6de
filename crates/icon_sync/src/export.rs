//! Export pipeline
//!
//! fetch → classify → resolve → download → write. Each stage runs once and
//! hands its result to the next. A bucket whose rendering URLs cannot be
//! resolved is dropped and the run moves on to the next bucket.

use crate::api::{FigmaApi, FigmaClient};
use crate::bucket::{ComponentRecord, IconBuckets, SizeBucket};
use crate::classify::Classifier;
use crate::config::ExportConfig;
use crate::error::Result;
use crate::output::{write_icons_data, IconsData, OutputRecord};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Outcome of a finished run
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub output: PathBuf,
    /// Records written per data key, in output order
    pub counts: Vec<(String, usize)>,
    /// Buckets dropped because their URLs could not be resolved
    pub dropped: Vec<SizeBucket>,
    /// Records skipped because no rendering URL came back
    pub missing_urls: usize,
}

impl ExportSummary {
    pub fn total_icons(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }
}

/// Drives one export against a [`FigmaApi`]
pub struct Exporter<'a, A: FigmaApi> {
    api: &'a A,
    config: &'a ExportConfig,
}

impl<'a, A: FigmaApi> Exporter<'a, A> {
    pub fn new(api: &'a A, config: &'a ExportConfig) -> Self {
        Self { api, config }
    }

    /// Fetch the document subtree and classify its components
    pub fn collect(&self) -> Result<IconBuckets> {
        info!("Fetching icon data from Figma...");
        let response = self
            .api
            .file_nodes(&self.config.file_key, &self.config.node_id)?;
        let root = response.document(&self.config.node_id)?;

        Ok(Classifier::new(&self.config.naming).classify(root))
    }

    /// Resolve and download every bucket
    pub fn download_all(&self, buckets: &IconBuckets) -> Result<(IconsData, ExportReport)> {
        info!("Exporting SVGs...");
        let mut data = IconsData::new();
        let mut report = ExportReport::default();

        for (bucket, records) in buckets.non_empty() {
            match self.download_bucket(bucket, records, &mut report)? {
                Some(icons) => data.insert(bucket.data_key(), icons),
                None => report.dropped.push(bucket),
            }
        }

        Ok((data, report))
    }

    /// Resolve one bucket's URLs and download its icons
    ///
    /// Returns `None` when the resolve response carries no `images` field.
    fn download_bucket(
        &self,
        bucket: SizeBucket,
        records: &[ComponentRecord],
        report: &mut ExportReport,
    ) -> Result<Option<Vec<OutputRecord>>> {
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        let resolved = self.api.svg_urls(&self.config.file_key, &ids)?;

        if resolved.images.is_none() {
            warn!("Error getting SVG URLs for {}: {}", bucket, resolved.raw);
            return Ok(None);
        }

        let mut icons = Vec::with_capacity(records.len());
        for record in records {
            let Some(url) = resolved.url_for(&record.id) else {
                debug!("No rendering URL for {} ({})", record.name, record.id);
                report.missing_urls += 1;
                continue;
            };

            let svg = self.api.download(url)?;
            icons.push(OutputRecord {
                name: bucket.display_name(&record.name),
                svg,
            });
            info!("  Downloaded: {}", record.name);
        }

        Ok(Some(icons))
    }

    /// Run every stage and write the output file
    pub fn run(&self) -> Result<ExportSummary> {
        let buckets = self.collect()?;
        let (data, report) = self.download_all(&buckets)?;
        write_icons_data(&data, &self.config.output)?;

        let summary = ExportSummary {
            output: self.config.output.clone(),
            counts: data.counts(),
            dropped: report.dropped,
            missing_urls: report.missing_urls,
        };
        info!("Icons saved to {}", summary.output.display());
        info!("Total icons: {}", summary.total_icons());
        Ok(summary)
    }
}

/// Non-fatal problems seen while downloading
#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub dropped: Vec<SizeBucket>,
    pub missing_urls: usize,
}

/// Validate the config, connect to Figma and run a full export
pub fn run_export(config: &ExportConfig) -> Result<ExportSummary> {
    config.validate()?;
    let client = FigmaClient::new(config)?;
    Exporter::new(&client, config).run()
}

/// Validate the config, connect to Figma and classify without downloading
pub fn list_icons(config: &ExportConfig) -> Result<IconBuckets> {
    config.validate()?;
    let client = FigmaClient::new(config)?;
    Exporter::new(&client, config).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FileNodesResponse, ImagesResponse};
    use crate::error::IconSyncError;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory stand-in for the Figma API
    struct FakeFigma {
        nodes: serde_json::Value,
        /// Comma-joined id list -> images response body
        images: HashMap<String, String>,
        /// URL -> SVG body
        assets: HashMap<String, String>,
        downloads: RefCell<Vec<String>>,
    }

    impl FakeFigma {
        fn new() -> Self {
            let nodes = json!({
                "nodes": {
                    "221:911": {
                        "document": {
                            "id": "221:911",
                            "name": "Icon",
                            "type": "FRAME",
                            "children": [
                                { "id": "1:0", "name": "컨텐츠", "type": "FRAME", "children": [
                                    { "id": "1:1", "name": "icon-small", "type": "COMPONENT_SET", "children": [
                                        { "id": "1:2", "name": "Property 1=Close", "type": "COMPONENT" },
                                        { "id": "1:3", "name": "Property 1=Open", "type": "COMPONENT" },
                                    ]},
                                    { "id": "2:1", "name": "icon-medium", "type": "COMPONENT_SET", "children": [
                                        { "id": "2:2", "name": "Property 1=Search", "type": "COMPONENT" },
                                    ]},
                                    { "id": "3:1", "name": "날씨", "type": "COMPONENT_SET", "children": [
                                        { "id": "3:2", "name": "Property 1=비", "type": "COMPONENT" },
                                    ]},
                                ]},
                            ]
                        }
                    }
                }
            });

            let mut fake = Self {
                nodes,
                images: HashMap::new(),
                assets: HashMap::new(),
                downloads: RefCell::new(Vec::new()),
            };
            fake.resolve("1:2,1:3", &[("1:2", "u/1-2"), ("1:3", "u/1-3")]);
            fake.resolve("2:2", &[("2:2", "u/2-2")]);
            fake.resolve("3:2", &[("3:2", "u/3-2")]);
            fake
        }

        fn resolve(&mut self, ids: &str, urls: &[(&str, &str)]) {
            let images: HashMap<&str, String> = urls
                .iter()
                .map(|(id, url)| {
                    self.assets
                        .insert(url.to_string(), format!("<svg id=\"{}\"/>", id));
                    (*id, url.to_string())
                })
                .collect();
            self.images.insert(
                ids.to_string(),
                json!({ "err": null, "images": images }).to_string(),
            );
        }
    }

    impl FigmaApi for FakeFigma {
        fn file_nodes(&self, _file_key: &str, _node_id: &str) -> Result<FileNodesResponse> {
            Ok(serde_json::from_value(self.nodes.clone())?)
        }

        fn svg_urls(&self, _file_key: &str, ids: &[&str]) -> Result<ImagesResponse> {
            let body = self
                .images
                .get(&ids.join(","))
                .cloned()
                .unwrap_or_else(|| "{}".to_string());
            ImagesResponse::parse(body)
        }

        fn download(&self, url: &str) -> Result<String> {
            self.downloads.borrow_mut().push(url.to_string());
            Ok(self.assets.get(url).cloned().unwrap_or_default())
        }
    }

    fn config(dir: &tempfile::TempDir) -> ExportConfig {
        ExportConfig::new("FILE", "221:911", "token").with_output(dir.path().join("icons-data.json"))
    }

    fn names(data: &IconsData, key: &str) -> Vec<String> {
        data.get(key)
            .map(|icons| icons.iter().map(|i| i.name.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_full_export() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let api = FakeFigma::new();
        let exporter = Exporter::new(&api, &config);

        let buckets = exporter.collect().unwrap();
        let (data, report) = exporter.download_all(&buckets).unwrap();

        let keys: Vec<&str> = data.keys().collect();
        assert_eq!(keys, ["14px", "18px", "weather"]);
        assert_eq!(names(&data, "14px"), ["14px-Close", "14px-Open"]);
        assert_eq!(names(&data, "18px"), ["18px-Search"]);
        assert_eq!(names(&data, "weather"), ["weather-비"]);
        assert_eq!(data.get("14px").unwrap()[0].svg, "<svg id=\"1:2\"/>");
        assert!(report.dropped.is_empty());
        assert_eq!(report.missing_urls, 0);
    }

    #[test]
    fn test_failed_bucket_is_isolated() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let mut api = FakeFigma::new();
        api.images.insert(
            "2:2".to_string(),
            r#"{"status":400,"err":"Render timeout"}"#.to_string(),
        );

        let summary = Exporter::new(&api, &config).run().unwrap();
        assert_eq!(summary.dropped, [SizeBucket::Medium]);
        assert_eq!(summary.total_icons(), 3);

        let written = std::fs::read_to_string(&config.output).unwrap();
        let value: serde_json::Value = serde_json::from_str(&written).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("18px"));
        assert_eq!(object["14px"].as_array().unwrap().len(), 2);
        assert_eq!(object["weather"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_missing_url_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let mut api = FakeFigma::new();
        api.resolve("1:2,1:3", &[("1:3", "u/1-3")]);

        let exporter = Exporter::new(&api, &config);
        let buckets = exporter.collect().unwrap();
        let (data, report) = exporter.download_all(&buckets).unwrap();

        assert_eq!(names(&data, "14px"), ["14px-Open"]);
        assert_eq!(report.missing_urls, 1);
        assert!(!api.downloads.borrow().contains(&"u/1-2".to_string()));
    }

    #[test]
    fn test_null_url_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let mut api = FakeFigma::new();
        api.images.insert(
            "2:2".to_string(),
            r#"{"err":null,"images":{"2:2":null}}"#.to_string(),
        );

        let exporter = Exporter::new(&api, &config);
        let buckets = exporter.collect().unwrap();
        let (data, report) = exporter.download_all(&buckets).unwrap();

        assert_eq!(data.get("18px").map(|icons| icons.len()), Some(0));
        assert_eq!(report.missing_urls, 1);
        assert!(report.dropped.is_empty());
    }

    #[test]
    fn test_rerun_is_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let api = FakeFigma::new();

        Exporter::new(&api, &config).run().unwrap();
        let first = std::fs::read(&config.output).unwrap();
        Exporter::new(&api, &config).run().unwrap();
        let second = std::fs::read(&config.output).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_bad_token_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let mut api = FakeFigma::new();
        api.nodes = json!({ "status": 403, "err": "Invalid token" });

        let err = Exporter::new(&api, &config).run().unwrap_err();
        assert!(matches!(err, IconSyncError::MissingDocument { .. }));
        assert!(!config.output.exists());
    }

    #[test]
    fn test_empty_document_writes_empty_object() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&dir);
        let mut api = FakeFigma::new();
        api.nodes = json!({
            "nodes": { "221:911": { "document": { "id": "221:911", "name": "Icon", "type": "FRAME" } } }
        });

        let summary = Exporter::new(&api, &config).run().unwrap();
        assert_eq!(summary.total_icons(), 0);
        assert_eq!(std::fs::read_to_string(&config.output).unwrap(), "{}");
        assert!(api.downloads.borrow().is_empty());
    }
}
