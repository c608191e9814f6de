//! Figma REST API access
//!
//! Only the handful of fields the exporter reads are modelled. Field names
//! follow the remote wire format exactly.

use crate::config::ExportConfig;
use crate::error::{IconSyncError, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// Header carrying the personal access token
pub const TOKEN_HEADER: &str = "X-Figma-Token";

/// Kind of a document node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Frame,
    ComponentSet,
    Component,
    #[serde(other)]
    Other,
}

/// A node in the document tree
#[derive(Debug, Clone, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: NodeType,
    #[serde(default)]
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeEntry {
    pub document: Node,
}

/// Response of `GET /v1/files/:key/nodes`
///
/// An invalid token or unknown file comes back as `{"status": 403, "err": ...}`
/// with no `nodes`; an unknown node id comes back as a `null` entry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileNodesResponse {
    #[serde(default)]
    pub nodes: HashMap<String, Option<NodeEntry>>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub err: Option<String>,
}

impl FileNodesResponse {
    /// Root document of the requested node
    pub fn document(&self, node_id: &str) -> Result<&Node> {
        self.nodes
            .get(node_id)
            .and_then(|entry| entry.as_ref())
            .map(|entry| &entry.document)
            .ok_or_else(|| IconSyncError::MissingDocument {
                node_id: node_id.to_string(),
                detail: self.error_detail(),
            })
    }

    /// Remote `err` text with the `status` code, when the payload has them
    fn error_detail(&self) -> Option<String> {
        match (self.status, self.err.as_deref()) {
            (Some(status), Some(err)) => Some(format!("{} (status {})", err, status)),
            (Some(status), None) => Some(format!("status {}", status)),
            (None, Some(err)) => Some(err.to_string()),
            (None, None) => None,
        }
    }
}

/// Response of `GET /v1/images/:key`
#[derive(Debug, Clone)]
pub struct ImagesResponse {
    /// Node id -> rendering URL; `None` when the field is absent
    pub images: Option<HashMap<String, Option<String>>>,
    /// Body as received, kept for anomaly reports
    pub raw: String,
}

#[derive(Deserialize)]
struct ImagesWire {
    #[serde(default)]
    images: Option<HashMap<String, Option<String>>>,
}

impl ImagesResponse {
    pub fn parse(body: impl Into<String>) -> Result<Self> {
        let raw = body.into();
        let wire: ImagesWire = serde_json::from_str(&raw)?;
        Ok(Self {
            images: wire.images,
            raw,
        })
    }

    /// Rendering URL for a node id; `null` entries count as missing
    pub fn url_for(&self, id: &str) -> Option<&str> {
        self.images
            .as_ref()?
            .get(id)
            .and_then(|url| url.as_deref())
    }
}

/// The three remote calls the exporter makes
pub trait FigmaApi {
    /// Fetch the subtree rooted at `node_id`
    fn file_nodes(&self, file_key: &str, node_id: &str) -> Result<FileNodesResponse>;

    /// Request SVG rendering URLs for a batch of node ids
    fn svg_urls(&self, file_key: &str, ids: &[&str]) -> Result<ImagesResponse>;

    /// Download an asset from a pre-signed URL (no auth header)
    fn download(&self, url: &str) -> Result<String>;
}

/// Blocking reqwest client for the Figma API
pub struct FigmaClient {
    http: reqwest::blocking::Client,
    api_base: String,
    token: String,
}

impl FigmaClient {
    pub fn new(config: &ExportConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(format!("icon-sync/{}", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            api_base: config.api_base.clone(),
            token: config.access_token.clone(),
        })
    }

    fn nodes_url(&self, file_key: &str, node_id: &str) -> String {
        format!("{}/v1/files/{}/nodes?ids={}", self.api_base, file_key, node_id)
    }

    fn images_url(&self, file_key: &str, ids: &[&str]) -> String {
        format!(
            "{}/v1/images/{}?ids={}&format=svg",
            self.api_base,
            file_key,
            ids.join(",")
        )
    }
}

impl FigmaApi for FigmaClient {
    fn file_nodes(&self, file_key: &str, node_id: &str) -> Result<FileNodesResponse> {
        let url = self.nodes_url(file_key, node_id);
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header(TOKEN_HEADER, &self.token)
            .send()?;

        Ok(response.json()?)
    }

    fn svg_urls(&self, file_key: &str, ids: &[&str]) -> Result<ImagesResponse> {
        let url = self.images_url(file_key, ids);
        tracing::debug!("GET {}", url);

        let body = self
            .http
            .get(&url)
            .header(TOKEN_HEADER, &self.token)
            .send()?
            .text()?;

        ImagesResponse::parse(body)
    }

    fn download(&self, url: &str) -> Result<String> {
        Ok(self.http.get(url).send()?.text()?)
    }
}
