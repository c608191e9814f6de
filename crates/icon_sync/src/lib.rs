//! Figma icon export
//!
//! Pulls icon components out of a Figma document and writes their SVGs to a
//! JSON bundle grouped by icon size.
//!
//! # Example
//!
//! ```ignore
//! use icon_sync::{run_export, ExportConfig};
//!
//! let config = ExportConfig::new("dY6cJ28An8Rmkp2QpPClLr", "221:911", token);
//! let summary = run_export(&config)?;
//! println!("{} icons", summary.total_icons());
//! ```

mod api;
mod bucket;
mod classify;
mod config;
mod error;
mod export;
mod output;

pub use api::{
    FigmaApi, FigmaClient, FileNodesResponse, ImagesResponse, Node, NodeEntry, NodeType,
    TOKEN_HEADER,
};
pub use bucket::{ComponentRecord, IconBuckets, SizeBucket};
pub use classify::{Classifier, Skip, SkipReason};
pub use config::{ExportConfig, NamingConfig, DEFAULT_API_BASE, DEFAULT_OUTPUT};
pub use error::{IconSyncError, Result};
pub use export::{list_icons, run_export, ExportReport, ExportSummary, Exporter};
pub use output::{write_icons_data, IconsData, OutputRecord};
