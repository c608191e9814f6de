//! Component classification
//!
//! Walks the fetched document and sorts icon variants into size buckets by
//! naming convention. The walk is best-effort: any node that does not fit
//! the expected shape is skipped, never reported as an error. Skips are
//! passed to an observer so callers can count or log them.

use crate::api::{Node, NodeType};
use crate::bucket::{ComponentRecord, IconBuckets, SizeBucket};
use crate::config::NamingConfig;
use tracing::{debug, info};

/// Why a node was left out of the result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Child of the root that is not the content frame
    NotContentFrame,
    /// Child of the content frame that is not a component set
    NotComponentSet,
    /// Component set whose size key names no bucket
    UnknownSizeKey(String),
    /// Child of a component set that is not a component
    NotComponent,
}

/// A skipped node
#[derive(Debug, Clone, Copy)]
pub struct Skip<'a> {
    pub reason: &'a SkipReason,
    pub node: &'a Node,
}

pub struct Classifier<'a> {
    naming: &'a NamingConfig,
}

impl<'a> Classifier<'a> {
    pub fn new(naming: &'a NamingConfig) -> Self {
        Self { naming }
    }

    /// Size key of a component set name
    pub fn size_key<'n>(&self, set_name: &'n str) -> &'n str {
        if set_name == self.naming.weather_label {
            return SizeBucket::Weather.name();
        }
        set_name
            .strip_prefix(self.naming.icon_prefix.as_str())
            .unwrap_or(set_name)
    }

    /// Variant name of a component name
    pub fn variant_name<'n>(&self, component_name: &'n str) -> &'n str {
        component_name
            .strip_prefix(self.naming.variant_prefix.as_str())
            .unwrap_or(component_name)
    }

    /// Classify, logging skips at debug level
    pub fn classify(&self, root: &Node) -> IconBuckets {
        self.classify_with(root, |skip| {
            debug!(
                "Skipped node '{}' ({}): {:?}",
                skip.node.name, skip.node.id, skip.reason
            );
        })
    }

    /// Classify, reporting every skipped node to `on_skip`
    pub fn classify_with<F>(&self, root: &Node, mut on_skip: F) -> IconBuckets
    where
        F: FnMut(Skip<'_>),
    {
        let mut buckets = IconBuckets::new();

        for child in &root.children {
            if !self.is_content_frame(child) {
                skip(&mut on_skip, SkipReason::NotContentFrame, child);
                continue;
            }

            for set in &child.children {
                if set.kind != NodeType::ComponentSet {
                    skip(&mut on_skip, SkipReason::NotComponentSet, set);
                    continue;
                }

                let key = self.size_key(&set.name);
                let Some(bucket) = SizeBucket::from_key(key) else {
                    skip(&mut on_skip, SkipReason::UnknownSizeKey(key.to_string()), set);
                    continue;
                };

                for variant in &set.children {
                    if variant.kind != NodeType::Component {
                        skip(&mut on_skip, SkipReason::NotComponent, variant);
                        continue;
                    }
                    buckets.push(
                        bucket,
                        ComponentRecord {
                            name: self.variant_name(&variant.name).to_string(),
                            id: variant.id.clone(),
                        },
                    );
                }

                info!("Found {} {} icons", buckets.get(bucket).len(), bucket);
            }
        }

        buckets
    }

    fn is_content_frame(&self, node: &Node) -> bool {
        node.kind == NodeType::Frame && node.name == self.naming.content_frame
    }
}

fn skip<F: FnMut(Skip<'_>)>(on_skip: &mut F, reason: SkipReason, node: &Node) {
    on_skip(Skip {
        reason: &reason,
        node,
    });
}
