use serde::{Deserialize, Serialize};

use super::dtype::PortTag;

/// Error type for io-cache blob decoding
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache blob is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed cache blob: {0}")]
    Malformed(String),
}

/// Declarative description of one port, independent of any live port object.
///
/// Stream ports are keyed by their positional index rendered as a string;
/// message ports are keyed by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortSpec {
    pub key: String,
    pub tag: PortTag,
    pub width: u32,
}

impl PortSpec {
    pub fn stream(index: usize, tag: PortTag, width: u32) -> Self {
        PortSpec {
            key: index.to_string(),
            tag,
            width,
        }
    }

    pub fn message(name: impl Into<String>) -> Self {
        PortSpec {
            key: name.into(),
            tag: PortTag::Message,
            width: 1,
        }
    }

    /// True when the key is a positional stream index
    pub fn is_positional(&self) -> bool {
        !self.key.is_empty() && self.key.bytes().all(|b| b.is_ascii_digit())
    }
}

/// Immutable result of extracting a block's shape from its source definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockDescription {
    pub display_name: String,
    pub class_id: String,
    /// (id, repr-of-default) pairs in declaration order
    pub params: Vec<(String, String)>,
    pub sinks: Vec<PortSpec>,
    pub sources: Vec<PortSpec>,
    pub doc: String,
    pub callbacks: Vec<String>,
}

/// Wire form of one port in the cache blob: (key, tag, width)
#[derive(Serialize, Deserialize)]
struct CachePort(String, String, u32);

/// Wire form of the cache blob: the description's positional tuple
/// fields. The callbacks field is defaulted so blobs written before it
/// existed still load.
#[derive(Serialize, Deserialize)]
struct CacheRecord(
    String,
    String,
    Vec<(String, String)>,
    Vec<CachePort>,
    Vec<CachePort>,
    String,
    #[serde(default)] Vec<String>,
);

impl BlockDescription {
    /// Serialize the description's tuple fields into the opaque cache
    /// blob the host persists alongside the block.
    pub fn to_cache_string(&self) -> String {
        let record = CacheRecord(
            self.display_name.clone(),
            self.class_id.clone(),
            self.params.clone(),
            cache_ports(&self.sinks),
            cache_ports(&self.sources),
            self.doc.clone(),
            self.callbacks.clone(),
        );
        // serialization of plain data cannot fail; an empty blob just
        // means no fallback is available
        serde_json::to_string(&record).unwrap_or_default()
    }

    /// Rebuild a description from a cache blob.
    ///
    /// Accepts both the current 7-field form and the older 6-field form
    /// written before callbacks were cached.
    pub fn from_cache_str(blob: &str) -> Result<BlockDescription, CacheError> {
        let CacheRecord(display_name, class_id, params, sinks, sources, doc, callbacks) =
            serde_json::from_str(blob)?;
        Ok(BlockDescription {
            display_name,
            class_id,
            params,
            sinks: restore_ports(sinks)?,
            sources: restore_ports(sources)?,
            doc,
            callbacks,
        })
    }
}

fn cache_ports(ports: &[PortSpec]) -> Vec<CachePort> {
    ports
        .iter()
        .map(|port| CachePort(port.key.clone(), port.tag.as_str().to_string(), port.width))
        .collect()
}

fn restore_ports(ports: Vec<CachePort>) -> Result<Vec<PortSpec>, CacheError> {
    ports
        .into_iter()
        .map(|CachePort(key, tag, width)| {
            let tag = PortTag::parse(&tag)
                .ok_or_else(|| CacheError::Malformed(format!("unknown port tag {:?}", tag)))?;
            if width < 1 {
                return Err(CacheError::Malformed(format!(
                    "port {:?} has width {}",
                    key, width
                )));
            }
            Ok(PortSpec { key, tag, width })
        })
        .collect()
}
