use std::sync::atomic::{AtomicU64, Ordering};

use crate::core::{PortSpec, PortTag};

/// Identity-stable handle for a live port.
///
/// Connections reference ports by id, so reusing a port object across a
/// reconciliation keeps its wiring intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortId(u64);

static NEXT_PORT_ID: AtomicU64 = AtomicU64::new(1);

impl PortId {
    fn next() -> Self {
        PortId(NEXT_PORT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDirection {
    Sink,
    Source,
}

impl PortDirection {
    /// Label used when generating stream-port names
    pub fn label(&self) -> &'static str {
        match self {
            PortDirection::Sink => "in",
            PortDirection::Source => "out",
        }
    }
}

/// A typed connection point owned by a live block
#[derive(Debug, Clone)]
pub struct LivePort {
    pub id: PortId,
    pub key: String,
    pub name: String,
    pub tag: PortTag,
    pub width: u32,
    pub direction: PortDirection,
    pub optional: bool,
}

impl LivePort {
    /// Synthesize a port for a spec the existing port list can't satisfy
    pub fn from_spec(direction: PortDirection, spec: &PortSpec) -> Self {
        let (name, optional) = if spec.tag == PortTag::Message {
            (spec.key.clone(), true)
        } else {
            (format!("{}{}", direction.label(), spec.key), false)
        };
        LivePort {
            id: PortId::next(),
            key: spec.key.clone(),
            name,
            tag: spec.tag,
            width: spec.width,
            direction,
            optional,
        }
    }

    /// True when this port can stand in for the given spec without
    /// rewiring: tag and width match exactly, and either the spec is a
    /// positional stream port (identity by position) or the keys are
    /// equal (message ports match by name).
    pub fn satisfies(&self, spec: &PortSpec) -> bool {
        self.tag == spec.tag
            && self.width == spec.width
            && (spec.is_positional() || self.key == spec.key)
    }
}
