pub mod param;
pub mod port;

pub use param::{LiveParam, ParamKind, ParamOrigin};
pub use port::{LivePort, PortDirection, PortId};

/// Services the enclosing flowgraph provides to its blocks
pub trait GraphContext {
    /// Identifier used to namespace generated module references
    fn graph_id(&self) -> &str;

    /// Sever every connection touching the given ports
    fn disconnect(&mut self, ports: &[PortId]);
}
