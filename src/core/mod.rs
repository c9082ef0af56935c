pub mod description;
pub mod dtype;

pub use description::{BlockDescription, CacheError, PortSpec};
pub use dtype::PortTag;
