pub mod embedded;
pub mod module;
pub mod templates;

pub use embedded::{EmbeddedBlock, DEFAULT_CODE, SOURCE_CODE_PARAM};
pub use module::{EmbeddedModule, DEFAULT_MODULE_CODE, MODULE_SOURCE_PARAM};
pub use templates::BlockTemplates;
