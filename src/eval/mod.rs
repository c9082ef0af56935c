pub mod lua;
pub mod registry;

pub use lua::LuaEvaluator;
pub use registry::{evaluator_for, list_languages, EvaluatorRegistration};

use std::collections::BTreeMap;

use crate::core::BlockDescription;

/// Error type for block extraction
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("can't interpret source code: {0}")]
    Source(String),

    #[error("no block definition found in source code")]
    DefinitionNotFound,

    #[error("bad block signature: {0}")]
    Signature(String),

    #[error("can't create an instance of your block: {0}")]
    Instantiation(String),

    #[error("can't map {0:?} to a port type")]
    TypeMapping(String),

    #[error("no evaluator available for language {0:?}")]
    Environment(String),
}

/// Script-evaluation capability: runs a block-definition snippet,
/// instantiates the block it defines with the given parameter values and
/// reports the declared shape.
///
/// Execution is unsandboxed and blocking; a pathological snippet can hang
/// the calling thread.
pub trait BlockEvaluator: Send + Sync {
    /// Language id this evaluator handles, e.g. "lua"
    fn language(&self) -> &'static str;

    /// Extract a block description from source text.
    ///
    /// `param_values` maps parameter ids to value expressions in the
    /// evaluator's language; values for parameters the source no longer
    /// declares are silently dropped.
    fn extract(
        &self,
        source: &str,
        param_values: &BTreeMap<String, String>,
    ) -> Result<BlockDescription, ExtractError>;
}
