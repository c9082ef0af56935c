use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::core::BlockDescription;
use crate::eval::{evaluator_for, ExtractError};
use crate::graph::{GraphContext, LiveParam, LivePort, ParamKind, PortDirection};
use crate::reconcile::{update_params, update_ports};

use super::templates::BlockTemplates;

/// Parameter id of the intrinsic source-code parameter
pub const SOURCE_CODE_PARAM: &str = "_source_code";

/// Snippet a freshly placed embedded block starts out with
pub const DEFAULT_CODE: &str = r#"-- Embedded blocks:
--
-- Each time this source is applied, the editor instantiates the first
-- block table it finds to get the ports and parameters of your block.
-- Entries of `params` are the constructor arguments; all of them are
-- required to have default values!

blk = {}

blk.doc = "Embedded block example - a simple multiply const"

blk.params = {
    { id = "example_param", default = 1.0 },
}

function blk.new(args)
    local self = {
        name = "Embedded Block",
        in_sig = { "complex64" },
        out_sig = { "complex64" },
    }
    -- an argument stored under its own name stays settable after
    -- construction and gets a callback registered
    self.example_param = args.example_param

    function self.work(input_items, output_items)
        for i, sample in ipairs(input_items[1]) do
            output_items[1][i] = sample * self.example_param
        end
        return #output_items[1]
    end

    return self
end
"#;

/// Block-kind documentation shown until the first successful extraction
pub const DOC: &str = "\
This block represents an arbitrary scripted processing block.

Its source code can be accessed through the parameter 'Code' which opens \
your editor. Each time you save changes in the editor, the block is \
updated: the number, names and defaults of the parameters, the ports \
(stream and message) and the block name and documentation.

Block Documentation:
(will be replaced by the doc string of your block)
";

/// A live scripted block hosted by the flowgraph editor.
///
/// The editor calls `rewrite` after every parameter change and
/// `validate` before code generation. The io cache is an opaque blob the
/// host's save/load subsystem round-trips verbatim; it holds the last
/// good extraction so a broken edit never destroys the block's shape.
pub struct EmbeddedBlock {
    /// Block identifier inside the flowgraph
    pub name: String,
    /// Display label, refreshed from the last good extraction
    pub label: String,
    pub documentation: String,
    /// Namespaced module reference used by the code generator
    pub module_name: String,
    pub templates: BlockTemplates,
    language: &'static str,
    params: Vec<LiveParam>,
    sinks: Vec<LivePort>,
    sources: Vec<LivePort>,
    io_cache: String,
    reload_error: Option<String>,
}

impl EmbeddedBlock {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let source = LiveParam::intrinsic(SOURCE_CODE_PARAM, "Code", ParamKind::Code, DEFAULT_CODE);
        EmbeddedBlock {
            module_name: name.clone(),
            label: "Embedded Block".to_string(),
            documentation: DOC.to_string(),
            name,
            templates: BlockTemplates::default(),
            language: "lua",
            params: vec![source],
            sinks: Vec::new(),
            sources: Vec::new(),
            io_cache: String::new(),
            reload_error: None,
        }
    }

    /// Use a different evaluator language for this block
    pub fn with_language(mut self, language: &'static str) -> Self {
        self.language = language;
        self
    }

    pub fn params(&self) -> &[LiveParam] {
        &self.params
    }

    pub fn param(&self, id: &str) -> Option<&LiveParam> {
        self.params.iter().find(|param| param.id == id)
    }

    pub fn param_mut(&mut self, id: &str) -> Option<&mut LiveParam> {
        self.params.iter_mut().find(|param| param.id == id)
    }

    /// Set a parameter's value; returns false when the id is unknown
    pub fn set_param_value(&mut self, id: &str, value: impl Into<String>) -> bool {
        match self.param_mut(id) {
            Some(param) => {
                param.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Replace the block's source snippet
    pub fn set_source(&mut self, code: &str) {
        self.set_param_value(SOURCE_CODE_PARAM, code);
    }

    pub fn sinks(&self) -> &[LivePort] {
        &self.sinks
    }

    pub fn sources(&self) -> &[LivePort] {
        &self.sources
    }

    /// Opaque last-good-extraction blob for the host to persist
    pub fn io_cache(&self) -> &str {
        &self.io_cache
    }

    /// Restore the cache blob on load, before the first rewrite
    pub fn set_io_cache(&mut self, blob: impl Into<String>) {
        self.io_cache = blob.into();
    }

    pub fn reload_error(&self) -> Option<&str> {
        self.reload_error.as_deref()
    }

    pub fn is_valid(&self) -> bool {
        self.reload_error.is_none()
    }

    /// Re-extract the block's shape from its source parameter and fold
    /// the result into the live parameter and port lists.
    ///
    /// Extraction failures never escape: they are recorded on the block,
    /// the cached last-good description is applied instead, and with no
    /// usable cache the current shape is simply kept. `validate`
    /// surfaces the recorded failure.
    pub fn rewrite(&mut self, graph: &mut dyn GraphContext) {
        let source = self
            .param(SOURCE_CODE_PARAM)
            .map(|param| param.value.clone())
            .unwrap_or_default();
        let values: BTreeMap<String, String> = self
            .params
            .iter()
            .filter(|param| param.is_discovered())
            .map(|param| (param.id.clone(), param.value.clone()))
            .collect();

        let description = match self.extract(&source, &values) {
            Ok(description) => {
                self.reload_error = None;
                self.io_cache = description.to_cache_string();
                description
            }
            Err(error) => {
                warn!(block = %self.name, %error, "block extraction failed, falling back to cache");
                self.reload_error = Some(error.to_string());
                match BlockDescription::from_cache_str(&self.io_cache) {
                    Ok(description) => description,
                    // no usable cache yet: keep the current shape
                    Err(_) => return,
                }
            }
        };

        self.label = if description.display_name.is_empty() {
            description.class_id.clone()
        } else {
            description.display_name.clone()
        };
        self.documentation = description.doc.clone();
        self.module_name = format!("{}_{}", graph.graph_id(), self.name);
        self.templates = BlockTemplates::render(&self.module_name, &self.name, &description);

        update_params(&mut self.params, &description.params);
        update_ports(&mut self.sinks, &description.sinks, PortDirection::Sink, graph);
        update_ports(
            &mut self.sources,
            &description.sources,
            PortDirection::Source,
            graph,
        );
        debug!(
            block = %self.name,
            sinks = self.sinks.len(),
            sources = self.sources.len(),
            "block rewritten"
        );
    }

    fn extract(
        &self,
        source: &str,
        values: &BTreeMap<String, String>,
    ) -> Result<BlockDescription, ExtractError> {
        let evaluator = evaluator_for(self.language)
            .ok_or_else(|| ExtractError::Environment(self.language.to_string()))?;
        evaluator.extract(source, values)
    }

    /// Surface the recorded extraction failure on the source parameter.
    /// Clears messages left over from the previous validation pass.
    pub fn validate(&mut self) {
        for param in &mut self.params {
            param.error_messages.clear();
        }
        if let Some(error) = self.reload_error.clone() {
            if let Some(param) = self.param_mut(SOURCE_CODE_PARAM) {
                param.add_error_message(error);
            }
        }
    }
}
