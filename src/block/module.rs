use crate::graph::{GraphContext, LiveParam, ParamKind};

use super::templates::BlockTemplates;

/// Parameter id of the module's source-code parameter
pub const MODULE_SOURCE_PARAM: &str = "source_code";

/// Snippet a freshly placed embedded module starts out with
pub const DEFAULT_MODULE_CODE: &str = "-- this module will be required into your flowgraph\n";

/// Documentation shown for every embedded module
pub const MODULE_DOC: &str = "\
This block lets you embed a scripted module in your flowgraph.

Code you put in this module is accessible in other scripted blocks \
using the id of this block. Example:

If you put

    a = 2

    local function double(arg)
        return 2 * arg
    end

    return { a = a, double = double }

in a module with id 'stuff', you can use it elsewhere with

    stuff.a

or

    stuff.double(3)
";

/// A live scripted module hosted by the flowgraph editor.
///
/// Unlike an embedded block it contributes no ports and nothing is
/// extracted from its source: the module exists so other scripted
/// blocks can `require` shared definitions through this block's id.
pub struct EmbeddedModule {
    /// Module identifier inside the flowgraph, the name other blocks
    /// reference it by
    pub name: String,
    pub label: String,
    pub documentation: String,
    /// Namespaced module reference used by the code generator
    pub module_name: String,
    pub templates: BlockTemplates,
    params: Vec<LiveParam>,
}

impl EmbeddedModule {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let source = LiveParam::intrinsic(
            MODULE_SOURCE_PARAM,
            "Code",
            ParamKind::Code,
            DEFAULT_MODULE_CODE,
        );
        EmbeddedModule {
            module_name: name.clone(),
            label: "Embedded Module".to_string(),
            documentation: MODULE_DOC.to_string(),
            name,
            templates: BlockTemplates::default(),
            params: vec![source],
        }
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

    /// Replace the module's source snippet
    pub fn set_source(&mut self, code: &str) {
        if let Some(param) = self.param_mut(MODULE_SOURCE_PARAM) {
            param.value = code.to_string();
        }
    }

    pub fn source(&self) -> &str {
        self.param(MODULE_SOURCE_PARAM)
            .map(|param| param.value.as_str())
            .unwrap_or_default()
    }

    /// Refresh the generated module name and import template. There is
    /// no shape to reconcile, so this never fails and never touches the
    /// graph's wiring.
    pub fn rewrite(&mut self, graph: &dyn GraphContext) {
        self.module_name = format!("{}_{}", graph.graph_id(), self.name);
        self.templates = BlockTemplates {
            imports: format!(
                "local {} = require(\"{}\")  -- embedded module",
                self.name, self.module_name
            ),
            make: String::new(),
            callbacks: Vec::new(),
        };
    }
}
