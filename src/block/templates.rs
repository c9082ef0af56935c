use crate::core::BlockDescription;

/// Code-generation template strings for one embedded block, consumed by
/// the downstream flowgraph code generator. `${ id }` marks a
/// parameter-value substitution point.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockTemplates {
    /// Import statement binding the block's generated module
    pub imports: String,
    /// Construction call with one placeholder per parameter
    pub make: String,
    /// One assignment template per callback-eligible attribute
    pub callbacks: Vec<String>,
}

impl BlockTemplates {
    pub fn render(module_name: &str, block_name: &str, description: &BlockDescription) -> Self {
        let args = description
            .params
            .iter()
            .map(|(id, _)| format!("{0} = ${{ {0} }}", id))
            .collect::<Vec<_>>()
            .join(", ");
        let args = if args.is_empty() {
            "{}".to_string()
        } else {
            format!("{{ {} }}", args)
        };
        BlockTemplates {
            imports: format!(
                "local {} = require(\"{}\")  -- embedded block",
                block_name, module_name
            ),
            make: format!("{}.{}.new({})", block_name, description.class_id, args),
            callbacks: description
                .callbacks
                .iter()
                .map(|attr| format!("{0} = ${{ {0} }}", attr))
                .collect(),
        }
    }
}
