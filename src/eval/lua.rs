use std::collections::BTreeMap;

use rlua::{Function, Lua, Table, Value};
use tracing::debug;

use crate::core::{BlockDescription, PortSpec, PortTag};

use super::registry::EvaluatorRegistration;
use super::{BlockEvaluator, ExtractError};

/// Reserved message-port name, never exposed as a user port
const SYSTEM_PORT: &str = "system";

/// Lua implementation of the block-evaluation capability.
///
/// Every extraction runs the snippet in a fresh interpreter state and
/// scans the top-level bindings for a block class: a table carrying a
/// `new` constructor and a `params` signature list. The
/// instance returned by `new` declares the block's shape through its
/// `name`, `in_sig`/`out_sig`, `msg_in`/`msg_out` and `work` fields.
pub struct LuaEvaluator;

impl LuaEvaluator {
    pub fn new() -> Self {
        LuaEvaluator
    }
}

impl Default for LuaEvaluator {
    fn default() -> Self {
        LuaEvaluator::new()
    }
}

fn make_lua_evaluator() -> Box<dyn BlockEvaluator> {
    Box::new(LuaEvaluator::new())
}

inventory::submit! {
    EvaluatorRegistration { language: "lua", factory: make_lua_evaluator }
}

impl BlockEvaluator for LuaEvaluator {
    fn language(&self) -> &'static str {
        "lua"
    }

    fn extract(
        &self,
        source: &str,
        param_values: &BTreeMap<String, String>,
    ) -> Result<BlockDescription, ExtractError> {
        let lua = Lua::new();
        extract_in(&lua, source, param_values)
    }
}

fn extract_in(
    lua: &Lua,
    source: &str,
    param_values: &BTreeMap<String, String>,
) -> Result<BlockDescription, ExtractError> {
    let globals = lua.globals();

    lua.load(source)
        .exec()
        .map_err(|e| ExtractError::Source(e.to_string()))?;

    let (class_id, cls) = find_block_class(&globals)?;
    let signature = read_signature(&cls)?;
    debug!(class = %class_id, params = signature.len(), "found block class");

    // Constructor arguments: supplied values override declared defaults;
    // values for parameters no longer in the signature are dropped.
    let args = lua.create_table().map_err(lua_runtime_error)?;
    for entry in &signature {
        let value = match param_values.get(&entry.id) {
            Some(expr) => lua
                .load(format!("return {}", expr))
                .eval::<Value>()
                .map_err(|e| {
                    ExtractError::Instantiation(format!("bad value for {:?}: {}", entry.id, e))
                })?,
            None => entry.default.clone(),
        };
        args.set(entry.id.as_str(), value)
            .map_err(lua_runtime_error)?;
    }

    let constructor: Function = cls.get("new").map_err(lua_runtime_error)?;
    let instance: Table = constructor
        .call(args)
        .map_err(|e| ExtractError::Instantiation(e.to_string()))?;
    if !has_own_function(&instance, "work") {
        return Err(ExtractError::Instantiation(
            "block instance has no work function".into(),
        ));
    }

    let display_name = string_field(&instance, "name")?.unwrap_or_default();
    let doc = match string_field(&cls, "doc")? {
        Some(doc) => doc,
        None => string_field(&instance, "doc")?.unwrap_or_default(),
    };

    let sinks = ports(
        stream_signature(&instance, "in_sig")?,
        message_names(&instance, "msg_in")?,
    )?;
    let sources = ports(
        stream_signature(&instance, "out_sig")?,
        message_names(&instance, "msg_out")?,
    )?;

    // A constructor argument is callback-eligible when the instance
    // stored it under its own name, i.e. it stays settable after
    // construction. Reported in declaration order.
    let callbacks = signature
        .iter()
        .filter(|entry| has_own_field(&instance, &entry.id))
        .map(|entry| entry.id.clone())
        .collect();

    let params = signature
        .into_iter()
        .map(|entry| (entry.id, entry.default_repr))
        .collect();

    Ok(BlockDescription {
        display_name,
        class_id,
        params,
        sinks,
        sources,
        doc,
        callbacks,
    })
}

/// One declared constructor parameter
struct SignatureEntry<'lua> {
    id: String,
    default: Value<'lua>,
    default_repr: String,
}

/// Scan every top-level binding for block-class candidates. None of the
/// interpreter's own library tables carry a `new` constructor, so the
/// scan also finds a block bound over a library name such as `table`.
/// When several candidates exist, the lexicographically smallest
/// binding name wins so the choice does not depend on table iteration
/// order.
fn find_block_class<'lua>(globals: &Table<'lua>) -> Result<(String, Table<'lua>), ExtractError> {
    let mut candidates: Vec<(String, Table)> = Vec::new();
    for pair in globals.clone().pairs::<Value, Value>() {
        let (key, value) = pair.map_err(lua_runtime_error)?;
        let (Value::String(key), Value::Table(table)) = (key, value) else {
            continue;
        };
        let Ok(name) = key.to_str() else { continue };
        // _G references the global environment itself, which would look
        // like a class whenever the snippet defines top-level `new` and
        // `params` bindings
        if name == "_G" {
            continue;
        }
        if is_block_class(&table) {
            candidates.push((name.to_string(), table));
        }
    }
    candidates.sort_by(|a, b| a.0.cmp(&b.0));
    candidates
        .into_iter()
        .next()
        .ok_or(ExtractError::DefinitionNotFound)
}

fn is_block_class(table: &Table) -> bool {
    let has_new = matches!(table.get::<_, Value>("new"), Ok(Value::Function(_)));
    let has_params = matches!(table.get::<_, Value>("params"), Ok(Value::Table(_)));
    has_new && has_params
}

fn read_signature<'lua>(cls: &Table<'lua>) -> Result<Vec<SignatureEntry<'lua>>, ExtractError> {
    let params: Table = cls.get("params").map_err(lua_runtime_error)?;
    let mut signature = Vec::new();
    for entry in params.sequence_values::<Value>() {
        let entry = entry.map_err(lua_runtime_error)?;
        let Value::Table(entry) = entry else {
            return Err(ExtractError::Signature(
                "params entries must be tables".into(),
            ));
        };
        let id = match entry.get::<_, Value>("id") {
            Ok(Value::String(id)) => id
                .to_str()
                .map_err(lua_runtime_error)?
                .to_string(),
            _ => {
                return Err(ExtractError::Signature(
                    "param entry without a string id".into(),
                ))
            }
        };
        let default: Value = entry.get("default").map_err(lua_runtime_error)?;
        // The editor only ever instantiates by name and default, so a
        // parameter without a default is unusable.
        if matches!(default, Value::Nil) {
            return Err(ExtractError::Signature(format!(
                "parameter {:?} has no default value",
                id
            )));
        }
        let default_repr = lua_repr(&default);
        signature.push(SignatureEntry {
            id,
            default,
            default_repr,
        });
    }
    Ok(signature)
}

fn stream_signature(instance: &Table, field: &str) -> Result<Vec<(String, u32)>, ExtractError> {
    let mut declared = Vec::new();
    let sig: Value = instance.get(field).map_err(lua_runtime_error)?;
    let sig = match sig {
        Value::Table(sig) => sig,
        // no signature field means no stream ports on that side
        Value::Nil => return Ok(declared),
        other => {
            return Err(ExtractError::Signature(format!(
                "{} must be a sequence, got {}",
                field,
                other.type_name()
            )))
        }
    };
    for entry in sig.sequence_values::<Value>() {
        let entry = entry.map_err(lua_runtime_error)?;
        match entry {
            Value::String(dtype) => {
                let dtype = dtype.to_str().map_err(lua_runtime_error)?.to_string();
                declared.push((dtype, 1));
            }
            Value::Table(entry) => {
                let dtype = string_field(&entry, "dtype")?.ok_or_else(|| {
                    ExtractError::Signature(format!("{} entry without a dtype", field))
                })?;
                let vlen = vlen_field(&entry, field)?;
                declared.push((dtype, vlen));
            }
            other => {
                return Err(ExtractError::Signature(format!(
                    "{} entries must be dtype names or tables, got {}",
                    field,
                    other.type_name()
                )))
            }
        }
    }
    Ok(declared)
}

fn vlen_field(entry: &Table, field: &str) -> Result<u32, ExtractError> {
    match entry.get::<_, Value>("vlen").map_err(lua_runtime_error)? {
        Value::Nil => Ok(1),
        Value::Integer(vlen) if vlen >= 1 && vlen <= u32::MAX as i64 => Ok(vlen as u32),
        Value::Number(vlen) if vlen >= 1.0 && vlen <= u32::MAX as f64 && vlen.fract() == 0.0 => {
            Ok(vlen as u32)
        }
        _ => Err(ExtractError::Signature(format!(
            "{} vlen must be an integer >= 1",
            field
        ))),
    }
}

fn message_names(instance: &Table, field: &str) -> Result<Vec<String>, ExtractError> {
    let mut names = Vec::new();
    let value: Value = instance.get(field).map_err(lua_runtime_error)?;
    let table = match value {
        Value::Table(table) => table,
        Value::Nil => return Ok(names),
        other => {
            return Err(ExtractError::Signature(format!(
                "{} must be a sequence of names, got {}",
                field,
                other.type_name()
            )))
        }
    };
    for name in table.sequence_values::<String>() {
        names.push(name.map_err(|_| {
            ExtractError::Signature(format!("{} entries must be strings", field))
        })?);
    }
    Ok(names)
}

fn ports(streams: Vec<(String, u32)>, messages: Vec<String>) -> Result<Vec<PortSpec>, ExtractError> {
    let mut specs = Vec::new();
    for (index, (dtype, vlen)) in streams.into_iter().enumerate() {
        let tag = PortTag::from_dtype(&dtype).ok_or(ExtractError::TypeMapping(dtype))?;
        specs.push(PortSpec::stream(index, tag, vlen));
    }
    for name in messages {
        if name == SYSTEM_PORT {
            continue;
        }
        specs.push(PortSpec::message(name));
    }
    Ok(specs)
}

fn string_field(table: &Table, field: &str) -> Result<Option<String>, ExtractError> {
    match table.get::<_, Value>(field).map_err(lua_runtime_error)? {
        Value::String(value) => Ok(Some(
            value.to_str().map_err(lua_runtime_error)?.to_string(),
        )),
        _ => Ok(None),
    }
}

fn has_own_field(table: &Table, field: &str) -> bool {
    !matches!(table.raw_get::<_, Value>(field), Ok(Value::Nil) | Err(_))
}

fn has_own_function(table: &Table, field: &str) -> bool {
    matches!(table.raw_get::<_, Value>(field), Ok(Value::Function(_)))
}

/// Render a default value the way a user would have written it
fn lua_repr(value: &Value) -> String {
    match value {
        Value::Nil => "nil".to_string(),
        Value::Boolean(value) => value.to_string(),
        Value::Integer(value) => value.to_string(),
        Value::Number(value) => {
            if value.fract() == 0.0 && value.is_finite() {
                format!("{:.1}", value)
            } else {
                value.to_string()
            }
        }
        Value::String(value) => match value.to_str() {
            Ok(value) => format!("{:?}", value),
            Err(_) => "\"\"".to_string(),
        },
        other => format!("<{}>", other.type_name()),
    }
}

fn lua_runtime_error(error: rlua::Error) -> ExtractError {
    ExtractError::Source(error.to_string())
}
