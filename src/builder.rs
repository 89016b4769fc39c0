//! Parameter building and offline contract instantiation

use crate::artifact::{AbiType, Artifact, ParamEntry, CONSTRUCTOR, MAX_ARRAY_LENGTH};
use crate::backend::ScriptBackend;
use crate::config::{ArrayCoercion, BuilderConfig};
use crate::data::{DataMap, EntryData};
use crate::error::{BackendError, BuildError};
use crate::value::{parse_int, Arg};
use serde_json::Value as Json;
use std::collections::BTreeMap;
use tracing::{debug, trace, warn};

/// Coerced arguments keyed by entry identifier, each in declaration order
pub type ParamsMap = BTreeMap<String, Vec<Arg>>;

/// A contract instance built without touching a network
pub struct OfflineInstance<B: ScriptBackend + ?Sized> {
    pub class: B::Class,
    pub instance: B::Instance,
    pub params: ParamsMap,
}

impl<B: ScriptBackend + ?Sized> OfflineInstance<B> {
    /// Coerced arguments of one entry; empty when the entry is unknown
    #[must_use]
    pub fn args(&self, entry: &str) -> &[Arg] {
        self.params.get(entry).map_or(&[][..], Vec::as_slice)
    }
}

/// Build a contract instance from an artifact and raw parameter data
///
/// Uses [`BuilderConfig::default`]. The constructor's coerced arguments are
/// passed to the backend by position.
///
/// # Errors
///
/// Returns an error if a parameter cannot be coerced or the backend rejects
/// the artifact or the constructor arguments.
pub fn build_offline_instance<B: ScriptBackend + ?Sized>(
    backend: &B,
    artifact: &Artifact,
    data: &DataMap,
) -> Result<OfflineInstance<B>, BuildError> {
    build_offline_instance_with(backend, artifact, data, &BuilderConfig::default())
}

/// Build a contract instance with explicit builder settings
///
/// # Errors
///
/// Returns an error if a parameter cannot be coerced or the backend rejects
/// the artifact or the constructor arguments.
pub fn build_offline_instance_with<B: ScriptBackend + ?Sized>(
    backend: &B,
    artifact: &Artifact,
    data: &DataMap,
    config: &BuilderConfig,
) -> Result<OfflineInstance<B>, BuildError> {
    let class = backend.construct_class(artifact)?;
    let params = build_params(backend, artifact, data, config)?;

    let constructor_args = params.get(CONSTRUCTOR).map_or(&[][..], Vec::as_slice);
    let instance = backend.instantiate(&class, constructor_args)?;
    debug!(
        contract = %artifact.contract,
        args = constructor_args.len(),
        "instantiated offline contract"
    );

    Ok(OfflineInstance {
        class,
        instance,
        params,
    })
}

/// Map raw data onto the ordered argument list of every ABI entry
///
/// Every entry gets a key. An entry with no supplied data keeps an empty
/// list; an entry with data gets one argument per declared parameter.
///
/// # Errors
///
/// Returns an error for a nameless function entry, a non-integer `int`
/// value, or invalid `bytes` data.
pub fn build_params<B: ScriptBackend + ?Sized>(
    backend: &B,
    artifact: &Artifact,
    data: &DataMap,
    config: &BuilderConfig,
) -> Result<ParamsMap, BuildError> {
    let mut params = ParamsMap::new();
    params.insert(CONSTRUCTOR.to_string(), Vec::new());

    for entry in &artifact.abi {
        let id = entry.identifier().ok_or(BuildError::MissingName)?;
        let args = params.entry(id.to_string()).or_default();

        let Some(entry_data) = data.entry(id) else {
            continue;
        };
        for param in &entry.params {
            args.push(coerce_param(backend, config, id, param, entry_data)?);
        }
        debug!(entry = id, args = args.len(), "built entry arguments");
    }

    Ok(params)
}

fn coerce_param<B: ScriptBackend + ?Sized>(
    backend: &B,
    config: &BuilderConfig,
    entry: &str,
    param: &ParamEntry,
    data: &EntryData,
) -> Result<Arg, BuildError> {
    // explicit null reads as an omitted parameter
    let supplied = data.get(&param.name).filter(|value| !value.is_null());

    let arg = match (param.ty.as_str(), supplied) {
        ("int", Some(value)) => coerce_int(entry, &param.name, value)?,
        ("int", None) => Arg::zero(),
        ("bytes", Some(value)) => {
            coerce_bytes(backend, value).map_err(|source| BuildError::InvalidBytes {
                entry: entry.to_string(),
                param: param.name.clone(),
                source,
            })?
        }
        ("bytes", None) => Arg::Bytes(String::new()),
        ("bool", Some(value)) => Arg::passthrough(value),
        ("bool", None) => Arg::Bool(false),
        (ty, supplied) => coerce_other(config, entry, &param.name, ty, supplied)?,
    };

    trace!(%entry, param = %param.name, ty = %param.ty, %arg, "coerced parameter");
    Ok(arg)
}

fn coerce_int(entry: &str, param: &str, value: &Json) -> Result<Arg, BuildError> {
    parse_int(value)
        .map(Arg::Int)
        .ok_or_else(|| BuildError::InvalidInt {
            entry: entry.to_string(),
            param: param.to_string(),
            value: value.clone(),
        })
}

fn coerce_bytes<B: ScriptBackend + ?Sized>(backend: &B, value: &Json) -> Result<Arg, BackendError> {
    match value {
        Json::String(s) => backend.validate_bytes(s).map(Arg::Bytes),
        Json::Array(items) => {
            let bytes = items
                .iter()
                .map(|item| {
                    item.as_u64()
                        .and_then(|b| u8::try_from(b).ok())
                        .ok_or_else(|| BackendError::InvalidHex(format!("`{item}` is not a byte")))
                })
                .collect::<Result<Vec<u8>, _>>()?;
            Ok(Arg::Bytes(hex::encode(bytes)))
        }
        other => Err(BackendError::InvalidHex(format!(
            "expected a hex string or byte array, got `{other}`"
        ))),
    }
}

/// Arrays and opaque scalar types
fn coerce_other(
    config: &BuilderConfig,
    entry: &str,
    param: &str,
    ty: &str,
    supplied: Option<&Json>,
) -> Result<Arg, BuildError> {
    let abi_type = AbiType::parse(ty);
    if !abi_type.is_array() {
        return Ok(supplied.map_or(Arg::Null, Arg::passthrough));
    }

    let length = abi_type.length;
    if length > MAX_ARRAY_LENGTH {
        return Err(BuildError::ArrayTooLong {
            entry: entry.to_string(),
            param: param.to_string(),
            length,
        });
    }
    match (config.array_coercion, supplied) {
        (mode, Some(Json::Array(items))) => {
            if items.len() > length {
                warn!(
                    %entry,
                    %param,
                    declared = length,
                    supplied = items.len(),
                    "truncating array argument"
                );
            }
            let kept = &items[..items.len().min(length)];
            match mode {
                ArrayCoercion::Truncate => Ok(Arg::Array(kept.iter().map(Arg::passthrough).collect())),
                ArrayCoercion::Coerce => {
                    let mut elements = kept
                        .iter()
                        .enumerate()
                        .map(|(i, item)| {
                            coerce_element(entry, &format!("{param}[{i}]"), &abi_type.elem, item)
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    pad_elements(&mut elements, &abi_type);
                    Ok(Arg::Array(elements))
                }
            }
        }
        (_, Some(value)) => Ok(Arg::passthrough(value)),
        (_, None) => Ok(Arg::Null),
    }
}

fn coerce_element(entry: &str, param: &str, elem: &str, value: &Json) -> Result<Arg, BuildError> {
    match elem {
        "int" => coerce_int(entry, param, value),
        _ => Ok(Arg::passthrough(value)),
    }
}

/// Scalar default for an element type; opaque types have none
fn element_default(elem: &str) -> Option<Arg> {
    match elem {
        "int" => Some(Arg::zero()),
        "bool" => Some(Arg::Bool(false)),
        "bytes" => Some(Arg::Bytes(String::new())),
        _ => None,
    }
}

fn pad_elements(elements: &mut Vec<Arg>, abi_type: &AbiType) {
    if let Some(default) = element_default(&abi_type.elem) {
        elements.resize(abi_type.length, default);
    }
}
