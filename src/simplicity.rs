//! SimplicityHL backend
//!
//! Binds an artifact whose `source` is a SimplicityHL program. Constructor
//! arguments become `param::NAME` values and call arguments become
//! `witness::NAME` values, matched by parameter name.
//!
//! | ABI type      | Simplicity value              |
//! |---------------|-------------------------------|
//! | `int`, `u64`  | `u64`                         |
//! | `u8`..`u32`   | unsigned integer of that size |
//! | `u256`        | `u256` (integer or 32 bytes)  |
//! | `bool`        | `bool`                        |
//! | `bytes`       | `[u8; N]`                     |
//! | `int[N]`      | `[u64; N]`                    |
//! | `bool[N]`     | `[bool; N]`                   |
//!
//! Calls are always executed. Without a transaction context the program runs
//! against [`placeholder_env`].

use crate::artifact::{AbiEntry, AbiType, Artifact};
use crate::backend::{BackendResult, ScriptBackend, VerifyResult};
use crate::error::BackendError;
use crate::value::{parse_int, Arg};
use elements::hashes::Hash;
use elements::taproot::ControlBlock;
use elements::{
    confidential, AssetIssuance, BlockHash, LockTime, OutPoint, Script, Sequence, Transaction, TxIn,
    TxInWitness,
};
use num_bigint::{BigInt, Sign};
use simplicityhl::simplicity::jet::elements::{ElementsEnv, ElementsUtxo};
use simplicityhl::simplicity::Cmr;
use simplicityhl::str::WitnessName;
use simplicityhl::types::{ResolvedType, TypeConstructible};
use simplicityhl::value::ValueConstructible;
use simplicityhl::{Arguments, CompiledProgram, Parameters, TemplateProgram, Value, WitnessValues};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Backend compiling and satisfying SimplicityHL programs
#[derive(Debug, Clone, Copy, Default)]
pub struct SimplicityBackend;

/// A parsed program template together with its ABI
pub struct SimplicityClass {
    template: TemplateProgram,
    abi: Vec<AbiEntry>,
}

impl SimplicityClass {
    /// Get the parameters required by the program template
    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        self.template.parameters()
    }
}

/// A program instantiated with its constructor arguments
#[derive(Clone)]
pub struct SimplicityInstance {
    compiled: CompiledProgram,
}

impl SimplicityInstance {
    /// Get the commitment Merkle root (CMR) of the program
    #[must_use]
    pub fn cmr(&self) -> Cmr {
        self.compiled.commit().cmr()
    }

    /// Get the underlying compiled program
    #[must_use]
    pub const fn inner(&self) -> &CompiledProgram {
        &self.compiled
    }
}

/// Witness values for one call
#[derive(Clone)]
pub struct SimplicityUnlocking {
    method: String,
    witness: HashMap<WitnessName, Value>,
}

impl SimplicityUnlocking {
    /// Name of the called function
    #[must_use]
    pub fn method(&self) -> &str {
        &self.method
    }

    /// The witness values to satisfy the program with
    #[must_use]
    pub fn witness_values(&self) -> WitnessValues {
        WitnessValues::from(self.witness.clone())
    }
}

impl SimplicityBackend {
    /// Create a new backend
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn bind(entry: &str, abi: Option<&AbiEntry>, args: &[Arg]) -> BackendResult<HashMap<WitnessName, Value>> {
    let params = abi.map_or(&[][..], |entry| entry.params.as_slice());
    if params.len() != args.len() {
        return Err(BackendError::Arity {
            entry: entry.to_string(),
            expected: params.len(),
            got: args.len(),
        });
    }

    params
        .iter()
        .zip(args)
        .map(|(param, arg)| {
            let value = to_value(&param.ty, arg)?;
            Ok((WitnessName::from_str_unchecked(&param.name), value))
        })
        .collect()
}

fn unsupported(ty: &str, reason: impl Into<String>) -> BackendError {
    BackendError::Unsupported {
        ty: ty.to_string(),
        reason: reason.into(),
    }
}

fn to_int(ty: &str, arg: &Arg) -> BackendResult<BigInt> {
    match arg {
        Arg::Int(n) => Ok(n.clone()),
        Arg::Raw(value) => parse_int(value).ok_or_else(|| unsupported(ty, format!("`{arg}` is not an integer"))),
        other => Err(unsupported(ty, format!("`{other}` is not an integer"))),
    }
}

fn to_uint<T: TryFrom<BigInt>>(ty: &str, arg: &Arg) -> BackendResult<T> {
    let n = to_int(ty, arg)?;
    T::try_from(n).map_err(|_| unsupported(ty, format!("`{arg}` is out of range")))
}

fn to_u256(ty: &str, arg: &Arg) -> BackendResult<[u8; 32]> {
    let bytes = match arg {
        Arg::Bytes(hex) => hex::decode(hex).map_err(|e| unsupported(ty, e.to_string()))?,
        _ => match to_int(ty, arg)?.to_bytes_be() {
            (Sign::Minus, _) => return Err(unsupported(ty, "negative integer")),
            (_, bytes) => bytes,
        },
    };
    if bytes.len() > 32 {
        return Err(unsupported(ty, "more than 32 bytes"));
    }
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    Ok(out)
}

fn to_value(ty: &str, arg: &Arg) -> BackendResult<Value> {
    match ty {
        "int" | "u64" => Ok(Value::u64(to_uint(ty, arg)?)),
        "u32" => Ok(Value::u32(to_uint(ty, arg)?)),
        "u16" => Ok(Value::u16(to_uint(ty, arg)?)),
        "u8" => Ok(Value::u8(to_uint(ty, arg)?)),
        "u256" => Ok(Value::u256(simplicityhl::num::U256::from_byte_array(
            to_u256(ty, arg)?,
        ))),
        "bool" => match arg {
            Arg::Bool(b) => Ok(Value::from(*b)),
            other => Err(unsupported(ty, format!("`{other}` is not a boolean"))),
        },
        "bytes" => match arg {
            Arg::Bytes(hex) => {
                let bytes = hex::decode(hex).map_err(|e| unsupported(ty, e.to_string()))?;
                Ok(Value::byte_array(bytes))
            }
            other => Err(unsupported(ty, format!("`{other}` is not a byte string"))),
        },
        _ => {
            let abi_type = AbiType::parse(ty);
            if abi_type.is_array() {
                to_array(ty, &abi_type, arg)
            } else {
                Err(unsupported(ty, "no Simplicity equivalent"))
            }
        }
    }
}

fn element_type(elem: &str) -> Option<ResolvedType> {
    match elem {
        "int" => Some(ResolvedType::u64()),
        "bool" => Some(ResolvedType::boolean()),
        _ => None,
    }
}

fn to_array(ty: &str, abi_type: &AbiType, arg: &Arg) -> BackendResult<Value> {
    let elem_ty = element_type(&abi_type.elem)
        .ok_or_else(|| unsupported(ty, "element type has no Simplicity equivalent"))?;
    let Arg::Array(items) = arg else {
        return Err(unsupported(ty, format!("`{arg}` is not an array")));
    };
    if items.len() != abi_type.length {
        return Err(unsupported(
            ty,
            format!("expected {} elements, got {}", abi_type.length, items.len()),
        ));
    }

    let elements = items
        .iter()
        .map(|item| to_value(&abi_type.elem, item))
        .collect::<BackendResult<Vec<_>>>()?;
    Ok(Value::array(elements, elem_ty))
}

/// NUMS point used as the taproot internal key of the placeholder spend
const NUMS_KEY: &str = "50929b74c1a04954b78b4b6035e97a5e078a5a0f28ec96d547bfee9ace803ac0";

/// Spending environment of a one-input, no-output transaction
///
/// The spent output has an empty script and null asset and amount, and the
/// transaction has a zero lock time.
///
/// # Errors
///
/// Returns [`BackendError::Encode`] if the control block cannot be built.
pub fn placeholder_env(cmr: Cmr) -> BackendResult<ElementsEnv<Arc<Transaction>>> {
    let tx = Transaction {
        version: 2,
        lock_time: LockTime::ZERO,
        input: vec![TxIn {
            previous_output: OutPoint::default(),
            is_pegin: false,
            script_sig: Script::new(),
            sequence: Sequence::MAX,
            asset_issuance: AssetIssuance::null(),
            witness: TxInWitness::empty(),
        }],
        output: Vec::new(),
    };
    let utxo = ElementsUtxo {
        script_pubkey: Script::new(),
        asset: confidential::Asset::Null,
        value: confidential::Value::Null,
    };

    let mut control_block = vec![simplicityhl::simplicity::leaf_version().as_u8()];
    control_block.extend(hex::decode(NUMS_KEY).map_err(|e| BackendError::Encode(e.to_string()))?);
    let control_block =
        ControlBlock::from_slice(&control_block).map_err(|e| BackendError::Encode(e.to_string()))?;

    Ok(ElementsEnv::new(
        Arc::new(tx),
        vec![utxo],
        0,
        cmr,
        control_block,
        None,
        BlockHash::all_zeros(),
    ))
}

impl ScriptBackend for SimplicityBackend {
    type Class = SimplicityClass;
    type Instance = SimplicityInstance;
    type Unlocking = SimplicityUnlocking;
    type TxContext = ElementsEnv<Arc<Transaction>>;

    fn construct_class(&self, artifact: &Artifact) -> BackendResult<SimplicityClass> {
        let source = artifact.source.as_deref().ok_or(BackendError::MissingSource)?;
        let template = TemplateProgram::new(Arc::from(source)).map_err(BackendError::Compile)?;

        Ok(SimplicityClass {
            template,
            abi: artifact.abi.clone(),
        })
    }

    fn instantiate(&self, class: &SimplicityClass, args: &[Arg]) -> BackendResult<SimplicityInstance> {
        let constructor = class.abi.iter().find(|entry| !entry.is_function());
        let arguments = Arguments::from(bind("constructor", constructor, args)?);
        let compiled = class
            .template
            .instantiate(arguments, false)
            .map_err(BackendError::Compile)?;

        Ok(SimplicityInstance { compiled })
    }

    fn encode_call(
        &self,
        class: &SimplicityClass,
        _instance: &SimplicityInstance,
        method: &str,
        args: &[Arg],
    ) -> BackendResult<SimplicityUnlocking> {
        let function = class
            .abi
            .iter()
            .find(|entry| entry.is_function() && entry.name.as_deref() == Some(method))
            .ok_or_else(|| BackendError::UnknownEntry(method.to_string()))?;

        Ok(SimplicityUnlocking {
            method: method.to_string(),
            witness: bind(method, Some(function), args)?,
        })
    }

    fn verify_script(
        &self,
        _class: &SimplicityClass,
        instance: &SimplicityInstance,
        unlocking: &SimplicityUnlocking,
        tx_context: Option<&Self::TxContext>,
    ) -> BackendResult<VerifyResult> {
        let placeholder;
        let env = match tx_context {
            Some(env) => env,
            None => {
                placeholder = placeholder_env(instance.cmr())?;
                &placeholder
            }
        };
        // pruning executes the program
        let satisfied = instance
            .compiled
            .satisfy_with_env(unlocking.witness_values(), Some(env));

        match satisfied {
            Ok(program) => {
                let (program_bytes, witness_bytes) = program.redeem().to_vec_with_witness();
                debug!(
                    method = unlocking.method(),
                    program_len = program_bytes.len(),
                    witness_len = witness_bytes.len(),
                    placeholder_env = tx_context.is_none(),
                    "satisfied program"
                );
                Ok(VerifyResult::pass())
            }
            Err(e) => Ok(VerifyResult::fail(e)),
        }
    }
}
