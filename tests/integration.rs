//! Integration tests for preflight

use preflight::backend::BackendResult;
use preflight::{
    build_offline_instance, offline_verify, Arg, ArrayCoercion, Artifact, BackendError, BigInt,
    BuildError, BuilderConfig, DataMap, OfflineVerifier, ScriptBackend, VerifyError, VerifyResult,
    CONSTRUCTOR,
};
use serde_json::json;

const COUNTER_ARTIFACT: &str = r#"{
    "contract": "Counter",
    "abi": [
        { "type": "constructor", "params": [{ "name": "count", "type": "int" }, { "name": "owner", "type": "bytes" }] },
        { "type": "function", "name": "increment", "params": [{ "name": "next", "type": "int" }] },
        { "type": "function", "name": "reset", "params": [{ "name": "slots", "type": "int[3]" }] },
        { "type": "function", "name": "timelock", "params": [{ "name": "after", "type": "int" }] },
        { "type": "function", "name": "noop", "params": [] }
    ]
}"#;

/// Interprets the counter contract directly
struct CounterBackend;

struct Counter {
    count: BigInt,
}

struct Call {
    method: String,
    args: Vec<Arg>,
}

struct Tx {
    lock_time: u32,
}

impl ScriptBackend for CounterBackend {
    type Class = Artifact;
    type Instance = Counter;
    type Unlocking = Call;
    type TxContext = Tx;

    fn construct_class(&self, artifact: &Artifact) -> BackendResult<Artifact> {
        Ok(artifact.clone())
    }

    fn instantiate(&self, _class: &Artifact, args: &[Arg]) -> BackendResult<Counter> {
        match args {
            [Arg::Int(count), Arg::Bytes(_)] => Ok(Counter {
                count: count.clone(),
            }),
            _ => Err(BackendError::Arity {
                entry: CONSTRUCTOR.to_string(),
                expected: 2,
                got: args.len(),
            }),
        }
    }

    fn encode_call(
        &self,
        class: &Artifact,
        _instance: &Counter,
        method: &str,
        args: &[Arg],
    ) -> BackendResult<Call> {
        let function = class
            .function(method)
            .ok_or_else(|| BackendError::UnknownEntry(method.to_string()))?;
        if function.params.len() != args.len() {
            return Err(BackendError::Encode(format!("bad arity for {method}")));
        }
        Ok(Call {
            method: method.to_string(),
            args: args.to_vec(),
        })
    }

    fn verify_script(
        &self,
        _class: &Artifact,
        instance: &Counter,
        unlocking: &Call,
        tx_context: Option<&Tx>,
    ) -> BackendResult<VerifyResult> {
        let ok = match (unlocking.method.as_str(), unlocking.args.as_slice()) {
            ("increment", [Arg::Int(next)]) => *next == instance.count.clone() + 1u32,
            ("reset", [Arg::Array(slots)]) => {
                slots.len() == 3 && slots.iter().all(|slot| *slot == Arg::zero())
            }
            ("timelock", [Arg::Int(after)]) => {
                tx_context.is_some_and(|tx| BigInt::from(tx.lock_time) >= *after)
            }
            ("noop", []) => true,
            _ => false,
        };
        Ok(if ok {
            VerifyResult::pass()
        } else {
            VerifyResult::fail(format!("{} failed", unlocking.method))
        })
    }
}

fn counter() -> Artifact {
    Artifact::from_json(COUNTER_ARTIFACT).unwrap()
}

fn counter_data(count: i64) -> DataMap {
    DataMap::new()
        .with(CONSTRUCTOR, "count", json!(count))
        .with(CONSTRUCTOR, "owner", json!("00ff"))
}

#[test]
fn test_increment_lifecycle() {
    let data = counter_data(41).with("increment", "next", json!(42));
    let result = offline_verify(&CounterBackend, &counter(), &data, "increment", None).unwrap();
    assert!(result.success);

    let data = counter_data(41).with("increment", "next", json!(43));
    let result = offline_verify(&CounterBackend, &counter(), &data, "increment", None).unwrap();
    assert!(!result.success);
    assert_eq!(result.error.as_deref(), Some("increment failed"));
}

#[test]
fn test_big_integer_arguments() {
    let data = DataMap::new()
        .with(CONSTRUCTOR, "count", json!("99999999999999999999999999"))
        .with(CONSTRUCTOR, "owner", json!(""))
        .with("increment", "next", json!("100000000000000000000000000"));
    let result = offline_verify(&CounterBackend, &counter(), &data, "increment", None).unwrap();
    assert!(result.success);
}

#[test]
fn test_omitted_int_defaults_to_zero() {
    // an empty constructor entry still yields both arguments
    let data = DataMap::new()
        .with_entry(CONSTRUCTOR)
        .with("increment", "next", json!(1));
    let result = offline_verify(&CounterBackend, &counter(), &data, "increment", None).unwrap();
    assert!(result.success);
}

#[test]
fn test_padded_array_argument() {
    let data = counter_data(0).with("reset", "slots", json!([0]));
    let result = offline_verify(&CounterBackend, &counter(), &data, "reset", None).unwrap();
    assert!(result.success);

    // truncation alone leaves a short, uncoerced array
    let verifier = OfflineVerifier::new(CounterBackend)
        .config(BuilderConfig::default().with_array_coercion(ArrayCoercion::Truncate));
    let result = verifier.verify(&counter(), &data, "reset", None).unwrap();
    assert!(!result.success);
}

#[test]
fn test_absent_array_argument() {
    let data = counter_data(0).with_entry("reset");
    let built = build_offline_instance(&CounterBackend, &counter(), &data).unwrap();
    assert_eq!(built.args("reset"), &[Arg::Null]);

    let result = offline_verify(&CounterBackend, &counter(), &data, "reset", None).unwrap();
    assert!(!result.success);
}

#[test]
fn test_transaction_context() {
    let data = counter_data(0).with("timelock", "after", json!(1000));

    let early = Tx { lock_time: 999 };
    let late = Tx { lock_time: 1000 };
    let artifact = counter();

    assert!(!offline_verify(&CounterBackend, &artifact, &data, "timelock", Some(&early)).unwrap().success);
    assert!(offline_verify(&CounterBackend, &artifact, &data, "timelock", Some(&late)).unwrap().success);
    assert!(!offline_verify(&CounterBackend, &artifact, &data, "timelock", None).unwrap().success);
}

#[test]
fn test_method_without_arguments() {
    let result = offline_verify(&CounterBackend, &counter(), &counter_data(0), "noop", None).unwrap();
    assert!(result.success);
}

#[test]
fn test_unknown_method() {
    let result = offline_verify(&CounterBackend, &counter(), &DataMap::new(), "anyMethod", None);
    assert!(matches!(result, Err(VerifyError::UnknownMethod(_))));
}

#[test]
fn test_invalid_owner_bytes() {
    let data = DataMap::new()
        .with(CONSTRUCTOR, "count", json!(1))
        .with(CONSTRUCTOR, "owner", json!("zz"));
    let result = build_offline_instance(&CounterBackend, &counter(), &data);
    assert!(matches!(result, Err(BuildError::InvalidBytes { .. })));
}

#[test]
fn test_result_matches_backend_oracle() {
    let artifact = counter();
    let data = counter_data(7).with("increment", "next", json!(8));

    let built = build_offline_instance(&CounterBackend, &artifact, &data).unwrap();
    let call = CounterBackend
        .encode_call(&built.class, &built.instance, "increment", built.args("increment"))
        .unwrap();
    let oracle = CounterBackend
        .verify_script(&built.class, &built.instance, &call, None)
        .unwrap();

    let result = offline_verify(&CounterBackend, &artifact, &data, "increment", None).unwrap();
    assert_eq!(result, oracle);
}

#[test]
fn test_params_map_covers_every_entry() {
    let built = build_offline_instance(&CounterBackend, &counter(), &counter_data(3)).unwrap();

    assert_eq!(built.params.len(), 5);
    assert_eq!(
        built.args(CONSTRUCTOR),
        &[Arg::from(3), Arg::Bytes("00ff".into())]
    );
    assert!(built.args("increment").is_empty());
}
