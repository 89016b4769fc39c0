//! Mock ScriptBackend implementation for testing

#![cfg(test)]

use crate::artifact::Artifact;
use crate::backend::{BackendResult, ScriptBackend, VerifyResult};
use crate::error::BackendError;
use crate::value::Arg;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock backend whose locking conditions are a table of accepted calls
#[derive(Clone)]
pub struct MockBackend {
    inner: Arc<Mutex<MockBackendInner>>,
}

struct MockBackendInner {
    accepted: HashMap<String, Vec<Arg>>,
    min_lock_time: Option<u32>,
    instantiations: u32,
    encoded: Vec<String>,
}

pub struct MockClass {
    pub artifact: Artifact,
}

pub struct MockInstance {
    pub args: Vec<Arg>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockUnlocking {
    pub method: String,
    pub args: Vec<Arg>,
    pub script: String,
}

/// Transaction context carrying only a lock time
pub struct MockTx {
    pub lock_time: u32,
}

impl MockBackend {
    /// Create a new mock backend that accepts nothing
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockBackendInner {
                accepted: HashMap::new(),
                min_lock_time: None,
                instantiations: 0,
                encoded: Vec::new(),
            })),
        }
    }

    /// Accept calls to `method` with exactly these arguments
    pub fn accept(&self, method: &str, args: Vec<Arg>) {
        let mut inner = self.inner.lock().unwrap();
        inner.accepted.insert(method.to_string(), args);
    }

    /// Require a transaction context with at least this lock time
    pub fn require_lock_time(&self, lock_time: u32) {
        self.inner.lock().unwrap().min_lock_time = Some(lock_time);
    }

    /// Number of instances built so far
    #[must_use]
    pub fn instantiations(&self) -> u32 {
        self.inner.lock().unwrap().instantiations
    }

    /// Scripts produced by `encode_call`, oldest first
    #[must_use]
    pub fn encoded_calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().encoded.clone()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn check_arity(entry: &str, expected: usize, args: &[Arg]) -> BackendResult<()> {
    if expected == args.len() {
        Ok(())
    } else {
        Err(BackendError::Arity {
            entry: entry.to_string(),
            expected,
            got: args.len(),
        })
    }
}

impl ScriptBackend for MockBackend {
    type Class = MockClass;
    type Instance = MockInstance;
    type Unlocking = MockUnlocking;
    type TxContext = MockTx;

    fn construct_class(&self, artifact: &Artifact) -> BackendResult<MockClass> {
        Ok(MockClass {
            artifact: artifact.clone(),
        })
    }

    fn instantiate(&self, class: &MockClass, args: &[Arg]) -> BackendResult<MockInstance> {
        let expected = class.artifact.constructor().map_or(0, |ctor| ctor.params.len());
        check_arity("constructor", expected, args)?;

        self.inner.lock().unwrap().instantiations += 1;
        Ok(MockInstance {
            args: args.to_vec(),
        })
    }

    fn encode_call(
        &self,
        class: &MockClass,
        _instance: &MockInstance,
        method: &str,
        args: &[Arg],
    ) -> BackendResult<MockUnlocking> {
        let function = class
            .artifact
            .function(method)
            .ok_or_else(|| BackendError::UnknownEntry(method.to_string()))?;
        check_arity(method, function.params.len(), args)?;

        let script = format!("{method}{}", Arg::Array(args.to_vec()));
        self.inner.lock().unwrap().encoded.push(script.clone());

        Ok(MockUnlocking {
            method: method.to_string(),
            args: args.to_vec(),
            script,
        })
    }

    fn verify_script(
        &self,
        _class: &MockClass,
        _instance: &MockInstance,
        unlocking: &MockUnlocking,
        tx_context: Option<&MockTx>,
    ) -> BackendResult<VerifyResult> {
        let inner = self.inner.lock().unwrap();

        if let Some(min) = inner.min_lock_time {
            match tx_context {
                Some(tx) if tx.lock_time >= min => {}
                Some(tx) => {
                    return Ok(VerifyResult::fail(format!(
                        "lock time {} below {min}",
                        tx.lock_time
                    )))
                }
                None => return Ok(VerifyResult::fail("missing transaction context")),
            }
        }

        match inner.accepted.get(&unlocking.method) {
            Some(args) if *args == unlocking.args => Ok(VerifyResult::pass()),
            _ => Ok(VerifyResult::fail(format!(
                "unlocking script `{}` does not satisfy the locking script",
                unlocking.script
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::token_artifact;

    #[test]
    fn test_mock_instantiate_checks_arity() {
        let backend = MockBackend::new();
        let class = backend.construct_class(&token_artifact()).unwrap();

        assert!(backend.instantiate(&class, &[]).is_err());
        assert!(backend
            .instantiate(&class, &[Arg::Bytes("aa".into()), Arg::from(1)])
            .is_ok());
        assert_eq!(backend.instantiations(), 1);
    }

    #[test]
    fn test_mock_encode_unknown_method() {
        let backend = MockBackend::new();
        let class = backend.construct_class(&token_artifact()).unwrap();
        let instance = MockInstance { args: vec![] };

        let result = backend.encode_call(&class, &instance, "burn", &[]);
        assert!(matches!(result, Err(BackendError::UnknownEntry(_))));
    }

    #[test]
    fn test_mock_verify() {
        let backend = MockBackend::new();
        let class = backend.construct_class(&token_artifact()).unwrap();
        let instance = MockInstance { args: vec![] };
        backend.accept("freeze", vec![]);

        let unlocking = backend.encode_call(&class, &instance, "freeze", &[]).unwrap();
        assert_eq!(unlocking.script, "freeze[]");
        assert!(backend.verify_script(&class, &instance, &unlocking, None).unwrap().success);
        assert_eq!(backend.encoded_calls(), vec!["freeze[]".to_string()]);
    }

    #[test]
    fn test_mock_lock_time() {
        let backend = MockBackend::new();
        let class = backend.construct_class(&token_artifact()).unwrap();
        let instance = MockInstance { args: vec![] };
        backend.accept("freeze", vec![]);
        backend.require_lock_time(100);

        let unlocking = backend.encode_call(&class, &instance, "freeze", &[]).unwrap();
        let early = MockTx { lock_time: 99 };
        let late = MockTx { lock_time: 100 };

        assert!(!backend.verify_script(&class, &instance, &unlocking, None).unwrap().success);
        assert!(!backend
            .verify_script(&class, &instance, &unlocking, Some(&early))
            .unwrap()
            .success);
        assert!(backend
            .verify_script(&class, &instance, &unlocking, Some(&late))
            .unwrap()
            .success);
    }
}
