//! Test fixtures and constants for preflight tests

#![allow(dead_code)] // Test fixtures may not all be used in every test

use crate::artifact::Artifact;

/// Token contract with a two-argument constructor
pub const TOKEN_ARTIFACT: &str = r#"{
    "version": 9,
    "contract": "Token",
    "abi": [
        {
            "type": "function",
            "name": "transfer",
            "index": 0,
            "params": [
                { "name": "to", "type": "bytes" },
                { "name": "amount", "type": "int" }
            ]
        },
        { "type": "function", "name": "freeze", "index": 1, "params": [] },
        {
            "type": "constructor",
            "params": [
                { "name": "owner", "type": "bytes" },
                { "name": "supply", "type": "int" }
            ]
        }
    ]
}"#;

/// Contract exercising every parameter shape
pub const TYPES_ARTIFACT: &str = r#"{
    "contract": "Types",
    "abi": [
        { "type": "constructor", "params": [] },
        {
            "type": "function",
            "name": "check",
            "params": [
                { "name": "n", "type": "int" },
                { "name": "flag", "type": "bool" },
                { "name": "blob", "type": "bytes" },
                { "name": "key", "type": "PubKey" }
            ]
        },
        {
            "type": "function",
            "name": "arrays",
            "params": [
                { "name": "xs", "type": "int[3]" },
                { "name": "pair", "type": "int[2]" },
                { "name": "flags", "type": "bool[2]" },
                { "name": "blobs", "type": "bytes[2]" },
                { "name": "keys", "type": "PubKey[2]" }
            ]
        }
    ]
}"#;

/// SimplicityHL program with a parameter
pub const PARAMETERIZED_PROGRAM: &str = r"
fn main() {
    let x: u32 = param::VALUE;
    assert!(jet::eq_32(x, 42));
}
";

/// SimplicityHL program spent with a witness
pub const WITNESS_PROGRAM: &str = r"
fn main() {
    let x: u32 = witness::X;
    assert!(jet::le_32(x, 100));
}
";

#[must_use]
pub fn token_artifact() -> Artifact {
    Artifact::from_json(TOKEN_ARTIFACT).expect("valid artifact")
}

#[must_use]
pub fn types_artifact() -> Artifact {
    Artifact::from_json(TYPES_ARTIFACT).expect("valid artifact")
}
