//! Example: Checking a SimplicityHL contract call before broadcasting
//!
//! Run with `--features simplicity`.

use preflight::{build_offline_instance, offline_verify, Artifact, DataMap, SimplicityBackend};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Preflight Offline Verification Example\n");

    // 1. Describe the contract
    println!("1. Loading artifact...");
    let artifact = Artifact::from_value(json!({
        "contract": "Threshold",
        "source": "fn main() {\n    let x: u32 = witness::X;\n    assert!(jet::le_32(x, param::LIMIT));\n}\n",
        "abi": [
            { "type": "constructor", "params": [{ "name": "LIMIT", "type": "u32" }] },
            { "type": "function", "name": "main", "params": [{ "name": "X", "type": "u32" }] }
        ]
    }))?;
    println!("   ✓ Artifact loaded: {}", artifact.contract);

    // 2. Supply loosely-typed arguments
    println!("\n2. Building arguments...");
    let data = DataMap::new()
        .with("constructor", "LIMIT", json!(100))
        .with("main", "X", json!(42));
    let built = build_offline_instance(&SimplicityBackend, &artifact, &data)?;
    for (entry, args) in &built.params {
        let rendered: Vec<String> = args.iter().map(ToString::to_string).collect();
        println!("   {entry}: [{}]", rendered.join(", "));
    }
    println!("   CMR: {}", built.instance.cmr());

    // 3. Verify the call offline
    println!("\n3. Verifying call...");
    let result = offline_verify(&SimplicityBackend, &artifact, &data, "main", None)?;
    println!("   success: {}", result.success);
    if let Some(error) = result.error {
        println!("   error: {error}");
    }

    // 4. A witness above the limit fails the assertion
    println!("\n4. Verifying call over the limit...");
    let over = data.with("main", "X", json!(200));
    let result = offline_verify(&SimplicityBackend, &artifact, &over, "main", None)?;
    println!("   success: {}", result.success);
    if let Some(error) = result.error {
        println!("   error: {error}");
    }

    Ok(())
}
