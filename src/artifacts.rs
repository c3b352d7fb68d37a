//! Compilation and loading of contract build artifacts
//!
//! Compilation itself is delegated to an external toolchain via a configured
//! build command; this module only shells out to it and reads the creation
//! bytecode back from the artifact JSON it produces. Both Hardhat-style
//! (`"bytecode": "0x…"`) and Foundry-style (`"bytecode": {"object": "0x…"}`)
//! artifact layouts are accepted.

use std::{
    fs,
    path::Path,
    process::{Command, Stdio},
};

use serde_json::Value;

use crate::{
    constants::{ARTIFACT_BYTECODE_KEY, ARTIFACT_EXTENSION, ARTIFACT_OBJECT_KEY},
    errors::ScriptError,
    utils::command_success_or,
};

/// A compiled contract artifact
#[derive(Debug, Clone)]
pub struct ContractArtifact {
    /// The contract name
    pub name: String,
    /// The contract's creation bytecode
    pub bytecode: Vec<u8>,
}

/// Run the configured build command, compiling the contracts
pub fn compile_contracts(build_command: &[String]) -> Result<(), ScriptError> {
    let (program, args) = build_command
        .split_first()
        .ok_or_else(|| ScriptError::ContractCompilation("empty build command".to_string()))?;

    let mut cmd = Command::new(program);
    cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
    cmd.args(args);

    command_success_or(cmd, "Failed to compile contracts", ScriptError::ContractCompilation)
}

/// Load the named contract's compilation artifact from the artifacts directory
pub fn load_artifact(artifacts_dir: &Path, name: &str) -> Result<ContractArtifact, ScriptError> {
    let path = artifacts_dir.join(name).with_extension(ARTIFACT_EXTENSION);
    let contents = fs::read_to_string(&path)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", path.display(), e)))?;

    parse_artifact(name, &contents)
}

/// Parse a contract artifact from its JSON contents
fn parse_artifact(name: &str, contents: &str) -> Result<ContractArtifact, ScriptError> {
    let parsed: Value = serde_json::from_str(contents)
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", name, e)))?;

    let bytecode_hex = match &parsed[ARTIFACT_BYTECODE_KEY] {
        Value::String(s) => s.as_str(),
        Value::Object(fields) => fields
            .get(ARTIFACT_OBJECT_KEY)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ScriptError::ArtifactParsing(format!("{}: no bytecode object in artifact", name))
            })?,
        _ => {
            return Err(ScriptError::ArtifactParsing(format!(
                "{}: no creation bytecode in artifact",
                name
            )))
        }
    };

    let bytecode = hex::decode(bytecode_hex.trim_start_matches("0x"))
        .map_err(|e| ScriptError::ArtifactParsing(format!("{}: {}", name, e)))?;

    if bytecode.is_empty() {
        return Err(ScriptError::ArtifactParsing(format!(
            "{}: empty creation bytecode",
            name
        )));
    }

    Ok(ContractArtifact {
        name: name.to_string(),
        bytecode,
    })
}
