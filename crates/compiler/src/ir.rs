//! External input format: the JSON hand-off from the (out-of-scope) parser.
//!
//! spec.md treats the parser as an external collaborator that constructs a
//! [`ProgramContext`] in memory. This implementation defines the on-disk
//! shape of that hand-off explicitly: a JSON document deserialized with
//! `serde_json`, mirroring `staq_core::program::ProgramContext` field for
//! field. `staq-core`'s types already carry the `Serialize`/`Deserialize`
//! impls; this module just owns the file-level round trip and is where a
//! real front-end's output format would be validated if it ever grew beyond
//! a straight structural mirror.

use staq_core::ProgramContext;
use std::fs;
use std::path::Path;

pub fn load_program(path: &Path) -> Result<ProgramContext, String> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("failed to read program file '{}': {e}", path.display()))?;
    serde_json::from_str(&text)
        .map_err(|e| format!("failed to parse program file '{}': {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_minimal_program_through_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("program.json");
        let json = r#"{
            "operators": [
                { "kind": "PUSH_INTEGER", "operand": {"integer": 2}, "token": {"text": "2", "location": "main.staq:1:1"} },
                { "kind": "PUSH_INTEGER", "operand": {"integer": 3}, "token": {"text": "3", "location": "main.staq:1:3"} },
                { "kind": "INTRINSIC", "operand": {"intrinsic": "PLUS"}, "token": {"text": "+", "location": "main.staq:1:5"} },
                { "kind": "INTRINSIC", "operand": {"intrinsic": "DROP"}, "token": {"text": "drop", "location": "main.staq:1:7"} }
            ],
            "functions": {},
            "external_functions": []
        }"#;
        fs::write(&path, json).expect("write program");

        let program = load_program(&path).expect("loads");
        assert_eq!(program.operators.len(), 4);
    }

    #[test]
    fn reports_a_readable_error_on_malformed_json() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("program.json");
        fs::write(&path, "not json").expect("write program");

        let err = load_program(&path).unwrap_err();
        assert!(err.contains("failed to parse"));
    }
}
