//! Shared fixtures for integration tests.

use verdant::facts::{Facts, HostPlant};
use verdant::scoring::{Datatype, RawCandidate};

/// Facts for Puccinia triticina (wheat leaf rust).
pub fn wheat_rust_facts() -> Facts {
    Facts {
        eppocode: "PUCCRT".to_string(),
        preferred_name: Some("Puccinia triticina".to_string()),
        common_names: vec!["wheat leaf rust".to_string(), "brown rust of wheat".to_string()],
        hosts: vec![HostPlant {
            name: "Triticum aestivum".to_string(),
            class_label: Some("Major host".to_string()),
        }],
    }
}

/// A small candidate set around wheat rust.
pub fn wheat_rust_rows() -> Vec<RawCandidate> {
    vec![
        RawCandidate::new("PUCCRT", Datatype::Gaf, "rust of wheat"),
        RawCandidate::new("PUCCST", Datatype::Gaf, "stripe rust of wheat"),
        RawCandidate::new("TRZAXX", Datatype::Pfl, "wheat"),
    ]
}
