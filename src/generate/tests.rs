use super::prompt::{build_user_prompt, format_facts};
use crate::facts::{Facts, HostPlant};

fn sample_facts() -> Facts {
    Facts {
        eppocode: "PUCCRT".to_string(),
        preferred_name: Some("Puccinia triticina".to_string()),
        common_names: vec!["wheat leaf rust".to_string(), "brown rust".to_string()],
        hosts: vec![
            HostPlant {
                name: "Triticum aestivum".to_string(),
                class_label: Some("Major host".to_string()),
            },
            HostPlant {
                name: "Triticum durum".to_string(),
                class_label: None,
            },
        ],
    }
}

#[test]
fn test_format_facts_includes_all_sections() {
    let formatted = format_facts(&sample_facts());
    assert!(formatted.contains("Disease/Pest: Puccinia triticina"));
    assert!(formatted.contains("EPPO Code: PUCCRT"));
    assert!(formatted.contains("Also known as: wheat leaf rust, brown rust"));
    assert!(formatted.contains("Commonly affects: Triticum aestivum (Major host), Triticum durum"));
}

#[test]
fn test_format_facts_empty_for_vacuous_facts() {
    assert!(format_facts(&Facts::default()).is_empty());
}

#[test]
fn test_format_facts_caps_common_names() {
    let facts = Facts {
        eppocode: "XXXXXX".to_string(),
        preferred_name: Some("Some disease".to_string()),
        common_names: (0..10).map(|i| format!("name{i}")).collect(),
        hosts: Vec::new(),
    };
    let formatted = format_facts(&facts);
    assert!(formatted.contains("name4"));
    assert!(!formatted.contains("name5"));
}

#[test]
fn test_user_prompt_carries_label_and_facts() {
    let formatted = format_facts(&sample_facts());
    let prompt = build_user_prompt("Wheat leaf rust", &formatted);
    assert!(prompt.contains("\"Wheat leaf rust\""));
    assert!(prompt.contains("Puccinia triticina"));
    assert!(prompt.contains("EPPO DATABASE INFORMATION"));
}
