//! Wire-format tests for the persisted settings blob.
//!
//! The settings blob is stored as opaque JSON under a fixed key, so the
//! string forms of provider tags are a compatibility contract.

use super::*;
use std::collections::HashMap;

#[test]
fn test_provider_kind_lowercase_tags() {
    assert_eq!(
        serde_json::to_string(&ProviderKind::OpenAi).unwrap(),
        "\"openai\""
    );
    assert_eq!(
        serde_json::to_string(&ProviderKind::HuggingFace).unwrap(),
        "\"huggingface\""
    );
    let kind: ProviderKind = serde_json::from_str("\"backboard\"").unwrap();
    assert_eq!(kind, ProviderKind::Backboard);
}

#[test]
fn test_settings_blob_uses_string_keyed_provider_map() {
    let mut providers = HashMap::new();
    providers.insert(
        ProviderKind::Gemini,
        ProviderConfig {
            kind: ProviderKind::Gemini,
            api_key: Some("key".to_string()),
            model: "gemini-2.5-flash".to_string(),
            endpoint: None,
            enabled: true,
            label: "Google Gemini".to_string(),
        },
    );
    let settings = Settings {
        default_provider: ProviderKind::Gemini,
        fallback_provider: ProviderKind::Backboard,
        enable_fallback: true,
        providers,
    };

    let blob = serde_json::to_string(&settings).unwrap();
    assert!(blob.contains("\"gemini\""));

    let parsed: Settings = serde_json::from_str(&blob).unwrap();
    assert_eq!(parsed.default_provider, ProviderKind::Gemini);
    assert!(parsed.providers.contains_key(&ProviderKind::Gemini));
}

#[test]
fn test_delivery_status_tags() {
    assert_eq!(
        serde_json::to_string(&DeliveryStatus::Success).unwrap(),
        "\"success\""
    );
    assert_eq!(
        serde_json::to_string(&DeliveryStatus::Pending).unwrap(),
        "\"pending\""
    );
}
