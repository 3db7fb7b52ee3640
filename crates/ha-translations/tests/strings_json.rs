//! strings.json files on disk

use ha_translations::{
    generate_translations, validate_strings, StringTable, TranslationCatalog, TranslationError,
};
use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const CORE_STRINGS: &str = r#"{
  "common": {
    "config_flow": {
      "abort": {
        "already_configured_device": "Device is already configured",
        "no_devices_found": "No devices found on the network"
      },
      "error": {
        "cannot_connect": "Failed to connect"
      },
      "data": {
        "host": "Host",
        "api_key": "API key"
      }
    }
  }
}"#;

const ELGATO_STRINGS: &str = r#"{
  "config": {
    "flow_title": "{serial_number}",
    "step": {
      "user": {
        "description": "Set up your Elgato Key Light to integrate with Home Assistant.",
        "data": {
          "host": "[%key:common::config_flow::data::host%]",
          "port": "Port"
        }
      },
      "zeroconf_confirm": {
        "description": "Do you want to add the Elgato Key Light with serial number `{serial_number}` to Home Assistant?",
        "title": "Discovered Elgato Key Light device"
      }
    },
    "error": {
      "cannot_connect": "[%key:common::config_flow::error::cannot_connect%]"
    },
    "abort": {
      "already_configured": "[%key:common::config_flow::abort::already_configured_device%]"
    }
  }
}"#;

const KEY_LIGHT_STRINGS: &str = r#"{
  "title": "Key light",
  "config": {
    "step": {
      "user": {
        "data": {"host": "[%key:component::elgato::config::step::user::data::host%]"}
      }
    },
    "abort": {
      "no_devices_found": "[%key:common::config_flow::abort::no_devices_found%]",
      "missing": "[%key:component::elgato::config::abort::missing%]"
    }
  }
}"#;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn fixture() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "homeassistant/strings.json", CORE_STRINGS);
    write(
        dir.path(),
        "homeassistant/components/elgato/strings.json",
        ELGATO_STRINGS,
    );
    write(
        dir.path(),
        "homeassistant/components/key_light/strings.json",
        KEY_LIGHT_STRINGS,
    );
    write(
        dir.path(),
        "homeassistant/components/broken/strings.json",
        "{ not json",
    );
    fs::create_dir_all(dir.path().join("homeassistant/components/no_strings")).unwrap();
    dir
}

fn load(dir: &TempDir) -> TranslationCatalog {
    TranslationCatalog::load(
        &dir.path().join("homeassistant/strings.json"),
        &dir.path().join("homeassistant/components"),
    )
    .unwrap()
}

#[test]
fn test_catalog_skips_unparsable_tables() {
    let dir = fixture();
    let catalog = load(&dir);
    let domains: Vec<&str> = catalog.domains().collect();
    assert_eq!(domains, vec!["elgato", "key_light"]);
}

#[test]
fn test_valid_table_has_no_problems() {
    let dir = fixture();
    let catalog = load(&dir);
    let table = catalog.table("elgato").unwrap();
    let problems = validate_strings(table, catalog.context(), true);
    assert!(problems.is_empty(), "{:?}", problems);
}

#[test]
fn test_cross_integration_references() {
    let dir = fixture();
    let catalog = load(&dir);
    let table = catalog.table("key_light").unwrap();

    let problems = validate_strings(table, catalog.context(), true);
    assert_eq!(problems.len(), 1);
    assert_eq!(problems[0].path, "config.abort.missing");

    let resources = catalog.get_translations(Some("config"), Some(&["key_light".to_string()]));
    assert_eq!(
        resources["resources"]["component.key_light.config.step.user.data.host"],
        json!("Host")
    );
    // Broken references stay as written in the flattened output
    assert_eq!(
        resources["resources"]["component.key_light.config.abort.missing"],
        json!("[%key:component::elgato::config::abort::missing%]")
    );
}

#[test]
fn test_generate_writes_resolved_document() {
    let dir = fixture();
    let catalog = load(&dir);
    let generated =
        generate_translations(catalog.table("elgato").unwrap(), catalog.context()).unwrap();
    assert_eq!(
        generated["config"]["abort"]["already_configured"],
        json!("Device is already configured")
    );
    assert_eq!(generated["config"]["flow_title"], json!("{serial_number}"));

    let err = generate_translations(catalog.table("key_light").unwrap(), catalog.context())
        .unwrap_err();
    assert!(matches!(err, TranslationError::UnresolvedReference(_)));
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = StringTable::load("demo", &dir.path().join("strings.json")).unwrap_err();
    assert!(matches!(err, TranslationError::Load(_)));
}
