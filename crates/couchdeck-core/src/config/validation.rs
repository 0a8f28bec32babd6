//! Config validation - warns about unknown fields

use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::warn;

/// Validate JSON config and warn about unknown fields.
pub fn warn_unknown_fields(content: &str, config_name: &str) {
    for path in unknown_fields(content) {
        warn!("Unknown config field in {config_name}: {path}");
    }
}

/// Paths like `"layout.iconSize"` for every key the config does not know.
/// Unparseable content yields nothing; the deserializer reports that.
pub(crate) fn unknown_fields(content: &str) -> Vec<String> {
    let Ok(value) = serde_json::from_str::<Value>(content) else {
        return Vec::new();
    };
    find_unknown_keys(&value, &expected_config_keys(), "")
}

fn find_unknown_keys(value: &Value, expected: &ExpectedKeys, prefix: &str) -> Vec<String> {
    let mut unknowns = Vec::new();

    let Value::Object(obj) = value else {
        return unknowns;
    };

    for (key, child) in obj {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        if let Some(nested) = expected.nested.get(key.as_str()) {
            unknowns.extend(find_unknown_keys(child, nested, &path));
        } else if !expected.fields.contains(key.as_str()) {
            unknowns.push(path);
        }
    }

    unknowns
}

/// Expected keys for a config section.
/// `fields` are leaf fields, `nested` are nested objects with their own expected keys.
struct ExpectedKeys {
    fields: HashSet<&'static str>,
    nested: HashMap<&'static str, ExpectedKeys>,
}

impl ExpectedKeys {
    fn new(fields: &[&'static str]) -> Self {
        Self {
            fields: fields.iter().copied().collect(),
            nested: HashMap::new(),
        }
    }

    fn with_nested(mut self, key: &'static str, nested: ExpectedKeys) -> Self {
        self.nested.insert(key, nested);
        self
    }
}

fn expected_config_keys() -> ExpectedKeys {
    let layout_keys = ExpectedKeys::new(&[
        "iconWidth",
        "iconHeight",
        "minIconWidth",
        "spacing",
        "padding",
        "minColumns",
        "minRows",
        "maxColumns",
        "padMode",
    ]);

    let navigation_keys = ExpectedKeys::new(&[
        "wrap",
        "focusRetryLimit",
        "longPressMs",
        "soundFeedback",
    ]);

    let keybinding_keys = ExpectedKeys::new(&["exit", "home"]);

    let overlay_keys =
        ExpectedKeys::new(&["fadeFrames", "autoHideWhenAppsRunning", "startShown"]);

    ExpectedKeys::new(&[])
        .with_nested("layout", layout_keys)
        .with_nested("navigation", navigation_keys)
        .with_nested("keybindings", keybinding_keys)
        .with_nested("overlay", overlay_keys)
}
