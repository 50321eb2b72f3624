use anyhow::{Context, bail};
use serde::Deserialize;
use serde_json::Value;

use ev_core::entities::EntityData;
use ev_core::enums::EntityKind;

/// Read a JSON argument, where `-` means stdin.
pub fn read_json(raw: &str) -> anyhow::Result<Value> {
    let text = if raw == "-" {
        std::io::read_to_string(std::io::stdin()).context("failed to read JSON from stdin")?
    } else {
        raw.to_owned()
    };
    serde_json::from_str(&text).context("argument is not valid JSON")
}

/// Build a record payload of `kind` from a JSON object of its fields.
///
/// The object may repeat the `entity_kind` tag, but it must agree with `kind`.
pub fn record_payload(kind: EntityKind, value: Value) -> anyhow::Result<EntityData> {
    if !kind.is_record() {
        bail!("{} is not a record kind", kind.label());
    }
    let Value::Object(mut fields) = value else {
        bail!("{} payload must be a JSON object", kind.label());
    };
    if let Some(tag) = fields.get("entity_kind")
        && tag.as_str() != Some(kind.as_str())
    {
        bail!("payload entity_kind {tag} does not match {kind}");
    }
    fields.insert("entity_kind".into(), Value::String(kind.as_str().into()));
    serde_json::from_value(Value::Object(fields))
        .with_context(|| format!("invalid {} payload", kind.label()))
}

/// New locations for an existing link.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LinkLocations {
    #[serde(default)]
    pub from_entity_locations: Option<String>,
    #[serde(default)]
    pub to_entity_locations: Option<String>,
}

/// New locations for an existing topic reference.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct TopicRefLocations {
    #[serde(default)]
    pub locations: Option<String>,
}
