use anyhow::bail;
use serde::de::DeserializeOwned;
use serde_json::Value;

use ev_core::enums::{Direction, NullHandling};
use ev_core::query::OrderSpec;

/// Parse a wire-code enum value (`cla`, `PUB`, ...) using serde-deserialization.
pub fn parse_code<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().to_ascii_uppercase();
    serde_json::from_value(Value::String(normalized))
        .map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse `property[:asc|:desc][:ci][:nulls-first|:nulls-last]` into one order key.
pub fn parse_order(raw: &str) -> anyhow::Result<OrderSpec> {
    let mut parts = raw.split(':');
    let property = parts.next().map(str::trim).unwrap_or_default();
    if property.is_empty() {
        bail!("invalid sort '{raw}': missing property name");
    }

    let mut order = OrderSpec::asc(property);
    for modifier in parts {
        match modifier.trim().to_ascii_lowercase().as_str() {
            "asc" => order.direction = Some(Direction::Asc),
            "desc" => order.direction = Some(Direction::Desc),
            "ci" => order = order.ignoring_case(),
            "nulls-first" => order = order.nulls(NullHandling::NullsFirst),
            "nulls-last" => order = order.nulls(NullHandling::NullsLast),
            other => bail!("invalid sort '{raw}': unknown modifier '{other}'"),
        }
    }
    Ok(order)
}
