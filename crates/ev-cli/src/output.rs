use serde::Serialize;

use crate::cli::OutputFormat;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::render;
    use crate::cli::OutputFormat;

    #[test]
    fn raw_is_a_single_line() {
        let value = json!({"id": 1, "status": "DRA"});
        let raw = render(&value, OutputFormat::Raw).expect("render");
        assert_eq!(raw, r#"{"id":1,"status":"DRA"}"#);
        assert!(!raw.contains('\n'));
    }

    #[test]
    fn json_is_pretty_printed() {
        let value = json!({"id": 1});
        let pretty = render(&value, OutputFormat::Json).expect("render");
        assert_eq!(pretty, "{\n  \"id\": 1\n}");
    }
}
