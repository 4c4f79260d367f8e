//! Rendering command results

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

use super::OutputFormat;

/// Serialize `data` and print it to stdout in `format`
pub fn print<T: Serialize>(data: &T, format: OutputFormat) -> Result<()> {
    let value = serde_json::to_value(data).context("Failed to serialize result")?;
    println!("{}", format_output(&value, format)?);
    Ok(())
}

/// Format results according to the selected output format
pub fn format_output(data: &Value, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(data).context("Failed to format JSON output")
        }
        OutputFormat::JsonCompact => {
            serde_json::to_string(data).context("Failed to format JSON output")
        }
        OutputFormat::Csv => json_to_csv(data),
    }
}

/// Arrays of objects become one row per object with the first object's keys
/// as header. A single object becomes `key,value` pairs.
fn json_to_csv(data: &Value) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    match data {
        Value::Array(items) => {
            let Some(Value::Object(first)) = items.first() else {
                return Ok(String::new());
            };
            let headers: Vec<&String> = first.keys().collect();
            writer.write_record(&headers)?;

            for item in items {
                if let Value::Object(obj) = item {
                    writer.write_record(
                        headers
                            .iter()
                            .map(|h| cell(obj.get(h.as_str()).unwrap_or(&Value::Null))),
                    )?;
                }
            }
        }
        Value::Object(obj) => {
            writer.write_record(["key", "value"])?;
            for (key, value) in obj {
                writer.write_record([key.clone(), cell(value)])?;
            }
        }
        other => {
            writer.write_record(["value"])?;
            writer.write_record([cell(other)])?;
        }
    }

    let bytes = writer.into_inner().context("Failed to flush CSV output")?;
    let csv = String::from_utf8(bytes).context("CSV output is not UTF-8")?;
    Ok(csv.trim_end().to_string())
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_csv_from_rows() {
        let data = json!([
            {"ID": "p1", "Name": "Basic, home", "Price": "15"},
            {"ID": "p2", "Name": "Pro", "Price": "30"}
        ]);
        let csv = format_output(&data, OutputFormat::Csv).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "ID,Name,Price");
        assert_eq!(lines[1], "p1,\"Basic, home\",15");
        assert_eq!(lines[2], "p2,Pro,30");
    }

    #[test]
    fn test_csv_from_object() {
        let data = json!({"totalBills": 3, "totalRevenue": 27.5});
        let csv = format_output(&data, OutputFormat::Csv).unwrap();
        assert_eq!(csv, "key,value\ntotalBills,3\ntotalRevenue,27.5");
    }

    #[test]
    fn test_csv_empty_list() {
        assert_eq!(format_output(&json!([]), OutputFormat::Csv).unwrap(), "");
    }

    #[test]
    fn test_json_compact() {
        let data = json!({"a": null});
        assert_eq!(
            format_output(&data, OutputFormat::JsonCompact).unwrap(),
            "{\"a\":null}"
        );
    }
}
