pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("JSON serialization error: {}", e),
        },
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Per-node rows of a binomial result, if the value carries a lattice.
pub(crate) fn node_rows(result: &Value) -> Option<&Vec<Value>> {
    result.get("nodes").and_then(Value::as_array)
}

/// Lattices serialise as arrays of rows; tabular formatters skip them in the
/// field/value section and render `nodes` instead.
pub(crate) fn is_lattice(value: &Value) -> bool {
    match value {
        Value::Array(rows) => rows.first().map_or(false, Value::is_array),
        _ => false,
    }
}

/// Scalar rendering shared by the table and CSV formatters.
pub(crate) fn format_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

/// Flatten a result object into `(field, value)` pairs: nested objects become
/// `parent.child`, lattices and the node list are left out.
pub(crate) fn summary_fields(result: &serde_json::Map<String, Value>) -> Vec<(String, Value)> {
    let mut fields = Vec::new();
    for (key, val) in result {
        if key == "nodes" || is_lattice(val) {
            continue;
        }
        match val {
            Value::Object(inner) => {
                for (child, v) in inner {
                    fields.push((format!("{key}.{child}"), v.clone()));
                }
            }
            _ => fields.push((key.clone(), val.clone())),
        }
    }
    fields
}
