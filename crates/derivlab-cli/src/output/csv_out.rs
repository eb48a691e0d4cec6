use serde_json::Value;
use std::io;

use super::{format_scalar, node_rows, summary_fields};

/// Write output as CSV to stdout.
///
/// Results carrying a lattice are written one row per node; everything else
/// as two-column `field,value` records.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value.get("result").unwrap_or(value);
    if let Some(nodes) = node_rows(result) {
        write_array_csv(&mut wtr, nodes);
    } else if let Value::Object(map) = result {
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in summary_fields(map) {
            let _ = wtr.write_record([key, format_scalar(&val)]);
        }
    } else {
        let _ = wtr.write_record([format_scalar(result)]);
    }

    let _ = wtr.flush();
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        return;
    };
    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for item in arr {
        if let Value::Object(map) = item {
            let row: Vec<String> = headers
                .iter()
                .map(|h| map.get(*h).map(format_scalar).unwrap_or_default())
                .collect();
            let _ = wtr.write_record(&row);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_rows_written_with_headers() {
        let nodes = json!([
            {"step": 0, "node": 0, "hold_value": "1.5"},
            {"step": 1, "node": 0, "hold_value": null}
        ]);
        let mut wtr = csv::Writer::from_writer(Vec::new());
        write_array_csv(&mut wtr, nodes.as_array().unwrap());
        let out = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("step"));
        assert!(lines[2].starts_with(','));
    }
}
