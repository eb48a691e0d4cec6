use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::{format_scalar, node_rows, summary_fields};

/// Columns shown for each lattice node, in display order.
const NODE_COLUMNS: [&str; 7] = [
    "step",
    "node",
    "stock_price",
    "option_value",
    "hold_value",
    "exercise_value",
    "early_exercise",
];

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_field_table(map);
            }
        }
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Value, envelope: &serde_json::Map<String, Value>) {
    match result {
        Value::Object(res_map) => print_field_table(res_map),
        _ => print_field_table(envelope),
    }

    if let Some(nodes) = node_rows(result) {
        println!("\nLattice nodes:");
        print_node_table(nodes);
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_field_table(map: &serde_json::Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in summary_fields(map) {
        builder.push_record([key, format_value(&val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_node_table(nodes: &[Value]) {
    let mut builder = Builder::default();
    builder.push_record(NODE_COLUMNS);
    for node in nodes {
        let row: Vec<String> = NODE_COLUMNS
            .iter()
            .map(|col| node.get(*col).map(format_value).unwrap_or_default())
            .collect();
        builder.push_record(row);
    }
    println!("{}", Table::from(builder));
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::Array(arr) => arr.iter().map(format_value).collect::<Vec<_>>().join(", "),
        _ => format_scalar(value),
    }
}
