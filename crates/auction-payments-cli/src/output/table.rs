use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::grid::{self, Grid};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(grid) = grid::as_grid(map) {
                print_grid(&grid);
            } else if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(map);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr);
        }
        _ => {
            println!("{}", value);
        }
    }
}

/// Render the breakdown grid: group header, column header, one row per lot,
/// column totals and group subtotals.
fn print_grid(grid: &Grid<'_>) {
    let mut builder = Builder::default();

    let mut groups = vec![String::new()];
    let mut labels = vec!["Lot".to_string()];
    for (i, col) in grid.columns.iter().enumerate() {
        let starts_group = i == 0 || grid.columns[i - 1].group != col.group;
        groups.push(if starts_group {
            grid::group_title(col.group).to_string()
        } else {
            String::new()
        });
        labels.push(col.label.to_string());
    }
    builder.push_record(groups);
    builder.push_record(labels);

    for (row, name) in grid.lot_names.iter().enumerate() {
        let mut record = vec![name.to_string()];
        record.extend(
            grid.columns
                .iter()
                .map(|c| c.values.get(row).map(|v| grid::format_amount(v)).unwrap_or_default()),
        );
        builder.push_record(record);
    }

    let mut totals = vec!["Column Total".to_string()];
    totals.extend(grid.columns.iter().map(|c| grid::format_amount(c.total)));
    builder.push_record(totals);

    let mut subtotals = vec!["Group Subtotal".to_string()];
    for (i, col) in grid.columns.iter().enumerate() {
        let starts_group = i == 0 || grid.columns[i - 1].group != col.group;
        let cell = match (starts_group, col.group) {
            (true, "seller") => format!("Seller: {}", subtotal(grid.subtotals, "seller")),
            (true, "mstc") => format!("MSTC: {}", subtotal(grid.subtotals, "mstc")),
            (true, _) => subtotal(grid.subtotals, "grand_total"),
            (false, _) => String::new(),
        };
        subtotals.push(cell);
    }
    builder.push_record(subtotals);

    println!("{}", Table::from(builder));
}

fn subtotal(subtotals: &Map<String, Value>, key: &str) -> String {
    subtotals
        .get(key)
        .map(grid::format_amount)
        .unwrap_or_default()
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    if let Value::Object(res_map) = result {
        // Full report: the grid first, then the session summary
        if let Some(grid) = res_map
            .get("table")
            .and_then(Value::as_object)
            .and_then(grid::as_grid)
        {
            print_grid(&grid);
            if let Some(Value::Object(summary)) = res_map.get("summary") {
                println!("\nSummary:");
                print_flat_object(summary);
            }
        } else {
            print_flat_object(res_map);
        }
    } else {
        print_flat_object(envelope);
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

fn print_flat_object(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in map {
        builder.push_record([key.as_str(), &format_field(key, val)]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(|v| format_field(h, v)).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}

/// Keys whose string values are text, never decimal amounts.
fn is_text_field(key: &str) -> bool {
    matches!(
        key,
        "name" | "lot_name" | "lot_names" | "label" | "key" | "group" | "methodology"
    )
}

fn format_field(key: &str, value: &Value) -> String {
    match value {
        Value::String(s) if is_text_field(key) => s.clone(),
        Value::Array(arr) if is_text_field(key) => {
            let items: Vec<String> = arr.iter().map(|v| format_field(key, v)).collect();
            items.join(", ")
        }
        _ => format_value(value),
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(_) => grid::format_amount(value),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
