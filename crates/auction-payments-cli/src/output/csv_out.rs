use serde_json::Value;
use std::io;

use super::grid::{self, Grid};

type StdoutWriter<'a> = csv::Writer<io::StdoutLock<'a>>;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            if let Some(grid) = grid::as_grid(map) {
                write_grid_csv(&mut wtr, &grid);
            } else if let Some(Value::Object(result)) = map.get("result") {
                // Full report: one row per lot calculation
                if let Some(Value::Array(calcs)) = result.get("calculations") {
                    write_array_csv(&mut wtr, calcs);
                } else {
                    write_fields_csv(&mut wtr, result);
                }
            } else {
                write_fields_csv(&mut wtr, map);
            }
        }
        Value::Array(arr) => {
            write_array_csv(&mut wtr, arr);
        }
        _ => {
            let _ = wtr.write_record([&format_csv_value(value)]);
        }
    }

    let _ = wtr.flush();
}

fn write_fields_csv(wtr: &mut StdoutWriter<'_>, map: &serde_json::Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &format_csv_value(val)]);
    }
}

/// One row per lot plus a trailing column-total row. Values are written
/// unrounded.
fn write_grid_csv(wtr: &mut StdoutWriter<'_>, grid: &Grid<'_>) {
    let mut header = vec!["lot".to_string()];
    header.extend(grid.columns.iter().map(|c| c.label.to_string()));
    let _ = wtr.write_record(&header);

    for (row, name) in grid.lot_names.iter().enumerate() {
        let mut record = vec![name.to_string()];
        record.extend(grid.columns.iter().map(|c| {
            c.values
                .get(row)
                .map(|v| format_csv_value(v))
                .unwrap_or_default()
        }));
        let _ = wtr.write_record(&record);
    }

    let mut totals = vec!["Column Total".to_string()];
    totals.extend(grid.columns.iter().map(|c| format_csv_value(c.total)));
    let _ = wtr.write_record(&totals);
}

fn write_array_csv(wtr: &mut StdoutWriter<'_>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
