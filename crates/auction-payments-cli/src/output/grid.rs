//! Reading the serialized breakdown grid back out of JSON for the table and
//! CSV printers.

use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;

pub struct GridColumn<'a> {
    pub label: &'a str,
    pub group: &'a str,
    pub values: Vec<&'a Value>,
    pub total: &'a Value,
}

pub struct Grid<'a> {
    pub lot_names: Vec<&'a str>,
    pub columns: Vec<GridColumn<'a>>,
    pub subtotals: &'a Map<String, Value>,
}

/// Recognise a serialized `BreakdownTable`.
pub fn as_grid(map: &Map<String, Value>) -> Option<Grid<'_>> {
    let lot_names = map
        .get("lot_names")?
        .as_array()?
        .iter()
        .map(|v| v.as_str().unwrap_or_default())
        .collect();
    let columns = map
        .get("columns")?
        .as_array()?
        .iter()
        .filter_map(|c| {
            let c = c.as_object()?;
            Some(GridColumn {
                label: c.get("label")?.as_str()?,
                group: c.get("group")?.as_str()?,
                values: c.get("values")?.as_array()?.iter().collect(),
                total: c.get("total")?,
            })
        })
        .collect();
    let subtotals = map.get("subtotals")?.as_object()?;
    Some(Grid {
        lot_names,
        columns,
        subtotals,
    })
}

pub fn group_title(group: &str) -> &'static str {
    match group {
        "seller" => "Seller Payment",
        "mstc" => "MSTC Payment",
        _ => "Total Payment",
    }
}

/// Money values arrive as decimal strings; show them to two places.
pub fn format_amount(value: &Value) -> String {
    match value {
        Value::String(s) => Decimal::from_str(s)
            .map(|d| d.round_dp(2).to_string())
            .unwrap_or_else(|_| s.clone()),
        Value::Number(n) => n.to_string(),
        Value::Null => String::new(),
        _ => value.to_string(),
    }
}
