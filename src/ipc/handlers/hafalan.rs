use crate::ipc::error::ok;
use crate::ipc::helpers::{optional_i64, optional_str};
use crate::ipc::types::{AppState, Request};
use crate::reference;
use serde_json::json;

/// Curriculum items for the input form's category/semester tabs. Served from
/// the bundled reference list; no source selection or network involved.
fn handle_hafalan_list(req: &Request) -> serde_json::Value {
    let category = optional_str(req, "category");
    let semester = optional_i64(req, "semester");
    let items: Vec<serde_json::Value> = reference::hafalan_items(category.as_deref(), semester)
        .iter()
        .map(|item| {
            json!({
                "category": item.category,
                "itemName": item.item_name,
                "semester": item.semester,
            })
        })
        .collect();
    ok(&req.id, json!({ "items": items }))
}

pub fn try_handle(_state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "hafalan.list" => Some(handle_hafalan_list(req)),
        _ => None,
    }
}
