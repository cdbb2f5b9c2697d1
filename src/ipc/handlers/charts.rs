use crate::ipc::error::ok;
use crate::ipc::helpers::{fetch, parse_filters, roster_ids};
use crate::ipc::types::{AppState, Request};
use crate::model;
use crate::report;
use crate::sheets::TableId;
use serde_json::json;

/// Dashboard summaries over the filtered score set: dense level tally,
/// sparse category tally, per-date counts for the time axis.
fn handle_overview(state: &mut AppState, req: &Request) -> serde_json::Value {
    let filters = match parse_filters(req) {
        Ok(v) => v,
        Err(e) => return e,
    };

    let allowed = match filters.class.as_deref() {
        Some(class) => {
            let students_table = match fetch(state, req, TableId::Students) {
                Ok(v) => v,
                Err(e) => return e,
            };
            let students = model::students_from(&students_table);
            Some(roster_ids(&report::filter_students(&students, Some(class))))
        }
        None => None,
    };

    let scores_table = match fetch(state, req, TableId::Scores) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let scores = model::scores_from(&scores_table);
    let filtered = report::filter_scores(&scores, &filters, allowed.as_ref());

    ok(
        &req.id,
        json!({
            "total": filtered.len(),
            "levels": report::level_tally(&filtered),
            "categories": report::category_tally(&filtered),
            "byDate": report::date_tally(&filtered),
        }),
    )
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "charts.overview" => Some(handle_overview(state, req)),
        _ => None,
    }
}
