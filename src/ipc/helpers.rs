use std::collections::{HashMap, HashSet};

use crate::ipc::error::err;
use crate::ipc::types::{AppState, Request};
use crate::model::{Score, Student};
use crate::report::{self, ReportError, ReportFilters};
use crate::sheets::{self, SheetError, SheetSource, TableId};
use crate::tabular::Table;
use serde_json::json;

pub fn required_str(req: &Request, key: &str) -> Result<String, serde_json::Value> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .ok_or_else(|| err(&req.id, "bad_params", format!("missing {}", key), None))
}

pub fn optional_str(req: &Request, key: &str) -> Option<String> {
    req.params
        .get(key)
        .and_then(|v| v.as_str())
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

pub fn optional_i64(req: &Request, key: &str) -> Option<i64> {
    req.params.get(key).and_then(|v| v.as_i64())
}

pub fn source<'a>(state: &'a AppState, req: &Request) -> Result<&'a SheetSource, serde_json::Value> {
    state
        .source
        .as_ref()
        .ok_or_else(|| err(&req.id, "no_source", "select a sheet source first", None))
}

pub fn sheet_err(req: &Request, e: SheetError) -> serde_json::Value {
    err(&req.id, e.code(), e.to_string(), None)
}

pub fn report_err(req: &Request, e: ReportError) -> serde_json::Value {
    err(&req.id, &e.code, e.message, None)
}

pub fn parse_filters(req: &Request) -> Result<ReportFilters, serde_json::Value> {
    report::parse_report_filters(req.params.get("filters")).map_err(|e| report_err(req, e))
}

pub fn fetch(state: &AppState, req: &Request, table: TableId) -> Result<Table, serde_json::Value> {
    let src = source(state, req)?;
    sheets::fetch_table(&state.http, src, table).map_err(|e| sheet_err(req, e))
}

/// Pagination params shared by every paginated view: a 1-based page, the
/// page size, and the caller's filters-changed flag for the reset rule.
pub struct PageParams {
    pub page: usize,
    pub page_size: usize,
    pub filters_changed: bool,
}

pub fn page_params(req: &Request) -> PageParams {
    PageParams {
        page: req
            .params
            .get("page")
            .and_then(|v| v.as_u64())
            .map(|v| v as usize)
            .unwrap_or(1),
        page_size: req
            .params
            .get("pageSize")
            .and_then(|v| v.as_u64())
            .map(|v| v as usize)
            .filter(|v| *v > 0)
            .unwrap_or(report::DEFAULT_PAGE_SIZE),
        filters_changed: req
            .params
            .get("filtersChanged")
            .and_then(|v| v.as_bool())
            .unwrap_or(false),
    }
}

pub fn roster_ids(roster: &[Student]) -> HashSet<String> {
    roster.iter().map(|s| s.nisn.clone()).collect()
}

pub fn name_map(students: &[Student]) -> HashMap<&str, &str> {
    students
        .iter()
        .map(|s| (s.nisn.as_str(), s.name.as_str()))
        .collect()
}

/// Report row for one score; the student name falls back to the raw id when
/// the score is orphaned (no matching NISN in the roster).
pub fn score_row(score: &Score, names: &HashMap<&str, &str>) -> serde_json::Value {
    json!({
        "studentId": score.student_id,
        "studentName": names
            .get(score.student_id.as_str())
            .copied()
            .unwrap_or(score.student_id.as_str()),
        "category": score.category,
        "itemName": score.item_name,
        "score": score.score,
        "date": score.date,
        "notes": score.notes,
        "timestamp": score.timestamp,
    })
}

pub fn score_json(score: &Score) -> serde_json::Value {
    json!({
        "studentId": score.student_id,
        "category": score.category,
        "itemName": score.item_name,
        "score": score.score,
        "date": score.date,
        "notes": score.notes,
        "timestamp": score.timestamp,
    })
}
