use crate::ipc::error::ok;
use crate::ipc::helpers::{
    fetch, name_map, page_params, parse_filters, required_str, roster_ids, score_json, score_row,
};
use crate::ipc::types::{AppState, Request};
use crate::model::{self, CATEGORIES};
use crate::report;
use crate::sheets::TableId;
use serde_json::json;

// Every report refetches its tables and recomputes; the sidecar keeps no
// cache, so a second request after a write sees the server's truth.

/// Teacher-portal report: the class roster's scores, newest first, filtered
/// and paginated, with the dense per-category level tallies the three chart
/// panels render.
fn handle_class_scores(state: &mut AppState, req: &Request) -> serde_json::Value {
    let class = match required_str(req, "class") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let filters = match parse_filters(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let pp = page_params(req);

    let students_table = match fetch(state, req, TableId::Students) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let students = model::students_from(&students_table);
    let roster = report::filter_students(&students, Some(&class));
    let ids = roster_ids(&roster);

    let scores_table = match fetch(state, req, TableId::Scores) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let mut scores = model::scores_from(&scores_table);
    report::sort_scores_desc(&mut scores);
    let filtered = report::filter_scores(&scores, &filters, Some(&ids));

    let pages = report::total_pages(filtered.len(), pp.page_size);
    let page = report::resolve_page(pp.page, pp.filters_changed, pages);
    let names = name_map(&roster);
    let rows: Vec<serde_json::Value> = report::paginate(&filtered, page, pp.page_size)
        .iter()
        .map(|s| score_row(s, &names))
        .collect();

    let mut charts = serde_json::Map::new();
    for category in CATEGORIES {
        let in_category: Vec<model::Score> = filtered
            .iter()
            .filter(|s| s.category == category)
            .cloned()
            .collect();
        charts.insert(category.to_string(), json!(report::level_tally(&in_category)));
    }

    ok(
        &req.id,
        json!({
            "class": class,
            "rows": rows,
            "page": page,
            "totalPages": pages,
            "total": filtered.len(),
            "charts": charts,
        }),
    )
}

/// Principal-wide report over every class, optionally narrowed to one class,
/// with the overall level tally and the sparse category tally.
fn handle_school_scores(state: &mut AppState, req: &Request) -> serde_json::Value {
    let filters = match parse_filters(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let pp = page_params(req);

    let students_table = match fetch(state, req, TableId::Students) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let students = model::students_from(&students_table);
    let allowed = filters.class.as_deref().map(|class| {
        let roster = report::filter_students(&students, Some(class));
        roster_ids(&roster)
    });

    let scores_table = match fetch(state, req, TableId::Scores) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let mut scores = model::scores_from(&scores_table);
    report::sort_scores_desc(&mut scores);
    let filtered = report::filter_scores(&scores, &filters, allowed.as_ref());

    let pages = report::total_pages(filtered.len(), pp.page_size);
    let page = report::resolve_page(pp.page, pp.filters_changed, pages);
    let names = name_map(&students);
    let rows: Vec<serde_json::Value> = report::paginate(&filtered, page, pp.page_size)
        .iter()
        .map(|s| score_row(s, &names))
        .collect();

    ok(
        &req.id,
        json!({
            "rows": rows,
            "page": page,
            "totalPages": pages,
            "total": filtered.len(),
            "levels": report::level_tally(&filtered),
            "categories": report::category_tally(&filtered),
        }),
    )
}

/// Per-student rollup rows, paginated: totals, per-level counts, average,
/// most recent assessment.
fn handle_student_summary(state: &mut AppState, req: &Request) -> serde_json::Value {
    let filters = match parse_filters(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let pp = page_params(req);

    let students_table = match fetch(state, req, TableId::Students) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let students = model::students_from(&students_table);
    let roster = report::filter_students(&students, filters.class.as_deref());

    let scores_table = match fetch(state, req, TableId::Scores) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let scores = model::scores_from(&scores_table);
    // Membership comes from the rollup join itself; only the date window
    // narrows the score list here.
    let filtered = report::filter_scores(&scores, &filters, None);

    let rows = report::student_rollup(&roster, &filtered);
    let pages = report::total_pages(rows.len(), pp.page_size);
    let page = report::resolve_page(pp.page, pp.filters_changed, pages);
    let page_rows: Vec<serde_json::Value> = report::paginate(&rows, page, pp.page_size)
        .iter()
        .map(|r| json!(r))
        .collect();

    ok(
        &req.id,
        json!({
            "rows": page_rows,
            "page": page,
            "totalPages": pages,
            "total": rows.len(),
        }),
    )
}

/// Parent-portal view: one student's scores in sheet order, unpaginated.
fn handle_parent_scores(state: &mut AppState, req: &Request) -> serde_json::Value {
    let nisn = match required_str(req, "nisn") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let scores_table = match fetch(state, req, TableId::Scores) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let scores: Vec<serde_json::Value> = model::scores_from(&scores_table)
        .iter()
        .filter(|s| s.student_id == nisn)
        .map(score_json)
        .collect();
    ok(&req.id, json!({ "scores": scores }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "reports.classScores" => Some(handle_class_scores(state, req)),
        "reports.schoolScores" => Some(handle_school_scores(state, req)),
        "reports.studentSummary" => Some(handle_student_summary(state, req)),
        "reports.parentScores" => Some(handle_parent_scores(state, req)),
        _ => None,
    }
}
