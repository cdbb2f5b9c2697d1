use crate::ipc::error::ok;
use crate::ipc::helpers::{fetch, optional_str, page_params};
use crate::ipc::types::{AppState, Request};
use crate::model;
use crate::report;
use crate::sheets::TableId;
use serde_json::json;

fn handle_teachers_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let table = match fetch(state, req, TableId::Teachers) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let teachers: Vec<serde_json::Value> = model::teachers_from(&table)
        .iter()
        .map(|t| json!({ "name": t.name, "phone": t.phone, "class": t.class }))
        .collect();
    ok(&req.id, json!({ "teachers": teachers }))
}

/// Paginated class roster. An absent class (or "all") lists every student.
fn handle_students_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let class = optional_str(req, "class").filter(|c| !c.eq_ignore_ascii_case("all"));
    let pp = page_params(req);

    let table = match fetch(state, req, TableId::Students) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let students = model::students_from(&table);
    let roster = report::filter_students(&students, class.as_deref());

    let pages = report::total_pages(roster.len(), pp.page_size);
    let page = report::resolve_page(pp.page, pp.filters_changed, pages);
    let rows: Vec<serde_json::Value> = report::paginate(&roster, page, pp.page_size)
        .iter()
        .map(|s| json!({ "name": s.name, "nisn": s.nisn, "class": s.class }))
        .collect();

    ok(
        &req.id,
        json!({
            "students": rows,
            "page": page,
            "totalPages": pages,
            "total": roster.len()
        }),
    )
}

/// Distinct non-empty classes, in student-table order. Feeds the class
/// dropdowns on the principal screens.
fn handle_classes_list(state: &mut AppState, req: &Request) -> serde_json::Value {
    let table = match fetch(state, req, TableId::Students) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let mut classes: Vec<String> = Vec::new();
    for student in model::students_from(&table) {
        if !student.class.is_empty() && !classes.contains(&student.class) {
            classes.push(student.class);
        }
    }
    ok(&req.id, json!({ "classes": classes }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "teachers.list" => Some(handle_teachers_list(state, req)),
        "students.list" => Some(handle_students_list(state, req)),
        "classes.list" => Some(handle_classes_list(state, req)),
        _ => None,
    }
}
