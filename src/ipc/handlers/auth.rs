use crate::ipc::error::{err, ok};
use crate::ipc::helpers::{fetch, required_str};
use crate::ipc::types::{AppState, Request};
use crate::model;
use crate::sheets::TableId;
use serde_json::json;

// Login is a plaintext field match against the relevant table: teachers and
// principals log in with their phone number, parents with the student NISN.
// The tables are public exports; this gates screens, it is not a credential
// system.

fn handle_login_teacher(state: &mut AppState, req: &Request) -> serde_json::Value {
    let pin = match required_str(req, "pin") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let table = match fetch(state, req, TableId::Teachers) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let teachers = model::teachers_from(&table);
    match teachers.iter().find(|t| t.phone == pin) {
        Some(t) => ok(
            &req.id,
            json!({ "teacher": { "name": t.name, "phone": t.phone, "class": t.class } }),
        ),
        None => err(&req.id, "not_found", "no matching teacher record", None),
    }
}

fn handle_login_parent(state: &mut AppState, req: &Request) -> serde_json::Value {
    let pin = match required_str(req, "pin") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let table = match fetch(state, req, TableId::Students) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let students = model::students_from(&table);
    match students.iter().find(|s| s.nisn == pin) {
        Some(s) => ok(
            &req.id,
            json!({ "student": { "name": s.name, "nisn": s.nisn, "class": s.class } }),
        ),
        None => err(&req.id, "not_found", "no matching student record", None),
    }
}

fn handle_login_principal(state: &mut AppState, req: &Request) -> serde_json::Value {
    let pin = match required_str(req, "pin") {
        Ok(v) => v,
        Err(e) => return e,
    };
    let table = match fetch(state, req, TableId::Principals) {
        Ok(v) => v,
        Err(e) => return e,
    };
    let principals = model::principals_from(&table);
    match principals.iter().find(|p| p.phone == pin) {
        Some(p) => ok(
            &req.id,
            json!({ "principal": { "name": p.name, "phone": p.phone } }),
        ),
        None => err(&req.id, "not_found", "no matching principal record", None),
    }
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "login.teacher" => Some(handle_login_teacher(state, req)),
        "login.parent" => Some(handle_login_parent(state, req)),
        "login.principal" => Some(handle_login_principal(state, req)),
        _ => None,
    }
}
