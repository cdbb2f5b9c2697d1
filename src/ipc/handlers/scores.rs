use crate::ipc::error::ok;
use crate::ipc::helpers::{optional_str, required_str, sheet_err, source};
use crate::ipc::types::{AppState, Request};
use crate::model::Score;
use crate::sheets::{self, ScoreAction};
use serde_json::json;

// The write path. Required selections are checked before any network call;
// only a fully-formed record is posted. The UI refetches its report after a
// successful mutation; there is no optimistic merge here.

fn score_from_params(req: &Request) -> Result<Score, serde_json::Value> {
    Ok(Score {
        student_id: required_str(req, "studentId")?,
        category: required_str(req, "category")?,
        item_name: required_str(req, "itemName")?,
        score: required_str(req, "score")?,
        date: required_str(req, "date")?,
        notes: optional_str(req, "notes").unwrap_or_default(),
        timestamp: optional_str(req, "timestamp").unwrap_or_default(),
    })
}

fn submit(state: &mut AppState, req: &Request, action: ScoreAction, score: &Score) -> serde_json::Value {
    let src = match source(state, req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    match sheets::submit_score(&state.http, src, action, score) {
        Ok(message) => ok(&req.id, json!({ "message": message })),
        Err(e) => {
            log::warn!("{} failed: {}", action.as_str(), e);
            sheet_err(req, e)
        }
    }
}

fn handle_add(state: &mut AppState, req: &Request) -> serde_json::Value {
    let score = match score_from_params(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    submit(state, req, ScoreAction::Add, &score)
}

fn handle_update(state: &mut AppState, req: &Request) -> serde_json::Value {
    let score = match score_from_params(req) {
        Ok(v) => v,
        Err(e) => return e,
    };
    submit(state, req, ScoreAction::Update, &score)
}

/// Delete posts the record as the UI holds it; identification is the
/// server's concern (it matches on the stored row, timestamp included).
fn handle_delete(state: &mut AppState, req: &Request) -> serde_json::Value {
    let score = Score {
        student_id: match required_str(req, "studentId") {
            Ok(v) => v,
            Err(e) => return e,
        },
        category: optional_str(req, "category").unwrap_or_default(),
        item_name: optional_str(req, "itemName").unwrap_or_default(),
        score: optional_str(req, "score").unwrap_or_default(),
        date: optional_str(req, "date").unwrap_or_default(),
        notes: optional_str(req, "notes").unwrap_or_default(),
        timestamp: optional_str(req, "timestamp").unwrap_or_default(),
    };
    submit(state, req, ScoreAction::Delete, &score)
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "scores.add" => Some(handle_add(state, req)),
        "scores.update" => Some(handle_update(state, req)),
        "scores.delete" => Some(handle_delete(state, req)),
        _ => None,
    }
}
