use crate::ipc::error::{err, ok};
use crate::ipc::types::{AppState, Request};
use crate::sheets::SheetSource;
use serde_json::json;

fn handle_health(state: &mut AppState, req: &Request) -> serde_json::Value {
    ok(
        &req.id,
        json!({
            "version": env!("CARGO_PKG_VERSION"),
            "sourceSelected": state.source.is_some()
        }),
    )
}

/// Point the sidecar at one deployment's published-CSV exports and web-app
/// endpoint. Nothing else works until this has been called.
fn handle_source_select(state: &mut AppState, req: &Request) -> serde_json::Value {
    let source: SheetSource = match serde_json::from_value(req.params.clone()) {
        Ok(v) => v,
        Err(e) => return err(&req.id, "bad_params", e.to_string(), None),
    };
    log::info!("sheet source selected, web app at {}", source.web_app_url);
    let web_app_url = source.web_app_url.clone();
    state.source = Some(source);
    ok(&req.id, json!({ "webAppUrl": web_app_url }))
}

pub fn try_handle(state: &mut AppState, req: &Request) -> Option<serde_json::Value> {
    match req.method.as_str() {
        "health" => Some(handle_health(state, req)),
        "source.select" => Some(handle_source_select(state, req)),
        _ => None,
    }
}
