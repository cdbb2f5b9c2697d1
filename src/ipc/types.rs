use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::sheets::SheetSource;

#[derive(Debug, Deserialize, Clone)]
pub struct Request {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

pub struct AppState {
    pub source: Option<SheetSource>,
    pub http: Client,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            source: None,
            http: Client::builder()
                .user_agent(concat!("rapord/", env!("CARGO_PKG_VERSION")))
                .timeout(Duration::from_secs(60))
                .build()
                .expect("build http client"),
        }
    }
}
