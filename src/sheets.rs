use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::Score;
use crate::reference;
use crate::tabular::{parse_table, Table};

/// The named tables the portal reads. The first four are published CSV
/// exports; the curriculum list is bundled and never touches the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableId {
    Teachers,
    Students,
    Principals,
    Scores,
    HafalanItems,
}

impl TableId {
    /// Sheet name as it appears in user-facing fetch errors.
    pub fn label(self) -> &'static str {
        match self {
            TableId::Teachers => "Teacher",
            TableId::Students => "Student",
            TableId::Principals => "Principal",
            TableId::Scores => "Score",
            TableId::HafalanItems => "Hafalan",
        }
    }
}

/// Endpoints for one deployment: a published CSV URL per table plus the
/// web-app URL used for score mutations. Supplied once via `source.select`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetSource {
    pub teachers_url: String,
    pub students_url: String,
    pub principals_url: String,
    pub scores_url: String,
    pub web_app_url: String,
}

impl SheetSource {
    fn csv_url(&self, table: TableId) -> Option<&str> {
        match table {
            TableId::Teachers => Some(&self.teachers_url),
            TableId::Students => Some(&self.students_url),
            TableId::Principals => Some(&self.principals_url),
            TableId::Scores => Some(&self.scores_url),
            TableId::HafalanItems => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SheetError {
    /// Transport failure or non-success status on a table read. Malformed
    /// rows are never an error; only failing to reach the source is.
    #[error("error fetching {table} CSV data: {detail}")]
    Fetch { table: &'static str, detail: String },
    /// Transport failure or non-success status on the write endpoint.
    #[error("server responded with an error: {detail}")]
    Submit { detail: String },
    /// The write endpoint answered `success: false`.
    #[error("{message}")]
    Rejected { message: String },
}

impl SheetError {
    pub fn code(&self) -> &'static str {
        match self {
            SheetError::Fetch { .. } => "fetch_failed",
            SheetError::Submit { .. } => "submit_failed",
            SheetError::Rejected { .. } => "submit_rejected",
        }
    }
}

/// Fetch and parse one named table. Every call re-fetches; no retry, no
/// cache. A row that fails the shape check is dropped by the parser, but a
/// source that cannot be reached fails the whole call.
pub fn fetch_table(client: &Client, source: &SheetSource, table: TableId) -> Result<Table, SheetError> {
    let Some(url) = source.csv_url(table) else {
        return Ok(reference::as_table());
    };

    let fetch_err = |detail: String| SheetError::Fetch {
        table: table.label(),
        detail,
    };

    let response = client.get(url).send().map_err(|e| fetch_err(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(fetch_err(format!("status {}", status)));
    }
    let text = response.text().map_err(|e| fetch_err(e.to_string()))?;

    let parsed = parse_table(&text);
    log::debug!("fetched {} rows from {}", parsed.rows.len(), url);
    Ok(parsed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreAction {
    Add,
    Update,
    Delete,
}

impl ScoreAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ScoreAction::Add => "addScore",
            ScoreAction::Update => "updateScore",
            ScoreAction::Delete => "deleteScore",
        }
    }

    // User-facing defaults when the server acknowledges without a message.
    fn success_fallback(self) -> &'static str {
        match self {
            ScoreAction::Add => "Penilaian berhasil dikirim!",
            ScoreAction::Update => "Penilaian berhasil diupdate!",
            ScoreAction::Delete => "Penilaian berhasil dihapus!",
        }
    }

    fn reject_fallback(self) -> &'static str {
        match self {
            ScoreAction::Add => {
                "Terjadi kesalahan di server, namun server tidak memberikan detail."
            }
            ScoreAction::Update | ScoreAction::Delete => "Terjadi kesalahan di server.",
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    action: &'static str,
    data: &'a Score,
}

#[derive(Deserialize)]
struct SubmitAck {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// Post one score mutation to the web app and interpret its acknowledgement.
/// The body is JSON but declared text/plain: the Apps Script endpoint only
/// exposes raw POST contents for that content type across origins.
pub fn submit_score(
    client: &Client,
    source: &SheetSource,
    action: ScoreAction,
    score: &Score,
) -> Result<String, SheetError> {
    let envelope = Envelope {
        action: action.as_str(),
        data: score,
    };
    let body = serde_json::to_string(&envelope).map_err(|e| SheetError::Submit {
        detail: e.to_string(),
    })?;

    let response = client
        .post(&source.web_app_url)
        .header(reqwest::header::CONTENT_TYPE, "text/plain;charset=utf-8")
        .body(body)
        .send()
        .map_err(|e| SheetError::Submit {
            detail: e.to_string(),
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(SheetError::Submit {
            detail: status.to_string(),
        });
    }

    let ack: SubmitAck = response.json().map_err(|e| SheetError::Submit {
        detail: e.to_string(),
    })?;

    if ack.success {
        Ok(ack
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| action.success_fallback().to_string()))
    } else {
        Err(SheetError::Rejected {
            message: ack
                .message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| action.reject_fallback().to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hafalan_table_is_served_without_a_source_url() {
        let source = SheetSource {
            teachers_url: "http://127.0.0.1:1/t".into(),
            students_url: "http://127.0.0.1:1/s".into(),
            principals_url: "http://127.0.0.1:1/p".into(),
            scores_url: "http://127.0.0.1:1/sc".into(),
            web_app_url: "http://127.0.0.1:1/app".into(),
        };
        let client = Client::new();
        // Port 1 would refuse; the hafalan arm must not touch the network.
        let table = fetch_table(&client, &source, TableId::HafalanItems).expect("static table");
        assert!(!table.rows.is_empty());
        assert_eq!(table.headers[0], "Category");
    }

    #[test]
    fn envelope_uses_sheet_column_names_and_action_codes() {
        let score = Score {
            student_id: "1001".into(),
            category: "Hafalan Hadist".into(),
            item_name: "Hadist Senyum".into(),
            score: "BSH".into(),
            date: "2024-03-05".into(),
            notes: "bagus".into(),
            timestamp: String::new(),
        };
        let envelope = Envelope {
            action: ScoreAction::Update.as_str(),
            data: &score,
        };
        let v = serde_json::to_value(&envelope).expect("serialize envelope");
        assert_eq!(v["action"], "updateScore");
        assert_eq!(v["data"]["Student ID"], "1001");
        assert_eq!(v["data"]["Item Name"], "Hadist Senyum");
    }

    #[test]
    fn table_labels_match_sheet_names() {
        assert_eq!(TableId::Teachers.label(), "Teacher");
        assert_eq!(TableId::Scores.label(), "Score");
    }
}
