use serde::{Deserialize, Serialize};

use crate::tabular::Table;

pub const CATEGORY_SURAH: &str = "Hafalan Surah Pendek";
pub const CATEGORY_DOA: &str = "Hafalan Doa Sehari-hari";
pub const CATEGORY_HADIST: &str = "Hafalan Hadist";

pub const CATEGORIES: [&str; 3] = [CATEGORY_SURAH, CATEGORY_DOA, CATEGORY_HADIST];

/// The four-level ordinal assessment scale, lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ScoreLevel {
    BB,
    MB,
    BSH,
    BSB,
}

pub const SCORE_LEVELS: [ScoreLevel; 4] =
    [ScoreLevel::BB, ScoreLevel::MB, ScoreLevel::BSH, ScoreLevel::BSB];

impl ScoreLevel {
    /// Anything outside the four known codes is an "unknown" level: kept in
    /// record sequences but excluded from level tallies and averages.
    pub fn parse(raw: &str) -> Option<ScoreLevel> {
        match raw {
            "BB" => Some(ScoreLevel::BB),
            "MB" => Some(ScoreLevel::MB),
            "BSH" => Some(ScoreLevel::BSH),
            "BSB" => Some(ScoreLevel::BSB),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScoreLevel::BB => "BB",
            ScoreLevel::MB => "MB",
            ScoreLevel::BSH => "BSH",
            ScoreLevel::BSB => "BSB",
        }
    }

    pub fn numeric(self) -> i64 {
        match self {
            ScoreLevel::BB => 1,
            ScoreLevel::MB => 2,
            ScoreLevel::BSH => 3,
            ScoreLevel::BSB => 4,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Teacher {
    pub name: String,
    pub phone: String,
    pub class: String,
}

#[derive(Debug, Clone)]
pub struct Student {
    pub name: String,
    pub nisn: String,
    pub class: String,
}

#[derive(Debug, Clone)]
pub struct Principal {
    pub name: String,
    pub phone: String,
}

/// One assessment record. Serialization uses the backing sheet's column
/// names because the remote write endpoint expects exactly those keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Score {
    #[serde(rename = "Student ID")]
    pub student_id: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Item Name")]
    pub item_name: String,
    #[serde(rename = "Score")]
    pub score: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Notes")]
    pub notes: String,
    /// Server-assigned, opaque; present only after persistence.
    #[serde(rename = "Timestamp", default, skip_serializing_if = "String::is_empty")]
    pub timestamp: String,
}

impl Score {
    pub fn level(&self) -> Option<ScoreLevel> {
        ScoreLevel::parse(&self.score)
    }
}

/// Curriculum reference item. Not persisted per user; some categories
/// partition their items by semester, others do not.
#[derive(Debug, Clone)]
pub struct Hafalan {
    pub category: String,
    pub item_name: String,
    pub semester: Option<i64>,
}

pub fn teachers_from(table: &Table) -> Vec<Teacher> {
    table
        .rows
        .iter()
        .map(|row| Teacher {
            name: table.field(row, "Name").to_string(),
            phone: table.field(row, "Phone").to_string(),
            class: table.field(row, "Class").to_string(),
        })
        .collect()
}

pub fn students_from(table: &Table) -> Vec<Student> {
    table
        .rows
        .iter()
        .map(|row| Student {
            name: table.field(row, "Name").to_string(),
            nisn: table.field(row, "NISN").to_string(),
            class: table.field(row, "Class").to_string(),
        })
        .collect()
}

pub fn principals_from(table: &Table) -> Vec<Principal> {
    table
        .rows
        .iter()
        .map(|row| Principal {
            name: table.field(row, "Name").to_string(),
            phone: table.field(row, "Phone").to_string(),
        })
        .collect()
}

pub fn scores_from(table: &Table) -> Vec<Score> {
    table
        .rows
        .iter()
        .map(|row| Score {
            student_id: table.field(row, "Student ID").to_string(),
            category: table.field(row, "Category").to_string(),
            item_name: table.field(row, "Item Name").to_string(),
            score: table.field(row, "Score").to_string(),
            date: table.field(row, "Date").to_string(),
            notes: table.field(row, "Notes").to_string(),
            timestamp: table.field(row, "Timestamp").to_string(),
        })
        .collect()
}

pub fn hafalan_from(table: &Table) -> Vec<Hafalan> {
    table
        .rows
        .iter()
        .map(|row| Hafalan {
            category: table.field(row, "Category").to_string(),
            item_name: table.field(row, "ItemName").to_string(),
            semester: table.field(row, "Semester").parse::<i64>().ok(),
        })
        .collect()
}
