use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::model::{Score, ScoreLevel, Student, SCORE_LEVELS};

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct ReportError {
    pub code: String,
    pub message: String,
}

impl ReportError {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
        }
    }
}

/// View filters shared by every reporting screen. An absent or empty value
/// places no restriction on that field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilters {
    pub student_id: Option<String>,
    pub class: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

pub fn parse_report_filters(raw: Option<&serde_json::Value>) -> Result<ReportFilters, ReportError> {
    let Some(raw) = raw else {
        return Ok(ReportFilters::default());
    };
    if raw.is_null() {
        return Ok(ReportFilters::default());
    }
    let Some(obj) = raw.as_object() else {
        return Err(ReportError::new("bad_params", "filters must be an object"));
    };

    let field = |key: &str| -> Result<Option<String>, ReportError> {
        match obj.get(key) {
            None => Ok(None),
            Some(v) if v.is_null() => Ok(None),
            Some(v) => {
                let Some(s) = v.as_str() else {
                    return Err(ReportError::new(
                        "bad_params",
                        format!("filters.{} must be a string", key),
                    ));
                };
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(trimmed.to_string()))
                }
            }
        }
    };

    // "all" in the class dropdown means no restriction.
    let class = field("class")?.filter(|c| !c.eq_ignore_ascii_case("all"));

    Ok(ReportFilters {
        student_id: field("studentId")?,
        class,
        start_date: field("startDate")?,
        end_date: field("endDate")?,
    })
}

/// Apply the view filters to a score sequence. The date bounds are an
/// inclusive *lexical* comparison, valid because dates are zero-padded ISO
/// strings, and kept that way for parity with the sheets already exported.
/// `allowed_ids`, when present, scopes scores to a class roster by NISN.
pub fn filter_scores(
    scores: &[Score],
    filters: &ReportFilters,
    allowed_ids: Option<&HashSet<String>>,
) -> Vec<Score> {
    scores
        .iter()
        .filter(|s| {
            allowed_ids
                .map(|ids| ids.contains(&s.student_id))
                .unwrap_or(true)
        })
        .filter(|s| {
            filters
                .student_id
                .as_deref()
                .map(|id| s.student_id == id)
                .unwrap_or(true)
        })
        .filter(|s| {
            filters
                .start_date
                .as_deref()
                .map(|start| s.date.as_str() >= start)
                .unwrap_or(true)
        })
        .filter(|s| {
            filters
                .end_date
                .as_deref()
                .map(|end| s.date.as_str() <= end)
                .unwrap_or(true)
        })
        .cloned()
        .collect()
}

pub fn filter_students(students: &[Student], class: Option<&str>) -> Vec<Student> {
    students
        .iter()
        .filter(|s| class.map(|c| s.class == c).unwrap_or(true))
        .cloned()
        .collect()
}

pub fn total_pages(len: usize, page_size: usize) -> usize {
    len.div_ceil(page_size)
}

/// The page-reset rule as a pure derivation: any filter change lands the view
/// back on page 1, otherwise the requested page is clamped into range. Every
/// paginated view resolves its page through here.
pub fn resolve_page(requested: usize, filters_changed: bool, total_pages: usize) -> usize {
    if filters_changed {
        return 1;
    }
    requested.clamp(1, total_pages.max(1))
}

/// Slice for a 1-based page. Callers resolve the page first; an out-of-range
/// page yields an empty slice rather than a panic.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = (start + page_size).min(items.len());
    &items[start..end]
}

fn percent_of(count: usize, total: usize) -> i64 {
    if total == 0 {
        return 0;
    }
    (count as f64 * 100.0 / total as f64).round() as i64
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelTally {
    pub level: &'static str,
    pub count: usize,
    pub percent: i64,
}

/// Dense tally over the closed level enumeration: all four levels appear even
/// at zero count. Unrecognized levels stay out of the counts but remain part
/// of the filtered total the percentages are taken against.
pub fn level_tally(scores: &[Score]) -> Vec<LevelTally> {
    let mut counts: HashMap<ScoreLevel, usize> = HashMap::new();
    for score in scores {
        if let Some(level) = score.level() {
            *counts.entry(level).or_insert(0) += 1;
        }
    }
    let total = scores.len();
    SCORE_LEVELS
        .iter()
        .map(|level| {
            let count = counts.get(level).copied().unwrap_or(0);
            LevelTally {
                level: level.as_str(),
                count,
                percent: percent_of(count, total),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTally {
    pub category: String,
    pub count: usize,
    pub percent: i64,
}

/// Sparse tally: only categories actually observed, descending by count,
/// first-observed order on ties.
pub fn category_tally(scores: &[Score]) -> Vec<CategoryTally> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for score in scores {
        if !counts.contains_key(&score.category) {
            order.push(score.category.clone());
        }
        *counts.entry(score.category.clone()).or_insert(0) += 1;
    }
    let total = scores.len();
    let mut out: Vec<CategoryTally> = order
        .into_iter()
        .map(|category| {
            let count = counts[&category];
            CategoryTally {
                category,
                count,
                percent: percent_of(count, total),
            }
        })
        .collect();
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateTally {
    pub date: String,
    pub count: usize,
}

/// Per-date counts, ascending by date string, for a chart time axis.
pub fn date_tally(scores: &[Score]) -> Vec<DateTally> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for score in scores {
        *counts.entry(score.date.clone()).or_insert(0) += 1;
    }
    let mut out: Vec<DateTally> = counts
        .into_iter()
        .map(|(date, count)| DateTally { date, count })
        .collect();
    out.sort_by(|a, b| a.date.cmp(&b.date));
    out
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// Newest-first report ordering. Unlike the range filter this compares parsed
/// dates, not strings; rows whose date does not parse sort as oldest.
pub fn sort_scores_desc(scores: &mut [Score]) {
    scores.sort_by(|a, b| {
        let da = parse_date(&a.date).unwrap_or(NaiveDate::MIN);
        let db = parse_date(&b.date).unwrap_or(NaiveDate::MIN);
        db.cmp(&da)
    });
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub nisn: String,
    pub name: String,
    pub class: String,
    pub total: usize,
    pub bb: usize,
    pub mb: usize,
    pub bsh: usize,
    pub bsb: usize,
    /// Mean of BB→1 … BSB→4 over recognized levels, one decimal digit;
    /// "0" when the student has no recognized scores.
    pub average: String,
    /// Most recent assessment date by parsed-date comparison, "-" when none.
    pub last_date: String,
}

/// One summary row per student, descending by total assessment count;
/// student-table order on ties (the sort is stable).
pub fn student_rollup(students: &[Student], scores: &[Score]) -> Vec<StudentSummary> {
    let mut by_student: HashMap<&str, Vec<&Score>> = HashMap::new();
    for score in scores {
        by_student
            .entry(score.student_id.as_str())
            .or_default()
            .push(score);
    }

    let mut rows: Vec<StudentSummary> = students
        .iter()
        .map(|student| {
            let own = by_student.get(student.nisn.as_str());
            let mut counts = [0usize; 4];
            let mut numeric_sum = 0i64;
            let mut numeric_count = 0usize;
            let mut last: Option<NaiveDate> = None;
            let mut total = 0usize;

            for score in own.into_iter().flatten() {
                total += 1;
                if let Some(level) = score.level() {
                    counts[(level.numeric() - 1) as usize] += 1;
                    numeric_sum += level.numeric();
                    numeric_count += 1;
                }
                if let Some(date) = parse_date(&score.date) {
                    last = Some(last.map(|prev| prev.max(date)).unwrap_or(date));
                }
            }

            let average = if numeric_count > 0 {
                format!("{:.1}", numeric_sum as f64 / numeric_count as f64)
            } else {
                "0".to_string()
            };

            StudentSummary {
                nisn: student.nisn.clone(),
                name: student.name.clone(),
                class: student.class.clone(),
                total,
                bb: counts[0],
                mb: counts[1],
                bsh: counts[2],
                bsb: counts[3],
                average,
                last_date: last
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "-".to_string()),
            }
        })
        .collect();

    rows.sort_by(|a, b| b.total.cmp(&a.total));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(id: &str, category: &str, level: &str, date: &str) -> Score {
        Score {
            student_id: id.to_string(),
            category: category.to_string(),
            item_name: "Item".to_string(),
            score: level.to_string(),
            date: date.to_string(),
            notes: String::new(),
            timestamp: String::new(),
        }
    }

    fn student(nisn: &str, name: &str, class: &str) -> Student {
        Student {
            name: name.to_string(),
            nisn: nisn.to_string(),
            class: class.to_string(),
        }
    }

    #[test]
    fn level_tally_is_dense_over_all_four_levels() {
        let scores = vec![
            score("1", "c", "BSH", "2024-01-01"),
            score("1", "c", "BSH", "2024-01-02"),
            score("1", "c", "BB", "2024-01-03"),
            score("1", "c", "MB", "2024-01-04"),
        ];
        let tally = level_tally(&scores);
        assert_eq!(tally.len(), 4);
        assert_eq!((tally[0].level, tally[0].count, tally[0].percent), ("BB", 1, 25));
        assert_eq!((tally[1].level, tally[1].count, tally[1].percent), ("MB", 1, 25));
        assert_eq!((tally[2].level, tally[2].count, tally[2].percent), ("BSH", 2, 50));
        assert_eq!((tally[3].level, tally[3].count, tally[3].percent), ("BSB", 0, 0));
    }

    #[test]
    fn level_tally_excludes_unknown_but_keeps_it_in_total() {
        let scores = vec![
            score("1", "c", "BSH", "2024-01-01"),
            score("1", "c", "??", "2024-01-02"),
        ];
        let tally = level_tally(&scores);
        let bsh = tally.iter().find(|t| t.level == "BSH").expect("bsh entry");
        assert_eq!(bsh.count, 1);
        assert_eq!(bsh.percent, 50);
        assert_eq!(tally.iter().map(|t| t.count).sum::<usize>(), 1);
    }

    #[test]
    fn level_tally_on_empty_input_is_all_zero() {
        for t in level_tally(&[]) {
            assert_eq!(t.count, 0);
            assert_eq!(t.percent, 0);
        }
    }

    #[test]
    fn category_tally_is_sparse_and_sorted_descending() {
        let scores = vec![
            score("1", "Hafalan Hadist", "BB", "2024-01-01"),
            score("1", "Hafalan Surah Pendek", "BB", "2024-01-01"),
            score("1", "Hafalan Surah Pendek", "MB", "2024-01-02"),
            score("1", "Hafalan Hadist", "BB", "2024-01-03"),
            score("1", "Hafalan Surah Pendek", "BSB", "2024-01-04"),
        ];
        let tally = category_tally(&scores);
        assert_eq!(tally.len(), 2);
        assert_eq!(tally[0].category, "Hafalan Surah Pendek");
        assert_eq!(tally[0].count, 3);
        assert_eq!(tally[0].percent, 60);
        assert_eq!(tally[1].category, "Hafalan Hadist");
        assert_eq!(tally[1].count, 2);
    }

    #[test]
    fn category_tally_ties_keep_first_observed_order() {
        let scores = vec![
            score("1", "Hafalan Doa Sehari-hari", "BB", "2024-01-01"),
            score("1", "Hafalan Hadist", "BB", "2024-01-01"),
        ];
        let tally = category_tally(&scores);
        assert_eq!(tally[0].category, "Hafalan Doa Sehari-hari");
        assert_eq!(tally[1].category, "Hafalan Hadist");
    }

    #[test]
    fn date_range_filter_is_inclusive_and_lexical() {
        let scores = vec![score("1", "c", "BB", "2024-03-05")];
        let filters = ReportFilters {
            start_date: Some("2024-03-05".to_string()),
            end_date: Some("2024-03-05".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_scores(&scores, &filters, None).len(), 1);

        let before = ReportFilters {
            end_date: Some("2024-03-04".to_string()),
            ..Default::default()
        };
        assert!(filter_scores(&scores, &before, None).is_empty());
    }

    #[test]
    fn filter_by_student_and_membership() {
        let scores = vec![
            score("1001", "c", "BB", "2024-01-01"),
            score("1002", "c", "BB", "2024-01-02"),
            score("9999", "c", "BB", "2024-01-03"),
        ];
        let allowed: HashSet<String> = ["1001".to_string(), "1002".to_string()].into();
        let scoped = filter_scores(&scores, &ReportFilters::default(), Some(&allowed));
        assert_eq!(scoped.len(), 2);

        let one = ReportFilters {
            student_id: Some("1002".to_string()),
            ..Default::default()
        };
        let only = filter_scores(&scores, &one, Some(&allowed));
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].student_id, "1002");
    }

    #[test]
    fn pagination_reconstructs_the_sequence() {
        let items: Vec<i32> = (0..23).collect();
        let pages = total_pages(items.len(), 10);
        assert_eq!(pages, 3);
        let mut rebuilt = Vec::new();
        for page in 1..=pages {
            rebuilt.extend_from_slice(paginate(&items, page, 10));
        }
        assert_eq!(rebuilt, items);
        assert_eq!(paginate(&items, 3, 10).len(), 3);
        assert!(paginate(&items, 4, 10).is_empty());
        assert_eq!(total_pages(0, 10), 0);
    }

    #[test]
    fn resolve_page_resets_on_filter_change_and_clamps() {
        assert_eq!(resolve_page(5, true, 9), 1);
        assert_eq!(resolve_page(5, false, 3), 3);
        assert_eq!(resolve_page(0, false, 3), 1);
        assert_eq!(resolve_page(2, false, 0), 1);
        assert_eq!(resolve_page(2, false, 3), 2);
    }

    #[test]
    fn rollup_average_and_counts() {
        let students = vec![student("1001", "Ali", "A")];
        let scores = vec![
            score("1001", "c", "BB", "2024-01-01"),
            score("1001", "c", "BSH", "2024-01-03"),
            score("1001", "c", "BSH", "2024-01-02"),
        ];
        let rows = student_rollup(&students, &scores);
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.total, 3);
        assert_eq!(row.bb, 1);
        assert_eq!(row.bsh, 2);
        assert_eq!(row.average, "2.3");
        assert_eq!(row.last_date, "2024-01-03");
    }

    #[test]
    fn rollup_without_scores_has_zero_average_and_dash_date() {
        let students = vec![student("1001", "Ali", "A")];
        let rows = student_rollup(&students, &[]);
        assert_eq!(rows[0].total, 0);
        assert_eq!(rows[0].average, "0");
        assert_eq!(rows[0].last_date, "-");
    }

    #[test]
    fn rollup_sorts_by_total_desc_with_stable_ties() {
        let students = vec![
            student("1", "First", "A"),
            student("2", "Second", "A"),
            student("3", "Third", "A"),
        ];
        let scores = vec![
            score("2", "c", "BB", "2024-01-01"),
            score("2", "c", "BB", "2024-01-02"),
            score("1", "c", "BB", "2024-01-01"),
            score("3", "c", "BB", "2024-01-01"),
        ];
        let rows = student_rollup(&students, &scores);
        assert_eq!(rows[0].nisn, "2");
        // 1 and 3 tie on total; student-table order is preserved.
        assert_eq!(rows[1].nisn, "1");
        assert_eq!(rows[2].nisn, "3");
    }

    #[test]
    fn rollup_unknown_levels_count_toward_total_only() {
        let students = vec![student("1", "Ali", "A")];
        let scores = vec![
            score("1", "c", "BSB", "2024-01-01"),
            score("1", "c", "??", "2024-01-02"),
        ];
        let rows = student_rollup(&students, &scores);
        assert_eq!(rows[0].total, 2);
        assert_eq!(rows[0].bsb, 1);
        assert_eq!(rows[0].average, "4.0");
    }

    #[test]
    fn sort_scores_desc_is_newest_first() {
        let mut scores = vec![
            score("1", "c", "BB", "2024-01-02"),
            score("1", "c", "BB", "not-a-date"),
            score("1", "c", "BB", "2024-02-01"),
        ];
        sort_scores_desc(&mut scores);
        assert_eq!(scores[0].date, "2024-02-01");
        assert_eq!(scores[1].date, "2024-01-02");
        assert_eq!(scores[2].date, "not-a-date");
    }

    #[test]
    fn parse_filters_treats_empty_and_all_as_unrestricted() {
        let raw = serde_json::json!({
            "studentId": "",
            "class": "ALL",
            "startDate": null,
            "endDate": "2024-06-30"
        });
        let parsed = parse_report_filters(Some(&raw)).expect("parse filters");
        assert_eq!(parsed.student_id, None);
        assert_eq!(parsed.class, None);
        assert_eq!(parsed.start_date, None);
        assert_eq!(parsed.end_date.as_deref(), Some("2024-06-30"));
    }

    #[test]
    fn parse_filters_rejects_non_object() {
        let raw = serde_json::json!("nope");
        assert!(parse_report_filters(Some(&raw)).is_err());
    }
}
