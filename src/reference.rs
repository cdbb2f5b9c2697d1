// Bundled memorization curriculum: the reference list of assessable items.
// This is static data shipped with the portal, not a per-user table: the
// backing sheet only stores assessments against these item names.

use crate::model::{Hafalan, CATEGORY_DOA, CATEGORY_HADIST, CATEGORY_SURAH};
use crate::tabular::Table;

struct Item {
    category: &'static str,
    item_name: &'static str,
    /// Surah/doa/hadist lists are split across the school year; a None here
    /// would mean the category does not partition by semester.
    semester: Option<i64>,
}

const ITEMS: &[Item] = &[
    // Semester 1: short surahs
    Item { category: CATEGORY_SURAH, item_name: "Surah Al-Fatihah", semester: Some(1) },
    Item { category: CATEGORY_SURAH, item_name: "Surah An-Nas", semester: Some(1) },
    Item { category: CATEGORY_SURAH, item_name: "Surah Al-Falaq", semester: Some(1) },
    Item { category: CATEGORY_SURAH, item_name: "Surah Al-Ikhlas", semester: Some(1) },
    Item { category: CATEGORY_SURAH, item_name: "Surah Al-Lahab", semester: Some(1) },
    Item { category: CATEGORY_SURAH, item_name: "Surah An-Nasr", semester: Some(1) },
    // Semester 2: short surahs
    Item { category: CATEGORY_SURAH, item_name: "Surah Al-Kafirun", semester: Some(2) },
    Item { category: CATEGORY_SURAH, item_name: "Surah Al-Kautsar", semester: Some(2) },
    Item { category: CATEGORY_SURAH, item_name: "Surah Al-Ma'un", semester: Some(2) },
    Item { category: CATEGORY_SURAH, item_name: "Surah Quraisy", semester: Some(2) },
    Item { category: CATEGORY_SURAH, item_name: "Surah Al-Fil", semester: Some(2) },
    Item { category: CATEGORY_SURAH, item_name: "Surah Al-Humazah", semester: Some(2) },
    // Semester 1: daily prayers
    Item { category: CATEGORY_DOA, item_name: "Doa Sebelum Makan", semester: Some(1) },
    Item { category: CATEGORY_DOA, item_name: "Doa Sesudah Makan", semester: Some(1) },
    Item { category: CATEGORY_DOA, item_name: "Doa Sebelum Tidur", semester: Some(1) },
    Item { category: CATEGORY_DOA, item_name: "Doa Bangun Tidur", semester: Some(1) },
    Item { category: CATEGORY_DOA, item_name: "Doa Masuk Kamar Mandi", semester: Some(1) },
    Item { category: CATEGORY_DOA, item_name: "Doa Keluar Kamar Mandi", semester: Some(1) },
    // Semester 2: daily prayers
    Item { category: CATEGORY_DOA, item_name: "Doa Untuk Kedua Orang Tua", semester: Some(2) },
    Item { category: CATEGORY_DOA, item_name: "Doa Kebaikan Dunia Akhirat", semester: Some(2) },
    Item { category: CATEGORY_DOA, item_name: "Doa Masuk Masjid", semester: Some(2) },
    Item { category: CATEGORY_DOA, item_name: "Doa Keluar Masjid", semester: Some(2) },
    Item { category: CATEGORY_DOA, item_name: "Doa Naik Kendaraan", semester: Some(2) },
    Item { category: CATEGORY_DOA, item_name: "Doa Sebelum Belajar", semester: Some(2) },
    // Semester 1: hadist
    Item { category: CATEGORY_HADIST, item_name: "Hadist Kebersihan", semester: Some(1) },
    Item { category: CATEGORY_HADIST, item_name: "Hadist Senyum", semester: Some(1) },
    Item { category: CATEGORY_HADIST, item_name: "Hadist Kasih Sayang", semester: Some(1) },
    Item { category: CATEGORY_HADIST, item_name: "Hadist Menuntut Ilmu", semester: Some(1) },
    // Semester 2: hadist
    Item { category: CATEGORY_HADIST, item_name: "Hadist Jangan Marah", semester: Some(2) },
    Item { category: CATEGORY_HADIST, item_name: "Hadist Berkata Baik", semester: Some(2) },
    Item { category: CATEGORY_HADIST, item_name: "Hadist Sholat Tiang Agama", semester: Some(2) },
    Item { category: CATEGORY_HADIST, item_name: "Hadist Kasih Ibu", semester: Some(2) },
];

/// All curriculum items, optionally narrowed by category and semester.
pub fn hafalan_items(category: Option<&str>, semester: Option<i64>) -> Vec<Hafalan> {
    ITEMS
        .iter()
        .filter(|item| category.map(|c| item.category == c).unwrap_or(true))
        .filter(|item| match (semester, item.semester) {
            (Some(want), Some(have)) => want == have,
            // Asking for a semester excludes unpartitioned items; asking
            // without one matches everything.
            (Some(_), None) => false,
            (None, _) => true,
        })
        .map(|item| Hafalan {
            category: item.category.to_string(),
            item_name: item.item_name.to_string(),
            semester: item.semester,
        })
        .collect()
}

/// The curriculum list in the same row-oriented shape the CSV tables use, so
/// ingestion has one uniform output type across all table ids.
pub fn as_table() -> Table {
    Table {
        headers: vec!["Category".into(), "ItemName".into(), "Semester".into()],
        rows: ITEMS
            .iter()
            .map(|item| {
                vec![
                    item.category.to_string(),
                    item.item_name.to_string(),
                    item.semester.map(|s| s.to_string()).unwrap_or_default(),
                ]
            })
            .collect(),
    }
}
