use std::collections::BTreeSet;
use std::ops::Deref;

use super::model::{CellValue, Table};
use super::stats;

// ---------------------------------------------------------------------------
// NormalizedTable – read-only output of the cleaning pipeline
// ---------------------------------------------------------------------------

/// A cleaned passenger table. Only reachable through [`normalize`] and
/// never mutated afterwards; filtered views are new tables.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable(Table);

impl Deref for NormalizedTable {
    type Target = Table;

    fn deref(&self) -> &Table {
        &self.0
    }
}

impl NormalizedTable {
    /// Give back the underlying table, e.g. to feed it through
    /// [`normalize`] again.
    pub fn into_inner(self) -> Table {
        self.0
    }
}

// ---------------------------------------------------------------------------
// Cleaning rules
// ---------------------------------------------------------------------------

/// One presence-gated cleaning step.
pub struct CleaningRule {
    pub name: &'static str,
    /// The rule runs only when every one of these columns exists.
    pub requires: &'static [&'static str],
    pub apply: fn(&mut Table),
}

impl CleaningRule {
    fn is_satisfied(&self, present: &BTreeSet<String>) -> bool {
        self.requires.iter().all(|c| present.contains(*c))
    }
}

/// Columns removed from every cleaned table.
pub const DROPPED_COLUMNS: [&str; 3] = ["Cabin", "Ticket", "Name"];

/// The cleaning pipeline, in application order.
pub const RULES: &[CleaningRule] = &[
    CleaningRule {
        name: "impute age median",
        requires: &["Age"],
        apply: impute_age,
    },
    CleaningRule {
        name: "impute embarked mode",
        requires: &["Embarked"],
        apply: impute_embarked,
    },
    CleaningRule {
        name: "drop identifying columns",
        requires: &[],
        apply: drop_identifying,
    },
    CleaningRule {
        name: "capitalize sex",
        requires: &["Sex"],
        apply: capitalize_sex,
    },
    CleaningRule {
        name: "label survived",
        requires: &["Survived"],
        apply: label_survived,
    },
];

/// Clean a raw passenger table.
///
/// Headers are canonicalized first, then every rule in [`RULES`] whose
/// required columns are present runs in order. Rows are never removed.
pub fn normalize(raw: Table) -> NormalizedTable {
    let mut table = raw;
    canonicalize_headers(&mut table);

    let present: BTreeSet<String> = table.column_names().into_iter().collect();
    for rule in RULES.iter().filter(|r| r.is_satisfied(&present)) {
        log::debug!("applying cleaning rule '{}'", rule.name);
        (rule.apply)(&mut table);
    }

    NormalizedTable(table)
}

/// Trim and capitalize a header: " pCLASS " → "Pclass".
pub fn canonical_name(raw: &str) -> String {
    capitalize(raw.trim())
}

/// First character upper-case, the rest lower-case.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

fn canonicalize_headers(table: &mut Table) {
    let mut seen = BTreeSet::new();
    table.columns_mut().retain_mut(|col| {
        col.name = canonical_name(&col.name);
        if seen.insert(col.name.clone()) {
            true
        } else {
            log::warn!("dropping duplicate column '{}'", col.name);
            false
        }
    });
}

fn drop_identifying(table: &mut Table) {
    for name in DROPPED_COLUMNS {
        table.drop_column(name);
    }
}

fn impute_age(table: &mut Table) {
    let Some(col) = table.column_mut("Age") else {
        return;
    };
    let present: Vec<f64> = col.values.iter().filter_map(CellValue::as_f64).collect();
    let Some(median) = stats::median(&present) else {
        log::warn!("'Age' has no numeric values; leaving it unimputed");
        return;
    };
    if col.null_count() == 0 {
        return;
    }
    // Filling a gap makes the whole column float, like an integer column
    // with missing entries.
    for v in &mut col.values {
        *v = match v.as_f64() {
            Some(x) => CellValue::Float(x),
            None if v.is_null() => CellValue::Float(median),
            None => v.clone(),
        };
    }
}

fn impute_embarked(table: &mut Table) {
    let Some(col) = table.column_mut("Embarked") else {
        return;
    };
    let Some(mode) = stats::mode(&col.values) else {
        log::warn!("'Embarked' has no values; leaving it unimputed");
        return;
    };
    for v in col.values.iter_mut().filter(|v| v.is_null()) {
        *v = mode.clone();
    }
}

fn capitalize_sex(table: &mut Table) {
    let Some(col) = table.column_mut("Sex") else {
        return;
    };
    for v in &mut col.values {
        *v = match v {
            CellValue::Text(s) => CellValue::Text(capitalize(s)),
            _ => CellValue::Null,
        };
    }
}

fn label_survived(table: &mut Table) {
    let Some(col) = table.column_mut("Survived") else {
        return;
    };
    for v in &mut col.values {
        *v = survival_label(v).map_or(CellValue::Null, CellValue::from);
    }
}

/// 0 → "No", 1 → "Yes"; existing labels pass through.
fn survival_label(value: &CellValue) -> Option<&'static str> {
    match value {
        CellValue::Integer(0) => Some("No"),
        CellValue::Integer(1) => Some("Yes"),
        CellValue::Float(f) if *f == 0.0 => Some("No"),
        CellValue::Float(f) if *f == 1.0 => Some("Yes"),
        CellValue::Text(s) if s == "No" => Some("No"),
        CellValue::Text(s) if s == "Yes" => Some("Yes"),
        _ => None,
    }
}
