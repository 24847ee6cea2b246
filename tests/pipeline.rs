use anyhow::Result;
use std::io::Write;

use titanic_dashboard::data::normalize::DROPPED_COLUMNS;
use titanic_dashboard::data::stats::median;
use titanic_dashboard::data::{
    apply_filter, load_file, normalize, parse_csv, summarize, CellValue, FilterSelection, Metric,
    NormalizedTable,
};

fn clean(csv: &str) -> NormalizedTable {
    normalize(parse_csv(csv.as_bytes()).expect("valid csv"))
}

const TWO_PASSENGERS: &str = "Sex,Survived\nmale,0\nfemale,1\n";

#[test]
fn two_passenger_metrics() {
    let t = clean(TWO_PASSENGERS);
    let m = summarize(&apply_filter(&t, &FilterSelection::all_values(&t)));
    assert_eq!(m.total, 2);
    assert_eq!(m.survived, Metric::Count(1));
    assert_eq!(m.not_survived, Metric::Count(1));
}

#[test]
fn female_selection_keeps_only_the_female_passenger() {
    let t = clean(TWO_PASSENGERS);
    let view = apply_filter(&t, &FilterSelection::default().with("Sex", ["female"]));
    assert_eq!(view.len(), 1);
    assert_eq!(view.value(0, "Sex"), Some(&CellValue::from("Female")));
    assert_eq!(view.value(0, "Survived"), Some(&CellValue::from("Yes")));
}

#[test]
fn padded_upper_case_header_is_pclass() {
    let messy = clean(" PCLASS ,Sex\n1,male\n3,female\n");
    let tidy = clean("Pclass,Sex\n1,male\n3,female\n");
    assert_eq!(messy, tidy);
}

#[test]
fn missing_survived_reports_not_available() {
    let t = clean("Sex,Pclass\nmale,3\n");
    let m = summarize(&apply_filter(&t, &FilterSelection::all_values(&t)));
    assert_eq!(m.total, 1);
    assert_eq!(m.survived, Metric::NotAvailable);
    assert_eq!(m.not_survived, Metric::NotAvailable);
}

#[test]
fn identifying_columns_never_survive_cleaning() {
    for header in [" cabin ,Ticket,NAME,Sex", "Cabin, ticket ,name,Sex", "CABIN,TICKET,Name,Sex"] {
        let t = clean(&format!("{header}\nC85,113803,\"Futrelle, Mrs.\",female\n"));
        for dropped in DROPPED_COLUMNS {
            assert!(!t.has_column(dropped), "{dropped} kept for header {header:?}");
        }
        assert_eq!(t.column_names(), vec!["Sex"]);
    }
}

#[test]
fn imputed_ages_equal_the_original_median() {
    let csv = "Age,Sex\n22,male\n,female\n26,female\n35,female\n,male\n54,male\n2,male\n";
    let raw = parse_csv(csv.as_bytes()).unwrap();
    let raw_ages = raw.column("Age").unwrap().values.clone();
    let present: Vec<f64> = raw_ages.iter().filter_map(CellValue::as_f64).collect();
    let expected = median(&present).unwrap();

    let t = normalize(raw);
    let ages = &t.column("Age").unwrap().values;
    assert_eq!(t.column("Age").unwrap().null_count(), 0);
    for (before, after) in raw_ages.iter().zip(ages) {
        if before.is_null() {
            assert_eq!(after, &CellValue::Float(expected));
        } else {
            assert_eq!(after.as_f64(), before.as_f64());
        }
    }
}

#[test]
fn normalize_is_idempotent_on_a_realistic_extract() {
    let csv = "PassengerId,Survived,Pclass,Name,Sex,Age,SibSp,Parch,Ticket,Fare,Cabin,Embarked\n\
        1,0,3,\"Braund, Mr. Owen Harris\",male,22,1,0,A/5 21171,7.25,,S\n\
        2,1,1,\"Cumings, Mrs. John Bradley\",female,38,1,0,PC 17599,71.2833,C85,C\n\
        3,1,3,\"Heikkinen, Miss. Laina\",female,,0,0,STON/O2. 3101282,7.925,,S\n\
        62,1,1,\"Icard, Miss. Amelie\",female,38,0,0,113572,80,B28,\n";
    let once = clean(csv);
    let twice = normalize(once.clone().into_inner());
    assert_eq!(once, twice);
    assert_eq!(once.len(), 4);
}

#[test]
fn filtered_rows_satisfy_every_dimension() {
    let t = clean(
        "Sex,Pclass,Survived\nmale,1,0\nfemale,1,1\nfemale,2,1\nmale,3,0\nfemale,3,0\nmale,2,1\n",
    );
    let selections = [
        FilterSelection::all_values(&t),
        FilterSelection::default().with("Pclass", [1i64, 3]),
        FilterSelection::default()
            .with("Sex", ["Male"])
            .with("Pclass", [2i64, 3]),
        FilterSelection::default().with("Sex", Vec::<&str>::new()),
    ];
    for sel in &selections {
        let view = apply_filter(&t, sel);
        assert!(view.len() <= t.len());
        for row in 0..view.len() {
            for col in ["Sex", "Pclass"] {
                let value = view.value(row, col).unwrap();
                assert!(sel.is_selected(col, value), "row {row} fails {col}");
            }
        }
    }
    assert!(apply_filter(&t, &selections[3]).is_empty());
}

#[test]
fn loads_and_cleans_a_file_on_disk() -> Result<()> {
    let mut file = tempfile::NamedTempFile::new()?;
    write!(file, "survived, sex ,Embarked\n0,male,S\n1,female,\n1,female,S\n")?;
    let t = normalize(load_file(file.path())?);
    assert_eq!(t.column_names(), vec!["Survived", "Sex", "Embarked"]);
    assert_eq!(t.value(1, "Embarked"), Some(&CellValue::from("S")));
    Ok(())
}

#[test]
fn lower_case_na_age_is_imputed_with_the_median() {
    let t = clean("Age,Survived\n22,0\nn/a,1\n38,1\n");
    assert_eq!(t.value(1, "Age"), Some(&CellValue::Float(30.0)));
}
