mod common;

use common::{full_file, row};
use inspection_tools::aggregate::{Aggregator, Diagnostic};
use inspection_tools::config::RowWindow;
use inspection_tools::model::{
    Bucket, CATEGORY_COUNT, CategorySet, DEFAULT_CATEGORIES, FacilitySummary, RawRow,
    ValidatedFile,
};
use inspection_tools::validate::{ColumnSchema, validate_row};

fn file(name: &str, rows: Vec<inspection_tools::model::ValidatedRow>) -> ValidatedFile {
    ValidatedFile {
        file_name: name.to_string(),
        rows,
    }
}

fn sample_files() -> (ValidatedFile, ValidatedFile, ValidatedFile) {
    let a = file(
        "a.xlsx",
        vec![
            row("Universities", Some(9), (5, 1, 0)),
            row("Workplaces", Some(10), (2, 2, 1)),
        ],
    );
    let b = file(
        "b.xlsx",
        vec![
            row("Workplaces", Some(10), (7, 3, 0)),
            row("Health-care enterprises", Some(6), (1, 1, 1)),
        ],
    );
    let c = file(
        "c.xlsx",
        vec![
            row("Universities", Some(9), (4, 4, 4)),
            row("Other public-use rooms", Some(15), (3, 0, 2)),
        ],
    );
    (a, b, c)
}

#[test]
fn aggregation_is_commutative() {
    let categories = CategorySet::default();
    let aggregator = Aggregator::new(&categories, RowWindow::default());
    let (a, b, _) = sample_files();

    let forward = aggregator.aggregate(&[a.clone(), b.clone()]);
    let backward = aggregator.aggregate(&[b, a]);
    assert_eq!(forward.summary, backward.summary);
}

#[test]
fn row_order_does_not_matter() {
    let categories = CategorySet::default();
    let aggregator = Aggregator::new(&categories, RowWindow::default());
    let (a, _, _) = sample_files();
    let mut reversed = a.clone();
    reversed.rows.reverse();

    assert_eq!(
        aggregator.aggregate(&[a]).summary,
        aggregator.aggregate(&[reversed]).summary
    );
}

#[test]
fn aggregation_is_associative() {
    let categories = CategorySet::default();
    let aggregator = Aggregator::new(&categories, RowWindow::default());
    let (a, b, c) = sample_files();

    let all = aggregator.aggregate(&[a.clone(), b.clone(), c.clone()]);
    let mut merged = aggregator.aggregate(&[a, b]).summary;
    merged.merge(&aggregator.aggregate(&[c]).summary);

    assert_eq!(all.summary, merged);
}

#[test]
fn empty_input_is_zero_seeded() {
    let categories = CategorySet::default();
    let aggregation = Aggregator::new(&categories, RowWindow::default()).aggregate(&[]);

    assert_eq!(aggregation.summary.entries().len(), CATEGORY_COUNT);
    for label in DEFAULT_CATEGORIES {
        assert_eq!(aggregation.summary.get(label), Some(&Bucket::default()));
    }
    assert!(aggregation.diagnostics.is_empty());
    assert_eq!(aggregation.summary, FacilitySummary::zeroed(&categories));
}

#[test]
fn legacy_smoking_room_header_contributes_identically() {
    let schema = ColumnSchema::default();
    let categories = CategorySet::default();
    let aggregator = Aggregator::new(&categories, RowWindow::default());

    let current = RawRow::new(Some(8))
        .with("Category", "Workplaces")
        .with("Inspected", 3.0)
        .with("With smoking room", 2.0);
    let legacy = RawRow::new(Some(8))
        .with("Category", "Workplaces")
        .with("Inspected", 3.0)
        .with("Smoking rooms", 2.0);

    let current = validate_row(&current, 0, &schema).expect("current header row");
    let legacy = validate_row(&legacy, 0, &schema).expect("legacy header row");

    assert_eq!(
        aggregator.aggregate(&[file("current.xlsx", vec![current])]).summary,
        aggregator.aggregate(&[file("legacy.xlsx", vec![legacy])]).summary
    );
}

#[test]
fn row_past_the_window_contributes_nothing() {
    let categories = CategorySet::default();
    let aggregator = Aggregator::new(&categories, RowWindow::default());
    let aggregation = aggregator.aggregate(&[file(
        "long.xlsx",
        vec![
            row("Universities", Some(15), (1, 1, 1)),
            row("Universities", Some(16), (9, 9, 9)),
        ],
    )]);

    assert_eq!(
        aggregation.summary.get("Universities"),
        Some(&Bucket::new(1, 1, 1))
    );
    assert_eq!(
        aggregation.diagnostics,
        vec![Diagnostic::OutsideWindow {
            file_name: "long.xlsx".into(),
            sheet_row: 16,
            category: "Universities".into(),
        }]
    );
}

#[test]
fn rows_without_sheet_position_are_always_counted() {
    let categories = CategorySet::default();
    let aggregation = Aggregator::new(&categories, RowWindow::default())
        .aggregate(&[file("manual", vec![row("Workplaces", None, (2, 1, 0))])]);

    assert_eq!(
        aggregation.summary.get("Workplaces"),
        Some(&Bucket::new(2, 1, 0))
    );
}

#[test]
fn scenario_three_full_files() {
    let categories = CategorySet::default();
    let aggregator = Aggregator::new(&categories, RowWindow::default());
    let files = [
        full_file("one.xlsx", (1, 2, 3)),
        full_file("two.xlsx", (1, 2, 3)),
        full_file("three.xlsx", (1, 2, 3)),
    ];

    let aggregation = aggregator.aggregate(&files);
    for entry in aggregation.summary.entries() {
        assert_eq!(entry.bucket, Bucket::new(3, 6, 9), "{}", entry.category);
    }
    assert_eq!(aggregation.summary.totals(), Bucket::new(30, 60, 90));
    assert!(aggregation.diagnostics.is_empty());
}

#[test]
fn scenario_single_category_file() {
    let categories = CategorySet::default();
    let aggregation = Aggregator::new(&categories, RowWindow::default()).aggregate(&[file(
        "single.xlsx",
        vec![row("Universities", Some(9), (5, 0, 0))],
    )]);

    for entry in aggregation.summary.entries() {
        let expected = if entry.category == "Universities" {
            Bucket::new(5, 0, 0)
        } else {
            Bucket::default()
        };
        assert_eq!(entry.bucket, expected, "{}", entry.category);
    }
}

#[test]
fn scenario_unknown_category_is_ignored_with_diagnostic() {
    let categories = CategorySet::default();
    let aggregator = Aggregator::new(&categories, RowWindow::default());
    let mut drifted = full_file("drift.xlsx", (1, 1, 1));
    drifted
        .rows
        .push(row("Universities and colleges", Some(12), (9, 9, 9)));

    let aggregation = aggregator.aggregate(&[drifted]);
    assert_eq!(aggregation.summary.totals(), Bucket::new(10, 10, 10));
    assert_eq!(
        aggregation.diagnostics,
        vec![Diagnostic::UnknownCategory {
            file_name: "drift.xlsx".into(),
            sheet_row: Some(12),
            category: "Universities and colleges".into(),
        }]
    );
}

#[test]
fn duplicate_category_is_summed_and_flagged() {
    let categories = CategorySet::default();
    let aggregation = Aggregator::new(&categories, RowWindow::default()).aggregate(&[file(
        "dup.xlsx",
        vec![
            row("Workplaces", Some(10), (1, 0, 0)),
            row("Workplaces", Some(11), (2, 0, 0)),
        ],
    )]);

    assert_eq!(
        aggregation.summary.get("Workplaces"),
        Some(&Bucket::new(3, 0, 0))
    );
    assert!(matches!(
        aggregation.diagnostics.as_slice(),
        [Diagnostic::DuplicateCategory { category, .. }] if category == "Workplaces"
    ));
}

#[test]
fn same_category_in_different_files_is_not_a_duplicate() {
    let categories = CategorySet::default();
    let aggregation = Aggregator::new(&categories, RowWindow::default()).aggregate(&[
        file("a.xlsx", vec![row("Workplaces", Some(10), (1, 0, 0))]),
        file("b.xlsx", vec![row("Workplaces", Some(10), (1, 0, 0))]),
    ]);

    assert!(aggregation.diagnostics.is_empty());
}

#[test]
fn oversized_counters_saturate_instead_of_overflowing() {
    let schema = ColumnSchema::default();
    let categories = CategorySet::default();
    let huge = RawRow::new(Some(9))
        .with("Category", "Universities")
        .with("Inspected", 1e20)
        .with("Compliant", "1e20")
        .with("With smoking room", 2.0);
    let huge = validate_row(&huge, 0, &schema).expect("row validated");
    assert_eq!(huge.inspected, u64::MAX);

    let aggregation = Aggregator::new(&categories, RowWindow::default()).aggregate(&[
        file("a.xlsx", vec![huge.clone()]),
        file("b.xlsx", vec![huge]),
        full_file("c.xlsx", (1, 1, 1)),
    ]);

    assert_eq!(
        aggregation.summary.get("Universities"),
        Some(&Bucket::new(u64::MAX, u64::MAX, 5))
    );
    assert_eq!(
        aggregation.summary.totals(),
        Bucket::new(u64::MAX, u64::MAX, 14)
    );
}

#[test]
fn category_set_enforces_ten_unique_labels() {
    assert!(CategorySet::new(["a", "b"]).is_err());

    let mut labels: Vec<String> = DEFAULT_CATEGORIES.iter().map(|l| l.to_string()).collect();
    labels[9] = labels[0].clone();
    assert!(CategorySet::new(labels.clone()).is_err());

    labels[9] = " ".into();
    assert!(CategorySet::new(labels).is_err());

    let categories = CategorySet::new(DEFAULT_CATEGORIES).expect("default labels valid");
    assert_eq!(categories, CategorySet::default());
    assert_eq!(categories.position("Universities"), Some(3));
}
