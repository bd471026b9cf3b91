//! Error path E2E tests.
//!
//! Malformed input must be reported with the offending file and must not
//! leave any generated file behind.

use std::fs;

use pretty_assertions::assert_eq;

use e2e_tests::TestHarness;
use topicflow_corpus::CorpusError;
use topicflow_export::{ExportError, Pipeline};
use topicflow_topics::TopicsError;
use topicflow_types::Period;

fn run_err(harness: &TestHarness) -> ExportError {
    Pipeline::new(harness.settings())
        .run("Demo", &harness.docs_dir, &harness.lda_dir)
        .expect_err("Pipeline should fail")
}

fn assert_nothing_written(harness: &TestHarness) {
    assert_eq!(harness.data_files(), Vec::<std::path::PathBuf>::new());
}

#[test]
fn test_missing_lda_directory() {
    let harness = TestHarness::with_year(1);
    fs::remove_dir_all(&harness.lda_dir).unwrap();

    let err = run_err(&harness);
    assert!(matches!(err, ExportError::Corpus(CorpusError::MissingDirectory(_))));
    assert_nothing_written(&harness);
}

#[test]
fn test_missing_tables_are_all_reported() {
    let harness = TestHarness::with_year(1);
    fs::remove_file(harness.lda_dir.join("Topic_Term_Matrix").join("Jul.csv")).unwrap();
    fs::remove_file(harness.metadata_path(Period::Sep)).unwrap();

    match run_err(&harness) {
        ExportError::Corpus(CorpusError::MissingFiles(files)) => {
            assert_eq!(files.len(), 2);
            assert!(files.iter().any(|f| f.ends_with("Jul.csv")));
        }
        other => panic!("Expected MissingFiles, got {other}"),
    }
    assert_nothing_written(&harness);
}

#[test]
fn test_undetectable_year() {
    let harness = TestHarness::with_year(1);
    for entry in fs::read_dir(&harness.docs_dir).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().is_some_and(|e| e == "txt") {
            fs::remove_file(path).unwrap();
        }
    }

    let err = run_err(&harness);
    assert!(matches!(err, ExportError::Corpus(CorpusError::YearUndetected(_))));
    assert_nothing_written(&harness);
}

#[test]
fn test_metadata_missing_column() {
    let harness = TestHarness::with_year(1);
    fs::write(harness.metadata_path(Period::May), ",k,sender,dateStamp\n0,1,x,y\n").unwrap();

    match run_err(&harness) {
        ExportError::Corpus(CorpusError::MissingColumn { column, .. }) => {
            assert_eq!(column, "author");
        }
        other => panic!("Expected MissingColumn, got {other}"),
    }
    assert_nothing_written(&harness);
}

#[test]
fn test_unparseable_matrix_cell() {
    let harness = TestHarness::with_year(1);
    let path = harness.lda_dir.join("document_topic_Matrix").join("Nov.csv");
    let csv = fs::read_to_string(&path).unwrap().replacen("0.01,", "n/a,", 1);
    fs::write(&path, csv).unwrap();

    let err = run_err(&harness);
    assert!(matches!(
        err,
        ExportError::Topics(TopicsError::InvalidValue { ref value, .. }) if value == "n/a"
    ));
    assert!(err.to_string().contains("Nov.csv"));
    assert_nothing_written(&harness);
}

#[test]
fn test_topic_flow_missing_pair_column() {
    let harness = TestHarness::with_year(1);
    let path = harness.lda_dir.join("Topic_Flow").join("topic_flow.csv");
    let csv = fs::read_to_string(&path)
        .unwrap()
        .replace("Aug_Sep_similarity", "score");
    fs::write(&path, csv).unwrap();

    match run_err(&harness) {
        ExportError::Topics(TopicsError::MissingColumn { column, .. }) => {
            assert_eq!(column, "Aug_Sep_similarity");
        }
        other => panic!("Expected MissingColumn, got {other}"),
    }
    assert_nothing_written(&harness);
}

#[test]
fn test_topic_term_with_wrong_row_count() {
    let harness = TestHarness::with_year(1);
    fs::write(
        harness.lda_dir.join("Topic_Term_Matrix").join("Feb.csv"),
        ",exploit\n1,0.5\n",
    )
    .unwrap();

    let err = run_err(&harness);
    assert!(matches!(err, ExportError::Topics(TopicsError::InvalidInput(_))));
    assert_nothing_written(&harness);
}
