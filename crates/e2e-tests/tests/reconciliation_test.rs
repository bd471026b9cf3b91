//! Reconciliation scenarios: skipped rows, empty joins and inconsistent keys.

use pretty_assertions::assert_eq;

use e2e_tests::{matrix_label, rfc2822, MetaRow, TestHarness};
use topicflow_corpus::SkipReason;
use topicflow_export::Pipeline;
use topicflow_types::{DocId, Period, TopicKey};

fn run(harness: &TestHarness) -> topicflow_export::PipelineReport {
    Pipeline::new(harness.settings())
        .run("Demo", &harness.docs_dir, &harness.lda_dir)
        .expect("Pipeline failed")
}

#[test]
fn test_skipped_rows_keep_ids_contiguous() {
    let harness = TestHarness::with_year(2);
    harness.write_metadata(
        Period::Feb,
        &[
            MetaRow::new("1", "alice", &rfc2822(Period::Feb, 1, 10, 0)),
            MetaRow::new("7", "ghost", &rfc2822(Period::Feb, 1, 11, 0)),
            MetaRow::new("1", "alice again", &rfc2822(Period::Feb, 1, 12, 0)),
            MetaRow::new("2", "", &rfc2822(Period::Feb, 2, 10, 0)),
            MetaRow::new("3", "carol", "not a date"),
            MetaRow::new("4", "dave", &rfc2822(Period::Feb, 4, 10, 0)),
        ],
    );
    harness.write_text(Period::Feb, "4", "Feb message 4");
    harness.write_doc_topic(
        Period::Feb,
        &[matrix_label(Period::Feb, "1"), matrix_label(Period::Feb, "4")],
    );

    let report = run(&harness);

    assert_eq!(report.documents, 24);
    assert_eq!(report.skips.count(SkipReason::MissingText), 1);
    assert_eq!(report.skips.count(SkipReason::Duplicate), 1);
    assert_eq!(report.skips.count(SkipReason::MissingMetadata), 2);
    assert_eq!(report.skips.for_period(Period::Jan).len(), 0);

    let ids: Vec<u32> = harness.docs("Demo").keys().copied().collect();
    assert_eq!(ids, (1..=24).collect::<Vec<u32>>());

    let bins = harness.bins("Demo");
    let feb = bins.get(Period::Feb).unwrap();
    assert_eq!(feb.tweet_ids, vec![DocId(3), DocId(4)]);
    assert_eq!(feb.topic_model.doc_topic.len(), 2);
    assert_eq!(bins.get(Period::Mar).unwrap().tweet_ids[0], DocId(5));

    let docs = harness.docs("Demo");
    assert_eq!(docs[&4].author, "dave");
    assert_eq!(docs[&4].text, "Feb message 4");
}

#[test]
fn test_empty_join_keeps_words_and_documents() {
    let harness = TestHarness::with_year(2);
    harness.write_doc_topic(Period::Mar, &[matrix_label(Period::Mar, "99")]);

    let report = run(&harness);
    assert_eq!(report.joined[Period::Mar.index()], 0);
    assert_eq!(report.join_stats[&Period::Mar].unmatched_rows, 1);

    let bins = harness.bins("Demo");
    let mar = bins.get(Period::Mar).unwrap();
    assert_eq!(mar.tweet_ids, vec![DocId(5), DocId(6)]);
    assert!(mar.start_time.is_some());
    assert!(mar.topic_model.doc_topic.is_empty());
    assert_eq!(mar.topic_model.topic_doc.len(), 10);
    assert!(mar.topic_model.topic_doc.values().all(|docs| docs.is_empty()));
    assert_eq!(mar.topic_model.topic_word.len(), 10);
    assert_eq!(mar.topic_model.topic_prob.len(), 10);
}

#[test]
fn test_period_without_documents() {
    let harness = TestHarness::with_year(1);
    harness.write_metadata(Period::Dec, &[]);
    harness.write_doc_topic(Period::Dec, &[]);

    let report = run(&harness);
    assert_eq!(report.documents, 11);

    let bins = harness.bins("Demo");
    let dec = bins.get(Period::Dec).unwrap();
    assert!(dec.tweet_ids.is_empty());
    assert_eq!(dec.start_time, None);
    assert_eq!(dec.end_time, None);
    assert_eq!(dec.topic_model.topic_word.len(), 10);
}

#[test]
fn test_embedded_period_tokens_are_substituted() {
    let harness = TestHarness::with_year(1);
    // Keys and labels carry the wrong month; both resolve to April.
    harness.write_metadata(
        Period::Apr,
        &[MetaRow::new("2007_Mar_1", "erin", &rfc2822(Period::Apr, 3, 8, 30))],
    );
    harness.write_doc_topic(Period::Apr, &["Mar/2007_Mar_1.txt".to_string()]);

    let report = run(&harness);
    assert_eq!(report.documents, 12);
    assert_eq!(report.join_stats[&Period::Apr].joined, 1);
    assert_eq!(report.join_stats[&Period::Apr].substituted_tokens, 1);

    let docs = harness.docs("Demo");
    assert_eq!(docs[&4].author, "erin");
    assert_eq!(docs[&4].text, "Apr message 1");

    let bins = harness.bins("Demo");
    let apr = &bins.get(Period::Apr).unwrap().topic_model;
    assert!(apr.doc_topic[&DocId(4)].contains_key(&TopicKey::new(Period::Apr, 0)));
}

#[test]
fn test_duplicate_similarity_rows_collapse() {
    let harness = TestHarness::with_year(1);
    harness.write_topic_flow(&[
        (Period::Jan, 3, 4, 0.5),
        (Period::Jan, 3, 4, 0.5),
        (Period::Jun, 10, 1, 0.1),
        (Period::Jun, 10, 1, 0.1),
        (Period::Jun, 11, 1, 0.1),
    ]);

    let report = run(&harness);
    assert_eq!(report.links, 2);

    let graph = harness.graph("Demo");
    assert_eq!((graph.links[0].source, graph.links[0].target), (2, 13));
    assert_eq!((graph.links[1].source, graph.links[1].target), (59, 60));
}
