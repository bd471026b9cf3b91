//! End-to-end test infrastructure for the TopicFlow builder.
//!
//! Provides a TestHarness that lays out a synthetic corpus year (metadata
//! tables, text bodies, topic-model outputs) and a front-end directory in a
//! temp dir, plus helpers to read the generated data files back.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use topicflow_export::extract_payload;
use topicflow_types::{BinSet, DocRecord, Period, Settings, SimilarityGraph, TOPICS_PER_PERIOD};

pub const YEAR: i32 = 2007;
pub const METADATA_PREFIX: &str = "Full_Disclosure_Mailing_List_";

/// Words of every topic-term matrix written by the harness.
pub const VOCABULARY: [&str; 12] = [
    "exploit", "overflow", "patch", "kernel", "remote", "advisory", "xss", "sql", "root",
    "buffer", "vendor", "disclosure",
];

pub const INDEX_TEMPLATE: &str = "<html>\n<head>\n{{topicflow:scripts}}\n</head>\n<body>\n\t\t<ul>\n\t\t\t{{topicflow:selectors}}\n\t\t</ul>\n</body>\n</html>\n";
pub const CONTROLLER_TEMPLATE: &str = "var idToName = {\n\t\t\t\t\t{{topicflow:id_to_name}}\n};\nfunction loadData(selected_data) {\n\t{{topicflow:dispatch}}\n}\n";

/// One metadata row as written to the table.
#[derive(Debug, Clone)]
pub struct MetaRow {
    pub key: String,
    pub author: String,
    pub date_stamp: String,
}

impl MetaRow {
    pub fn new(key: &str, author: &str, date_stamp: &str) -> Self {
        Self {
            key: key.to_string(),
            author: author.to_string(),
            date_stamp: date_stamp.to_string(),
        }
    }
}

/// Shared test harness for E2E tests.
pub struct TestHarness {
    /// Keeps temp dir alive for the lifetime of the harness
    pub _temp_dir: tempfile::TempDir,
    pub docs_dir: PathBuf,
    pub lda_dir: PathBuf,
    pub frontend_dir: PathBuf,
}

impl TestHarness {
    /// Empty input directories and a front-end with templates.
    pub fn new() -> Self {
        let temp_dir = tempfile::TempDir::new().expect("Failed to create temp dir");
        let docs_dir = temp_dir.path().join("docs");
        let lda_dir = temp_dir.path().join("lda");
        let frontend_dir = temp_dir.path().join("topicflow");

        for dir in [
            docs_dir.clone(),
            lda_dir.join("document_topic_Matrix"),
            lda_dir.join("Topic_Term_Matrix"),
            lda_dir.join("Topic_Flow"),
            frontend_dir.join("scripts"),
        ] {
            fs::create_dir_all(&dir).expect("Failed to create fixture dir");
        }
        fs::write(frontend_dir.join("index.html.tmpl"), INDEX_TEMPLATE).unwrap();
        fs::write(frontend_dir.join("scripts/controller.js.tmpl"), CONTROLLER_TEMPLATE).unwrap();

        Self {
            _temp_dir: temp_dir,
            docs_dir,
            lda_dir,
            frontend_dir,
        }
    }

    /// A full year: `docs_per_period` documents per period, keys `1..=n`,
    /// every document present in its period's document-topic matrix, and one
    /// similarity row per adjacent period pair.
    pub fn with_year(docs_per_period: usize) -> Self {
        let harness = Self::new();
        for period in Period::ALL {
            let rows: Vec<MetaRow> = (1..=docs_per_period)
                .map(|k| {
                    MetaRow::new(
                        &k.to_string(),
                        &format!("author{k}@example.org"),
                        &rfc2822(period, k as u32, 9 + k as u32, 5),
                    )
                })
                .collect();
            harness.write_metadata(period, &rows);
            for k in 1..=docs_per_period {
                harness.write_text(period, &k.to_string(), &format!("{} message {k}", period.abbrev()));
            }
            let labels: Vec<String> = (1..=docs_per_period)
                .map(|k| matrix_label(period, &k.to_string()))
                .collect();
            harness.write_doc_topic(period, &labels);
            harness.write_topic_term(period);
        }
        let flow: Vec<(Period, u32, u32, f64)> = Period::adjacent_pairs()
            .map(|(from, _)| (from, 1 + from.index() as u32 % 10, 2, 0.25))
            .collect();
        harness.write_topic_flow(&flow);
        harness
    }

    /// Settings pointing at this harness's front-end.
    pub fn settings(&self) -> Settings {
        Settings {
            frontend_dir: self.frontend_dir.to_string_lossy().into_owned(),
            ..Settings::default()
        }
    }

    pub fn metadata_path(&self, period: Period) -> PathBuf {
        self.docs_dir
            .join(format!("{METADATA_PREFIX}{}{YEAR}.csv", period.abbrev()))
    }

    /// Write a period's metadata table (index column, `k`, `author`, `dateStamp`).
    pub fn write_metadata(&self, period: Period, rows: &[MetaRow]) {
        let mut csv = String::from(",k,author,dateStamp\n");
        for (i, row) in rows.iter().enumerate() {
            csv.push_str(&format!(
                "{i},{},{},\"{}\"\n",
                row.key, row.author, row.date_stamp
            ));
        }
        fs::write(self.metadata_path(period), csv).expect("Failed to write metadata");
    }

    /// Write a text body as Latin-1.
    pub fn write_text(&self, period: Period, key: &str, text: &str) {
        let bytes: Vec<u8> = text.chars().map(|c| c as u32 as u8).collect();
        let path = self
            .docs_dir
            .join(format!("{YEAR}_{}_{key}.txt", period.abbrev()));
        fs::write(path, bytes).expect("Failed to write text");
    }

    /// Write a document-topic matrix. Row `r`, topic column `t` holds
    /// `(r + 1) * 0.01 + t * 0.001`.
    pub fn write_doc_topic(&self, period: Period, labels: &[String]) {
        let columns: Vec<String> = (1..=TOPICS_PER_PERIOD).map(|t| t.to_string()).collect();
        let mut csv = format!(",{}\n", columns.join(","));
        for (r, label) in labels.iter().enumerate() {
            let cells: Vec<String> = (0..TOPICS_PER_PERIOD)
                .map(|t| doc_topic_weight(r, t).to_string())
                .collect();
            csv.push_str(&format!("{label},{}\n", cells.join(",")));
        }
        self.write_lda("document_topic_Matrix", period, &csv);
    }

    /// Write a topic-term matrix over [`VOCABULARY`]; word `w` of topic `t`
    /// weighs `((w + t) % 12 + 1) / 100`.
    pub fn write_topic_term(&self, period: Period) {
        let mut csv = format!(",{}\n", VOCABULARY.join(","));
        for t in 0..TOPICS_PER_PERIOD {
            let cells: Vec<String> = (0..VOCABULARY.len())
                .map(|w| topic_term_weight(t, w).to_string())
                .collect();
            csv.push_str(&format!("{},{}\n", t + 1, cells.join(",")));
        }
        self.write_lda("Topic_Term_Matrix", period, &csv);
    }

    /// Write the topic-flow table. Each entry fills the pair starting at its
    /// period on its own row.
    pub fn write_topic_flow(&self, rows: &[(Period, u32, u32, f64)]) {
        let mut header = vec!["Jan".to_string()];
        for (from, to) in Period::adjacent_pairs() {
            header.push(to.abbrev().to_string());
            header.push(format!("{}_{}_similarity", from.abbrev(), to.abbrev()));
        }
        let mut csv = format!("{}\n", header.join(","));
        for (from, a, b, score) in rows {
            let mut cells = vec![String::new(); header.len()];
            let to = from.next().expect("pair must start before December");
            let col = |name: &str| header.iter().position(|h| h == name).unwrap();
            cells[col(from.abbrev())] = a.to_string();
            cells[col(to.abbrev())] = b.to_string();
            cells[col(&format!("{}_{}_similarity", from.abbrev(), to.abbrev()))] = score.to_string();
            csv.push_str(&format!("{}\n", cells.join(",")));
        }
        fs::write(self.lda_dir.join("Topic_Flow").join("topic_flow.csv"), csv)
            .expect("Failed to write topic flow");
    }

    fn write_lda(&self, folder: &str, period: Period, csv: &str) {
        let path = self.lda_dir.join(folder).join(format!("{}.csv", period.abbrev()));
        fs::write(path, csv).expect("Failed to write matrix");
    }

    pub fn project_dir(&self, project: &str) -> PathBuf {
        self.frontend_dir.join("data").join(project)
    }

    /// Read a generated file of a project.
    pub fn read_output(&self, project: &str, file: &str) -> String {
        fs::read_to_string(self.project_dir(project).join(file)).expect("Failed to read output")
    }

    pub fn docs(&self, project: &str) -> BTreeMap<u32, DocRecord> {
        decode(&self.read_output(project, "Doc.js"))
    }

    pub fn bins(&self, project: &str) -> BinSet {
        decode(&self.read_output(project, "Bins.js"))
    }

    pub fn graph(&self, project: &str) -> SimilarityGraph {
        decode(&self.read_output(project, "TopicSimilarity.js"))
    }

    /// Every file under the front-end's `data` directory.
    pub fn data_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();
        collect_files(&self.frontend_dir.join("data"), &mut files);
        files.sort();
        files
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Weight written by [`TestHarness::write_doc_topic`].
pub fn doc_topic_weight(row: usize, topic: usize) -> f64 {
    (row + 1) as f64 * 0.01 + topic as f64 * 0.001
}

/// Weight written by [`TestHarness::write_topic_term`].
pub fn topic_term_weight(topic: usize, word: usize) -> f64 {
    ((word + topic) % VOCABULARY.len() + 1) as f64 / 100.0
}

/// RFC 2822 timestamp on `day` of `period`, at `hour:minute`, UTC-5.
pub fn rfc2822(period: Period, day: u32, hour: u32, minute: u32) -> String {
    format!(
        "{day} {} {YEAR} {hour:02}:{minute:02}:00 -0500",
        period.abbrev()
    )
}

/// Document-topic row label as the topic model writes it.
pub fn matrix_label(period: Period, key: &str) -> String {
    format!("{}/{YEAR}_{}_{key}.txt", period.abbrev(), period.abbrev())
}

fn decode<T: serde::de::DeserializeOwned>(js: &str) -> T {
    let payload = extract_payload(js).expect("Data file has no JSON payload");
    serde_json::from_str(payload).expect("Data file payload is not valid JSON")
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, out);
        } else {
            out.push(path);
        }
    }
}
