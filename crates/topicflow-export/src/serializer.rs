//! Front-end data files.
//!
//! Each project gets three JavaScript files under `data/<project>/`. Every
//! file defines one `populate_*_<project>()` function that hands a JSON
//! literal to the front-end's reader:
//!
//! | File | Function | Payload |
//! |------|----------|---------|
//! | `Doc.js` | `populate_tweets_<p>` | id -> document record |
//! | `Bins.js` | `populate_bins_<p>` | bin id -> bin |
//! | `TopicSimilarity.js` | `populate_similarity_<p>` | `{nodes, links}` |

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use topicflow_types::{BinSet, DocId, DocRecord, Document, SimilarityGraph};

use crate::error::ExportError;

pub const DATA_DIR: &str = "data";
pub const DOC_FILE: &str = "Doc.js";
pub const BINS_FILE: &str = "Bins.js";
pub const SIMILARITY_FILE: &str = "TopicSimilarity.js";

/// Directory holding a project's data files.
pub fn project_dir(frontend_dir: &Path, project: &str) -> PathBuf {
    frontend_dir.join(DATA_DIR).join(project)
}

/// Wrapper shape of one data file.
struct JsWrapper {
    function: &'static str,
    variable: &'static str,
    /// Text between `var <name> =` and the JSON literal
    gap: &'static str,
    reader: &'static str,
}

const DOC_WRAPPER: JsWrapper = JsWrapper {
    function: "populate_tweets_",
    variable: "tweet_data",
    gap: "",
    reader: "readTweetJSON",
};

const BINS_WRAPPER: JsWrapper = JsWrapper {
    function: "populate_bins_",
    variable: "bin_data",
    gap: " ",
    reader: "readBinJSON",
};

const SIMILARITY_WRAPPER: JsWrapper = JsWrapper {
    function: "populate_similarity_",
    variable: "sim_data",
    gap: " ",
    reader: "readSimilarityJSON",
};

impl JsWrapper {
    fn wrap<T: Serialize + ?Sized>(&self, project: &str, payload: &T) -> Result<String, ExportError> {
        let json = serde_json::to_string(payload)?;
        Ok(format!(
            "function {}{}(){{\nvar {} ={}{};\n{}({});\n}}",
            self.function, project, self.variable, self.gap, json, self.reader, self.variable
        ))
    }
}

/// `Doc.js` payload: documents keyed by id, in id order.
pub fn doc_records(documents: &[Document]) -> BTreeMap<DocId, DocRecord> {
    documents.iter().map(|doc| (doc.id, doc.record())).collect()
}

pub fn render_docs(project: &str, documents: &[Document]) -> Result<String, ExportError> {
    DOC_WRAPPER.wrap(project, &doc_records(documents))
}

pub fn render_bins(project: &str, bins: &BinSet) -> Result<String, ExportError> {
    BINS_WRAPPER.wrap(project, bins)
}

pub fn render_similarity(project: &str, graph: &SimilarityGraph) -> Result<String, ExportError> {
    SIMILARITY_WRAPPER.wrap(project, graph)
}

/// JSON literal embedded in a rendered data file.
pub fn extract_payload(js: &str) -> Option<&str> {
    let start = js.find(" =")? + 2;
    let end = js.rfind(";\nread")?;
    js.get(start..end).map(str::trim_start)
}

/// The three data files of a project, rendered but not yet written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectArtifacts {
    pub project: String,
    pub docs: String,
    pub bins: String,
    pub similarity: String,
}

impl ProjectArtifacts {
    /// Render all three files.
    pub fn render(
        project: &str,
        documents: &[Document],
        bins: &BinSet,
        graph: &SimilarityGraph,
    ) -> Result<Self, ExportError> {
        Ok(Self {
            project: project.to_string(),
            docs: render_docs(project, documents)?,
            bins: render_bins(project, bins)?,
            similarity: render_similarity(project, graph)?,
        })
    }

    /// Write the files into `<frontend_dir>/data/<project>/`, replacing old ones.
    pub fn write(&self, frontend_dir: &Path) -> Result<PathBuf, ExportError> {
        let dir = project_dir(frontend_dir, &self.project);
        fs::create_dir_all(&dir)?;
        for (name, content) in [
            (DOC_FILE, &self.docs),
            (BINS_FILE, &self.bins),
            (SIMILARITY_FILE, &self.similarity),
        ] {
            fs::write(dir.join(name), content)?;
        }
        info!(project = %self.project, dir = %dir.display(), "Wrote project data files");
        Ok(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use topicflow_types::{Bin, Period, TopicKey, TopicModel, TopicNode};

    fn document(id: u32, period: Period) -> Document {
        Document {
            id: DocId(id),
            period,
            raw_key: id.to_string(),
            filename: format!("2007_{}_{}.txt", period.abbrev(), id),
            author: "alice".to_string(),
            timestamp: NaiveDate::from_ymd_opt(2007, 1, 5)
                .unwrap()
                .and_hms_opt(9, 7, 0)
                .unwrap(),
            text: "body".to_string(),
        }
    }

    #[test]
    fn test_doc_wrapper_shape() {
        let js = render_docs("Demo", &[document(2, Period::Jan), document(1, Period::Jan)]).unwrap();
        assert!(js.starts_with("function populate_tweets_Demo(){\nvar tweet_data ={\"1\":"));
        assert!(js.ends_with(";\nreadTweetJSON(tweet_data);\n}"));
        assert!(js.contains(
            r#""2":{"tweet_id":2,"author":"alice","tweet_date":"1/5/2007 9:7","text":"body"}"#
        ));
    }

    #[test]
    fn test_bins_wrapper_shape() {
        let bins = BinSet(vec![Bin {
            tweet_ids: vec![],
            start_time: None,
            bin_id: 0,
            topic_model: TopicModel::default(),
            end_time: None,
        }]);
        let js = render_bins("Demo", &bins).unwrap();
        assert!(js.starts_with("function populate_bins_Demo(){\nvar bin_data = {\"0\":{\"tweet_Ids\":[]"));
        assert!(js.ends_with(";\nreadBinJSON(bin_data);\n}"));
    }

    #[test]
    fn test_similarity_wrapper_shape() {
        let graph = SimilarityGraph {
            nodes: vec![TopicNode {
                name: TopicKey::new(Period::Jan, 0),
                value: 3,
            }],
            links: vec![],
        };
        let js = render_similarity("Demo", &graph).unwrap();
        assert_eq!(
            js,
            "function populate_similarity_Demo(){\nvar sim_data = {\"nodes\":[{\"name\":\"0_0\",\"value\":3}],\"links\":[]};\nreadSimilarityJSON(sim_data);\n}"
        );
    }

    #[test]
    fn test_bin_round_trip_keeps_rounded_weights() {
        let key = TopicKey::new(Period::Feb, 2);
        let mut model = TopicModel::default();
        let weight = topicflow_topics::round_weight(0.1 + 0.2, 17);
        model.topic_doc.insert(key, [(DocId(4), weight)].into());
        model.doc_topic.insert(DocId(4), [(key, weight)].into());
        model
            .topic_word
            .insert(key, [("exploit".to_string(), 0.125)].into_iter().collect());
        model.topic_prob.insert(2, key);
        let bins = BinSet(vec![Bin {
            tweet_ids: vec![DocId(4)],
            start_time: Some("2/1/2007 0:0".to_string()),
            bin_id: 1,
            topic_model: model,
            end_time: Some("2/1/2007 0:0".to_string()),
        }]);

        let js = render_bins("Demo", &bins).unwrap();
        let decoded: BinSet = serde_json::from_str(extract_payload(&js).unwrap()).unwrap();
        assert_eq!(decoded, bins);
        assert_eq!(decoded.0[0].topic_model.doc_topic[&DocId(4)][&key], weight);
    }

    #[test]
    fn test_extract_payload() {
        let js = render_docs("X", &[]).unwrap();
        assert_eq!(extract_payload(&js), Some("{}"));
        assert_eq!(extract_payload("nothing here"), None);
    }

    #[test]
    fn test_write_creates_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        let artifacts =
            ProjectArtifacts::render("Demo", &[], &BinSet::default(), &SimilarityGraph::default())
                .unwrap();
        let out = artifacts.write(dir.path()).unwrap();
        assert_eq!(out, dir.path().join("data").join("Demo"));
        for name in [DOC_FILE, BINS_FILE, SIMILARITY_FILE] {
            assert!(out.join(name).is_file());
        }
        assert_eq!(fs::read_to_string(out.join(DOC_FILE)).unwrap(), artifacts.docs);
    }
}
