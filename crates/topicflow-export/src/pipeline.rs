//! End-to-end build of one project.
//!
//! Every input is read and validated before the first output byte is
//! written, so malformed input never leaves partial data behind.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use topicflow_corpus::{InputLayout, LoadedCorpus, MetadataLoader, SkipReport};
use topicflow_topics::{
    GraphBuild, GraphBuilder, GraphConfig, JoinConfig, JoinStats, LabeledMatrix, SimilarityTable,
    TopicJoiner,
};
use topicflow_types::{format_timestamp, Bin, BinSet, Period, Settings, TopicModel};

use crate::error::ExportError;
use crate::registry::Registry;
use crate::serializer::ProjectArtifacts;

/// Summary of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub project: String,
    pub year: i32,
    /// Directory the data files were written to
    pub output_dir: PathBuf,
    pub documents: usize,
    /// Documents carrying topic weights, per bin
    pub joined: Vec<usize>,
    pub join_stats: BTreeMap<Period, JoinStats>,
    pub skips: SkipReport,
    pub links: usize,
}

impl std::fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined: usize = self.joined.iter().sum();
        write!(
            f,
            "{}: {} documents ({}), {} joined to topics, {} similarity links",
            self.project, self.documents, self.skips, joined, self.links
        )
    }
}

/// Everything a project's data files are built from, fully parsed.
#[derive(Debug)]
pub struct ProjectInputs {
    pub layout: InputLayout,
    pub corpus: LoadedCorpus,
    /// `(doc_topic, topic_term)` per period
    pub matrices: Vec<(LabeledMatrix, LabeledMatrix)>,
    pub similarity: SimilarityTable,
}

/// Builds a project's data files from a docs and an LDA directory.
#[derive(Debug, Clone)]
pub struct Pipeline {
    settings: Settings,
}

impl Pipeline {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Read and validate every input.
    #[instrument(skip(self, docs_dir, lda_dir))]
    pub fn load(&self, docs_dir: &Path, lda_dir: &Path) -> Result<ProjectInputs, ExportError> {
        let layout = InputLayout::resolve(
            docs_dir,
            lda_dir,
            self.settings.metadata_prefix.as_str(),
            self.settings.year,
        )?;
        layout.validate()?;

        let corpus = MetadataLoader::new(&layout).load()?;

        let matrices = Period::ALL
            .iter()
            .map(|period| -> Result<_, ExportError> {
                let doc_topic = LabeledMatrix::read(&layout.doc_topic_path(*period))?;
                let topic_term = LabeledMatrix::read(&layout.topic_term_path(*period))?;
                Ok((doc_topic, topic_term))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let similarity = SimilarityTable::read(&layout.topic_flow_path())?;
        debug!(year = layout.year(), documents = corpus.documents.len(), "Loaded project inputs");

        Ok(ProjectInputs {
            layout,
            corpus,
            matrices,
            similarity,
        })
    }

    /// Join every period's topic matrix and assemble the bins.
    pub fn build_bins(
        &self,
        inputs: &ProjectInputs,
    ) -> Result<(BinSet, BTreeMap<Period, JoinStats>), ExportError> {
        let joiner = TopicJoiner::new(JoinConfig::from(&self.settings), inputs.layout.year());
        let mut bins = Vec::with_capacity(Period::ALL.len());
        let mut stats = BTreeMap::new();

        for (period, (doc_topic, topic_term)) in Period::ALL.iter().zip(&inputs.matrices) {
            let joined = joiner.join(
                *period,
                doc_topic,
                topic_term,
                inputs.corpus.emitted(*period),
            )?;
            bins.push(bin_for(&inputs.corpus, *period, joined.model));
            stats.insert(*period, joined.stats);
        }
        Ok((BinSet(bins), stats))
    }

    pub fn build_graph(&self, inputs: &ProjectInputs) -> Result<GraphBuild, ExportError> {
        let builder = GraphBuilder::new(GraphConfig::from(&self.settings));
        Ok(builder.build(&inputs.similarity)?)
    }

    /// Build and write the data files of `project`.
    #[instrument(skip(self, docs_dir, lda_dir), fields(docs = %docs_dir.display(), lda = %lda_dir.display()))]
    pub fn run(
        &self,
        project: &str,
        docs_dir: &Path,
        lda_dir: &Path,
    ) -> Result<PipelineReport, ExportError> {
        Registry::validate_name(project)?;

        let inputs = self.load(docs_dir, lda_dir)?;
        let (bins, join_stats) = self.build_bins(&inputs)?;
        let graph = self.build_graph(&inputs)?;
        let artifacts =
            ProjectArtifacts::render(project, &inputs.corpus.documents, &bins, &graph.graph)?;

        let output_dir = artifacts.write(&self.settings.expanded_frontend_dir())?;

        let report = PipelineReport {
            project: project.to_string(),
            year: inputs.layout.year(),
            output_dir,
            documents: inputs.corpus.documents.len(),
            joined: bins.iter().map(|b| b.topic_model.joined_documents()).collect(),
            join_stats,
            skips: inputs.corpus.skips.clone(),
            links: graph.stats.links,
        };
        info!(%report, "Pipeline complete");
        Ok(report)
    }
}

/// Bin of one period: every retained document plus the joined topic model.
fn bin_for(corpus: &LoadedCorpus, period: Period, topic_model: TopicModel) -> Bin {
    let documents = corpus.documents_in(period);
    let start = documents.iter().map(|d| d.timestamp).min();
    let end = documents.iter().map(|d| d.timestamp).max();
    Bin {
        tweet_ids: documents.iter().map(|d| d.id).collect(),
        start_time: start.as_ref().map(format_timestamp),
        bin_id: period.index(),
        topic_model,
        end_time: end.as_ref().map(format_timestamp),
    }
}
