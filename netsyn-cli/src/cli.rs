//! Command-line interface orchestration for the netsyn synergy predictor.
//!
//! Three subcommands cover the pipeline end to end: `build` normalizes raw
//! graph/module/signature inputs against the retained connected component,
//! `run` scores every drug pair per disease and writes the predictions CSV,
//! and `evaluate` joins predictions against a known-synergy reference to
//! produce per-disease AUC summaries.

use std::collections::{BTreeSet, HashMap};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use netsyn_core::{
    DiagnosticReport, DiseaseModule, DrugModule, EvaluationSummary, GraphIndex, NetsynError,
    Predictor, PredictionRecord, ScoringConfig, evaluate_predictions,
};
use netsyn_providers_graph::{GraphProviderError, RawEdge, read_edge_list, read_graphml, write_edge_list};
use netsyn_providers_tabular::{
    KnownSynergies, RawDrugModule, TabularProviderError, label_predictions, read_disease_modules,
    read_disease_signatures, read_drug_modules, read_predictions, write_disease_modules,
    write_disease_signatures, write_drug_modules, write_evaluation_summary, write_predictions,
};
use thiserror::Error;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(name = "netsyn", about = "Predict synergistic drug pairs over a gene interaction network.")]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Normalize raw graph/module/signature inputs against the retained
    /// connected component.
    Build(BuildArgs),
    /// Score every drug pair per disease and write a predictions CSV.
    Run(RunArgs),
    /// Join predictions against known synergies and emit an AUC summary.
    Evaluate(EvaluateArgs),
}

/// Options accepted by the `build` command.
#[derive(Debug, Args, Clone)]
pub struct BuildArgs {
    /// Path to the interaction graph, as GraphML (`.graphml`/`.xml`) or an
    /// edge-list CSV.
    #[arg(long)]
    pub graph: PathBuf,

    /// Path to the disease-modules CSV (`module`, `gene` columns).
    #[arg(long = "disease-modules")]
    pub disease_modules: PathBuf,

    /// Path to the drug-modules CSV (`drug`, `gene`, `direction` columns).
    #[arg(long = "drug-modules")]
    pub drug_modules: PathBuf,

    /// Path to an optional disease-signatures TSV (`disease`, `gene`,
    /// `log_fc` columns).
    #[arg(long)]
    pub signatures: Option<PathBuf>,

    /// Directory the normalized artifacts are written into.
    #[arg(long = "out-dir")]
    pub out_dir: PathBuf,

    /// Number of equal-count degree bands in the degree-bin table.
    #[arg(long = "degree-bins", default_value_t = 20)]
    pub degree_bins: usize,
}

/// Options accepted by the `run` command.
#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// Path to the interaction graph, as GraphML (`.graphml`/`.xml`) or an
    /// edge-list CSV.
    #[arg(long)]
    pub graph: PathBuf,

    /// Path to the disease-modules CSV (`module`, `gene` columns).
    #[arg(long = "disease-modules")]
    pub disease_modules: PathBuf,

    /// Path to the drug-modules CSV (`drug`, `gene`, `direction` columns).
    #[arg(long = "drug-modules")]
    pub drug_modules: PathBuf,

    /// Path to an optional disease-signatures TSV (`disease`, `gene`,
    /// `log_fc` columns).
    #[arg(long)]
    pub signatures: Option<PathBuf>,

    /// Path to an optional scoring configuration TOML file; defaults to
    /// [`ScoringConfig::default`].
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Caps the number of drug pairs enumerated per disease; overrides the
    /// configuration file's `max_pairs`, if any.
    #[arg(long = "max-pairs")]
    pub max_pairs: Option<usize>,

    /// Path the predictions CSV is written to.
    #[arg(long)]
    pub out: PathBuf,

    /// Path an optional diagnostics JSON sidecar is written to.
    #[arg(long = "diagnostics-out")]
    pub diagnostics_out: Option<PathBuf>,
}

/// Options accepted by the `evaluate` command.
#[derive(Debug, Args, Clone)]
pub struct EvaluateArgs {
    /// Path to a predictions CSV produced by the `run` command.
    #[arg(long)]
    pub predictions: PathBuf,

    /// Path to the known-synergies CSV (`drug_a`, `drug_b`, optional
    /// `disease` columns).
    #[arg(long = "known-synergies")]
    pub known_synergies: PathBuf,

    /// Path the evaluation-summary CSV is written to.
    #[arg(long)]
    pub out: PathBuf,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// File or directory I/O failed outside the provider crates.
    #[error("failed to access `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Graph ingestion failed.
    #[error(transparent)]
    Graph(#[from] GraphProviderError),
    /// Tabular ingestion or output failed.
    #[error(transparent)]
    Tabular(#[from] TabularProviderError),
    /// Configuration loading or validation failed.
    #[error(transparent)]
    Config(#[from] netsyn_core::ConfigError),
    /// Core orchestration failed.
    #[error(transparent)]
    Core(#[from] NetsynError),
    /// Serializing a diagnostics sidecar failed.
    #[error("failed to write diagnostics sidecar `{path}`: {source}")]
    DiagnosticsSerialize {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying serialization failure.
        #[source]
        source: serde_json::Error,
    },
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub enum ExecutionSummary {
    /// Output of the `build` command.
    Build(BuildSummary),
    /// Output of the `run` command.
    Run(RunSummary),
    /// Output of the `evaluate` command.
    Evaluate(EvaluateSummary),
}

/// Counts reported after normalizing inputs via `build`.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub vertex_count: usize,
    pub dropped_vertex_count: usize,
    pub disease_module_count: usize,
    pub drug_module_count: usize,
}

/// Counts reported after scoring via `run`.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub disease_count: usize,
    pub drug_count: usize,
    pub record_count: usize,
    pub diagnostic_count: usize,
}

/// Per-disease AUC summaries reported after `evaluate`.
#[derive(Debug, Clone)]
pub struct EvaluateSummary {
    pub summaries: Vec<(String, EvaluationSummary)>,
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when loading inputs, scoring, or writing outputs
/// fails.
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    match cli.command {
        Command::Build(args) => run_build(args).map(ExecutionSummary::Build),
        Command::Run(args) => run_run(args).map(ExecutionSummary::Run),
        Command::Evaluate(args) => run_evaluate(args).map(ExecutionSummary::Evaluate),
    }
}

fn load_raw_edges(path: &Path) -> Result<Vec<RawEdge>, CliError> {
    let is_graphml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("graphml") || ext.eq_ignore_ascii_case("xml"));
    if is_graphml {
        Ok(read_graphml(path)?)
    } else {
        Ok(read_edge_list(path)?)
    }
}

fn run_build(args: BuildArgs) -> Result<BuildSummary, CliError> {
    let raw_edges = load_raw_edges(&args.graph)?;
    let edges: Vec<netsyn_core::EdgeTriple<'_>> = raw_edges
        .iter()
        .map(|edge| netsyn_core::EdgeTriple {
            gene_a: edge.gene_a.as_str(),
            gene_b: edge.gene_b.as_str(),
            source_tag: edge.source_tag.as_str(),
        })
        .collect();
    let (graph, dropped_vertex_count) = GraphIndex::build(&edges, args.degree_bins);

    std::fs::create_dir_all(&args.out_dir).map_err(|source| CliError::Io {
        path: args.out_dir.clone(),
        source,
    })?;

    write_edge_list(&args.out_dir.join("graph.csv"), &graph.edges())?;

    let raw_disease_modules = read_disease_modules(&args.disease_modules)?;
    let normalized_disease_modules = filter_disease_modules(&graph, &raw_disease_modules);
    write_disease_modules(
        &args.out_dir.join("disease_modules.csv"),
        &normalized_disease_modules,
    )?;

    let raw_drug_modules = read_drug_modules(&args.drug_modules)?;
    let normalized_drug_modules = filter_drug_modules(&graph, &raw_drug_modules);
    write_drug_modules(&args.out_dir.join("drug_modules.csv"), &normalized_drug_modules)?;

    if let Some(signatures_path) = &args.signatures {
        let raw_signatures = read_disease_signatures(signatures_path)?;
        let normalized_signatures = filter_signatures(&graph, &raw_signatures);
        write_disease_signatures(&args.out_dir.join("signatures.tsv"), &normalized_signatures)?;
    }

    Ok(BuildSummary {
        vertex_count: graph.vertex_count(),
        dropped_vertex_count,
        disease_module_count: normalized_disease_modules.len(),
        drug_module_count: normalized_drug_modules.len(),
    })
}

fn filter_disease_modules(
    graph: &GraphIndex,
    modules: &HashMap<String, Vec<String>>,
) -> HashMap<String, Vec<String>> {
    modules
        .iter()
        .map(|(name, genes)| {
            let retained: Vec<String> = genes
                .iter()
                .filter(|gene| graph.gene_id(gene).is_some())
                .cloned()
                .collect();
            (name.clone(), retained)
        })
        .collect()
}

fn filter_drug_modules(
    graph: &GraphIndex,
    modules: &HashMap<String, RawDrugModule>,
) -> HashMap<String, RawDrugModule> {
    modules
        .iter()
        .map(|(name, module)| {
            let up = module
                .up
                .iter()
                .filter(|gene| graph.gene_id(gene).is_some())
                .cloned()
                .collect();
            let down = module
                .down
                .iter()
                .filter(|gene| graph.gene_id(gene).is_some())
                .cloned()
                .collect();
            (name.clone(), RawDrugModule { up, down })
        })
        .collect()
}

fn filter_signatures(
    graph: &GraphIndex,
    signatures: &HashMap<String, HashMap<String, f64>>,
) -> HashMap<String, HashMap<String, f64>> {
    signatures
        .iter()
        .map(|(disease, genes)| {
            let retained: HashMap<String, f64> = genes
                .iter()
                .filter(|(gene, _)| graph.gene_id(gene).is_some())
                .map(|(gene, value)| (gene.clone(), *value))
                .collect();
            (disease.clone(), retained)
        })
        .collect()
}

fn run_run(args: RunArgs) -> Result<RunSummary, CliError> {
    let mut config = match &args.config {
        Some(path) => ScoringConfig::from_toml_file(path)?,
        None => ScoringConfig::default(),
    };
    if let Some(max_pairs) = args.max_pairs {
        config.max_pairs = Some(max_pairs);
    }

    let raw_edges = load_raw_edges(&args.graph)?;
    let edges: Vec<netsyn_core::EdgeTriple<'_>> = raw_edges
        .iter()
        .map(|edge| netsyn_core::EdgeTriple {
            gene_a: edge.gene_a.as_str(),
            gene_b: edge.gene_b.as_str(),
            source_tag: edge.source_tag.as_str(),
        })
        .collect();
    let (graph, _dropped_vertex_count) = GraphIndex::build(&edges, config.degree_bins);

    let raw_drug_modules = read_drug_modules(&args.drug_modules)?;
    let mut drug_names: Vec<&String> = raw_drug_modules.keys().collect();
    drug_names.sort_unstable();
    let drugs: Vec<DrugModule> = drug_names
        .iter()
        .map(|name| {
            let module = &raw_drug_modules[name.as_str()];
            DrugModule::bind(&graph, name, &module.up, &module.down)
        })
        .collect();

    let raw_disease_modules = read_disease_modules(&args.disease_modules)?;
    let raw_signatures = match &args.signatures {
        Some(path) => read_disease_signatures(path)?,
        None => HashMap::new(),
    };
    let mut disease_names: Vec<&String> = raw_disease_modules.keys().collect();
    disease_names.sort_unstable();

    let predictor = Predictor::new(&graph, config);
    let mut all_records: Vec<PredictionRecord> = Vec::new();
    let mut report = DiagnosticReport::new();

    for (index, name) in disease_names.iter().enumerate() {
        let genes = &raw_disease_modules[name.as_str()];
        let mut disease = DiseaseModule::bind(&graph, name, genes);
        if let Some(signature) = raw_signatures.get(name.as_str()) {
            disease = disease.with_signature(&graph, signature);
        }
        let disease_id = u32::try_from(index).unwrap_or(u32::MAX);
        let (records, disease_report) = predictor.predict(disease_id, &disease, &drugs);
        all_records.extend(records);
        report.extend(disease_report);
    }

    write_predictions(&args.out, &all_records, false)?;

    if let Some(diagnostics_path) = &args.diagnostics_out {
        let file = std::fs::File::create(diagnostics_path).map_err(|source| CliError::Io {
            path: diagnostics_path.clone(),
            source,
        })?;
        serde_json::to_writer_pretty(file, &report).map_err(|source| {
            CliError::DiagnosticsSerialize {
                path: diagnostics_path.clone(),
                source,
            }
        })?;
    }

    Ok(RunSummary {
        disease_count: disease_names.len(),
        drug_count: drugs.len(),
        record_count: all_records.len(),
        diagnostic_count: report.len(),
    })
}

fn run_evaluate(args: EvaluateArgs) -> Result<EvaluateSummary, CliError> {
    let predictions = read_predictions(&args.predictions)?;
    let synergies = KnownSynergies::read(&args.known_synergies)?;

    let diseases: BTreeSet<&str> = predictions.iter().map(|row| row.disease.as_str()).collect();
    let mut summaries = Vec::with_capacity(diseases.len());
    for disease in diseases {
        let labeled = label_predictions(&predictions, disease, &synergies);
        let summary = evaluate_predictions(&labeled, synergies.count_for(disease));
        summaries.push((disease.to_owned(), summary));
    }

    write_evaluation_summary(&args.out, &summaries)?;

    Ok(EvaluateSummary { summaries })
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary {
        ExecutionSummary::Build(build) => {
            writeln!(writer, "vertices retained: {}", build.vertex_count)?;
            writeln!(writer, "vertices dropped: {}", build.dropped_vertex_count)?;
            writeln!(writer, "disease modules: {}", build.disease_module_count)?;
            writeln!(writer, "drug modules: {}", build.drug_module_count)?;
        }
        ExecutionSummary::Run(run) => {
            writeln!(writer, "diseases: {}", run.disease_count)?;
            writeln!(writer, "drugs: {}", run.drug_count)?;
            writeln!(writer, "predictions: {}", run.record_count)?;
            writeln!(writer, "diagnostics: {}", run.diagnostic_count)?;
        }
        ExecutionSummary::Evaluate(evaluate) => {
            for (disease, summary) in &evaluate.summaries {
                writeln!(
                    writer,
                    "{disease}\tauc_roc={:?}\tauc_pr={:?}\tn_predictions={}\tn_known_synergies={}\tn_true_positives={}",
                    summary.auc_roc,
                    summary.auc_pr,
                    summary.n_predictions,
                    summary.n_known_synergies,
                    summary.n_true_positives,
                )?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn write_graph(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("graph.csv");
        let mut file = std::fs::File::create(&path).expect("create graph file");
        writeln!(file, "gene_a,gene_b,source_tag").expect("header");
        writeln!(file, "TP53,EGFR,ppi").expect("row");
        writeln!(file, "EGFR,MYC,ppi").expect("row");
        path
    }

    fn write_disease_modules_csv(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("disease_modules.csv");
        let mut file = std::fs::File::create(&path).expect("create disease modules file");
        writeln!(file, "module,gene").expect("header");
        writeln!(file, "lung_cancer,TP53").expect("row");
        writeln!(file, "lung_cancer,EGFR").expect("row");
        path
    }

    fn write_drug_modules_csv(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("drug_modules.csv");
        let mut file = std::fs::File::create(&path).expect("create drug modules file");
        writeln!(file, "drug,gene,direction").expect("header");
        writeln!(file, "drugA,TP53,up").expect("row");
        writeln!(file, "drugB,MYC,down").expect("row");
        path
    }

    #[rstest]
    fn build_normalizes_and_reports_counts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let graph = write_graph(&dir);
        let disease_modules = write_disease_modules_csv(&dir);
        let drug_modules = write_drug_modules_csv(&dir);
        let out_dir = dir.path().join("out");

        let cli = Cli {
            command: Command::Build(BuildArgs {
                graph,
                disease_modules,
                drug_modules,
                signatures: None,
                out_dir: out_dir.clone(),
                degree_bins: 2,
            }),
        };
        let summary = run_cli(cli).expect("build must succeed");
        match summary {
            ExecutionSummary::Build(build) => {
                assert_eq!(build.vertex_count, 3);
                assert_eq!(build.dropped_vertex_count, 0);
                assert_eq!(build.disease_module_count, 1);
                assert_eq!(build.drug_module_count, 2);
            }
            other => panic!("unexpected summary: {other:?}"),
        }
        assert!(out_dir.join("graph.csv").exists());
        assert!(out_dir.join("disease_modules.csv").exists());
        assert!(out_dir.join("drug_modules.csv").exists());
    }

    #[rstest]
    fn run_scores_all_pairs_and_writes_predictions() {
        let dir = tempfile::tempdir().expect("tempdir");
        let graph = write_graph(&dir);
        let disease_modules = write_disease_modules_csv(&dir);
        let drug_modules = write_drug_modules_csv(&dir);
        let out = dir.path().join("predictions.csv");

        let cli = Cli {
            command: Command::Run(RunArgs {
                graph,
                disease_modules,
                drug_modules,
                signatures: None,
                config: None,
                max_pairs: None,
                out: out.clone(),
                diagnostics_out: None,
            }),
        };
        let summary = run_cli(cli).expect("run must succeed");
        match summary {
            ExecutionSummary::Run(run) => {
                assert_eq!(run.disease_count, 1);
                assert_eq!(run.drug_count, 2);
                assert_eq!(run.record_count, 1);
            }
            other => panic!("unexpected summary: {other:?}"),
        }
        assert!(out.exists());
    }

    #[rstest]
    fn evaluate_joins_predictions_with_known_synergies() {
        let dir = tempfile::tempdir().expect("tempdir");
        let predictions = dir.path().join("predictions.csv");
        let mut file = std::fs::File::create(&predictions).expect("create predictions file");
        writeln!(
            file,
            "disease,drug_a,drug_b,tqab,pqab,cqab,prediction_score,topology_class,pqa,pqb,cqa,cqb"
        )
        .expect("header");
        writeln!(file, "lung_cancer,drugA,drugB,0.1,0.2,0.3,0.6,complementary,0.4,0.5,0.6,0.7")
            .expect("row");
        drop(file);

        let known_synergies = dir.path().join("known_synergies.csv");
        let mut file = std::fs::File::create(&known_synergies).expect("create synergies file");
        writeln!(file, "drug_a,drug_b,disease").expect("header");
        writeln!(file, "drugA,drugB,lung_cancer").expect("row");
        drop(file);

        let out = dir.path().join("evaluation.csv");
        let cli = Cli {
            command: Command::Evaluate(EvaluateArgs {
                predictions,
                known_synergies,
                out: out.clone(),
            }),
        };
        let summary = run_cli(cli).expect("evaluate must succeed");
        match summary {
            ExecutionSummary::Evaluate(evaluate) => {
                assert_eq!(evaluate.summaries.len(), 1);
                assert_eq!(evaluate.summaries[0].0, "lung_cancer");
                assert_eq!(evaluate.summaries[0].1.n_true_positives, 1);
            }
            other => panic!("unexpected summary: {other:?}"),
        }
        assert!(out.exists());
    }

    #[test]
    fn clap_rejects_unknown_command() {
        let args = ["netsyn", "frobnicate"];
        let result = Cli::try_parse_from(args);
        assert!(result.is_err());
    }
}
