use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;

use min_disagree::config::{BigMConfig, SolverConfig};
use min_disagree::data;
use min_disagree::harness;
use min_disagree::model::{
    AssignmentModel, BigMModel, DisagreementModel, ModelKind, OrderedTriangleModel, TriangleModel,
};
use min_disagree::solver::ExactSolver;
use min_disagree::storage;
use min_disagree::SignedGraph;

#[derive(Parser, Debug)]
#[clap(
    name = "min-disagree",
    about = "Exact correlation clustering with cross-checked 0/1-LP encodings"
)]
struct Cli {
    /// Path to a JSON file of problem instances
    #[clap(long)]
    input: PathBuf,

    /// Output directory for batch results
    #[clap(long, default_value = "output")]
    output_dir: PathBuf,

    /// Bound the number of clusters (only 2 and 3 are supported)
    #[clap(long)]
    k: Option<usize>,

    /// Formulations to run and cross-check
    #[clap(
        long,
        value_delimiter = ',',
        default_value = "triangle,ordered,big-m,assignment"
    )]
    models: Vec<String>,

    /// Big-M constant of the indicator formulation
    #[clap(long, default_value = "10.0")]
    big_m: f64,

    /// Separation epsilon of the indicator formulation
    #[clap(long, default_value = "0.5")]
    epsilon: f64,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
}

fn build_models(
    graph: &Arc<SignedGraph>,
    names: &[String],
    k: Option<usize>,
    solver_config: SolverConfig,
    big_m_config: BigMConfig,
) -> Result<Vec<Box<dyn DisagreementModel>>> {
    // The pairwise encodings only handle k in {2, 3}; the assignment
    // encoding takes any bound directly, so the kind is resolved per model
    // rather than up front
    let pairwise_kind = || match k {
        Some(k) => ModelKind::bounded(k),
        None => Ok(ModelKind::Unbounded),
    };

    let mut models: Vec<Box<dyn DisagreementModel>> = Vec::with_capacity(names.len());
    for name in names {
        // Every model gets its own fresh adapter; nothing is shared
        let solver = ExactSolver::new(solver_config);
        match name.as_str() {
            "triangle" => models.push(Box::new(TriangleModel::build(
                graph.clone(),
                pairwise_kind()?,
                solver,
            )?)),
            "ordered" => models.push(Box::new(OrderedTriangleModel::build(
                graph.clone(),
                pairwise_kind()?,
                solver,
            )?)),
            "big-m" => models.push(Box::new(BigMModel::build(
                graph.clone(),
                pairwise_kind()?,
                big_m_config,
                solver,
            )?)),
            "assignment" => models.push(Box::new(AssignmentModel::build(graph.clone(), k, solver)?)),
            other => bail!("unknown model '{other}' (expected triangle, ordered, big-m, assignment)"),
        }
    }
    Ok(models)
}

fn results_path(output_dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "batch".to_string());
    output_dir.join(format!("{stem}-result.json"))
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let solver_config = SolverConfig {
        threads: args.threads,
        ..SolverConfig::default()
    };
    let big_m_config = BigMConfig {
        big_m: args.big_m,
        epsilon: args.epsilon,
    };
    big_m_config.validate()?;

    log::info!("input: {}", args.input.display());
    log::info!("models: {}", args.models.join(", "));
    if let Some(k) = args.k {
        log::info!("cluster bound: k = {k}");
    }

    let instances = data::load_instances(&args.input)?;
    let output = results_path(&args.output_dir, &args.input);
    let mut results = storage::load_results(&output)?;
    if !results.is_empty() {
        log::info!(
            "resuming batch: {} of {} instances already done",
            results.len(),
            instances.len()
        );
    }

    for (idx, record) in instances.iter().enumerate().skip(results.len()) {
        log::info!(
            "instance {}/{}: n = {}, density = {}",
            idx + 1,
            instances.len(),
            record.size,
            record.density
        );
        let graph = Arc::new(record.signed_graph()?);
        let mut models = build_models(&graph, &args.models, args.k, solver_config, big_m_config)?;
        let report = harness::check_models(&mut models, &graph, record.density, record.optimal)
            .with_context(|| format!("instance {idx} failed consistency check"))?;
        results.push(report);
        // Rewritten after every instance so a crash can resume here
        storage::write_results(&output, &results)?;
    }

    for summary in storage::timing_summary(&results) {
        log::info!(
            "{}: median = {:.4}s, mean = {:.4}s, std = {:.4}s",
            summary.model,
            summary.median,
            summary.mean,
            summary.std_dev
        );
    }
    log::info!("batch complete, results in {}", output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> Arc<SignedGraph> {
        Arc::new(SignedGraph::new(vec![vec![0; 5]; 5]).unwrap())
    }

    fn build(names: &[&str], k: Option<usize>) -> Result<Vec<Box<dyn DisagreementModel>>> {
        let names: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        build_models(
            &graph(),
            &names,
            k,
            SolverConfig::default(),
            BigMConfig::default(),
        )
    }

    #[test]
    fn assignment_accepts_bounds_the_pairwise_encodings_reject() {
        let models = build(&["assignment"], Some(4)).unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].name(), "assignment-module-k4");
    }

    #[test]
    fn pairwise_encodings_still_reject_unsupported_bounds() {
        assert!(build(&["triangle"], Some(4)).is_err());
        assert!(build(&["ordered"], Some(4)).is_err());
        assert!(build(&["big-m"], Some(4)).is_err());
        assert!(build(&["triangle", "assignment"], Some(3)).is_ok());
    }

    #[test]
    fn unknown_model_name_is_rejected() {
        assert!(build(&["simplex"], None).is_err());
    }
}
