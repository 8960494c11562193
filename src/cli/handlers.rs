use super::commands::CliArgs;
use crate::analyzer::{AnalysisReport, SolutionAnalyzer};
use crate::definition::{load_definition, Definition};
use crate::fs::RealFileSystem;
use crate::progress::{ConsoleHandler, LoggingHandler, ProgressHandler};
use std::sync::Arc;
use tracing::debug;

/// Runs one bundling pass over the solution named by `definition`.
pub fn run_analysis(args: &CliArgs, definition: &Definition) -> AnalysisReport {
    let fs = RealFileSystem::new();
    let progress: Arc<dyn ProgressHandler> = if args.quiet {
        Arc::new(LoggingHandler)
    } else {
        Arc::new(ConsoleHandler)
    };

    SolutionAnalyzer::new(&fs, definition)
        .with_results_root(&args.results_dir)
        .with_progress(progress)
        .analyze()
}

/// Loads the definition, bundles, and prints the summary.
///
/// Always returns 0: problems are listed in the summary instead.
pub fn handle_analyze(args: &CliArgs) -> i32 {
    let definition = load_definition(args.definition_path.as_deref());
    debug!(?definition, "Effective definition");

    println!("Analyzing solution in: {}", definition.solution_path.display());
    println!("Processing all files: {}", definition.process_all_files);

    let report = run_analysis(args, &definition);

    println!();
    println!("{}", report);
    0
}
