use crate::analyzer::DEFAULT_RESULTS_ROOT;
use clap::Parser;
use std::path::PathBuf;

pub const DEFINITION_PATH_ENV: &str = "DEFINITION_PATH";

/// Bundle a layered solution's sources, tests and manifests for review
#[derive(Parser, Debug)]
#[command(
    name = "layerpack",
    about = "Bundle a layered solution's sources, tests and manifests for review",
    version,
    long_about = "layerpack walks src/<Layer>, test(s)/<Layer>.Test(s) and deploy/kustomize of a \
                  solution and writes one concatenated file per layer and per manifest scope \
                  under <results-dir>/<name>/.\n\n\
                  Examples:\n  \
                  layerpack\n  \
                  layerpack --definition_path ordering.json\n  \
                  DEFINITION_PATH=ordering.json layerpack --results-dir /tmp/review"
)]
pub struct CliArgs {
    #[arg(
        long = "definition_path",
        env = DEFINITION_PATH_ENV,
        value_name = "FILE",
        help = "Path to the JSON definition file (defaults apply when omitted)"
    )]
    pub definition_path: Option<PathBuf>,

    #[arg(
        long,
        value_name = "DIR",
        default_value = DEFAULT_RESULTS_ROOT,
        help = "Directory that receives <name>/ with the bundles"
    )]
    pub results_dir: PathBuf,

    #[arg(long, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress progress lines and non-error logs"
    )]
    pub quiet: bool,
}
