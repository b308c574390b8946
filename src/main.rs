use anyhow::Result;
use clap::Parser;

use holoscope_cluster::cluster::detection::DEFAULT_MAX_PASSES;
use holoscope_cluster::cluster::TieBreak;
use holoscope_cluster::{data, pipeline, storage, viz, Config};

#[derive(Parser, Debug)]
#[clap(
    name = "holoscope-cluster",
    about = "Community detection over stream similarity matrices"
)]
struct Cli {
    /// Path to the relation matrix JSON file
    #[clap(long)]
    input: String,

    /// Output directory for results
    #[clap(long, default_value = "cluster_results")]
    output_dir: String,

    /// Maximum number of detection passes
    #[clap(long, default_value_t = DEFAULT_MAX_PASSES)]
    max_passes: usize,

    /// Tie-break rule between equally weighted communities
    #[clap(long, value_enum, default_value_t = TieBreak::LowestLabel)]
    tie_break: TieBreak,

    /// Minimum cluster size reported in summaries
    #[clap(long, default_value = "1")]
    min_cluster_size: usize,

    /// Skip GraphML/CSV exports
    #[clap(long)]
    skip_viz: bool,

    /// Number of worker threads (0 = use all available cores)
    #[clap(long, default_value = "0")]
    threads: usize,

    /// Verbose logging
    #[clap(long, short)]
    verbose: bool,
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

    let num_threads = if args.threads > 0 {
        args.threads
    } else {
        num_cpus::get()
    };

    log::info!("Using {} worker threads", num_threads);
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads)
        .build_global()?;

    log::info!("Starting stream cluster analysis");
    log::info!("Input: {}", args.input);
    log::info!("Output: {}", args.output_dir);

    let config = Config::new(args.max_passes, args.tie_break, args.min_cluster_size);

    // 1. Load relations
    let matrix = data::load_relations(&args.input)?;

    // 2. Build graph, detect communities, summarize
    let analysis = pipeline::analyze(&matrix, &config);

    log::info!(
        "Found {} communities (modularity {:.4})",
        analysis.stats.community_count,
        analysis.stats.modularity
    );

    // 3. Save results
    storage::save_results(&analysis, &args.output_dir)?;

    // 4. Generate exports if requested
    if !args.skip_viz {
        viz::generate_visualizations(&analysis.graph, &analysis.clusters, &args.output_dir)?;
    }

    log::info!("Analysis complete. Results saved to {}", args.output_dir);

    Ok(())
}
