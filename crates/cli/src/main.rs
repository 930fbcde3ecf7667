//! Delinea CLI - spatial clustering and outline reconstruction

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use delinea_algorithms::boundary::{
    BoundaryStrategy, DelaunayMergeParams, LineProjectionParams, SnakeParams,
};
use delinea_algorithms::clustering::{ClusterParams, GraphClusterer, ThresholdPolicy};
use delinea_algorithms::pipeline::{delineate_with_progress, DelineationParams};
use delinea_core::io::{GeoJsonFile, VectorSink, VectorSource};
use delinea_core::vector::{Feature, FeatureCollection};
use geo_types::{Geometry, Point};

// ─── CLI structure ──────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "delinea")]
#[command(author, version, about = "Spatial clustering and non-convex outline reconstruction", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Cluster the polygons (or points) of a GeoJSON layer
    Cluster {
        /// Input GeoJSON file
        input: PathBuf,
        /// Output GeoJSON file
        output: PathBuf,
        #[command(flatten)]
        cluster: ClusterArgs,
    },
    /// Cluster polygons and write one outline per cluster
    Outline {
        /// Input GeoJSON file
        input: PathBuf,
        /// Output GeoJSON file
        output: PathBuf,
        #[command(flatten)]
        cluster: ClusterArgs,
        /// Reconstruction strategy
        #[arg(short, long, value_enum)]
        strategy: Option<StrategyArg>,
        /// Longest triangle edge kept by the delaunay strategy
        #[arg(long)]
        max_edge: Option<f64>,
        /// Sampling / grid resolution for the projection and snake strategies
        #[arg(long)]
        resolution: Option<f64>,
    },
}

#[derive(clap::Args)]
struct ClusterArgs {
    /// Fixed edge-length threshold
    #[arg(short, long, conflicts_with = "stddev")]
    threshold: Option<f64>,
    /// Statistical threshold: mean + k * stddev of the tree edge lengths
    #[arg(long)]
    stddev: Option<f64>,
    /// JSON parameter file; flags override its fields
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    Delaunay,
    Projection,
    Snake,
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to install logger")
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn done(name: &str, path: &Path, elapsed: std::time::Duration) {
    println!("{} saved to: {}", name, path.display());
    println!("  Processing time: {:.2?}", elapsed);
}

fn load_params(config: Option<&Path>) -> Result<DelineationParams> {
    let Some(path) = config else {
        return Ok(DelineationParams::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid config {}", path.display()))
}

fn apply_cluster_args(params: &mut ClusterParams, args: &ClusterArgs) {
    if let Some(length) = args.threshold {
        params.threshold = ThresholdPolicy::fixed(length);
    }
    if let Some(k) = args.stddev {
        let cap = match params.threshold {
            ThresholdPolicy::StdDev { max_edge_length, .. } => max_edge_length,
            ThresholdPolicy::Fixed { .. } => None,
        };
        params.threshold = ThresholdPolicy::StdDev { k, max_edge_length: cap };
    }
}

/// Select the strategy named on the command line, keeping the config's
/// parameters when it already names the same one.
fn apply_strategy_args(
    strategy: &mut BoundaryStrategy,
    choice: Option<StrategyArg>,
    max_edge: Option<f64>,
    resolution: Option<f64>,
) {
    let replacement = match (choice, strategy.name()) {
        (Some(StrategyArg::Delaunay), name) if name != "delaunay_merge" => {
            Some(BoundaryStrategy::DelaunayMerge(DelaunayMergeParams::default()))
        }
        (Some(StrategyArg::Projection), name) if name != "line_projection" => {
            Some(BoundaryStrategy::LineProjection(LineProjectionParams::default()))
        }
        (Some(StrategyArg::Snake), name) if name != "snake" => {
            Some(BoundaryStrategy::Snake(SnakeParams::default()))
        }
        _ => None,
    };
    if let Some(s) = replacement {
        *strategy = s;
    }

    match strategy {
        BoundaryStrategy::DelaunayMerge(p) => {
            if let Some(v) = max_edge {
                p.max_edge_length = v;
            }
        }
        BoundaryStrategy::LineProjection(p) => {
            if let Some(v) = resolution {
                p.resolution = v;
            }
        }
        BoundaryStrategy::Snake(p) => {
            if let Some(v) = resolution {
                p.resolution = v;
            }
        }
    }
}

fn describe_threshold(policy: &ThresholdPolicy) -> String {
    match policy {
        ThresholdPolicy::Fixed { length } => format!("fixed {}", length),
        ThresholdPolicy::StdDev { k, max_edge_length: Some(cap) } => {
            format!("mean + {} * stddev (max {})", k, cap)
        }
        ThresholdPolicy::StdDev { k, .. } => format!("mean + {} * stddev", k),
    }
}

fn write_output(features: &FeatureCollection, path: &Path) -> Result<()> {
    let pb = spinner("Writing output...");
    GeoJsonFile::new(path)
        .write_features(features)
        .context("Failed to write output")?;
    pb.finish_and_clear();
    Ok(())
}

// ─── Commands ───────────────────────────────────────────────────────────

fn run_cluster(input: &Path, output: &Path, args: &ClusterArgs) -> Result<()> {
    let mut params = load_params(args.config.as_deref())?.cluster;
    apply_cluster_args(&mut params, args);
    info!("Threshold: {}", describe_threshold(&params.threshold));

    let source = GeoJsonFile::new(input);
    let pb = spinner("Reading features...");
    let polygons = source.read_polygons().context("Failed to read input")?;
    let points = if polygons.is_empty() {
        source.read_points().context("Failed to read input")?
    } else {
        Vec::new()
    };
    pb.finish_and_clear();

    let clusterer = GraphClusterer::from_params(&params);
    let start = Instant::now();
    let pb = spinner("Clustering...");
    let (clustering, features): (_, FeatureCollection) = if polygons.is_empty() {
        info!("Input: {} points", points.len());
        let clustering = clusterer.cluster_points(&points).context("Clustering failed")?;
        let labels = clustering.labels();
        let features = points
            .iter()
            .zip(&labels)
            .map(|(p, &label)| {
                Feature::new(Geometry::Point(Point::new(p.x, p.y))).with_property("cluster", label)
            })
            .collect();
        (clustering, features)
    } else {
        info!("Input: {} polygons", polygons.len());
        let clustering = clusterer.cluster_polygons(&polygons).context("Clustering failed")?;
        let labels = clustering.labels();
        let features = polygons
            .into_iter()
            .zip(&labels)
            .map(|(p, &label)| Feature::from_polygon(p).with_property("cluster", label))
            .collect();
        (clustering, features)
    };
    pb.finish_and_clear();
    let elapsed = start.elapsed();

    info!(
        "{} clusters (threshold {:.3}, largest {})",
        clustering.num_clusters(),
        clustering.threshold,
        clustering.largest_cluster_len()
    );
    write_output(&features, output)?;
    done("Clusters", output, elapsed);
    Ok(())
}

fn run_outline(
    input: &Path,
    output: &Path,
    args: &ClusterArgs,
    strategy: Option<StrategyArg>,
    max_edge: Option<f64>,
    resolution: Option<f64>,
) -> Result<()> {
    let mut params = load_params(args.config.as_deref())?;
    apply_cluster_args(&mut params.cluster, args);
    apply_strategy_args(&mut params.strategy, strategy, max_edge, resolution);
    info!(
        "Threshold: {}, strategy: {}",
        describe_threshold(&params.cluster.threshold),
        params.strategy.name()
    );

    let pb = spinner("Reading polygons...");
    let polygons = GeoJsonFile::new(input)
        .read_polygons()
        .context("Failed to read input")?;
    pb.finish_and_clear();
    if polygons.is_empty() {
        anyhow::bail!("No polygons found in {}", input.display());
    }
    info!("Input: {} polygons", polygons.len());

    let start = Instant::now();
    let pb = spinner("Reconstructing outlines...");
    let result = delineate_with_progress(&polygons, &params, |done, total| {
        pb.set_message(format!("Reconstructing outlines... {}/{}", done, total));
    })
    .context("Clustering failed")?;
    pb.finish_and_clear();
    let elapsed = start.elapsed();

    for (id, outline) in result.outlines.iter().enumerate() {
        if let Err(e) = outline {
            warn!(
                "Cluster {} ({} members) skipped: {}",
                id,
                result.clustering.clusters[id].len(),
                e
            );
        }
    }

    let features: FeatureCollection = result
        .successful()
        .map(|o| {
            Feature::from_polygon(o.polygon.clone())
                .with_property("cluster", o.cluster)
                .with_property("members", o.members.len())
                .with_property("area", o.area)
        })
        .collect();
    info!(
        "{} of {} clusters outlined",
        features.len(),
        result.clustering.num_clusters()
    );
    write_output(&features, output)?;
    done("Outlines", output, elapsed);
    Ok(())
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Cluster {
            input,
            output,
            cluster,
        } => run_cluster(&input, &output, &cluster),
        Commands::Outline {
            input,
            output,
            cluster,
            strategy,
            max_edge,
            resolution,
        } => run_outline(&input, &output, &cluster, strategy, max_edge, resolution),
    }
}
