//! Map marker clustering tool
//!
//! Reads rental listing records from a JSON file, groups them into map
//! marker clusters (same-location collisions plus zoom-banded proximity
//! clustering), and writes the resulting clusters and individual markers
//! as CSV.

use clap::Parser;
use csv::WriterBuilder;
use std::fs::File;
use std::io;
use std::path::PathBuf;

mod cluster;


use cluster::{Category, ClusterOptions, ClusterOutput, DistanceModel, Listing, cluster_listings};

#[derive(Parser)]
#[command(name = "marker_cluster")]
#[command(about = "Map marker clustering tool for listing search views", long_about = None)]
struct Args {
    /// Input JSON file with an array of listing records
    #[arg(short, long, default_value = "listings.json")]
    input: PathBuf,

    /// Output CSV file with clusters and markers (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Map zoom level, drives the clustering threshold bands
    #[arg(short, long, default_value_t = 12.0)]
    zoom: f64,

    /// Only map listings of this category (stay or vehicle)
    #[arg(short, long, value_parser = parse_category)]
    category: Option<Category>,

    /// Render individual markers instead of clustering
    #[arg(long)]
    no_cluster: bool,

    /// Use the Haversine distance model instead of the spherical default
    #[arg(long)]
    haversine: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let listings = match read_listings(&args.input) {
        Ok(listings) => listings,
        Err(e) => {
            eprintln!("Error reading listings: {}", e);
            std::process::exit(1);
        }
    };

    if listings.is_empty() {
        eprintln!("No listings found in input file");
        std::process::exit(1);
    }

    let options = ClusterOptions {
        zoom: args.zoom,
        category: args.category,
        clustering_enabled: !args.no_cluster,
        distance_model: if args.haversine {
            DistanceModel::Haversine
        } else {
            DistanceModel::Spherical
        },
    };

    if args.debug {
        println!("Read {} listings from {:?}", listings.len(), args.input);
        println!(
            "Clustering at zoom {:.1} (enabled: {})",
            options.zoom, options.clustering_enabled
        );
    }

    let output = cluster_listings(&listings, &options);

    if args.debug {
        println!("Found {} clusters", output.clusters.len());
        println!("Found {} individual markers", output.unclustered.len());
        if output.truncated {
            println!("Marker output truncated by the volume cap");
        }
    }

    let result = match &args.output {
        None => write_markers(io::stdout(), &output),
        Some(output_file) => {
            File::create(output_file)
                .map_err(Into::into)
                .and_then(|file| write_markers(file, &output))
        }
    };

    if let Err(e) = result {
        eprintln!("Error writing output: {}", e);
        std::process::exit(1);
    }

    if args.debug {
        if let Some(output_file) = &args.output {
            println!("Markers written to {:?}", output_file);
        }
    }
}

/// clap value parser for the category filter
fn parse_category(s: &str) -> Result<Category, String> {
    Category::parse(s).ok_or_else(|| format!("unknown category {:?}, expected stay or vehicle", s))
}

/// Reads listing records from a JSON file
///
/// The file must hold a JSON array of listing objects; records with
/// unusable coordinates are kept here and filtered later by the
/// normalizer.
fn read_listings(filename: &PathBuf) -> Result<Vec<Listing>, Box<dyn std::error::Error>> {
    let file = File::open(filename)?;
    let listings = serde_json::from_reader(io::BufReader::new(file))?;
    Ok(listings)
}

/// Writes clusters and individual markers as CSV
///
/// Columns: `kind,id,latitude,longitude,size,tier`. Clusters come
/// first, then individual markers with size 1 and an empty tier.
fn write_markers<W: io::Write>(
    writer: W,
    output: &ClusterOutput,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut csv_writer = WriterBuilder::new().from_writer(writer);

    csv_writer.write_record(["kind", "id", "latitude", "longitude", "size", "tier"])?;

    for cluster in &output.clusters {
        csv_writer.write_record(&[
            "cluster".to_string(),
            cluster.id.clone(),
            cluster.position.lat.to_string(),
            cluster.position.lng.to_string(),
            cluster.members.len().to_string(),
            cluster.size_tier.label().to_string(),
        ])?;
    }

    for &i in &output.unclustered {
        let listing = &output.listings[i];
        csv_writer.write_record(&[
            "marker".to_string(),
            listing.id.clone(),
            listing.position.lat.to_string(),
            listing.position.lng.to_string(),
            "1".to_string(),
            String::new(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
