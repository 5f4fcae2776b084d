//! AutoElo CLI - list, export and rate tournament pools
//!
//! Each input is a pool saved from the bracket service as JSON (a list of
//! sets or a phaseGroup query response). Pools are processed in the order
//! given on the command line.

use anyhow::Result;
use autoelo::elo::K_FACTOR;
use autoelo::pipeline::{
    export_pools, package_workbook, rate_pools, show_pools, ExportConfig, PackageConfig,
    RateConfig, RoundOrder,
};
use autoelo::ratings::DEFAULT_RATING;
use autoelo::workbook::{TournamentInfo, TournamentType};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "autoelo")]
#[command(about = "Turn bracket sets into ordered match tables and Elo ratings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the matches of each pool
    Show {
        /// Pool files (JSON)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Match ordering: default (length, then name) or structured
        #[arg(long, default_value = "default")]
        order: RoundOrder,
    },

    /// Export pools to a six-column match CSV
    Export {
        /// Pool files (JSON)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output CSV file
        #[arg(short, long, default_value = "matches.csv")]
        output: PathBuf,

        /// Match ordering: default (length, then name) or structured
        #[arg(long, default_value = "default")]
        order: RoundOrder,
    },

    /// Update Elo ratings from every match with a known score.
    ///
    /// Inputs may be raw pool JSON or match CSVs from `export`. Matches are
    /// rated in input order; unknown scores are skipped.
    Rate {
        /// Pool files (JSON) or exported match tables (CSV)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Ratings CSV (Player ID, Player Name, Rating, Matches)
        #[arg(short, long, env = "AUTOELO_RATINGS", default_value = "ratings.csv")]
        ratings: PathBuf,

        /// Elo K-factor
        #[arg(short, long, default_value_t = K_FACTOR)]
        k_factor: f64,

        /// Rating for players not yet in the ratings file
        #[arg(long, default_value_t = DEFAULT_RATING)]
        initial_rating: f64,

        /// Match ordering for JSON pools
        #[arg(long, default_value = "default")]
        order: RoundOrder,

        /// Write the rated match table here
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the updated ratings back to the ratings file
        #[arg(long)]
        save_ratings: bool,

        /// Number of leaderboard entries to print
        #[arg(long, default_value = "10")]
        top_n: usize,
    },

    /// Package pools into an xlsx workbook with a tournament summary
    Package {
        /// Pool files (JSON)
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Output xlsx file
        #[arg(short, long)]
        output: PathBuf,

        /// Tournament name shown on the Summary sheet
        #[arg(short, long, env = "AUTOELO_TOURNAMENT")]
        tournament: String,

        /// Tournament URL shown on the Summary sheet
        #[arg(long, env = "AUTOELO_TOURNAMENT_URL", default_value = "")]
        url: String,

        /// online or offline
        #[arg(long, default_value = "offline")]
        tournament_type: TournamentType,

        /// Match ordering
        #[arg(long, default_value = "default")]
        order: RoundOrder,

        /// Ratings CSV; when given, Rated Matches and Ratings sheets are added
        #[arg(short, long, env = "AUTOELO_RATINGS")]
        ratings: Option<PathBuf>,

        /// Elo K-factor
        #[arg(short, long, default_value_t = K_FACTOR)]
        k_factor: f64,

        /// Rating for players not yet in the ratings file
        #[arg(long, default_value_t = DEFAULT_RATING)]
        initial_rating: f64,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Show { inputs, order } => {
            print!("{}", show_pools(&inputs, order)?);
        }
        Commands::Export {
            inputs,
            output,
            order,
        } => {
            let summary = export_pools(&ExportConfig {
                inputs,
                output,
                order,
            })?;
            println!("{}", summary);
        }
        Commands::Rate {
            inputs,
            ratings,
            k_factor,
            initial_rating,
            order,
            output,
            save_ratings,
            top_n,
        } => {
            let summary = rate_pools(&RateConfig {
                inputs,
                ratings,
                k_factor,
                initial_rating,
                order,
                output,
                save_ratings,
                top_n,
            })?;
            println!("{}", summary);
        }
        Commands::Package {
            inputs,
            output,
            tournament,
            url,
            tournament_type,
            order,
            ratings,
            k_factor,
            initial_rating,
        } => {
            let summary = package_workbook(&PackageConfig {
                inputs,
                output,
                order,
                info: TournamentInfo {
                    name: tournament,
                    url,
                    kind: tournament_type,
                },
                ratings,
                k_factor,
                initial_rating,
            })?;
            println!("{}", summary);
        }
    }

    Ok(())
}
