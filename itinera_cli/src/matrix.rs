use clap::Args;
use itinera_optimizer::trip_planner::{TripPlanner, TripPlannerParams};
use tracing::info;

use crate::{
    cache_snapshot::{load_cache, save_cache},
    oracle_args::OracleArgs,
    resolve::resolve_locations,
};

#[derive(Args)]
pub struct MatrixArgs {
    /// A city to include, repeat for every city
    #[arg(short, long = "city", required = true)]
    cities: Vec<String>,

    #[command(flatten)]
    oracle: OracleArgs,
}

pub async fn run(args: MatrixArgs) -> Result<(), anyhow::Error> {
    let locations = resolve_locations(&args.cities).await?;

    let planner = TripPlanner::new(
        args.oracle.client(),
        load_cache()?,
        args.oracle.throttle(),
        TripPlannerParams::default(),
    );

    let matrix = planner.distance_matrix(&locations).await?;

    info!(
        "Computed {}x{} matrix with {:?}",
        matrix.num_locations(),
        matrix.num_locations(),
        args.oracle.provider()
    );

    save_cache(planner.cache())?;

    println!("{}", serde_json::to_string_pretty(&matrix)?);

    Ok(())
}
