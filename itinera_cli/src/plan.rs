use std::{future::Future, time::Duration};

use clap::Args;
use comfy_table::Table;
use indicatif::ProgressBar;
use itinera_optimizer::{
    problem::{location::LocationIdx, meters::Meters},
    trip_planner::{RouteImprovement, Trip, TripPlanner, TripPlannerParams},
};
use tracing::warn;

use crate::{
    cache_snapshot::{load_cache, save_cache},
    oracle_args::OracleArgs,
    resolve::resolve_locations,
};

#[derive(Args)]
pub struct PlanArgs {
    /// The city the trip starts from
    #[arg(short, long)]
    start: String,

    /// A city to visit, repeat for every destination
    #[arg(short, long = "destination", required = true)]
    destinations: Vec<String>,

    #[command(flatten)]
    oracle: OracleArgs,

    /// Improve the greedy order with a 2-opt pass
    #[arg(long)]
    two_opt: bool,
}

pub async fn run(args: PlanArgs) -> Result<(), anyhow::Error> {
    let names = std::iter::once(args.start.clone())
        .chain(args.destinations.iter().cloned())
        .collect::<Vec<_>>();

    let spinner = ProgressBar::new_spinner();
    spinner.enable_steady_tick(Duration::from_millis(120));

    let (planner, trip) = while_spinning(&spinner, async {
        spinner.set_message("Getting city coordinates...");
        let locations = resolve_locations(&names).await?;

        spinner.set_message("Calculating distances...");
        let planner = TripPlanner::new(
            args.oracle.client(),
            load_cache()?,
            args.oracle.throttle(),
            TripPlannerParams {
                improvement: if args.two_opt {
                    RouteImprovement::TwoOpt
                } else {
                    RouteImprovement::None
                },
            },
        );

        let trip = planner.plan(&locations, LocationIdx::new(0)).await?;
        Ok::<_, anyhow::Error>((planner, trip))
    })
    .await?;

    save_cache(planner.cache())?;

    println!("{}", trip_table(&trip));
    println!("Total distance: {}", trip.total_distance());

    if !trip.is_complete() {
        for (_, location) in trip.skipped() {
            warn!("{} could not be reached and is not part of the trip", location.name());
        }
    }

    Ok(())
}

/// Runs `work` and clears the spinner once it settles, successfully or not.
async fn while_spinning<T>(
    spinner: &ProgressBar,
    work: impl Future<Output = Result<T, anyhow::Error>>,
) -> Result<T, anyhow::Error> {
    let result = work.await;
    spinner.finish_and_clear();
    result
}

fn trip_table(trip: &Trip) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["#", "City", "Leg", "Cumulative"]);

    let mut stops = trip.stops();
    if let Some(first) = stops.next() {
        table.add_row(vec![
            "1".to_string(),
            first.name().to_string(),
            "-".to_string(),
            Meters::ZERO.to_string(),
        ]);
    }

    let mut cumulative = Meters::ZERO;
    for (index, (_, to, distance)) in trip.legs().enumerate() {
        cumulative += distance;
        table.add_row(vec![
            (index + 2).to_string(),
            to.name().to_string(),
            distance.to_string(),
            cumulative.to_string(),
        ]);
    }

    table
}
