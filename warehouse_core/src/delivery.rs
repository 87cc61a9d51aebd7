use serde::{Deserialize, Serialize};

use crate::{Position, map::Grid, path::shortest_path, warehouse::CellKind};

/// Observes the progress of a delivery run.
///
/// The orchestrator drives one of these through every leg of the run.
/// Frontends decide what a notice looks like: stdout lines, UI playback
/// frames, or plain recordings in tests.
pub trait MovementReporter {
    /// Called with every successfully planned path, departure cell first
    /// and destination cell last.
    fn path(&mut self, path: &[Position]);

    /// No route exists from the agent's current position to this pickup.
    fn pickup_unreachable(&mut self, pickup: Position);

    /// The agent collected the package at `pickup`.
    fn pickup_collected(&mut self, pickup: Position);

    /// No route exists from `from` to the drop-off zone.
    fn dropoff_unreachable(&mut self, from: Position);

    /// The agent delivered a package at the drop-off zone.
    fn package_delivered(&mut self, dropoff: Position);

    /// The run is over; `result` carries the final tally.
    fn finished(&mut self, result: RunResult);
}

/// Final tally of a delivery run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    /// Packages present on the floor when the run started.
    pub packages_found: usize,
    /// Packages successfully carried to the drop-off zone.
    pub packages_delivered: usize,
}

/// Runs the full collection-and-delivery cycle over every package on the
/// floor.
///
/// Packages are visited in the order a row-major scan discovers them when
/// the run starts; the list is not re-scanned as the grid changes. Every
/// collected package clears its cell to `Empty` before the next search, so
/// later routes observe the updated floor. A leg with no route is reported
/// and skipped; the run carries on with the next package. Each leg is
/// attempted exactly once.
pub fn run(
    grid: &mut Grid<CellKind>,
    start: Position,
    dropoff: Position,
    reporter: &mut dyn MovementReporter,
) -> RunResult {
    let pickups = grid.find_all(&CellKind::Pickup);
    let packages_found = pickups.len();
    let mut packages_delivered = 0;
    let mut agent = start;

    for pickup in pickups {
        let Some(to_pickup) = shortest_path(grid, agent, pickup) else {
            // The agent stays put; the next package is attempted from here.
            reporter.pickup_unreachable(pickup);
            continue;
        };
        reporter.path(&to_pickup);

        grid[pickup] = CellKind::Empty;
        agent = pickup;
        reporter.pickup_collected(pickup);

        let Some(to_dropoff) = shortest_path(grid, agent, dropoff) else {
            // The package stays with the agent at the pickup cell.
            reporter.dropoff_unreachable(agent);
            continue;
        };
        reporter.path(&to_dropoff);

        agent = dropoff;
        packages_delivered += 1;
        reporter.package_delivered(dropoff);
    }

    let result = RunResult {
        packages_found,
        packages_delivered,
    };
    reporter.finished(result);
    result
}
