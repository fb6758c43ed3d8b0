// assembler.rs - Fold comparison outcomes into the result matrix

use crate::core::dispatcher::PairOutcome;
use crate::core::matrix::{ComparisonMode, ResultMatrix};
use crate::core::planner::Plan;

/// Fill a copy of the plan's skeleton with transformed scores.
///
/// Matrix mode mirrors each value across the diagonal; reference mode writes
/// only the (query, reference) cell. Failed outcomes leave their cells empty.
pub fn assemble(plan: &Plan, outcomes: &[PairOutcome]) -> ResultMatrix {
    let mut matrix = plan.skeleton.clone();

    for outcome in outcomes {
        let Ok(identity) = &outcome.result else {
            continue;
        };
        let value = plan.metric.transform(*identity);
        let pair = &outcome.pair;
        match plan.mode {
            ComparisonMode::Matrix => matrix.set_symmetric(pair.row, pair.col, value),
            ComparisonMode::Reference => matrix.set(pair.row, pair.col, value),
        }
    }

    log::info!(
        "Assembled {} ({} empty cells)",
        matrix,
        matrix.missing_cells()
    );
    matrix
}
