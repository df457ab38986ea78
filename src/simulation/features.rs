//! Feature extraction: turns a bird and the upcoming gates into brain inputs.

use ndarray::Array1;

use super::bird::Bird;
use super::brain::Brain;
use super::error::{Error, Result};
use super::gate::Gate;

/// Width of the feature vector.
pub const FEATURE_COUNT: usize = 8;

const POSITION_SCALE: f32 = 400.0;
const VELOCITY_SCALE: f32 = 10.0;
const HEIGHT_SCALE: f32 = 200.0;

/// Distance reported for the second gate when there is none.
const NO_SECOND_GATE_DISTANCE: f32 = 1.0;

/// Fails with [`Error::InvalidInputSize`] unless `brain` consumes exactly
/// [`FEATURE_COUNT`] inputs.
pub fn check_brain(brain: &Brain) -> Result<()> {
    if brain.input_size() == FEATURE_COUNT {
        Ok(())
    } else {
        Err(Error::InvalidInputSize {
            expected: FEATURE_COUNT,
            actual: brain.input_size(),
        })
    }
}

/// Returns the first gate whose right edge is still ahead of `x`, and the one after it.
///
/// `gates` must be ordered by ascending x.
pub fn upcoming_gates(x: f32, gates: &[Gate]) -> (Option<&Gate>, Option<&Gate>) {
    let mut ahead = gates.iter().filter(|gate| gate.trailing_edge() > x);
    let next = ahead.next();
    let second = ahead.next();
    (next, second)
}

/// Builds the normalized feature vector for `bird`, or `None` if no gate lies ahead.
///
/// Layout:
/// 0. y / 400
/// 1. velocity / 10
/// 2. horizontal distance to the next gate / 400
/// 3. offset from the next gap centre / 200
/// 4. distance below the next gap top / 200
/// 5. distance above the next gap bottom / 200
/// 6. horizontal distance to the second gate / 400, or 1.0
/// 7. offset from the second gap centre / 200, or 0.0
pub fn extract(bird: &Bird, gates: &[Gate]) -> Option<Array1<f32>> {
    let (next, second) = upcoming_gates(bird.x, gates);
    let next = next?;

    let (second_distance, second_offset) = match second {
        Some(gate) => (
            (gate.x - bird.x) / POSITION_SCALE,
            (bird.y - gate.gap_y) / HEIGHT_SCALE,
        ),
        None => (NO_SECOND_GATE_DISTANCE, 0.0),
    };

    Some(Array1::from_vec(vec![
        bird.y / POSITION_SCALE,
        bird.velocity / VELOCITY_SCALE,
        (next.x - bird.x) / POSITION_SCALE,
        (bird.y - next.gap_y) / HEIGHT_SCALE,
        (bird.y - next.gap_top()) / HEIGHT_SCALE,
        (next.gap_bottom() - bird.y) / HEIGHT_SCALE,
        second_distance,
        second_offset,
    ]))
}
