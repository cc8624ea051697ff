use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

use crate::mode::{LARGE_COUNT, SMALL_COUNT};

/// A point on the board in percent of the play area (0..=100 on both axes)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridPoint {
    pub x: f64,
    pub y: f64,
}

impl GridPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// One placed, tappable number
#[derive(Debug, Clone, PartialEq)]
pub struct Target {
    pub value: u32,
    pub position: GridPoint,
    pub completed: bool,
}

pub const GRID_3X3: [GridPoint; SMALL_COUNT] = [
    GridPoint::new(25.0, 30.0),
    GridPoint::new(50.0, 30.0),
    GridPoint::new(75.0, 30.0),
    GridPoint::new(25.0, 50.0),
    GridPoint::new(50.0, 50.0),
    GridPoint::new(75.0, 50.0),
    GridPoint::new(25.0, 70.0),
    GridPoint::new(50.0, 70.0),
    GridPoint::new(75.0, 70.0),
];

pub const GRID_4X4: [GridPoint; LARGE_COUNT] = [
    GridPoint::new(20.0, 30.0),
    GridPoint::new(40.0, 30.0),
    GridPoint::new(60.0, 30.0),
    GridPoint::new(80.0, 30.0),
    GridPoint::new(20.0, 45.0),
    GridPoint::new(40.0, 45.0),
    GridPoint::new(60.0, 45.0),
    GridPoint::new(80.0, 45.0),
    GridPoint::new(20.0, 60.0),
    GridPoint::new(40.0, 60.0),
    GridPoint::new(60.0, 60.0),
    GridPoint::new(80.0, 60.0),
    GridPoint::new(20.0, 75.0),
    GridPoint::new(40.0, 75.0),
    GridPoint::new(60.0, 75.0),
    GridPoint::new(80.0, 75.0),
];

// Bounds for the scatter fallback
const SCATTER_X: std::ops::RangeInclusive<f64> = 15.0..=85.0;
const SCATTER_Y: std::ops::RangeInclusive<f64> = 25.0..=80.0;

/// Fixed coordinate set for a board of `len` targets, if one exists
pub fn grid_for(len: usize) -> Option<&'static [GridPoint]> {
    match len {
        SMALL_COUNT => Some(&GRID_3X3),
        LARGE_COUNT => Some(&GRID_4X4),
        _ => None,
    }
}

/// Source of randomness for board placement.
///
/// Implementations permute `values` in place; the result is zipped against
/// the fixed coordinate set. `scatter` is only consulted for board sizes
/// without a fixed grid.
pub trait Shuffler {
    fn shuffle(&mut self, values: &mut [u32]);

    fn scatter(&mut self) -> GridPoint;
}

/// Default shuffler backed by the thread-local RNG
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngShuffler;

impl Shuffler for ThreadRngShuffler {
    fn shuffle(&mut self, values: &mut [u32]) {
        values.shuffle(&mut rand::thread_rng());
    }

    fn scatter(&mut self) -> GridPoint {
        let mut rng = rand::thread_rng();
        GridPoint::new(rng.gen_range(SCATTER_X), rng.gen_range(SCATTER_Y))
    }
}

/// Reproducible shuffler, used by `--seed`
#[derive(Debug, Clone)]
pub struct SeededShuffler {
    rng: StdRng,
}

impl SeededShuffler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Shuffler for SeededShuffler {
    fn shuffle(&mut self, values: &mut [u32]) {
        values.shuffle(&mut self.rng);
    }

    fn scatter(&mut self) -> GridPoint {
        GridPoint::new(
            self.rng.gen_range(SCATTER_X),
            self.rng.gen_range(SCATTER_Y),
        )
    }
}

/// Place `values` on the board in a uniformly random arrangement.
///
/// Coordinate `i` of the fixed grid receives the `i`-th shuffled value. Lengths
/// without a fixed grid fall back to a bounded random scatter where overlap is
/// possible.
pub fn assign_positions(values: &[u32], shuffler: &mut dyn Shuffler) -> Vec<Target> {
    let mut shuffled = values.to_vec();
    shuffler.shuffle(&mut shuffled);

    match grid_for(shuffled.len()) {
        Some(grid) => shuffled
            .into_iter()
            .zip(grid.iter())
            .map(|(value, &position)| Target {
                value,
                position,
                completed: false,
            })
            .collect(),
        None => {
            log::warn!(
                "no fixed grid for {} targets, scattering randomly",
                shuffled.len()
            );
            shuffled
                .into_iter()
                .map(|value| Target {
                    value,
                    position: shuffler.scatter(),
                    completed: false,
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Reverses the values so placement is fully predictable
    struct ReverseShuffler;

    impl Shuffler for ReverseShuffler {
        fn shuffle(&mut self, values: &mut [u32]) {
            values.reverse();
        }

        fn scatter(&mut self) -> GridPoint {
            GridPoint::new(50.0, 50.0)
        }
    }

    fn assert_bijection(targets: &[Target], values: &[u32], grid: &[GridPoint]) {
        assert_eq!(targets.len(), values.len());
        let mut placed: Vec<u32> = targets.iter().map(|t| t.value).collect();
        placed.sort_unstable();
        let mut expected = values.to_vec();
        expected.sort_unstable();
        assert_eq!(placed, expected);

        for (target, point) in targets.iter().zip(grid.iter()) {
            assert_eq!(target.position, *point);
        }
        assert!(targets.iter().all(|t| !t.completed));
    }

    #[test]
    fn test_small_board_is_bijection() {
        let values: Vec<u32> = (1..=9).collect();
        for _ in 0..20 {
            let targets = assign_positions(&values, &mut ThreadRngShuffler);
            assert_bijection(&targets, &values, &GRID_3X3);
        }
    }

    #[test]
    fn test_large_board_is_bijection() {
        let values: Vec<u32> = (1..=16).map(|i| i * 7).collect();
        for _ in 0..20 {
            let targets = assign_positions(&values, &mut ThreadRngShuffler);
            assert_bijection(&targets, &values, &GRID_4X4);
        }
    }

    #[test]
    fn test_injected_shuffler_gives_exact_placement() {
        let values: Vec<u32> = (1..=9).collect();
        let targets = assign_positions(&values, &mut ReverseShuffler);
        assert_eq!(targets[0].value, 9);
        assert_eq!(targets[0].position, GridPoint::new(25.0, 30.0));
        assert_eq!(targets[8].value, 1);
        assert_eq!(targets[8].position, GridPoint::new(75.0, 70.0));
    }

    #[test]
    fn test_seeded_shuffler_is_reproducible() {
        let values: Vec<u32> = (1..=16).collect();
        let a = assign_positions(&values, &mut SeededShuffler::new(42));
        let b = assign_positions(&values, &mut SeededShuffler::new(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_placement_is_randomized() {
        let values: Vec<u32> = (1..=16).collect();
        let first = assign_positions(&values, &mut ThreadRngShuffler);
        // 16! arrangements, so 10 identical draws in a row means no shuffling
        let all_same = (0..10)
            .map(|_| assign_positions(&values, &mut ThreadRngShuffler))
            .all(|t| t == first);
        assert!(!all_same);
    }

    #[test]
    fn test_unsupported_length_scatters_in_bounds() {
        let values = vec![1, 2, 3, 4];
        let targets = assign_positions(&values, &mut ThreadRngShuffler);
        assert_eq!(targets.len(), 4);
        for t in &targets {
            assert!(SCATTER_X.contains(&t.position.x));
            assert!(SCATTER_Y.contains(&t.position.y));
            assert!(!t.completed);
        }
    }

    #[test]
    fn test_grid_lookup() {
        assert_eq!(grid_for(9).map(|g| g.len()), Some(9));
        assert_eq!(grid_for(16).map(|g| g.len()), Some(16));
        assert!(grid_for(12).is_none());
    }
}
