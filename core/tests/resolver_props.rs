//! Property tests for move resolution and empty-cell selection.
//!
//! Invariants covered:
//! - Repeating one direction settles: every changing repeat merges, and a
//!   settled grid does not change again.
//! - Merges conserve the tile total; the reward equals the mass of new tiles.
//! - Non-empty tiles are packed against the target edge of every lane.
//! - Each lane matches a single collapse pass, one flagged tile per merge.
//! - `random_empty_position` only returns empty cells, and none iff full.

use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tile_merge_core::resolver::collapse_lane;
use tile_merge_core::{resolve, Direction, Grid, Tile};

fn tile_value() -> impl Strategy<Value = u32> {
    prop_oneof![
        3 => Just(0u32),
        5 => (1u32..=6).prop_map(|exp| 1 << exp),
    ]
}

fn grid_strategy() -> impl Strategy<Value = Grid> {
    (2usize..=6).prop_flat_map(|size| {
        proptest::collection::vec(tile_value(), size * size)
            .prop_map(move |values| Grid::from_values(size, &values).unwrap())
    })
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    prop::sample::select(Direction::ALL.to_vec())
}

fn lane_values(grid: &Grid, dir: Direction, index: usize) -> Vec<u32> {
    dir.lane(grid.size(), index)
        .into_iter()
        .map(|p| grid.get(p.row, p.col).unwrap().value)
        .collect()
}

proptest! {
    #[test]
    fn repeated_moves_settle(grid in grid_strategy(), dir in direction_strategy()) {
        // A merge can line up a new pair, so settling may take several
        // passes, but every changing pass merges and removes a tile.
        let mut current = resolve(&grid, dir).grid;
        let mut passes = 1;
        loop {
            let next = resolve(&current, dir);
            if !next.changed {
                prop_assert!(next.grid.same_values(&current));
                prop_assert_eq!(next.reward, 0);
                prop_assert!(next.moves.is_empty());
                break;
            }
            prop_assert!(next.reward > 0, "a slide-only pass after settling");
            prop_assert!(next.grid.empty_count() > current.empty_count());
            current = next.grid;
            passes += 1;
            prop_assert!(passes <= grid.size() * grid.size());
        }
    }

    #[test]
    fn merged_twins_settle_in_two_passes(
        size in 3usize..=6,
        exp in 1u32..=10,
        dir in direction_strategy(),
    ) {
        // A lane of [v, v, 2v] becomes [2v, 2v] and then [4v].
        let v = 1u32 << exp;
        let mut grid = Grid::new(size).unwrap();
        let lane = dir.lane(size, 0);
        for (pos, value) in lane.iter().zip([v, v, 2 * v]) {
            grid.set(pos.row, pos.col, Tile::new(value)).unwrap();
        }
        let first = resolve(&grid, dir);
        prop_assert_eq!(&lane_values(&first.grid, dir, 0)[..2], &[2 * v, 2 * v][..]);
        let second = resolve(&first.grid, dir);
        prop_assert!(second.changed);
        prop_assert_eq!(lane_values(&second.grid, dir, 0)[0], 4 * v);
        prop_assert!(!resolve(&second.grid, dir).changed);
    }

    #[test]
    fn merges_conserve_total(grid in grid_strategy(), dir in direction_strategy()) {
        let r = resolve(&grid, dir);
        prop_assert_eq!(r.grid.total(), grid.total());

        let merged_mass: u64 = r.grid.tiles().iter()
            .filter(|t| t.merged)
            .map(|t| t.value as u64)
            .sum();
        prop_assert_eq!(merged_mass, r.reward as u64);
    }

    #[test]
    fn lanes_are_compacted_toward_target(grid in grid_strategy(), dir in direction_strategy()) {
        let r = resolve(&grid, dir);
        for index in 0..grid.size() {
            let lane = lane_values(&r.grid, dir, index);
            let filled = lane.iter().take_while(|&&v| v != 0).count();
            prop_assert!(lane[filled..].iter().all(|&v| v == 0), "gap in lane {:?}", lane);
        }
    }

    #[test]
    fn no_tile_merges_twice(grid in grid_strategy(), dir in direction_strategy()) {
        let r = resolve(&grid, dir);
        for index in 0..grid.size() {
            let before = lane_values(&grid, dir, index);
            let after = lane_values(&r.grid, dir, index);

            let (mut expected, _) = collapse_lane(&before);
            expected.resize(grid.size(), 0);
            prop_assert_eq!(&after, &expected);

            // each merge consumes exactly two tiles and yields one flagged tile
            let tiles_before = before.iter().filter(|&&v| v != 0).count();
            let tiles_after = after.iter().filter(|&&v| v != 0).count();
            let merged = dir
                .lane(grid.size(), index)
                .into_iter()
                .filter(|p| r.grid.get(p.row, p.col).unwrap().merged)
                .count();
            prop_assert_eq!(tiles_before - tiles_after, merged);

            // a merged tile is the double of two equal inputs, never of a
            // tile that was itself just merged
            for p in dir.lane(grid.size(), index) {
                let tile = r.grid.get(p.row, p.col).unwrap();
                if tile.merged {
                    let half = tile.value / 2;
                    prop_assert!(before.iter().filter(|&&v| v == half).count() >= 2);
                }
            }
        }
    }

    #[test]
    fn changed_flag_matches_cell_comparison(grid in grid_strategy(), dir in direction_strategy()) {
        let r = resolve(&grid, dir);
        prop_assert_eq!(r.changed, grid.values() != r.grid.values());
        if !r.changed {
            prop_assert!(r.moves.is_empty());
        }
    }

    #[test]
    fn random_empty_position_is_empty(grid in grid_strategy(), seed in any::<u64>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        match grid.random_empty_position(&mut rng) {
            Some(pos) => {
                prop_assert!(!grid.is_full());
                prop_assert_eq!(grid.get(pos.row, pos.col).unwrap().value, 0);
            }
            None => prop_assert!(grid.is_full()),
        }
    }
}
