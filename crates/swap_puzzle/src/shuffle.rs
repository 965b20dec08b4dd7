use tracing::debug;

use crate::grid::TileGrid;

/// Counts tile pairs whose placement order disagrees with their cut order.
///
/// Tiles are visited in cut order; a pair `(i, j)` with `i` cut before `j`
/// is an inversion when `i` currently sits at a later row-major slot.
pub fn count_inversions(grid: &TileGrid) -> usize {
    let placed: Vec<u32> = grid
        .tiles()
        .iter()
        .map(|tile| grid.slot_index(tile.current()))
        .collect();

    placed
        .iter()
        .enumerate()
        .map(|(i, &slot)| {
            placed
                .get(i + 1..)
                .unwrap_or_default()
                .iter()
                .filter(|&&later| slot > later)
                .count()
        })
        .sum()
}

/// Shuffle acceptance rule: only even permutations are dealt.
///
/// Free pairwise swapping can reach any layout, so this parity filter is
/// not needed for the puzzle to be solvable. It is kept so dealt layouts
/// match the 15-puzzle style parity the widget has always used.
pub fn is_solvable(grid: &TileGrid) -> bool {
    count_inversions(grid) % 2 == 0
}

/// Deals the grid: Fisher-Yates over the tiles' current slots, repeated
/// until [`is_solvable`] accepts the layout. Returns the number of
/// rejected attempts.
pub fn shuffle(grid: &mut TileGrid, rng: &mut fastrand::Rng) -> usize {
    let mut rejected = 0;
    loop {
        permute(grid, rng);
        if is_solvable(grid) {
            break;
        }
        rejected += 1;
    }
    debug!(
        size = grid.size(),
        rejected, "dealt shuffled layout:\n{grid}"
    );
    rejected
}

fn permute(grid: &mut TileGrid, rng: &mut fastrand::Rng) {
    let tiles = grid.tiles_mut();
    for i in (1..tiles.len()).rev() {
        let j = rng.usize(..=i);
        let Some(slot_j) = tiles.get(j).map(|tile| tile.current) else {
            continue;
        };
        let Some(slot_i) = tiles.get(i).map(|tile| tile.current) else {
            continue;
        };
        if let Some(tile) = tiles.get_mut(i) {
            tile.current = slot_j;
        }
        if let Some(tile) = tiles.get_mut(j) {
            tile.current = slot_i;
        }
    }
}
