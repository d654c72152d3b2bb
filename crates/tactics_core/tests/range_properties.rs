//! Property tests for grid adjacency and range queries.

use tactics_core::prelude::*;
use tactics_test_utils::determinism::strategies::{
    arb_attack_band, arb_field, arb_field_and_position, arb_movement,
};
use tactics_test_utils::proptest::prelude::*;

proptest! {
    /// Every neighbour link has a matching link back.
    #[test]
    fn prop_adjacency_is_symmetric((w, h) in arb_field()) {
        let grid = Grid::new(w, h);
        for tile in grid.tiles() {
            for dir in Direction::ALL {
                if let Some(n) = tile.neighbor(dir) {
                    prop_assert_eq!(grid.neighbor(n, dir.opposite()), Some(tile.id()));
                    let a = tile.position();
                    let b = grid.position(n).unwrap();
                    prop_assert_eq!(a.manhattan_distance(b), 1);
                }
            }
        }
    }

    /// Interior tiles have all four neighbours; edge tiles lack exactly the
    /// directions that would leave the field.
    #[test]
    fn prop_neighbour_count_matches_edges((w, h) in arb_field()) {
        let grid = Grid::new(w, h);
        for tile in grid.tiles() {
            let Position { x, y } = tile.position();
            let expected = usize::from(x > 0)
                + usize::from(x + 1 < w as i32)
                + usize::from(y > 0)
                + usize::from(y + 1 < h as i32);
            prop_assert_eq!(grid.neighbors(tile.id()).count(), expected);
        }
    }

    /// Walkable tiles are within range and always include the origin.
    #[test]
    fn prop_walkable_within_range(
        ((w, h), origin) in arb_field_and_position(),
        movement in arb_movement(),
    ) {
        let grid = Grid::new(w, h);
        let origin_id = grid.id_at(origin).unwrap();
        let set = compute_walkable(&grid, origin_id, movement).unwrap();

        prop_assert!(set.contains(origin_id));
        for tile in set.iter() {
            let d = grid.position(tile).unwrap().manhattan_distance(origin);
            prop_assert!(d <= movement);
        }
    }

    /// On an empty grid the walkable set is exactly the Manhattan diamond.
    #[test]
    fn prop_walkable_is_diamond_on_empty_grid(
        ((w, h), origin) in arb_field_and_position(),
        movement in arb_movement(),
    ) {
        let grid = Grid::new(w, h);
        let origin_id = grid.id_at(origin).unwrap();
        let set = compute_walkable(&grid, origin_id, movement).unwrap();

        let diamond = grid
            .tiles()
            .filter(|t| t.position().manhattan_distance(origin) <= movement)
            .count();
        prop_assert_eq!(set.len(), diamond);
    }

    /// Attackable tiles fall inside the band and never include the origin.
    #[test]
    fn prop_attackable_within_band(
        ((w, h), origin) in arb_field_and_position(),
        (min, max) in arb_attack_band(),
    ) {
        let grid = Grid::new(w, h);
        let origin_id = grid.id_at(origin).unwrap();
        let set = compute_attackable(&grid, origin_id, min, max).unwrap();

        prop_assert!(!set.contains(origin_id));
        let expected = grid
            .tiles()
            .filter(|t| {
                let d = t.position().manhattan_distance(origin);
                t.id() != origin_id && d >= min && d <= max
            })
            .count();
        prop_assert_eq!(set.len(), expected);
    }

    /// Occupied tiles other than the origin never show up as walkable.
    #[test]
    fn prop_walkable_skips_occupied(
        ((w, h), origin) in arb_field_and_position(),
        movement in arb_movement(),
        blockers in proptest::collection::vec((0i32..12, 0i32..12), 0..10),
    ) {
        let mut grid = Grid::new(w, h);
        let origin_id = grid.id_at(origin).unwrap();
        grid.place(UnitId(1), origin_id).unwrap();

        let mut next = 2;
        for (x, y) in blockers {
            if let Some(id) = grid.tile_at(x, y) {
                if !grid.is_occupied(id) {
                    grid.place(UnitId(next), id).unwrap();
                    next += 1;
                }
            }
        }

        let set = compute_walkable(&grid, origin_id, movement).unwrap();
        prop_assert!(set.contains(origin_id));
        for tile in set.iter() {
            prop_assert!(tile == origin_id || !grid.is_occupied(tile));
        }
    }
}
