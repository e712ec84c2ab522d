use std::collections::HashSet;

use isoblock::{
    config::MapConfig,
    engine::GeneratorBuilder,
    world::GridWorld,
};

fn example_config(seed: u64) -> MapConfig {
    MapConfig {
        seed,
        map_width: 30,
        map_length: 30,
        map_max_height: 10,
        map_edge_width: 1,
        average_building_size: 5,
        block_height: 3,
        max_block_iterations: 4,
        symmetry: true,
        ..MapConfig::default()
    }
}

fn generate(config: MapConfig) -> (GridWorld, isoblock::GenerationReport) {
    GeneratorBuilder::standard(config).build().run().unwrap()
}

#[test]
fn every_column_keeps_the_shape_invariant() {
    for seed in 0..15 {
        let (world, _) = generate(example_config(seed));
        for column in world.columns() {
            assert_eq!(column.height() as usize, column.tiles().len());
            assert_eq!(column.height() == 0, !column.is_defined());
        }
    }
}

#[test]
fn tile_ids_are_unique_across_a_run() {
    for seed in [0, 7, 1000, u64::MAX / 2] {
        let (world, report) = generate(example_config(seed));
        let mut seen = HashSet::new();
        for column in world.columns() {
            for tile in column.tiles() {
                assert!(seen.insert(tile.id()), "tile id {} repeated", tile.id());
                assert!(tile.id() < report.tiles_allocated);
            }
        }
    }
}

#[test]
fn every_defined_column_belongs_to_a_registered_group() {
    for seed in 0..15 {
        let (world, _) = generate(example_config(seed));
        for column in world.columns().filter(|c| c.is_defined()) {
            assert!(
                world.block_groups().contains(&column.block_group),
                "column ({}, {}) carries unknown group {}",
                column.x(),
                column.y(),
                column.block_group
            );
        }
    }
}

#[test]
fn boundary_ring_is_clear_after_generation() {
    for ring in [1u32, 2, 3] {
        let config = MapConfig {
            map_edge_width: ring,
            ..example_config(55)
        };
        let (world, _) = generate(config);
        for column in world.columns() {
            let (x, y) = (column.x(), column.y());
            if x < ring || x >= 30 - ring || y < ring || y >= 30 - ring {
                assert_eq!(column.height(), 0, "ring column ({}, {}) defined", x, y);
            }
        }
    }
}

#[test]
fn growth_performs_at_most_the_requested_iterations() {
    for k in [0u32, 1, 2, 5] {
        let config = MapConfig {
            max_block_iterations: k,
            ..example_config(12)
        };
        let (world, _) = generate(config);
        assert!(world.block_iterations() <= k);
    }
}

#[test]
fn example_scenario_produces_a_mirrored_building() {
    // width=30, length=30, maxHeight=10, ring=1, avg=5, blockHeight=3,
    // maxIterations=4, symmetry=true
    let (world, report) = generate(example_config(42));

    // a non-empty seed footprint near the center rows
    assert!(
        world
            .columns()
            .any(|c| c.is_defined() && (13..20).contains(&c.y())),
        "no footprint near the center rows"
    );

    // growth attached at least one block beyond the seed
    assert!(report.block_groups > 1);
    assert!(report.defined_columns > 0);
}

#[test]
fn zero_iterations_leaves_exactly_the_seed_structure() {
    let config = MapConfig {
        max_block_iterations: 0,
        symmetry: false,
        ..example_config(3)
    };
    let (world, report) = generate(config);

    // the seed is the only building group; decoration groups never touch it
    let building_groups: HashSet<u32> = world
        .columns()
        .filter(|c| c.is_defined() && c.tiles().iter().any(|t| t.options.roof))
        .map(|c| c.block_group)
        .collect();
    assert_eq!(building_groups.len(), 1);
    assert!(report.defined_columns > 0);
    assert_eq!(report.exhausted_at, None);
}

#[test]
fn reports_tally_with_the_world() {
    let (world, report) = generate(example_config(77));
    assert_eq!(report.defined_columns, world.defined_count());
    assert_eq!(report.block_groups, world.block_groups().len());
    assert_eq!(report.highest_point, world.highest_point());
    assert!(!report.passes.is_empty());
}
