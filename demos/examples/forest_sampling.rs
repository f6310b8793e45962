// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Level-of-detail sampling.
//!
//! Store a radial density field on a quadtree forest, refine where the
//! field changes quickly, and sample every leaf at its cell centre. Also
//! installs a minimal stdout logger so the library's `info!`/`debug!`
//! summaries are visible.
//!
//! Run:
//! - `cargo run -p overstory_examples --example forest_sampling`

use log::{Level, LevelFilter, Log, Metadata, Record};
use overstory_coord::{Coord, WorldPoint};
use overstory_forest::{Forest, Traversal};

struct StdoutLogger;

impl Log for StdoutLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= Level::Debug
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            println!("[{:<5}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StdoutLogger = StdoutLogger;

fn density(at: WorldPoint<2>) -> f64 {
    // A smooth bump centred on the domain.
    let dx = at.x() - 8.0;
    let dy = at.y() - 8.0;
    (-(dx * dx + dy * dy) / 8.0).exp()
}

fn main() {
    log::set_logger(&LOGGER).expect("no other logger installed");
    log::set_max_level(LevelFilter::Debug);

    let mut forest: Forest<2, f64> = Forest::new();
    forest
        .initialise(Coord::<2>::new(2, 2), 4, 0.0)
        .expect("well-formed coarse lattice");

    // Refine wherever the bump is strong, one level per pass.
    for _ in 0..3 {
        forest
            .refine(|f, id| {
                let node = f.node(id).expect("snapshot handles are live");
                let centre = node.coord().cell_centre(node.width());
                if density(centre) > 0.01 {
                    let _ = f.refine_node(id);
                }
            })
            .expect("balanced between passes");
    }

    // Sample the field at every leaf's cell centre.
    forest
        .visit_leaves(Traversal::Morton, |f, id| {
            let node = f.node(id).expect("snapshot handles are live");
            let centre = node.coord().cell_centre(node.width());
            *f.value_mut(id).expect("leaves carry values") = density(centre);
        })
        .expect("just balanced");

    let mut finest = 0_usize;
    let mut total = 0_usize;
    for id in forest.leaves(Traversal::Morton).expect("just balanced") {
        let node = forest.node(id).expect("fresh handle");
        total += 1;
        if node.level() == 0 {
            finest += 1;
        }
    }
    println!("sampled {total} leaves, {finest} at the finest level");
    assert!(finest > 0, "the bump should force some finest-level cells");
    assert!(
        total < 16 * 16,
        "adaptivity should beat a uniform finest-level grid"
    );
}
