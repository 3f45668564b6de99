use std::path::Path;

use label_placer::placement_dump::PlacementDump;
use label_placer::{
    Layout, RenderConfig, SolverConfig, StepStrategy, Termination, Theme, parse_problem,
    render_svg,
};

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.contains("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.contains("</svg>"), "{fixture}: missing </svg tag");
    assert!(!svg.contains("NaN"), "{fixture}: non-finite coordinate in svg");
}

fn load_fixture(path: &Path) -> Layout {
    let input = std::fs::read_to_string(path).expect("fixture read failed");
    parse_problem(&input)
        .expect("parse failed")
        .into_layout(&SolverConfig::default())
        .expect("layout build failed")
}

fn penalty(layout: &Layout) -> f64 {
    let breakdown = layout.cost_breakdown().unwrap();
    breakdown.intersection + breakdown.keepout
}

fn with_strategy(layout: &mut Layout, strategy: StepStrategy) {
    let mut config = layout.config().clone();
    config.strategy = strategy;
    layout.set_config(config).unwrap();
    layout.reset();
}

#[test]
fn solve_all_fixtures() {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures");

    // Keep this list explicit so new fixtures must be added intentionally.
    let candidates = [
        "bisection.json5",
        "isolated.json5",
        "keepouts.json5",
        "row.json5",
        "three_labels.json5",
    ];

    for rel in candidates {
        let path = root.join(rel);
        assert!(path.exists(), "fixture missing: {}", rel);
        let mut layout = load_fixture(&path);

        for strategy in [StepStrategy::Adaptive, StepStrategy::bisection()] {
            with_strategy(&mut layout, strategy);
            let start_cost = layout.cost(false).unwrap();
            let start_penalty = penalty(&layout);

            let report = layout.run().unwrap_or_else(|err| panic!("{rel}: {err}"));
            assert!(report.iterations <= layout.config().max_iteration_count);
            assert_eq!(report.iterations, report.history.len());
            assert_eq!(report.final_cost, layout.cost(false).unwrap(), "{rel}");

            for record in &report.history {
                assert!(
                    record.final_cost < record.starting_cost,
                    "{rel} ({}): iteration {} did not lower the cost",
                    strategy.name(),
                    record.iteration
                );
            }

            if start_penalty > 0.0 {
                assert!(report.iterations > 0, "{rel}: no step taken");
                assert!(report.final_cost < start_cost, "{rel}: cost did not drop");
                assert!(penalty(&layout) < start_penalty, "{rel}: overlap grew");
            } else {
                // Already optimal: the gradient is zero up to rounding, so no
                // step can improve on the anchors.
                assert!(report.converged, "{rel}");
                assert_ne!(report.termination, Termination::MaxIterations, "{rel}");
                assert_eq!(report.iterations, 0, "{rel}");
            }

            let svg = render_svg(&layout, &Theme::modern(), &RenderConfig::default());
            assert_valid_svg(&svg, rel);
            let dump = PlacementDump::from_layout(&layout, Some(report), None).unwrap();
            serde_json::to_string(&dump).unwrap();
        }
    }
}

#[test]
fn three_labels_reduce_total_overlap() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/three_labels.json5");
    let mut layout = load_fixture(&path);
    let start = layout.total_overlap().unwrap();
    assert!((start - 1.6).abs() < 1e-12, "start overlap {start}");

    for strategy in [StepStrategy::Adaptive, StepStrategy::bisection()] {
        with_strategy(&mut layout, strategy);
        let report = layout.run().unwrap();
        let end = layout.total_overlap().unwrap();
        assert!(end < start, "{}: overlap {start} -> {end}", strategy.name());
        assert!(report.iterations <= 1000);
    }
}

#[test]
fn problem_solver_block_selects_bisection() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/bisection.json5");
    let layout = load_fixture(&path);
    assert_eq!(
        layout.config().strategy,
        StepStrategy::Bisection { max_error: 0.05 }
    );
    assert_eq!(layout.config().max_iteration_count, 400);
}

#[test]
fn keepouts_never_move() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/keepouts.json5");
    let mut layout = load_fixture(&path);
    let before: Vec<_> = layout.keepouts().iter().map(|k| k.rectangle()).collect();
    layout.run().unwrap();
    let after: Vec<_> = layout.keepouts().iter().map(|k| k.rectangle()).collect();
    assert_eq!(before, after);
    // The far label has nothing pushing it.
    let depot = &layout.labels()[1];
    assert!(depot.location().distance_to(depot.optimal()) < 1e-6);
}

#[test]
fn reset_restores_anchors_after_a_run() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/row.json5");
    let mut layout = load_fixture(&path);
    let anchors = layout.unknowns();
    layout.run().unwrap();
    assert_ne!(layout.unknowns(), anchors);
    layout.reset();
    assert_eq!(layout.unknowns(), anchors);
}
