use arbor_core::{CollapseSet, LayoutConfig, layout_tree, parse_document};
use std::fmt::Write;
use std::time::Instant;

#[test]
#[ignore] // Run manually with `cargo test --test perf_benchmark -- --nocapture --ignored`
fn benchmark_wide_tree() {
    let mut doc = String::new();
    // 50,000 nodes, each parent with 10 children
    for i in 0..50_000 {
        let _ = writeln!(doc, "node n{i} \"Node {i}\"");
    }
    for i in 1..50_000 {
        let _ = writeln!(doc, "edge n{} -> n{}", (i - 1) / 10, i);
    }

    let start = Instant::now();
    let model = parse_document(&doc).expect("parse failed");
    let parsed = start.elapsed();
    let layout = layout_tree(&model, &CollapseSet::new(), &LayoutConfig::default());
    let total = start.elapsed();

    assert_eq!(layout.len(), 50_000);
    println!("Parsed 50,000 nodes in {parsed:?}, laid out by {total:?}");
}

#[test]
#[ignore]
fn benchmark_deep_chain() {
    let mut doc = String::new();
    for i in 0..100_000 {
        let _ = writeln!(doc, "node c{i}");
    }
    for i in 1..100_000 {
        let _ = writeln!(doc, "edge c{} -> c{}", i - 1, i);
    }

    let start = Instant::now();
    let model = parse_document(&doc).expect("parse failed");
    let layout = layout_tree(&model, &CollapseSet::new(), &LayoutConfig::default());
    println!("Laid out a 100,000-deep chain in {:?}", start.elapsed());
    assert_eq!(layout.len(), 100_000);
}
