#[cfg(feature = "bench_mesh")]
use linelayer::model::{NodeInputs, Vec2};
#[cfg(feature = "bench_mesh")]
use linelayer::style::LineStyleTable;
#[cfg(feature = "bench_mesh")]
use linelayer::{LineLayer, UpdateStates};
#[cfg(feature = "bench_mesh")]
use std::time::Instant;

#[cfg(not(feature = "bench_mesh"))]
fn main() {
    panic!("mesh_bench requires --features bench_mesh");
}

#[cfg(feature = "bench_mesh")]
fn wave(n: usize, phase: f32) -> Vec<Vec2> {
    (0..n)
        .map(|i| Vec2::new(i as f32 * 2.0, (i as f32 * 0.3 + phase).sin() * 10.0))
        .collect()
}

#[cfg(feature = "bench_mesh")]
fn main() {
    let args: Vec<String> = std::env::args().collect();
    let mut lines = 2000usize;
    let mut points = 64usize;
    let mut repeats = 10usize;
    for a in &args[1..] {
        if let Some(val) = a.strip_prefix("--lines=") {
            if let Ok(v) = val.parse() {
                lines = v;
            }
        } else if let Some(val) = a.strip_prefix("--points=") {
            if let Ok(v) = val.parse() {
                points = v;
            }
        } else if let Some(val) = a.strip_prefix("--repeats=") {
            if let Ok(v) = val.parse() {
                repeats = v;
            }
        }
    }

    let styles = LineStyleTable::new(1, 1);
    let mut layer = LineLayer::new(1);
    let mut ids = Vec::with_capacity(lines);
    for i in 0..lines {
        match layer.create_strip(0, &wave(points, i as f32), &[], 0) {
            Ok(id) => ids.push(id),
            Err(e) => panic!("create_strip failed: {}", e),
        }
    }
    let offsets = [Vec2::ZERO];
    let sizes = [Vec2::new(1000.0, 1000.0)];
    let nodes = NodeInputs {
        offsets: &offsets,
        sizes: &sizes,
        opacities: &[1.0],
        enabled: &[true],
    };

    let t0 = Instant::now();
    if let Err(e) = layer.update(UpdateStates::NODE_ORDER, &ids, nodes, &styles) {
        panic!("update failed: {}", e);
    }
    let full_ms = t0.elapsed().as_secs_f64() * 1000.0;

    // Churn: replace every other line with a longer one, remove a tenth, rebuild
    let mut churn_times: Vec<f64> = Vec::new();
    for r in 0..repeats {
        for (k, &id) in ids.iter().enumerate().step_by(2) {
            let n = points + (r + k) % 3;
            let _ = layer.set_line_strip(id, &wave(n, r as f32), &[]);
        }
        let removed: Vec<u32> = ids.iter().copied().step_by(10).collect();
        for &id in &removed {
            let _ = layer.remove(id);
        }
        ids.retain(|id| !removed.contains(id));
        for i in 0..removed.len() {
            if let Ok(id) = layer.create_loop(0, &wave(points, i as f32), &[], 0) {
                ids.push(id);
            }
        }
        let t = Instant::now();
        let _ = layer.update(UpdateStates::NODE_ORDER, &ids, nodes, &styles);
        churn_times.push(t.elapsed().as_secs_f64() * 1000.0);
    }
    let avg_churn = if churn_times.is_empty() {
        0.0
    } else {
        churn_times.iter().sum::<f64>() / (churn_times.len() as f64)
    };

    let stats = layer.stats();
    println!(
        "lines={} points={} slots={} full_ms={:.3} avg_churn_ms={:.3}",
        stats.lines, stats.points, stats.slots, full_ms, avg_churn
    );
}
