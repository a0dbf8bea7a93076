use linelayer::model::{NodeInputs, Vec2, NONE};
use linelayer::style::LineStyleTable;
use linelayer::{LineLayer, UpdateStates};
use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Clone, Debug)]
enum Op {
    CreateStrip { n: u8 },
    CreateLoop { n: u8 },
    CreateLine { n: u8, pairs: Vec<(u8, u8)> },
    SetStrip { idx: u16, n: u8 },
    SetLoop { idx: u16, n: u8 },
    Remove { idx: u16 },
    Update,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..12).prop_map(|n| Op::CreateStrip { n }),
        (0u8..12).prop_map(|n| Op::CreateLoop { n }),
        (1u8..8, prop::collection::vec((any::<u8>(), any::<u8>()), 0..10))
            .prop_map(|(n, pairs)| Op::CreateLine { n, pairs }),
        (any::<u16>(), 0u8..12).prop_map(|(idx, n)| Op::SetStrip { idx, n }),
        (any::<u16>(), 0u8..12).prop_map(|(idx, n)| Op::SetLoop { idx, n }),
        any::<u16>().prop_map(|idx| Op::Remove { idx }),
        Just(Op::Update),
    ]
}

fn points(n: u8) -> Vec<Vec2> {
    (0..n).map(|i| Vec2::new(i as f32, -(i as f32))).collect()
}

// Expected (point_count, index_count) per live id, from the latest populate
type Model = HashMap<u32, (u32, u32)>;

fn pick(model: &Model, idx: u16) -> Option<u32> {
    if model.is_empty() {
        return None;
    }
    let mut ids: Vec<u32> = model.keys().copied().collect();
    ids.sort_unstable();
    Some(ids[idx as usize % ids.len()])
}

fn update(l: &mut LineLayer, styles: &LineStyleTable, model: &Model) {
    let offsets = [Vec2::ZERO];
    let sizes = [Vec2::new(1.0, 1.0)];
    let nodes = NodeInputs {
        offsets: &offsets,
        sizes: &sizes,
        opacities: &[1.0],
        enabled: &[true],
    };
    let mut order: Vec<u32> = model.keys().copied().collect();
    order.sort_unstable();
    let expected_indices: u32 = order
        .iter()
        .map(|&id| 3 * l.index_count(id).unwrap() + 6 * l.join_count(id).unwrap())
        .sum();
    let mesh = l
        .update(UpdateStates::NODE_ORDER, &order, nodes, styles)
        .unwrap();
    assert_eq!(mesh.draw_offsets.len(), order.len() + 1);
    assert_eq!(*mesh.draw_offsets.last().unwrap(), expected_indices);
    let vertex_count = mesh.vertices.len() as u32;
    assert!(mesh.indices.iter().all(|&i| i < vertex_count));
}

fn apply(l: &mut LineLayer, model: &mut Model, op: Op) {
    match op {
        Op::CreateStrip { n } => {
            if let Ok(id) = l.create_strip(0, &points(n), &[], 0) {
                model.insert(id, (n as u32, 2 * (n as u32).saturating_sub(1)));
            } else {
                assert_eq!(n, 1);
            }
        }
        Op::CreateLoop { n } => {
            if let Ok(id) = l.create_loop(0, &points(n), &[], 0) {
                let ic = if n == 1 { 2 } else { 2 * n as u32 };
                model.insert(id, (n as u32, ic));
            } else {
                assert_eq!(n, 2);
            }
        }
        Op::CreateLine { n, pairs } => {
            let indices: Vec<u32> = pairs
                .iter()
                .flat_map(|&(a, b)| [(a % n) as u32, (b % n) as u32])
                .collect();
            let id = l.create_line(0, &indices, &points(n), &[], 0).unwrap();
            model.insert(id, (n as u32, indices.len() as u32));
        }
        Op::SetStrip { idx, n } => {
            if let Some(id) = pick(model, idx) {
                if l.set_line_strip(id, &points(n), &[]).is_ok() {
                    model.insert(id, (n as u32, 2 * (n as u32).saturating_sub(1)));
                }
            }
        }
        Op::SetLoop { idx, n } => {
            if let Some(id) = pick(model, idx) {
                if l.set_line_loop(id, &points(n), &[]).is_ok() {
                    let ic = if n == 1 { 2 } else { 2 * n as u32 };
                    model.insert(id, (n as u32, ic));
                }
            }
        }
        Op::Remove { idx } => {
            if let Some(id) = pick(model, idx) {
                l.remove(id).unwrap();
                model.remove(&id);
            }
        }
        Op::Update => {}
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn compaction_preserves_line_sizes(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let styles = LineStyleTable::new(1, 1);
        let mut l = LineLayer::new(1);
        let mut model = Model::new();
        for op in ops {
            let is_update = matches!(op, Op::Update);
            apply(&mut l, &mut model, op);
            if is_update {
                update(&mut l, &styles, &model);
            }
        }
        update(&mut l, &styles, &model);

        let stats = l.stats();
        prop_assert_eq!(stats.unused_runs, 0);
        prop_assert_eq!(stats.runs as usize, model.len());
        prop_assert_eq!(l.used_count() as usize, model.len());
        let mut total_points = 0u32;
        let mut total_slots = 0u32;
        for (&id, &(pc, ic)) in &model {
            prop_assert_eq!(l.point_count(id).unwrap(), pc);
            prop_assert_eq!(l.index_count(id).unwrap(), ic);
            for s in l.slots(id).unwrap() {
                prop_assert!(s.point < pc);
                prop_assert!(s.neighbor == NONE || s.neighbor < ic);
            }
            total_points += pc;
            total_slots += ic;
        }
        prop_assert_eq!(stats.points, total_points);
        prop_assert_eq!(stats.slots, total_slots);
    }
}
