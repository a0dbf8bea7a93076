use linelayer::model::{Vec2, NONE};
use linelayer::LineLayer;
use pretty_assertions::assert_eq;

fn pts(n: usize) -> Vec<Vec2> {
    (0..n).map(|i| Vec2::new(i as f32, (i * i) as f32)).collect()
}

fn neighbor_pattern(l: &LineLayer, id: u32) -> Vec<u32> {
    l.slots(id).unwrap().iter().map(|s| s.neighbor).collect()
}

fn point_pattern(l: &LineLayer, id: u32) -> Vec<u32> {
    l.slots(id).unwrap().iter().map(|s| s.point).collect()
}

#[test]
fn strip_matches_explicit_indices() {
    for n in [2usize, 3, 4, 7, 16] {
        let mut l = LineLayer::new(1);
        let points = pts(n);
        let strip = l.create_strip(0, &points, &[], 0).unwrap();
        let indices: Vec<u32> = (1..n as u32).flat_map(|i| [i - 1, i]).collect();
        let explicit = l.create_line(0, &indices, &points, &[], 0).unwrap();
        assert_eq!(neighbor_pattern(&l, strip), neighbor_pattern(&l, explicit), "n={}", n);
        assert_eq!(point_pattern(&l, strip), indices);
        assert_eq!(l.join_count(strip).unwrap(), (n - 2) as u32);
    }
}

#[test]
fn loop_matches_explicit_indices() {
    for n in [3usize, 4, 9] {
        let mut l = LineLayer::new(1);
        let points = pts(n);
        let lp = l.create_loop(0, &points, &[], 0).unwrap();
        let mut indices: Vec<u32> = (1..n as u32).flat_map(|i| [i - 1, i]).collect();
        indices.extend_from_slice(&[n as u32 - 1, 0]);
        let explicit = l.create_line(0, &indices, &points, &[], 0).unwrap();
        assert_eq!(neighbor_pattern(&l, lp), neighbor_pattern(&l, explicit), "n={}", n);
        assert_eq!(l.join_count(lp).unwrap(), n as u32);
        assert!(neighbor_pattern(&l, lp).iter().all(|&n| n != NONE));
    }
}

#[test]
fn single_point_loop_is_a_capped_point() {
    let mut l = LineLayer::new(1);
    let id = l.create_loop(0, &[Vec2::new(5.0, 5.0)], &[], 0).unwrap();
    assert_eq!(point_pattern(&l, id), vec![0, 0]);
    assert_eq!(neighbor_pattern(&l, id), vec![NONE, NONE]);
    assert_eq!(l.join_count(id).unwrap(), 0);
}

#[test]
fn empty_lines_are_allowed() {
    let mut l = LineLayer::new(1);
    let a = l.create_strip(0, &[], &[], 0).unwrap();
    let b = l.create_loop(0, &[], &[], 0).unwrap();
    let c = l.create_line(0, &[], &[], &[], 0).unwrap();
    for id in [a, b, c] {
        assert_eq!(l.index_count(id).unwrap(), 0);
        assert_eq!(l.point_count(id).unwrap(), 0);
    }
}

#[test]
fn two_point_loop_through_two_segments_is_capped() {
    let mut l = LineLayer::new(1);
    let id = l.create_line(0, &[0, 1, 1, 0], &pts(2), &[], 0).unwrap();
    assert_eq!(neighbor_pattern(&l, id), vec![NONE; 4]);
}

#[test]
fn triple_use_point_keeps_other_joins() {
    let mut l = LineLayer::new(1);
    let id = l
        .create_line(0, &[0, 1, 2, 1, 1, 3, 3, 2], &pts(4), &[], 0)
        .unwrap();
    assert_eq!(
        neighbor_pattern(&l, id),
        vec![NONE, NONE, 6, NONE, NONE, 7, 4, 3]
    );
    assert_eq!(l.join_count(id).unwrap(), 2);
}
