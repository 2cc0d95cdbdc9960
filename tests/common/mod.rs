//! Common test utilities and helpers

#![allow(dead_code)] // Test utilities may not all be used in every test file

pub mod builders;
pub mod mock_helpers;

use tablet_ink::Point;

/// Points on the x axis, as produced by the mock driver
pub fn xs(values: &[i32]) -> Vec<Point> {
    values.iter().map(|&x| Point::new(x, 0)).collect()
}

/// Assert that `points` splits into exactly the given strokes at boundaries
pub fn assert_strokes(points: &[Point], expected: &[&[Point]]) {
    let actual: Vec<&[Point]> = points.split(|p| p.is_boundary()).collect();
    assert_eq!(
        &actual[..expected.len()],
        expected,
        "Unexpected strokes in {:?}",
        points
    );
}
