// src/geometry.rs
//
// Pure 2D helpers shared by the zone registry and the saccade counter.
// Screen coordinates, pixels, y grows downward.

/// Inclusive point-in-rectangle test.
///
/// An empty or inverted rectangle (right < left, bottom < top) contains
/// nothing, so malformed zones simply never match.
pub fn point_in_rect(x: f32, y: f32, left: f32, top: f32, right: f32, bottom: f32) -> bool {
    x >= left && x <= right && y >= top && y <= bottom
}

/// Euclidean distance between two screen points, in pixels.
pub fn distance(ax: f32, ay: f32, bx: f32, by: f32) -> f32 {
    let dx = bx - ax;
    let dy = by - ay;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_in_rect_boundaries_are_inclusive() {
        assert!(point_in_rect(10.0, 20.0, 10.0, 20.0, 110.0, 220.0));
        assert!(point_in_rect(110.0, 220.0, 10.0, 20.0, 110.0, 220.0));
        assert!(point_in_rect(60.0, 120.0, 10.0, 20.0, 110.0, 220.0));
        assert!(!point_in_rect(9.9, 120.0, 10.0, 20.0, 110.0, 220.0));
        assert!(!point_in_rect(60.0, 220.1, 10.0, 20.0, 110.0, 220.0));
    }

    #[test]
    fn test_inverted_rect_matches_nothing() {
        assert!(!point_in_rect(50.0, 50.0, 100.0, 100.0, 0.0, 0.0));
    }

    #[test]
    fn test_distance() {
        assert_eq!(distance(0.0, 0.0, 3.0, 4.0), 5.0);
        assert_eq!(distance(7.0, -2.0, 7.0, -2.0), 0.0);
    }
}
