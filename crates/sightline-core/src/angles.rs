//! Angle arithmetic. Angles are never compared by raw subtraction.

use glam::DVec3;

/// Wrap an angle in degrees into the canonical range [-180, 180).
pub fn wrap_degrees(angle: f64) -> f64 {
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can round up to the modulus for tiny negative inputs.
    if wrapped >= 180.0 {
        -180.0
    } else {
        wrapped
    }
}

/// Shortest angular distance in degrees between two headings.
///
/// Result is in [0, 180] and symmetric in its arguments.
pub fn shortest_distance(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    if diff > 180.0 {
        360.0 - diff
    } else {
        diff
    }
}

/// Angle in degrees between two vectors. Zero-length input yields 0.
///
/// Uses `atan2(|a x b|, a . b)`, which stays accurate for nearly parallel
/// vectors where `acos` of the normalized dot product loses precision.
pub fn angle_between_deg(a: DVec3, b: DVec3) -> f64 {
    if a.length_squared() <= f64::EPSILON || b.length_squared() <= f64::EPSILON {
        return 0.0;
    }
    a.cross(b).length().atan2(a.dot(b)).to_degrees()
}

/// Angle in degrees between a view direction and the line from `eye` to `target`.
///
/// Returns `None` when the two points are closer than one unit, where the
/// line of sight has no meaningful direction.
pub fn off_axis_deg(view_dir: DVec3, eye: DVec3, target: DVec3) -> Option<f64> {
    let to_target = target - eye;
    if to_target.length() < 1.0 {
        return None;
    }
    Some(angle_between_deg(view_dir, to_target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wrap_degrees_canonical_range() {
        assert_eq!(wrap_degrees(180.0), -180.0);
        assert_eq!(wrap_degrees(-180.0), -180.0);
        assert_eq!(wrap_degrees(190.0), -170.0);
        assert_eq!(wrap_degrees(-190.0), 170.0);
        assert_eq!(wrap_degrees(720.0), 0.0);
    }

    #[test]
    fn test_shortest_distance_across_boundary() {
        assert!((shortest_distance(179.0, -179.0) - 2.0).abs() < 1e-9);
        assert!((shortest_distance(-170.0, 170.0) - 20.0).abs() < 1e-9);
        assert!((shortest_distance(0.0, 180.0) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_off_axis_straight_ahead() {
        let angle = off_axis_deg(DVec3::X, DVec3::ZERO, DVec3::new(100.0, 0.0, 0.0)).unwrap();
        assert!(angle.abs() < 1e-9);
        let behind = off_axis_deg(DVec3::X, DVec3::ZERO, DVec3::new(-100.0, 0.0, 0.0)).unwrap();
        assert!((behind - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_off_axis_coincident_points() {
        assert!(off_axis_deg(DVec3::X, DVec3::ZERO, DVec3::new(0.5, 0.0, 0.0)).is_none());
    }

    proptest! {
        #[test]
        fn prop_shortest_distance_bounded_and_symmetric(
            a in -1080.0f64..1080.0,
            b in -1080.0f64..1080.0
        ) {
            let d = shortest_distance(a, b);
            prop_assert!((0.0..=180.0).contains(&d));
            prop_assert!((d - shortest_distance(b, a)).abs() < 1e-9);
        }

        #[test]
        fn prop_wrap_degrees_in_range(a in -1e6f64..1e6) {
            let w = wrap_degrees(a);
            prop_assert!((-180.0..180.0).contains(&w));
        }

        #[test]
        fn prop_view_distance_bounded_and_symmetric(
            p1 in -89.0f64..89.0, y1 in -180.0f64..180.0,
            p2 in -89.0f64..89.0, y2 in -180.0f64..180.0
        ) {
            let a = crate::types::ViewAngles::new(p1, y1);
            let b = crate::types::ViewAngles::new(p2, y2);
            let d = a.angular_distance(&b);
            prop_assert!((0.0..=180.0).contains(&d));
            prop_assert!((d - b.angular_distance(&a)).abs() < 1e-9);
        }
    }
}
