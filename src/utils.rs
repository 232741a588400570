use glam::{Vec2, Vec3};

/// Move `current` toward `target` along the straight line between them,
/// advancing at most `max_delta`. Snaps to `target` once it is within reach.
pub fn move_toward(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let to_target = target - current;
    let distance = to_target.length();
    if distance <= max_delta || distance == 0.0 {
        return target;
    }
    current + to_target / distance * max_delta
}

/// Project onto the horizontal (xz) plane and renormalize.
/// A purely vertical vector has no horizontal direction and yields zero.
pub fn flatten_horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z).normalize_or_zero()
}

/// Clamp a single stick axis into [-1, 1]
pub fn clamp_axis(value: f32) -> f32 {
    value.clamp(-1.0, 1.0)
}

/// Clamp a 2D stick value so its length never exceeds 1 (digital composites)
pub fn clamp_to_unit_circle(v: Vec2) -> Vec2 {
    if v.length_squared() > 1.0 {
        v.normalize()
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_toward_steps_by_max_delta() {
        let v = move_toward(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0), 2.0);
        assert!((v - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-6);
    }

    #[test]
    fn test_move_toward_snaps_when_close() {
        let target = Vec3::new(1.0, 0.0, 1.0);
        let v = move_toward(Vec3::new(0.9, 0.0, 1.0), target, 0.5);
        assert_eq!(v, target);
    }

    #[test]
    fn test_move_toward_follows_straight_line_not_per_axis() {
        // Per-axis stepping would give (1, 0, 1); straight-line gives length 1 along the diagonal
        let v = move_toward(Vec3::ZERO, Vec3::new(3.0, 0.0, 4.0), 1.0);
        assert!((v - Vec3::new(0.6, 0.0, 0.8)).length() < 1e-6);
    }

    #[test]
    fn test_move_toward_zero_delta_keeps_current() {
        let current = Vec3::new(2.0, 0.0, 0.0);
        assert_eq!(move_toward(current, Vec3::ZERO, 0.0), current);
    }

    #[test]
    fn test_flatten_horizontal() {
        let f = flatten_horizontal(Vec3::new(0.0, 0.5, 0.5));
        assert!((f - Vec3::Z).length() < 1e-6);

        let tilted = flatten_horizontal(Vec3::new(3.0, -7.0, 4.0));
        assert!((tilted.length() - 1.0).abs() < 1e-6);
        assert_eq!(tilted.y, 0.0);
    }

    #[test]
    fn test_flatten_vertical_is_zero() {
        assert_eq!(flatten_horizontal(Vec3::Y), Vec3::ZERO);
        assert_eq!(flatten_horizontal(Vec3::NEG_Y), Vec3::ZERO);
    }

    #[test]
    fn test_clamp_axis() {
        assert_eq!(clamp_axis(5.0), 1.0);
        assert_eq!(clamp_axis(-3.0), -1.0);
        assert_eq!(clamp_axis(0.25), 0.25);
    }

    #[test]
    fn test_clamp_to_unit_circle() {
        let d = clamp_to_unit_circle(Vec2::new(1.0, 1.0));
        assert!((d.length() - 1.0).abs() < 1e-6);
        assert_eq!(clamp_to_unit_circle(Vec2::new(0.5, 0.0)), Vec2::new(0.5, 0.0));
    }
}
