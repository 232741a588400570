use glam::Vec3;
use tracing::trace;

use crate::controller::motion::CharacterBody;

/// Axis-aligned box used as static collision geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min: min.min(max), max: min.max(max) }
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x && self.max.x > other.min.x
            && self.min.y < other.max.y && self.max.y > other.min.y
            && self.min.z < other.max.z && self.max.z > other.min.z
    }
}

/// Which sides were blocked during the last move
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionFlags {
    pub sides: bool,
    pub above: bool,
    pub below: bool,
}

impl CollisionFlags {
    pub fn none(&self) -> bool {
        !(self.sides || self.above || self.below)
    }
}

/// Upright capsule moved kinematically through static boxes.
/// Collision is resolved per axis: an axis whose step would overlap
/// geometry is blocked, the others still apply.
pub struct KinematicBody {
    pub position: Vec3,
    pub radius: f32,
    pub height: f32,
    pub ground_height: f32,
    pub bounds: Aabb,
    pub obstacles: Vec<Aabb>,
    last_collision: CollisionFlags,
}

impl KinematicBody {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            radius: 0.5,
            height: 2.0,
            ground_height: 0.0,
            bounds: Aabb::new(Vec3::splat(-500.0), Vec3::splat(500.0)),
            obstacles: Vec::new(),
            last_collision: CollisionFlags::default(),
        }
    }

    pub fn with_obstacle(mut self, obstacle: Aabb) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    pub fn collision_flags(&self) -> CollisionFlags {
        self.last_collision
    }

    /// Bounding box of the capsule with its base at `base`
    pub fn hull_at(&self, base: Vec3) -> Aabb {
        Aabb::new(
            base - Vec3::new(self.radius, 0.0, self.radius),
            base + Vec3::new(self.radius, self.height, self.radius),
        )
    }

    fn blocked(&self, base: Vec3) -> bool {
        let hull = self.hull_at(base);
        self.obstacles.iter().any(|o| o.intersects(&hull))
    }
}

impl CharacterBody for KinematicBody {
    fn move_by(&mut self, displacement: Vec3) {
        let mut flags = CollisionFlags::default();
        let mut pos = self.position;

        // Vertical first so the horizontal checks use the settled height
        let y_next = Vec3::new(pos.x, pos.y + displacement.y, pos.z);
        if self.blocked(y_next) {
            if displacement.y > 0.0 { flags.above = true } else { flags.below = true }
        } else {
            pos = y_next;
        }
        if pos.y < self.ground_height {
            pos.y = self.ground_height;
            flags.below = true;
        }

        let x_next = Vec3::new(pos.x + displacement.x, pos.y, pos.z);
        if self.blocked(x_next) {
            flags.sides = true;
        } else {
            pos = x_next;
        }

        let z_next = Vec3::new(pos.x, pos.y, pos.z + displacement.z);
        if self.blocked(z_next) {
            flags.sides = true;
        } else {
            pos = z_next;
        }

        // Clamp to world bounds
        let clamped = pos.clamp(self.bounds.min, self.bounds.max);
        if clamped.x != pos.x || clamped.z != pos.z {
            flags.sides = true;
        }
        if clamped.y > pos.y {
            flags.below = true;
        } else if clamped.y < pos.y {
            flags.above = true;
        }

        trace!(from = ?self.position, to = ?clamped, ?flags, "body moved");
        self.position = clamped;
        self.last_collision = flags;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_move() {
        let mut body = KinematicBody::new(Vec3::new(0.0, 1.0, 0.0));
        body.move_by(Vec3::new(1.0, 0.5, -2.0));
        assert_eq!(body.position, Vec3::new(1.0, 1.5, -2.0));
        assert!(body.collision_flags().none());
    }

    #[test]
    fn test_ground_stops_descent() {
        let mut body = KinematicBody::new(Vec3::new(0.0, 0.2, 0.0));
        body.move_by(Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(body.position.y, 0.0);
        assert!(body.collision_flags().below);
    }

    #[test]
    fn test_wall_blocks_one_axis_and_slides_along_other() {
        let wall = Aabb::new(Vec3::new(1.0, 0.0, -10.0), Vec3::new(2.0, 5.0, 10.0));
        let mut body = KinematicBody::new(Vec3::ZERO).with_obstacle(wall);

        body.move_by(Vec3::new(0.8, 0.0, 1.0));
        assert_eq!(body.position.x, 0.0);
        assert_eq!(body.position.z, 1.0);
        assert!(body.collision_flags().sides);
    }

    #[test]
    fn test_ceiling_blocks_ascent() {
        let ceiling = Aabb::new(Vec3::new(-5.0, 3.0, -5.0), Vec3::new(5.0, 4.0, 5.0));
        let mut body = KinematicBody::new(Vec3::ZERO).with_obstacle(ceiling);
        body.move_by(Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(body.position.y, 0.0);
        assert!(body.collision_flags().above);
    }

    #[test]
    fn test_world_bounds() {
        let mut body = KinematicBody::new(Vec3::ZERO);
        body.bounds = Aabb::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 10.0, 1.0));
        body.move_by(Vec3::new(5.0, 0.0, 0.0));
        assert_eq!(body.position.x, 1.0);
        assert!(body.collision_flags().sides);
    }

    #[test]
    fn test_aabb_touching_is_not_intersecting() {
        let a = Aabb::new(Vec3::ZERO, Vec3::ONE);
        let b = Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(!a.intersects(&b));
        assert!(a.intersects(&Aabb::new(Vec3::splat(0.5), Vec3::splat(1.5))));
    }
}
