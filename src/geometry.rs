use serde::{Deserialize, Serialize};

/// A point or direction on the ground plane (world X / Z).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub z: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, z: 0.0 };

    pub fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    pub fn distance_sq(self, other: Vec2) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        dx * dx + dz * dz
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.z * self.z).sqrt()
    }

    /// Unit vector in the same direction, or zero for a zero vector
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        if len <= f32::EPSILON {
            Vec2::ZERO
        } else {
            Vec2::new(self.x / len, self.z / len)
        }
    }

    pub fn offset(self, dx: f32, dz: f32) -> Vec2 {
        Vec2::new(self.x + dx, self.z + dz)
    }

    /// True when `other` lies within `range` of this point (no sqrt)
    pub fn within(self, other: Vec2, range: f32) -> bool {
        self.distance_sq(other) <= range * range
    }
}

/// Axis-aligned rectangle on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Bounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl Bounds {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn depth(&self) -> f32 {
        self.max_z - self.min_z
    }

    pub fn area(&self) -> f32 {
        self.width() * self.depth()
    }

    pub fn centroid(&self) -> Vec2 {
        Vec2::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_z + self.max_z) / 2.0,
        )
    }

    /// Half-open containment: min edges belong to the rectangle, max edges do not.
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min_x && p.x < self.max_x && p.z >= self.min_z && p.z < self.max_z
    }

    /// `contains`, except that a max edge lying on `outer`'s max edge is closed.
    /// Positions clamped to the world rectangle still land in a zone.
    pub fn contains_within(&self, p: Vec2, outer: &Bounds) -> bool {
        self.contains(p)
            || (self.touches(p)
                && (p.x < self.max_x || self.max_x >= outer.max_x)
                && (p.z < self.max_z || self.max_z >= outer.max_z))
    }

    /// Area shared with another rectangle (zero when they only touch)
    pub fn overlap_area(&self, other: &Bounds) -> f32 {
        let w = self.max_x.min(other.max_x) - self.min_x.max(other.min_x);
        let d = self.max_z.min(other.max_z) - self.min_z.max(other.min_z);
        if w <= 0.0 || d <= 0.0 { 0.0 } else { w * d }
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            max_x: self.max_x.max(other.max_x),
            min_z: self.min_z.min(other.min_z),
            max_z: self.max_z.max(other.max_z),
        }
    }

    /// Grow the rectangle by `margin` on every side
    pub fn expanded(&self, margin: f32) -> Bounds {
        Bounds {
            min_x: self.min_x - margin,
            max_x: self.max_x + margin,
            min_z: self.min_z - margin,
            max_z: self.max_z + margin,
        }
    }

    /// Closed containment, used for collision volumes
    pub fn touches(&self, p: Vec2) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.z >= self.min_z && p.z <= self.max_z
    }

    pub fn clamp(&self, p: Vec2) -> Vec2 {
        Vec2::new(
            p.x.clamp(self.min_x, self.max_x),
            p.z.clamp(self.min_z, self.max_z),
        )
    }

    /// Slab test: does the segment `from -> to` pass through this rectangle?
    pub fn intersects_segment(&self, from: Vec2, to: Vec2) -> bool {
        let dir = Vec2::new(to.x - from.x, to.z - from.z);
        let mut t_min = 0.0_f32;
        let mut t_max = 1.0_f32;

        for (origin, delta, lo, hi) in [
            (from.x, dir.x, self.min_x, self.max_x),
            (from.z, dir.z, self.min_z, self.max_z),
        ] {
            if delta.abs() <= f32::EPSILON {
                if origin < lo || origin > hi {
                    return false;
                }
                continue;
            }
            let mut t1 = (lo - origin) / delta;
            let mut t2 = (hi - origin) / delta;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return false;
            }
        }
        true
    }
}
