use std::ops::{Add, Div, Mul, Neg, Sub};

// ─────────────────────────────────────────────────────────────────────────────
// Vec3
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// Unit vector along the X axis.
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    /// Unit vector along the Y axis (world up).
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    /// Unit vector along the Z axis.
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    #[must_use]
    pub const fn length_squared(self) -> f64 {
        self.dot(self)
    }

    #[must_use]
    pub const fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    #[must_use]
    pub const fn cross(self, rhs: Self) -> Self {
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    /// Unit vector in the same direction, or `None` for zero/non-finite input.
    #[must_use]
    pub fn normalized(self) -> Option<Self> {
        let len = self.length();
        if len.is_finite() && len > 0.0 {
            Some(Self::new(self.x / len, self.y / len, self.z / len))
        } else {
            None
        }
    }

    /// Length of the projection onto the horizontal (XZ) plane.
    #[must_use]
    pub fn horizontal_length(self) -> f64 {
        self.x.hypot(self.z)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vec3> for f64 {
    type Output = Vec3;
    fn mul(self, rhs: Vec3) -> Self::Output {
        Vec3::new(self * rhs.x, self * rhs.y, self * rhs.z)
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    fn div(self, rhs: f64) -> Self::Output {
        Self::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Point3
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    /// The origin point (0, 0, 0).
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Position vector from the origin.
    #[must_use]
    pub const fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    #[must_use]
    pub const fn sub_point(self, rhs: Self) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }

    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        self.sub_point(other).length()
    }

    /// Average of a set of points; the origin for an empty slice.
    #[must_use]
    pub fn centroid(points: &[Self]) -> Self {
        if points.is_empty() {
            return Self::ORIGIN;
        }
        let sum = points.iter().fold(Vec3::ZERO, |acc, p| acc + p.to_vec3());
        Self::ORIGIN + sum / points.len() as f64
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.to_vec3().is_finite()
    }
}

impl Default for Point3 {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl Add<Vec3> for Point3 {
    type Output = Self;
    fn add(self, rhs: Vec3) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Vec3;
    fn sub(self, rhs: Self) -> Self::Output {
        self.sub_point(rhs)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Euler3
// ─────────────────────────────────────────────────────────────────────────────

/// Rotation as angles in radians around the X, Y and Z axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Euler3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Euler3 {
    /// No rotation: the entity faces forward.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[must_use]
    pub const fn yaw(y: f64) -> Self {
        Self::new(0.0, y, 0.0)
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Orientation looking along `direction`.
    ///
    /// Pitch (X) is the angle between the direction and the horizontal XZ plane,
    /// yaw (Y) is the heading of its horizontal projection measured from +Z
    /// towards +X. Roll is always zero. A zero vector yields [`Euler3::ZERO`].
    #[must_use]
    pub fn facing(direction: Vec3) -> Self {
        if !direction.is_finite() || direction.length_squared() == 0.0 {
            return Self::ZERO;
        }
        let pitch = direction.y.atan2(direction.horizontal_length());
        let yaw = direction.x.atan2(direction.z);
        Self::new(pitch, yaw, 0.0)
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Default for Euler3 {
    fn default() -> Self {
        Self::ZERO
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Barycentric
// ─────────────────────────────────────────────────────────────────────────────

/// Weights over the three corners of a triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Barycentric {
    pub u: f64,
    pub v: f64,
    pub w: f64,
}

impl Barycentric {
    #[must_use]
    pub const fn new(u: f64, v: f64, w: f64) -> Self {
        Self { u, v, w }
    }

    /// Weights from `u` and `v`; `w` takes the remainder.
    #[must_use]
    pub fn from_uv(u: f64, v: f64) -> Self {
        Self::new(u, v, 1.0 - u - v)
    }

    /// Clamp negative weights to zero and rescale so they sum to one.
    #[must_use]
    pub fn clamped(self) -> Self {
        let u = self.u.max(0.0);
        let v = self.v.max(0.0);
        let w = self.w.max(0.0);
        let sum = u + v + w;
        if sum > 0.0 && sum.is_finite() {
            Self::new(u / sum, v / sum, w / sum)
        } else {
            Self::new(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0)
        }
    }

    #[must_use]
    pub fn is_inside(self, tol: Tolerance) -> bool {
        self.u >= -tol.eps && self.v >= -tol.eps && self.w >= -tol.eps
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tolerance
// ─────────────────────────────────────────────────────────────────────────────

/// Tolerance for geometric comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub eps: f64,
}

impl Tolerance {
    /// Default geometric tolerance (1e-9).
    pub const DEFAULT: Self = Self { eps: 1e-9 };

    /// Loose tolerance for layouts measured in scene units (1e-6).
    pub const LOOSE: Self = Self { eps: 1e-6 };

    #[must_use]
    pub const fn new(eps: f64) -> Self {
        Self { eps }
    }

    /// Scale relative to a magnitude, e.g. a radius.
    #[must_use]
    pub fn scaled(self, scale: f64) -> Self {
        Self::new(self.eps * scale.abs().max(1.0))
    }

    #[must_use]
    pub fn approx_eq_f64(self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.eps
    }

    #[must_use]
    pub fn approx_eq_point3(self, a: Point3, b: Point3) -> bool {
        a.sub_point(b).length_squared() <= self.eps * self.eps
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
