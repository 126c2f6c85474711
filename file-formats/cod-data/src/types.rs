//! Value types shared by the geometry, skeleton and surface parsers.

use std::ops::{Add, Mul, Sub};

/// A vector in 3D space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self::splat(0.0);
    pub const ONE: Self = Self::splat(1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn splat(value: f32) -> Self {
        Self::new(value, value, value)
    }

    /// Scales every component down by `divisor`.
    pub fn div_scalar(self, divisor: f32) -> Self {
        Self::new(self.x / divisor, self.y / divisor, self.z / divisor)
    }

    pub fn cross(self, other: Self) -> Self {
        Self::from_glam(self.to_glam().cross(other.to_glam()))
    }

    pub fn to_glam(self) -> glam::Vec3 {
        glam::Vec3::new(self.x, self.y, self.z)
    }

    pub fn from_glam(v: glam::Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// A rotation quaternion.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Builds a unit quaternion from three components stored as 16-bit
    /// integers scaled by 32768.
    ///
    /// `w` is recovered from the unit-length constraint. Quantization can
    /// push `x² + y² + z²` slightly above one, in which case `w` is zero.
    pub fn from_quantized(x: i16, y: i16, z: i16) -> Self {
        let x = f32::from(x) / 32768.0;
        let y = f32::from(y) / 32768.0;
        let z = f32::from(z) / 32768.0;
        Self::new(x, y, z, reconstruct_w(x, y, z))
    }

    fn xyz(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Rotates `v` with `t = 2 * cross(q.xyz, v)` and
    /// `v' = v + w * t + cross(q.xyz, t)`.
    pub fn rotate(self, v: Vec3) -> Vec3 {
        let q = self.xyz();
        let t = q.cross(v) * 2.0;
        v + t * self.w + q.cross(t)
    }

    pub fn to_glam(self) -> glam::Quat {
        glam::Quat::from_xyzw(self.x, self.y, self.z, self.w)
    }

    pub fn from_glam(q: glam::Quat) -> Self {
        Self::new(q.x, q.y, q.z, q.w)
    }
}

/// Hamilton product, `self` applied after `rhs`.
impl Mul for Quaternion {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::from_glam(self.to_glam() * rhs.to_glam())
    }
}

fn reconstruct_w(x: f32, y: f32, z: f32) -> f32 {
    let (x, y, z) = (f64::from(x), f64::from(y), f64::from(z));
    (1.0 - x * x - y * y - z * z).max(0.0).sqrt() as f32
}

/// RGBA color with channels in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_rgba8([r, g, b, a]: [u8; 4]) -> Self {
        Self::new(
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            f32::from(a) / 255.0,
        )
    }
}

/// Texture coordinate
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Uv {
    pub u: f32,
    pub v: f32,
}

impl Uv {
    pub const fn new(u: f32, v: f32) -> Self {
        Self { u, v }
    }

    /// Converts from the on-disk origin to a bottom-left origin.
    pub fn flip_v(self) -> Self {
        Self::new(self.u, 1.0 - self.v)
    }
}

/// Three vertex indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize))]
pub struct Triangle {
    pub v1: u16,
    pub v2: u16,
    pub v3: u16,
}

impl Triangle {
    pub const fn new(v1: u16, v2: u16, v3: u16) -> Self {
        Self { v1, v2, v3 }
    }

    pub const fn indices(self) -> [u16; 3] {
        [self.v1, self.v2, self.v3]
    }

    /// True when two corners share a vertex.
    pub const fn is_degenerate(self) -> bool {
        self.v1 == self.v2 || self.v2 == self.v3 || self.v1 == self.v3
    }
}

/// Parses a decimal float as written in entity key/value text.
pub fn parse_float(s: &str) -> Option<f32> {
    s.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert!(
            (a - b).to_glam().length() < EPSILON,
            "expected {b:?}, got {a:?}"
        );
    }

    #[test]
    fn test_identity_rotation_is_noop() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_vec_eq(Quaternion::IDENTITY.rotate(v), v);
    }

    #[test]
    fn test_rotate_quarter_turn_about_z() {
        let half = std::f32::consts::FRAC_1_SQRT_2;
        let q = Quaternion::new(0.0, 0.0, half, half);
        assert_vec_eq(q.rotate(Vec3::new(1.0, 0.0, 0.0)), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_rotate_matches_glam() {
        let q = glam::Quat::from_euler(glam::EulerRot::XYZ, 0.3, -1.1, 2.0);
        let v = glam::Vec3::new(0.4, -0.25, 0.75);
        let ours = Quaternion::from_glam(q).rotate(Vec3::from_glam(v));
        assert_vec_eq(ours, Vec3::from_glam(q * v));
    }

    #[test]
    fn test_multiply_composes_parent_then_child() {
        let half = std::f32::consts::FRAC_1_SQRT_2;
        let quarter_z = Quaternion::new(0.0, 0.0, half, half);
        let half_z = quarter_z * quarter_z;
        assert_vec_eq(half_z.rotate(Vec3::new(1.0, 0.0, 0.0)), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_quantized_w_reconstruction() {
        let q = Quaternion::from_quantized(0, 0, 0);
        assert_eq!(q, Quaternion::IDENTITY);

        let q = Quaternion::from_quantized(16384, 0, 0);
        assert!((q.w - 0.75f32.sqrt()).abs() < EPSILON);
    }

    #[test]
    fn test_quantized_w_clamps_when_over_unit_length() {
        // 23171 / 32768 = 0.70712, so x² + y² + z² ≈ 1.5
        let q = Quaternion::from_quantized(23171, 23171, 23171);
        assert_eq!(q.w, 0.0);
        assert!(!q.w.is_nan());
    }

    #[test]
    fn test_uv_flip() {
        assert_eq!(Uv::new(0.25, 0.25).flip_v(), Uv::new(0.25, 0.75));
    }

    #[test]
    fn test_degenerate_triangle() {
        assert!(Triangle::new(1, 1, 2).is_degenerate());
        assert!(Triangle::new(1, 2, 1).is_degenerate());
        assert!(!Triangle::new(0, 1, 2).is_degenerate());
    }

    #[test]
    fn test_parse_float() {
        assert_eq!(parse_float("1.5"), Some(1.5));
        assert_eq!(parse_float(" -90 "), Some(-90.0));
        assert_eq!(parse_float("1e2"), Some(100.0));
        assert_eq!(parse_float("abc"), None);
        assert_eq!(parse_float(""), None);
    }
}
