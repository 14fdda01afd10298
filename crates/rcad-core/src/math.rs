//! 数学基础类型
//!
//! 基于 nalgebra 的二维点/向量，以及：
//! - 统一的容差常量 `EPSILON`
//! - 规范化角度类型 `Angle`（[0, 2π) 区间，模 2π 比较）
//! - 包围盒 `BoundingBox2`

use serde::{Deserialize, Serialize};

/// 二维点
pub type Point2 = nalgebra::Point2<f64>;
/// 二维向量
pub type Vector2 = nalgebra::Vector2<f64>;

/// 统一几何容差
///
/// 所有相等/退化判断都经过该容差，禁止浮点精确比较。
pub const EPSILON: f64 = 1.0e-10;

/// 距离平方比较用容差
pub const EPSILON2: f64 = 1.0e-20;

/// 角度比较容差（弧度）
pub const ANGLE_EPSILON: f64 = 1.0e-9;

pub const TAU: f64 = 2.0 * std::f64::consts::PI;

/// 将角度规范化到 [0, 2π)
pub fn normalize_angle(a: f64) -> f64 {
    let r = a.rem_euclid(TAU);
    if r >= TAU {
        0.0
    } else {
        r
    }
}

/// 极坐标转点
pub fn polar(origin: Point2, distance: f64, angle: f64) -> Point2 {
    Point2::new(
        origin.x + distance * angle.cos(),
        origin.y + distance * angle.sin(),
    )
}

/// 规范化角度
///
/// 内部保持弧度值在 [0, 2π)，比较按模 2π 进行，带容差。
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Angle(f64);

impl Angle {
    pub fn new(radians: f64) -> Self {
        Self(normalize_angle(radians))
    }

    pub fn from_degrees(degrees: f64) -> Self {
        Self::new(degrees.to_radians())
    }

    /// 两点连线的方向角
    pub fn of(from: Point2, to: Point2) -> Self {
        Self::new((to.y - from.y).atan2(to.x - from.x))
    }

    pub fn radians(&self) -> f64 {
        self.0
    }

    /// 模 2π 的带容差相等
    pub fn is_close(&self, other: Angle) -> bool {
        let d = normalize_angle(self.0 - other.0);
        d < ANGLE_EPSILON || TAU - d < ANGLE_EPSILON
    }

    /// 检查角度是否落在 start→end 的逆时针扫掠范围内
    pub fn is_between(&self, start: Angle, end: Angle) -> bool {
        let sweep = normalize_angle(end.0 - start.0);
        let offset = normalize_angle(self.0 - start.0);
        offset <= sweep + ANGLE_EPSILON
    }

    /// 反向角
    pub fn opposite(&self) -> Angle {
        Angle::new(self.0 + std::f64::consts::PI)
    }
}

impl PartialEq for Angle {
    fn eq(&self, other: &Self) -> bool {
        self.is_close(*other)
    }
}

impl PartialOrd for Angle {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        if self.is_close(*other) {
            Some(std::cmp::Ordering::Equal)
        } else {
            self.0.partial_cmp(&other.0)
        }
    }
}

/// 二维轴对齐包围盒
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoundingBox2 {
    pub min: Point2,
    pub max: Point2,
}

impl BoundingBox2 {
    pub fn new(min: Point2, max: Point2) -> Self {
        Self { min, max }
    }

    pub fn empty() -> Self {
        Self {
            min: Point2::new(f64::MAX, f64::MAX),
            max: Point2::new(f64::MIN, f64::MIN),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Point2>) -> Self {
        let mut bbox = Self::empty();
        for p in points {
            bbox.expand_to_include(&p);
        }
        bbox
    }

    pub fn expand_to_include(&mut self, p: &Point2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn contains(&self, p: &Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// 按给定余量外扩
    pub fn inflated(&self, margin: f64) -> Self {
        Self {
            min: Point2::new(self.min.x - margin, self.min.y - margin),
            max: Point2::new(self.max.x + margin, self.max.y + margin),
        }
    }

    /// 到点的最小距离（点在盒内为 0）
    pub fn distance_to_point(&self, p: &Point2) -> f64 {
        let dx = (self.min.x - p.x).max(0.0).max(p.x - self.max.x);
        let dy = (self.min.y - p.y).max(0.0).max(p.y - self.max.y);
        (dx * dx + dy * dy).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle(-std::f64::consts::PI) - std::f64::consts::PI).abs() < EPSILON);
        assert!(normalize_angle(TAU) < EPSILON);
        assert!((normalize_angle(3.0 * std::f64::consts::PI) - std::f64::consts::PI).abs() < EPSILON);
    }

    #[test]
    fn test_angle_equality_modulo() {
        let a = Angle::new(0.0);
        let b = Angle::new(TAU);
        let c = Angle::new(TAU - 1.0e-12);
        assert_eq!(a, b);
        assert_eq!(a, c);
        assert_ne!(a, Angle::new(1.0));
    }

    #[test]
    fn test_angle_between_wrapping() {
        // 跨 0 的扫掠：从 270° 到 45°
        let start = Angle::from_degrees(270.0);
        let end = Angle::from_degrees(45.0);
        assert!(Angle::from_degrees(0.0).is_between(start, end));
        assert!(Angle::from_degrees(300.0).is_between(start, end));
        assert!(!Angle::from_degrees(90.0).is_between(start, end));
    }

    #[test]
    fn test_polar() {
        let p = polar(Point2::new(1.0, 1.0), 2.0, std::f64::consts::FRAC_PI_2);
        assert!((p.x - 1.0).abs() < EPSILON);
        assert!((p.y - 3.0).abs() < EPSILON);
    }

    #[test]
    fn test_bbox_distance() {
        let bbox = BoundingBox2::new(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0));
        assert!(bbox.distance_to_point(&Point2::new(5.0, 5.0)) < EPSILON);
        assert!((bbox.distance_to_point(&Point2::new(13.0, 14.0)) - 5.0).abs() < EPSILON);
    }
}
