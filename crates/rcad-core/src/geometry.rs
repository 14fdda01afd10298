//! 几何图元定义
//!
//! 支持的基本图元：
//! - 线段 (Line)
//! - 圆 (Circle)
//! - 圆弧 (Arc)
//! - 椭圆 (Ellipse)
//! - 椭圆弧 (EllipseArc)
//! - 多段线 (Polyline)
//! - 样条曲线 (Spline)
//!
//! 图元是不可变值类型，所有几何运算为纯函数。

use crate::math::{normalize_angle, polar, Angle, BoundingBox2, Point2, Vector2, EPSILON, TAU};
use serde::{Deserialize, Serialize};

/// 几何类型枚举
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Geometry {
    Line(Line),
    Circle(Circle),
    Arc(Arc),
    Ellipse(Ellipse),
    EllipseArc(EllipseArc),
    Polyline(Polyline),
    Spline(Spline),
}

impl Geometry {
    /// 获取几何的包围盒
    pub fn bounding_box(&self) -> BoundingBox2 {
        match self {
            Geometry::Line(l) => l.bounding_box(),
            Geometry::Circle(c) => c.bounding_box(),
            Geometry::Arc(a) => a.bounding_box(),
            Geometry::Ellipse(e) => e.bounding_box(),
            Geometry::EllipseArc(e) => e.ellipse.bounding_box(),
            Geometry::Polyline(pl) => pl.bounding_box(),
            Geometry::Spline(s) => s.bounding_box(),
        }
    }

    /// 获取几何的类型名称
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Line(_) => "Line",
            Geometry::Circle(_) => "Circle",
            Geometry::Arc(_) => "Arc",
            Geometry::Ellipse(_) => "Ellipse",
            Geometry::EllipseArc(_) => "EllipseArc",
            Geometry::Polyline(_) => "Polyline",
            Geometry::Spline(_) => "Spline",
        }
    }

    /// 点到几何的无符号距离
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        match self {
            Geometry::Line(l) => l.distance_to_point(point),
            Geometry::Circle(c) => c.distance_to_point(point).abs(),
            Geometry::Arc(a) => a.distance_to_point(point),
            Geometry::Ellipse(e) => (e.nearest_point(point) - point).norm(),
            Geometry::EllipseArc(e) => e.distance_to_point(point),
            Geometry::Polyline(pl) => pl.distance_to_point(point),
            Geometry::Spline(s) => s.distance_to_point(point),
        }
    }

    /// 几何上离给定点最近的点
    pub fn nearest_point(&self, point: &Point2) -> Point2 {
        match self {
            Geometry::Line(l) => l.nearest_point(point, true),
            Geometry::Circle(c) => c.nearest_point(point),
            Geometry::Arc(a) => a.nearest_point(point),
            Geometry::Ellipse(e) => e.nearest_point(point),
            Geometry::EllipseArc(e) => e.nearest_point(point),
            Geometry::Polyline(pl) => pl.nearest_point(point),
            Geometry::Spline(s) => s.nearest_point(point),
        }
    }

    /// 端点（封闭曲线没有端点）
    pub fn endpoints(&self) -> Vec<Point2> {
        match self {
            Geometry::Line(l) => vec![l.start, l.end],
            Geometry::Circle(_) | Geometry::Ellipse(_) => vec![],
            Geometry::Arc(a) => vec![a.start_point(), a.end_point()],
            Geometry::EllipseArc(e) => vec![e.start_point(), e.end_point()],
            // 多段线的每个顶点都是分段端点
            Geometry::Polyline(pl) => pl.vertices.iter().map(|v| v.point).collect(),
            Geometry::Spline(s) => match (s.control_points.first(), s.control_points.last()) {
                (Some(a), Some(b)) if !s.closed => vec![*a, *b],
                _ => vec![],
            },
        }
    }

    /// 中心点（圆/弧/椭圆）
    pub fn center(&self) -> Option<Point2> {
        match self {
            Geometry::Circle(c) => Some(c.center),
            Geometry::Arc(a) => Some(a.center),
            Geometry::Ellipse(e) => Some(e.center),
            Geometry::EllipseArc(e) => Some(e.ellipse.center),
            _ => None,
        }
    }

    /// 中点（开曲线）
    pub fn middle_point(&self) -> Option<Point2> {
        match self {
            Geometry::Line(l) => Some(l.midpoint()),
            Geometry::Arc(a) => Some(a.middle_point()),
            _ => None,
        }
    }
}

/// 线段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: Point2,
    pub end: Point2,
}

impl Line {
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// 计算线段长度
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// 方向向量（单位向量）；零长线段返回零向量
    pub fn direction(&self) -> Vector2 {
        let d = self.end - self.start;
        let n = d.norm();
        if n < EPSILON {
            Vector2::zeros()
        } else {
            d / n
        }
    }

    /// 方向角
    pub fn angle(&self) -> Angle {
        Angle::of(self.start, self.end)
    }

    /// 计算线段中点
    pub fn midpoint(&self) -> Point2 {
        Point2::new(
            (self.start.x + self.end.x) / 2.0,
            (self.start.y + self.end.y) / 2.0,
        )
    }

    /// 参数点，t∈[0,1] 对应 start→end
    pub fn point_at(&self, t: f64) -> Point2 {
        self.start + (self.end - self.start) * t
    }

    /// 线段上离给定点最近的点
    ///
    /// `limited` 为 true 时夹紧到线段端点，否则按无限直线投影。
    pub fn nearest_point(&self, point: &Point2, limited: bool) -> Point2 {
        let v = self.end - self.start;
        let c2 = v.dot(&v);
        if c2 < EPSILON {
            return self.start;
        }
        let t = (point - self.start).dot(&v) / c2;
        if limited {
            self.point_at(t.clamp(0.0, 1.0))
        } else {
            self.point_at(t)
        }
    }

    /// 计算点到线段的距离
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        (self.nearest_point(point, true) - point).norm()
    }

    /// 点在直线的哪一侧：正为左侧，负为右侧，近零为共线
    ///
    /// 偏移/等距构造用它决定方向。
    pub fn side_of(&self, point: &Point2) -> f64 {
        let d = self.end - self.start;
        let w = point - self.start;
        d.x * w.y - d.y * w.x
    }

    /// 点到无限直线的垂直距离
    pub fn distance_to_infinite_line(&self, point: &Point2) -> f64 {
        let len = self.length();
        if len < EPSILON {
            return (point - self.start).norm();
        }
        self.side_of(point).abs() / len
    }

    /// 沿法向平移得到平行线段
    pub fn offset_by(&self, distance: f64, toward: &Point2) -> Line {
        let dir = self.direction();
        let normal = Vector2::new(-dir.y, dir.x);
        let sign = if self.side_of(toward) >= 0.0 { 1.0 } else { -1.0 };
        let shift = normal * (distance * sign);
        Line::new(self.start + shift, self.end + shift)
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::from_points([self.start, self.end])
    }
}

/// 圆
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Point2,
    pub radius: f64,
}

impl Circle {
    pub fn new(center: Point2, radius: f64) -> Self {
        Self { center, radius }
    }

    /// 有符号距离，负值表示在圆内
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        (point - self.center).norm() - self.radius
    }

    /// 获取圆上指定角度的点
    pub fn point_at_angle(&self, angle: f64) -> Point2 {
        polar(self.center, self.radius, angle)
    }

    /// 圆上离给定点最近的点
    pub fn nearest_point(&self, point: &Point2) -> Point2 {
        let d = point - self.center;
        let n = d.norm();
        if n < EPSILON {
            // 圆心处任意方向
            return self.point_at_angle(0.0);
        }
        self.center + d * (self.radius / n)
    }

    /// 象限点（0°, 90°, 180°, 270°）
    pub fn quadrant_points(&self) -> [Point2; 4] {
        [
            self.point_at_angle(0.0),
            self.point_at_angle(std::f64::consts::FRAC_PI_2),
            self.point_at_angle(std::f64::consts::PI),
            self.point_at_angle(3.0 * std::f64::consts::FRAC_PI_2),
        ]
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::new(
            Point2::new(self.center.x - self.radius, self.center.y - self.radius),
            Point2::new(self.center.x + self.radius, self.center.y + self.radius),
        )
    }
}

/// 圆弧
///
/// `reversed` 为 false 时从 start_angle 逆时针扫到 end_angle，
/// 为 true 时顺时针。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub center: Point2,
    pub radius: f64,
    /// 起始角度（弧度）
    pub start_angle: f64,
    /// 终止角度（弧度）
    pub end_angle: f64,
    /// 方向标志：true 为顺时针
    pub reversed: bool,
}

impl Arc {
    pub fn new(center: Point2, radius: f64, start_angle: f64, end_angle: f64, reversed: bool) -> Self {
        Self {
            center,
            radius,
            start_angle: normalize_angle(start_angle),
            end_angle: normalize_angle(end_angle),
            reversed,
        }
    }

    /// 从三点创建圆弧，方向取决于三点走向
    pub fn from_three_points(p1: Point2, p2: Point2, p3: Point2) -> Option<Self> {
        let d = 2.0 * (p1.x * (p2.y - p3.y) + p2.x * (p3.y - p1.y) + p3.x * (p1.y - p2.y));
        if d.abs() < EPSILON {
            return None; // 三点共线
        }

        let sq1 = p1.x * p1.x + p1.y * p1.y;
        let sq2 = p2.x * p2.x + p2.y * p2.y;
        let sq3 = p3.x * p3.x + p3.y * p3.y;
        let ux = (sq1 * (p2.y - p3.y) + sq2 * (p3.y - p1.y) + sq3 * (p1.y - p2.y)) / d;
        let uy = (sq1 * (p3.x - p2.x) + sq2 * (p1.x - p3.x) + sq3 * (p2.x - p1.x)) / d;

        let center = Point2::new(ux, uy);
        let radius = (p1 - center).norm();

        let a1 = (p1.y - center.y).atan2(p1.x - center.x);
        let a2 = (p2.y - center.y).atan2(p2.x - center.x);
        let a3 = (p3.y - center.y).atan2(p3.x - center.x);

        // 中间点不在逆时针扫掠内则为顺时针弧
        let reversed = !Angle::new(a2).is_between(Angle::new(a1), Angle::new(a3));

        Some(Self::new(center, radius, a1, a3, reversed))
    }

    /// 计算弧长
    pub fn length(&self) -> f64 {
        self.sweep_angle() * self.radius
    }

    /// 扫过的角度，始终为正
    pub fn sweep_angle(&self) -> f64 {
        let sweep = if self.reversed {
            normalize_angle(self.start_angle - self.end_angle)
        } else {
            normalize_angle(self.end_angle - self.start_angle)
        };
        if sweep < EPSILON {
            TAU
        } else {
            sweep
        }
    }

    /// 获取起点
    pub fn start_point(&self) -> Point2 {
        polar(self.center, self.radius, self.start_angle)
    }

    /// 获取终点
    pub fn end_point(&self) -> Point2 {
        polar(self.center, self.radius, self.end_angle)
    }

    /// 弧的中点
    pub fn middle_point(&self) -> Point2 {
        let half = self.sweep_angle() / 2.0;
        let mid = if self.reversed {
            self.start_angle - half
        } else {
            self.start_angle + half
        };
        polar(self.center, self.radius, mid)
    }

    /// 检查角度是否在弧的范围内
    pub fn contains_angle(&self, angle: f64) -> bool {
        let a = Angle::new(angle);
        if self.reversed {
            a.is_between(Angle::new(self.end_angle), Angle::new(self.start_angle))
        } else {
            a.is_between(Angle::new(self.start_angle), Angle::new(self.end_angle))
        }
    }

    /// 弧上离给定点最近的点
    pub fn nearest_point(&self, point: &Point2) -> Point2 {
        let angle = (point.y - self.center.y).atan2(point.x - self.center.x);
        if self.contains_angle(angle) {
            polar(self.center, self.radius, angle)
        } else {
            let s = self.start_point();
            let e = self.end_point();
            if (point - s).norm() <= (point - e).norm() {
                s
            } else {
                e
            }
        }
    }

    /// 计算点到圆弧的距离
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        (self.nearest_point(point) - point).norm()
    }

    /// 完整圆
    pub fn to_circle(&self) -> Circle {
        Circle::new(self.center, self.radius)
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        let mut bbox = BoundingBox2::from_points([self.start_point(), self.end_point()]);
        let pi = std::f64::consts::PI;
        for angle in [0.0, pi / 2.0, pi, 3.0 * pi / 2.0] {
            if self.contains_angle(angle) {
                bbox.expand_to_include(&polar(self.center, self.radius, angle));
            }
        }
        bbox
    }
}

/// 椭圆
///
/// `major_axis` 同时携带方向和半长轴长度，`ratio` 为短长轴之比。
/// 不变量：0 < ratio ≤ 1（长轴不短于短轴）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ellipse {
    pub center: Point2,
    /// 从中心指向长轴端点的向量
    pub major_axis: Vector2,
    /// 短轴/长轴比
    pub ratio: f64,
}

impl Ellipse {
    pub fn new(center: Point2, major_axis: Vector2, ratio: f64) -> Self {
        Self {
            center,
            major_axis,
            ratio,
        }
    }

    pub fn major_radius(&self) -> f64 {
        self.major_axis.norm()
    }

    pub fn minor_radius(&self) -> f64 {
        self.major_axis.norm() * self.ratio
    }

    /// 长轴方向角
    pub fn rotation(&self) -> f64 {
        self.major_axis.y.atan2(self.major_axis.x)
    }

    /// 短轴方向向量（长度为短半轴）
    pub fn minor_axis(&self) -> Vector2 {
        Vector2::new(-self.major_axis.y, self.major_axis.x) * self.ratio
    }

    /// 参数点：t 为椭圆参数（非极角）
    pub fn point_at_param(&self, t: f64) -> Point2 {
        self.center + self.major_axis * t.cos() + self.minor_axis() * t.sin()
    }

    /// 椭圆上离给定点最近的点
    ///
    /// 粗采样后有界牛顿细化，迭代次数固定上限。
    pub fn nearest_point(&self, point: &Point2) -> Point2 {
        let mut best_t = 0.0;
        let mut best_d = f64::MAX;
        const SAMPLES: usize = 36;
        for i in 0..SAMPLES {
            let t = TAU * (i as f64) / (SAMPLES as f64);
            let d = (self.point_at_param(t) - point).norm();
            if d < best_d {
                best_d = d;
                best_t = t;
            }
        }
        // 黄金分割细化，窗口为一个采样间隔
        let mut lo = best_t - TAU / SAMPLES as f64;
        let mut hi = best_t + TAU / SAMPLES as f64;
        const GOLDEN: f64 = 0.618_033_988_749_894_8;
        for _ in 0..40 {
            let m1 = hi - (hi - lo) * GOLDEN;
            let m2 = lo + (hi - lo) * GOLDEN;
            let d1 = (self.point_at_param(m1) - point).norm();
            let d2 = (self.point_at_param(m2) - point).norm();
            if d1 < d2 {
                hi = m2;
            } else {
                lo = m1;
            }
        }
        self.point_at_param((lo + hi) / 2.0)
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        // 旋转椭圆的精确包围盒
        let a = self.major_radius();
        let b = self.minor_radius();
        let phi = self.rotation();
        let dx = ((a * phi.cos()).powi(2) + (b * phi.sin()).powi(2)).sqrt();
        let dy = ((a * phi.sin()).powi(2) + (b * phi.cos()).powi(2)).sqrt();
        BoundingBox2::new(
            Point2::new(self.center.x - dx, self.center.y - dy),
            Point2::new(self.center.x + dx, self.center.y + dy),
        )
    }
}

/// 椭圆弧
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EllipseArc {
    pub ellipse: Ellipse,
    /// 起始参数
    pub start_param: f64,
    /// 终止参数
    pub end_param: f64,
}

impl EllipseArc {
    pub fn new(ellipse: Ellipse, start_param: f64, end_param: f64) -> Self {
        Self {
            ellipse,
            start_param: normalize_angle(start_param),
            end_param: normalize_angle(end_param),
        }
    }

    pub fn start_point(&self) -> Point2 {
        self.ellipse.point_at_param(self.start_param)
    }

    pub fn end_point(&self) -> Point2 {
        self.ellipse.point_at_param(self.end_param)
    }

    pub fn contains_param(&self, t: f64) -> bool {
        Angle::new(t).is_between(Angle::new(self.start_param), Angle::new(self.end_param))
    }

    pub fn nearest_point(&self, point: &Point2) -> Point2 {
        // 全椭圆最近点在参数范围内则直接用，否则取端点
        let p = self.ellipse.nearest_point(point);
        let rel = p - self.ellipse.center;
        let major = self.ellipse.major_axis;
        let minor = self.ellipse.minor_axis();
        let t = (rel.dot(&minor) / minor.norm_squared()).atan2(rel.dot(&major) / major.norm_squared());
        if self.contains_param(t) {
            p
        } else {
            let s = self.start_point();
            let e = self.end_point();
            if (point - s).norm() <= (point - e).norm() {
                s
            } else {
                e
            }
        }
    }

    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        (self.nearest_point(point) - point).norm()
    }
}

/// 多段线顶点
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolylineVertex {
    pub point: Point2,
    /// 凸度（bulge）- 用于弧线段，0表示直线
    pub bulge: f64,
}

impl PolylineVertex {
    pub fn new(point: Point2) -> Self {
        Self { point, bulge: 0.0 }
    }

    pub fn with_bulge(point: Point2, bulge: f64) -> Self {
        Self { point, bulge }
    }
}

/// 多段线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub vertices: Vec<PolylineVertex>,
    /// 是否闭合
    pub closed: bool,
}

impl Polyline {
    pub fn new(vertices: Vec<PolylineVertex>, closed: bool) -> Self {
        Self { vertices, closed }
    }

    /// 从点列表创建（所有顶点都是直线连接）
    pub fn from_points(points: impl IntoIterator<Item = Point2>, closed: bool) -> Self {
        Self {
            vertices: points.into_iter().map(PolylineVertex::new).collect(),
            closed,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// 线段数量
    pub fn segment_count(&self) -> usize {
        if self.vertices.len() < 2 {
            return 0;
        }
        if self.closed {
            self.vertices.len()
        } else {
            self.vertices.len() - 1
        }
    }

    /// 分解为独立的线段/圆弧
    pub fn segments(&self) -> Vec<Geometry> {
        let mut result = Vec::with_capacity(self.segment_count());
        for i in 0..self.segment_count() {
            let v1 = &self.vertices[i];
            let v2 = &self.vertices[(i + 1) % self.vertices.len()];
            if v1.bulge.abs() < EPSILON {
                result.push(Geometry::Line(Line::new(v1.point, v2.point)));
            } else if let Some(arc) = bulge_to_arc(v1.point, v2.point, v1.bulge) {
                result.push(Geometry::Arc(arc));
            } else {
                // 弦退化时回退到直线
                result.push(Geometry::Line(Line::new(v1.point, v2.point)));
            }
        }
        result
    }

    /// 计算总长度
    pub fn length(&self) -> f64 {
        self.segments()
            .iter()
            .map(|g| match g {
                Geometry::Line(l) => l.length(),
                Geometry::Arc(a) => a.length(),
                _ => 0.0,
            })
            .sum()
    }

    /// 计算点到多段线的距离
    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        if self.vertices.is_empty() {
            return f64::MAX;
        }
        if self.vertices.len() == 1 {
            return (point - self.vertices[0].point).norm();
        }
        self.segments()
            .iter()
            .map(|g| g.distance_to_point(point))
            .fold(f64::MAX, f64::min)
    }

    /// 多段线上离给定点最近的点
    pub fn nearest_point(&self, point: &Point2) -> Point2 {
        let mut best = match self.vertices.first() {
            Some(v) => v.point,
            None => *point,
        };
        let mut best_d = (best - point).norm();
        for seg in self.segments() {
            let p = seg.nearest_point(point);
            let d = (p - point).norm();
            if d < best_d {
                best_d = d;
                best = p;
            }
        }
        best
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        if self.vertices.is_empty() {
            return BoundingBox2::empty();
        }
        let mut bbox = BoundingBox2::from_points(self.vertices.iter().map(|v| v.point));
        for seg in self.segments() {
            if let Geometry::Arc(a) = seg {
                let ab = a.bounding_box();
                bbox.expand_to_include(&ab.min);
                bbox.expand_to_include(&ab.max);
            }
        }
        bbox
    }
}

/// 凸度表示的弧段转圆弧
///
/// bulge = tan(sweep/4)，正值为逆时针。
pub fn bulge_to_arc(p1: Point2, p2: Point2, bulge: f64) -> Option<Arc> {
    let chord = p2 - p1;
    let chord_len = chord.norm();
    if chord_len < EPSILON || bulge.abs() < EPSILON {
        return None;
    }

    // 有符号扫掠角，正为逆时针
    let sweep = 4.0 * bulge.atan();
    let half = sweep.abs() / 2.0;
    let radius = chord_len / (2.0 * half.sin());

    let mid = Point2::new((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0);
    let perp = Vector2::new(-chord.y, chord.x) / chord_len;
    // 圆心到弦中点的有符号距离：小弧为正侧，大弧翻到另一侧
    let h = bulge.signum() * radius * half.cos();
    let center = mid + perp * h;

    let a1 = (p1.y - center.y).atan2(p1.x - center.x);
    let a2 = (p2.y - center.y).atan2(p2.x - center.x);
    Some(Arc::new(center, radius, a1, a2, bulge < 0.0))
}

/// 圆弧转凸度
pub fn arc_to_bulge(arc: &Arc) -> f64 {
    let sweep = arc.sweep_angle();
    let b = (sweep / 4.0).tan();
    if arc.reversed {
        -b
    } else {
        b
    }
}

/// 样条曲线
///
/// 仅携带最小参数化；插值/细分由渲染协作方完成。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spline {
    pub control_points: Vec<Point2>,
    pub degree: usize,
    pub closed: bool,
}

impl Spline {
    pub fn new(control_points: Vec<Point2>, degree: usize, closed: bool) -> Self {
        Self {
            control_points,
            degree,
            closed,
        }
    }

    /// 以控制多边形近似
    fn control_polygon(&self) -> Polyline {
        Polyline::from_points(self.control_points.iter().copied(), self.closed)
    }

    pub fn distance_to_point(&self, point: &Point2) -> f64 {
        self.control_polygon().distance_to_point(point)
    }

    pub fn nearest_point(&self, point: &Point2) -> Point2 {
        self.control_polygon().nearest_point(point)
    }

    pub fn bounding_box(&self) -> BoundingBox2 {
        BoundingBox2::from_points(self.control_points.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_length() {
        let line = Line::new(Point2::new(0.0, 0.0), Point2::new(3.0, 4.0));
        assert!((line.length() - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_line_side_of() {
        let line = Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        assert!(line.side_of(&Point2::new(5.0, 1.0)) > 0.0);
        assert!(line.side_of(&Point2::new(5.0, -1.0)) < 0.0);
        assert!(line.side_of(&Point2::new(20.0, 0.0)).abs() < EPSILON);
    }

    #[test]
    fn test_line_offset_by() {
        let line = Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        let off = line.offset_by(2.0, &Point2::new(5.0, 5.0));
        assert!((off.start.y - 2.0).abs() < EPSILON);
        assert!((off.end.y - 2.0).abs() < EPSILON);
        let off2 = line.offset_by(2.0, &Point2::new(5.0, -5.0));
        assert!((off2.start.y + 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_arc_from_three_points() {
        let arc = Arc::from_three_points(
            Point2::new(10.0, 0.0),
            Point2::new(0.0, 10.0),
            Point2::new(-10.0, 0.0),
        )
        .unwrap();
        assert!((arc.radius - 10.0).abs() < 1.0e-9);
        assert!(arc.center.coords.norm() < 1.0e-9);
        assert!(!arc.reversed);

        // 反向走向
        let arc = Arc::from_three_points(
            Point2::new(10.0, 0.0),
            Point2::new(0.0, -10.0),
            Point2::new(-10.0, 0.0),
        )
        .unwrap();
        assert!(arc.reversed);
    }

    #[test]
    fn test_arc_from_collinear_points() {
        assert!(Arc::from_three_points(
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 0.0),
            Point2::new(10.0, 0.0),
        )
        .is_none());
    }

    #[test]
    fn test_arc_contains_angle_reversed() {
        let arc = Arc::new(Point2::origin(), 5.0, 0.0, std::f64::consts::PI, true);
        // 顺时针从 0 到 π 经过 270°
        assert!(arc.contains_angle(3.0 * std::f64::consts::FRAC_PI_2));
        assert!(!arc.contains_angle(std::f64::consts::FRAC_PI_2));
    }

    #[test]
    fn test_ellipse_point_at_param() {
        let e = Ellipse::new(Point2::origin(), Vector2::new(10.0, 0.0), 0.5);
        let p = e.point_at_param(0.0);
        assert!((p.x - 10.0).abs() < EPSILON);
        let p = e.point_at_param(std::f64::consts::FRAC_PI_2);
        assert!((p.y - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_ellipse_nearest_point() {
        let e = Ellipse::new(Point2::origin(), Vector2::new(10.0, 0.0), 0.5);
        let p = e.nearest_point(&Point2::new(20.0, 0.0));
        assert!((p.x - 10.0).abs() < 1.0e-6);
        assert!(p.y.abs() < 1.0e-6);
    }

    #[test]
    fn test_bulge_round_trip() {
        let arc = Arc::new(Point2::new(5.0, 0.0), 5.0, std::f64::consts::PI, 0.0, false);
        let b = arc_to_bulge(&arc);
        let back = bulge_to_arc(arc.start_point(), arc.end_point(), b).unwrap();
        assert!((back.center.x - 5.0).abs() < 1.0e-9);
        assert!(back.center.y.abs() < 1.0e-9);
        assert!((back.radius - 5.0).abs() < 1.0e-9);
    }

    #[test]
    fn test_polyline_segments() {
        let pl = Polyline::from_points(
            [
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
            ],
            false,
        );
        let segs = pl.segments();
        assert_eq!(segs.len(), 2);
        assert!(matches!(segs[0], Geometry::Line(_)));
    }

    #[test]
    fn test_polyline_endpoints_are_vertices() {
        let points = [
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
            Point2::new(10.0, 10.0),
        ];
        // 开闭多段线都把全部顶点当作分段端点
        for closed in [false, true] {
            let pl = Geometry::Polyline(Polyline::from_points(points, closed));
            assert_eq!(pl.endpoints(), points.to_vec());
        }
    }

    #[test]
    fn test_polyline_arc_segment() {
        // 半圆凸度 bulge = tan(π/4) = 1
        let pl = Polyline::new(
            vec![
                PolylineVertex::with_bulge(Point2::new(0.0, 0.0), 1.0),
                PolylineVertex::new(Point2::new(10.0, 0.0)),
            ],
            false,
        );
        let segs = pl.segments();
        assert_eq!(segs.len(), 1);
        match &segs[0] {
            Geometry::Arc(a) => {
                assert!((a.radius - 5.0).abs() < 1.0e-9);
                assert!((a.center.x - 5.0).abs() < 1.0e-9);
            }
            other => panic!("expected arc, got {}", other.type_name()),
        }
    }
}
