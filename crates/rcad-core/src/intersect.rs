//! 图元求交
//!
//! 纯函数，对参数顺序对称。退化输入（平行、重合、半径非正）
//! 返回空解集并带退化标记，不抛错误。

use crate::geometry::{Arc, Circle, Ellipse, Geometry, Line};
use crate::math::{polar, Point2, Vector2, EPSILON};
use crate::solutions::Solutions;

/// 近似重合判定容差（求交去重用，比 EPSILON 宽松）
const MERGE_EPS: f64 = 1.0e-6;

/// 有界二分迭代上限
const MAX_BISECT_ITER: usize = 60;

/// 两个图元的交点
///
/// `intersect(a, b)` 与 `intersect(b, a)` 结果一致。
pub fn intersect(a: &Geometry, b: &Geometry) -> Solutions<Point2> {
    match (a, b) {
        (Geometry::Line(l1), Geometry::Line(l2)) => line_line(l1, l2, true),
        (Geometry::Line(l), Geometry::Circle(c)) | (Geometry::Circle(c), Geometry::Line(l)) => {
            line_circle(l, c, true)
        }
        (Geometry::Line(l), Geometry::Arc(arc)) | (Geometry::Arc(arc), Geometry::Line(l)) => {
            line_arc(l, arc)
        }
        (Geometry::Line(l), Geometry::Ellipse(e)) | (Geometry::Ellipse(e), Geometry::Line(l)) => {
            line_ellipse(l, e, true)
        }
        (Geometry::Circle(c1), Geometry::Circle(c2)) => circle_circle(c1, c2),
        (Geometry::Circle(c), Geometry::Arc(arc)) | (Geometry::Arc(arc), Geometry::Circle(c)) => {
            filter_on_arc(circle_circle(c, &arc.to_circle()), arc)
        }
        (Geometry::Circle(c), Geometry::Ellipse(e)) | (Geometry::Ellipse(e), Geometry::Circle(c)) => {
            circle_ellipse(c, e)
        }
        (Geometry::Arc(arc), Geometry::Ellipse(e)) | (Geometry::Ellipse(e), Geometry::Arc(arc)) => {
            filter_on_arc(circle_ellipse(&arc.to_circle(), e), arc)
        }
        (Geometry::Arc(a1), Geometry::Arc(a2)) => {
            filter_on_arc(filter_on_arc(circle_circle(&a1.to_circle(), &a2.to_circle()), a1), a2)
        }
        (Geometry::Ellipse(e1), Geometry::Ellipse(e2)) => ellipse_ellipse(e1, e2),
        // 多段线/样条：按分段分解后合并
        (Geometry::Polyline(pl), other) | (other, Geometry::Polyline(pl)) => {
            let mut result = Solutions::new();
            for seg in pl.segments() {
                for p in intersect(&seg, other) {
                    result.push_unique(p, MERGE_EPS);
                }
            }
            result
        }
        (Geometry::Spline(_), _) | (_, Geometry::Spline(_)) => Solutions::new(),
        (Geometry::EllipseArc(ea), other) | (other, Geometry::EllipseArc(ea)) => {
            let inner = intersect(&Geometry::Ellipse(ea.ellipse.clone()), other);
            inner
                .into_iter()
                .filter(|p| (ea.nearest_point(p) - p).norm() < MERGE_EPS)
                .collect()
        }
    }
}

/// 线段-线段交点
///
/// 平行或重合返回带退化标记的空集。
pub fn line_line(l1: &Line, l2: &Line, limited: bool) -> Solutions<Point2> {
    let d1 = l1.end - l1.start;
    let d2 = l2.end - l2.start;

    let cross = d1.x * d2.y - d1.y * d2.x;
    // 近平行视为退化，不做数值豪赌
    if cross.abs() < EPSILON * (d1.norm() * d2.norm()).max(1.0) {
        return Solutions::degenerate();
    }

    let w = l2.start - l1.start;
    let t1 = (w.x * d2.y - w.y * d2.x) / cross;
    let t2 = (w.x * d1.y - w.y * d1.x) / cross;

    if limited && !((-EPSILON..=1.0 + EPSILON).contains(&t1) && (-EPSILON..=1.0 + EPSILON).contains(&t2)) {
        return Solutions::new();
    }
    Solutions::single(l1.start + d1 * t1)
}

/// 两条无限直线的交点
pub fn line_line_infinite(l1: &Line, l2: &Line) -> Solutions<Point2> {
    line_line(l1, l2, false)
}

/// 线段-圆交点
pub fn line_circle(line: &Line, circle: &Circle, limited: bool) -> Solutions<Point2> {
    if circle.radius <= EPSILON {
        return Solutions::degenerate();
    }
    let d = line.end - line.start;
    let f = line.start - circle.center;

    let a = d.dot(&d);
    if a < EPSILON {
        return Solutions::degenerate();
    }
    let b = 2.0 * f.dot(&d);
    let c = f.dot(&f) - circle.radius * circle.radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < -EPSILON {
        return Solutions::new();
    }

    let mut result = Solutions::new();
    let in_range = |t: f64| !limited || (-EPSILON..=1.0 + EPSILON).contains(&t);

    if discriminant.abs() < EPSILON {
        // 相切
        let t = -b / (2.0 * a);
        if in_range(t) {
            result.push(line.point_at(t));
        }
    } else {
        let sqrt_disc = discriminant.sqrt();
        for t in [(-b - sqrt_disc) / (2.0 * a), (-b + sqrt_disc) / (2.0 * a)] {
            if in_range(t) {
                result.push_unique(line.point_at(t), MERGE_EPS);
            }
        }
    }
    result
}

/// 线段-圆弧交点
pub fn line_arc(line: &Line, arc: &Arc) -> Solutions<Point2> {
    filter_on_arc(line_circle(line, &arc.to_circle(), true), arc)
}

/// 圆-圆交点
pub fn circle_circle(c1: &Circle, c2: &Circle) -> Solutions<Point2> {
    if c1.radius <= EPSILON || c2.radius <= EPSILON {
        return Solutions::degenerate();
    }
    let d = (c2.center - c1.center).norm();
    if d < EPSILON {
        // 同心：重合或无交，均为退化
        return Solutions::degenerate();
    }
    if d > c1.radius + c2.radius + MERGE_EPS || d < (c1.radius - c2.radius).abs() - MERGE_EPS {
        return Solutions::new();
    }

    let a = (c1.radius * c1.radius - c2.radius * c2.radius + d * d) / (2.0 * d);
    let h2 = c1.radius * c1.radius - a * a;
    let h = if h2 > 0.0 { h2.sqrt() } else { 0.0 };

    let dir = (c2.center - c1.center) / d;
    let p = c1.center + dir * a;
    let perp = Vector2::new(-dir.y, dir.x);

    if h < MERGE_EPS {
        // 相切
        Solutions::single(p)
    } else {
        Solutions::from_vec(vec![p + perp * h, p - perp * h])
    }
}

/// 线段-椭圆交点
///
/// 把椭圆仿射映射成单位圆后在直线参数上解一元二次；
/// 仿射变换保持直线参数，结果精确。
pub fn line_ellipse(line: &Line, ellipse: &Ellipse, limited: bool) -> Solutions<Point2> {
    let a = ellipse.major_radius();
    let b = ellipse.minor_radius();
    if a <= EPSILON || b <= EPSILON {
        return Solutions::degenerate();
    }
    let major_unit = ellipse.major_axis / a;
    let minor_unit = Vector2::new(-major_unit.y, major_unit.x);

    let to_local = |p: Point2| {
        let rel = p - ellipse.center;
        Vector2::new(rel.dot(&major_unit) / a, rel.dot(&minor_unit) / b)
    };

    let s = to_local(line.start);
    let e = to_local(line.end);
    let d = e - s;

    let qa = d.dot(&d);
    if qa < EPSILON {
        return Solutions::degenerate();
    }
    let qb = 2.0 * s.dot(&d);
    let qc = s.dot(&s) - 1.0;

    let disc = qb * qb - 4.0 * qa * qc;
    if disc < -EPSILON {
        return Solutions::new();
    }

    let mut result = Solutions::new();
    let in_range = |t: f64| !limited || (-EPSILON..=1.0 + EPSILON).contains(&t);
    if disc.abs() < EPSILON {
        let t = -qb / (2.0 * qa);
        if in_range(t) {
            result.push(line.point_at(t));
        }
    } else {
        let sq = disc.sqrt();
        for t in [(-qb - sq) / (2.0 * qa), (-qb + sq) / (2.0 * qa)] {
            if in_range(t) {
                result.push_unique(line.point_at(t), MERGE_EPS);
            }
        }
    }
    result
}

/// 圆-椭圆交点
///
/// 沿椭圆参数采样圆的有符号距离函数，符号变化区间内二分。
/// 迭代有硬上限，不收敛的区间直接丢弃。
pub fn circle_ellipse(circle: &Circle, ellipse: &Ellipse) -> Solutions<Point2> {
    if circle.radius <= EPSILON {
        return Solutions::degenerate();
    }
    let f = |t: f64| (ellipse.point_at_param(t) - circle.center).norm() - circle.radius;
    roots_on_param(&|t| ellipse.point_at_param(t), &f)
}

/// 椭圆-椭圆交点
pub fn ellipse_ellipse(e1: &Ellipse, e2: &Ellipse) -> Solutions<Point2> {
    let a = e2.major_radius();
    let b = e2.minor_radius();
    if a <= EPSILON || b <= EPSILON {
        return Solutions::degenerate();
    }
    let major_unit = e2.major_axis / a;
    let minor_unit = Vector2::new(-major_unit.y, major_unit.x);
    // e2 的隐式函数：内部为负
    let implicit = move |p: Point2| {
        let rel = p - e2.center;
        let u = rel.dot(&major_unit) / a;
        let v = rel.dot(&minor_unit) / b;
        u * u + v * v - 1.0
    };
    let f = |t: f64| implicit(e1.point_at_param(t));
    roots_on_param(&|t| e1.point_at_param(t), &f)
}

/// 参数曲线上的标量函数求根：采样 + 有界二分
fn roots_on_param(
    curve: &dyn Fn(f64) -> Point2,
    f: &dyn Fn(f64) -> f64,
) -> Solutions<Point2> {
    const SAMPLES: usize = 72;
    let tau = std::f64::consts::TAU;
    let step = tau / SAMPLES as f64;

    let mut result = Solutions::new();
    let mut prev_t = 0.0;
    let mut prev_v = f(0.0);
    for i in 1..=SAMPLES {
        let t = step * i as f64;
        let v = f(t);
        if prev_v == 0.0 || prev_v.signum() != v.signum() {
            let (mut lo, mut hi) = (prev_t, t);
            let mut lo_v = prev_v;
            for _ in 0..MAX_BISECT_ITER {
                let mid = (lo + hi) / 2.0;
                let mid_v = f(mid);
                if mid_v.abs() < EPSILON {
                    lo = mid;
                    hi = mid;
                    break;
                }
                if lo_v.signum() == mid_v.signum() {
                    lo = mid;
                    lo_v = mid_v;
                } else {
                    hi = mid;
                }
            }
            result.push_unique(curve((lo + hi) / 2.0), MERGE_EPS);
        }
        prev_t = t;
        prev_v = v;
    }
    result
}

/// 过滤出落在弧角度范围内的候选
fn filter_on_arc(candidates: Solutions<Point2>, arc: &Arc) -> Solutions<Point2> {
    let degenerate = candidates.is_degenerate();
    let filtered: Solutions<Point2> = candidates
        .into_iter()
        .filter(|p| {
            let angle = (p.y - arc.center.y).atan2(p.x - arc.center.x);
            arc.contains_angle(angle)
        })
        .collect();
    if degenerate && filtered.is_empty() {
        Solutions::degenerate()
    } else {
        filtered
    }
}

/// 过点对圆的切线（0–2 条）
///
/// 点在圆内无切线；点在圆上为一条。
pub fn tangent_lines_from_point(point: &Point2, circle: &Circle) -> Solutions<Line> {
    if circle.radius <= EPSILON {
        return Solutions::degenerate();
    }
    let d = (point - circle.center).norm();
    if d < circle.radius - EPSILON {
        return Solutions::new();
    }
    if (d - circle.radius).abs() < EPSILON {
        // 点在圆上：切线垂直于半径
        let radial = (point - circle.center) / d;
        let t = Vector2::new(-radial.y, radial.x);
        return Solutions::single(Line::new(*point, *point + t * circle.radius));
    }

    // 切点位于圆心→点方向两侧各偏 acos(r/d) 处
    let base = (point.y - circle.center.y).atan2(point.x - circle.center.x);
    let alpha = (circle.radius / d).clamp(-1.0, 1.0).acos();
    let mut result = Solutions::new();
    for sign in [1.0, -1.0] {
        let touch = polar(circle.center, circle.radius, base + sign * alpha);
        result.push(Line::new(*point, touch));
    }
    result
}

/// 两圆的公切线（最多 4 条：2 外 + 2 内）
pub fn tangent_lines_common(c1: &Circle, c2: &Circle) -> Solutions<Line> {
    if c1.radius <= EPSILON || c2.radius <= EPSILON {
        return Solutions::degenerate();
    }
    let d_vec = c2.center - c1.center;
    let d = d_vec.norm();
    if d < EPSILON {
        // 同心圆没有公切线
        return Solutions::degenerate();
    }

    let base = d_vec.y.atan2(d_vec.x);
    let mut result: Solutions<Line> = Solutions::new();

    // 切线单位法向 n 满足 n·(c2-c1)/d = k：
    // 外公切线 k = (r2-r1)/d，切点在两圆同侧；
    // 内公切线 k = -(r1+r2)/d，切点在异侧。
    for (k, inner) in [
        ((c2.radius - c1.radius) / d, false),
        (-(c1.radius + c2.radius) / d, true),
    ] {
        if k.abs() > 1.0 + EPSILON {
            continue;
        }
        let alpha = k.clamp(-1.0, 1.0).acos();
        for sign in [1.0, -1.0] {
            let phi = base + sign * alpha;
            let n = Vector2::new(phi.cos(), phi.sin());
            let p1 = c1.center - n * c1.radius;
            let p2 = if inner {
                c2.center + n * c2.radius
            } else {
                c2.center - n * c2.radius
            };
            let candidate = if (p2 - p1).norm() < MERGE_EPS {
                // 两圆相切：切点重合，沿切向展开一条线
                let t = Vector2::new(-n.y, n.x);
                let len = c1.radius.max(c2.radius);
                Line::new(p1 - t * len, p1 + t * len)
            } else {
                Line::new(p1, p2)
            };
            let dup = result.iter().any(|l| {
                ((l.start - candidate.start).norm() < MERGE_EPS
                    && (l.end - candidate.end).norm() < MERGE_EPS)
                    || ((l.start - candidate.end).norm() < MERGE_EPS
                        && (l.end - candidate.start).norm() < MERGE_EPS)
            });
            if !dup {
                result.push(candidate);
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Point2;

    #[test]
    fn test_line_line_crossing() {
        let l1 = Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0));
        let l2 = Line::new(Point2::new(0.0, 10.0), Point2::new(10.0, 0.0));
        let s = line_line(&l1, &l2, true);
        assert_eq!(s.len(), 1);
        let p = s.first().unwrap();
        assert!((p.x - 5.0).abs() < EPSILON);
        assert!((p.y - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_line_line_parallel_is_degenerate() {
        let l1 = Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0));
        let l2 = Line::new(Point2::new(0.0, 1.0), Point2::new(10.0, 1.0));
        let s = line_line(&l1, &l2, true);
        assert!(s.is_empty());
        assert!(s.is_degenerate());
    }

    #[test]
    fn test_intersect_symmetry() {
        let a = Geometry::Line(Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 10.0)));
        let b = Geometry::Circle(Circle::new(Point2::new(5.0, 5.0), 2.0));
        let s1 = intersect(&a, &b);
        let s2 = intersect(&b, &a);
        assert_eq!(s1.len(), s2.len());
        for (p, q) in s1.iter().zip(s2.iter()) {
            assert!((p - q).norm() < MERGE_EPS);
        }
    }

    #[test]
    fn test_circle_circle_two_points() {
        let c1 = Circle::new(Point2::new(0.0, 0.0), 5.0);
        let c2 = Circle::new(Point2::new(8.0, 0.0), 5.0);
        let s = circle_circle(&c1, &c2);
        assert_eq!(s.len(), 2);
        for p in s.iter() {
            assert!(((p - c1.center).norm() - 5.0).abs() < 1.0e-9);
            assert!(((p - c2.center).norm() - 5.0).abs() < 1.0e-9);
        }
    }

    #[test]
    fn test_circle_circle_tangent() {
        let c1 = Circle::new(Point2::new(0.0, 0.0), 5.0);
        let c2 = Circle::new(Point2::new(10.0, 0.0), 5.0);
        let s = circle_circle(&c1, &c2);
        assert_eq!(s.len(), 1);
        let p = s.first().unwrap();
        assert!((p.x - 5.0).abs() < 1.0e-9);
    }

    #[test]
    fn test_circle_circle_concentric_degenerate() {
        let c1 = Circle::new(Point2::origin(), 5.0);
        let c2 = Circle::new(Point2::origin(), 3.0);
        let s = circle_circle(&c1, &c2);
        assert!(s.is_empty());
        assert!(s.is_degenerate());
    }

    #[test]
    fn test_line_ellipse() {
        let e = Ellipse::new(Point2::origin(), Vector2::new(10.0, 0.0), 0.5);
        let l = Line::new(Point2::new(-20.0, 0.0), Point2::new(20.0, 0.0));
        let s = line_ellipse(&l, &e, true);
        assert_eq!(s.len(), 2);
        for p in s.iter() {
            assert!((p.x.abs() - 10.0).abs() < 1.0e-9);
            assert!(p.y.abs() < 1.0e-9);
        }
    }

    #[test]
    fn test_circle_ellipse() {
        let e = Ellipse::new(Point2::origin(), Vector2::new(10.0, 0.0), 0.5);
        let c = Circle::new(Point2::new(10.0, 0.0), 5.0);
        let s = circle_ellipse(&c, &e);
        assert!(!s.is_empty());
        for p in s.iter() {
            // 交点同时满足两条曲线
            assert!(((p - c.center).norm() - 5.0).abs() < 1.0e-6);
            let u = p.x / 10.0;
            let v = p.y / 5.0;
            assert!((u * u + v * v - 1.0).abs() < 1.0e-6);
        }
    }

    #[test]
    fn test_arc_ellipse_respects_sweep() {
        // 整圆与椭圆交于上下两点，上半圆弧只保留上方那个
        let e = Ellipse::new(Point2::origin(), Vector2::new(10.0, 0.0), 0.5);
        let arc = Arc::new(Point2::new(10.0, 0.0), 5.0, 0.0, std::f64::consts::PI, false);
        let s = intersect(&Geometry::Arc(arc.clone()), &Geometry::Ellipse(e));
        assert_eq!(s.len(), 1);
        let p = s.first().unwrap();
        assert!(p.y > 0.0);
        assert!(((p - arc.center).norm() - 5.0).abs() < 1.0e-6);
        let u = p.x / 10.0;
        let v = p.y / 5.0;
        assert!((u * u + v * v - 1.0).abs() < 1.0e-6);
    }

    #[test]
    fn test_tangent_lines_from_point() {
        let c = Circle::new(Point2::origin(), 5.0);
        let s = tangent_lines_from_point(&Point2::new(10.0, 0.0), &c);
        assert_eq!(s.len(), 2);
        for l in s.iter() {
            // 切点在圆上且切线与半径垂直
            assert!(((l.end - c.center).norm() - 5.0).abs() < 1.0e-9);
            let radial = l.end - c.center;
            let dir = l.end - l.start;
            assert!(radial.dot(&dir).abs() < 1.0e-6);
        }
        // 圆内的点没有切线
        assert!(tangent_lines_from_point(&Point2::new(1.0, 0.0), &c).is_empty());
    }

    #[test]
    fn test_common_tangents_four() {
        let c1 = Circle::new(Point2::new(0.0, 0.0), 3.0);
        let c2 = Circle::new(Point2::new(20.0, 0.0), 3.0);
        let s = tangent_lines_common(&c1, &c2);
        assert_eq!(s.len(), 4);
        for l in s.iter() {
            assert!((l.distance_to_infinite_line(&c1.center) - 3.0).abs() < 1.0e-6);
            assert!((l.distance_to_infinite_line(&c2.center) - 3.0).abs() < 1.0e-6);
        }
    }

    #[test]
    fn test_common_tangents_overlapping() {
        // 相交两圆只有外公切线
        let c1 = Circle::new(Point2::new(0.0, 0.0), 5.0);
        let c2 = Circle::new(Point2::new(6.0, 0.0), 5.0);
        let s = tangent_lines_common(&c1, &c2);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn test_line_arc_respects_sweep() {
        // 上半圆弧只与竖直线在上方相交
        let arc = Arc::new(Point2::origin(), 5.0, 0.0, std::f64::consts::PI, false);
        let l = Line::new(Point2::new(0.0, -10.0), Point2::new(0.0, 10.0));
        let s = line_arc(&l, &arc);
        assert_eq!(s.len(), 1);
        assert!(s.first().unwrap().y > 0.0);
    }
}
