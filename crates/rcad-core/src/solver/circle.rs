//! 圆类约束求解
//!
//! - 三点定圆
//! - 双切 + 半径（偏移轨迹求交）
//! - 三切（阿波罗尼乌斯问题，代数解法，符号组合枚举）
//! - 三线内切圆

use super::{gauss_solve, MERGE_EPS, TANGENT_EPS};
use crate::geometry::{Arc, Circle, Line};
use crate::intersect::{circle_circle, line_circle, line_line_infinite};
use crate::math::{Point2, Vector2, EPSILON};
use crate::solutions::Solutions;

/// 相切目标：直线按无限直线处理，圆弧按整圆处理
#[derive(Debug, Clone)]
pub enum TangencyTarget {
    Line(Line),
    Circle(Circle),
}

impl TangencyTarget {
    pub fn from_arc(arc: &Arc) -> Self {
        TangencyTarget::Circle(arc.to_circle())
    }

    /// 目标到给定圆心的距离
    fn distance_to_center(&self, center: &Point2) -> f64 {
        match self {
            TangencyTarget::Line(l) => l.distance_to_infinite_line(center),
            TangencyTarget::Circle(c) => (center - c.center).norm(),
        }
    }

    /// 半径为 r、圆心在 center 的圆是否与目标相切
    fn is_tangent(&self, center: &Point2, r: f64) -> bool {
        let d = self.distance_to_center(center);
        match self {
            TangencyTarget::Line(_) => (d - r).abs() < TANGENT_EPS,
            TangencyTarget::Circle(c) => {
                // 外切或内切
                (d - (c.radius + r)).abs() < TANGENT_EPS
                    || (d - (c.radius - r).abs()).abs() < TANGENT_EPS
            }
        }
    }
}

/// 三点定圆
///
/// 共线输入返回带退化标记的空解集。
pub fn circle_through_3_points(p1: Point2, p2: Point2, p3: Point2) -> Solutions<Circle> {
    let d = 2.0 * (p1.x * (p2.y - p3.y) + p2.x * (p3.y - p1.y) + p3.x * (p1.y - p2.y));
    // 行列式按输入尺度归一，避免大坐标下误判
    let scale = (p2 - p1).norm().max((p3 - p1).norm()).max(1.0);
    if d.abs() < EPSILON * scale * scale {
        return Solutions::degenerate();
    }

    let sq1 = p1.x * p1.x + p1.y * p1.y;
    let sq2 = p2.x * p2.x + p2.y * p2.y;
    let sq3 = p3.x * p3.x + p3.y * p3.y;
    let cx = (sq1 * (p2.y - p3.y) + sq2 * (p3.y - p1.y) + sq3 * (p1.y - p2.y)) / d;
    let cy = (sq1 * (p3.x - p2.x) + sq2 * (p1.x - p3.x) + sq3 * (p2.x - p1.x)) / d;

    let center = Point2::new(cx, cy);
    Solutions::single(Circle::new(center, (p1 - center).norm()))
}

/// 双切 + 半径
///
/// 圆心轨迹 = 每个目标向两侧偏移 radius 的曲线，两组轨迹两两求交。
/// 候选去重后按到 `reference` 的距离升序；无参考点时按圆心字典序，
/// 保证多解枚举次序确定。
pub fn circle_tangent_2_radius(
    a: &TangencyTarget,
    b: &TangencyTarget,
    radius: f64,
    reference: Option<&Point2>,
) -> Solutions<Circle> {
    if radius < EPSILON {
        return Solutions::degenerate();
    }

    let loci_a = offset_loci(a, radius);
    let loci_b = offset_loci(b, radius);

    let mut centers: Solutions<Point2> = Solutions::new();
    for la in &loci_a {
        for lb in &loci_b {
            for p in intersect_loci(la, lb) {
                if a.is_tangent(&p, radius) && b.is_tangent(&p, radius) {
                    centers.push_unique(p, MERGE_EPS);
                }
            }
        }
    }

    match reference {
        Some(p) => centers.sort_by_distance(p),
        None => centers.sort_lexicographic(),
    }
    centers
        .into_iter()
        .map(|c| Circle::new(c, radius))
        .collect()
}

/// 圆心轨迹：目标向两侧偏移 r
enum Locus {
    Line(Line),
    Circle(Circle),
    /// 半径差恰为零时轨迹退化为一个点
    Point(Point2),
}

fn offset_loci(target: &TangencyTarget, r: f64) -> Vec<Locus> {
    match target {
        TangencyTarget::Line(l) => {
            let dir = l.direction();
            if dir.norm() < EPSILON {
                return Vec::new();
            }
            let n = Vector2::new(-dir.y, dir.x);
            vec![
                Locus::Line(Line::new(l.start + n * r, l.end + n * r)),
                Locus::Line(Line::new(l.start - n * r, l.end - n * r)),
            ]
        }
        TangencyTarget::Circle(c) => {
            let mut out = vec![Locus::Circle(Circle::new(c.center, c.radius + r))];
            let inner = (c.radius - r).abs();
            if inner < EPSILON {
                out.push(Locus::Point(c.center));
            } else {
                out.push(Locus::Circle(Circle::new(c.center, inner)));
            }
            out
        }
    }
}

fn intersect_loci(a: &Locus, b: &Locus) -> Solutions<Point2> {
    match (a, b) {
        (Locus::Line(l1), Locus::Line(l2)) => line_line_infinite(l1, l2),
        (Locus::Line(l), Locus::Circle(c)) | (Locus::Circle(c), Locus::Line(l)) => {
            line_circle(l, c, false)
        }
        (Locus::Circle(c1), Locus::Circle(c2)) => circle_circle(c1, c2),
        (Locus::Point(p), other) | (other, Locus::Point(p)) => {
            let on = match other {
                Locus::Line(l) => l.distance_to_infinite_line(p) < MERGE_EPS,
                Locus::Circle(c) => ((p - c.center).norm() - c.radius).abs() < MERGE_EPS,
                Locus::Point(q) => (p - q).norm() < MERGE_EPS,
            };
            if on {
                Solutions::single(*p)
            } else {
                Solutions::new()
            }
        }
    }
}

/// 三切圆（阿波罗尼乌斯问题）
///
/// 对 8 种内外切符号组合逐一代数求解：直线约束是 (cx, cy, r)
/// 的线性方程；圆约束两两相减消去二次项，保留一个基准圆
/// 代入得到关于 r 的一元二次方程。每个组合的运算量固定，
/// 整体无迭代循环。候选经切验与去重后按圆心字典序输出。
pub fn circle_tangent_3(
    t1: &TangencyTarget,
    t2: &TangencyTarget,
    t3: &TangencyTarget,
) -> Solutions<Circle> {
    let targets = [t1, t2, t3];
    let mut found: Vec<Circle> = Vec::new();

    for combo in 0..8u8 {
        let signs = [
            if combo & 1 != 0 { 1.0 } else { -1.0 },
            if combo & 2 != 0 { 1.0 } else { -1.0 },
            if combo & 4 != 0 { 1.0 } else { -1.0 },
        ];
        for cand in solve_sign_combo(&targets, &signs) {
            if cand.radius < EPSILON {
                continue;
            }
            if !targets.iter().all(|t| t.is_tangent(&cand.center, cand.radius)) {
                continue;
            }
            let dup = found.iter().any(|c| {
                (c.center - cand.center).norm() < MERGE_EPS
                    && (c.radius - cand.radius).abs() < MERGE_EPS
            });
            if !dup {
                found.push(cand);
            }
        }
    }

    if found.is_empty() {
        tracing::debug!("apollonius: no sign combination produced a tangent circle");
    }
    found.sort_by(|a, b| {
        if (a.center.x - b.center.x).abs() > EPSILON {
            a.center
                .x
                .partial_cmp(&b.center.x)
                .unwrap_or(std::cmp::Ordering::Equal)
        } else {
            a.center
                .y
                .partial_cmp(&b.center.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        }
    });
    Solutions::from_vec(found)
}

/// 单个符号组合的代数解
///
/// 直线 i（单位法线 n，截距 d = n·p）: n·c - s_i·r = d
/// 圆 i: |c - c_i|² = (r_i + s_i·r)²
fn solve_sign_combo(targets: &[&TangencyTarget; 3], signs: &[f64; 3]) -> Vec<Circle> {
    let base = targets
        .iter()
        .position(|t| matches!(t, TangencyTarget::Circle(_)));

    match base {
        // 三直线：线性 3×3
        None => {
            let mut m: Vec<Vec<f64>> = Vec::with_capacity(3);
            for (t, s) in targets.iter().zip(signs) {
                if let TangencyTarget::Line(l) = t {
                    let dir = l.direction();
                    if dir.norm() < EPSILON {
                        return Vec::new();
                    }
                    let n = Vector2::new(-dir.y, dir.x);
                    let d = n.x * l.start.x + n.y * l.start.y;
                    m.push(vec![n.x, n.y, -s, d]);
                }
            }
            match gauss_solve(&mut m) {
                Some(x) if x[2] > EPSILON => {
                    vec![Circle::new(Point2::new(x[0], x[1]), x[2])]
                }
                _ => Vec::new(),
            }
        }
        // 至少一个圆：基准圆代入，其余约束线性化
        Some(b) => {
            let (bc, bs) = match targets[b] {
                TangencyTarget::Circle(c) => (c, signs[b]),
                TangencyTarget::Line(_) => return Vec::new(),
            };

            // 两个线性方程 row·(cx, cy, r) = rhs
            let mut rows: Vec<[f64; 4]> = Vec::with_capacity(2);
            for (i, (t, s)) in targets.iter().zip(signs).enumerate() {
                if i == b {
                    continue;
                }
                match t {
                    TangencyTarget::Line(l) => {
                        let dir = l.direction();
                        if dir.norm() < EPSILON {
                            return Vec::new();
                        }
                        let n = Vector2::new(-dir.y, dir.x);
                        let d = n.x * l.start.x + n.y * l.start.y;
                        rows.push([n.x, n.y, -s, d]);
                    }
                    TangencyTarget::Circle(c) => {
                        // 与基准圆方程相减，消去 c·c 与 r²
                        let dx = c.center.x - bc.center.x;
                        let dy = c.center.y - bc.center.y;
                        let dr = c.radius * s - bc.radius * bs;
                        let rhs = (c.center.coords.norm_squared()
                            - bc.center.coords.norm_squared()
                            - c.radius * c.radius
                            + bc.radius * bc.radius)
                            / 2.0;
                        rows.push([dx, dy, dr, rhs]);
                    }
                }
            }

            // 在 (cx, cy, r) 的三个 2×2 子式中取最稳定的一个：
            // 解出两个未知量，余下那个作为自由参数。圆心共线时
            // (cx, cy) 子式奇异，但 (cx, r) 或 (cy, r) 仍然可解。
            let minor = |i: usize, j: usize| rows[0][i] * rows[1][j] - rows[0][j] * rows[1][i];
            let (i, j, k) = match [(0usize, 1usize, 2usize), (0, 2, 1), (1, 2, 0)]
                .into_iter()
                .max_by(|a, b| {
                    minor(a.0, a.1)
                        .abs()
                        .partial_cmp(&minor(b.0, b.1).abs())
                        .unwrap_or(std::cmp::Ordering::Equal)
                }) {
                Some(p) => p,
                None => return Vec::new(),
            };
            let det = minor(i, j);
            // 两行线性相关：该组合无定解
            if det.abs() < EPSILON {
                return Vec::new();
            }

            // x_i = ui + vi·t, x_j = uj + vj·t, 自由变量 x_k = t
            let ui = (rows[0][3] * rows[1][j] - rows[0][j] * rows[1][3]) / det;
            let uj = (rows[0][i] * rows[1][3] - rows[0][3] * rows[1][i]) / det;
            let vi = (rows[0][j] * rows[1][k] - rows[0][k] * rows[1][j]) / det;
            let vj = (rows[0][k] * rows[1][i] - rows[0][i] * rows[1][k]) / det;

            let mut affine = [[0.0f64; 2]; 3];
            affine[k] = [0.0, 1.0];
            affine[i] = [ui, vi];
            affine[j] = [uj, vj];
            let [cx0, cx1] = affine[0];
            let [cy0, cy1] = affine[1];
            let [r0, r1] = affine[2];

            // 代入基准圆 |c - c_b|² = (r_b + s_b·r)² 得自由参数的二次方程
            let x0 = cx0 - bc.center.x;
            let y0 = cy0 - bc.center.y;
            let rr0 = bc.radius + bs * r0;
            let rr1 = bs * r1;
            let qa = cx1 * cx1 + cy1 * cy1 - rr1 * rr1;
            let qb = 2.0 * (x0 * cx1 + y0 * cy1 - rr0 * rr1);
            let qc = x0 * x0 + y0 * y0 - rr0 * rr0;

            quadratic_roots(qa, qb, qc)
                .into_iter()
                .map(|t| (r0 + r1 * t, Point2::new(cx0 + cx1 * t, cy0 + cy1 * t)))
                .filter(|&(r, _)| r > EPSILON)
                .map(|(r, center)| Circle::new(center, r))
                .collect()
        }
    }
}

fn quadratic_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a.abs() < EPSILON {
        if b.abs() < EPSILON {
            return Vec::new();
        }
        return vec![-c / b];
    }
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return Vec::new();
    }
    let sq = disc.sqrt();
    vec![(-b + sq) / (2.0 * a), (-b - sq) / (2.0 * a)]
}

/// 三线内切圆（三角形内心）
///
/// 三线两两相交构成三角形；任意两线平行则退化。
pub fn circle_inscribed_3_lines(l1: &Line, l2: &Line, l3: &Line) -> Solutions<Circle> {
    let v_a = match line_line_infinite(l2, l3).first().copied() {
        Some(p) => p,
        None => return Solutions::degenerate(),
    };
    let v_b = match line_line_infinite(l3, l1).first().copied() {
        Some(p) => p,
        None => return Solutions::degenerate(),
    };
    let v_c = match line_line_infinite(l1, l2).first().copied() {
        Some(p) => p,
        None => return Solutions::degenerate(),
    };

    // 内心 = 按对边长度加权的顶点平均
    let a = (v_b - v_c).norm();
    let b = (v_c - v_a).norm();
    let c = (v_a - v_b).norm();
    let perimeter = a + b + c;
    if perimeter < EPSILON {
        return Solutions::degenerate();
    }
    let center = Point2::new(
        (a * v_a.x + b * v_b.x + c * v_c.x) / perimeter,
        (a * v_a.y + b * v_b.y + c * v_c.y) / perimeter,
    );
    let radius = l1.distance_to_infinite_line(&center);
    if radius < EPSILON {
        return Solutions::degenerate();
    }
    Solutions::single(Circle::new(center, radius))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> Line {
        Line::new(Point2::new(x1, y1), Point2::new(x2, y2))
    }

    #[test]
    fn test_through_3_points() {
        let s = circle_through_3_points(
            Point2::new(10.0, 0.0),
            Point2::new(0.0, 10.0),
            Point2::new(-10.0, 0.0),
        );
        assert_eq!(s.len(), 1);
        let c = s.first().unwrap();
        assert!((c.radius - 10.0).abs() < 1.0e-9);
        assert!(c.center.coords.norm() < 1.0e-9);
        // 三点都在圆上
        for p in [Point2::new(10.0, 0.0), Point2::new(0.0, 10.0)] {
            assert!(((p - c.center).norm() - c.radius).abs() < 1.0e-9);
        }
    }

    #[test]
    fn test_through_3_collinear_points_degenerate() {
        let s = circle_through_3_points(
            Point2::new(0.0, 0.0),
            Point2::new(5.0, 0.0),
            Point2::new(10.0, 0.0),
        );
        assert!(s.is_empty());
        assert!(s.is_degenerate());
    }

    #[test]
    fn test_tangent_2_circles_radius() {
        // 两个半径 3 的圆在 (0,0) 和 (10,0)，目标半径 2
        let a = TangencyTarget::Circle(Circle::new(Point2::new(0.0, 0.0), 3.0));
        let b = TangencyTarget::Circle(Circle::new(Point2::new(10.0, 0.0), 3.0));
        let s = circle_tangent_2_radius(&a, &b, 2.0, None);
        assert!(!s.is_empty());
        for c in s.iter() {
            let d1 = c.center.coords.norm();
            let d2 = (c.center - Point2::new(10.0, 0.0)).norm();
            // 每个解与两个输入圆都相切（外切或内切）
            assert!(
                (d1 - 5.0).abs() < 1.0e-6 || (d1 - 1.0).abs() < 1.0e-6,
                "d1 = {}",
                d1
            );
            assert!((d2 - 5.0).abs() < 1.0e-6 || (d2 - 1.0).abs() < 1.0e-6);
        }
    }

    #[test]
    fn test_tangent_2_radius_zero_radius_degenerate() {
        let a = TangencyTarget::Circle(Circle::new(Point2::origin(), 3.0));
        let b = TangencyTarget::Circle(Circle::new(Point2::new(10.0, 0.0), 3.0));
        let s = circle_tangent_2_radius(&a, &b, 0.0, None);
        assert!(s.is_empty());
        assert!(s.is_degenerate());
    }

    #[test]
    fn test_tangent_2_radius_ordering_deterministic() {
        let a = TangencyTarget::Line(line(0.0, 0.0, 10.0, 0.0));
        let b = TangencyTarget::Line(line(0.0, 0.0, 0.0, 10.0));
        let s1 = circle_tangent_2_radius(&a, &b, 2.0, None);
        let s2 = circle_tangent_2_radius(&b, &a, 2.0, None);
        assert_eq!(s1.len(), 4);
        for (c1, c2) in s1.iter().zip(s2.iter()) {
            assert!((c1.center - c2.center).norm() < 1.0e-9);
        }
        // 字典序：最小 x 在前
        assert!((s1.first().unwrap().center.x + 2.0).abs() < 1.0e-9);
    }

    #[test]
    fn test_tangent_2_radius_reference_picks_nearest_first() {
        let a = TangencyTarget::Line(line(0.0, 0.0, 10.0, 0.0));
        let b = TangencyTarget::Line(line(0.0, 0.0, 0.0, 10.0));
        let reference = Point2::new(3.0, 3.0);
        let s = circle_tangent_2_radius(&a, &b, 2.0, Some(&reference));
        let first = s.first().unwrap();
        assert!((first.center.x - 2.0).abs() < 1.0e-9);
        assert!((first.center.y - 2.0).abs() < 1.0e-9);
    }

    #[test]
    fn test_apollonius_three_lines() {
        // 三角形 (0,0) (10,0) (0,10)：内切圆 + 三个旁切圆
        let l1 = line(0.0, 0.0, 10.0, 0.0);
        let l2 = line(0.0, 0.0, 0.0, 10.0);
        let l3 = line(10.0, 0.0, 0.0, 10.0);
        let s = circle_tangent_3(
            &TangencyTarget::Line(l1.clone()),
            &TangencyTarget::Line(l2.clone()),
            &TangencyTarget::Line(l3.clone()),
        );
        assert_eq!(s.len(), 4);
        for c in s.iter() {
            assert!((l1.distance_to_infinite_line(&c.center) - c.radius).abs() < 1.0e-6);
            assert!((l2.distance_to_infinite_line(&c.center) - c.radius).abs() < 1.0e-6);
            assert!((l3.distance_to_infinite_line(&c.center) - c.radius).abs() < 1.0e-6);
        }
    }

    #[test]
    fn test_apollonius_three_circles() {
        // 对称摆放的三个等圆
        let c1 = Circle::new(Point2::new(0.0, 0.0), 1.0);
        let c2 = Circle::new(Point2::new(4.0, 0.0), 1.0);
        let c3 = Circle::new(Point2::new(2.0, 3.0), 1.0);
        let s = circle_tangent_3(
            &TangencyTarget::Circle(c1.clone()),
            &TangencyTarget::Circle(c2.clone()),
            &TangencyTarget::Circle(c3.clone()),
        );
        assert!(!s.is_empty());
        for cand in s.iter() {
            for target in [&c1, &c2, &c3] {
                let d = (cand.center - target.center).norm();
                let ext = (d - (target.radius + cand.radius)).abs();
                let int = (d - (target.radius - cand.radius).abs()).abs();
                assert!(ext < 1.0e-6 || int < 1.0e-6);
            }
        }
    }

    #[test]
    fn test_apollonius_collinear_circle_centers() {
        // 圆心共线的三个等圆：(cx, cy) 子式奇异，解仍然存在
        let c1 = Circle::new(Point2::new(0.0, 0.0), 1.0);
        let c2 = Circle::new(Point2::new(4.0, 0.0), 1.0);
        let c3 = Circle::new(Point2::new(8.0, 0.0), 1.0);
        let s = circle_tangent_3(
            &TangencyTarget::Circle(c1.clone()),
            &TangencyTarget::Circle(c2.clone()),
            &TangencyTarget::Circle(c3.clone()),
        );
        assert!(!s.is_empty());
        // 对称解之一：圆心 (4,3)、半径 4（外切两端、内切中间）
        assert!(s.iter().any(|c| {
            (c.center - Point2::new(4.0, 3.0)).norm() < 1.0e-6 && (c.radius - 4.0).abs() < 1.0e-6
        }));
        for cand in s.iter() {
            for target in [&c1, &c2, &c3] {
                let d = (cand.center - target.center).norm();
                let ext = (d - (target.radius + cand.radius)).abs();
                let int = (d - (target.radius - cand.radius).abs()).abs();
                assert!(ext < 1.0e-6 || int < 1.0e-6);
            }
        }
    }

    #[test]
    fn test_apollonius_concentric_circles_empty() {
        let s = circle_tangent_3(
            &TangencyTarget::Circle(Circle::new(Point2::origin(), 1.0)),
            &TangencyTarget::Circle(Circle::new(Point2::origin(), 2.0)),
            &TangencyTarget::Circle(Circle::new(Point2::origin(), 4.0)),
        );
        assert!(s.is_empty());
    }

    #[test]
    fn test_inscribed_3_lines() {
        // 直角三角形 (0,0) (6,0) (0,8)：内切圆半径 (6+8-10)/2 = 2
        let s = circle_inscribed_3_lines(
            &line(0.0, 0.0, 6.0, 0.0),
            &line(0.0, 0.0, 0.0, 8.0),
            &line(6.0, 0.0, 0.0, 8.0),
        );
        assert_eq!(s.len(), 1);
        let c = s.first().unwrap();
        assert!((c.radius - 2.0).abs() < 1.0e-9);
        assert!((c.center.x - 2.0).abs() < 1.0e-9);
        assert!((c.center.y - 2.0).abs() < 1.0e-9);
    }

    #[test]
    fn test_inscribed_parallel_lines_degenerate() {
        let s = circle_inscribed_3_lines(
            &line(0.0, 0.0, 10.0, 0.0),
            &line(0.0, 5.0, 10.0, 5.0),
            &line(0.0, 0.0, 0.0, 10.0),
        );
        assert!(s.is_degenerate());
    }
}
