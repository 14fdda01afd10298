//! 椭圆类约束求解
//!
//! - 四点定椭圆（轴对齐二次曲线拟合）
//! - 四线内切椭圆（牛顿线定心 + 切线支持函数的线性方程组）

use super::gauss_solve;
use crate::geometry::{Ellipse, Line};
use crate::intersect::line_line_infinite;
use crate::math::{Point2, Vector2, EPSILON};
use crate::solutions::Solutions;

/// 四点定椭圆
///
/// 拟合轴对齐二次曲线 c0·x² + c1·x + c2·y² + c3·y = 1。
/// 方程组奇异、或拟合结果不是椭圆（系数异号、双曲线/抛物线）
/// 时无法唯一确定，返回退化解集。
pub fn ellipse_through_4_points(points: &[Point2; 4]) -> Solutions<Ellipse> {
    let mut m: Vec<Vec<f64>> = points
        .iter()
        .map(|p| vec![p.x * p.x, p.x, p.y * p.y, p.y, 1.0])
        .collect();

    let x = match gauss_solve(&mut m) {
        Some(x) => x,
        None => return Solutions::degenerate(),
    };
    let (c0, c1, c2, c3) = (x[0], x[1], x[2], x[3]);
    if c0 < EPSILON || c2 < EPSILON {
        return Solutions::degenerate();
    }

    // 配方得中心与半轴
    let center = Point2::new(-c1 / (2.0 * c0), -c3 / (2.0 * c2));
    let k = 1.0 + c1 * c1 / (4.0 * c0) + c3 * c3 / (4.0 * c2);
    if k < EPSILON {
        return Solutions::degenerate();
    }
    let rx = (k / c0).sqrt();
    let ry = (k / c2).sqrt();

    let ellipse = if rx >= ry {
        Ellipse::new(center, Vector2::new(rx, 0.0), ry / rx)
    } else {
        Ellipse::new(center, Vector2::new(0.0, ry), rx / ry)
    };
    Solutions::single(ellipse)
}

/// 四线内切椭圆
///
/// 内切椭圆的中心都落在两条对角线中点的连线（牛顿线）上；
/// 取该线段中点作为中心，使解唯一。切线条件
/// nᵀQn = (d − n·c)² 对 Q 的三个分量是线性的：前三条线解出 Q，
/// 第四条作一致性校验。对边平行（平行四边形）或四线不构成
/// 凸四边形时无法唯一确定。
pub fn ellipse_inscribed_4_lines(lines: &[Line; 4]) -> Solutions<Ellipse> {
    // 顺次相交得四边形顶点
    let mut vertices = [Point2::origin(); 4];
    for i in 0..4 {
        match line_line_infinite(&lines[i], &lines[(i + 1) % 4]).first() {
            Some(p) => vertices[i] = *p,
            None => return Solutions::degenerate(),
        }
    }

    // 对角线中点连线的中点
    let m1 = Point2::new(
        (vertices[0].x + vertices[2].x) / 2.0,
        (vertices[0].y + vertices[2].y) / 2.0,
    );
    let m2 = Point2::new(
        (vertices[1].x + vertices[3].x) / 2.0,
        (vertices[1].y + vertices[3].y) / 2.0,
    );
    let center = Point2::new((m1.x + m2.x) / 2.0, (m1.y + m2.y) / 2.0);

    // 每条切线一行：n.x²·q0 + 2·n.x·n.y·q1 + n.y²·q2 = (d − n·c)²
    let mut rows: Vec<[f64; 4]> = Vec::with_capacity(4);
    for line in lines {
        let dir = line.direction();
        if dir.norm() < EPSILON {
            return Solutions::degenerate();
        }
        let n = Vector2::new(-dir.y, dir.x);
        let d = n.x * line.start.x + n.y * line.start.y;
        let rhs = d - (n.x * center.x + n.y * center.y);
        rows.push([n.x * n.x, 2.0 * n.x * n.y, n.y * n.y, rhs * rhs]);
    }

    let mut m: Vec<Vec<f64>> = rows[..3].iter().map(|r| r.to_vec()).collect();
    let q = match gauss_solve(&mut m) {
        Some(q) => q,
        None => return Solutions::degenerate(),
    };

    // 第四条线的一致性校验
    let predicted = rows[3][0] * q[0] + rows[3][1] * q[1] + rows[3][2] * q[2];
    let scale = rows[3][3].abs().max(1.0);
    if (predicted - rows[3][3]).abs() > 1.0e-6 * scale {
        return Solutions::degenerate();
    }

    // Q 必须正定才是椭圆
    let (q0, q1, q2) = (q[0], q[1], q[2]);
    let det = q0 * q2 - q1 * q1;
    if q0 < EPSILON || det < EPSILON {
        return Solutions::degenerate();
    }

    // 2×2 对称矩阵特征分解：特征值为半轴平方
    let mean = (q0 + q2) / 2.0;
    let diff = (q0 - q2) / 2.0;
    let root = (diff * diff + q1 * q1).sqrt();
    let l_max = mean + root;
    let l_min = mean - root;
    if l_min < EPSILON {
        return Solutions::degenerate();
    }

    let major_dir = if root < EPSILON {
        Vector2::new(1.0, 0.0) // 圆：方向任取
    } else {
        let v1 = Vector2::new(q1, l_max - q0);
        let v2 = Vector2::new(l_max - q2, q1);
        let v = if v1.norm() >= v2.norm() { v1 } else { v2 };
        v / v.norm()
    };

    let a = l_max.sqrt();
    let b = l_min.sqrt();
    Solutions::single(Ellipse::new(center, major_dir * a, b / a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_through_4_points_axis_aligned() {
        // x²/25 + y²/9 = 1 上的四个点
        let s = ellipse_through_4_points(&[
            Point2::new(5.0, 0.0),
            Point2::new(-5.0, 0.0),
            Point2::new(0.0, 3.0),
            Point2::new(0.0, -3.0),
        ]);
        assert_eq!(s.len(), 1);
        let e = s.first().unwrap();
        assert!(e.center.coords.norm() < 1.0e-9);
        assert!((e.major_radius() - 5.0).abs() < 1.0e-9);
        assert!((e.minor_radius() - 3.0).abs() < 1.0e-9);
    }

    #[test]
    fn test_through_4_points_rank_deficient() {
        // 两点重合，无法唯一确定
        let s = ellipse_through_4_points(&[
            Point2::new(5.0, 0.0),
            Point2::new(5.0, 0.0),
            Point2::new(0.0, 3.0),
            Point2::new(0.0, -3.0),
        ]);
        assert!(s.is_degenerate());
    }

    #[test]
    fn test_through_4_points_hyperbola_rejected() {
        // 拟合出的二次曲线是双曲线
        let s = ellipse_through_4_points(&[
            Point2::new(1.0, 0.0),
            Point2::new(-1.0, 0.0),
            Point2::new(2.0, 3.0),
            Point2::new(2.0, -3.0),
        ]);
        assert!(s.is_degenerate());
    }

    fn support_residual(e: &Ellipse, line: &Line) -> f64 {
        // 切线条件：|d − n·c| = sqrt(nᵀQn)
        let dir = line.direction();
        let n = Vector2::new(-dir.y, dir.x);
        let d = n.x * line.start.x + n.y * line.start.y;
        let offset = (d - (n.x * e.center.x + n.y * e.center.y)).abs();
        let major = e.major_axis;
        let minor = e.minor_axis();
        let support = ((n.dot(&major)).powi(2) + (n.dot(&minor)).powi(2)).sqrt();
        (offset - support).abs()
    }

    #[test]
    fn test_inscribed_4_lines_quadrilateral() {
        // 一般凸四边形 (0,0) (10,0) (8,6) (2,5)
        let lines = [
            Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)),
            Line::new(Point2::new(10.0, 0.0), Point2::new(8.0, 6.0)),
            Line::new(Point2::new(8.0, 6.0), Point2::new(2.0, 5.0)),
            Line::new(Point2::new(2.0, 5.0), Point2::new(0.0, 0.0)),
        ];
        let s = ellipse_inscribed_4_lines(&lines);
        assert_eq!(s.len(), 1);
        let e = s.first().unwrap();
        assert!(e.ratio > 0.0 && e.ratio <= 1.0);
        for line in &lines {
            assert!(support_residual(e, line) < 1.0e-6, "not tangent to {:?}", line);
        }
    }

    #[test]
    fn test_inscribed_parallelogram_not_unique() {
        // 平行四边形：内切椭圆是单参数族，无法唯一确定
        let lines = [
            Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)),
            Line::new(Point2::new(10.0, 0.0), Point2::new(10.0, 8.0)),
            Line::new(Point2::new(10.0, 8.0), Point2::new(0.0, 8.0)),
            Line::new(Point2::new(0.0, 8.0), Point2::new(0.0, 0.0)),
        ];
        let s = ellipse_inscribed_4_lines(&lines);
        assert!(s.is_degenerate());
    }

    #[test]
    fn test_inscribed_parallel_pair_degenerate() {
        let lines = [
            Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)),
            Line::new(Point2::new(0.0, 1.0), Point2::new(10.0, 1.0)),
            Line::new(Point2::new(0.0, 0.0), Point2::new(0.0, 10.0)),
            Line::new(Point2::new(5.0, 0.0), Point2::new(0.0, 5.0)),
        ];
        let s = ellipse_inscribed_4_lines(&lines);
        assert!(s.is_degenerate());
    }
}
