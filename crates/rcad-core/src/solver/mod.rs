//! 约束求解器
//!
//! 每个求解器都是纯函数：输入图元与约束，输出 `Solutions`。
//! 无解、退化输入一律以空解集表达，从不 panic；
//! 迭代类求解器都有固定的迭代上限。

pub mod bisector;
pub mod circle;
pub mod ellipse;
pub mod offset;

pub use bisector::bisector_lines;
pub use circle::{
    circle_inscribed_3_lines, circle_tangent_2_radius, circle_tangent_3, circle_through_3_points,
    TangencyTarget,
};
pub use ellipse::{ellipse_inscribed_4_lines, ellipse_through_4_points};
pub use offset::offset_geometry;

use crate::geometry::Circle;
use crate::math::{Point2, EPSILON};
use crate::solutions::Solutions;

/// 候选解去重容差
pub const MERGE_EPS: f64 = 1.0e-6;

/// 切点/切线验证容差
pub const TANGENT_EPS: f64 = 1.0e-6;

/// 类型化约束
///
/// 求解器消费一组有序约束；不被支持的组合返回空解集。
#[derive(Debug, Clone)]
pub enum Constraint {
    ThroughPoint(Point2),
    CenterAt(Point2),
    Radius(f64),
    Tangent(TangencyTarget),
}

/// 圆约束求解入口：按约束组合分派到具体算法
///
/// 支持的组合：
/// - 3×ThroughPoint
/// - CenterAt + ThroughPoint / CenterAt + Radius
/// - 2×Tangent + Radius
/// - 3×Tangent（阿波罗尼乌斯问题）
pub fn solve_circle(constraints: &[Constraint]) -> Solutions<Circle> {
    let mut points: Vec<Point2> = Vec::new();
    let mut tangents: Vec<TangencyTarget> = Vec::new();
    let mut center: Option<Point2> = None;
    let mut radius: Option<f64> = None;

    for c in constraints {
        match c {
            Constraint::ThroughPoint(p) => points.push(*p),
            Constraint::Tangent(t) => tangents.push(t.clone()),
            Constraint::CenterAt(p) => center = Some(*p),
            Constraint::Radius(r) => radius = Some(*r),
        }
    }

    match (points.len(), tangents.len(), center, radius) {
        (3, 0, None, None) => circle_through_3_points(points[0], points[1], points[2]),
        (1, 0, Some(c), None) => {
            let r = (points[0] - c).norm();
            if r < EPSILON {
                Solutions::degenerate()
            } else {
                Solutions::single(Circle::new(c, r))
            }
        }
        (0, 0, Some(c), Some(r)) => {
            if r < EPSILON {
                Solutions::degenerate()
            } else {
                Solutions::single(Circle::new(c, r))
            }
        }
        (0, 2, None, Some(r)) => circle_tangent_2_radius(&tangents[0], &tangents[1], r, None),
        (0, 3, None, None) => circle_tangent_3(&tangents[0], &tangents[1], &tangents[2]),
        (p, t, _, _) => {
            tracing::debug!(points = p, tangents = t, "unsupported constraint combination");
            Solutions::new()
        }
    }
}

/// 高斯消元解 n×n 线性方程组（增广矩阵，带部分主元）
///
/// 奇异矩阵返回 None。
pub(crate) fn gauss_solve(m: &mut [Vec<f64>]) -> Option<Vec<f64>> {
    let n = m.len();
    for col in 0..n {
        let pivot_row = (col..n).max_by(|&a, &b| {
            m[a][col]
                .abs()
                .partial_cmp(&m[b][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if m[pivot_row][col].abs() < EPSILON {
            return None;
        }
        m.swap(col, pivot_row);

        let pivot = m[col][col];
        for row in (col + 1)..n {
            let factor = m[row][col] / pivot;
            for k in col..=n {
                m[row][k] -= factor * m[col][k];
            }
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut acc = m[row][n];
        for k in (row + 1)..n {
            acc -= m[row][k] * x[k];
        }
        x[row] = acc / m[row][row];
    }
    Some(x)
}
