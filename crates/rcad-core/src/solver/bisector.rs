//! 角平分线求解

use crate::geometry::Line;
use crate::intersect::line_line_infinite;
use crate::math::{Point2, Vector2, EPSILON};
use crate::solutions::Solutions;

/// 两直线的角平分线
///
/// 相交时给出从交点出发、给定长度的两条互相垂直的平分线；
/// 平行不重合时给出两线正中间的一条平行线；重合或非正长度
/// 返回退化解集。输出按方向角（模 π）升序，保证次序确定。
pub fn bisector_lines(l1: &Line, l2: &Line, length: f64) -> Solutions<Line> {
    if length < EPSILON {
        return Solutions::degenerate();
    }
    let d1 = l1.direction();
    let d2 = l2.direction();
    if d1.norm() < EPSILON || d2.norm() < EPSILON {
        return Solutions::degenerate();
    }

    let intersection = match line_line_infinite(l1, l2).first().copied() {
        Some(p) => p,
        None => return parallel_midline(l1, l2, &d1, length),
    };

    // 方向和给出一条平分线；方向恰好相反时退化为垂线
    let sum = d1 + d2;
    let b1 = if sum.norm() < EPSILON {
        Vector2::new(-d1.y, d1.x)
    } else {
        sum / sum.norm()
    };
    let b2 = Vector2::new(-b1.y, b1.x);

    let mut dirs = [b1, b2];
    dirs.sort_by(|a, b| {
        let angle = |v: &Vector2| v.y.atan2(v.x).rem_euclid(std::f64::consts::PI);
        angle(a)
            .partial_cmp(&angle(b))
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    dirs.iter()
        .map(|dir| Line::new(intersection, intersection + dir * length))
        .collect()
}

/// 平行线的中线：锚在两线正中间，沿 l1 方向取给定长度
///
/// 两线重合时中线与输入无法区分，按退化处理。
fn parallel_midline(l1: &Line, l2: &Line, d1: &Vector2, length: f64) -> Solutions<Line> {
    let m1 = l1.midpoint();
    let foot = l2.nearest_point(&m1, false);
    if (foot - m1).norm() < EPSILON {
        return Solutions::degenerate();
    }
    let anchor = Point2::new((m1.x + foot.x) / 2.0, (m1.y + foot.y) / 2.0);
    let dir = d1 / d1.norm();
    Solutions::single(Line::new(anchor, anchor + dir * length))
}
