//! 等距偏移求解
//!
//! 对基准图元按指定侧与间距生成 N 份平行副本。多段线逐段偏移，
//! 相邻段延伸求交完成尖角修剪；弧段偏移保持圆心与扫掠方向，
//! 仅改变半径。

use crate::geometry::{Arc, Circle, Geometry, Line, Polyline, PolylineVertex};
use crate::intersect::{circle_circle, line_circle, line_line_infinite};
use crate::math::{normalize_angle, Point2, Vector2, EPSILON};
use crate::solutions::Solutions;

/// 偏移图元
///
/// `toward` 决定偏移方向侧，`count` 为副本数量。圆/弧向内
/// 偏移到半径耗尽时提前截断。椭圆与样条的等距线不再是同类
/// 曲线，按退化处理。
pub fn offset_geometry(
    geometry: &Geometry,
    distance: f64,
    toward: &Point2,
    count: usize,
) -> Solutions<Geometry> {
    if distance < EPSILON || count == 0 {
        return Solutions::degenerate();
    }

    match geometry {
        Geometry::Line(l) => (1..=count)
            .map(|k| Geometry::Line(l.offset_by(distance * k as f64, toward)))
            .collect(),
        Geometry::Circle(c) => {
            let outward = (toward - c.center).norm() > c.radius;
            let mut out = Solutions::new();
            for k in 1..=count {
                let shift = distance * k as f64;
                let r = if outward {
                    c.radius + shift
                } else {
                    c.radius - shift
                };
                if r < EPSILON {
                    break;
                }
                out.push(Geometry::Circle(Circle::new(c.center, r)));
            }
            out
        }
        Geometry::Arc(a) => {
            let left = arc_side_is_left(a, toward);
            let mut out = Solutions::new();
            for k in 1..=count {
                match offset_arc(a, distance * k as f64, left) {
                    Some(arc) => out.push(Geometry::Arc(arc)),
                    None => break,
                }
            }
            out
        }
        Geometry::Polyline(pl) => {
            let mut out = Solutions::new();
            for k in 1..=count {
                match offset_polyline(pl, distance * k as f64, toward) {
                    Some(p) => out.push(Geometry::Polyline(p)),
                    None => break,
                }
            }
            if out.is_empty() {
                Solutions::degenerate()
            } else {
                out
            }
        }
        _ => Solutions::degenerate(),
    }
}

/// `toward` 在弧行进方向的左侧？
///
/// 逆时针弧的圆心在左侧，顺时针在右侧。
fn arc_side_is_left(arc: &Arc, toward: &Point2) -> bool {
    let inside = (toward - arc.center).norm() < arc.radius;
    inside != arc.reversed
}

/// 弧沿法向偏移：向圆心侧缩小半径，背离圆心侧放大
fn offset_arc(arc: &Arc, distance: f64, left: bool) -> Option<Arc> {
    let r = if left != arc.reversed {
        arc.radius - distance
    } else {
        arc.radius + distance
    };
    if r < EPSILON {
        return None;
    }
    Some(Arc::new(
        arc.center,
        r,
        arc.start_angle,
        arc.end_angle,
        arc.reversed,
    ))
}

/// 多段线整体偏移
///
/// 偏移侧由离 `toward` 最近的段决定并沿整条线保持一致。
fn offset_polyline(pl: &Polyline, distance: f64, toward: &Point2) -> Option<Polyline> {
    let segments = pl.segments();
    if segments.is_empty() {
        return None;
    }

    // 最近段决定左右侧
    let nearest = segments
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            a.distance_to_point(toward)
                .partial_cmp(&b.distance_to_point(toward))
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)?;
    let left = match &segments[nearest] {
        Geometry::Line(l) => l.side_of(toward) >= 0.0,
        Geometry::Arc(a) => arc_side_is_left(a, toward),
        _ => return None,
    };

    // 逐段偏移
    let mut offset_segs: Vec<Geometry> = Vec::with_capacity(segments.len());
    for seg in &segments {
        match seg {
            Geometry::Line(l) => {
                let dir = l.direction();
                if dir.norm() < EPSILON {
                    return None;
                }
                let normal = Vector2::new(-dir.y, dir.x);
                let shift = normal * if left { distance } else { -distance };
                offset_segs.push(Geometry::Line(Line::new(l.start + shift, l.end + shift)));
            }
            Geometry::Arc(a) => {
                offset_segs.push(Geometry::Arc(offset_arc(a, distance, left)?));
            }
            _ => return None,
        }
    }

    // 相邻段延伸求交，修剪出新顶点
    let n = offset_segs.len();
    let vertex_count = pl.vertices.len();
    let mut points: Vec<Point2> = Vec::with_capacity(vertex_count);
    for i in 0..vertex_count {
        let point = if pl.closed {
            let prev = &offset_segs[(i + n - 1) % n];
            corner_join(prev, &offset_segs[i % n], &pl.vertices[i].point)?
        } else if i == 0 {
            seg_start(&offset_segs[0])
        } else if i == vertex_count - 1 {
            seg_end(&offset_segs[n - 1])
        } else {
            corner_join(&offset_segs[i - 1], &offset_segs[i], &pl.vertices[i].point)?
        };
        points.push(point);
    }

    // 重建顶点，弧段按新端点重算凸度
    let mut vertices: Vec<PolylineVertex> = Vec::with_capacity(vertex_count);
    for (i, point) in points.iter().enumerate() {
        let bulge = if i < n || pl.closed {
            match &offset_segs[i % n] {
                Geometry::Arc(a) => {
                    let end = points[(i + 1) % vertex_count];
                    recompute_bulge(a, point, &end)
                }
                _ => 0.0,
            }
        } else {
            0.0
        };
        vertices.push(PolylineVertex::with_bulge(*point, bulge));
    }

    Some(Polyline::new(vertices, pl.closed))
}

fn seg_start(g: &Geometry) -> Point2 {
    match g {
        Geometry::Line(l) => l.start,
        Geometry::Arc(a) => a.start_point(),
        _ => Point2::origin(),
    }
}

fn seg_end(g: &Geometry) -> Point2 {
    match g {
        Geometry::Line(l) => l.end,
        Geometry::Arc(a) => a.end_point(),
        _ => Point2::origin(),
    }
}

/// 两偏移段的延长交点，取离原角点最近者
///
/// 偏移后平行无交时退回前段终点。
fn corner_join(a: &Geometry, b: &Geometry, original_corner: &Point2) -> Option<Point2> {
    let candidates = match (a, b) {
        (Geometry::Line(l1), Geometry::Line(l2)) => line_line_infinite(l1, l2),
        (Geometry::Line(l), Geometry::Arc(arc)) | (Geometry::Arc(arc), Geometry::Line(l)) => {
            line_circle(l, &arc.to_circle(), false)
        }
        (Geometry::Arc(a1), Geometry::Arc(a2)) => circle_circle(&a1.to_circle(), &a2.to_circle()),
        _ => return None,
    };
    match candidates.closest_to(original_corner) {
        Some(p) => Some(p),
        None => Some(seg_end(a)),
    }
}

/// 由修剪后的端点重算弧段凸度
fn recompute_bulge(arc: &Arc, start: &Point2, end: &Point2) -> f64 {
    let a1 = (start.y - arc.center.y).atan2(start.x - arc.center.x);
    let a2 = (end.y - arc.center.y).atan2(end.x - arc.center.x);
    let sweep = if arc.reversed {
        normalize_angle(a1 - a2)
    } else {
        normalize_angle(a2 - a1)
    };
    let b = (sweep / 4.0).tan();
    if arc.reversed {
        -b
    } else {
        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_line_copies() {
        let g = Geometry::Line(Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)));
        let s = offset_geometry(&g, 2.0, &Point2::new(5.0, 1.0), 3);
        assert_eq!(s.len(), 3);
        for (k, g) in s.iter().enumerate() {
            match g {
                Geometry::Line(l) => {
                    let want = 2.0 * (k + 1) as f64;
                    assert!((l.start.y - want).abs() < 1.0e-9);
                }
                other => panic!("expected line, got {}", other.type_name()),
            }
        }
    }

    #[test]
    fn test_offset_circle_inward_truncates() {
        let g = Geometry::Circle(Circle::new(Point2::origin(), 5.0));
        // 向内偏移 2，三份副本中第三份半径耗尽
        let s = offset_geometry(&g, 2.0, &Point2::new(1.0, 0.0), 3);
        assert_eq!(s.len(), 2);
        match s.get(1) {
            Some(Geometry::Circle(c)) => assert!((c.radius - 1.0).abs() < 1.0e-9),
            _ => panic!("expected circle"),
        }
    }

    #[test]
    fn test_offset_arc_outward() {
        let arc = Arc::new(Point2::origin(), 5.0, 0.0, std::f64::consts::PI, false);
        let s = offset_geometry(&Geometry::Arc(arc), 2.0, &Point2::new(20.0, 0.0), 1);
        match s.first() {
            Some(Geometry::Arc(a)) => {
                assert!((a.radius - 7.0).abs() < 1.0e-9);
                assert!(!a.reversed);
            }
            _ => panic!("expected arc"),
        }
    }

    #[test]
    fn test_offset_polyline_corner_trim() {
        // L 形折线向内角一侧偏移，角点修剪到 (9,1)
        let pl = Polyline::from_points(
            [
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
            ],
            false,
        );
        let s = offset_geometry(&Geometry::Polyline(pl), 1.0, &Point2::new(8.0, 2.0), 1);
        match s.first() {
            Some(Geometry::Polyline(p)) => {
                assert_eq!(p.vertices.len(), 3);
                assert!((p.vertices[0].point - Point2::new(0.0, 1.0)).norm() < 1.0e-9);
                assert!((p.vertices[1].point - Point2::new(9.0, 1.0)).norm() < 1.0e-9);
                assert!((p.vertices[2].point - Point2::new(9.0, 10.0)).norm() < 1.0e-9);
            }
            _ => panic!("expected polyline"),
        }
    }

    #[test]
    fn test_offset_closed_polyline_shrinks() {
        let pl = Polyline::from_points(
            [
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(10.0, 10.0),
                Point2::new(0.0, 10.0),
            ],
            true,
        );
        let s = offset_geometry(&Geometry::Polyline(pl), 2.0, &Point2::new(5.0, 5.0), 1);
        match s.first() {
            Some(Geometry::Polyline(p)) => {
                assert!(p.closed);
                assert!((p.vertices[0].point - Point2::new(2.0, 2.0)).norm() < 1.0e-9);
                assert!((p.vertices[2].point - Point2::new(8.0, 8.0)).norm() < 1.0e-9);
            }
            _ => panic!("expected polyline"),
        }
    }

    #[test]
    fn test_offset_invalid_inputs_degenerate() {
        let g = Geometry::Line(Line::new(Point2::origin(), Point2::new(10.0, 0.0)));
        assert!(offset_geometry(&g, 0.0, &Point2::new(5.0, 1.0), 1).is_degenerate());
        assert!(offset_geometry(&g, 2.0, &Point2::new(5.0, 1.0), 0).is_degenerate());
    }
}
