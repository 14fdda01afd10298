//! 对象捕捉系统
//!
//! 把原始光标位置解析为语义化的捕捉点：端点、交点、圆心、
//! 中点、象限点、实体上最近点、网格点，最后兜底自由点。
//!
//! 每次指针移动都会调用 `resolve`，实体列表由调用方用
//! `Document::query_near` 等视野查询预先裁剪。

use crate::document::{Entity, EntityId};
use crate::geometry::Geometry;
use crate::intersect::intersect;
use crate::math::{Point2, EPSILON};
use serde::{Deserialize, Serialize};

/// 捕捉来源
///
/// 顺序即平局裁决优先级：端点 > 交点 > 圆心 > 中点 > 象限点
/// > 实体上 > 网格 > 自由。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SnapKind {
    Endpoint,
    Intersection,
    Center,
    Middle,
    Quadrant,
    OnEntity,
    Grid,
    Free,
}

impl SnapKind {
    /// 平局裁决优先级，越小越优先
    pub fn priority(&self) -> u8 {
        match self {
            SnapKind::Endpoint => 0,
            SnapKind::Intersection => 1,
            SnapKind::Center => 2,
            SnapKind::Middle => 3,
            SnapKind::Quadrant => 4,
            SnapKind::OnEntity => 5,
            SnapKind::Grid => 6,
            SnapKind::Free => 7,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SnapKind::Endpoint => "endpoint",
            SnapKind::Intersection => "intersection",
            SnapKind::Center => "center",
            SnapKind::Middle => "middle",
            SnapKind::Quadrant => "quadrant",
            SnapKind::OnEntity => "on-entity",
            SnapKind::Grid => "grid",
            SnapKind::Free => "free",
        }
    }
}

/// 捕捉掩码（位域）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapMask {
    bits: u16,
}

impl SnapMask {
    pub const ENDPOINT: u16 = 1 << 0;
    pub const INTERSECTION: u16 = 1 << 1;
    pub const CENTER: u16 = 1 << 2;
    pub const MIDDLE: u16 = 1 << 3;
    pub const QUADRANT: u16 = 1 << 4;
    pub const ON_ENTITY: u16 = 1 << 5;
    pub const GRID: u16 = 1 << 6;

    pub const NONE: SnapMask = SnapMask { bits: 0 };
    pub const ALL: SnapMask = SnapMask { bits: 0xFFFF };

    pub fn new(bits: u16) -> Self {
        Self { bits }
    }

    fn bit(kind: SnapKind) -> u16 {
        match kind {
            SnapKind::Endpoint => Self::ENDPOINT,
            SnapKind::Intersection => Self::INTERSECTION,
            SnapKind::Center => Self::CENTER,
            SnapKind::Middle => Self::MIDDLE,
            SnapKind::Quadrant => Self::QUADRANT,
            SnapKind::OnEntity => Self::ON_ENTITY,
            SnapKind::Grid => Self::GRID,
            SnapKind::Free => 0, // 自由点不可关闭
        }
    }

    pub fn is_enabled(&self, kind: SnapKind) -> bool {
        if kind == SnapKind::Free {
            return true;
        }
        self.bits & Self::bit(kind) != 0
    }

    pub fn set(&mut self, kind: SnapKind, enabled: bool) {
        if enabled {
            self.bits |= Self::bit(kind);
        } else {
            self.bits &= !Self::bit(kind);
        }
    }

    pub fn toggle(&mut self, kind: SnapKind) {
        self.set(kind, !self.is_enabled(kind));
    }
}

impl Default for SnapMask {
    fn default() -> Self {
        Self {
            bits: Self::ENDPOINT | Self::INTERSECTION | Self::CENTER | Self::MIDDLE,
        }
    }
}

/// 坐标约束：作为最终投影施加在解析结果上
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SnapRestriction {
    #[default]
    Free,
    /// 锁定到过相对零点的水平线
    Horizontal,
    /// 锁定到过相对零点的垂直线
    Vertical,
    /// 水平/垂直取投影较近者
    Orthogonal,
}

/// 捕捉配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapConfig {
    /// 捕捉容差（世界坐标；调用方负责按缩放换算）
    pub tolerance: f64,
    /// 网格间距
    pub grid_spacing: f64,
    /// 启用的捕捉类型
    pub mask: SnapMask,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            tolerance: 10.0,
            grid_spacing: 10.0,
            mask: SnapMask::default(),
        }
    }
}

/// 捕捉点：坐标 + 来源 + 关联实体
#[derive(Debug, Clone)]
pub struct SnapPoint {
    pub point: Point2,
    pub kind: SnapKind,
    /// 关联的实体ID（交点涉及两个实体时为 None）
    pub entity: Option<EntityId>,
    /// 距光标的距离（排序用）
    pub distance: f64,
}

impl SnapPoint {
    fn new(point: Point2, kind: SnapKind, entity: Option<EntityId>, distance: f64) -> Self {
        Self {
            point,
            kind,
            entity,
            distance,
        }
    }
}

/// 捕捉解析器
#[derive(Debug, Clone, Default)]
pub struct SnapResolver {
    config: SnapConfig,
}

impl SnapResolver {
    pub fn new(config: SnapConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SnapConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut SnapConfig {
        &mut self.config
    }

    /// 解析光标位置为捕捉点
    ///
    /// 总会返回一个结果：没有候选时回退为自由点。
    /// `relative_zero` 是约束投影的参考点。
    pub fn resolve(
        &self,
        cursor: Point2,
        entities: &[&Entity],
        restriction: SnapRestriction,
        relative_zero: Point2,
    ) -> SnapPoint {
        let tol = self.config.tolerance;
        let mut candidates: Vec<SnapPoint> = Vec::with_capacity(16);

        for entity in entities {
            self.collect_entity_candidates(entity, cursor, tol, &mut candidates);
        }
        if self.config.mask.is_enabled(SnapKind::Intersection) {
            self.collect_intersections(entities, cursor, tol, &mut candidates);
        }
        if self.config.mask.is_enabled(SnapKind::Grid) {
            let spacing = self.config.grid_spacing;
            let grid = Point2::new(
                (cursor.x / spacing).round() * spacing,
                (cursor.y / spacing).round() * spacing,
            );
            let dist = (grid - cursor).norm();
            if dist <= tol {
                candidates.push(SnapPoint::new(grid, SnapKind::Grid, None, dist));
            }
        }

        let best = candidates
            .into_iter()
            .min_by(|a, b| Self::compare(a, b))
            .unwrap_or_else(|| SnapPoint::new(cursor, SnapKind::Free, None, 0.0));

        Self::apply_restriction(best, restriction, relative_zero)
    }

    /// 距离优先；几乎等距时按来源优先级裁决，保证确定性
    fn compare(a: &SnapPoint, b: &SnapPoint) -> std::cmp::Ordering {
        if (a.distance - b.distance).abs() < 1.0e-9 {
            a.kind.priority().cmp(&b.kind.priority())
        } else {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        }
    }

    fn apply_restriction(
        mut snap: SnapPoint,
        restriction: SnapRestriction,
        relative_zero: Point2,
    ) -> SnapPoint {
        let p = snap.point;
        snap.point = match restriction {
            SnapRestriction::Free => p,
            SnapRestriction::Horizontal => Point2::new(p.x, relative_zero.y),
            SnapRestriction::Vertical => Point2::new(relative_zero.x, p.y),
            SnapRestriction::Orthogonal => {
                let dx = (p.x - relative_zero.x).abs();
                let dy = (p.y - relative_zero.y).abs();
                if dy <= dx {
                    Point2::new(p.x, relative_zero.y)
                } else {
                    Point2::new(relative_zero.x, p.y)
                }
            }
        };
        snap
    }

    fn push_candidate(
        out: &mut Vec<SnapPoint>,
        cursor: Point2,
        tol: f64,
        point: Point2,
        kind: SnapKind,
        entity: Option<EntityId>,
    ) {
        let dist = (point - cursor).norm();
        if dist <= tol {
            out.push(SnapPoint::new(point, kind, entity, dist));
        }
    }

    /// 收集单个实体的捕捉候选
    fn collect_entity_candidates(
        &self,
        entity: &Entity,
        cursor: Point2,
        tol: f64,
        out: &mut Vec<SnapPoint>,
    ) {
        let mask = &self.config.mask;
        let id = Some(entity.id);

        if mask.is_enabled(SnapKind::Endpoint) {
            for p in entity.geometry.endpoints() {
                Self::push_candidate(out, cursor, tol, p, SnapKind::Endpoint, id);
            }
        }

        if mask.is_enabled(SnapKind::Center) {
            if let Some(c) = entity.geometry.center() {
                Self::push_candidate(out, cursor, tol, c, SnapKind::Center, id);
            }
        }

        if mask.is_enabled(SnapKind::Middle) {
            match &entity.geometry {
                Geometry::Polyline(pl) => {
                    for seg in pl.segments() {
                        if let Some(m) = seg.middle_point() {
                            Self::push_candidate(out, cursor, tol, m, SnapKind::Middle, id);
                        }
                    }
                }
                g => {
                    if let Some(m) = g.middle_point() {
                        Self::push_candidate(out, cursor, tol, m, SnapKind::Middle, id);
                    }
                }
            }
        }

        if mask.is_enabled(SnapKind::Quadrant) {
            match &entity.geometry {
                Geometry::Circle(c) => {
                    for q in c.quadrant_points() {
                        Self::push_candidate(out, cursor, tol, q, SnapKind::Quadrant, id);
                    }
                }
                Geometry::Arc(a) => {
                    for q in a.to_circle().quadrant_points() {
                        let angle = (q.y - a.center.y).atan2(q.x - a.center.x);
                        if a.contains_angle(angle) {
                            Self::push_candidate(out, cursor, tol, q, SnapKind::Quadrant, id);
                        }
                    }
                }
                _ => {}
            }
        }

        if mask.is_enabled(SnapKind::OnEntity) {
            let nearest = entity.geometry.nearest_point(&cursor);
            Self::push_candidate(out, cursor, tol, nearest, SnapKind::OnEntity, id);
        }
    }

    /// 收集成对实体的交点候选
    ///
    /// 只对包围盒都在光标容差邻域内的实体对求交。
    fn collect_intersections(
        &self,
        entities: &[&Entity],
        cursor: Point2,
        tol: f64,
        out: &mut Vec<SnapPoint>,
    ) {
        let near: Vec<&&Entity> = entities
            .iter()
            .filter(|e| e.geometry.bounding_box().distance_to_point(&cursor) <= tol + EPSILON)
            .collect();

        for i in 0..near.len() {
            for j in (i + 1)..near.len() {
                for p in intersect(&near[i].geometry, &near[j].geometry) {
                    Self::push_candidate(out, cursor, tol, p, SnapKind::Intersection, None);
                }
            }
        }
    }
}
