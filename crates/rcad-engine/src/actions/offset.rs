//! 等距偏移 Action
//!
//! 选取基准实体、输入间距、点击决定偏移侧。
//! 子命令 `count` 后跟数值设置副本数量。

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use rcad_core::document::EntityId;
use rcad_core::geometry::Geometry;
use rcad_core::math::{Point2, EPSILON};
use rcad_core::solver::offset_geometry;

const MAX_COPIES: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    SelectEntity,
    SetDistance,
    SetSide,
}

pub struct OffsetAction {
    status: Status,
    entity: Option<EntityId>,
    distance: Option<f64>,
    count: usize,
    /// `count` 子命令之后的数值按副本数解释
    awaiting_count: bool,
}

impl OffsetAction {
    pub fn new() -> Self {
        Self {
            status: Status::SelectEntity,
            entity: None,
            distance: None,
            count: 1,
            awaiting_count: false,
        }
    }

    fn base_geometry(&self, ctx: &ActionContext) -> Result<Geometry, ActionResult> {
        let id = match self.entity {
            Some(id) => id,
            None => return Err(ActionResult::Continue),
        };
        match ctx.document.get(id) {
            Ok(e) => Ok(e.geometry.clone()),
            Err(_) => Err(ActionResult::EntityLost(id)),
        }
    }

    fn commit(&mut self, ctx: &ActionContext, toward: Point2) -> ActionResult {
        let base = match self.base_geometry(ctx) {
            Ok(g) => g,
            Err(r) => return r,
        };
        let distance = match self.distance {
            Some(d) => d,
            None => return ActionResult::Continue,
        };
        let copies = offset_geometry(&base, distance, &toward, self.count);
        if copies.is_empty() {
            return ActionResult::Degenerate("cannot offset this entity".to_string());
        }
        ActionResult::CreateEntities(copies.into_vec())
    }
}

impl Default for OffsetAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for OffsetAction {
    fn action_type(&self) -> ActionType {
        ActionType::Offset
    }

    fn reset(&mut self) {
        self.status = Status::SelectEntity;
        self.entity = None;
        self.distance = None;
        self.count = 1;
        self.awaiting_count = false;
    }

    fn on_coordinate(&mut self, ctx: &ActionContext, point: Point2) -> ActionResult {
        match self.status {
            Status::SelectEntity => {
                let entity = match ctx.pick_entity(&point) {
                    Some(e) => e,
                    None => return ActionResult::InvalidInput("no entity at point".to_string()),
                };
                if !matches!(
                    entity.geometry,
                    Geometry::Line(_) | Geometry::Circle(_) | Geometry::Arc(_) | Geometry::Polyline(_)
                ) {
                    return ActionResult::InvalidInput(
                        "entity cannot be offset".to_string(),
                    );
                }
                self.entity = Some(entity.id);
                self.status = Status::SetDistance;
                ActionResult::Continue
            }
            Status::SetDistance => {
                ActionResult::InvalidInput("expected a distance value".to_string())
            }
            Status::SetSide => self.commit(ctx, point),
        }
    }

    fn on_value(&mut self, _ctx: &ActionContext, value: f64) -> ActionResult {
        if self.awaiting_count {
            self.awaiting_count = false;
            let n = value as usize;
            if value.fract().abs() > EPSILON || n == 0 || n > MAX_COPIES {
                return ActionResult::InvalidInput(format!(
                    "count must be an integer between 1 and {}",
                    MAX_COPIES
                ));
            }
            self.count = n;
            return ActionResult::Continue;
        }
        match self.status {
            Status::SetDistance => {
                if value < EPSILON {
                    return ActionResult::InvalidInput("distance must be positive".to_string());
                }
                self.distance = Some(value);
                self.status = Status::SetSide;
                ActionResult::Continue
            }
            _ => ActionResult::InvalidInput("expected a point".to_string()),
        }
    }

    fn on_command(&mut self, _ctx: &ActionContext, cmd: &str) -> Option<ActionResult> {
        match cmd {
            "count" | "n" => {
                self.awaiting_count = true;
                Some(ActionResult::Continue)
            }
            _ => None,
        }
    }

    fn available_commands(&self) -> &'static [&'static str] {
        &["count"]
    }

    fn on_back(&mut self) -> ActionResult {
        self.awaiting_count = false;
        match self.status {
            Status::SelectEntity => ActionResult::Cancel,
            Status::SetDistance => {
                self.entity = None;
                self.status = Status::SelectEntity;
                ActionResult::Continue
            }
            Status::SetSide => {
                self.distance = None;
                self.status = Status::SetDistance;
                ActionResult::Continue
            }
        }
    }

    fn prompt(&self) -> &'static str {
        if self.awaiting_count {
            return "specify-copy-count";
        }
        match self.status {
            Status::SelectEntity => "select-entity",
            Status::SetDistance => "specify-distance",
            Status::SetSide => "specify-side-point",
        }
    }

    fn preview(&self, ctx: &ActionContext) -> Vec<PreviewGeometry> {
        if self.status != Status::SetSide {
            return Vec::new();
        }
        let (base, distance) = match (self.base_geometry(ctx), self.distance) {
            (Ok(g), Some(d)) => (g, d),
            _ => return Vec::new(),
        };
        offset_geometry(&base, distance, &ctx.cursor, self.count)
            .into_iter()
            .map(PreviewGeometry::reference)
            .collect()
    }
}
