//! 角平分线 Action
//!
//! 选取两条直线，输入长度；两条平分线中取离选取点
//! 中点近的那条。

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use rcad_core::document::EntityId;
use rcad_core::geometry::{Geometry, Line};
use rcad_core::math::{Point2, EPSILON};
use rcad_core::solver::bisector_lines;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    SelectFirst,
    SelectSecond,
    SetLength,
}

pub struct DrawBisectorAction {
    status: Status,
    lines: Vec<EntityId>,
    /// 选取时的点击位置，决定取哪条平分线
    pick_points: Vec<Point2>,
}

impl DrawBisectorAction {
    pub fn new() -> Self {
        Self {
            status: Status::SelectFirst,
            lines: Vec::new(),
            pick_points: Vec::new(),
        }
    }

    fn resolve_line(ctx: &ActionContext, id: EntityId) -> Result<Line, ActionResult> {
        let entity = match ctx.document.get(id) {
            Ok(e) => e,
            Err(_) => return Err(ActionResult::EntityLost(id)),
        };
        match &entity.geometry {
            Geometry::Line(l) => Ok(l.clone()),
            _ => Err(ActionResult::InvalidInput("select a line".to_string())),
        }
    }

    fn solve(&mut self, ctx: &ActionContext, length: f64) -> ActionResult {
        if length < EPSILON {
            return ActionResult::InvalidInput("length must be positive".to_string());
        }
        let l1 = match Self::resolve_line(ctx, self.lines[0]) {
            Ok(l) => l,
            Err(r) => return r,
        };
        let l2 = match Self::resolve_line(ctx, self.lines[1]) {
            Ok(l) => l,
            Err(r) => return r,
        };

        let solutions = bisector_lines(&l1, &l2, length);
        if solutions.is_empty() {
            return ActionResult::Degenerate("lines are coincident".to_string());
        }
        // 点击中点落在哪个角域，就取该侧的平分线
        let hint = Point2::new(
            (self.pick_points[0].x + self.pick_points[1].x) / 2.0,
            (self.pick_points[0].y + self.pick_points[1].y) / 2.0,
        );
        let chosen = solutions
            .into_iter()
            .min_by(|a, b| {
                let da = a.distance_to_point(&hint);
                let db = b.distance_to_point(&hint);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(Geometry::Line);
        match chosen {
            Some(g) => ActionResult::CreateEntities(vec![g]),
            None => ActionResult::Continue,
        }
    }
}

impl Default for DrawBisectorAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawBisectorAction {
    fn action_type(&self) -> ActionType {
        ActionType::DrawBisector
    }

    fn reset(&mut self) {
        self.status = Status::SelectFirst;
        self.lines.clear();
        self.pick_points.clear();
    }

    fn on_coordinate(&mut self, ctx: &ActionContext, point: Point2) -> ActionResult {
        match self.status {
            Status::SelectFirst | Status::SelectSecond => {
                let entity = match ctx.pick_entity(&point) {
                    Some(e) => e,
                    None => return ActionResult::InvalidInput("no entity at point".to_string()),
                };
                if !matches!(entity.geometry, Geometry::Line(_)) {
                    return ActionResult::InvalidInput("select a line".to_string());
                }
                if self.lines.contains(&entity.id) {
                    return ActionResult::InvalidInput("line already selected".to_string());
                }
                self.lines.push(entity.id);
                self.pick_points.push(point);
                self.status = if self.lines.len() == 1 {
                    Status::SelectSecond
                } else {
                    Status::SetLength
                };
                ActionResult::Continue
            }
            Status::SetLength => ActionResult::InvalidInput("expected a length value".to_string()),
        }
    }

    fn on_value(&mut self, ctx: &ActionContext, value: f64) -> ActionResult {
        match self.status {
            Status::SetLength => self.solve(ctx, value),
            _ => ActionResult::InvalidInput("expected a point".to_string()),
        }
    }

    fn on_back(&mut self) -> ActionResult {
        match self.status {
            Status::SelectFirst => ActionResult::Cancel,
            Status::SelectSecond => {
                self.lines.clear();
                self.pick_points.clear();
                self.status = Status::SelectFirst;
                ActionResult::Continue
            }
            Status::SetLength => {
                self.lines.pop();
                self.pick_points.pop();
                self.status = Status::SelectSecond;
                ActionResult::Continue
            }
        }
    }

    fn prompt(&self) -> &'static str {
        match self.status {
            Status::SelectFirst => "select-first-line",
            Status::SelectSecond => "select-second-line",
            Status::SetLength => "specify-length",
        }
    }

    fn preview(&self, _ctx: &ActionContext) -> Vec<PreviewGeometry> {
        Vec::new()
    }
}
