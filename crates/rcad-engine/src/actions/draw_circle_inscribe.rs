//! 三线内切圆 Action
//!
//! 依次选取三条直线，求三角形内切圆。

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use rcad_core::document::EntityId;
use rcad_core::geometry::{Geometry, Line};
use rcad_core::math::Point2;
use rcad_core::solver::circle_inscribed_3_lines;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    SelectFirst,
    SelectSecond,
    SelectThird,
}

pub struct DrawCircleInscribeAction {
    status: Status,
    lines: Vec<EntityId>,
}

impl DrawCircleInscribeAction {
    pub fn new() -> Self {
        Self {
            status: Status::SelectFirst,
            lines: Vec::new(),
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

    fn solve(&mut self, ctx: &ActionContext) -> ActionResult {
        let mut resolved = Vec::with_capacity(3);
        for &id in &self.lines {
            match Self::resolve_line(ctx, id) {
                Ok(l) => resolved.push(l),
                Err(r) => return r,
            }
        }
        let s = circle_inscribed_3_lines(&resolved[0], &resolved[1], &resolved[2]);
        match s.first() {
            Some(c) => ActionResult::CreateEntities(vec![Geometry::Circle(c.clone())]),
            None => {
                self.lines.pop();
                self.status = Status::SelectThird;
                ActionResult::Degenerate("lines do not form a triangle".to_string())
            }
        }
    }
}

impl Default for DrawCircleInscribeAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawCircleInscribeAction {
    fn action_type(&self) -> ActionType {
        ActionType::DrawCircleInscribe
    }

    fn reset(&mut self) {
        self.status = Status::SelectFirst;
        self.lines.clear();
    }

    fn on_coordinate(&mut self, ctx: &ActionContext, point: Point2) -> ActionResult {
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
        match self.lines.len() {
            1 => {
                self.status = Status::SelectSecond;
                ActionResult::Continue
            }
            2 => {
                self.status = Status::SelectThird;
                ActionResult::Continue
            }
            _ => self.solve(ctx),
        }
    }

    fn on_back(&mut self) -> ActionResult {
        match self.status {
            Status::SelectFirst => ActionResult::Cancel,
            Status::SelectSecond => {
                self.lines.clear();
                self.status = Status::SelectFirst;
                ActionResult::Continue
            }
            Status::SelectThird => {
                self.lines.pop();
                self.status = Status::SelectSecond;
                ActionResult::Continue
            }
        }
    }

    fn prompt(&self) -> &'static str {
        match self.status {
            Status::SelectFirst => "select-first-line",
            Status::SelectSecond => "select-second-line",
            Status::SelectThird => "select-third-line",
        }
    }

    fn preview(&self, _ctx: &ActionContext) -> Vec<PreviewGeometry> {
        Vec::new()
    }
}
