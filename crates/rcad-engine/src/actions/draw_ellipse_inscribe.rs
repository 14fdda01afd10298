//! 四线内切椭圆 Action
//!
//! 依次选取四条直线，求四边形内切椭圆；无法唯一确定
//! （平行四边形、不构成凸四边形）时回退最后一次选取。

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use rcad_core::document::EntityId;
use rcad_core::geometry::{Geometry, Line};
use rcad_core::math::Point2;
use rcad_core::solver::ellipse_inscribed_4_lines;

pub struct DrawEllipseInscribeAction {
    lines: Vec<EntityId>,
}

impl DrawEllipseInscribeAction {
    pub fn new() -> Self {
        Self { lines: Vec::new() }
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
        let mut resolved = Vec::with_capacity(4);
        for &id in &self.lines {
            match Self::resolve_line(ctx, id) {
                Ok(l) => resolved.push(l),
                Err(r) => return r,
            }
        }
        let lines = [
            resolved[0].clone(),
            resolved[1].clone(),
            resolved[2].clone(),
            resolved[3].clone(),
        ];
        match ellipse_inscribed_4_lines(&lines).first() {
            Some(e) => ActionResult::CreateEntities(vec![Geometry::Ellipse(e.clone())]),
            None => {
                self.lines.pop();
                ActionResult::Degenerate("cannot determine ellipse uniquely".to_string())
            }
        }
    }
}

impl Default for DrawEllipseInscribeAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawEllipseInscribeAction {
    fn action_type(&self) -> ActionType {
        ActionType::DrawEllipseInscribe
    }

    fn reset(&mut self) {
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
        if self.lines.len() < 4 {
            ActionResult::Continue
        } else {
            self.solve(ctx)
        }
    }

    fn on_back(&mut self) -> ActionResult {
        if self.lines.pop().is_none() {
            ActionResult::Cancel
        } else {
            ActionResult::Continue
        }
    }

    fn prompt(&self) -> &'static str {
        match self.lines.len() {
            0 => "select-first-line",
            1 => "select-second-line",
            2 => "select-third-line",
            _ => "select-fourth-line",
        }
    }

    fn preview(&self, _ctx: &ActionContext) -> Vec<PreviewGeometry> {
        Vec::new()
    }
}
