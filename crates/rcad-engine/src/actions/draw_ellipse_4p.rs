//! 四点定椭圆 Action

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use rcad_core::geometry::Geometry;
use rcad_core::math::Point2;
use rcad_core::solver::ellipse_through_4_points;

pub struct DrawEllipse4PointsAction {
    points: Vec<Point2>,
}

impl DrawEllipse4PointsAction {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }
}

impl Default for DrawEllipse4PointsAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawEllipse4PointsAction {
    fn action_type(&self) -> ActionType {
        ActionType::DrawEllipse4Points
    }

    fn reset(&mut self) {
        self.points.clear();
    }

    fn on_coordinate(&mut self, _ctx: &ActionContext, point: Point2) -> ActionResult {
        self.points.push(point);
        if self.points.len() < 4 {
            return ActionResult::Continue;
        }
        let pts = [self.points[0], self.points[1], self.points[2], self.points[3]];
        let s = ellipse_through_4_points(&pts);
        match s.first() {
            Some(e) => ActionResult::CreateEntities(vec![Geometry::Ellipse(e.clone())]),
            None => {
                self.points.pop();
                ActionResult::Degenerate("cannot determine ellipse uniquely".to_string())
            }
        }
    }

    fn on_back(&mut self) -> ActionResult {
        if self.points.pop().is_none() {
            ActionResult::Cancel
        } else {
            ActionResult::Continue
        }
    }

    fn prompt(&self) -> &'static str {
        match self.points.len() {
            0 => "specify-first-point",
            1 => "specify-second-point",
            2 => "specify-third-point",
            _ => "specify-fourth-point",
        }
    }

    fn preview(&self, ctx: &ActionContext) -> Vec<PreviewGeometry> {
        if self.points.len() == 3 {
            let pts = [self.points[0], self.points[1], self.points[2], ctx.cursor];
            if let Some(e) = ellipse_through_4_points(&pts).first() {
                return vec![PreviewGeometry::new(Geometry::Ellipse(e.clone()))];
            }
        }
        Vec::new()
    }
}
