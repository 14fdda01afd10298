//! 三点画圆 Action

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use rcad_core::geometry::Geometry;
use rcad_core::math::Point2;
use rcad_core::solver::circle_through_3_points;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    SetPoint1,
    SetPoint2,
    SetPoint3,
}

pub struct DrawCircle3PAction {
    status: Status,
    points: Vec<Point2>,
}

impl DrawCircle3PAction {
    pub fn new() -> Self {
        Self {
            status: Status::SetPoint1,
            points: Vec::new(),
        }
    }
}

impl Default for DrawCircle3PAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawCircle3PAction {
    fn action_type(&self) -> ActionType {
        ActionType::DrawCircle3P
    }

    fn reset(&mut self) {
        self.status = Status::SetPoint1;
        self.points.clear();
    }

    fn on_coordinate(&mut self, _ctx: &ActionContext, point: Point2) -> ActionResult {
        match self.status {
            Status::SetPoint1 => {
                self.points.push(point);
                self.status = Status::SetPoint2;
                ActionResult::Continue
            }
            Status::SetPoint2 => {
                self.points.push(point);
                self.status = Status::SetPoint3;
                ActionResult::Continue
            }
            Status::SetPoint3 => {
                let s = circle_through_3_points(self.points[0], self.points[1], point);
                match s.first() {
                    Some(c) => {
                        ActionResult::CreateEntities(vec![Geometry::Circle(c.clone())])
                    }
                    None => {
                        // 共线：回到等待第三点
                        ActionResult::Degenerate("points are collinear".to_string())
                    }
                }
            }
        }
    }

    fn on_back(&mut self) -> ActionResult {
        match self.status {
            Status::SetPoint1 => ActionResult::Cancel,
            Status::SetPoint2 => {
                self.points.pop();
                self.status = Status::SetPoint1;
                ActionResult::Continue
            }
            Status::SetPoint3 => {
                self.points.pop();
                self.status = Status::SetPoint2;
                ActionResult::Continue
            }
        }
    }

    fn prompt(&self) -> &'static str {
        match self.status {
            Status::SetPoint1 => "specify-first-point",
            Status::SetPoint2 => "specify-second-point",
            Status::SetPoint3 => "specify-third-point",
        }
    }

    fn preview(&self, ctx: &ActionContext) -> Vec<PreviewGeometry> {
        if self.status == Status::SetPoint3 {
            let s = circle_through_3_points(self.points[0], self.points[1], ctx.cursor);
            if let Some(c) = s.first() {
                return vec![PreviewGeometry::new(Geometry::Circle(c.clone()))];
            }
        }
        Vec::new()
    }
}
