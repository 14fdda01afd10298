//! 两点（直径端点）画圆 Action

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use rcad_core::geometry::{Circle, Geometry};
use rcad_core::math::{Point2, EPSILON};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    SetPoint1,
    SetPoint2,
}

pub struct DrawCircle2PAction {
    status: Status,
    p1: Option<Point2>,
}

impl DrawCircle2PAction {
    pub fn new() -> Self {
        Self {
            status: Status::SetPoint1,
            p1: None,
        }
    }

    fn circle_from(p1: Point2, p2: Point2) -> Option<Circle> {
        let diameter = (p2 - p1).norm();
        if diameter < EPSILON {
            return None;
        }
        let center = Point2::new((p1.x + p2.x) / 2.0, (p1.y + p2.y) / 2.0);
        Some(Circle::new(center, diameter / 2.0))
    }
}

impl Default for DrawCircle2PAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawCircle2PAction {
    fn action_type(&self) -> ActionType {
        ActionType::DrawCircle2P
    }

    fn reset(&mut self) {
        self.status = Status::SetPoint1;
        self.p1 = None;
    }

    fn on_coordinate(&mut self, _ctx: &ActionContext, point: Point2) -> ActionResult {
        match self.status {
            Status::SetPoint1 => {
                self.p1 = Some(point);
                self.status = Status::SetPoint2;
                ActionResult::Continue
            }
            Status::SetPoint2 => {
                let p1 = match self.p1 {
                    Some(p) => p,
                    None => return ActionResult::Continue,
                };
                match Self::circle_from(p1, point) {
                    Some(c) => ActionResult::CreateEntities(vec![Geometry::Circle(c)]),
                    None => {
                        ActionResult::InvalidInput("points must not coincide".to_string())
                    }
                }
            }
        }
    }

    fn on_back(&mut self) -> ActionResult {
        match self.status {
            Status::SetPoint1 => ActionResult::Cancel,
            Status::SetPoint2 => {
                self.p1 = None;
                self.status = Status::SetPoint1;
                ActionResult::Continue
            }
        }
    }

    fn prompt(&self) -> &'static str {
        match self.status {
            Status::SetPoint1 => "specify-first-point",
            Status::SetPoint2 => "specify-second-point",
        }
    }

    fn preview(&self, ctx: &ActionContext) -> Vec<PreviewGeometry> {
        match (self.status, self.p1) {
            (Status::SetPoint2, Some(p1)) => Self::circle_from(p1, ctx.cursor)
                .map(|c| vec![PreviewGeometry::new(Geometry::Circle(c))])
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}
