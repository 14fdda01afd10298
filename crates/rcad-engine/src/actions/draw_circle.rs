//! 圆心+半径画圆 Action

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use rcad_core::geometry::{Circle, Geometry};
use rcad_core::math::{Point2, EPSILON};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    SetCenter,
    SetRadius,
}

pub struct DrawCircleAction {
    status: Status,
    center: Option<Point2>,
}

impl DrawCircleAction {
    pub fn new() -> Self {
        Self {
            status: Status::SetCenter,
            center: None,
        }
    }

    fn build(&mut self, radius: f64) -> ActionResult {
        let center = match self.center {
            Some(c) => c,
            None => return ActionResult::Continue,
        };
        if radius < EPSILON {
            return ActionResult::InvalidInput("radius must be positive".to_string());
        }
        ActionResult::CreateEntities(vec![Geometry::Circle(Circle::new(center, radius))])
    }
}

impl Default for DrawCircleAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawCircleAction {
    fn action_type(&self) -> ActionType {
        ActionType::DrawCircle
    }

    fn reset(&mut self) {
        self.status = Status::SetCenter;
        self.center = None;
    }

    fn on_coordinate(&mut self, _ctx: &ActionContext, point: Point2) -> ActionResult {
        match self.status {
            Status::SetCenter => {
                self.center = Some(point);
                self.status = Status::SetRadius;
                ActionResult::Continue
            }
            Status::SetRadius => {
                let radius = self.center.map(|c| (point - c).norm()).unwrap_or(0.0);
                self.build(radius)
            }
        }
    }

    fn on_value(&mut self, _ctx: &ActionContext, value: f64) -> ActionResult {
        match self.status {
            Status::SetCenter => ActionResult::InvalidInput("expected a point".to_string()),
            Status::SetRadius => self.build(value),
        }
    }

    fn on_back(&mut self) -> ActionResult {
        match self.status {
            Status::SetCenter => ActionResult::Cancel,
            Status::SetRadius => {
                self.center = None;
                self.status = Status::SetCenter;
                ActionResult::Continue
            }
        }
    }

    fn prompt(&self) -> &'static str {
        match self.status {
            Status::SetCenter => "specify-center",
            Status::SetRadius => "specify-radius",
        }
    }

    fn preview(&self, ctx: &ActionContext) -> Vec<PreviewGeometry> {
        match (self.status, self.center) {
            (Status::SetRadius, Some(center)) => {
                let radius = (ctx.cursor - center).norm();
                if radius < EPSILON {
                    return Vec::new();
                }
                vec![PreviewGeometry::new(Geometry::Circle(Circle::new(
                    center, radius,
                )))]
            }
            _ => Vec::new(),
        }
    }
}
