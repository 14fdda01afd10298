//! 三点画弧 Action
//!
//! 起点、弧上一点、终点；弧方向由三点走向决定。

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use rcad_core::geometry::{Arc, Geometry};
use rcad_core::math::Point2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    SetStart,
    SetMiddle,
    SetEnd,
}

pub struct DrawArc3PAction {
    status: Status,
    start: Option<Point2>,
    middle: Option<Point2>,
}

impl DrawArc3PAction {
    pub fn new() -> Self {
        Self {
            status: Status::SetStart,
            start: None,
            middle: None,
        }
    }

    fn arc_to(&self, end: Point2) -> Option<Arc> {
        match (self.start, self.middle) {
            (Some(s), Some(m)) => Arc::from_three_points(s, m, end),
            _ => None,
        }
    }
}

impl Default for DrawArc3PAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawArc3PAction {
    fn action_type(&self) -> ActionType {
        ActionType::DrawArc3P
    }

    fn reset(&mut self) {
        self.status = Status::SetStart;
        self.start = None;
        self.middle = None;
    }

    fn on_coordinate(&mut self, _ctx: &ActionContext, point: Point2) -> ActionResult {
        match self.status {
            Status::SetStart => {
                self.start = Some(point);
                self.status = Status::SetMiddle;
                ActionResult::Continue
            }
            Status::SetMiddle => {
                self.middle = Some(point);
                self.status = Status::SetEnd;
                ActionResult::Continue
            }
            Status::SetEnd => match self.arc_to(point) {
                Some(arc) => ActionResult::CreateEntities(vec![Geometry::Arc(arc)]),
                None => ActionResult::Degenerate("points are collinear".to_string()),
            },
        }
    }

    fn on_back(&mut self) -> ActionResult {
        match self.status {
            Status::SetStart => ActionResult::Cancel,
            Status::SetMiddle => {
                self.start = None;
                self.status = Status::SetStart;
                ActionResult::Continue
            }
            Status::SetEnd => {
                self.middle = None;
                self.status = Status::SetMiddle;
                ActionResult::Continue
            }
        }
    }

    fn prompt(&self) -> &'static str {
        match self.status {
            Status::SetStart => "specify-start-point",
            Status::SetMiddle => "specify-point-on-arc",
            Status::SetEnd => "specify-end-point",
        }
    }

    fn preview(&self, ctx: &ActionContext) -> Vec<PreviewGeometry> {
        if self.status == Status::SetEnd {
            if let Some(arc) = self.arc_to(ctx.cursor) {
                return vec![PreviewGeometry::new(Geometry::Arc(arc))];
            }
        }
        Vec::new()
    }
}
