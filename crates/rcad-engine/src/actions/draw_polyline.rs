//! 绘制多段线 Action
//!
//! 与连续画线一样支持链内 undo/redo 与 close，
//! 完成时生成单个多段线实体。

use crate::action::{
    Action, ActionContext, ActionHistory, ActionResult, ActionType, PreviewGeometry,
};
use rcad_core::geometry::{Geometry, Line, Polyline};
use rcad_core::math::{Point2, EPSILON};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    SetFirstPoint,
    SetNextPoint,
}

pub struct DrawPolylineAction {
    status: Status,
    vertices: Vec<Point2>,
    history: ActionHistory<Point2>,
}

impl DrawPolylineAction {
    pub fn new() -> Self {
        Self {
            status: Status::SetFirstPoint,
            vertices: Vec::new(),
            history: ActionHistory::new(),
        }
    }

    fn build(&self, closed: bool) -> ActionResult {
        ActionResult::CreateEntities(vec![Geometry::Polyline(Polyline::from_points(
            self.vertices.iter().copied(),
            closed,
        ))])
    }

    fn finish(&mut self) -> ActionResult {
        if self.vertices.len() >= 2 {
            self.build(false)
        } else {
            ActionResult::Cancel
        }
    }

    fn close(&mut self) -> ActionResult {
        if self.vertices.len() >= 3 {
            self.build(true)
        } else {
            ActionResult::InvalidInput("need at least three vertices to close".to_string())
        }
    }

    fn undo_vertex(&mut self) -> ActionResult {
        if self.vertices.len() < 2 {
            return ActionResult::NothingToUndo;
        }
        self.vertices.pop();
        self.history.undo();
        ActionResult::Continue
    }

    fn redo_vertex(&mut self) -> ActionResult {
        match self.history.redo().copied() {
            Some(p) => {
                self.vertices.push(p);
                ActionResult::Continue
            }
            None => ActionResult::NothingToRedo,
        }
    }
}

impl Default for DrawPolylineAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawPolylineAction {
    fn action_type(&self) -> ActionType {
        ActionType::DrawPolyline
    }

    fn reset(&mut self) {
        self.status = Status::SetFirstPoint;
        self.vertices.clear();
        self.history.clear();
    }

    fn on_coordinate(&mut self, _ctx: &ActionContext, point: Point2) -> ActionResult {
        if let Some(&last) = self.vertices.last() {
            if (point - last).norm() < EPSILON {
                return ActionResult::InvalidInput("point coincides with previous".to_string());
            }
        }
        self.vertices.push(point);
        self.history.push(point);
        self.status = Status::SetNextPoint;
        ActionResult::Continue
    }

    fn on_command(&mut self, _ctx: &ActionContext, cmd: &str) -> Option<ActionResult> {
        match cmd {
            "close" | "c" => Some(self.close()),
            "undo" | "u" => Some(self.undo_vertex()),
            "redo" | "r" => Some(self.redo_vertex()),
            "done" => Some(self.finish()),
            _ => None,
        }
    }

    fn available_commands(&self) -> &'static [&'static str] {
        &["close", "undo", "redo", "done"]
    }

    fn on_back(&mut self) -> ActionResult {
        match self.vertices.len() {
            0 => ActionResult::Cancel,
            1 => {
                self.vertices.clear();
                self.history.clear();
                self.status = Status::SetFirstPoint;
                ActionResult::Continue
            }
            _ => self.undo_vertex(),
        }
    }

    fn prompt(&self) -> &'static str {
        match self.status {
            Status::SetFirstPoint => "specify-first-point",
            Status::SetNextPoint => {
                if self.vertices.len() >= 3 {
                    "specify-next-point-or-close"
                } else {
                    "specify-next-point"
                }
            }
        }
    }

    fn preview(&self, ctx: &ActionContext) -> Vec<PreviewGeometry> {
        let mut previews: Vec<PreviewGeometry> = self
            .vertices
            .windows(2)
            .map(|w| PreviewGeometry::new(Geometry::Line(Line::new(w[0], w[1]))))
            .collect();
        if let Some(&last) = self.vertices.last() {
            if (ctx.cursor - last).norm() > EPSILON {
                previews.push(PreviewGeometry::new(Geometry::Line(Line::new(
                    last, ctx.cursor,
                ))));
            }
        }
        previews
    }
}
