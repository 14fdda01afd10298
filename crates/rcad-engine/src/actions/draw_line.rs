//! 连续画线 Action
//!
//! 点击序列生成首尾相接的线段链。进行中的 undo/redo 只操作
//! 未提交的链内状态，与全局撤销栈无关；close 用首点封口。
//! 完成时整条链打包为一次实体创建。

use crate::action::{
    Action, ActionContext, ActionHistory, ActionResult, ActionType, PreviewGeometry,
};
use rcad_core::geometry::{Geometry, Line};
use rcad_core::math::{Point2, EPSILON};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    SetFirstPoint,
    SetNextPoint,
}

pub struct DrawLineAction {
    status: Status,
    points: Vec<Point2>,
    history: ActionHistory<Point2>,
}

impl DrawLineAction {
    pub fn new() -> Self {
        Self {
            status: Status::SetFirstPoint,
            points: Vec::new(),
            history: ActionHistory::new(),
        }
    }

    fn segments(&self) -> Vec<Geometry> {
        self.points
            .windows(2)
            .map(|w| Geometry::Line(Line::new(w[0], w[1])))
            .collect()
    }

    fn finish(&mut self) -> ActionResult {
        if self.points.len() >= 2 {
            ActionResult::CreateEntities(self.segments())
        } else {
            ActionResult::Cancel
        }
    }

    fn close(&mut self) -> ActionResult {
        // 至少两段才能封口
        if self.points.len() >= 3 {
            let first = self.points[0];
            self.points.push(first);
            self.finish()
        } else {
            ActionResult::InvalidInput("need at least two segments to close".to_string())
        }
    }

    /// 链内撤销：去掉最近确认的一个点
    ///
    /// 不足两个确认点时无段可撤。
    fn undo_segment(&mut self) -> ActionResult {
        if self.points.len() < 2 {
            return ActionResult::NothingToUndo;
        }
        self.points.pop();
        self.history.undo();
        ActionResult::Continue
    }

    fn redo_segment(&mut self) -> ActionResult {
        match self.history.redo().copied() {
            Some(p) => {
                self.points.push(p);
                ActionResult::Continue
            }
            None => ActionResult::NothingToRedo,
        }
    }
}

impl Default for DrawLineAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawLineAction {
    fn action_type(&self) -> ActionType {
        ActionType::DrawLine
    }

    fn reset(&mut self) {
        self.status = Status::SetFirstPoint;
        self.points.clear();
        self.history.clear();
    }

    fn on_coordinate(&mut self, _ctx: &ActionContext, point: Point2) -> ActionResult {
        // 丢弃与上一点重合的输入
        if let Some(&last) = self.points.last() {
            if (point - last).norm() < EPSILON {
                return ActionResult::InvalidInput("point coincides with previous".to_string());
            }
        }
        self.points.push(point);
        self.history.push(point);
        self.status = Status::SetNextPoint;
        ActionResult::Continue
    }

    fn on_command(&mut self, _ctx: &ActionContext, cmd: &str) -> Option<ActionResult> {
        match cmd {
            "close" | "c" => Some(self.close()),
            "undo" | "u" => Some(self.undo_segment()),
            "redo" | "r" => Some(self.redo_segment()),
            "done" => Some(self.finish()),
            _ => None,
        }
    }

    fn available_commands(&self) -> &'static [&'static str] {
        &["close", "undo", "redo", "done"]
    }

    fn on_back(&mut self) -> ActionResult {
        match self.points.len() {
            0 => ActionResult::Cancel,
            1 => {
                self.points.clear();
                self.history.clear();
                self.status = Status::SetFirstPoint;
                ActionResult::Continue
            }
            _ => self.undo_segment(),
        }
    }

    fn prompt(&self) -> &'static str {
        match self.status {
            Status::SetFirstPoint => "specify-first-point",
            Status::SetNextPoint => {
                if self.points.len() >= 3 {
                    "specify-next-point-or-close"
                } else {
                    "specify-next-point"
                }
            }
        }
    }

    fn preview(&self, ctx: &ActionContext) -> Vec<PreviewGeometry> {
        let mut previews: Vec<PreviewGeometry> =
            self.segments().into_iter().map(PreviewGeometry::new).collect();
        if let Some(&last) = self.points.last() {
            if (ctx.cursor - last).norm() > EPSILON {
                previews.push(PreviewGeometry::new(Geometry::Line(Line::new(
                    last, ctx.cursor,
                ))));
            }
        }
        previews
    }
}
