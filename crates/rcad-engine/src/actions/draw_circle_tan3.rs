//! 三切画圆 Action（阿波罗尼乌斯）
//!
//! 选取三个相切目标后代数求解全部候选圆，多解时点击选心。

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use rcad_core::document::EntityId;
use rcad_core::geometry::{Circle, Geometry};
use rcad_core::math::Point2;
use rcad_core::solver::{circle_tangent_3, TangencyTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    SelectFirst,
    SelectSecond,
    SelectThird,
    SetCenter,
}

pub struct DrawCircleTan3Action {
    status: Status,
    targets: Vec<EntityId>,
    candidates: Vec<Circle>,
}

impl DrawCircleTan3Action {
    pub fn new() -> Self {
        Self {
            status: Status::SelectFirst,
            targets: Vec::new(),
            candidates: Vec::new(),
        }
    }

    fn resolve_target(ctx: &ActionContext, id: EntityId) -> Result<TangencyTarget, ActionResult> {
        let entity = match ctx.document.get(id) {
            Ok(e) => e,
            Err(_) => return Err(ActionResult::EntityLost(id)),
        };
        match &entity.geometry {
            Geometry::Line(l) => Ok(TangencyTarget::Line(l.clone())),
            Geometry::Circle(c) => Ok(TangencyTarget::Circle(c.clone())),
            Geometry::Arc(a) => Ok(TangencyTarget::from_arc(a)),
            _ => Err(ActionResult::InvalidInput(
                "entity cannot be a tangency target".to_string(),
            )),
        }
    }

    fn pick_target(&mut self, ctx: &ActionContext, point: Point2) -> ActionResult {
        let entity = match ctx.pick_entity(&point) {
            Some(e) => e,
            None => return ActionResult::InvalidInput("no entity at point".to_string()),
        };
        if !matches!(
            entity.geometry,
            Geometry::Line(_) | Geometry::Circle(_) | Geometry::Arc(_)
        ) {
            return ActionResult::InvalidInput("select a line, circle or arc".to_string());
        }
        if self.targets.contains(&entity.id) {
            return ActionResult::InvalidInput("entity already selected".to_string());
        }
        self.targets.push(entity.id);
        match self.targets.len() {
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

    fn solve(&mut self, ctx: &ActionContext) -> ActionResult {
        let mut resolved = Vec::with_capacity(3);
        for &id in &self.targets {
            match Self::resolve_target(ctx, id) {
                Ok(t) => resolved.push(t),
                Err(r) => return r,
            }
        }

        let solutions = circle_tangent_3(&resolved[0], &resolved[1], &resolved[2]);
        if solutions.is_empty() {
            // 丢掉第三个目标，回到选取状态
            self.targets.pop();
            self.status = Status::SelectThird;
            return ActionResult::Degenerate("no circle tangent to all three".to_string());
        }
        self.candidates = solutions.into_vec();
        if self.candidates.len() == 1 {
            let c = self.candidates.remove(0);
            return ActionResult::CreateEntities(vec![Geometry::Circle(c)]);
        }
        self.status = Status::SetCenter;
        ActionResult::Continue
    }

    fn choose_center(&mut self, point: Point2) -> ActionResult {
        let chosen = self
            .candidates
            .iter()
            .min_by(|a, b| {
                let da = (a.center - point).norm();
                let db = (b.center - point).norm();
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .cloned();
        match chosen {
            Some(c) => ActionResult::CreateEntities(vec![Geometry::Circle(c)]),
            None => ActionResult::Continue,
        }
    }
}

impl Default for DrawCircleTan3Action {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawCircleTan3Action {
    fn action_type(&self) -> ActionType {
        ActionType::DrawCircleTan3
    }

    fn reset(&mut self) {
        self.status = Status::SelectFirst;
        self.targets.clear();
        self.candidates.clear();
    }

    fn on_coordinate(&mut self, ctx: &ActionContext, point: Point2) -> ActionResult {
        match self.status {
            Status::SelectFirst | Status::SelectSecond | Status::SelectThird => {
                self.pick_target(ctx, point)
            }
            Status::SetCenter => self.choose_center(point),
        }
    }

    fn on_back(&mut self) -> ActionResult {
        match self.status {
            Status::SelectFirst => ActionResult::Cancel,
            Status::SelectSecond => {
                self.targets.clear();
                self.status = Status::SelectFirst;
                ActionResult::Continue
            }
            Status::SelectThird => {
                self.targets.pop();
                self.status = Status::SelectSecond;
                ActionResult::Continue
            }
            Status::SetCenter => {
                self.candidates.clear();
                self.targets.pop();
                self.status = Status::SelectThird;
                ActionResult::Continue
            }
        }
    }

    fn prompt(&self) -> &'static str {
        match self.status {
            Status::SelectFirst => "select-first-entity",
            Status::SelectSecond => "select-second-entity",
            Status::SelectThird => "select-third-entity",
            Status::SetCenter => "select-center-among-solutions",
        }
    }

    fn preview(&self, _ctx: &ActionContext) -> Vec<PreviewGeometry> {
        self.candidates
            .iter()
            .map(|c| PreviewGeometry::reference(Geometry::Circle(c.clone())))
            .collect()
    }
}
