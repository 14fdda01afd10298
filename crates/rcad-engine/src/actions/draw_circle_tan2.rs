//! 双切+半径画圆 Action
//!
//! 选取两个相切目标（直线/圆/弧），输入半径后求出全部候选圆；
//! 多解时进入选心状态，点击离哪个候选圆心近就取哪个。

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use rcad_core::document::EntityId;
use rcad_core::geometry::{Circle, Geometry};
use rcad_core::math::{Point2, EPSILON};
use rcad_core::solver::{circle_tangent_2_radius, TangencyTarget};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    SelectFirst,
    SelectSecond,
    SetRadius,
    /// 多解消歧：等待用户选择圆心
    SetCenter,
}

pub struct DrawCircleTan2RadiusAction {
    status: Status,
    targets: Vec<EntityId>,
    radius: Option<f64>,
    candidates: Vec<Circle>,
}

impl DrawCircleTan2RadiusAction {
    pub fn new() -> Self {
        Self {
            status: Status::SelectFirst,
            targets: Vec::new(),
            radius: None,
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
        self.status = if self.targets.len() == 1 {
            Status::SelectSecond
        } else {
            Status::SetRadius
        };
        ActionResult::Continue
    }

    fn solve(&mut self, ctx: &ActionContext, radius: f64) -> ActionResult {
        if radius < EPSILON {
            return ActionResult::InvalidInput("radius must be positive".to_string());
        }
        let a = match Self::resolve_target(ctx, self.targets[0]) {
            Ok(t) => t,
            Err(r) => return r,
        };
        let b = match Self::resolve_target(ctx, self.targets[1]) {
            Ok(t) => t,
            Err(r) => return r,
        };

        let solutions = circle_tangent_2_radius(&a, &b, radius, None);
        if solutions.is_empty() {
            // 回到半径输入
            return ActionResult::Degenerate("no tangent circle with this radius".to_string());
        }
        self.radius = Some(radius);
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

impl Default for DrawCircleTan2RadiusAction {
    fn default() -> Self {
        Self::new()
    }
}

impl Action for DrawCircleTan2RadiusAction {
    fn action_type(&self) -> ActionType {
        ActionType::DrawCircleTan2Radius
    }

    fn reset(&mut self) {
        self.status = Status::SelectFirst;
        self.targets.clear();
        self.radius = None;
        self.candidates.clear();
    }

    fn on_coordinate(&mut self, ctx: &ActionContext, point: Point2) -> ActionResult {
        match self.status {
            Status::SelectFirst | Status::SelectSecond => self.pick_target(ctx, point),
            Status::SetRadius => ActionResult::InvalidInput("expected a radius value".to_string()),
            Status::SetCenter => self.choose_center(point),
        }
    }

    fn on_value(&mut self, ctx: &ActionContext, value: f64) -> ActionResult {
        match self.status {
            Status::SetRadius => self.solve(ctx, value),
            _ => ActionResult::InvalidInput("expected a point".to_string()),
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
            Status::SetRadius => {
                self.targets.pop();
                self.status = Status::SelectSecond;
                ActionResult::Continue
            }
            Status::SetCenter => {
                self.candidates.clear();
                self.radius = None;
                self.status = Status::SetRadius;
                ActionResult::Continue
            }
        }
    }

    fn prompt(&self) -> &'static str {
        match self.status {
            Status::SelectFirst => "select-first-entity",
            Status::SelectSecond => "select-second-entity",
            Status::SetRadius => "specify-radius",
            Status::SetCenter => "select-center-among-solutions",
        }
    }

    fn preview(&self, _ctx: &ActionContext) -> Vec<PreviewGeometry> {
        // 候选解以参考样式全部显示
        self.candidates
            .iter()
            .map(|c| PreviewGeometry::reference(Geometry::Circle(c.clone())))
            .collect()
    }
}
