//! 具体绘图 Action 实现

pub mod draw_arc;
pub mod draw_bisector;
pub mod draw_circle;
pub mod draw_circle_2p;
pub mod draw_circle_3p;
pub mod draw_circle_inscribe;
pub mod draw_circle_tan2;
pub mod draw_circle_tan3;
pub mod draw_ellipse_4p;
pub mod draw_ellipse_inscribe;
pub mod draw_line;
pub mod draw_polyline;
pub mod offset;

pub use draw_arc::DrawArc3PAction;
pub use draw_bisector::DrawBisectorAction;
pub use draw_circle::DrawCircleAction;
pub use draw_circle_2p::DrawCircle2PAction;
pub use draw_circle_3p::DrawCircle3PAction;
pub use draw_circle_inscribe::DrawCircleInscribeAction;
pub use draw_circle_tan2::DrawCircleTan2RadiusAction;
pub use draw_circle_tan3::DrawCircleTan3Action;
pub use draw_ellipse_4p::DrawEllipse4PointsAction;
pub use draw_ellipse_inscribe::DrawEllipseInscribeAction;
pub use draw_line::DrawLineAction;
pub use draw_polyline::DrawPolylineAction;
pub use offset::OffsetAction;

use crate::action::{Action, ActionType};

/// 按类型构造 Action
pub fn create_action(action_type: ActionType) -> Box<dyn Action> {
    match action_type {
        ActionType::DrawLine => Box::new(DrawLineAction::new()),
        ActionType::DrawCircle => Box::new(DrawCircleAction::new()),
        ActionType::DrawCircle2P => Box::new(DrawCircle2PAction::new()),
        ActionType::DrawCircle3P => Box::new(DrawCircle3PAction::new()),
        ActionType::DrawArc3P => Box::new(DrawArc3PAction::new()),
        ActionType::DrawPolyline => Box::new(DrawPolylineAction::new()),
        ActionType::DrawCircleTan2Radius => Box::new(DrawCircleTan2RadiusAction::new()),
        ActionType::DrawCircleTan3 => Box::new(DrawCircleTan3Action::new()),
        ActionType::DrawCircleInscribe => Box::new(DrawCircleInscribeAction::new()),
        ActionType::DrawEllipse4Points => Box::new(DrawEllipse4PointsAction::new()),
        ActionType::DrawEllipseInscribe => Box::new(DrawEllipseInscribeAction::new()),
        ActionType::DrawBisector => Box::new(DrawBisectorAction::new()),
        ActionType::Offset => Box::new(OffsetAction::new()),
    }
}

/// 命令行别名查找
pub fn action_type_for_command(cmd: &str) -> Option<ActionType> {
    const ALL: [ActionType; 13] = [
        ActionType::DrawLine,
        ActionType::DrawCircle,
        ActionType::DrawCircle2P,
        ActionType::DrawCircle3P,
        ActionType::DrawArc3P,
        ActionType::DrawPolyline,
        ActionType::DrawCircleTan2Radius,
        ActionType::DrawCircleTan3,
        ActionType::DrawCircleInscribe,
        ActionType::DrawEllipse4Points,
        ActionType::DrawEllipseInscribe,
        ActionType::DrawBisector,
        ActionType::Offset,
    ];
    ALL.into_iter().find(|t| t.command() == cmd)
}
