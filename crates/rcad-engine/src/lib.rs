//! RCAD 交互引擎
//!
//! 在 rcad-core 的几何与求解层之上提供交互式构造：
//! - `action`: Action 状态机框架（结果、上下文、预览、链内历史）
//! - `actions`: 各绘图工具的具体 Action 实现
//! - `editor`: 协调器，分派输入事件并以原子撤销记录提交文档变更
//!
//! 典型流程：
//!
//! ```
//! use rcad_engine::prelude::*;
//! use rcad_core::math::Point2;
//!
//! let mut editor = Editor::new();
//! editor.start_action(ActionType::DrawCircle);
//! editor.pointer_click(Point2::new(0.0, 0.0)).unwrap();
//! let outcome = editor.command_input("5").unwrap();
//! assert!(matches!(outcome, EventOutcome::Committed(_)));
//! ```

pub mod action;
pub mod actions;
pub mod editor;
pub mod error;

pub mod prelude {
    pub use crate::action::{
        Action, ActionContext, ActionHistory, ActionResult, ActionType, PreviewGeometry,
    };
    pub use crate::actions::{action_type_for_command, create_action};
    pub use crate::editor::{Editor, EventOutcome};
    pub use crate::error::EngineError;
}

pub use prelude::*;
