//! 编辑器协调器
//!
//! 持有文档、撤销栈、捕捉解析器与唯一的活动 Action 槽位。
//! 所有输入事件经它分派；Action 完成时产出的实体打包为
//! 一条撤销记录提交，文档不接受其他途径的变更。

use crate::action::{Action, ActionContext, ActionResult, ActionType, PreviewGeometry};
use crate::actions::{action_type_for_command, create_action};
use crate::error::EngineError;
use rcad_core::document::{Document, Entity, EntityId, UndoOutcome, UndoStack, UndoRecord};
use rcad_core::input::{InputParser, InputValue};
use rcad_core::math::{polar, Point2};
use rcad_core::snap::{SnapConfig, SnapPoint, SnapResolver, SnapRestriction};

/// 事件处理结果
#[derive(Debug, Clone, PartialEq)]
pub enum EventOutcome {
    /// 没有活动 Action
    Idle,
    /// Action 等待后续输入
    Pending,
    /// 已提交，携带新实体ID
    Committed(Vec<EntityId>),
    /// Action 被取消
    Cancelled,
    /// 输入被拒绝：状态不变，重新提示
    Rejected(String),
    /// 求解退化：已回退一步
    Degenerate(String),
    /// 撤销/重做已生效
    Applied,
    NothingToUndo,
    NothingToRedo,
}

/// 编辑器
pub struct Editor {
    document: Document,
    undo_stack: UndoStack,
    snap: SnapResolver,
    restriction: SnapRestriction,
    active: Option<Box<dyn Action>>,
    /// 相对坐标参考点，随每次确认的点更新
    relative_zero: Point2,
    pick_tolerance: f64,
    current_layer: String,
}

impl Editor {
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            undo_stack: UndoStack::new(),
            snap: SnapResolver::default(),
            restriction: SnapRestriction::Free,
            active: None,
            relative_zero: Point2::origin(),
            pick_tolerance: 1.0,
            current_layer: "0".to_string(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn snap_config_mut(&mut self) -> &mut SnapConfig {
        self.snap.config_mut()
    }

    pub fn set_restriction(&mut self, restriction: SnapRestriction) {
        self.restriction = restriction;
    }

    pub fn set_pick_tolerance(&mut self, tolerance: f64) {
        self.pick_tolerance = tolerance;
    }

    pub fn relative_zero(&self) -> Point2 {
        self.relative_zero
    }

    pub fn active_action_type(&self) -> Option<ActionType> {
        self.active.as_ref().map(|a| a.action_type())
    }

    /// 当前提示键，无活动 Action 时为 None
    pub fn prompt(&self) -> Option<&'static str> {
        self.active.as_ref().map(|a| a.prompt())
    }

    /// 启动 Action，替换并丢弃旧的
    pub fn start_action(&mut self, action_type: ActionType) {
        tracing::info!(action = action_type.name(), "start action");
        self.active = Some(create_action(action_type));
    }

    /// 取消活动 Action，丢弃全部中间状态
    pub fn cancel_action(&mut self) -> EventOutcome {
        match self.active.take() {
            Some(_) => EventOutcome::Cancelled,
            None => EventOutcome::Idle,
        }
    }

    /// 指针移动：解析捕捉点供十字光标与预览使用
    pub fn pointer_move(&self, cursor: Point2) -> SnapPoint {
        let entities: Vec<&Entity> = self.document.all_visible().collect();
        self.snap
            .resolve(cursor, &entities, self.restriction, self.relative_zero)
    }

    /// 指针点击：捕捉后交给活动 Action
    pub fn pointer_click(&mut self, cursor: Point2) -> Result<EventOutcome, EngineError> {
        let point = self.pointer_move(cursor).point;
        self.dispatch_coordinate(point)
    }

    /// 回退一步
    pub fn back(&mut self) -> Result<EventOutcome, EngineError> {
        let result = match self.active.as_mut() {
            Some(action) => action.on_back(),
            None => return Ok(EventOutcome::Idle),
        };
        self.process(result)
    }

    /// 命令行输入：关键字、子命令或坐标/数值
    pub fn command_input(&mut self, text: &str) -> Result<EventOutcome, EngineError> {
        let trimmed = text.trim();
        let keyword = trimmed.to_lowercase();

        if self.active.is_some() {
            if keyword == "back" {
                return self.back();
            }
            let input = if trimmed.is_empty() { "done" } else { keyword.as_str() };
            // 先当子命令试
            let handled = {
                let ctx = ActionContext {
                    cursor: self.relative_zero,
                    document: &self.document,
                    pick_tolerance: self.pick_tolerance,
                };
                match self.active.as_mut() {
                    Some(action) => action.on_command(&ctx, input),
                    None => None,
                }
            };
            if let Some(result) = handled {
                return self.process(result);
            }
            if trimmed.is_empty() {
                return Ok(EventOutcome::Pending);
            }
            // 再按坐标/数值解析
            return match InputParser::parse(trimmed, Some(self.relative_zero)) {
                Ok(InputValue::Point(p)) => self.dispatch_coordinate(p),
                Ok(InputValue::Length(v)) => self.dispatch_value(v),
                Ok(InputValue::Angle(a)) => self.dispatch_value(a),
                Ok(InputValue::LengthAngle { length, angle }) => {
                    self.dispatch_coordinate(polar(self.relative_zero, length, angle))
                }
                // 解析失败非致命：原地重提示
                Err(e) => Ok(EventOutcome::Rejected(e.to_string())),
            };
        }

        // 无活动 Action：命令启动或全局撤销/重做
        match keyword.as_str() {
            "" => Ok(EventOutcome::Idle),
            "undo" | "u" => self.undo(),
            "redo" | "r" => self.redo(),
            cmd => match action_type_for_command(cmd) {
                Some(t) => {
                    self.start_action(t);
                    Ok(EventOutcome::Pending)
                }
                None => Ok(EventOutcome::Rejected(format!("unknown command: {}", cmd))),
            },
        }
    }

    /// 全局撤销
    pub fn undo(&mut self) -> Result<EventOutcome, EngineError> {
        match self.undo_stack.undo(&mut self.document)? {
            UndoOutcome::Done => Ok(EventOutcome::Applied),
            _ => Ok(EventOutcome::NothingToUndo),
        }
    }

    /// 全局重做
    pub fn redo(&mut self) -> Result<EventOutcome, EngineError> {
        match self.undo_stack.redo(&mut self.document)? {
            UndoOutcome::Done => Ok(EventOutcome::Applied),
            _ => Ok(EventOutcome::NothingToRedo),
        }
    }

    /// 删除实体（外部编辑入口，同样走撤销记录）
    pub fn erase_entity(&mut self, id: EntityId) -> Result<EventOutcome, EngineError> {
        let entity = self.document.get(id)?.clone();
        let mut record = UndoRecord::new();
        record.remove(entity);
        self.undo_stack.execute(record, &mut self.document)?;
        Ok(EventOutcome::Committed(vec![]))
    }

    /// 活动 Action 的预览
    pub fn preview(&self, cursor: Point2) -> Vec<PreviewGeometry> {
        let point = self.pointer_move(cursor).point;
        let ctx = ActionContext {
            cursor: point,
            document: &self.document,
            pick_tolerance: self.pick_tolerance,
        };
        match self.active.as_ref() {
            Some(action) => action.preview(&ctx),
            None => Vec::new(),
        }
    }

    fn dispatch_coordinate(&mut self, point: Point2) -> Result<EventOutcome, EngineError> {
        let result = {
            let ctx = ActionContext {
                cursor: point,
                document: &self.document,
                pick_tolerance: self.pick_tolerance,
            };
            match self.active.as_mut() {
                Some(action) => action.on_coordinate(&ctx, point),
                None => return Ok(EventOutcome::Idle),
            }
        };
        // 只有被接受的点才成为相对坐标参考
        if matches!(result, ActionResult::Continue | ActionResult::CreateEntities(_)) {
            self.relative_zero = point;
        }
        self.process(result)
    }

    fn dispatch_value(&mut self, value: f64) -> Result<EventOutcome, EngineError> {
        let result = {
            let ctx = ActionContext {
                cursor: self.relative_zero,
                document: &self.document,
                pick_tolerance: self.pick_tolerance,
            };
            match self.active.as_mut() {
                Some(action) => action.on_value(&ctx, value),
                None => return Ok(EventOutcome::Idle),
            }
        };
        self.process(result)
    }

    /// 统一处理 Action 结果
    fn process(&mut self, result: ActionResult) -> Result<EventOutcome, EngineError> {
        match result {
            ActionResult::Continue => Ok(EventOutcome::Pending),
            ActionResult::CreateEntities(geometries) => {
                let mut record = UndoRecord::new();
                let mut ids = Vec::with_capacity(geometries.len());
                for geometry in geometries {
                    let id = self.document.allocate_id();
                    record.add(Entity {
                        id,
                        geometry,
                        layer: self.current_layer.clone(),
                    });
                    ids.push(id);
                }
                self.undo_stack.execute(record, &mut self.document)?;
                tracing::info!(count = ids.len(), "entities committed");
                // 完成的 Action 即可销毁
                self.active = None;
                Ok(EventOutcome::Committed(ids))
            }
            ActionResult::Cancel => {
                self.active = None;
                Ok(EventOutcome::Cancelled)
            }
            ActionResult::InvalidInput(msg) => Ok(EventOutcome::Rejected(msg)),
            ActionResult::Degenerate(msg) => {
                tracing::debug!(%msg, "solver degenerate");
                Ok(EventOutcome::Degenerate(msg))
            }
            ActionResult::NothingToUndo => Ok(EventOutcome::NothingToUndo),
            ActionResult::NothingToRedo => Ok(EventOutcome::NothingToRedo),
            ActionResult::EntityLost(id) => {
                // 引用的实体已被移除：中止 Action 并上报
                tracing::warn!(?id, "referenced entity lost, cancelling action");
                self.active = None;
                Err(EngineError::Document(
                    rcad_core::document::DocumentError::EntityNotFound(id),
                ))
            }
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcad_core::geometry::Geometry;

    fn trace_init() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    fn click(editor: &mut Editor, x: f64, y: f64) -> EventOutcome {
        editor.pointer_click(Point2::new(x, y)).unwrap()
    }

    #[test]
    fn test_circle_center_point_radius() {
        trace_init();
        let mut editor = Editor::new();
        editor.start_action(ActionType::DrawCircle);
        assert_eq!(editor.prompt(), Some("specify-center"));

        click(&mut editor, 0.0, 0.0);
        assert_eq!(editor.prompt(), Some("specify-radius"));
        let outcome = click(&mut editor, 10.0, 0.0);

        let ids = match outcome {
            EventOutcome::Committed(ids) => ids,
            other => panic!("expected commit, got {:?}", other),
        };
        assert_eq!(ids.len(), 1);
        match &editor.document().get(ids[0]).unwrap().geometry {
            Geometry::Circle(c) => assert!((c.radius - 10.0).abs() < 1.0e-9),
            other => panic!("expected circle, got {}", other.type_name()),
        }
        // 完成后 Action 槽位清空
        assert!(editor.active_action_type().is_none());
    }

    #[test]
    fn test_cancel_then_fresh_action_starts_clean() {
        let mut editor = Editor::new();
        editor.start_action(ActionType::DrawCircle);
        click(&mut editor, 3.0, 4.0);
        assert_eq!(editor.prompt(), Some("specify-radius"));

        editor.cancel_action();
        editor.start_action(ActionType::DrawCircle);
        // 不携带上一次的部分输入
        assert_eq!(editor.prompt(), Some("specify-center"));
    }

    #[test]
    fn test_line_chain_within_action_undo() {
        let mut editor = Editor::new();
        editor.start_action(ActionType::DrawLine);
        click(&mut editor, 0.0, 0.0);

        // 只有一个确认点：链内撤销报告无可撤销
        let outcome = editor.command_input("undo").unwrap();
        assert_eq!(outcome, EventOutcome::NothingToUndo);
        assert_eq!(editor.prompt(), Some("specify-next-point"));

        click(&mut editor, 10.0, 0.0);
        click(&mut editor, 10.0, 10.0);
        // 撤销一段后重做
        assert_eq!(editor.command_input("undo").unwrap(), EventOutcome::Pending);
        assert_eq!(editor.command_input("redo").unwrap(), EventOutcome::Pending);

        // 空输入结束：两段线
        let outcome = editor.command_input("").unwrap();
        match outcome {
            EventOutcome::Committed(ids) => assert_eq!(ids.len(), 2),
            other => panic!("expected commit, got {:?}", other),
        }
    }

    #[test]
    fn test_redo_exhausted_reports_redo_side() {
        let mut editor = Editor::new();
        editor.start_action(ActionType::DrawLine);
        click(&mut editor, 0.0, 0.0);
        // 链内没有可重做的段：上报重做侧而不是撤销侧
        assert_eq!(
            editor.command_input("redo").unwrap(),
            EventOutcome::NothingToRedo
        );
    }

    #[test]
    fn test_degenerate_click_keeps_relative_zero() {
        let mut editor = Editor::new();
        editor.start_action(ActionType::DrawCircle3P);
        click(&mut editor, 0.0, 0.0);
        click(&mut editor, 5.0, 0.0);
        // 共线第三点被回退，不得移动相对零点
        click(&mut editor, 10.0, 0.0);
        assert_eq!(editor.relative_zero(), Point2::new(5.0, 0.0));
    }

    #[test]
    fn test_line_chain_close() {
        let mut editor = Editor::new();
        editor.start_action(ActionType::DrawLine);
        click(&mut editor, 0.0, 0.0);
        click(&mut editor, 10.0, 0.0);
        click(&mut editor, 10.0, 10.0);
        let outcome = editor.command_input("close").unwrap();
        match outcome {
            EventOutcome::Committed(ids) => assert_eq!(ids.len(), 3),
            other => panic!("expected commit, got {:?}", other),
        }
    }

    #[test]
    fn test_undo_redo_roundtrip_via_editor() {
        let mut editor = Editor::new();
        editor.start_action(ActionType::DrawCircle);
        click(&mut editor, 0.0, 0.0);
        click(&mut editor, 5.0, 0.0);
        assert_eq!(editor.document().len(), 1);

        assert_eq!(editor.undo().unwrap(), EventOutcome::Applied);
        assert_eq!(editor.document().len(), 0);
        assert_eq!(editor.redo().unwrap(), EventOutcome::Applied);
        assert_eq!(editor.document().len(), 1);

        // 空栈上报而非报错
        editor.undo().unwrap();
        assert_eq!(editor.undo().unwrap(), EventOutcome::NothingToUndo);
        editor.redo().unwrap();
        assert_eq!(editor.redo().unwrap(), EventOutcome::NothingToRedo);
    }

    #[test]
    fn test_typed_coordinate_input() {
        let mut editor = Editor::new();
        editor.start_action(ActionType::DrawCircle);
        assert_eq!(
            editor.command_input("0,0").unwrap(),
            EventOutcome::Pending
        );
        // 相对坐标基于上一个确认点
        let outcome = editor.command_input("@10,0").unwrap();
        match outcome {
            EventOutcome::Committed(ids) => {
                match &editor.document().get(ids[0]).unwrap().geometry {
                    Geometry::Circle(c) => assert!((c.radius - 10.0).abs() < 1.0e-9),
                    _ => panic!("expected circle"),
                }
            }
            other => panic!("expected commit, got {:?}", other),
        }
    }

    #[test]
    fn test_typed_radius_value() {
        let mut editor = Editor::new();
        editor.start_action(ActionType::DrawCircle);
        click(&mut editor, 2.0, 3.0);
        let outcome = editor.command_input("7.5").unwrap();
        match outcome {
            EventOutcome::Committed(ids) => {
                match &editor.document().get(ids[0]).unwrap().geometry {
                    Geometry::Circle(c) => {
                        assert!((c.radius - 7.5).abs() < 1.0e-9);
                        assert!((c.center.x - 2.0).abs() < 1.0e-9);
                    }
                    _ => panic!("expected circle"),
                }
            }
            other => panic!("expected commit, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_input_rejected_and_state_kept() {
        let mut editor = Editor::new();
        editor.start_action(ActionType::DrawCircle);
        click(&mut editor, 0.0, 0.0);
        // 非正半径被拒绝，状态保持在半径输入
        let outcome = editor.command_input("0").unwrap();
        assert!(matches!(outcome, EventOutcome::Rejected(_)));
        assert_eq!(editor.prompt(), Some("specify-radius"));
        // 乱码同样被拒绝而不是报错
        let outcome = editor.command_input("abc").unwrap();
        assert!(matches!(outcome, EventOutcome::Rejected(_)));
    }

    #[test]
    fn test_collinear_circle3p_degenerates_back_one_state() {
        let mut editor = Editor::new();
        editor.start_action(ActionType::DrawCircle3P);
        click(&mut editor, 0.0, 0.0);
        click(&mut editor, 5.0, 0.0);
        let outcome = click(&mut editor, 10.0, 0.0);
        assert!(matches!(outcome, EventOutcome::Degenerate(_)));
        // 回到等待第三点，Action 仍然活跃
        assert_eq!(editor.prompt(), Some("specify-third-point"));
    }

    #[test]
    fn test_entity_lost_cancels_action() {
        let mut editor = Editor::new();
        // 先画一条线
        editor.start_action(ActionType::DrawLine);
        click(&mut editor, 0.0, 0.0);
        click(&mut editor, 10.0, 0.0);
        let ids = match editor.command_input("").unwrap() {
            EventOutcome::Committed(ids) => ids,
            other => panic!("expected commit, got {:?}", other),
        };

        // 偏移 Action 选中该线后，实体被外部删除
        editor.start_action(ActionType::Offset);
        click(&mut editor, 5.0, 0.0);
        assert_eq!(editor.prompt(), Some("specify-distance"));
        editor.erase_entity(ids[0]).unwrap();
        editor.command_input("2").unwrap();

        // 点击选边时发现实体丢失：Action 被中止
        let err = editor.pointer_click(Point2::new(5.0, 3.0)).unwrap_err();
        assert!(matches!(err, EngineError::Document(_)));
        assert!(editor.active_action_type().is_none());
    }

    #[test]
    fn test_command_starts_action() {
        let mut editor = Editor::new();
        assert_eq!(editor.command_input("line").unwrap(), EventOutcome::Pending);
        assert_eq!(editor.active_action_type(), Some(ActionType::DrawLine));
        let outcome = editor.command_input("nonsense").unwrap();
        // 活动 Action 吃不下的乱码被拒绝
        assert!(matches!(outcome, EventOutcome::Rejected(_)));
    }

    #[test]
    fn test_snap_endpoint_feeds_action() {
        let mut editor = Editor::new();
        editor.snap_config_mut().tolerance = 0.5;
        // 线段端点 (5,5)
        editor.start_action(ActionType::DrawLine);
        click(&mut editor, 5.0, 5.0);
        click(&mut editor, 20.0, 5.0);
        editor.command_input("").unwrap();

        // 新圆心捕捉到端点 (5,5)
        editor.start_action(ActionType::DrawCircle);
        click(&mut editor, 5.01, 5.0);
        let outcome = editor.command_input("3").unwrap();
        match outcome {
            EventOutcome::Committed(ids) => {
                match &editor.document().get(ids[0]).unwrap().geometry {
                    Geometry::Circle(c) => {
                        assert!((c.center.x - 5.0).abs() < 1.0e-9);
                        assert!((c.center.y - 5.0).abs() < 1.0e-9);
                    }
                    _ => panic!("expected circle"),
                }
            }
            other => panic!("expected commit, got {:?}", other),
        }
    }

    #[test]
    fn test_tan2radius_disambiguation_flow() {
        let mut editor = Editor::new();
        editor.set_pick_tolerance(0.5);
        editor.snap_config_mut().tolerance = 0.1;
        // 两条互相垂直的线
        editor.start_action(ActionType::DrawLine);
        click(&mut editor, -20.0, 0.0);
        click(&mut editor, 20.0, 0.0);
        editor.command_input("").unwrap();
        editor.start_action(ActionType::DrawLine);
        click(&mut editor, 0.0, -20.0);
        click(&mut editor, 0.0, 20.0);
        editor.command_input("").unwrap();

        editor.start_action(ActionType::DrawCircleTan2Radius);
        click(&mut editor, 10.0, 0.0);
        click(&mut editor, 0.0, 10.0);
        assert_eq!(editor.prompt(), Some("specify-radius"));
        // 四个候选圆心，进入消歧状态
        assert_eq!(editor.command_input("2").unwrap(), EventOutcome::Pending);
        assert_eq!(editor.prompt(), Some("select-center-among-solutions"));

        // 点击第一象限：圆心 (2,2)
        let outcome = click(&mut editor, 3.0, 3.0);
        match outcome {
            EventOutcome::Committed(ids) => {
                match &editor.document().get(ids[0]).unwrap().geometry {
                    Geometry::Circle(c) => {
                        assert!((c.center.x - 2.0).abs() < 1.0e-6);
                        assert!((c.center.y - 2.0).abs() < 1.0e-6);
                        assert!((c.radius - 2.0).abs() < 1.0e-9);
                    }
                    _ => panic!("expected circle"),
                }
            }
            other => panic!("expected commit, got {:?}", other),
        }
    }
}
