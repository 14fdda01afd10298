//! Action 状态机框架
//!
//! 每个绘图工具是一个独立的 Action 实现：显式状态枚举 +
//! 固定的能力集 {on_coordinate, on_value, on_command, on_back,
//! preview}。Action 独占自己的中间状态，文档只在完成时通过
//! 协调器以一条撤销记录变更。

use rcad_core::document::{Document, Entity, EntityId};
use rcad_core::geometry::Geometry;
use rcad_core::math::Point2;

/// Action 执行结果
#[derive(Debug, Clone)]
pub enum ActionResult {
    /// 继续当前 Action
    Continue,
    /// 完成：创建实体（协调器打包为一条撤销记录）
    CreateEntities(Vec<Geometry>),
    /// 取消当前 Action，丢弃全部中间状态
    Cancel,
    /// 输入校验失败：状态不变，携带消息重新提示
    InvalidInput(String),
    /// 几何退化：携带消息回退到上一状态
    Degenerate(String),
    /// Action 内撤销/回退无内容可撤销
    NothingToUndo,
    /// Action 内重做无内容可重做
    NothingToRedo,
    /// 引用的实体已被移除，中止 Action
    EntityLost(EntityId),
}

/// Action 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    DrawLine,
    DrawCircle,
    DrawCircle2P,
    DrawCircle3P,
    DrawArc3P,
    DrawPolyline,
    DrawCircleTan2Radius,
    DrawCircleTan3,
    DrawCircleInscribe,
    DrawEllipse4Points,
    DrawEllipseInscribe,
    DrawBisector,
    Offset,
}

impl ActionType {
    pub fn name(&self) -> &'static str {
        match self {
            ActionType::DrawLine => "Line",
            ActionType::DrawCircle => "Circle",
            ActionType::DrawCircle2P => "Circle2P",
            ActionType::DrawCircle3P => "Circle3P",
            ActionType::DrawArc3P => "Arc3P",
            ActionType::DrawPolyline => "Polyline",
            ActionType::DrawCircleTan2Radius => "CircleTan2Radius",
            ActionType::DrawCircleTan3 => "CircleTan3",
            ActionType::DrawCircleInscribe => "CircleInscribe",
            ActionType::DrawEllipse4Points => "Ellipse4Points",
            ActionType::DrawEllipseInscribe => "EllipseInscribe",
            ActionType::DrawBisector => "Bisector",
            ActionType::Offset => "Offset",
        }
    }

    /// 命令行别名
    pub fn command(&self) -> &'static str {
        match self {
            ActionType::DrawLine => "line",
            ActionType::DrawCircle => "circle",
            ActionType::DrawCircle2P => "circle2p",
            ActionType::DrawCircle3P => "circle3p",
            ActionType::DrawArc3P => "arc3p",
            ActionType::DrawPolyline => "polyline",
            ActionType::DrawCircleTan2Radius => "tan2radius",
            ActionType::DrawCircleTan3 => "tan3",
            ActionType::DrawCircleInscribe => "inscribe",
            ActionType::DrawEllipse4Points => "ellipse4p",
            ActionType::DrawEllipseInscribe => "ellipseinscribe",
            ActionType::DrawBisector => "bisector",
            ActionType::Offset => "offset",
        }
    }
}

/// Action 上下文：事件期间传入的运行时信息
pub struct ActionContext<'a> {
    /// 捕捉解析后的坐标
    pub cursor: Point2,
    /// 文档只读视图（实体选取用）
    pub document: &'a Document,
    /// 实体选取容差（世界坐标）
    pub pick_tolerance: f64,
}

impl<'a> ActionContext<'a> {
    /// 选取光标附近最近的实体
    pub fn pick_entity(&self, point: &Point2) -> Option<&'a Entity> {
        self.document
            .query_near(*point, self.pick_tolerance)
            .into_iter()
            .filter_map(|id| self.document.get(id).ok())
            .min_by(|a, b| {
                let da = a.geometry.distance_to_point(point);
                let db = b.geometry.distance_to_point(point);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}

/// 预览几何体
#[derive(Debug, Clone)]
pub struct PreviewGeometry {
    pub geometry: Geometry,
    /// 参考图形（候选解、辅助线），以虚线显示
    pub is_reference: bool,
}

impl PreviewGeometry {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            is_reference: false,
        }
    }

    pub fn reference(geometry: Geometry) -> Self {
        Self {
            geometry,
            is_reference: true,
        }
    }
}

/// Action trait - 所有绘图工具的核心接口
///
/// 能力集是封闭的：坐标、数值、子命令、回退、预览。
/// 提示通道只传本地化键（如 "specify-first-point"），
/// 不传最终文案。
pub trait Action {
    fn action_type(&self) -> ActionType;

    fn name(&self) -> &'static str {
        self.action_type().name()
    }

    /// 重置到初始状态，丢弃全部中间输入
    fn reset(&mut self);

    /// 坐标输入（点击或命令行坐标，已经过捕捉解析）
    fn on_coordinate(&mut self, ctx: &ActionContext, point: Point2) -> ActionResult;

    /// 数值输入（半径、长度、角度）
    fn on_value(&mut self, _ctx: &ActionContext, _value: f64) -> ActionResult {
        ActionResult::InvalidInput("expected a point".to_string())
    }

    /// 子命令输入；返回 None 表示不认识该命令
    fn on_command(&mut self, _ctx: &ActionContext, _cmd: &str) -> Option<ActionResult> {
        None
    }

    /// 当前状态可用的子命令（命令行补全/提示用）
    fn available_commands(&self) -> &'static [&'static str] {
        &[]
    }

    /// 回退一步：丢弃最近一次确认的输入
    ///
    /// 在第一个状态回退等价于取消。
    fn on_back(&mut self) -> ActionResult;

    /// 当前状态的提示键
    fn prompt(&self) -> &'static str;

    /// 当前部分输入的最佳预览，不完整状态返回空
    fn preview(&self, ctx: &ActionContext) -> Vec<PreviewGeometry>;
}

/// 通用的 Action 内历史管理器
///
/// 多段 Action（连续画线/多段线）用它支持进行中的撤销/重做，
/// 与全局撤销栈互不相干。
#[derive(Debug, Clone)]
pub struct ActionHistory<T: Clone> {
    items: Vec<T>,
    index: i32,
}

impl<T: Clone> ActionHistory<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            index: -1,
        }
    }

    pub fn push(&mut self, data: T) {
        // 截断重做历史
        self.items.truncate((self.index + 1) as usize);
        self.items.push(data);
        self.index = self.items.len() as i32 - 1;
    }

    pub fn can_undo(&self) -> bool {
        self.index >= 0
    }

    pub fn can_redo(&self) -> bool {
        (self.index + 1) < self.items.len() as i32
    }

    pub fn undo(&mut self) -> Option<&T> {
        if self.can_undo() {
            let item = &self.items[self.index as usize];
            self.index -= 1;
            Some(item)
        } else {
            None
        }
    }

    pub fn redo(&mut self) -> Option<&T> {
        if self.can_redo() {
            self.index += 1;
            Some(&self.items[self.index as usize])
        } else {
            None
        }
    }

    pub fn current(&self) -> Option<&T> {
        if self.index >= 0 {
            Some(&self.items[self.index as usize])
        } else {
            None
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.index = -1;
    }
}

impl<T: Clone> Default for ActionHistory<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_history_push_undo_redo() {
        let mut h: ActionHistory<i32> = ActionHistory::new();
        assert!(!h.can_undo());
        h.push(1);
        h.push(2);
        assert_eq!(h.undo(), Some(&2));
        assert_eq!(h.current(), Some(&1));
        assert_eq!(h.redo(), Some(&2));
        assert!(!h.can_redo());
    }

    #[test]
    fn test_action_history_push_truncates_redo() {
        let mut h: ActionHistory<i32> = ActionHistory::new();
        h.push(1);
        h.push(2);
        h.undo();
        h.push(3);
        assert!(!h.can_redo());
        assert_eq!(h.current(), Some(&3));
    }
}
