//! 文档实体容器与撤销记录
//!
//! 实体由文档独占持有；Action/求解器只通过 `EntityId` 引用，
//! 每次调用即取即还。所有文档变更都打包成原子的 `UndoRecord`，
//! 由协调器经撤销栈提交，不允许绕过。

use crate::geometry::Geometry;
use crate::math::Point2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// 实体ID（单调递增）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// 实体：几何 + 图层
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub geometry: Geometry,
    pub layer: String,
}

/// 文档访问错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    #[error("entity {0:?} not found")]
    EntityNotFound(EntityId),
}

/// 文档实体容器
///
/// BTreeMap 保证 `all_visible` 的遍历次序稳定。
#[derive(Debug, Default, Clone)]
pub struct Document {
    entities: BTreeMap<EntityId, Entity>,
    next_id: u64,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预分配一个实体ID（记录先构造、后应用时使用）
    pub fn allocate_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// 添加实体，返回其引用ID
    pub fn add_entity(&mut self, geometry: Geometry, layer: impl Into<String>) -> EntityId {
        let id = self.allocate_id();
        self.entities.insert(
            id,
            Entity {
                id,
                geometry,
                layer: layer.into(),
            },
        );
        id
    }

    /// 以指定ID插入（撤销重放用）
    fn insert_with_id(&mut self, entity: Entity) {
        self.next_id = self.next_id.max(entity.id.0 + 1);
        self.entities.insert(entity.id, entity);
    }

    /// 移除实体
    pub fn remove_entity(&mut self, id: EntityId) -> Result<Entity, DocumentError> {
        self.entities
            .remove(&id)
            .ok_or(DocumentError::EntityNotFound(id))
    }

    pub fn get(&self, id: EntityId) -> Result<&Entity, DocumentError> {
        self.entities.get(&id).ok_or(DocumentError::EntityNotFound(id))
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// 按距离查询附近实体
    ///
    /// 先用包围盒粗筛再精确判距，避免全量精确计算。
    pub fn query_near(&self, point: Point2, radius: f64) -> Vec<EntityId> {
        self.entities
            .values()
            .filter(|e| e.geometry.bounding_box().inflated(radius).contains(&point))
            .filter(|e| e.geometry.distance_to_point(&point) <= radius)
            .map(|e| e.id)
            .collect()
    }

    /// 所有可见实体
    pub fn all_visible(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// 所有可见实体ID列表（排序稳定）
    pub fn visible_ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }
}

/// 单条文档变更
#[derive(Debug, Clone)]
pub enum DocumentDelta {
    /// 新增实体（携带完整实体以便撤销时移除、重做时重插）
    Add(Entity),
    /// 移除实体
    Remove(Entity),
    /// 修改实体几何（旧值/新值都保存）
    Modify {
        id: EntityId,
        before: Geometry,
        after: Geometry,
    },
}

/// 原子撤销记录：一组变更一起生效、一起回滚
#[derive(Debug, Clone, Default)]
pub struct UndoRecord {
    deltas: Vec<DocumentDelta>,
}

impl UndoRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entity: Entity) {
        self.deltas.push(DocumentDelta::Add(entity));
    }

    pub fn remove(&mut self, entity: Entity) {
        self.deltas.push(DocumentDelta::Remove(entity));
    }

    pub fn modify(&mut self, id: EntityId, before: Geometry, after: Geometry) {
        self.deltas.push(DocumentDelta::Modify { id, before, after });
    }

    pub fn is_empty(&self) -> bool {
        self.deltas.is_empty()
    }

    pub fn deltas(&self) -> &[DocumentDelta] {
        &self.deltas
    }

    /// 正向应用
    pub fn apply(&self, doc: &mut Document) -> Result<(), DocumentError> {
        for delta in &self.deltas {
            match delta {
                DocumentDelta::Add(entity) => doc.insert_with_id(entity.clone()),
                DocumentDelta::Remove(entity) => {
                    doc.remove_entity(entity.id)?;
                }
                DocumentDelta::Modify { id, after, .. } => {
                    let e = doc
                        .entities
                        .get_mut(id)
                        .ok_or(DocumentError::EntityNotFound(*id))?;
                    e.geometry = after.clone();
                }
            }
        }
        Ok(())
    }

    /// 逆向回滚，按相反次序
    pub fn revert(&self, doc: &mut Document) -> Result<(), DocumentError> {
        for delta in self.deltas.iter().rev() {
            match delta {
                DocumentDelta::Add(entity) => {
                    doc.remove_entity(entity.id)?;
                }
                DocumentDelta::Remove(entity) => doc.insert_with_id(entity.clone()),
                DocumentDelta::Modify { id, before, .. } => {
                    let e = doc
                        .entities
                        .get_mut(id)
                        .ok_or(DocumentError::EntityNotFound(*id))?;
                    e.geometry = before.clone();
                }
            }
        }
        Ok(())
    }
}

/// 撤销/重做结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UndoOutcome {
    Done,
    /// 栈为空：上报而非报错
    NothingToUndo,
    NothingToRedo,
}

/// 撤销栈
///
/// `execute` 压入撤销栈并清空重做栈；undo/redo 在两栈间搬移。
#[derive(Debug, Default)]
pub struct UndoStack {
    undo: Vec<UndoRecord>,
    redo: Vec<UndoRecord>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// 提交一条记录：应用到文档并进入撤销栈
    pub fn execute(&mut self, record: UndoRecord, doc: &mut Document) -> Result<(), DocumentError> {
        record.apply(doc)?;
        self.undo.push(record);
        self.redo.clear();
        Ok(())
    }

    pub fn undo(&mut self, doc: &mut Document) -> Result<UndoOutcome, DocumentError> {
        match self.undo.pop() {
            Some(record) => {
                record.revert(doc)?;
                self.redo.push(record);
                Ok(UndoOutcome::Done)
            }
            None => Ok(UndoOutcome::NothingToUndo),
        }
    }

    pub fn redo(&mut self, doc: &mut Document) -> Result<UndoOutcome, DocumentError> {
        match self.redo.pop() {
            Some(record) => {
                record.apply(doc)?;
                self.undo.push(record);
                Ok(UndoOutcome::Done)
            }
            None => Ok(UndoOutcome::NothingToRedo),
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Circle, Line};
    use crate::math::Point2;

    fn line_geometry() -> Geometry {
        Geometry::Line(Line::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0)))
    }

    #[test]
    fn test_add_query_remove() {
        let mut doc = Document::new();
        let id = doc.add_entity(line_geometry(), "0");
        assert!(doc.contains(id));

        let near = doc.query_near(Point2::new(5.0, 0.5), 1.0);
        assert_eq!(near, vec![id]);
        assert!(doc.query_near(Point2::new(5.0, 5.0), 1.0).is_empty());

        doc.remove_entity(id).unwrap();
        assert_eq!(
            doc.remove_entity(id),
            Err(DocumentError::EntityNotFound(id))
        );
    }

    #[test]
    fn test_execute_undo_redo_roundtrip() {
        let mut doc = Document::new();
        let mut stack = UndoStack::new();

        let id = doc.allocate_id();
        let entity = Entity {
            id,
            geometry: line_geometry(),
            layer: "0".to_string(),
        };
        let mut record = UndoRecord::new();
        record.add(entity);

        stack.execute(record, &mut doc).unwrap();
        assert_eq!(doc.len(), 1);

        // execute(R); undo(); redo() 与 execute(R) 结果一致
        assert_eq!(stack.undo(&mut doc).unwrap(), UndoOutcome::Done);
        assert_eq!(doc.len(), 0);
        assert_eq!(stack.redo(&mut doc).unwrap(), UndoOutcome::Done);
        assert_eq!(doc.len(), 1);
        assert!(doc.contains(id));
    }

    #[test]
    fn test_empty_stacks_report_not_error() {
        let mut doc = Document::new();
        let mut stack = UndoStack::new();
        assert_eq!(stack.undo(&mut doc).unwrap(), UndoOutcome::NothingToUndo);
        assert_eq!(stack.redo(&mut doc).unwrap(), UndoOutcome::NothingToRedo);
    }

    #[test]
    fn test_execute_clears_redo() {
        let mut doc = Document::new();
        let mut stack = UndoStack::new();

        let mut r1 = UndoRecord::new();
        let id1 = doc.allocate_id();
        r1.add(Entity {
            id: id1,
            geometry: line_geometry(),
            layer: "0".into(),
        });
        stack.execute(r1, &mut doc).unwrap();
        stack.undo(&mut doc).unwrap();
        assert!(stack.can_redo());

        let mut r2 = UndoRecord::new();
        let id2 = doc.allocate_id();
        r2.add(Entity {
            id: id2,
            geometry: Geometry::Circle(Circle::new(Point2::origin(), 5.0)),
            layer: "0".into(),
        });
        stack.execute(r2, &mut doc).unwrap();
        assert!(!stack.can_redo());
    }

    #[test]
    fn test_entity_json_roundtrip() {
        let entity = Entity {
            id: EntityId(7),
            geometry: Geometry::Circle(Circle::new(Point2::new(1.5, -2.0), 3.0)),
            layer: "dims".to_string(),
        };
        let json = serde_json::to_string(&entity).unwrap();
        let back: Entity = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, entity.id);
        assert_eq!(back.layer, entity.layer);
        match back.geometry {
            Geometry::Circle(c) => {
                assert_eq!(c.center, Point2::new(1.5, -2.0));
                assert_eq!(c.radius, 3.0);
            }
            other => panic!("unexpected geometry: {other:?}"),
        }
    }

    #[test]
    fn test_modify_delta_roundtrip() {
        let mut doc = Document::new();
        let mut stack = UndoStack::new();
        let id = doc.add_entity(line_geometry(), "0");

        let before = doc.get(id).unwrap().geometry.clone();
        let after = Geometry::Circle(Circle::new(Point2::origin(), 1.0));
        let mut record = UndoRecord::new();
        record.modify(id, before, after);
        stack.execute(record, &mut doc).unwrap();
        assert!(matches!(doc.get(id).unwrap().geometry, Geometry::Circle(_)));

        stack.undo(&mut doc).unwrap();
        assert!(matches!(doc.get(id).unwrap().geometry, Geometry::Line(_)));
    }
}
