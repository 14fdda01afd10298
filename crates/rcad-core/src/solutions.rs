//! 解集容器
//!
//! 求解器统一返回 `Solutions<T>`：有序候选序列。
//! 空集合是退化输入的统一结果，永远不会以错误或 panic 表达。

use crate::math::{Point2, EPSILON};

/// 有序候选解集
#[derive(Debug, Clone)]
pub struct Solutions<T> {
    items: Vec<T>,
    /// 退化标记：区分"平行/重合导致无解"与"普通无交"
    degenerate: bool,
}

impl<T> Default for Solutions<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            degenerate: false,
        }
    }
}

impl<T> Solutions<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 空集并带退化标记
    pub fn degenerate() -> Self {
        Self {
            items: Vec::new(),
            degenerate: true,
        }
    }

    pub fn single(item: T) -> Self {
        Self {
            items: vec![item],
            degenerate: false,
        }
    }

    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            items,
            degenerate: false,
        }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T> IntoIterator for Solutions<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<T> FromIterator<T> for Solutions<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
            degenerate: false,
        }
    }
}

impl Solutions<Point2> {
    /// 去重插入：与已有候选距离小于容差时丢弃
    pub fn push_unique(&mut self, p: Point2, eps: f64) {
        if self.items.iter().any(|q| (q - p).norm() < eps) {
            return;
        }
        self.items.push(p);
    }

    /// 离参考点最近的候选
    pub fn closest_to(&self, reference: &Point2) -> Option<Point2> {
        self.items
            .iter()
            .min_by(|a, b| {
                let da = (*a - reference).norm();
                let db = (*b - reference).norm();
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .copied()
    }

    /// 按到参考点的距离升序排序
    pub fn sort_by_distance(&mut self, reference: &Point2) {
        self.items.sort_by(|a, b| {
            let da = (a - reference).norm();
            let db = (b - reference).norm();
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        });
    }

    /// 字典序排序（x 优先，带容差的 y 次序）
    ///
    /// 无参考点时的稳定兜底次序，保证多解枚举的确定性。
    pub fn sort_lexicographic(&mut self) {
        self.items.sort_by(|a, b| {
            if (a.x - b.x).abs() > EPSILON {
                a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
            } else {
                a.y.partial_cmp(&b.y).unwrap_or(std::cmp::Ordering::Equal)
            }
        });
    }
}
