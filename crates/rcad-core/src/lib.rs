//! RCAD 核心几何引擎
//!
//! 提供2D几何图元、相交/相切运算、约束求解与对象捕捉。
//!
//! # 架构设计
//!
//! - `geometry`: 不可变图元值类型（线段、圆、弧、椭圆、多段线）
//! - `intersect`: 图元两两求交与切线构造，统一返回 `Solutions`
//! - `solver`: 纯函数约束求解器（三点定圆、阿波罗尼乌斯、内切、平分、偏移）
//! - `snap`: 光标到语义捕捉点的解析
//! - `document`: 实体容器与原子撤销记录
//! - `input`: 命令行坐标/长度/角度解析
//!
//! # 示例
//!
//! ```rust
//! use rcad_core::prelude::*;
//!
//! // 三点定圆
//! let s = circle_through_3_points(
//!     Point2::new(10.0, 0.0),
//!     Point2::new(0.0, 10.0),
//!     Point2::new(-10.0, 0.0),
//! );
//! assert_eq!(s.len(), 1);
//! ```

pub mod document;
pub mod geometry;
pub mod input;
pub mod intersect;
pub mod math;
pub mod snap;
pub mod solutions;
pub mod solver;

pub mod prelude {
    //! 常用类型的便捷导入
    pub use crate::document::{
        Document, DocumentDelta, DocumentError, Entity, EntityId, UndoOutcome, UndoRecord,
        UndoStack,
    };
    pub use crate::geometry::{
        Arc, Circle, Ellipse, EllipseArc, Geometry, Line, Polyline, PolylineVertex, Spline,
    };
    pub use crate::input::{InputParser, InputValue, ParseError};
    pub use crate::intersect::{intersect, tangent_lines_common, tangent_lines_from_point};
    pub use crate::math::{normalize_angle, polar, Angle, BoundingBox2, Point2, Vector2, EPSILON};
    pub use crate::snap::{
        SnapConfig, SnapKind, SnapMask, SnapPoint, SnapResolver, SnapRestriction,
    };
    pub use crate::solutions::Solutions;
    pub use crate::solver::{
        bisector_lines, circle_inscribed_3_lines, circle_tangent_2_radius, circle_tangent_3,
        circle_through_3_points, ellipse_inscribed_4_lines, ellipse_through_4_points,
        offset_geometry, solve_circle, Constraint, TangencyTarget,
    };
}
