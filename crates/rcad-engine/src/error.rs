//! 引擎错误分类
//!
//! 所有错误都不致命：输入错误原地重提示，几何退化回退一步，
//! 实体丢失只中止当前 Action。

use rcad_core::document::DocumentError;
use rcad_core::input::ParseError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// 用户输入校验失败（非数字、半径非正、数量越界）
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// 求解器无法确定解（共线、平行、不收敛）
    #[error("cannot determine solution: {0}")]
    GeometricDegeneracy(String),

    /// 引用的实体已不存在
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// 命令行解析失败
    #[error(transparent)]
    Parse(#[from] ParseError),
}
