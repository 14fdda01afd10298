//! 命令行输入解析
//!
//! 支持的格式：
//! - 绝对坐标: `100,50`
//! - 相对坐标: `@100,50`（相对于参考点）
//! - 相对极坐标: `@100<45`（角度为度）
//! - 长度+角度: `100<45`
//! - 纯角度: `<45`
//! - 纯数字: `100`（长度/半径，由当前 Action 决定语义）

use crate::math::{polar, Point2};
use thiserror::Error;

/// 解析后的输入值
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Point(Point2),
    Length(f64),
    /// 角度（弧度）
    Angle(f64),
    LengthAngle {
        length: f64,
        /// 弧度
        angle: f64,
    },
}

/// 输入解析错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid input format: {0}")]
    InvalidFormat(String),
    #[error("reference point required: {0}")]
    MissingReference(String),
}

/// 输入解析器
///
/// 无状态；参考点由调用方（当前 Action 的上一个点）传入。
pub struct InputParser;

impl InputParser {
    /// 解析输入字符串
    pub fn parse(input: &str, reference: Option<Point2>) -> Result<InputValue, ParseError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseError::InvalidFormat("empty input".to_string()));
        }

        if let Some(pos) = input.rfind('<') {
            return Self::parse_polar(&input[..pos], &input[pos + 1..], reference);
        }
        if let Some(pos) = input.find(',') {
            return Self::parse_coordinate(&input[..pos], &input[pos + 1..], reference);
        }
        if let Ok(value) = input.parse::<f64>() {
            return Ok(InputValue::Length(value));
        }

        Err(ParseError::InvalidFormat(input.to_string()))
    }

    /// 强制解析为点
    ///
    /// 长度+角度在有参考点时转换为点；纯长度沿水平方向推进。
    pub fn parse_point(input: &str, reference: Option<Point2>) -> Result<Point2, ParseError> {
        match Self::parse(input, reference)? {
            InputValue::Point(p) => Ok(p),
            InputValue::LengthAngle { length, angle } => reference
                .map(|origin| polar(origin, length, angle))
                .ok_or_else(|| {
                    ParseError::MissingReference("length+angle input".to_string())
                }),
            InputValue::Length(len) => reference
                .map(|origin| Point2::new(origin.x + len, origin.y))
                .ok_or_else(|| ParseError::MissingReference("length-only input".to_string())),
            InputValue::Angle(_) => Err(ParseError::InvalidFormat(
                "angle cannot be converted to point".to_string(),
            )),
        }
    }

    /// `<` 右侧是角度（度），左侧是可选的长度（`@` 前缀表示相对）
    fn parse_polar(
        prefix: &str,
        angle_str: &str,
        reference: Option<Point2>,
    ) -> Result<InputValue, ParseError> {
        let angle = parse_number(angle_str)?.to_radians();

        let (relative, length_str) = match prefix.strip_prefix('@') {
            Some(rest) => (true, rest),
            None => (false, prefix),
        };
        if length_str.is_empty() {
            return Ok(InputValue::Angle(angle));
        }
        let length = parse_number(length_str)?;

        if relative {
            let origin = reference.ok_or_else(|| {
                ParseError::MissingReference("relative polar coordinate".to_string())
            })?;
            Ok(InputValue::Point(polar(origin, length, angle)))
        } else {
            Ok(InputValue::LengthAngle { length, angle })
        }
    }

    fn parse_coordinate(
        x_str: &str,
        y_str: &str,
        reference: Option<Point2>,
    ) -> Result<InputValue, ParseError> {
        let (relative, x_str) = match x_str.strip_prefix('@') {
            Some(rest) => (true, rest),
            None => (false, x_str),
        };
        let x = parse_number(x_str)?;
        let y = parse_number(y_str)?;

        if relative {
            let origin = reference.ok_or_else(|| {
                ParseError::MissingReference("relative coordinate".to_string())
            })?;
            Ok(InputValue::Point(Point2::new(origin.x + x, origin.y + y)))
        } else {
            Ok(InputValue::Point(Point2::new(x, y)))
        }
    }
}

fn parse_number(s: &str) -> Result<f64, ParseError> {
    s.trim()
        .parse::<f64>()
        .map_err(|_| ParseError::InvalidFormat(format!("not a number: {}", s)))
}
