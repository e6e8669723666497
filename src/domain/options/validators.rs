//! 校验器工厂

use serde_json::Value;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use super::Validator;

const DEFAULT_IN_MSG: &str = "Unsupported option value {val}. Should be one of: {supported}";

/// 选项值的 JSON 类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Integer,
    Float,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(n) if n.is_f64() => Self::Float,
            Value::Number(_) => Self::Integer,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Null => "null",
            Self::Bool => "bool",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        };
        f.write_str(name)
    }
}

/// 字符串原样输出，其余值按 JSON 输出
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 选项值必须属于 `supported`
///
/// `msg` 可包含 `{val}` 与 `{supported}` 占位符。
pub fn validate_in<I, V>(supported: I, msg: Option<&str>) -> Validator
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let supported: Vec<Value> = supported.into_iter().map(Into::into).collect();
    let message = msg.unwrap_or(DEFAULT_IN_MSG).to_string();

    Arc::new(move |value: &Value| {
        if supported.contains(value) {
            return Ok(());
        }
        let listed = supported
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", ");
        Err(message
            .replace("{val}", &display_value(value))
            .replace("{supported}", &listed))
    })
}

/// 选项值必须是 `kinds` 中的某种类型
pub fn val_type(kinds: &[ValueKind]) -> Validator {
    let kinds = kinds.to_vec();

    Arc::new(move |value: &Value| {
        if kinds.contains(&ValueKind::of(value)) {
            return Ok(());
        }
        let listed = kinds
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Err(format!(
            "Unsupported option value {}. Must be of type {}",
            display_value(value),
            listed
        ))
    })
}

/// 非空字符串选项所指的路径必须存在
pub fn validate_exists() -> Validator {
    Arc::new(|value: &Value| match value {
        Value::String(path) if !path.is_empty() && !Path::new(path).exists() => {
            Err(format!("Path {} does not exist.", path))
        }
        _ => Ok(()),
    })
}
