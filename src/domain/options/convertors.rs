//! 转换器工厂

use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

use super::Convertor;

/// 路径字符串去掉 YAML 引号，例如 `'docs/src'` -> `docs/src`
pub fn path_convertor() -> Convertor {
    Arc::new(|value: Value| match value {
        Value::String(raw) => {
            let unquoted = serde_yaml::from_str::<String>(&raw).unwrap_or(raw);
            Value::String(unquoted)
        }
        other => other,
    })
}

/// 转换为布尔值
///
/// - 字符串 `1/0`、`y/n`、`yes/no`、`true/false`（忽略大小写与首尾空白）
/// - 其他字符串视为 true
/// - 其他类型按真值判断：null、0、空数组、空对象为 false
pub fn boolean_convertor() -> Convertor {
    Arc::new(|value: Value| Value::Bool(to_bool(&value)))
}

fn to_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => !matches!(s.trim().to_lowercase().as_str(), "0" | "n" | "no" | "false"),
        Value::Null => false,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// 将非空路径字符串拼接到 `parent` 下
pub fn rel_path_convertor(parent: impl Into<PathBuf>) -> Convertor {
    let parent = parent.into();

    Arc::new(move |value: Value| match value {
        Value::String(path) if !path.is_empty() => {
            Value::String(parent.join(path).to_string_lossy().into_owned())
        }
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_boolean_convertor_strings() {
        let convert = boolean_convertor();
        for truthy in ["1", "y", "Yes", "TRUE", " true ", "anything"] {
            assert_eq!(convert(json!(truthy)), json!(true), "{truthy}");
        }
        for falsy in ["0", "n", "No", "false", "FALSE "] {
            assert_eq!(convert(json!(falsy)), json!(false), "{falsy}");
        }
    }

    #[test]
    fn test_boolean_convertor_other_values() {
        let convert = boolean_convertor();
        assert_eq!(convert(json!(true)), json!(true));
        assert_eq!(convert(json!(false)), json!(false));
        assert_eq!(convert(Value::Null), json!(false));
        assert_eq!(convert(json!(0)), json!(false));
        assert_eq!(convert(json!(2)), json!(true));
        assert_eq!(convert(json!([])), json!(false));
        assert_eq!(convert(json!({"a": 1})), json!(true));
    }

    #[test]
    fn test_path_convertor_unquotes() {
        let convert = path_convertor();
        assert_eq!(convert(json!("'docs/src'")), json!("docs/src"));
        assert_eq!(convert(json!("docs/src")), json!("docs/src"));
        assert_eq!(convert(json!(1)), json!(1));
    }

    #[test]
    fn test_rel_path_convertor() {
        let convert = rel_path_convertor("/project");
        assert_eq!(convert(json!("img/logo.png")), json!("/project/img/logo.png"));
        assert_eq!(convert(json!("")), json!(""));
        assert_eq!(convert(Value::Null), Value::Null);
    }
}
