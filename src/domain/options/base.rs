//! 预处理器选项
//!
//! 行为类似字典，但在创建和修改时执行校验与转换。

use serde_json::Value;
use std::fmt;
use std::ops::Index;

use super::{OptionMap, OptionRules, OptionsError};

/// 已校验的选项集合
///
/// 不变量:
/// - 选项值始终通过规则中的校验器与必填检查
#[derive(Debug, Clone)]
pub struct Options {
    options: OptionMap,
    rules: OptionRules,
}

impl Options {
    /// 以默认值为底合并 `options`，校验后执行转换
    pub fn new(options: OptionMap, rules: OptionRules) -> Result<Self, OptionsError> {
        let mut merged = rules.defaults().clone();
        merged.extend(options);

        rules.validate(&merged)?;
        rules.convert(&mut merged);

        Ok(Self {
            options: merged,
            rules,
        })
    }

    /// 无规则的选项集合
    pub fn plain(options: OptionMap) -> Self {
        Self {
            options,
            rules: OptionRules::default(),
        }
    }

    pub fn options(&self) -> &OptionMap {
        &self.options
    }

    pub fn rules(&self) -> &OptionRules {
        &self.rules
    }

    pub fn validate(&self) -> Result<(), OptionsError> {
        self.rules.validate(&self.options)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    pub fn get_or<'a>(&'a self, key: &str, default: &'a Value) -> &'a Value {
        self.options.get(key).unwrap_or(default)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.options.get(key).and_then(Value::as_str)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.options.get(key).and_then(Value::as_bool)
    }

    /// 设置选项并重新校验，校验失败时保持原值不变
    pub fn set(
        &mut self,
        key: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<(), OptionsError> {
        let key = key.into();
        let mut candidate = self.options.clone();
        candidate.insert(key.clone(), value.into());

        self.rules.validate(&candidate)?;

        if let Some(value) = candidate.get_mut(&key) {
            *value = self.rules.convert_value(&key, value.take());
        }
        self.options = candidate;
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    /// 当前值是否等于默认值（没有默认值的选项返回 false）
    pub fn is_default(&self, key: &str) -> bool {
        match self.rules.defaults().get(key) {
            Some(default) => self.options.get(key) == Some(default),
            None => false,
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.options.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.options.values()
    }

    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.options.iter()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl Index<&str> for Options {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        match self.options.get(key) {
            Some(value) => value,
            None => panic!("no option named `{}`", key),
        }
    }
}

impl<'a> IntoIterator for &'a Options {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.options.iter()
    }
}

impl fmt::Display for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = serde_json::to_string(&self.options).map_err(|_| fmt::Error)?;
        write!(f, "<Options{}>", options)
    }
}
