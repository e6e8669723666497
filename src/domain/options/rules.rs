//! 选项规则
//!
//! 默认值、校验器、转换器和必填参数的组合，由 [`Options`](super::Options)
//! 与 [`CombinedOptions`](super::CombinedOptions) 共用。

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::OptionsError;

/// 选项字典
pub type OptionMap = Map<String, Value>;

/// 校验器：失败时返回错误描述
pub type Validator = Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>;

/// 转换器：在校验通过后替换选项值
pub type Convertor = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// 必填参数
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Required {
    #[default]
    None,
    /// 所有参数都必须存在
    All(Vec<String>),
    /// 至少满足其中一种参数组合
    AnyOf(Vec<Vec<String>>),
}

impl Required {
    pub fn all<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::All(keys.into_iter().map(Into::into).collect())
    }

    pub fn any_of<I, C, S>(combinations: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::AnyOf(
            combinations
                .into_iter()
                .map(|combination| combination.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    fn check(&self, options: &OptionMap) -> Result<(), OptionsError> {
        let satisfied =
            |combination: &[String]| combination.iter().all(|key| options.contains_key(key));

        match self {
            Self::None => Ok(()),
            Self::All(keys) if satisfied(keys) => Ok(()),
            Self::All(keys) => Err(OptionsError::RequiredMissing(format!(
                "[{}]",
                quote_keys(keys)
            ))),
            Self::AnyOf(combinations)
                if combinations.is_empty() || combinations.iter().any(|c| satisfied(c)) =>
            {
                Ok(())
            }
            Self::AnyOf(combinations) => {
                let listed = combinations
                    .iter()
                    .map(|combination| quote_keys(combination))
                    .collect::<Vec<_>>()
                    .join("\nor:\n");
                Err(OptionsError::RequiredMissing(format!(
                    "required parameter combinations are:\n{}",
                    listed
                )))
            }
        }
    }
}

fn quote_keys(keys: &[String]) -> String {
    keys.iter()
        .map(|key| format!("'{}'", key))
        .collect::<Vec<_>>()
        .join(", ")
}

/// 选项规则集合
#[derive(Clone, Default)]
pub struct OptionRules {
    defaults: OptionMap,
    validators: BTreeMap<String, Validator>,
    convertors: BTreeMap<String, Convertor>,
    required: Required,
}

impl OptionRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.insert(key.into(), value.into());
        self
    }

    pub fn with_defaults(mut self, defaults: OptionMap) -> Self {
        self.defaults.extend(defaults);
        self
    }

    pub fn with_validator(mut self, key: impl Into<String>, validator: Validator) -> Self {
        self.validators.insert(key.into(), validator);
        self
    }

    pub fn with_convertor(mut self, key: impl Into<String>, convertor: Convertor) -> Self {
        self.convertors.insert(key.into(), convertor);
        self
    }

    pub fn with_required(mut self, required: Required) -> Self {
        self.required = required;
        self
    }

    pub fn defaults(&self) -> &OptionMap {
        &self.defaults
    }

    pub fn required(&self) -> &Required {
        &self.required
    }

    /// 先对已存在的键执行校验器，再检查必填参数
    pub fn validate(&self, options: &OptionMap) -> Result<(), OptionsError> {
        for (key, validator) in &self.validators {
            if let Some(value) = options.get(key) {
                validator(value).map_err(|message| OptionsError::Validation {
                    option: key.clone(),
                    message,
                })?;
            }
        }
        self.required.check(options)
    }

    /// 原地转换所有已存在且配置了转换器的选项
    pub fn convert(&self, options: &mut OptionMap) {
        for (key, convertor) in &self.convertors {
            if let Some(value) = options.get_mut(key) {
                *value = convertor(value.take());
            }
        }
    }

    pub(crate) fn convert_value(&self, key: &str, value: Value) -> Value {
        match self.convertors.get(key) {
            Some(convertor) => convertor(value),
            None => value,
        }
    }
}

impl fmt::Debug for OptionRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionRules")
            .field("defaults", &self.defaults)
            .field("validators", &self.validators.keys().collect::<Vec<_>>())
            .field("convertors", &self.convertors.keys().collect::<Vec<_>>())
            .field("required", &self.required)
            .finish()
    }
}
