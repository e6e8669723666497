//! 组合选项
//!
//! 将多个来源（如项目配置、预处理器配置、标签属性）的选项合并为一个 [`Options`]。
//!
//! 合并顺序（后者覆盖前者）：
//! 1. 默认值
//! 2. 不在优先级列表中的来源，靠前的来源优先
//! 3. 优先级列表中的来源，靠前的优先级最高

use std::ops::Deref;

use super::{OptionMap, OptionRules, Options, OptionsError};

#[derive(Debug, Clone)]
pub struct CombinedOptions {
    sources: Vec<(String, OptionMap)>,
    priority: Vec<String>,
    rules: OptionRules,
    active: Options,
}

impl CombinedOptions {
    pub fn new<I, S>(
        sources: Vec<(String, OptionMap)>,
        priority: I,
        rules: OptionRules,
    ) -> Result<Self, OptionsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let priority = check_priority(&sources, priority)?;
        let active = combine(&sources, &priority, &rules)?;

        Ok(Self {
            sources,
            priority,
            rules,
            active,
        })
    }

    pub fn priority(&self) -> &[String] {
        &self.priority
    }

    /// 设置新的优先级并重新合并；失败时保持原状态
    pub fn set_priority<I, S>(&mut self, priority: I) -> Result<(), OptionsError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let priority = check_priority(&self.sources, priority)?;
        let active = combine(&self.sources, &priority, &self.rules)?;

        tracing::debug!("Options priority changed to {:?}", priority);

        self.priority = priority;
        self.active = active;
        Ok(())
    }

    pub fn source_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.sources.iter().map(|(name, _)| name.as_str())
    }

    pub fn source(&self, name: &str) -> Option<&OptionMap> {
        self.sources
            .iter()
            .find(|(source, _)| source == name)
            .map(|(_, options)| options)
    }

    /// 当前生效的合并结果
    pub fn options(&self) -> &Options {
        &self.active
    }
}

impl Deref for CombinedOptions {
    type Target = Options;

    fn deref(&self) -> &Options {
        &self.active
    }
}

fn check_priority<I, S>(
    sources: &[(String, OptionMap)],
    priority: I,
) -> Result<Vec<String>, OptionsError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let priority: Vec<String> = priority.into_iter().map(Into::into).collect();

    for value in &priority {
        if !sources.iter().any(|(name, _)| name == value) {
            let allowed = sources
                .iter()
                .map(|(name, _)| name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(OptionsError::UnknownPriority {
                value: value.clone(),
                allowed,
            });
        }
    }

    Ok(priority)
}

fn combine(
    sources: &[(String, OptionMap)],
    priority: &[String],
    rules: &OptionRules,
) -> Result<Options, OptionsError> {
    let mut merged = OptionMap::new();

    for (name, options) in sources.iter().rev() {
        if !priority.contains(name) {
            merged.extend(options.clone());
        }
    }

    for name in priority.iter().rev() {
        if let Some((_, options)) = sources.iter().find(|(source, _)| source == name) {
            merged.extend(options.clone());
        }
    }

    Options::new(merged, rules.clone())
}
