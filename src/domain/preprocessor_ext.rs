//! 预处理器扩展工具
//!
//! 面向以正则匹配标签并改写的预处理器：
//! - 截取标签周围的上下文，用于日志定位
//! - 处理失败时记录警告并保留原文

use std::fmt;
use std::ops::Range;

/// 上下文默认保留的字符数
pub const DEFAULT_CONTEXT_LIMIT: usize = 100;

/// 处理失败时的默认提示
pub const DEFAULT_FAIL_MESSAGE: &str = "Failed to process tag. Skipping.";

/// 源文本中被匹配到的标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagMatch<'h> {
    source: &'h str,
    start: usize,
    end: usize,
}

impl<'h> TagMatch<'h> {
    /// 以字节区间构造，区间越界或不在字符边界上时返回 `None`
    pub fn new(source: &'h str, range: Range<usize>) -> Option<Self> {
        source.get(range.clone())?;
        Some(Self {
            source,
            start: range.start,
            end: range.end,
        })
    }

    /// `m` 必须来自 `source` 上的匹配
    pub fn from_regex(source: &'h str, m: regex::Match<'h>) -> Self {
        Self {
            source,
            start: m.start(),
            end: m.end(),
        }
    }

    pub fn source(&self) -> &'h str {
        self.source
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// 标签原文
    pub fn as_str(&self) -> &'h str {
        &self.source[self.start..self.end]
    }

    pub fn context(&self, limit: usize, full_tag: bool) -> String {
        get_tag_context(self, limit, full_tag)
    }
}

/// 标签及其前后各至多 `limit` 个字符
///
/// 两侧被截断时分别补 `...`。标签本身超过 `limit` 且 `full_tag` 为 false 时，
/// 只保留首尾各约 `limit / 2` 个字符，中间以 ` <...> ` 连接。
pub fn get_tag_context(tag: &TagMatch<'_>, limit: usize, full_tag: bool) -> String {
    let before = &tag.source[..tag.start];
    let after = &tag.source[tag.end..];
    let text = tag.as_str();

    let before_len = before.chars().count();
    let after_len = after.chars().count();
    let text_len = text.chars().count();

    let mut context = String::new();
    if before_len > limit {
        context.push_str("...");
    }
    context.extend(before.chars().skip(before_len.saturating_sub(limit)));

    if full_tag || text_len <= limit {
        context.push_str(text);
    } else {
        let tail = (limit + 1) / 2;
        context.extend(text.chars().take(limit / 2));
        context.push_str(" <...> ");
        context.extend(text.chars().skip(text_len - tail));
    }

    context.extend(after.chars().take(limit));
    if after_len > limit {
        context.push_str("...");
    }
    context
}

/// 执行可能失败的处理步骤，失败时记录警告并返回 `None`
pub fn allow_fail<T, E, F>(msg: &str, step: F) -> Option<T>
where
    E: fmt::Display,
    F: FnOnce() -> Result<T, E>,
{
    match step() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("{} {}", msg, e);
            None
        }
    }
}

/// 执行标签改写，失败时记录带上下文的警告并返回标签原文
pub fn allow_fail_tag<'h, E, F>(msg: &str, tag: &TagMatch<'h>, step: F) -> String
where
    E: fmt::Display,
    F: FnOnce(&TagMatch<'h>) -> Result<String, E>,
{
    match step(tag) {
        Ok(rewritten) => rewritten,
        Err(e) => {
            tracing::warn!(
                context = %tag.context(DEFAULT_CONTEXT_LIMIT, false),
                "{} {}",
                msg,
                e
            );
            tag.as_str().to_string()
        }
    }
}
