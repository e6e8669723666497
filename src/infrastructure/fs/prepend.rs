//! Markdown 章节文件前插内容

use std::fs;
use std::io;
use std::path::Path;

const FRONT_MATTER_OPEN: &str = "---\n";
const FRONT_MATTER_CLOSE: &str = "\n---\n";

/// 插入位置选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrependOptions {
    /// 文件以 YAML Front Matter 开头时，插入到其之前
    pub before_yfm: bool,
    /// 文件以标题开头时，插入到标题之前
    pub before_heading: bool,
}

impl Default for PrependOptions {
    fn default() -> Self {
        Self {
            before_yfm: false,
            before_heading: true,
        }
    }
}

/// 在 `source` 开头插入 `content`
///
/// 跳过 Front Matter 或首行标题时，会在内容前补一个换行，避免与前文粘连。
pub fn prepend_source(source: &str, content: &str, options: PrependOptions) -> String {
    let mut start = 0;
    let mut content = content.to_string();

    if !options.before_yfm && source.starts_with(FRONT_MATTER_OPEN) {
        start = source[1..]
            .find(FRONT_MATTER_CLOSE)
            .map_or(0, |end| end + 1 + FRONT_MATTER_CLOSE.len());
        content.insert(0, '\n');
    }

    if !options.before_heading && source.starts_with('#') {
        start = source[1..]
            .find('\n')
            .map_or(source.len(), |newline| newline + 2);
        content.insert(0, '\n');
    }

    let mut result = String::with_capacity(source.len() + content.len());
    result.push_str(&source[..start]);
    result.push_str(&content);
    result.push_str(&source[start..]);
    result
}

/// 在文件开头插入内容（UTF-8 读写）
pub fn prepend_file(
    path: impl AsRef<Path>,
    content: &str,
    options: PrependOptions,
) -> io::Result<()> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)?;
    let processed = prepend_source(&source, content, options);
    fs::write(path, processed)?;

    tracing::debug!(
        "Prepended {} bytes to {}",
        content.len(),
        path.display()
    );

    Ok(())
}
