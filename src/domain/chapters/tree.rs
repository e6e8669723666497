//! 章节树遍历
//!
//! 深度优先、先序遍历嵌套章节列表：
//! - 文件名节点直接输出
//! - 带标题节点递归进入其唯一的值

use std::path::{Path, PathBuf};
use std::slice;

use super::{ChapterChild, ChapterError, ChapterNode};

/// 章节列表的惰性先序迭代器
///
/// 每次调用 [`filenames`] 都会得到一个从头开始的新迭代器。
#[derive(Debug, Clone)]
pub struct Filenames<'a> {
    stack: Vec<slice::Iter<'a, ChapterNode>>,
}

impl<'a> Iterator for Filenames<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        while let Some(level) = self.stack.last_mut() {
            match level.next() {
                None => {
                    self.stack.pop();
                }
                Some(ChapterNode::Leaf(filename)) => return Some(filename),
                Some(ChapterNode::Titled { child, .. }) => match child {
                    ChapterChild::Leaf(filename) => return Some(filename),
                    ChapterChild::Sequence(children) => self.stack.push(children.iter()),
                },
            }
        }
        None
    }
}

/// 按先序惰性遍历所有章节文件名
pub fn filenames(nodes: &[ChapterNode]) -> Filenames<'_> {
    Filenames {
        stack: vec![nodes.iter()],
    }
}

/// 将嵌套章节列表展开为有序文件名列表
pub fn flatten(nodes: &[ChapterNode]) -> Vec<String> {
    filenames(nodes).map(str::to_string).collect()
}

/// 将每个章节文件名拼接到 `root` 下，惰性产出且保持顺序
pub fn resolve_paths<'a>(
    nodes: &'a [ChapterNode],
    root: impl AsRef<Path> + 'a,
) -> impl Iterator<Item = PathBuf> + 'a {
    filenames(nodes).map(move |filename| root.as_ref().join(filename))
}

pub fn contains(nodes: &[ChapterNode], filename: &str) -> bool {
    filenames(nodes).any(|name| name == filename)
}

/// 展开后第 `index` 个章节文件名
pub fn index(nodes: &[ChapterNode], index: usize) -> Result<String, ChapterError> {
    let mut len = 0;
    for (position, filename) in filenames(nodes).enumerate() {
        if position == index {
            return Ok(filename.to_string());
        }
        len = position + 1;
    }
    Err(ChapterError::IndexOutOfRange { index, len })
}

/// 章节在列表中的定义方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Located<'a> {
    /// 以 `标题: 文件名` 形式定义
    Titled(&'a str),
    /// 以裸文件名形式定义
    Untitled,
}

/// 深度优先查找章节的定义位置
///
/// 返回第一个匹配：直接值等于 `target` 的带标题节点，或等于 `target` 的裸文件名。
pub fn find_chapter<'a>(nodes: &'a [ChapterNode], target: &str) -> Option<Located<'a>> {
    nodes.iter().find_map(|node| find_in_node(node, target))
}

fn find_in_node<'a>(node: &'a ChapterNode, target: &str) -> Option<Located<'a>> {
    match node {
        ChapterNode::Leaf(filename) => (filename == target).then_some(Located::Untitled),
        ChapterNode::Titled { title, child } => match child {
            ChapterChild::Leaf(filename) => (filename == target).then_some(Located::Titled(title)),
            ChapterChild::Sequence(children) => find_chapter(children, target),
        },
    }
}

/// 章节标题；裸文件名或未找到时返回空字符串
pub fn title_of(nodes: &[ChapterNode], target: &str) -> String {
    match find_chapter(nodes, target) {
        Some(Located::Titled(title)) => title.to_string(),
        Some(Located::Untitled) | None => String::new(),
    }
}
