//! Chapters Context - 章节节点
//!
//! 章节列表中的每一项要么是文件名，要么是“标题 -> 子节点”的单键映射。

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 章节节点
///
/// 不变量:
/// - 递归下降可达的每个叶子都是文件名
/// - 带标题的节点只有一个键（标题）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterNode {
    /// 无标题的章节文件
    Leaf(String),
    /// 带标题的章节或章节组
    Titled { title: String, child: ChapterChild },
}

/// 带标题节点的值
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterChild {
    /// 单个章节文件
    Leaf(String),
    /// 嵌套的章节列表
    Sequence(Vec<ChapterNode>),
}

impl ChapterNode {
    pub fn leaf(filename: impl Into<String>) -> Self {
        Self::Leaf(filename.into())
    }

    /// 带标题的单个章节文件
    pub fn titled(title: impl Into<String>, filename: impl Into<String>) -> Self {
        Self::Titled {
            title: title.into(),
            child: ChapterChild::Leaf(filename.into()),
        }
    }

    /// 带标题的章节组
    pub fn group(title: impl Into<String>, children: Vec<ChapterNode>) -> Self {
        Self::Titled {
            title: title.into(),
            child: ChapterChild::Sequence(children),
        }
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Leaf(_) => None,
            Self::Titled { title, .. } => Some(title),
        }
    }
}

impl From<&str> for ChapterNode {
    fn from(filename: &str) -> Self {
        Self::Leaf(filename.to_string())
    }
}

impl From<String> for ChapterNode {
    fn from(filename: String) -> Self {
        Self::Leaf(filename)
    }
}

impl Serialize for ChapterNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Leaf(filename) => serializer.serialize_str(filename),
            Self::Titled { title, child } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(title, child)?;
                map.end()
            }
        }
    }
}

impl Serialize for ChapterChild {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Leaf(filename) => serializer.serialize_str(filename),
            Self::Sequence(children) => children.serialize(serializer),
        }
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = ChapterNode;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a chapter filename or a single-key mapping from title to chapters")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ChapterNode, E> {
        Ok(ChapterNode::Leaf(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<ChapterNode, E> {
        Ok(ChapterNode::Leaf(v))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<ChapterNode, A::Error> {
        let Some((title, child)) = map.next_entry::<String, ChapterChild>()? else {
            return Err(de::Error::custom("titled chapter mapping has no key"));
        };

        if let Some(extra) = map.next_key::<String>()? {
            return Err(de::Error::custom(format!(
                "titled chapter mapping must have exactly one key, found `{}` and `{}`",
                title, extra
            )));
        }

        Ok(ChapterNode::Titled { title, child })
    }
}

impl<'de> Deserialize<'de> for ChapterNode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct ChildVisitor;

impl<'de> Visitor<'de> for ChildVisitor {
    type Value = ChapterChild;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a chapter filename or a list of chapters")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<ChapterChild, E> {
        Ok(ChapterChild::Leaf(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<ChapterChild, E> {
        Ok(ChapterChild::Leaf(v))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ChapterChild, A::Error> {
        let mut children = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(node) = seq.next_element::<ChapterNode>()? {
            children.push(node);
        }
        Ok(ChapterChild::Sequence(children))
    }
}

impl<'de> Deserialize<'de> for ChapterChild {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ChildVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Result<Vec<ChapterNode>, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    #[test]
    fn test_parse_leaf_and_titled() {
        let nodes = parse("- index.md\n- Intro: intro.md\n").unwrap();
        assert_eq!(
            nodes,
            vec![
                ChapterNode::leaf("index.md"),
                ChapterNode::titled("Intro", "intro.md"),
            ]
        );
    }

    #[test]
    fn test_parse_nested_group() {
        let yaml = "- Guide:\n    - a.md\n    - Deep:\n        - b.md\n";
        let nodes = parse(yaml).unwrap();
        assert_eq!(
            nodes,
            vec![ChapterNode::group(
                "Guide",
                vec![
                    ChapterNode::leaf("a.md"),
                    ChapterNode::group("Deep", vec![ChapterNode::leaf("b.md")]),
                ]
            )]
        );
    }

    #[test]
    fn test_title_preserves_case() {
        let nodes = parse("- Quick Start: qs.md\n").unwrap();
        assert_eq!(nodes[0].title(), Some("Quick Start"));
    }

    #[test]
    fn test_reject_mapping_with_two_keys() {
        let err = parse("- A: a.md\n  B: b.md\n").unwrap_err();
        assert!(err.to_string().contains("exactly one key"));
    }

    #[test]
    fn test_reject_empty_mapping() {
        assert!(parse("- {}\n").is_err());
    }

    #[test]
    fn test_reject_non_string_leaf() {
        assert!(parse("- 42\n").is_err());
        assert!(parse("- Title: 42\n").is_err());
        assert!(parse("- Title: ~\n").is_err());
        assert!(parse("- Title:\n    - true\n").is_err());
    }

    #[test]
    fn test_reject_mapping_as_child() {
        assert!(parse("- Outer:\n    Inner: a.md\n").is_err());
    }

    #[test]
    fn test_serialize_keeps_shape() {
        let nodes = vec![
            ChapterNode::leaf("a.md"),
            ChapterNode::group("G", vec![ChapterNode::titled("T", "b.md")]),
        ];
        let json = serde_json::to_string(&nodes).unwrap();
        assert_eq!(json, r#"["a.md",{"G":[{"T":"b.md"}]}]"#);

        let back: Vec<ChapterNode> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, nodes);
    }

    #[test]
    fn test_parse_from_toml() {
        #[derive(Deserialize)]
        struct Doc {
            chapters: Vec<ChapterNode>,
        }

        let doc: Doc =
            toml::from_str(r#"chapters = ["a.md", { Requirements = "req.md" }]"#).unwrap();
        assert_eq!(
            doc.chapters,
            vec![
                ChapterNode::leaf("a.md"),
                ChapterNode::titled("Requirements", "req.md"),
            ]
        );
    }
}
