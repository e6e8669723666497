//! Chapters Context - Aggregate Root

use std::fmt;
use std::ops::Index;
use std::path::{Component, Path, PathBuf};

use super::tree::{self, Located};
use super::{ChapterError, ChapterNode};
use crate::config::ProjectConfig;

/// Chapters 聚合根
///
/// 持有项目配置中的嵌套章节列表，并缓存其展开结果。
///
/// 不变量:
/// - `flat` 始终等于 `flatten(chapters)`，替换章节列表时同步重建
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapters {
    chapters: Vec<ChapterNode>,
    flat: Vec<String>,
    working_dir: Option<PathBuf>,
    src_dir: Option<PathBuf>,
}

impl Chapters {
    pub fn new(chapters: Vec<ChapterNode>) -> Self {
        let flat = tree::flatten(&chapters);
        Self {
            chapters,
            flat,
            working_dir: None,
            src_dir: None,
        }
    }

    /// 从项目配置创建（临时目录作为工作目录）
    pub fn from_config(config: &ProjectConfig) -> Self {
        Self::new(config.chapters.clone())
            .with_working_dir(&config.tmp_dir)
            .with_src_dir(&config.src_dir)
    }

    /// 工作目录在构造时解析为绝对路径
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(resolve_dir(dir.into()));
        self
    }

    /// 源目录在构造时解析为绝对路径
    pub fn with_src_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.src_dir = Some(resolve_dir(dir.into()));
        self
    }

    /// 原始嵌套章节列表
    pub fn chapters(&self) -> &[ChapterNode] {
        &self.chapters
    }

    /// 整体替换章节列表
    pub fn set_chapters(&mut self, chapters: Vec<ChapterNode>) {
        self.flat = tree::flatten(&chapters);
        self.chapters = chapters;
        tracing::debug!("Chapter list replaced: {} files", self.flat.len());
    }

    /// 展开后的章节文件名列表
    pub fn flat(&self) -> &[String] {
        &self.flat
    }

    pub fn len(&self) -> usize {
        self.flat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flat.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.flat.get(index).map(String::as_str)
    }

    pub fn index(&self, index: usize) -> Result<&str, ChapterError> {
        self.get(index).ok_or(ChapterError::IndexOutOfRange {
            index,
            len: self.flat.len(),
        })
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.flat.iter().any(|name| name == filename)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.flat.iter().map(String::as_str)
    }

    pub fn working_dir(&self) -> Option<&Path> {
        self.working_dir.as_deref()
    }

    pub fn src_dir(&self) -> Option<&Path> {
        self.src_dir.as_deref()
    }

    /// 章节文件相对 `parent_dir` 的路径，惰性产出
    pub fn paths<'a>(
        &'a self,
        parent_dir: impl AsRef<Path> + 'a,
    ) -> impl Iterator<Item = PathBuf> + 'a {
        self.flat
            .iter()
            .map(move |filename| parent_dir.as_ref().join(filename))
    }

    /// 章节标题
    ///
    /// 章节以裸文件名定义或不在列表中时返回空字符串。
    pub fn title_of(&self, chapter_path: &str) -> String {
        tree::title_of(&self.chapters, chapter_path)
    }

    /// 章节标题（严格模式）
    ///
    /// 与 [`Chapters::title_of`] 不同，章节不在列表中时返回 `NotFound`。
    ///
    /// ```yaml
    /// chapters:
    ///     - Chapter Title: info/index.md   # -> "Chapter Title"
    ///     - info/other.md                  # -> ""
    /// ```
    pub fn chapter_title(&self, chapter_path: &str) -> Result<String, ChapterError> {
        match tree::find_chapter(&self.chapters, chapter_path) {
            Some(Located::Titled(title)) => Ok(title.to_string()),
            Some(Located::Untitled) => Ok(String::new()),
            None => Err(ChapterError::NotFound(chapter_path.to_string())),
        }
    }

    /// 根据文件路径查找章节
    ///
    /// `filepath` 位于工作目录或源目录下时，返回其相对路径（即章节列表中的写法）。
    /// 两个目录都匹配时以源目录为准。无法读取当前目录时返回 `Io`。
    pub fn chapter_by_path(&self, filepath: impl AsRef<Path>) -> Result<String, ChapterError> {
        let filepath = filepath.as_ref();
        let not_found = || ChapterError::NotFound(filepath.display().to_string());

        let abs_path = absolutize(filepath).map_err(|e| io_error(filepath, e))?;

        let mut chapter_path = None;
        for dir in [&self.working_dir, &self.src_dir].into_iter().flatten() {
            let dir = absolutize(dir).map_err(|e| io_error(dir, e))?;
            if let Some(relative) = relative_to(&abs_path, &dir) {
                chapter_path = Some(relative);
            }
        }

        match chapter_path {
            Some(path) if self.contains(&path) => Ok(path),
            _ => {
                tracing::debug!("No chapter for path {}", filepath.display());
                Err(not_found())
            }
        }
    }
}

impl Index<usize> for Chapters {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.flat[index]
    }
}

impl<'a> IntoIterator for &'a Chapters {
    type Item = &'a str;
    type IntoIter = std::iter::Map<std::slice::Iter<'a, String>, fn(&'a String) -> &'a str>;

    fn into_iter(self) -> Self::IntoIter {
        self.flat.iter().map(String::as_str as fn(&'a String) -> &'a str)
    }
}

impl From<Vec<ChapterNode>> for Chapters {
    fn from(chapters: Vec<ChapterNode>) -> Self {
        Self::new(chapters)
    }
}

impl fmt::Display for Chapters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nested = serde_json::to_string(&self.chapters).map_err(|_| fmt::Error)?;
        write!(f, "Chapters({})", nested)
    }
}

fn resolve_dir(dir: PathBuf) -> PathBuf {
    match absolutize(&dir) {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::warn!("Cannot resolve {}: {}", dir.display(), e);
            dir
        }
    }
}

fn io_error(path: &Path, err: std::io::Error) -> ChapterError {
    tracing::warn!("Cannot resolve {}: {}", path.display(), err);
    ChapterError::Io(format!("{}: {}", path.display(), err))
}

/// 转为绝对路径并按词法规整 `.` 与 `..`
fn absolutize(path: &Path) -> std::io::Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

/// `path` 严格位于 `dir` 之下时，返回以 `/` 分隔的相对路径
fn relative_to(path: &Path, dir: &Path) -> Option<String> {
    let relative = path.strip_prefix(dir).ok()?;
    if relative.as_os_str().is_empty() {
        return None;
    }

    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chapters::tree::tests::sample_chapters;

    fn chapters() -> Chapters {
        Chapters::new(sample_chapters())
    }

    #[test]
    fn test_flat_and_len() {
        let chapters = chapters();
        assert_eq!(chapters.len(), 8);
        assert!(!chapters.is_empty());
        assert_eq!(chapters.flat()[2], "req.md");
        assert_eq!(&chapters[7], "specs/classes.md");
    }

    #[test]
    fn test_get_and_index() {
        let chapters = chapters();
        assert_eq!(chapters.get(0), Some("introduction.md"));
        assert_eq!(chapters.get(100), None);
        assert_eq!(chapters.index(1), Ok("problem.md"));
        assert_eq!(
            chapters.index(8),
            Err(ChapterError::IndexOutOfRange { index: 8, len: 8 })
        );
    }

    #[test]
    #[should_panic]
    fn test_index_operator_panics_out_of_range() {
        let chapters = chapters();
        let _ = &chapters[8];
    }

    #[test]
    fn test_contains() {
        let chapters = chapters();
        assert!(chapters.contains("req.md"));
        assert!(!chapters.contains("missing.md"));
    }

    #[test]
    fn test_iteration_matches_flat() {
        let chapters = chapters();
        let by_iter: Vec<&str> = chapters.iter().collect();
        let by_ref: Vec<&str> = (&chapters).into_iter().collect();
        assert_eq!(by_iter, chapters.flat());
        assert_eq!(by_iter, by_ref);

        let mut count = 0;
        for _ in &chapters {
            count += 1;
        }
        assert_eq!(count, 8);
    }

    #[test]
    fn test_set_chapters_refreshes_flat() {
        let mut chapters = chapters();
        chapters.set_chapters(vec![
            ChapterNode::leaf("new.md"),
            ChapterNode::titled("Other", "other.md"),
        ]);

        assert_eq!(chapters.flat(), ["new.md", "other.md"]);
        assert!(!chapters.contains("req.md"));
        assert_eq!(chapters.title_of("other.md"), "Other");
        assert_eq!(chapters.title_of("req.md"), "");
    }

    #[test]
    fn test_paths() {
        let chapters = chapters();
        let paths: Vec<PathBuf> = chapters.paths("src").collect();
        assert_eq!(paths.len(), 8);
        assert_eq!(paths[0], PathBuf::from("src/introduction.md"));
        assert_eq!(paths[7], PathBuf::from("src/specs/classes.md"));
    }

    #[test]
    fn test_title_lookup() {
        let chapters = chapters();
        assert_eq!(chapters.title_of("req.md"), "Requirements");
        assert_eq!(chapters.title_of("qs/first_steps.md"), "");
        assert_eq!(chapters.title_of("missing.md"), "");

        assert_eq!(chapters.chapter_title("req.md"), Ok("Requirements".to_string()));
        assert_eq!(chapters.chapter_title("qs/first_steps.md"), Ok(String::new()));
        assert_eq!(
            chapters.chapter_title("missing.md"),
            Err(ChapterError::NotFound("missing.md".to_string()))
        );
    }

    #[test]
    fn test_chapter_by_path_in_src_dir() {
        let chapters = chapters().with_src_dir("/project/src");
        assert_eq!(
            chapters.chapter_by_path("/project/src/qs/first_steps.md"),
            Ok("qs/first_steps.md".to_string())
        );
        assert_eq!(
            chapters.chapter_by_path("/project/src/qs/../req.md"),
            Ok("req.md".to_string())
        );
    }

    #[test]
    fn test_chapter_by_path_in_working_dir() {
        let chapters = chapters()
            .with_working_dir("/project/__tmp__")
            .with_src_dir("/project/src");
        assert_eq!(
            chapters.chapter_by_path("/project/__tmp__/specs/core.md"),
            Ok("specs/core.md".to_string())
        );
    }

    #[test]
    fn test_chapter_by_path_relative_dirs() {
        let cwd = std::env::current_dir().unwrap();
        let chapters = chapters().with_src_dir("src");
        assert_eq!(
            chapters.chapter_by_path(cwd.join("src").join("req.md")),
            Ok("req.md".to_string())
        );
        assert_eq!(
            chapters.chapter_by_path("src/./req.md"),
            Ok("req.md".to_string())
        );
    }

    #[test]
    fn test_chapter_by_path_not_found() {
        let chapters = chapters().with_src_dir("/project/src");
        assert!(matches!(
            chapters.chapter_by_path("/project/src/missing.md"),
            Err(ChapterError::NotFound(_))
        ));
        assert!(matches!(
            chapters.chapter_by_path("/elsewhere/req.md"),
            Err(ChapterError::NotFound(_))
        ));
        assert!(matches!(
            chapters.chapter_by_path("/project/src"),
            Err(ChapterError::NotFound(_))
        ));
    }

    #[test]
    fn test_chapter_by_path_without_dirs() {
        assert!(chapters().chapter_by_path("/project/src/req.md").is_err());
    }

    #[test]
    fn test_display() {
        let chapters = Chapters::new(vec![
            ChapterNode::leaf("a.md"),
            ChapterNode::titled("B", "b.md"),
        ]);
        assert_eq!(chapters.to_string(), r#"Chapters(["a.md",{"B":"b.md"}])"#);
    }

    #[test]
    fn test_from_config() {
        let config = ProjectConfig {
            chapters: sample_chapters(),
            ..ProjectConfig::default()
        };
        let cwd = std::env::current_dir().unwrap();
        let chapters = Chapters::from_config(&config);
        assert_eq!(chapters.len(), 8);
        assert_eq!(chapters.working_dir(), Some(cwd.join(&config.tmp_dir).as_path()));
        assert_eq!(chapters.src_dir(), Some(cwd.join(&config.src_dir).as_path()));
    }

    #[test]
    fn test_dirs_resolved_at_construction() {
        let cwd = std::env::current_dir().unwrap();
        let chapters = chapters()
            .with_working_dir("build/./tmp/..")
            .with_src_dir("/project/docs/../src");

        let working_dir = chapters.working_dir().unwrap();
        assert!(working_dir.is_absolute());
        assert_eq!(working_dir, cwd.join("build"));
        assert_eq!(chapters.src_dir(), Some(Path::new("/project/src")));
    }

    #[test]
    fn test_io_error_keeps_cause() {
        let err = io_error(
            Path::new("docs"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "cwd removed"),
        );
        assert_eq!(err, ChapterError::Io("docs: cwd removed".to_string()));
        assert!(err.to_string().contains("cwd removed"));
    }
}
