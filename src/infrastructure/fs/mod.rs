//! 文件系统辅助

mod prepend;

pub use prepend::{prepend_file, prepend_source, PrependOptions};
