//! Options Context - 预处理器选项
//!
//! 职责:
//! - 带默认值、校验器、转换器和必填检查的选项集合
//! - 多来源选项按优先级合并
//! - 常用校验器与转换器

mod base;
mod combined;
mod convertors;
mod errors;
mod rules;
mod validators;

pub use base::Options;
pub use combined::CombinedOptions;
pub use convertors::{boolean_convertor, path_convertor, rel_path_convertor};
pub use errors::OptionsError;
pub use rules::{Convertor, OptionMap, OptionRules, Required, Validator};
pub use validators::{val_type, validate_exists, validate_in, ValueKind};
