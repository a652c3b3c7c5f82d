// src/lib.rs

pub mod analyzer;
pub mod grammar;
pub mod source;

pub mod driver;
pub mod report;

pub use analyzer::{SemanticError, SemanticErrorKind};
pub use driver::{Driver, VerifyError};
pub use report::Report;

use std::path::Path;

/// 退出码：文件合法
pub const EXIT_VALID: i32 = 0;
/// 退出码：文件不合法
pub const EXIT_INVALID: i32 = 1;
/// 退出码：文件无法读取
pub const EXIT_IO: i32 = 2;

/// 校验一段内存中的源码
pub fn verify_source(src: &str) -> Result<(), SemanticError> {
    let lines: Vec<&str> = src.lines().collect();
    Driver::new().verify_lines(&lines)
}

/// 校验磁盘上的文件
pub fn verify_file<P: AsRef<Path>>(path: P) -> Result<(), VerifyError> {
    Driver::new().verify_file(path.as_ref())
}
