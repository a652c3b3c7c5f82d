use crate::EXIT_VALID;
use crate::driver::VerifyError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// `--json` 输出的校验结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub path: String,
    pub code: i32,
    /// 出错行，合法文件和 I/O 错误为 null
    pub line: Option<usize>,
    pub message: Option<String>,
}

impl Report {
    pub fn from_outcome(path: &Path, outcome: &Result<(), VerifyError>) -> Self {
        let path = path.to_string_lossy().to_string();
        match outcome {
            Ok(()) => Self {
                path,
                code: EXIT_VALID,
                line: None,
                message: None,
            },
            Err(err) => Self {
                path,
                code: err.code(),
                line: err.line(),
                message: Some(err.message()),
            },
        }
    }

    pub fn is_valid(&self) -> bool {
        self.code == EXIT_VALID
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
