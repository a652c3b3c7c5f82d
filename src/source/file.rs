use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// 一个已完整读入内存的源文件
/// 分析开始前所有行都已经就绪，分析过程中不再做任何 I/O
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub name: String,
    pub lines: Vec<String>,
}

impl SourceFile {
    pub fn new(path: PathBuf, src: &str) -> Self {
        // str::lines 同时处理 \n 和 \r\n，不做其他预处理 (不拼接续行)
        let lines = src.lines().map(str::to_string).collect();
        let name = path.to_string_lossy().to_string();

        Self { path, name, lines }
    }

    /// 读取磁盘上的文件
    /// 只有读不出来才算错误，非法的 UTF-8 字节替换成 U+FFFD
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        Ok(Self::new(path.to_path_buf(), &String::from_utf8_lossy(&bytes)))
    }

    /// 按 1 起始的行号取一行
    pub fn line(&self, number: usize) -> Option<&str> {
        let index = number.checked_sub(1)?;
        self.lines.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
