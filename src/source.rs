mod file;

pub use file::SourceFile;
