mod cursor;
mod fragment;
mod matcher;

pub use cursor::Cursor;
pub use fragment::Fragment;
pub use matcher::{Match, Matcher, RegexMatcher};

/// 空行，或从第一列开始的 `//` 注释行
pub fn is_blank_or_comment(line: &str, matcher: &dyn Matcher) -> bool {
    matcher.matches(Fragment::Blank, line) || matcher.match_prefix(Fragment::Comment, line).is_some()
}

/// 值是否在引用一个变量 (合法标识符，且不是 true/false)
pub fn names_variable(value: &str, matcher: &dyn Matcher) -> bool {
    matcher.matches(Fragment::Identifier, value) && !matcher.matches(Fragment::BoolKeyword, value)
}
