use super::Fragment;
use regex::Regex;
use std::sync::LazyLock;

/// 一次成功的前缀匹配
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'t> {
    /// 从文本开头算起被消耗的字节数
    pub len: usize,
    captures: Vec<(&'static str, &'t str)>,
}

impl<'t> Match<'t> {
    pub fn new(len: usize, captures: Vec<(&'static str, &'t str)>) -> Self {
        Self { len, captures }
    }

    /// 取具名捕获，未参与匹配的组返回 None
    pub fn get(&self, name: &str) -> Option<&'t str> {
        self.captures
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, text)| *text)
    }

    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// 模式匹配协作者
/// 分析器从不自己切字符串，只问 "这段文本是否以片段 G 开头 / 是否整体就是 G"
pub trait Matcher {
    fn match_prefix<'t>(&self, fragment: Fragment, text: &'t str) -> Option<Match<'t>>;

    fn matches(&self, fragment: Fragment, text: &str) -> bool;
}

struct Compiled {
    prefix: Regex,
    exact: Regex,
}

// 片段表是静态的，编译失败只可能是片段源码写错
static TABLE: LazyLock<Vec<Compiled>> = LazyLock::new(|| {
    Fragment::ALL
        .iter()
        .map(|fragment| {
            let source = fragment.pattern();
            Compiled {
                prefix: Regex::new(&format!("^(?:{})", source))
                    .expect("grammar fragment must compile"),
                exact: Regex::new(&format!("^(?:{})$", source))
                    .expect("grammar fragment must compile"),
            }
        })
        .collect()
});

/// 基于 regex crate 的默认实现
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexMatcher;

impl RegexMatcher {
    pub fn new() -> Self {
        Self
    }

    fn compiled(fragment: Fragment) -> &'static Compiled {
        &TABLE[fragment.index()]
    }
}

impl Matcher for RegexMatcher {
    fn match_prefix<'t>(&self, fragment: Fragment, text: &'t str) -> Option<Match<'t>> {
        let regex = &Self::compiled(fragment).prefix;
        let caps = regex.captures(text)?;
        let whole = caps.get(0)?;

        let captures = regex
            .capture_names()
            .flatten()
            .filter_map(|name| caps.name(name).map(|m| (name, m.as_str())))
            .collect();

        Some(Match::new(whole.end(), captures))
    }

    fn matches(&self, fragment: Fragment, text: &str) -> bool {
        Self::compiled(fragment).exact.is_match(text)
    }
}
