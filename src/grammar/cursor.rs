use super::{Fragment, Match, Matcher};

/// 在一行文本上 "匹配即前进" 的游标
/// Copy 语义：回溯时只需保存一份旧游标
#[derive(Clone, Copy)]
pub struct Cursor<'t, 'm> {
    rest: &'t str,
    matcher: &'m dyn Matcher,
}

impl<'t, 'm> Cursor<'t, 'm> {
    pub fn new(text: &'t str, matcher: &'m dyn Matcher) -> Self {
        Self { rest: text, matcher }
    }

    /// 尚未消耗的文本
    pub fn rest(&self) -> &'t str {
        self.rest
    }

    pub fn peek(&self, fragment: Fragment) -> bool {
        self.matcher.match_prefix(fragment, self.rest).is_some()
    }

    /// 匹配成功则越过匹配到的部分
    pub fn eat(&mut self, fragment: Fragment) -> Option<Match<'t>> {
        let m = self.matcher.match_prefix(fragment, self.rest)?;
        self.rest = &self.rest[m.len..];
        Some(m)
    }

    /// 剩余文本是否整体就是该片段
    pub fn finish(&self, fragment: Fragment) -> bool {
        self.matcher.matches(fragment, self.rest)
    }

    /// 只剩空白
    pub fn at_end(&self) -> bool {
        self.finish(Fragment::Blank)
    }
}
