use super::errors::SemanticErrorKind;
use super::verifier::VariableVerifier;
use super::Kind;
use crate::grammar::{Cursor, Fragment, Matcher};

/// 带条件的块头
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionKind {
    If,
    While,
}

impl ConditionKind {
    /// 识别 `if (` / `while (` 开头的行
    pub fn detect(line: &str, matcher: &dyn Matcher) -> Option<Self> {
        [ConditionKind::If, ConditionKind::While]
            .into_iter()
            .find(|kind| matcher.match_prefix(kind.opener(), line).is_some())
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            ConditionKind::If => "if",
            ConditionKind::While => "while",
        }
    }

    fn opener(&self) -> Fragment {
        match self {
            ConditionKind::If => Fragment::IfOpen,
            ConditionKind::While => Fragment::WhileOpen,
        }
    }

    fn malformed(&self) -> SemanticErrorKind {
        SemanticErrorKind::MalformedCondition(self.keyword())
    }
}

/// 校验 `if (c1 && c2 || c3) {` 这样的块头
/// 每个操作数都必须能当作 boolean 使用
pub fn validate_condition(
    line: &str,
    kind: ConditionKind,
    verifier: &VariableVerifier,
) -> Result<(), SemanticErrorKind> {
    let mut cursor = Cursor::new(line, verifier.matcher());
    cursor.eat(kind.opener()).ok_or_else(|| kind.malformed())?;

    loop {
        let operand = cursor
            .eat(Fragment::Operand)
            .and_then(|m| m.get("value"))
            .ok_or_else(|| kind.malformed())?;
        verifier.usage_check(Kind::Bool, operand)?;

        if cursor.eat(Fragment::Operator).is_none() {
            break;
        }
    }

    if cursor.finish(Fragment::HeaderClose) {
        Ok(())
    } else {
        Err(kind.malformed())
    }
}
