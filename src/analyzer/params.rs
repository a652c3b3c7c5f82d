use super::errors::SemanticErrorKind;
use crate::grammar::{Cursor, Fragment, Match};

/// 解析 `(` 之后的参数表：`(param ,)* param? ) <terminator>`
/// 方法声明用 DeclParam + `{`，调用用 CallParam + `;`
/// 返回每个参数的匹配结果，游标停在行尾
pub fn parse_list<'t>(
    cursor: &mut Cursor<'t, '_>,
    param: Fragment,
    terminator: Fragment,
) -> Result<Vec<Match<'t>>, SemanticErrorKind> {
    let mut params = Vec::new();
    let mut dangling_comma = false;

    // 1. 贪心吃掉 `param ,`
    loop {
        let mut probe = *cursor;
        let Some(found) = probe.eat(param) else {
            break;
        };
        if probe.eat(Fragment::Comma).is_none() {
            break;
        }
        params.push(found);
        *cursor = probe;
        dangling_comma = true;
    }

    // 2. 可选的最后一个参数
    if let Some(last) = cursor.eat(param) {
        params.push(last);
        dangling_comma = false;
    }

    if dangling_comma {
        return Err(SemanticErrorKind::InvalidParameters);
    }

    // 3. `)` + 终结符，之后只允许空白
    cursor
        .eat(Fragment::CloseParen)
        .ok_or(SemanticErrorKind::InvalidParameters)?;
    cursor
        .eat(terminator)
        .ok_or(SemanticErrorKind::InvalidParameters)?;
    if !cursor.at_end() {
        return Err(SemanticErrorKind::InvalidParameters);
    }

    Ok(params)
}
