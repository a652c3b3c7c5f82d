use super::errors::SemanticErrorKind;
use super::verifier::{Assignment, Declaration, VariableVerifier};
use super::Kind;
use crate::grammar::{Cursor, Fragment, Match, Matcher};

/// 一行变量语句，目标按书写顺序排列
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableLine<'t> {
    /// `[final] T a [= v], b [= v], ...;`
    Declarations(Vec<Declaration<'t>>),
    /// `a = v, b = v, ...;`
    Assignments(Vec<Assignment<'t>>),
}

/// 解析一行以 `;` 结尾的变量语句 (已去掉首尾空白)
pub fn parse_variable_line<'t>(
    line: &'t str,
    matcher: &dyn Matcher,
) -> Result<VariableLine<'t>, SemanticErrorKind> {
    let mut cursor = Cursor::new(line, matcher);

    if let Some(head) = cursor.eat(Fragment::DeclarationStart) {
        let kind = head
            .get("type")
            .and_then(Kind::from_keyword)
            .ok_or(SemanticErrorKind::MissingType)?;
        let is_final = head.has("final");

        let decls = parse_targets(cursor)?
            .into_iter()
            .map(|(name, value)| Declaration {
                name,
                kind,
                is_final,
                value,
            })
            .collect();
        return Ok(VariableLine::Declarations(decls));
    }

    // `final` 后面没有合法类型
    if cursor.peek(Fragment::FinalKeyword) {
        return Err(SemanticErrorKind::MissingType);
    }

    let assigns = parse_targets(cursor)?
        .into_iter()
        .map(|(name, value)| Assignment { name, value })
        .collect();
    Ok(VariableLine::Assignments(assigns))
}

/// `name [= value] (, name [= value])* ;`
fn parse_targets<'t>(
    mut cursor: Cursor<'t, '_>,
) -> Result<Vec<(&'t str, Option<&'t str>)>, SemanticErrorKind> {
    let first = cursor
        .eat(Fragment::Name)
        .ok_or(SemanticErrorKind::MissingName)?;
    let mut targets = vec![target(&first, &mut cursor)?];

    while !cursor.finish(Fragment::StatementEnd) {
        let next = cursor
            .eat(Fragment::CommaName)
            .ok_or(SemanticErrorKind::MissingName)?;
        targets.push(target(&next, &mut cursor)?);
    }

    Ok(targets)
}

fn target<'t>(
    name: &Match<'t>,
    cursor: &mut Cursor<'t, '_>,
) -> Result<(&'t str, Option<&'t str>), SemanticErrorKind> {
    let name = name.get("name").ok_or(SemanticErrorKind::MissingName)?;
    let value = cursor
        .eat(Fragment::Assign)
        .and_then(|assign| assign.get("value"));
    Ok((name, value))
}

/// 依次检查并应用每个目标，前面的目标对后面的可见
pub fn apply(line: &VariableLine, verifier: &mut VariableVerifier) -> Result<(), SemanticErrorKind> {
    match line {
        VariableLine::Declarations(decls) => {
            for decl in decls {
                let variable = verifier.check_declaration(decl)?;
                verifier.declare(variable)?;
            }
        }
        VariableLine::Assignments(assigns) => {
            for assign in assigns {
                verifier.check_assignment(assign)?;
            }
        }
    }
    Ok(())
}
