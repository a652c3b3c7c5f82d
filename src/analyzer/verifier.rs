use super::errors::SemanticErrorKind;
use super::scope::{Scope, VarIds, Variable};
use super::Kind;
use crate::grammar::{self, Matcher};

/// 一条声明：`[final] T name [= value]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration<'t> {
    pub name: &'t str,
    pub kind: Kind,
    pub is_final: bool,
    pub value: Option<&'t str>,
}

/// 一条赋值：`name [= value]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment<'t> {
    pub name: &'t str,
    pub value: Option<&'t str>,
}

/// 变量规则检查器
/// 借用 Driver 持有的两个作用域和声明编号，自己不拥有任何状态
pub struct VariableVerifier<'s> {
    parent: &'s mut Scope,
    current: &'s mut Scope,
    ids: &'s mut VarIds,
    matcher: &'s dyn Matcher,
}

impl<'s> VariableVerifier<'s> {
    pub fn new(
        parent: &'s mut Scope,
        current: &'s mut Scope,
        ids: &'s mut VarIds,
        matcher: &'s dyn Matcher,
    ) -> Self {
        Self {
            parent,
            current,
            ids,
            matcher,
        }
    }

    pub fn matcher(&self) -> &'s dyn Matcher {
        self.matcher
    }

    /// 先查 current 再查 parent
    pub fn lookup(&self, name: &str) -> Option<&Variable> {
        self.current.get(name).or_else(|| self.parent.get(name))
    }

    fn lookup_mut(&mut self, name: &str) -> Option<&mut Variable> {
        if self.current.contains(name) {
            self.current.get_mut(name)
        } else {
            self.parent.get_mut(name)
        }
    }

    /// value 能否用在需要 expected 的位置
    pub fn usage_check(&self, expected: Kind, value: &str) -> Result<(), SemanticErrorKind> {
        if grammar::names_variable(value, self.matcher) {
            let variable = self
                .lookup(value)
                .ok_or_else(|| SemanticErrorKind::UndefinedVariable(value.to_string()))?;

            if !variable.initialized {
                return Err(SemanticErrorKind::UninitializedRead(value.to_string()));
            }
            if !expected.is_assignable_from(variable.kind) {
                return Err(bad_value(expected, value));
            }
            return Ok(());
        }

        if self.matcher.matches(expected.literal_fragment(), value) {
            Ok(())
        } else {
            Err(bad_value(expected, value))
        }
    }

    /// 检查一条声明并返回新变量，不加入作用域
    pub fn check_declaration(&self, decl: &Declaration) -> Result<Variable, SemanticErrorKind> {
        if self.current.contains(decl.name) {
            return Err(SemanticErrorKind::AlreadyDeclared(decl.name.to_string()));
        }
        if decl.is_final && decl.value.is_none() {
            return Err(SemanticErrorKind::MissingValue(decl.name.to_string()));
        }
        if let Some(value) = decl.value {
            self.usage_check(decl.kind, value)?;
        }

        Ok(Variable::new(
            decl.name,
            decl.kind,
            decl.is_final,
            decl.value.is_some(),
        ))
    }

    /// 检查一条赋值，成功后目标变为已初始化
    pub fn check_assignment(
        &mut self,
        assign: &Assignment,
    ) -> Result<&mut Variable, SemanticErrorKind> {
        let value = assign
            .value
            .ok_or_else(|| SemanticErrorKind::MissingValue(assign.name.to_string()))?;

        let target = self
            .lookup(assign.name)
            .ok_or_else(|| SemanticErrorKind::UndefinedVariable(assign.name.to_string()))?;
        if target.is_final {
            return Err(SemanticErrorKind::WriteToFinal(assign.name.to_string()));
        }
        let kind = target.kind;

        self.usage_check(kind, value)?;

        let target = self
            .lookup_mut(assign.name)
            .ok_or_else(|| SemanticErrorKind::UndefinedVariable(assign.name.to_string()))?;
        target.mark_initialized();
        Ok(target)
    }

    /// 把已通过检查的变量加入 current，并分配身份
    pub fn declare(&mut self, mut variable: Variable) -> Result<(), SemanticErrorKind> {
        variable.id = self.ids.next();
        self.current.declare(variable)
    }
}

fn bad_value(expected: Kind, value: &str) -> SemanticErrorKind {
    SemanticErrorKind::BadValue {
        expected,
        value: value.to_string(),
    }
}
