use super::errors::SemanticErrorKind;
use super::params;
use super::scope::Variable;
use super::verifier::VariableVerifier;
use super::Kind;
use crate::grammar::{Cursor, Fragment, Matcher};
use std::collections::{HashMap, HashSet};

/// 方法签名，参数顺序决定调用时的按位匹配
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub name: String,
    pub parameters: Vec<Variable>,
}

impl MethodSignature {
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

/// 解析方法头 `void name(params) {`
pub fn parse_declaration(
    line: &str,
    matcher: &dyn Matcher,
) -> Result<MethodSignature, SemanticErrorKind> {
    let mut cursor = Cursor::new(line, matcher);
    cursor
        .eat(Fragment::VoidKeyword)
        .ok_or(SemanticErrorKind::InvalidMethodSignature)?;
    let name = cursor
        .eat(Fragment::MethodOpen)
        .and_then(|head| head.get("name"))
        .ok_or(SemanticErrorKind::InvalidMethodSignature)?;

    let parameters = params::parse_list(&mut cursor, Fragment::DeclParam, Fragment::OpenBrace)?
        .iter()
        .map(|param| {
            let kind = param
                .get("type")
                .and_then(Kind::from_keyword)
                .ok_or(SemanticErrorKind::InvalidParameters)?;
            let name = param
                .get("name")
                .ok_or(SemanticErrorKind::InvalidParameters)?;
            Ok(Variable::new(name, kind, param.has("final"), true))
        })
        .collect::<Result<Vec<_>, SemanticErrorKind>>()?;

    Ok(MethodSignature {
        name: name.to_string(),
        parameters,
    })
}

/// 一次方法调用 `name(args);`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSite<'t> {
    pub name: &'t str,
    pub arguments: Vec<&'t str>,
}

/// 行首是 `name(` 的形状就算调用，不管名字是否已声明
pub fn is_call(line: &str, matcher: &dyn Matcher) -> bool {
    matcher.match_prefix(Fragment::MethodOpen, line).is_some()
}

pub fn parse_call<'t>(
    line: &'t str,
    matcher: &dyn Matcher,
) -> Result<CallSite<'t>, SemanticErrorKind> {
    let mut cursor = Cursor::new(line, matcher);
    let name = cursor
        .eat(Fragment::MethodOpen)
        .and_then(|head| head.get("name"))
        .ok_or(SemanticErrorKind::InvalidLine)?;

    let arguments = params::parse_list(&mut cursor, Fragment::CallParam, Fragment::Semicolon)?
        .iter()
        .filter_map(|arg| arg.get("value"))
        .collect();

    Ok(CallSite { name, arguments })
}

/// 全局方法表：第一遍填充，第二遍只读
#[derive(Debug, Clone, Default)]
pub struct MethodTable {
    methods: HashMap<String, MethodSignature>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录签名，参数不能重名；同名方法以后声明者为准
    pub fn declare(&mut self, signature: MethodSignature) -> Result<(), SemanticErrorKind> {
        let mut seen = HashSet::new();
        for param in &signature.parameters {
            if !seen.insert(param.name.as_str()) {
                return Err(SemanticErrorKind::DuplicateParameter {
                    method: signature.name.clone(),
                    name: param.name.clone(),
                });
            }
        }

        self.methods.insert(signature.name.clone(), signature);
        Ok(())
    }

    pub fn exists(&self, name: &str) -> bool {
        self.methods.contains_key(name)
    }

    pub fn signature_of(&self, name: &str) -> Option<&[Variable]> {
        self.methods
            .get(name)
            .map(|signature| signature.parameters.as_slice())
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// 校验调用：先名字，再个数，最后从左到右逐个实参
    pub fn validate_call(
        &self,
        call: &CallSite,
        verifier: &VariableVerifier,
    ) -> Result<(), SemanticErrorKind> {
        let parameters = self
            .signature_of(call.name)
            .ok_or_else(|| SemanticErrorKind::UnknownMethod(call.name.to_string()))?;

        if parameters.len() != call.arguments.len() {
            return Err(SemanticErrorKind::ArgumentCountMismatch {
                name: call.name.to_string(),
                expected: parameters.len(),
                found: call.arguments.len(),
            });
        }

        for (param, arg) in parameters.iter().zip(&call.arguments) {
            verifier.usage_check(param.kind, arg)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{Scope, VarIds};
    use crate::grammar::RegexMatcher;

    fn table_with(header: &str) -> MethodTable {
        let mut table = MethodTable::new();
        table
            .declare(parse_declaration(header, &RegexMatcher).unwrap())
            .unwrap();
        table
    }

    fn check(table: &MethodTable, line: &str, scope: &mut Scope) -> Result<(), SemanticErrorKind> {
        let mut parent = Scope::new();
        let mut ids = VarIds::new();
        let verifier = VariableVerifier::new(&mut parent, scope, &mut ids, &RegexMatcher);
        let call = parse_call(line, &RegexMatcher)?;
        table.validate_call(&call, &verifier)
    }

    #[test]
    fn parses_headers() {
        let sig = parse_declaration("void foo(final int a, char b) {", &RegexMatcher).unwrap();
        assert_eq!(sig.name, "foo");
        assert_eq!(sig.arity(), 2);
        assert!(sig.parameters[0].is_final);
        assert!(sig.parameters.iter().all(|p| p.initialized));
        assert_eq!(sig.parameters[1].kind, Kind::Char);

        assert!(parse_declaration("void   bar ( ) {", &RegexMatcher).is_ok());
    }

    #[test]
    fn bad_headers() {
        assert_eq!(
            parse_declaration("void (int a) {", &RegexMatcher),
            Err(SemanticErrorKind::InvalidMethodSignature)
        );
        assert_eq!(
            parse_declaration("void _f() {", &RegexMatcher),
            Err(SemanticErrorKind::InvalidMethodSignature)
        );
        assert_eq!(
            parse_declaration("void f(int a,) {", &RegexMatcher),
            Err(SemanticErrorKind::InvalidParameters)
        );
        assert_eq!(
            parse_declaration("void f(int a) ", &RegexMatcher),
            Err(SemanticErrorKind::InvalidParameters)
        );
    }

    #[test]
    fn duplicate_parameters_are_rejected() {
        let sig = parse_declaration("void f(int a, double a) {", &RegexMatcher).unwrap();
        let err = MethodTable::new().declare(sig).unwrap_err();
        assert_eq!(
            err,
            SemanticErrorKind::DuplicateParameter {
                method: "f".into(),
                name: "a".into()
            }
        );
    }

    #[test]
    fn later_declaration_replaces_earlier() {
        let mut table = table_with("void f(int a) {");
        table
            .declare(parse_declaration("void f() {", &RegexMatcher).unwrap())
            .unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.exists("f"));
        assert!(!table.exists("g"));
        assert_eq!(table.signature_of("f").map(<[_]>::len), Some(0));
    }

    #[test]
    fn call_shape() {
        assert!(is_call("foo(1);", &RegexMatcher));
        assert!(is_call("foo (1);", &RegexMatcher));
        assert!(!is_call("a = 1;", &RegexMatcher));
        assert!(!is_call("_foo(1);", &RegexMatcher));
    }

    #[test]
    fn positional_matching() {
        let table = table_with("void f(int a, double b) {");
        let mut scope = Scope::new();

        assert!(check(&table, "f(5, 2);", &mut scope).is_ok());
        assert!(check(&table, "f(5, 2.0);", &mut scope).is_ok());
        assert_eq!(
            check(&table, "f(2.0, 5);", &mut scope),
            Err(SemanticErrorKind::BadValue {
                expected: Kind::Int,
                value: "2.0".into()
            })
        );
        assert_eq!(
            check(&table, "f(5);", &mut scope),
            Err(SemanticErrorKind::ArgumentCountMismatch {
                name: "f".into(),
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn unknown_name_and_arity_come_before_argument_checks() {
        let table = table_with("void f(int a) {");
        let mut scope = Scope::new();

        assert_eq!(
            check(&table, "g(ghost);", &mut scope),
            Err(SemanticErrorKind::UnknownMethod("g".into()))
        );
        assert!(matches!(
            check(&table, "f(ghost, ghost);", &mut scope),
            Err(SemanticErrorKind::ArgumentCountMismatch { .. })
        ));
        assert_eq!(
            check(&table, "f(ghost);", &mut scope),
            Err(SemanticErrorKind::UndefinedVariable("ghost".into()))
        );
    }

    #[test]
    fn variable_arguments_use_cast_rules() {
        let table = table_with("void f(boolean flag) {");
        let mut scope = Scope::new();
        scope
            .declare(Variable::new("n", Kind::Double, false, true))
            .unwrap();
        scope
            .declare(Variable::new("s", Kind::Str, false, true))
            .unwrap();

        assert!(check(&table, "f(n);", &mut scope).is_ok());
        assert!(check(&table, "f(s);", &mut scope).is_err());
    }
}
