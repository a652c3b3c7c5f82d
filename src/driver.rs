use crate::analyzer::{
    ConditionKind, MethodTable, Scope, ScopeStack, SemanticError, SemanticErrorKind, VarIds,
    VariableVerifier, apply, is_call, parse_call, parse_declaration, parse_variable_line,
    validate_condition,
};
use crate::grammar::{self, Fragment, Matcher, RegexMatcher};
use crate::source::SourceFile;
use crate::{EXIT_INVALID, EXIT_IO};
use log::{debug, trace};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 最外层错误：只区分 I/O 和 "程序不合法" 两类
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("Could not read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{error}")]
    Semantic {
        path: PathBuf,
        /// 出错行的原文
        text: Option<String>,
        #[source]
        error: SemanticError,
    },
}

impl VerifyError {
    /// 进程退出码
    pub fn code(&self) -> i32 {
        match self {
            VerifyError::Io { .. } => EXIT_IO,
            VerifyError::Semantic { .. } => EXIT_INVALID,
        }
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            VerifyError::Io { .. } => None,
            VerifyError::Semantic { error, .. } => Some(error.line),
        }
    }

    /// 不带位置的错误描述
    pub fn message(&self) -> String {
        match self {
            VerifyError::Io { .. } => self.to_string(),
            VerifyError::Semantic { error, .. } => error.kind.to_string(),
        }
    }

    /// 类似 Rustc 的错误输出
    /// Error: message
    ///   --> demo.sj:10
    ///    |
    ///  10| int a = 2.5;
    pub fn diagnostic(&self) -> String {
        match self {
            VerifyError::Io { .. } => format!("Error: {}", self),
            VerifyError::Semantic { path, text, error } => {
                let header = format!(
                    "Error: {}\n  --> {}:{}",
                    error.kind,
                    path.display(),
                    error.line
                );
                match text {
                    Some(text) => format!("{}\n   |\n{:3}| {}", header, error.line, text.trim_end()),
                    None => header,
                }
            }
        }
    }
}

pub struct Driver {
    matcher: Box<dyn Matcher>,
}

impl Default for Driver {
    fn default() -> Self {
        Self::new()
    }
}

impl Driver {
    pub fn new() -> Self {
        Self::with_matcher(RegexMatcher::new())
    }

    /// 换用其他的片段匹配实现
    pub fn with_matcher(matcher: impl Matcher + 'static) -> Self {
        Self {
            matcher: Box::new(matcher),
        }
    }

    /// 入口：校验一个文件
    pub fn verify_file(&self, path: &Path) -> Result<(), VerifyError> {
        // 1. 读取源码，整个文件在分析前全部读入
        let file = SourceFile::load(path).map_err(|source| VerifyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("read {} lines from {}", file.len(), file.name);

        // 2. 两遍分析
        self.verify_loaded(&file)
            .map_err(|error| VerifyError::Semantic {
                path: file.path.clone(),
                text: file.line(error.line).map(str::to_string),
                error,
            })
    }

    /// 校验已经读入内存的文件
    pub fn verify_loaded(&self, file: &SourceFile) -> Result<(), SemanticError> {
        self.verify_lines(file.lines.as_slice())
    }

    /// 每次调用都从全新的状态开始，结果只取决于输入
    pub fn verify_lines<S: AsRef<str>>(&self, lines: &[S]) -> Result<(), SemanticError> {
        let lines: Vec<&str> = lines.iter().map(|line| line.as_ref()).collect();

        let (globals, methods, ids) = self.collect_globals(&lines)?;
        debug!(
            "pass 1 done: {} globals, {} methods",
            globals.len(),
            methods.len()
        );

        self.check_bodies(&lines, ScopeStack::new(globals, ids), &methods)?;
        debug!("pass 2 done: file is valid");
        Ok(())
    }

    /// 第一遍：全局变量、方法签名、括号配对、禁止全局调用
    fn collect_globals(
        &self,
        lines: &[&str],
    ) -> Result<(Scope, MethodTable, VarIds), SemanticError> {
        let matcher = self.matcher.as_ref();
        let mut globals = Scope::new();
        let mut scratch = Scope::new();
        let mut ids = VarIds::new();
        let mut methods = MethodTable::new();
        let mut open_brackets: Vec<usize> = Vec::new();

        for (index, &raw) in lines.iter().enumerate() {
            let number = index + 1;
            if grammar::is_blank_or_comment(raw, matcher) {
                continue;
            }
            let line = raw.trim();

            if open_brackets.is_empty() {
                if matcher.match_prefix(Fragment::VoidKeyword, line).is_some() {
                    let signature = parse_declaration(line, matcher).map_err(|kind| kind.at(number))?;
                    trace!("{}: method '{}'", number, signature.name);
                    methods.declare(signature).map_err(|kind| kind.at(number))?;
                } else if line.ends_with(';') {
                    if is_call(line, matcher) {
                        return Err(SemanticErrorKind::GlobalCall.at(number));
                    }
                    trace!("{}: global statement", number);
                    let parsed = parse_variable_line(line, matcher).map_err(|kind| kind.at(number))?;
                    let mut verifier = VariableVerifier::new(&mut scratch, &mut globals, &mut ids, matcher);
                    apply(&parsed, &mut verifier).map_err(|kind| kind.at(number))?;
                }
            }

            if line.ends_with('{') {
                open_brackets.push(number);
            } else if line.ends_with('}') && open_brackets.pop().is_none() {
                return Err(SemanticErrorKind::BracketImbalance.at(number));
            }
        }

        Ok((globals, methods, ids))
    }

    /// 第二遍：逐行校验方法体
    fn check_bodies(
        &self,
        lines: &[&str],
        scopes: ScopeStack,
        methods: &MethodTable,
    ) -> Result<(), SemanticError> {
        let matcher = self.matcher.as_ref();
        let mut pass = BodyPass {
            matcher,
            methods,
            scopes,
        };
        let mut previous = "";

        for (index, &raw) in lines.iter().enumerate() {
            let number = index + 1;

            // 注释只能独占一行
            if matcher.matches(Fragment::TrailingComment, raw) {
                return Err(SemanticErrorKind::TrailingComment.at(number));
            }
            if !grammar::is_blank_or_comment(raw, matcher) {
                pass.check_line(raw.trim(), number, previous)
                    .map_err(|kind| kind.at(number))?;
            }
            previous = raw;
        }

        if pass.scopes.depth() != 0 {
            let line = pass.scopes.innermost_open_line().unwrap_or(lines.len());
            return Err(SemanticErrorKind::BracketImbalance.at(line));
        }
        Ok(())
    }
}

/// 第二遍的逐行状态
struct BodyPass<'d> {
    matcher: &'d dyn Matcher,
    methods: &'d MethodTable,
    scopes: ScopeStack,
}

impl BodyPass<'_> {
    fn check_line(
        &mut self,
        line: &str,
        number: usize,
        previous: &str,
    ) -> Result<(), SemanticErrorKind> {
        trace!("{}: depth {} `{}`", number, self.scopes.depth(), line);

        if line.ends_with(';') {
            // 全局语句第一遍已经处理过
            if self.scopes.depth() == 0 {
                return Ok(());
            }
            return self.check_statement(line);
        }
        if line.ends_with('{') {
            return self.enter_block(line, number);
        }
        if line == "}" {
            return self.exit_block(previous);
        }
        Err(SemanticErrorKind::InvalidLine)
    }

    /// 块内语句：方法调用 / return / 变量行
    fn check_statement(&mut self, line: &str) -> Result<(), SemanticErrorKind> {
        let matcher = self.matcher;

        if is_call(line, matcher) {
            let call = parse_call(line, matcher)?;
            let verifier = self.scopes.verifier(matcher);
            return self.methods.validate_call(&call, &verifier);
        }
        if matcher.matches(Fragment::Return, line) {
            return Ok(());
        }

        let parsed = parse_variable_line(line, matcher)?;
        let mut verifier = self.scopes.verifier(matcher);
        apply(&parsed, &mut verifier)
    }

    /// 块头：先进入新作用域，再解释块头
    fn enter_block(&mut self, line: &str, number: usize) -> Result<(), SemanticErrorKind> {
        let matcher = self.matcher;
        self.scopes.enter_block(number);
        trace!("{}: enter block, depth {}", number, self.scopes.depth());

        if let Some(kind) = ConditionKind::detect(line, matcher) {
            let verifier = self.scopes.verifier(matcher);
            return validate_condition(line, kind, &verifier);
        }

        if matcher.match_prefix(Fragment::VoidKeyword, line).is_some() {
            // 方法只能声明在最外层
            if self.scopes.depth() > 1 {
                return Err(SemanticErrorKind::NestedMethod);
            }
            let signature = parse_declaration(line, matcher)?;
            self.scopes.seed_parameters(&signature.parameters);
            return Ok(());
        }

        Err(SemanticErrorKind::InvalidLine)
    }

    /// 块尾：回到全局时上一行必须是 `return;`
    fn exit_block(&mut self, previous: &str) -> Result<(), SemanticErrorKind> {
        let depth = self.scopes.exit_block()?;
        trace!("exit block, depth {}", depth);

        if depth == 0 && !self.matcher.matches(Fragment::Return, previous) {
            return Err(SemanticErrorKind::MissingReturn);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verify(src: &str) -> Result<(), SemanticError> {
        let lines: Vec<&str> = src.lines().collect();
        Driver::new().verify_lines(&lines)
    }

    fn kind_of(src: &str) -> SemanticErrorKind {
        verify(src).unwrap_err().kind
    }

    #[test]
    fn scenario_a_simple_method() {
        assert!(verify("void f(){\nint a;\na = 1;\nreturn;\n}").is_ok());
    }

    #[test]
    fn scenario_b_global_statement_after_method() {
        let err = verify("void f(){\nint a;\nreturn;\n}\na;").unwrap_err();
        assert_eq!(err.line, 5);
        assert_eq!(err.kind, SemanticErrorKind::MissingValue("a".into()));
    }

    #[test]
    fn scenario_c_undeclared_condition_operand() {
        let err = verify("void f(){\nif (a) {\nreturn;\n}\nreturn;\n}").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.kind, SemanticErrorKind::UndefinedVariable("a".into()));
    }

    #[test]
    fn scenario_d_nested_method() {
        let err = verify("void f(){\nvoid g(){\nreturn;\n}\nreturn;\n}").unwrap_err();
        assert_eq!(err.line, 2);
        assert_eq!(err.kind, SemanticErrorKind::NestedMethod);
    }

    #[test]
    fn scenario_e_extra_closing_bracket() {
        let err = verify("void f(){\nreturn;\n}\n}").unwrap_err();
        assert_eq!(err.line, 4);
        assert_eq!(err.kind, SemanticErrorKind::BracketImbalance);
    }

    #[test]
    fn unclosed_block_points_at_innermost_header() {
        let err = verify("void f(){\nwhile (true) {\nreturn;\n}").unwrap_err();
        assert_eq!(err.kind, SemanticErrorKind::BracketImbalance);
        assert_eq!(err.line, 1);

        let err = verify("void f(){\nif (true) {\nreturn;").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn global_calls_are_rejected() {
        let err = verify("void f(){\nreturn;\n}\nf();").unwrap_err();
        assert_eq!(err.kind, SemanticErrorKind::GlobalCall);
        assert_eq!(kind_of("g();"), SemanticErrorKind::GlobalCall);
    }

    #[test]
    fn methods_and_globals_are_forward_visible() {
        let src = "\
void f(){
g(x);
return;
}
void g(int n){
return;
}
int x = 3;";
        assert!(verify(src).is_ok());
    }

    #[test]
    fn return_must_be_the_literal_previous_line() {
        assert_eq!(
            kind_of("void f(){\nreturn;\n\n}"),
            SemanticErrorKind::MissingReturn
        );
        assert_eq!(
            kind_of("void f(){\nif (true) {\nreturn;\n}\n}"),
            SemanticErrorKind::MissingReturn
        );
        assert!(verify("void f(){\n  return ;  \n}").is_ok());
    }

    #[test]
    fn comment_placement() {
        assert!(verify("// header\nvoid f(){\n// inside\nreturn;\n}").is_ok());
        assert_eq!(
            kind_of("void f(){\nint a; //\nreturn;\n}"),
            SemanticErrorKind::TrailingComment
        );
        assert_eq!(
            kind_of("void f(){\n  // indented\nreturn;\n}"),
            SemanticErrorKind::InvalidLine
        );
    }

    #[test]
    fn unknown_block_headers_are_invalid() {
        assert_eq!(
            kind_of("void f(){\nfor (x) {\n}\nreturn;\n}"),
            SemanticErrorKind::InvalidLine
        );
        assert_eq!(
            kind_of("void f(){\nint a\nreturn;\n}"),
            SemanticErrorKind::InvalidLine
        );
    }

    #[test]
    fn method_body_changes_do_not_leak_into_globals() {
        let src = "\
int g;
void f(){
g = 1;
return;
}
void h(){
int x = g;
return;
}";
        assert_eq!(
            verify(src).unwrap_err().kind,
            SemanticErrorKind::UninitializedRead("g".into())
        );
    }

    #[test]
    fn repeated_runs_agree() {
        let driver = Driver::new();
        let lines = ["int a = 1;", "void f(int b){", "a = b;", "return;", "}"];
        assert!(driver.verify_lines(&lines).is_ok());
        assert!(driver.verify_lines(&lines).is_ok());

        let bad = ["void f(){", "x = 1;", "return;", "}"];
        assert_eq!(driver.verify_lines(&bad), driver.verify_lines(&bad));
    }

    #[test]
    fn loaded_file_is_checked_line_by_line() {
        let file = SourceFile::new(
            PathBuf::from("mem.sj"),
            "void f(){\nint a;\nint b = a;\nreturn;\n}",
        );
        let err = Driver::new().verify_loaded(&file).unwrap_err();
        assert_eq!(err.line, 3);
        assert_eq!(err.kind, SemanticErrorKind::UninitializedRead("a".into()));
    }

    #[test]
    fn diagnostic_shows_location_and_source() {
        let err = VerifyError::Semantic {
            path: PathBuf::from("demo.sj"),
            text: Some("int a = 2.5;".into()),
            error: SemanticErrorKind::BadValue {
                expected: crate::analyzer::Kind::Int,
                value: "2.5".into(),
            }
            .at(3),
        };
        assert_eq!(err.code(), EXIT_INVALID);
        assert_eq!(err.line(), Some(3));
        assert_eq!(
            err.diagnostic(),
            "Error: Value '2.5' cannot be used as type 'int'\n  --> demo.sj:3\n   |\n  3| int a = 2.5;"
        );
    }
}
