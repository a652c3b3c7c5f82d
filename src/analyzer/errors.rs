use super::Kind;
use thiserror::Error;

/// 带位置的语义错误：分析在哪一行中止，以及原因
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Line {line}: {kind}")]
pub struct SemanticError {
    /// 1 起始的行号
    pub line: usize,
    #[source]
    pub kind: SemanticErrorKind,
}

impl SemanticError {
    pub fn new(line: usize, kind: SemanticErrorKind) -> Self {
        Self { line, kind }
    }
}

/// 具体错误原因
/// 第一个错误即中止，不做恢复
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticErrorKind {
    // --- 行形态与文法 ---
    #[error("Invalid line: not a valid code line or comment")]
    InvalidLine,

    #[error("Comments must start at the beginning of a line")]
    TrailingComment,

    #[error("Missing type in variable declaration")]
    MissingType,

    #[error("Expected a variable name")]
    MissingName,

    #[error("Invalid parameter list")]
    InvalidParameters,

    #[error("Invalid method signature")]
    InvalidMethodSignature,

    /// if / while 头部不符合条件文法
    #[error("Malformed {0} condition")]
    MalformedCondition(&'static str),

    // --- 作用域 ---
    #[error("Variable '{0}' is already declared in this scope")]
    AlreadyDeclared(String),

    #[error("Variable '{0}' is not declared")]
    UndefinedVariable(String),

    // --- 生命周期 ---
    #[error("Variable '{0}' is read before it is initialized")]
    UninitializedRead(String),

    #[error("No value assigned to variable '{0}'")]
    MissingValue(String),

    #[error("Cannot assign to final variable '{0}' after its declaration")]
    WriteToFinal(String),

    #[error("Missing 'return;' at the end of the method")]
    MissingReturn,

    // --- 类型 ---
    #[error("Value '{value}' cannot be used as type '{expected}'")]
    BadValue { expected: Kind, value: String },

    #[error("Method '{name}' expects {expected} arguments, but got {found}")]
    ArgumentCountMismatch {
        name: String,
        expected: usize,
        found: usize,
    },

    // --- 结构 ---
    #[error("The {{}} brackets aren't balanced")]
    BracketImbalance,

    #[error("Methods cannot be declared inside another block")]
    NestedMethod,

    #[error("Calling a method from the global scope is undefined")]
    GlobalCall,

    #[error("Method '{0}' is not declared")]
    UnknownMethod(String),

    #[error("Parameter '{name}' is declared twice in method '{method}'")]
    DuplicateParameter { method: String, name: String },
}

impl SemanticErrorKind {
    /// 绑定到具体行
    pub fn at(self, line: usize) -> SemanticError {
        SemanticError::new(line, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_context() {
        let err = SemanticErrorKind::BadValue {
            expected: Kind::Int,
            value: "2.5".into(),
        };
        assert_eq!(err.to_string(), "Value '2.5' cannot be used as type 'int'");

        let err = SemanticErrorKind::BracketImbalance.at(7);
        assert_eq!(err.to_string(), "Line 7: The {} brackets aren't balanced");
    }

    #[test]
    fn condition_message_names_the_block() {
        let err = SemanticErrorKind::MalformedCondition("while");
        assert_eq!(err.to_string(), "Malformed while condition");
    }
}
