mod condition;
mod errors;
mod methods;
mod params;
mod scope;
mod statement;
mod types;
mod verifier;

pub use condition::{ConditionKind, validate_condition};
pub use errors::{SemanticError, SemanticErrorKind};
pub use methods::{CallSite, MethodSignature, MethodTable, is_call, parse_call, parse_declaration};
pub use scope::{Scope, ScopeStack, VarId, VarIds, Variable};
pub use statement::{VariableLine, apply, parse_variable_line};
pub use types::Kind;
pub use verifier::{Assignment, Declaration, VariableVerifier};
