use crate::grammar::Fragment;
use std::fmt;

/// s-lang 固定的五种值类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Int,
    Double,
    Bool,
    Char,
    Str,
}

impl Kind {
    pub const ALL: [Kind; 5] = [Kind::Int, Kind::Double, Kind::Bool, Kind::Char, Kind::Str];

    pub fn from_keyword(text: &str) -> Option<Kind> {
        match text {
            "int" => Some(Kind::Int),
            "double" => Some(Kind::Double),
            "boolean" => Some(Kind::Bool),
            "char" => Some(Kind::Char),
            "String" => Some(Kind::Str),
            _ => None,
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            Kind::Int => "int",
            Kind::Double => "double",
            Kind::Bool => "boolean",
            Kind::Char => "char",
            Kind::Str => "String",
        }
    }

    /// 该类型常量值的字面量文法
    pub fn literal_fragment(&self) -> Fragment {
        match self {
            Kind::Int => Fragment::IntLiteral,
            Kind::Double => Fragment::DoubleLiteral,
            Kind::Bool => Fragment::BoolLiteral,
            Kind::Char => Fragment::CharLiteral,
            Kind::Str => Fragment::StringLiteral,
        }
    }

    /// source 类型的变量能否用在需要 self 的位置
    /// 只允许拓宽：int -> double，int/double -> boolean
    pub fn is_assignable_from(&self, source: Kind) -> bool {
        if *self == source {
            return true;
        }

        matches!(
            (source, self),
            (Kind::Int, Kind::Double) | (Kind::Int, Kind::Bool) | (Kind::Double, Kind::Bool)
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_round_trip() {
        for kind in Kind::ALL {
            assert_eq!(Kind::from_keyword(kind.keyword()), Some(kind));
        }
        assert_eq!(Kind::from_keyword("bool"), None);
        assert_eq!(Kind::from_keyword("string"), None);
    }

    #[test]
    fn cast_legality_is_exactly_the_widening_set() {
        let legal = [
            (Kind::Int, Kind::Double),
            (Kind::Int, Kind::Bool),
            (Kind::Double, Kind::Bool),
        ];

        for source in Kind::ALL {
            for target in Kind::ALL {
                let expected = source == target || legal.contains(&(source, target));
                assert_eq!(
                    target.is_assignable_from(source),
                    expected,
                    "{} -> {}",
                    source,
                    target
                );
            }
        }
    }

    #[test]
    fn narrowing_is_rejected() {
        assert!(!Kind::Int.is_assignable_from(Kind::Double));
        assert!(!Kind::Double.is_assignable_from(Kind::Bool));
        assert!(!Kind::Str.is_assignable_from(Kind::Char));
        assert!(!Kind::Char.is_assignable_from(Kind::Int));
    }
}
