// 语法片段的公共积木，展开成字面量，供 concat! 拼接
macro_rules! ident {
    () => {
        "(?:[A-Za-z][A-Za-z0-9_]*|_[A-Za-z0-9_]+)"
    };
}

macro_rules! method_name {
    () => {
        "[A-Za-z][A-Za-z0-9_]*"
    };
}

macro_rules! number {
    () => {
        "[+-]?(?:[0-9]+\\.?[0-9]*|[0-9]*\\.?[0-9]+)"
    };
}

macro_rules! type_keyword {
    () => {
        "(?:int|double|String|boolean|char)"
    };
}

macro_rules! value {
    () => {
        concat!(
            "(?:\"[^'\"\\\\,]*\"|'[^'\"\\\\,]'|",
            number!(),
            "|",
            ident!(),
            ")"
        )
    };
}

macro_rules! define_fragments {
    (
        $($variant:ident => $pattern:expr),* $(,)?
    ) => {
        /// 一个具名语法片段
        /// 核心逻辑只认片段名，具体用什么引擎匹配由 Matcher 决定
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum Fragment {
            $($variant),*
        }

        impl Fragment {
            pub const ALL: &'static [Fragment] = &[$(Fragment::$variant),*];

            /// 片段的正则源码 (不带锚点)
            pub fn pattern(&self) -> &'static str {
                match self {
                    $(Fragment::$variant => $pattern),*
                }
            }

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Fragment::$variant => stringify!($variant)),*
                }
            }

            pub fn index(&self) -> usize {
                *self as usize
            }
        }
    };
}

define_fragments! {
    // --- 整行形态 ---
    Blank           => "\\s*",
    Comment         => "//",
    TrailingComment => ".+//",
    Return          => "\\s*return\\s*;\\s*",

    // --- 值文法 (整体匹配) ---
    Identifier      => ident!(),
    BoolKeyword     => "true|false",
    IntLiteral      => "[+-]?[0-9]+",
    DoubleLiteral   => number!(),
    BoolLiteral     => concat!("true|false|", number!()),
    CharLiteral     => "'[^'\"\\\\,]'",
    StringLiteral   => "\"[^'\"\\\\,]*\"",

    // --- 变量行 ---
    DeclarationStart => concat!("\\s*(?P<final>final\\s+)?(?P<type>", type_keyword!(), ")\\s+"),
    FinalKeyword     => "\\s*final\\s",
    Name             => concat!("\\s*(?P<name>", ident!(), ")"),
    CommaName        => concat!("\\s*,\\s*(?P<name>", ident!(), ")"),
    Assign           => concat!("\\s*=\\s*(?P<value>", value!(), ")"),
    StatementEnd     => "\\s*;\\s*",

    // --- 方法声明与调用 ---
    VoidKeyword     => "\\s*void\\s+",
    MethodOpen      => concat!("\\s*(?P<name>", method_name!(), ")\\s*\\("),
    DeclParam       => concat!(
        "\\s*(?P<final>final\\s+)?(?P<type>", type_keyword!(), ")\\s+(?P<name>", ident!(), ")\\s*"
    ),
    CallParam       => concat!("\\s*(?P<value>", value!(), ")\\s*"),
    Comma           => "\\s*,",
    CloseParen      => "\\s*\\)",
    OpenBrace       => "\\s*\\{",
    Semicolon       => "\\s*;",

    // --- if / while 头部 ---
    IfOpen          => "\\s*if\\s*\\(\\s*",
    WhileOpen       => "\\s*while\\s*\\(\\s*",
    Operand         => concat!("(?P<value>", number!(), "|", ident!(), ")"),
    Operator        => "\\s*(?P<op>&&|\\|\\|)\\s*",
    HeaderClose     => "\\s*\\)\\s*\\{\\s*",
}
