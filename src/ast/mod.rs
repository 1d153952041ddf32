use crate::lexer::token::{DeclaredType, Quote};

use std::ops::Range;

pub type Spanned<T> = (T, Range<usize>);

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub statements: Vec<Spanned<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Declare(Declaration),
    Store(Store),
    Update(Mutation),
    Check(CheckChain),
    RepeatRange {
        var: String,
        start: Spanned<Expr>,
        end: Spanned<Expr>,
        step: Spanned<Expr>,
        body: Vec<Spanned<Stmt>>,
    },
    RepeatEach {
        var: String,
        collection: String,
        body: Vec<Spanned<Stmt>>,
    },
    For {
        init: Box<Spanned<ForInit>>,
        condition: Spanned<Expr>,
        increment: Box<Spanned<Mutation>>,
        body: Vec<Spanned<Stmt>>,
    },
    RepeatUntil {
        condition: Spanned<Expr>,
        body: Vec<Spanned<Stmt>>,
    },
    Function(Function),
    Give(Spanned<Expr>),
    Show(Spanned<Expr>),
    Error(Spanned<Expr>),
    Panic(Spanned<Expr>),
    Skip,
    Halt,
    Raw(String),
    /// A call or method dispatch evaluated for its effect.
    Expr(Spanned<Expr>),
}

/// Host binding selected by the declaration qualifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Local,
    Global,
    Fixed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub binding: Binding,
    pub name: String,
    pub declared: Option<Spanned<DeclaredType>>,
    pub value: Option<Spanned<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Store {
    pub binding: Binding,
    pub name: String,
    pub text: String,
    pub quote: Quote,
    pub text_span: Range<usize>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mutation {
    pub target: String,
    pub indices: Vec<Spanned<Expr>>,
    pub value: Spanned<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Guarded {
    pub condition: Spanned<Expr>,
    pub body: Vec<Spanned<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckChain {
    pub primary: Guarded,
    pub alternates: Vec<Guarded>,
    pub fallback: Option<Vec<Spanned<Stmt>>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    Declare(Declaration),
    Update(Mutation),
    Identifier(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<String>,
    pub return_type: Option<Spanned<DeclaredType>>,
    pub body: Vec<Spanned<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Str(String, Quote),
    Bool(bool),
    Null,
    Undefined,
    Input,

    Identifier(String),
    Index {
        target: Box<Spanned<Expr>>,
        index: Box<Spanned<Expr>>,
    },
    Call {
        name: String,
        args: Vec<Spanned<Expr>>,
    },
    Array(Vec<Spanned<Expr>>),
    Lambda {
        params: Vec<String>,
        body: Box<Spanned<Expr>>,
    },
    Method(MethodCall),

    BinOp {
        operator: BinOp,
        l_value: Box<Spanned<Expr>>,
        r_value: Box<Spanned<Expr>>,
    },
    UnOp {
        unop: UnOp,
        expression: Box<Spanned<Expr>>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub target_type: Spanned<DeclaredType>,
    pub target: String,
    pub method: Spanned<String>,
    pub args: Vec<Spanned<Expr>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Power,

    Eq,
    StrictEq,
    NotEq,
    StrictNotEq,
    Less,
    Greater,
    LessEq,
    GreaterEq,

    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Plus,
    Minus,
}
