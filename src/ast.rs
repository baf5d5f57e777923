//! Go-shaped syntax tree.
//!
//! The parser does not build a bespoke tree: every node here mirrors the
//! corresponding `go/ast` node closely enough that a Go pretty-printer can
//! format the tree without further annotation. Field names follow the Go
//! originals (`x`, `sel`, `fun`, `lhs`, `tok`, ...).

use serde::{Deserialize, Serialize};

// ============================================================================
// TOKENS & LITERAL KINDS
// ============================================================================

/// Go operator and keyword tags carried inside AST nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tok {
    Add,
    Mul,
    Quo,
    Rem,
    Eql,
    Lss,
    Gtr,
    Neq,
    And,
    Inc,
    Dec,
    Define,
    Assign,
    Var,
    Import,
    Type,
}

impl Tok {
    /// The Go surface spelling of the token.
    pub fn symbol(self) -> &'static str {
        match self {
            Tok::Add => "+",
            Tok::Mul => "*",
            Tok::Quo => "/",
            Tok::Rem => "%",
            Tok::Eql => "==",
            Tok::Lss => "<",
            Tok::Gtr => ">",
            Tok::Neq => "!=",
            Tok::And => "&",
            Tok::Inc => "++",
            Tok::Dec => "--",
            Tok::Define => ":=",
            Tok::Assign => "=",
            Tok::Var => "var",
            Tok::Import => "import",
            Tok::Type => "type",
        }
    }
}

/// Literal kind of a [`BasicLit`], mirroring `token.INT` and friends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LitKind {
    Int,
    Float,
    String,
    Char,
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ident {
    pub name: String,
}

impl Ident {
    pub fn new(name: impl Into<String>) -> Self {
        Ident { name: name.into() }
    }
}

/// A literal leaf. `value` carries the verbatim source text including
/// delimiters, exactly as a Go printer expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicLit {
    pub kind: LitKind,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub x: Box<Expr>,
    pub op: Tok,
    pub y: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub op: Tok,
    pub x: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectorExpr {
    pub x: Box<Expr>,
    pub sel: Ident,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallExpr {
    pub fun: Box<Expr>,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Ident(Ident),
    BasicLit(BasicLit),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Selector(SelectorExpr),
    Call(CallExpr),
}

impl Expr {
    /// Renders the expression back in Jo surface form, for diagnostics and
    /// the occasional debugging session.
    pub fn unparse(&self) -> String {
        match self {
            Expr::Ident(ident) => ident.name.clone(),
            Expr::BasicLit(lit) => lit.value.clone(),
            Expr::Binary(b) => {
                format!("({} {} {})", b.op.symbol(), b.x.unparse(), b.y.unparse())
            }
            Expr::Unary(u) => format!("{}{}", u.op.symbol(), u.x.unparse()),
            Expr::Selector(s) => format!("{}.{}", s.x.unparse(), s.sel.name),
            Expr::Call(c) => {
                let mut list = vec![c.fun.unparse()];
                list.extend(c.args.iter().map(Expr::unparse));
                format!("({})", list.join(" "))
            }
        }
    }
}

// ============================================================================
// STATEMENTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExprStmt {
    pub x: Expr,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BlockStmt {
    pub list: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfStmt {
    pub cond: Expr,
    pub body: BlockStmt,
    pub else_body: Option<BlockStmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForStmt {
    pub init: Box<Stmt>,
    pub cond: Expr,
    pub post: Box<Stmt>,
    pub body: BlockStmt,
}

/// A tagless `switch`; the body list holds [`Stmt::Case`] entries only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchStmt {
    pub body: BlockStmt,
}

/// `list: None` is the `default` clause.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseClause {
    pub list: Option<Vec<Expr>>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignStmt {
    pub lhs: Vec<Expr>,
    pub tok: Tok,
    pub rhs: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclStmt {
    pub decl: GenDecl,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncDecStmt {
    pub x: Expr,
    pub tok: Tok,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    Expr(ExprStmt),
    Block(BlockStmt),
    If(IfStmt),
    For(ForStmt),
    Switch(SwitchStmt),
    Case(CaseClause),
    Assign(AssignStmt),
    Decl(DeclStmt),
    IncDec(IncDecStmt),
}

// ============================================================================
// DECLARATIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportSpec {
    pub path: BasicLit,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSpec {
    pub name: Ident,
    pub ty: StructType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueSpec {
    pub name: Ident,
    pub ty: Ident,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Spec {
    Import(ImportSpec),
    Type(TypeSpec),
    Value(ValueSpec),
}

/// An `import`, `type` or `var` declaration, discriminated by `tok`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenDecl {
    pub tok: Tok,
    pub specs: Vec<Spec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: Ident,
    pub ty: Ident,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldList {
    pub list: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructType {
    pub fields: FieldList,
}

/// The parameter list is always present, even when empty; Go printers
/// dereference it unconditionally.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FuncType {
    pub params: FieldList,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncDecl {
    pub name: Ident,
    pub ty: FuncType,
    pub body: BlockStmt,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Decl {
    Gen(GenDecl),
    Func(FuncDecl),
}

/// Root of the tree: package clause plus declarations, imports first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
    pub name: Ident,
    pub decls: Vec<Decl>,
}
