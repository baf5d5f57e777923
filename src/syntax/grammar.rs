//! Grammar rules: Jo surface forms to Go-shaped AST nodes.
//!
//! Every rule is a free function from cursor to parse result, so the
//! mutually recursive ones (`expr`, `statement`, `block`, `selector`) tie
//! the knot simply by naming each other. Reserved words are claimed with
//! explicit `keyword(...)` parsers; everywhere else they are ordinary
//! identifiers.
//!
//! Choice order is load-bearing throughout: the qualified form before the
//! bare identifier, `do` blocks before single statements, `selector`
//! before `call_expr`. Reorderings change the accepted language.

use super::atoms::{basic_lit, ident, identifier, string_lit};
use super::combinators::{
    choice, delimited, left, literal, map, one_or_more, optional, pair, parenthesized, right,
    rune, whitespace0, whitespace1, whitespace_wrap, zero_or_more, Match, PResult, ParseError,
    Parser,
};
use super::source::Source;
use crate::ast::{
    AssignStmt, BinaryExpr, BlockStmt, CallExpr, CaseClause, Decl, DeclStmt, Expr, ExprStmt,
    Field, FieldList, File, ForStmt, FuncDecl, FuncType, GenDecl, Ident, IfStmt, ImportSpec,
    IncDecStmt, SelectorExpr, Spec, Stmt, StructType, SwitchStmt, Tok, TypeSpec, UnaryExpr,
    ValueSpec,
};

fn keyword<'a>(word: &'static str) -> impl Parser<'a> {
    literal(word)
}

/// Zero-width check that a keyword ends here: at whitespace, at the
/// closing `)`, or at end of input. Keywords whose arguments are optional
/// need this; a bare `literal` match would eat the prefix of longer
/// identifiers like `download`.
fn keyword_boundary(src: Source<'_>) -> PResult<'_> {
    match src.peek_rune() {
        None => Ok((src, Match::None)),
        Some((c, _)) if c.is_whitespace() || c == ')' => Ok((src, Match::None)),
        Some((c, _)) => Err(ParseError::new(
            src.offset(),
            format!("wanted a word boundary, got {c:?}"),
        )),
    }
}

fn op_rune<'a>(c: char, tok: Tok) -> impl Parser<'a> {
    map(rune(c), move |_| Match::Tok(tok))
}

// ============================================================================
// OPERAND NAMES
// ============================================================================

/// `IDENT.IDENT`, e.g. `fmt.Println`.
pub fn qualified_ident(src: Source<'_>) -> PResult<'_> {
    map(
        pair(identifier, right(rune('.'), identifier)),
        |m| {
            let (package, name) = m.into_pair();
            Match::Expr(Expr::Selector(SelectorExpr {
                x: Box::new(Expr::Ident(Ident::new(package.into_text()))),
                sel: Ident::new(name.into_text()),
            }))
        },
    )
    .parse(src)
}

/// Qualified first, or `fmt.Println` would stop at `fmt`.
pub fn operand_name(src: Source<'_>) -> PResult<'_> {
    choice((qualified_ident, ident)).parse(src)
}

// ============================================================================
// EXPRESSIONS
// ============================================================================

fn binary_op(src: Source<'_>) -> PResult<'_> {
    choice((
        choice((
            op_rune('+', Tok::Add),
            op_rune('*', Tok::Mul),
            op_rune('/', Tok::Quo),
            op_rune('=', Tok::Eql),
        )),
        choice((
            op_rune('<', Tok::Lss),
            op_rune('>', Tok::Gtr),
            op_rune('%', Tok::Rem),
        )),
        map(literal("!="), |_| Match::Tok(Tok::Neq)),
    ))
    .parse(src)
}

/// `(OP Expr Expr)` in prefix form.
pub fn binary_expr(src: Source<'_>) -> PResult<'_> {
    map(
        parenthesized(pair(
            binary_op,
            pair(whitespace_wrap(expr), whitespace_wrap(expr)),
        )),
        |m| {
            let (op, operands) = m.into_pair();
            let (x, y) = operands.into_pair();
            Match::Expr(Expr::Binary(BinaryExpr {
                x: Box::new(x.into_expr()),
                op: op.into_tok(),
                y: Box::new(y.into_expr()),
            }))
        },
    )
    .parse(src)
}

fn unary_op(src: Source<'_>) -> PResult<'_> {
    op_rune('&', Tok::And).parse(src)
}

/// `OP Expr`, not parenthesised: `&x`.
pub fn unary_expr(src: Source<'_>) -> PResult<'_> {
    map(pair(unary_op, expr), |m| {
        let (op, x) = m.into_pair();
        Match::Expr(Expr::Unary(UnaryExpr {
            op: op.into_tok(),
            x: Box::new(x.into_expr()),
        }))
    })
    .parse(src)
}

/// `(OperandName Expr*)`.
pub fn call_expr(src: Source<'_>) -> PResult<'_> {
    map(
        parenthesized(pair(operand_name, zero_or_more(whitespace_wrap(expr)))),
        |m| {
            let (fun, args) = m.into_pair();
            Match::Expr(Expr::Call(CallExpr {
                fun: Box::new(fun.into_expr()),
                args: args.into_seq().into_iter().map(Match::into_expr).collect(),
            }))
        },
    )
    .parse(src)
}

/// A selector suffix: a bare ident, or a parenthesised call `(Ident Expr*)`.
fn selector_suffix(src: Source<'_>) -> PResult<'_> {
    choice((
        ident,
        parenthesized(pair(ident, zero_or_more(whitespace_wrap(expr)))),
    ))
    .parse(src)
}

/// `(sel Base Suffix+)`, folding left: `(sel a B (C 1) D)` becomes
/// `a.B.C(1).D` shaped nodes.
pub fn selector(src: Source<'_>) -> PResult<'_> {
    map(
        parenthesized(right(
            keyword("sel"),
            right(
                whitespace1(),
                pair(operand_name, one_or_more(whitespace_wrap(selector_suffix))),
            ),
        )),
        |m| {
            let (base, suffixes) = m.into_pair();
            let mut acc = base.into_expr();
            for suffix in suffixes.into_seq() {
                acc = match suffix {
                    Match::Expr(Expr::Ident(sel)) => Expr::Selector(SelectorExpr {
                        x: Box::new(acc),
                        sel,
                    }),
                    Match::Pair(name, args) => {
                        let fun = Expr::Selector(SelectorExpr {
                            x: Box::new(acc),
                            sel: name.into_ident(),
                        });
                        Expr::Call(CallExpr {
                            fun: Box::new(fun),
                            args: args.into_seq().into_iter().map(Match::into_expr).collect(),
                        })
                    }
                    other => unreachable!("expected selector suffix, got {other:?}"),
                };
            }
            Match::Expr(acc)
        },
    )
    .parse(src)
}

/// The expression alternation. `selector` must precede `call_expr` so that
/// `(sel ...)` is not taken as a call to a function named `sel`.
pub fn expr(src: Source<'_>) -> PResult<'_> {
    choice((basic_lit, binary_expr, unary_expr, selector, call_expr, operand_name)).parse(src)
}

// ============================================================================
// SIMPLE STATEMENTS
// ============================================================================

/// A single `Ident`, or `(Ident Ident*)`; always a list payload.
fn identifier_list(src: Source<'_>) -> PResult<'_> {
    choice((
        map(ident, |m| Match::Seq(vec![m])),
        parenthesized(one_or_more(whitespace_wrap(ident))),
    ))
    .parse(src)
}

/// A single ident, a single basic literal, or `(Expr Expr*)`.
fn expression_list(src: Source<'_>) -> PResult<'_> {
    choice((
        map(ident, |m| Match::Seq(vec![m])),
        map(basic_lit, |m| Match::Seq(vec![m])),
        parenthesized(one_or_more(whitespace_wrap(expr))),
    ))
    .parse(src)
}

fn assignment_like(m: Match, tok: Tok) -> Match {
    let (lhs, rhs) = m.into_pair();
    Match::Stmt(Stmt::Assign(AssignStmt {
        lhs: lhs.into_seq().into_iter().map(Match::into_expr).collect(),
        tok,
        rhs: rhs.into_seq().into_iter().map(Match::into_expr).collect(),
    }))
}

/// `(define IdentifierList ExpressionList)` is Go's `:=`.
pub fn define_stmt(src: Source<'_>) -> PResult<'_> {
    map(
        parenthesized(right(
            keyword("define"),
            right(
                whitespace1(),
                pair(identifier_list, whitespace_wrap(expression_list)),
            ),
        )),
        |m| assignment_like(m, Tok::Define),
    )
    .parse(src)
}

/// `(assign IdentifierList ExpressionList)` is Go's `=`.
pub fn assign_stmt(src: Source<'_>) -> PResult<'_> {
    map(
        parenthesized(right(
            keyword("assign"),
            right(
                whitespace1(),
                pair(identifier_list, whitespace_wrap(expression_list)),
            ),
        )),
        |m| assignment_like(m, Tok::Assign),
    )
    .parse(src)
}

/// `(inc Expr)` / `(dec Expr)`.
pub fn inc_dec_stmt(src: Source<'_>) -> PResult<'_> {
    map(
        parenthesized(pair(
            choice((
                map(keyword("inc"), |_| Match::Tok(Tok::Inc)),
                map(keyword("dec"), |_| Match::Tok(Tok::Dec)),
            )),
            right(whitespace1(), expr),
        )),
        |m| {
            let (tok, x) = m.into_pair();
            Match::Stmt(Stmt::IncDec(IncDecStmt {
                x: x.into_expr(),
                tok: tok.into_tok(),
            }))
        },
    )
    .parse(src)
}

fn expr_stmt(src: Source<'_>) -> PResult<'_> {
    map(expr, |m| {
        Match::Stmt(Stmt::Expr(ExprStmt { x: m.into_expr() }))
    })
    .parse(src)
}

pub fn simple_stmt(src: Source<'_>) -> PResult<'_> {
    choice((define_stmt, assign_stmt, inc_dec_stmt, expr_stmt)).parse(src)
}

// ============================================================================
// COMPOUND STATEMENTS
// ============================================================================

/// `(var IDENT IDENT)`.
pub fn decl_stmt(src: Source<'_>) -> PResult<'_> {
    map(
        parenthesized(right(
            keyword("var"),
            right(whitespace1(), pair(ident, right(whitespace1(), ident))),
        )),
        |m| {
            let (name, ty) = m.into_pair();
            Match::Stmt(Stmt::Decl(DeclStmt {
                decl: GenDecl {
                    tok: Tok::Var,
                    specs: vec![Spec::Value(ValueSpec {
                        name: name.into_ident(),
                        ty: ty.into_ident(),
                    })],
                },
            }))
        },
    )
    .parse(src)
}

/// `(do Statement*)`: the statements, not yet wrapped in a block.
fn do_expr(src: Source<'_>) -> PResult<'_> {
    parenthesized(right(
        left(keyword("do"), keyword_boundary),
        zero_or_more(whitespace_wrap(statement)),
    ))
    .parse(src)
}

/// Always yields exactly one `BlockStmt`: a `do` form keeps its list
/// (empty for `(do)`), any other statement becomes a singleton block.
pub fn block(src: Source<'_>) -> PResult<'_> {
    choice((
        map(do_expr, |m| {
            Match::Block(BlockStmt {
                list: m.into_seq().into_iter().map(Match::into_stmt).collect(),
            })
        }),
        map(statement, |m| {
            Match::Block(BlockStmt {
                list: vec![m.into_stmt()],
            })
        }),
    ))
    .parse(src)
}

/// `(if Expr Block Block?)`.
pub fn if_stmt(src: Source<'_>) -> PResult<'_> {
    map(
        parenthesized(right(
            keyword("if"),
            right(
                whitespace1(),
                pair(
                    expr,
                    pair(whitespace_wrap(block), optional(whitespace_wrap(block))),
                ),
            ),
        )),
        |m| {
            let (cond, rest) = m.into_pair();
            let (body, else_match) = rest.into_pair();
            let else_body = match else_match {
                Match::None => None,
                matched => Some(matched.into_block()),
            };
            Match::Stmt(Stmt::If(IfStmt {
                cond: cond.into_expr(),
                body: body.into_block(),
                else_body,
            }))
        },
    )
    .parse(src)
}

/// `(for SimpleStmt Expr SimpleStmt Block)`: init, condition, post, body.
pub fn for_stmt(src: Source<'_>) -> PResult<'_> {
    map(
        parenthesized(right(
            keyword("for"),
            right(
                whitespace1(),
                pair(
                    simple_stmt,
                    pair(
                        whitespace_wrap(expr),
                        pair(whitespace_wrap(simple_stmt), whitespace_wrap(block)),
                    ),
                ),
            ),
        )),
        |m| {
            let (init, rest) = m.into_pair();
            let (cond, rest) = rest.into_pair();
            let (post, body) = rest.into_pair();
            Match::Stmt(Stmt::For(ForStmt {
                init: Box::new(init.into_stmt()),
                cond: cond.into_expr(),
                post: Box::new(post.into_stmt()),
                body: body.into_block(),
            }))
        },
    )
    .parse(src)
}

/// `(case ExpressionList Block)` or `(default Block)`.
fn case_clause(src: Source<'_>) -> PResult<'_> {
    choice((
        map(
            parenthesized(right(
                keyword("case"),
                right(
                    whitespace1(),
                    pair(expression_list, whitespace_wrap(block)),
                ),
            )),
            |m| {
                let (list, body) = m.into_pair();
                Match::Case(CaseClause {
                    list: Some(list.into_seq().into_iter().map(Match::into_expr).collect()),
                    body: body.into_block().list,
                })
            },
        ),
        map(
            parenthesized(right(
                left(keyword("default"), keyword_boundary),
                whitespace_wrap(block),
            )),
            |m| {
                Match::Case(CaseClause {
                    list: None,
                    body: m.into_block().list,
                })
            },
        ),
    ))
    .parse(src)
}

/// `(switch CaseClause*)`: a tagless expression switch.
pub fn switch_stmt(src: Source<'_>) -> PResult<'_> {
    map(
        parenthesized(right(
            keyword("switch"),
            zero_or_more(whitespace_wrap(case_clause)),
        )),
        |m| {
            let clauses = m
                .into_seq()
                .into_iter()
                .map(|clause| Stmt::Case(clause.into_case()))
                .collect();
            Match::Stmt(Stmt::Switch(SwitchStmt {
                body: BlockStmt { list: clauses },
            }))
        },
    )
    .parse(src)
}

pub fn statement(src: Source<'_>) -> PResult<'_> {
    choice((switch_stmt, for_stmt, decl_stmt, if_stmt, simple_stmt)).parse(src)
}

fn statement_list(src: Source<'_>) -> PResult<'_> {
    zero_or_more(whitespace_wrap(statement)).parse(src)
}

// ============================================================================
// DECLARATIONS
// ============================================================================

/// `(package IDENT)`.
pub fn package_clause(src: Source<'_>) -> PResult<'_> {
    parenthesized(right(keyword("package"), right(whitespace1(), ident))).parse(src)
}

/// `(import STRINGLIT+)`, one spec per path.
pub fn import_decl(src: Source<'_>) -> PResult<'_> {
    map(
        parenthesized(right(
            keyword("import"),
            right(whitespace1(), one_or_more(whitespace_wrap(string_lit))),
        )),
        |m| {
            let specs = m
                .into_seq()
                .into_iter()
                .map(|path| Spec::Import(ImportSpec { path: path.into_lit() }))
                .collect();
            Match::Decl(Decl::Gen(GenDecl {
                tok: Tok::Import,
                specs,
            }))
        },
    )
    .parse(src)
}

/// `(IDENT IDENT)`: one struct field, name then type.
fn field_decl(src: Source<'_>) -> PResult<'_> {
    map(
        parenthesized(pair(ident, right(whitespace1(), ident))),
        |m| {
            let (name, ty) = m.into_pair();
            Match::Field(Field {
                name: name.into_ident(),
                ty: ty.into_ident(),
            })
        },
    )
    .parse(src)
}

/// `(struct (IDENT IDENT)*)`.
pub fn struct_type(src: Source<'_>) -> PResult<'_> {
    map(
        parenthesized(right(
            keyword("struct"),
            zero_or_more(whitespace_wrap(field_decl)),
        )),
        |m| {
            Match::Struct(StructType {
                fields: FieldList {
                    list: m.into_seq().into_iter().map(Match::into_field).collect(),
                },
            })
        },
    )
    .parse(src)
}

/// `(type IDENT StructType)`.
pub fn type_decl(src: Source<'_>) -> PResult<'_> {
    map(
        parenthesized(right(
            keyword("type"),
            right(whitespace1(), pair(ident, whitespace_wrap(struct_type))),
        )),
        |m| {
            let (name, ty) = m.into_pair();
            Match::Decl(Decl::Gen(GenDecl {
                tok: Tok::Type,
                specs: vec![Spec::Type(TypeSpec {
                    name: name.into_ident(),
                    ty: ty.into_struct(),
                })],
            }))
        },
    )
    .parse(src)
}

fn empty_params(src: Source<'_>) -> PResult<'_> {
    map(delimited('(', ')', whitespace0()), |_| Match::None).parse(src)
}

/// `(func IDENT () StatementList)`. The parameter list is fixed empty but
/// still present in the node, as Go printers require.
pub fn function_decl(src: Source<'_>) -> PResult<'_> {
    map(
        parenthesized(right(
            keyword("func"),
            right(
                whitespace1(),
                pair(ident, right(whitespace_wrap(empty_params), statement_list)),
            ),
        )),
        |m| {
            let (name, body) = m.into_pair();
            Match::Decl(Decl::Func(FuncDecl {
                name: name.into_ident(),
                ty: FuncType {
                    params: FieldList::default(),
                },
                body: BlockStmt {
                    list: body.into_seq().into_iter().map(Match::into_stmt).collect(),
                },
            }))
        },
    )
    .parse(src)
}

fn top_level_decl(src: Source<'_>) -> PResult<'_> {
    choice((type_decl, function_decl)).parse(src)
}

/// PackageClause ImportDecl* TopLevelDecl+, imports first in the output.
pub fn source_file(src: Source<'_>) -> PResult<'_> {
    map(
        pair(
            whitespace_wrap(package_clause),
            pair(
                zero_or_more(whitespace_wrap(import_decl)),
                one_or_more(whitespace_wrap(top_level_decl)),
            ),
        ),
        |m| {
            let (name, rest) = m.into_pair();
            let (imports, top_level) = rest.into_pair();
            let mut decls: Vec<Decl> = Vec::new();
            decls.extend(imports.into_seq().into_iter().map(Match::into_decl));
            decls.extend(top_level.into_seq().into_iter().map(Match::into_decl));
            Match::File(File {
                name: name.into_ident(),
                decls,
            })
        },
    )
    .parse(src)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qualified_ident_builds_a_selector() {
        let (_, matched) = qualified_ident(Source::new("fmt.Println")).unwrap();
        assert_eq!(
            matched.into_expr(),
            Expr::Selector(SelectorExpr {
                x: Box::new(Expr::Ident(Ident::new("fmt"))),
                sel: Ident::new("Println"),
            })
        );
    }

    #[test]
    fn operand_name_tries_the_qualified_form_first() {
        let (next, matched) = operand_name(Source::new("fmt.Println 1")).unwrap();
        assert_eq!(next.rest(), " 1");
        assert!(matches!(matched.into_expr(), Expr::Selector(_)));

        let (_, matched) = operand_name(Source::new("println")).unwrap();
        assert_eq!(matched.into_expr(), Expr::Ident(Ident::new("println")));
    }

    #[test]
    fn binary_op_maps_to_go_tokens() {
        for (source, tok) in [
            ("+", Tok::Add),
            ("*", Tok::Mul),
            ("/", Tok::Quo),
            ("=", Tok::Eql),
            ("<", Tok::Lss),
            (">", Tok::Gtr),
            ("%", Tok::Rem),
            ("!=", Tok::Neq),
        ] {
            let (_, matched) = binary_op(Source::new(source)).unwrap();
            assert_eq!(matched.into_tok(), tok);
        }
    }

    #[test]
    fn empty_do_is_an_empty_block() {
        let (_, matched) = block(Source::new("(do)")).unwrap();
        assert_eq!(matched.into_block(), BlockStmt::default());
    }

    #[test]
    fn do_needs_a_word_boundary() {
        // `(download)` is a call, not a `do` block eating the "do" prefix.
        let (_, matched) = block(Source::new("(download)")).unwrap();
        let list = matched.into_block().list;
        assert_eq!(list.len(), 1);
        assert!(
            matches!(&list[0], Stmt::Expr(stmt) if matches!(&stmt.x, Expr::Call(_)))
        );
    }
}
