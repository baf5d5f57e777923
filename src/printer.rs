//! Go source emission.
//!
//! Walks a [`File`] and produces gofmt-shaped Go text: tab indentation,
//! blank lines between declarations, `} else {` on one line. Spacing
//! around binary operators is uniform; the contract downstream is
//! structural, not byte-for-byte `go/printer` output.

use crate::ast::{
    BlockStmt, CaseClause, Decl, Expr, Field, FieldList, File, FuncDecl, GenDecl, Spec, Stmt, Tok,
};

/// Pretty-prints the file as Go source. The output always ends in a
/// newline.
pub fn fprint(file: &File) -> String {
    let mut printer = Printer::default();
    printer.file(file);
    printer.out
}

/// Go binary-operator precedence, used to decide where a nested binary
/// expression must be parenthesised to keep the tree's structure.
fn precedence(op: Tok) -> u8 {
    match op {
        Tok::Mul | Tok::Quo | Tok::Rem => 5,
        Tok::Add => 4,
        Tok::Eql | Tok::Neq | Tok::Lss | Tok::Gtr => 3,
        other => unreachable!("expected a binary operator, got {other:?}"),
    }
}

fn operand_text(expr: &Expr, parent_prec: u8, is_right: bool) -> String {
    if let Expr::Binary(child) = expr {
        let child_prec = precedence(child.op);
        if child_prec < parent_prec || (is_right && child_prec == parent_prec) {
            return format!("({})", expr_text(expr));
        }
    }
    expr_text(expr)
}

fn expr_text(expr: &Expr) -> String {
    match expr {
        Expr::Ident(ident) => ident.name.clone(),
        Expr::BasicLit(lit) => lit.value.clone(),
        Expr::Binary(b) => {
            let prec = precedence(b.op);
            format!(
                "{} {} {}",
                operand_text(&b.x, prec, false),
                b.op.symbol(),
                operand_text(&b.y, prec, true)
            )
        }
        Expr::Unary(u) => match u.x.as_ref() {
            Expr::Binary(_) => format!("{}({})", u.op.symbol(), expr_text(&u.x)),
            _ => format!("{}{}", u.op.symbol(), expr_text(&u.x)),
        },
        Expr::Selector(s) => format!("{}.{}", expr_text(&s.x), s.sel.name),
        Expr::Call(c) => {
            let args: Vec<String> = c.args.iter().map(expr_text).collect();
            format!("{}({})", expr_text(&c.fun), args.join(", "))
        }
    }
}

fn expr_list_text(exprs: &[Expr]) -> String {
    exprs.iter().map(expr_text).collect::<Vec<_>>().join(", ")
}

fn field_text(field: &Field) -> String {
    format!("{} {}", field.name.name, field.ty.name)
}

fn params_text(params: &FieldList) -> String {
    let fields: Vec<String> = params.list.iter().map(field_text).collect();
    format!("({})", fields.join(", "))
}

/// One-line form of a simple statement, for `for` clauses.
fn simple_stmt_text(stmt: &Stmt) -> String {
    match stmt {
        Stmt::Expr(e) => expr_text(&e.x),
        Stmt::Assign(a) => format!(
            "{} {} {}",
            expr_list_text(&a.lhs),
            a.tok.symbol(),
            expr_list_text(&a.rhs)
        ),
        Stmt::IncDec(i) => format!("{}{}", expr_text(&i.x), i.tok.symbol()),
        Stmt::Decl(d) => var_text(&d.decl),
        other => unreachable!("expected simple statement, got {other:?}"),
    }
}

fn var_text(decl: &GenDecl) -> String {
    match decl.specs.as_slice() {
        [Spec::Value(spec)] => format!("var {} {}", spec.name.name, spec.ty.name),
        specs => unreachable!("expected a single value spec, got {specs:?}"),
    }
}

#[derive(Default)]
struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    fn line(&mut self, text: &str) {
        for _ in 0..self.indent {
            self.out.push('\t');
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn file(&mut self, file: &File) {
        self.line(&format!("package {}", file.name.name));
        for decl in &file.decls {
            self.out.push('\n');
            self.decl(decl);
        }
    }

    fn decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Gen(gen) => self.gen_decl(gen),
            Decl::Func(func) => self.func_decl(func),
        }
    }

    fn gen_decl(&mut self, decl: &GenDecl) {
        match decl.tok {
            Tok::Import => self.import_decl(decl),
            Tok::Type => self.type_decl(decl),
            Tok::Var => self.line(&var_text(decl)),
            tok => unreachable!("expected a declaration token, got {tok:?}"),
        }
    }

    fn import_decl(&mut self, decl: &GenDecl) {
        let paths: Vec<&str> = decl
            .specs
            .iter()
            .map(|spec| match spec {
                Spec::Import(import) => import.path.value.as_str(),
                other => unreachable!("expected an import spec, got {other:?}"),
            })
            .collect();
        match paths.as_slice() {
            [single] => self.line(&format!("import {single}")),
            many => {
                self.line("import (");
                self.indent += 1;
                for path in many {
                    self.line(path);
                }
                self.indent -= 1;
                self.line(")");
            }
        }
    }

    fn type_decl(&mut self, decl: &GenDecl) {
        for spec in &decl.specs {
            let Spec::Type(spec) = spec else {
                unreachable!("expected a type spec, got {spec:?}");
            };
            if spec.ty.fields.list.is_empty() {
                self.line(&format!("type {} struct{{}}", spec.name.name));
                continue;
            }
            self.line(&format!("type {} struct {{", spec.name.name));
            self.indent += 1;
            for field in &spec.ty.fields.list {
                self.line(&field_text(field));
            }
            self.indent -= 1;
            self.line("}");
        }
    }

    fn func_decl(&mut self, decl: &FuncDecl) {
        self.line(&format!(
            "func {}{} {{",
            decl.name.name,
            params_text(&decl.ty.params)
        ));
        self.block_body(&decl.body);
        self.line("}");
    }

    fn block_body(&mut self, block: &BlockStmt) {
        self.indent += 1;
        for stmt in &block.list {
            self.stmt(stmt);
        }
        self.indent -= 1;
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Expr(_) | Stmt::Assign(_) | Stmt::IncDec(_) | Stmt::Decl(_) => {
                self.line(&simple_stmt_text(stmt))
            }
            Stmt::Block(block) => {
                self.line("{");
                self.block_body(block);
                self.line("}");
            }
            Stmt::If(stmt) => {
                self.line(&format!("if {} {{", expr_text(&stmt.cond)));
                self.block_body(&stmt.body);
                match &stmt.else_body {
                    Some(else_body) => {
                        self.line("} else {");
                        self.block_body(else_body);
                        self.line("}");
                    }
                    None => self.line("}"),
                }
            }
            Stmt::For(stmt) => {
                self.line(&format!(
                    "for {}; {}; {} {{",
                    simple_stmt_text(&stmt.init),
                    expr_text(&stmt.cond),
                    simple_stmt_text(&stmt.post)
                ));
                self.block_body(&stmt.body);
                self.line("}");
            }
            Stmt::Switch(stmt) => {
                self.line("switch {");
                for clause in &stmt.body.list {
                    self.stmt(clause);
                }
                self.line("}");
            }
            Stmt::Case(clause) => self.case_clause(clause),
        }
    }

    fn case_clause(&mut self, clause: &CaseClause) {
        match &clause.list {
            Some(list) => self.line(&format!("case {}:", expr_list_text(list))),
            None => self.line("default:"),
        }
        self.indent += 1;
        for stmt in &clause.body {
            self.stmt(stmt);
        }
        self.indent -= 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BasicLit, BinaryExpr, Ident, LitKind, SelectorExpr};

    #[test]
    fn binary_exprs_get_uniform_spacing() {
        let expr = Expr::Binary(BinaryExpr {
            x: Box::new(Expr::BasicLit(BasicLit {
                kind: LitKind::Int,
                value: "0".into(),
            })),
            op: Tok::Eql,
            y: Box::new(Expr::Ident(Ident::new("i"))),
        });
        assert_eq!(expr_text(&expr), "0 == i");
    }

    #[test]
    fn lower_precedence_operands_get_parenthesised() {
        let one_plus_two = Expr::Binary(BinaryExpr {
            x: Box::new(Expr::BasicLit(BasicLit {
                kind: LitKind::Int,
                value: "1".into(),
            })),
            op: Tok::Add,
            y: Box::new(Expr::BasicLit(BasicLit {
                kind: LitKind::Int,
                value: "2".into(),
            })),
        });
        let product = Expr::Binary(BinaryExpr {
            x: Box::new(one_plus_two),
            op: Tok::Mul,
            y: Box::new(Expr::BasicLit(BasicLit {
                kind: LitKind::Int,
                value: "3".into(),
            })),
        });
        assert_eq!(expr_text(&product), "(1 + 2) * 3");
    }

    #[test]
    fn selector_chains_flatten() {
        let expr = Expr::Selector(SelectorExpr {
            x: Box::new(Expr::Selector(SelectorExpr {
                x: Box::new(Expr::Ident(Ident::new("a"))),
                sel: Ident::new("b"),
            })),
            sel: Ident::new("c"),
        });
        assert_eq!(expr_text(&expr), "a.b.c");
    }
}
