//! Pure-expression analysis used by the Quick-Fix Engine's normalization
//! pass (spec §4.3). An expression is pure iff removing it cannot change
//! program behavior; ported from `original_source/quickfix.go::isPureExpr`.

use crate::ast::Expr;

/// Side-effect-free built-ins that may appear as a pure call's callee.
pub const PURE_BUILTIN_FUNC_NAMES: &[&str] = &["append", "cap", "complex", "imag", "len", "make", "new", "real"];

/// Go's predeclared type names, recognized as type-conversion callees.
const PREDECLARED_TYPES: &[&str] = &[
    "bool", "string", "error", "any", "byte", "rune", "int", "int8", "int16", "int32", "int64", "uint", "uint8",
    "uint16", "uint32", "uint64", "uintptr", "float32", "float64", "complex64", "complex128",
];

pub fn is_pure(expr: &Expr) -> bool {
    match expr {
        Expr::Ident(_) | Expr::Literal(_) => true,
        Expr::Call(call) => {
            call.args.iter().all(is_pure) && (is_type_conversion_callee(&call.callee) || is_pure_builtin_callee(&call.callee))
        }
        Expr::Selector { recv, .. } => is_pure(recv),
        Expr::Index { recv, index } => is_pure(recv) && is_pure(index),
        Expr::Slice { recv, low, high, max } => {
            is_pure(recv) && opt_pure(low) && opt_pure(high) && opt_pure(max)
        }
        Expr::Unary { expr, .. } => is_pure(expr),
        Expr::Binary { lhs, rhs, .. } => is_pure(lhs) && is_pure(rhs),
        Expr::Paren(e) => is_pure(e),
        Expr::CompositeLit(_) => true,
        Expr::FuncLit(_) => true,
        // Unconditionally pure per the ported rule, regardless of the
        // asserted expression's own purity.
        Expr::TypeAssert { .. } => true,
        Expr::TypeExpr(_) => true,
    }
}

fn opt_pure(e: &Option<Box<Expr>>) -> bool {
    e.as_deref().map(is_pure).unwrap_or(true)
}

/// A call whose callee is a bare identifier naming a predeclared type, or a
/// type-expression fallback (e.g. `[]byte(s)`), is a type conversion.
///
/// A generic instantiation used as a callee (`F[int](x)`, parsed as a call
/// over an `Index` expression) is deliberately NOT recognized here: the
/// engine has no type information to tell a generic function instantiation
/// from an ordinary indexing expression, so such calls are conservatively
/// treated as impure (documented open question, spec §9).
fn is_type_conversion_callee(callee: &Expr) -> bool {
    match callee {
        Expr::Ident(name) => PREDECLARED_TYPES.contains(&name.as_str()),
        Expr::TypeExpr(_) => true,
        _ => false,
    }
}

fn is_pure_builtin_callee(callee: &Expr) -> bool {
    matches!(callee, Expr::Ident(name) if PURE_BUILTIN_FUNC_NAMES.contains(&name.as_str()))
}
