use winnow::ascii::digit1;
use winnow::combinator::{alt, cut_err, delimited, not, opt, preceded, repeat, separated, terminated};
use winnow::error::{ContextError, ErrMode, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_till, take_while};

use crate::types::VariableSigil;
use crate::{ArithOp, CompareOp, Expr, Value};

// -- Whitespace & keywords --------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., |c: char| c.is_whitespace())
        .void()
        .parse_next(input)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// A word that must not run on into an identifier (`and` but not `android`).
fn keyword<'i>(word: &'static str) -> impl Parser<&'i str, &'i str, ErrMode<ContextError>> {
    terminated(word, not(one_of(is_ident_char)))
}

// -- Literals ---------------------------------------------------------------

fn string_literal(input: &mut &str) -> ModalResult<String> {
    let quote = one_of(['\'', '"']).parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = cut_err(any)
            .context(StrContext::Expected(StrContextValue::Description(
                "closing quote",
            )))
            .parse_next(input)?;
        match ch {
            c if c == quote => return Ok(s),
            '\\' => {
                let esc = cut_err(any).parse_next(input)?;
                match esc {
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    '\'' | '"' | '\\' => s.push(esc),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

fn number_literal(input: &mut &str) -> ModalResult<f64> {
    (digit1, opt(('.', digit1)))
        .take()
        .try_map(|s: &str| s.parse::<f64>())
        .parse_next(input)
}

fn literal(input: &mut &str) -> ModalResult<Value> {
    alt((
        string_literal.map(Value::Text),
        keyword("true").value(Value::Bool(true)),
        keyword("false").value(Value::Bool(false)),
        number_literal.map(Value::Number),
    ))
    .parse_next(input)
}

// -- Variables & calls ------------------------------------------------------

fn variable(input: &mut &str) -> ModalResult<Expr> {
    let sigil = terminated(one_of(['#', 'A', 'V', 'C']), '{')
        .parse_next(input)?;
    let name = cut_err(terminated(take_till(1.., '}'), '}'))
        .context(StrContext::Expected(StrContextValue::Description(
            "variable name",
        )))
        .parse_next(input)?;
    let sigil = VariableSigil::from_char(sigil).ok_or_else(|| ErrMode::from_input(input))?;
    Ok(Expr::Variable {
        sigil,
        name: name.to_owned(),
    })
}

fn call(input: &mut &str) -> ModalResult<Expr> {
    let function = ("d2:", take_while(1.., is_ident_char))
        .take()
        .parse_next(input)?;
    let args: Vec<Expr> = cut_err(delimited(
        (ws, '('),
        separated(0.., expr, (ws, ',')),
        (ws, ')'),
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "argument list",
    )))
    .parse_next(input)?;
    Ok(Expr::Call {
        function: function.to_owned(),
        args,
    })
}

// -- Operators --------------------------------------------------------------

fn or_op(input: &mut &str) -> ModalResult<()> {
    alt(("||", keyword("or"))).void().parse_next(input)
}

fn and_op(input: &mut &str) -> ModalResult<()> {
    alt(("&&", keyword("and"))).void().parse_next(input)
}

fn equality_op(input: &mut &str) -> ModalResult<CompareOp> {
    alt(("==".value(CompareOp::Eq), "!=".value(CompareOp::Neq))).parse_next(input)
}

fn relational_op(input: &mut &str) -> ModalResult<CompareOp> {
    alt((
        ">=".value(CompareOp::Gte),
        ">".value(CompareOp::Gt),
        "<=".value(CompareOp::Lte),
        "<".value(CompareOp::Lt),
    ))
    .parse_next(input)
}

fn additive_op(input: &mut &str) -> ModalResult<ArithOp> {
    alt(('+'.value(ArithOp::Add), '-'.value(ArithOp::Sub))).parse_next(input)
}

fn multiplicative_op(input: &mut &str) -> ModalResult<ArithOp> {
    alt((
        '*'.value(ArithOp::Mul),
        '/'.value(ArithOp::Div),
        '%'.value(ArithOp::Rem),
    ))
    .parse_next(input)
}

// -- Expressions (precedence: || < && < equality < relational < + - < * / % < unary)

fn primary(input: &mut &str) -> ModalResult<Expr> {
    ws.parse_next(input)?;
    alt((
        delimited('(', cut_err(expr), (ws, cut_err(')'))),
        call,
        variable,
        literal.map(Expr::Literal),
    ))
    .context(StrContext::Expected(StrContextValue::Description(
        "expression",
    )))
    .parse_next(input)
}

fn unary(input: &mut &str) -> ModalResult<Expr> {
    ws.parse_next(input)?;
    if opt(terminated('!', not('='))).parse_next(input)?.is_some() {
        let inner = cut_err(unary).parse_next(input)?;
        return Ok(Expr::Not(Box::new(inner)));
    }
    if opt('-').parse_next(input)?.is_some() {
        let inner = cut_err(unary).parse_next(input)?;
        return Ok(match inner {
            Expr::Literal(Value::Number(n)) => Expr::Literal(Value::Number(-n)),
            other => Expr::Neg(Box::new(other)),
        });
    }
    primary(input)
}

fn fold_arith(first: Expr, rest: Vec<(ArithOp, Expr)>) -> Expr {
    rest.into_iter().fold(first, |lhs, (op, rhs)| Expr::Arith {
        lhs: Box::new(lhs),
        op,
        rhs: Box::new(rhs),
    })
}

fn fold_compare(first: Expr, rest: Vec<(CompareOp, Expr)>) -> Expr {
    rest.into_iter().fold(first, |lhs, (op, rhs)| Expr::Compare {
        lhs: Box::new(lhs),
        op,
        rhs: Box::new(rhs),
    })
}

fn multiplicative(input: &mut &str) -> ModalResult<Expr> {
    let first = unary(input)?;
    let rest = repeat(0.., (preceded(ws, multiplicative_op), cut_err(unary))).parse_next(input)?;
    Ok(fold_arith(first, rest))
}

fn additive(input: &mut &str) -> ModalResult<Expr> {
    let first = multiplicative(input)?;
    let rest = repeat(0.., (preceded(ws, additive_op), cut_err(multiplicative))).parse_next(input)?;
    Ok(fold_arith(first, rest))
}

fn relational(input: &mut &str) -> ModalResult<Expr> {
    let first = additive(input)?;
    let rest = repeat(0.., (preceded(ws, relational_op), cut_err(additive))).parse_next(input)?;
    Ok(fold_compare(first, rest))
}

fn equality(input: &mut &str) -> ModalResult<Expr> {
    let first = relational(input)?;
    let rest = repeat(0.., (preceded(ws, equality_op), cut_err(relational))).parse_next(input)?;
    Ok(fold_compare(first, rest))
}

fn and_expr(input: &mut &str) -> ModalResult<Expr> {
    let first = equality(input)?;
    let rest: Vec<Expr> =
        repeat(0.., preceded((ws, and_op), cut_err(equality))).parse_next(input)?;
    Ok(rest
        .into_iter()
        .fold(first, |acc, r| Expr::And(Box::new(acc), Box::new(r))))
}

fn or_expr(input: &mut &str) -> ModalResult<Expr> {
    let first = and_expr(input)?;
    let rest: Vec<Expr> =
        repeat(0.., preceded((ws, or_op), cut_err(and_expr))).parse_next(input)?;
    Ok(rest
        .into_iter()
        .fold(first, |acc, r| Expr::Or(Box::new(acc), Box::new(r))))
}

fn expr(input: &mut &str) -> ModalResult<Expr> {
    ws.parse_next(input)?;
    or_expr(input)
}

// -- Top-level parser -------------------------------------------------------

pub fn expression(input: &mut &str) -> ModalResult<Expr> {
    terminated(expr, ws).parse_next(input)
}
