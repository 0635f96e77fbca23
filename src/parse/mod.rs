mod error;
mod grammar;

pub use error::ParseError;

use crate::Expr;

/// Parse an expression of the bundled expression language into an [`Expr`].
///
/// ```
/// use program_rules::parse::parse_expression;
///
/// let expr = parse_expression("d2:hasValue('weight') && #{weight} < 2.5").unwrap();
/// assert_eq!(expr.to_string(), "(d2:hasValue('weight') && (#{weight} < 2.5))");
/// ```
///
/// # Errors
///
/// Returns [`ParseError`] if the input is not a single valid expression.
pub fn parse_expression(input: &str) -> Result<Expr, ParseError> {
    use winnow::Parser;
    grammar::expression
        .parse(input)
        .map_err(|e| ParseError::new(e.to_string()))
}
