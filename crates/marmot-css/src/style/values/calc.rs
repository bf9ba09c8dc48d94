//! `calc()` expression parsing and evaluation.
//!
//! [§ 10 Mathematical Expressions](https://www.w3.org/TR/css-values-4/#calc-func)
//!
//! "The calc() function allows mathematical expressions with addition (+),
//! subtraction (-), multiplication (*), and division (/) to be used as
//! component values."
//!
//! Evaluation works over a small algebra: a term is either a unitless
//! scalar or a linear combination `px + percent%`. Addition and
//! subtraction require two like terms; multiplication and division need a
//! scalar on (at least) one side. The result of a length-valued `calc()`
//! is therefore always a `(px, percent)` pair, which [`super::Size`] can
//! carry until layout supplies the percentage base.

use serde::Serialize;

use super::length::LengthValue;
use super::{ResolveContext, significant};
use crate::parser::ComponentValue;
use crate::tokenizer::CssToken;

/// A parsed `calc()` expression tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CalcExpr {
    /// A unit-bearing operand (`10px`, `2em`, `50%`).
    Value(LengthValue),
    /// A unitless number, valid only as a multiplication/division operand.
    Number(f64),
    /// "+" — both sides must be lengths or both numbers.
    Add(Box<CalcExpr>, Box<CalcExpr>),
    /// "-" — same typing rule as addition.
    Sub(Box<CalcExpr>, Box<CalcExpr>),
    /// "*" — "at least one of the arguments must be a <number>".
    Mul(Box<CalcExpr>, Box<CalcExpr>),
    /// "/" — "the right-hand side must be a <number>".
    Div(Box<CalcExpr>, Box<CalcExpr>),
}

/// Intermediate evaluation result.
enum CalcVal {
    /// A unitless number.
    Scalar(f64),
    /// A linear combination of pixels and a percentage of the base.
    Lin { px: f64, percent: f64 },
}

impl CalcExpr {
    /// Parse the contents of a `calc(...)` function.
    ///
    /// Returns `None` on any malformed expression; the caller maps that to
    /// a zero length per the degradation policy.
    #[must_use]
    pub fn parse(values: &[ComponentValue]) -> Option<Self> {
        let parts = significant(values);
        let mut parser = CalcParser {
            parts: &parts,
            pos: 0,
        };
        let expr = parser.parse_sum()?;
        if parser.pos == parser.parts.len() {
            Some(expr)
        } else {
            None
        }
    }

    /// Evaluate to a `(px, percent)` linear combination.
    ///
    /// Returns `None` when the expression is ill-typed (adding a number to
    /// a length, dividing by zero, or producing a bare number where a
    /// length is required).
    #[must_use]
    pub fn resolve(&self, ctx: &ResolveContext) -> Option<(f64, f64)> {
        match self.eval(ctx)? {
            CalcVal::Lin { px, percent } => Some((px, percent)),
            CalcVal::Scalar(_) => None,
        }
    }

    fn eval(&self, ctx: &ResolveContext) -> Option<CalcVal> {
        match self {
            Self::Value(len) => match len {
                LengthValue::Percent(p) => Some(CalcVal::Lin {
                    px: 0.0,
                    percent: *p,
                }),
                LengthValue::Calc(inner) => inner.eval(ctx),
                other => {
                    let px = other.to_px(ctx, None)?;
                    Some(CalcVal::Lin { px, percent: 0.0 })
                }
            },
            Self::Number(n) => Some(CalcVal::Scalar(*n)),

            Self::Add(lhs, rhs) => match (lhs.eval(ctx)?, rhs.eval(ctx)?) {
                (CalcVal::Scalar(a), CalcVal::Scalar(b)) => Some(CalcVal::Scalar(a + b)),
                (
                    CalcVal::Lin { px: p1, percent: c1 },
                    CalcVal::Lin { px: p2, percent: c2 },
                ) => Some(CalcVal::Lin {
                    px: p1 + p2,
                    percent: c1 + c2,
                }),
                _ => None,
            },

            Self::Sub(lhs, rhs) => match (lhs.eval(ctx)?, rhs.eval(ctx)?) {
                (CalcVal::Scalar(a), CalcVal::Scalar(b)) => Some(CalcVal::Scalar(a - b)),
                (
                    CalcVal::Lin { px: p1, percent: c1 },
                    CalcVal::Lin { px: p2, percent: c2 },
                ) => Some(CalcVal::Lin {
                    px: p1 - p2,
                    percent: c1 - c2,
                }),
                _ => None,
            },

            Self::Mul(lhs, rhs) => match (lhs.eval(ctx)?, rhs.eval(ctx)?) {
                (CalcVal::Scalar(a), CalcVal::Scalar(b)) => Some(CalcVal::Scalar(a * b)),
                (CalcVal::Scalar(s), CalcVal::Lin { px, percent })
                | (CalcVal::Lin { px, percent }, CalcVal::Scalar(s)) => Some(CalcVal::Lin {
                    px: px * s,
                    percent: percent * s,
                }),
                _ => None,
            },

            Self::Div(lhs, rhs) => {
                let CalcVal::Scalar(divisor) = rhs.eval(ctx)? else {
                    return None;
                };
                if divisor == 0.0 {
                    return None;
                }
                match lhs.eval(ctx)? {
                    CalcVal::Scalar(a) => Some(CalcVal::Scalar(a / divisor)),
                    CalcVal::Lin { px, percent } => Some(CalcVal::Lin {
                        px: px / divisor,
                        percent: percent / divisor,
                    }),
                }
            }
        }
    }
}

/// Recursive-descent parser over significant component values.
///
/// Grammar, per [§ 10.1](https://www.w3.org/TR/css-values-4/#calc-syntax):
///
/// ```text
/// <calc-sum>     = <calc-product> [ ['+' | '-'] <calc-product> ]*
/// <calc-product> = <calc-value> [ ['*' | '/'] <calc-value> ]*
/// <calc-value>   = <number> | <dimension> | <percentage> | ( <calc-sum> )
/// ```
struct CalcParser<'a> {
    parts: &'a [&'a ComponentValue],
    pos: usize,
}

impl CalcParser<'_> {
    fn parse_sum(&mut self) -> Option<CalcExpr> {
        let mut lhs = self.parse_product()?;
        while let Some(op) = self.peek_delim(&['+', '-']) {
            self.pos += 1;
            let rhs = self.parse_product()?;
            lhs = match op {
                '+' => CalcExpr::Add(Box::new(lhs), Box::new(rhs)),
                _ => CalcExpr::Sub(Box::new(lhs), Box::new(rhs)),
            };
        }
        Some(lhs)
    }

    fn parse_product(&mut self) -> Option<CalcExpr> {
        let mut lhs = self.parse_value()?;
        while let Some(op) = self.peek_delim(&['*', '/']) {
            self.pos += 1;
            let rhs = self.parse_value()?;
            lhs = match op {
                '*' => CalcExpr::Mul(Box::new(lhs), Box::new(rhs)),
                _ => CalcExpr::Div(Box::new(lhs), Box::new(rhs)),
            };
        }
        Some(lhs)
    }

    fn parse_value(&mut self) -> Option<CalcExpr> {
        let part = self.parts.get(self.pos)?;
        self.pos += 1;
        match part {
            ComponentValue::Token(CssToken::Number(n)) => Some(CalcExpr::Number(*n)),
            ComponentValue::Token(CssToken::Dimension { value, unit }) => {
                LengthValue::from_dimension(*value, unit).map(CalcExpr::Value)
            }
            ComponentValue::Token(CssToken::Percentage(p)) => {
                Some(CalcExpr::Value(LengthValue::Percent(*p)))
            }
            // Parenthesized group
            ComponentValue::Block { token: '(', value } => Self::parse_group(value),
            // "Nested calc() ... behaves the same as a parenthesized group."
            ComponentValue::Function { name, value } if name.eq_ignore_ascii_case("calc") => {
                Self::parse_group(value)
            }
            _ => None,
        }
    }

    fn parse_group(values: &[ComponentValue]) -> Option<CalcExpr> {
        CalcExpr::parse(values)
    }

    fn peek_delim(&self, expected: &[char]) -> Option<char> {
        match self.parts.get(self.pos) {
            Some(ComponentValue::Token(CssToken::Delim(c))) if expected.contains(c) => Some(*c),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{CssParser, Declaration};
    use crate::tokenizer::CssTokenizer;

    fn parse_value(css: &str) -> Declaration {
        let mut tokenizer = CssTokenizer::new(&format!("width: {css}"));
        tokenizer.run();
        let mut parser = CssParser::new(tokenizer.into_tokens());
        parser.parse_declaration_list().remove(0)
    }

    fn calc_of(decl: &Declaration) -> CalcExpr {
        match &decl.value[..] {
            [ComponentValue::Function { name, value }] if name == "calc" => {
                CalcExpr::parse(value).unwrap()
            }
            other => panic!("expected a calc() function, got {other:?}"),
        }
    }

    #[test]
    fn plain_arithmetic() {
        let ctx = ResolveContext::with_viewport(1000.0, 800.0);
        let decl = parse_value("calc(100px + 20px * 2)");
        assert_eq!(calc_of(&decl).resolve(&ctx), Some((140.0, 0.0)));
    }

    #[test]
    fn mixed_px_and_percent_stay_linear() {
        let ctx = ResolveContext::with_viewport(1000.0, 800.0);
        let decl = parse_value("calc(100% - 24px)");
        assert_eq!(calc_of(&decl).resolve(&ctx), Some((-24.0, 100.0)));
    }

    #[test]
    fn division_scales_both_parts() {
        let ctx = ResolveContext::with_viewport(1000.0, 800.0);
        let decl = parse_value("calc((100% - 30px) / 2)");
        assert_eq!(calc_of(&decl).resolve(&ctx), Some((-15.0, 50.0)));
    }

    #[test]
    fn em_resolves_inside_calc() {
        let mut ctx = ResolveContext::with_viewport(1000.0, 800.0);
        ctx.font_size = 20.0;
        let decl = parse_value("calc(2em + 10px)");
        assert_eq!(calc_of(&decl).resolve(&ctx), Some((50.0, 0.0)));
    }

    #[test]
    fn multiplying_two_lengths_is_invalid() {
        let ctx = ResolveContext::default();
        let decl = parse_value("calc(10px * 10px)");
        assert_eq!(calc_of(&decl).resolve(&ctx), None);
    }

    #[test]
    fn division_by_zero_is_invalid() {
        let ctx = ResolveContext::default();
        let decl = parse_value("calc(10px / 0)");
        assert_eq!(calc_of(&decl).resolve(&ctx), None);
    }

    #[test]
    fn bare_number_result_is_invalid() {
        let ctx = ResolveContext::default();
        let decl = parse_value("calc(2 * 3)");
        assert_eq!(calc_of(&decl).resolve(&ctx), None);
    }

    #[test]
    fn dangling_operator_fails_to_parse() {
        let decl = parse_value("calc(10px +)");
        match &decl.value[..] {
            [ComponentValue::Function { value, .. }] => {
                assert!(CalcExpr::parse(value).is_none());
            }
            other => panic!("expected a calc() function, got {other:?}"),
        }
    }
}
