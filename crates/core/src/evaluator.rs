//! Combination evaluator - decides whether selected values make the target
//!
//! - **Addition**: the values must sum to exactly 12.
//! - **Math operations**: two or three operands, tried against a fixed list of
//!   arrangements (no permutations beyond the list). The first arrangement that
//!   hits 12 is reported so callers know *which* operation won.
//!
//! Arithmetic is exact: intermediate results are kept as reduced fractions, so
//! `3 / 2 * 8` is a match while `7 / 2 * 3` is not. Division by zero makes that
//! one arrangement fail; the remaining arrangements are still tried.

use crate::types::{Expression, GameMode, Operation, MAX_MATH_OPERANDS, TARGET_SUM};

use Operation::{Add, Divide, Multiply, Subtract};

/// Two-operand arrangements in evaluation order: `(op, reversed)`.
const BINARY: [(Operation, bool); 6] = [
    (Add, false),
    (Subtract, false),
    (Subtract, true),
    (Multiply, false),
    (Divide, false),
    (Divide, true),
];

/// Three-operand arrangements in evaluation order: `a first b second c`.
const TERNARY: [(Operation, Operation); 12] = [
    (Add, Add),
    (Add, Subtract),
    (Subtract, Add),
    (Subtract, Subtract),
    (Multiply, Add),
    (Multiply, Subtract),
    (Add, Multiply),
    (Subtract, Multiply),
    (Multiply, Multiply),
    (Multiply, Divide),
    (Divide, Multiply),
    (Divide, Divide),
];

/// Exact fraction with a positive denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ratio {
    num: i64,
    den: i64,
}

impl Ratio {
    fn int(v: u32) -> Self {
        Self {
            num: i64::from(v),
            den: 1,
        }
    }

    fn reduce(num: i64, den: i64) -> Option<Self> {
        if den == 0 {
            return None;
        }
        let g = gcd(num.unsigned_abs(), den.unsigned_abs()).max(1) as i64;
        let sign = if den < 0 { -1 } else { 1 };
        Some(Self {
            num: sign * num / g,
            den: sign * den / g,
        })
    }

    fn apply(self, op: Operation, rhs: Ratio) -> Option<Ratio> {
        match op {
            Add => Self::reduce(
                self.num.checked_mul(rhs.den)?.checked_add(rhs.num.checked_mul(self.den)?)?,
                self.den.checked_mul(rhs.den)?,
            ),
            Subtract => Self::reduce(
                self.num.checked_mul(rhs.den)?.checked_sub(rhs.num.checked_mul(self.den)?)?,
                self.den.checked_mul(rhs.den)?,
            ),
            Multiply => Self::reduce(
                self.num.checked_mul(rhs.num)?,
                self.den.checked_mul(rhs.den)?,
            ),
            Divide => {
                if rhs.num == 0 {
                    return None;
                }
                Self::reduce(
                    self.num.checked_mul(rhs.den)?,
                    self.den.checked_mul(rhs.num)?,
                )
            }
        }
    }

    fn is_target(self) -> bool {
        self.den == 1 && self.num == i64::from(TARGET_SUM)
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// `a first b second c` honouring `*`/`/` precedence.
fn eval_ternary(a: u32, b: u32, c: u32, first: Operation, second: Operation) -> Option<Ratio> {
    let (a, b, c) = (Ratio::int(a), Ratio::int(b), Ratio::int(c));
    if second.binds_tighter_than(first) {
        a.apply(first, b.apply(second, c)?)
    } else {
        a.apply(first, b)?.apply(second, c)
    }
}

fn eval_binary(a: u32, b: u32, op: Operation, reversed: bool) -> Option<Ratio> {
    let (l, r) = if reversed { (b, a) } else { (a, b) };
    Ratio::int(l).apply(op, Ratio::int(r))
}

/// Find the arrangement that makes the target, if any.
///
/// Values are taken in selection order. Empty input never matches.
pub fn evaluate(values: &[u32], mode: GameMode) -> Option<Expression> {
    match mode {
        GameMode::Addition => {
            if values.is_empty() {
                return None;
            }
            let sum: u64 = values.iter().map(|&v| u64::from(v)).sum();
            (sum == u64::from(TARGET_SUM)).then_some(Expression::Sum {
                terms: values.len(),
            })
        }
        GameMode::MathOperations => match *values {
            [a, b] => BINARY
                .iter()
                .find(|&&(op, reversed)| {
                    eval_binary(a, b, op, reversed).is_some_and(Ratio::is_target)
                })
                .map(|&(op, reversed)| Expression::Binary { op, reversed }),
            [a, b, c] => TERNARY
                .iter()
                .find(|&&(first, second)| {
                    eval_ternary(a, b, c, first, second).is_some_and(Ratio::is_target)
                })
                .map(|&(first, second)| Expression::Ternary { first, second }),
            _ => None,
        },
    }
}

/// True iff the values form a valid match for the mode.
pub fn is_valid_match(values: &[u32], mode: GameMode) -> bool {
    evaluate(values, mode).is_some()
}

/// Whether adding more tiles to a non-matching selection could still produce a match.
///
/// Addition values are positive, so once the sum passes the target no superset
/// can come back down. Math operations stops at three operands.
pub fn can_extend(values: &[u32], mode: GameMode) -> bool {
    match mode {
        GameMode::Addition => {
            let sum: u64 = values.iter().map(|&v| u64::from(v)).sum();
            sum < u64::from(TARGET_SUM)
        }
        GameMode::MathOperations => values.len() < MAX_MATH_OPERANDS,
    }
}
