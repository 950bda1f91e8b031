//! Parsing of free-form ledger lines.
//!
//! A ledger line reads `PAYER [PAYER ...] -> RECIPIENT AMOUNT`, meaning the
//! recipient paid `AMOUNT` on behalf of the listed payers, who now owe it to
//! them in equal shares. Anything after a `#` is a comment.
//!
//! ```text
//! alice bob carol -> alice 42.50   # dinner
//! bob -> carol 10
//! ```

use crate::core::balance::BalanceError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

const ARROW: &str = "->";
const COMMENT: char = '#';

/// Errors arising from a malformed ledger line.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatementError {
    #[error("missing '->' between payers and recipient")]
    MissingArrow,
    #[error("no payers before '->'")]
    MissingPayers,
    #[error("no recipient after '->'")]
    MissingRecipient,
    #[error("no amount after recipient '{0}'")]
    MissingAmount(String),
    #[error("invalid amount '{token}': {source}")]
    InvalidAmount {
        token: String,
        source: rust_decimal::Error,
    },
    #[error("amount must not be negative, got {0}")]
    NegativeAmount(Decimal),
    #[error("amount {0} is too large")]
    AmountOutOfRange(Decimal),
    #[error(transparent)]
    BalanceOverflow(#[from] BalanceError),
}

/// One parsed ledger line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    /// Names sharing the charge, in the order written. A name listed twice
    /// carries two shares.
    pub payers: Vec<String>,
    /// Name of whoever paid up front.
    pub recipient: String,
    /// Charge in minor units.
    pub amount: i64,
}

impl Statement {
    /// Parse a single ledger line.
    ///
    /// Returns `Ok(None)` for blank and comment-only lines.
    ///
    /// # Examples
    ///
    /// ```
    /// use debt_settle::input::statement::Statement;
    ///
    /// let st = Statement::parse_line("alice bob -> carol 12.345 # taxi")
    ///     .unwrap()
    ///     .unwrap();
    /// assert_eq!(st.payers, vec!["alice", "bob"]);
    /// assert_eq!(st.recipient, "carol");
    /// assert_eq!(st.amount, 1234);
    /// ```
    pub fn parse_line(line: &str) -> Result<Option<Self>, StatementError> {
        let content = strip_comment(line);
        let mut tokens = content.split_whitespace().peekable();
        if tokens.peek().is_none() {
            return Ok(None);
        }

        let mut payers = Vec::new();
        let mut found_arrow = false;
        for token in tokens.by_ref() {
            if token == ARROW {
                found_arrow = true;
                break;
            }
            payers.push(token.to_string());
        }
        if !found_arrow {
            return Err(StatementError::MissingArrow);
        }
        if payers.is_empty() {
            return Err(StatementError::MissingPayers);
        }

        let recipient = tokens.next().ok_or(StatementError::MissingRecipient)?;
        let amount_token = tokens
            .next()
            .ok_or_else(|| StatementError::MissingAmount(recipient.to_string()))?;
        let amount = parse_amount(amount_token)?;

        Ok(Some(Self {
            payers,
            recipient: recipient.to_string(),
            amount,
        }))
    }
}

/// Everything before the first `#`.
fn strip_comment(line: &str) -> &str {
    match line.find(COMMENT) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Convert a decimal amount in major units to minor units, truncating
/// anything below one cent. Exponent notation (`1e2`, `2.5E-1`) is accepted.
pub fn parse_amount(token: &str) -> Result<i64, StatementError> {
    let parsed = if token.contains(['e', 'E']) {
        Decimal::from_scientific(token)
    } else {
        Decimal::from_str(token)
    };
    let value = parsed.map_err(|source| StatementError::InvalidAmount {
        token: token.to_string(),
        source,
    })?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(StatementError::NegativeAmount(value));
    }
    value
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|cents| cents.trunc().to_i64())
        .ok_or(StatementError::AmountOutOfRange(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_payer() {
        let st = Statement::parse_line("bob -> alice 10").unwrap().unwrap();
        assert_eq!(st.payers, vec!["bob"]);
        assert_eq!(st.recipient, "alice");
        assert_eq!(st.amount, 1_000);
    }

    #[test]
    fn test_parse_many_payers_and_extra_whitespace() {
        let st = Statement::parse_line("  a\tb  c ->  d   3.5  ").unwrap().unwrap();
        assert_eq!(st.payers, vec!["a", "b", "c"]);
        assert_eq!(st.recipient, "d");
        assert_eq!(st.amount, 350);
    }

    #[test]
    fn test_blank_and_comment_lines() {
        assert_eq!(Statement::parse_line(""), Ok(None));
        assert_eq!(Statement::parse_line("   "), Ok(None));
        assert_eq!(Statement::parse_line("# just a note"), Ok(None));
    }

    #[test]
    fn test_comment_cuts_amount() {
        assert_eq!(
            Statement::parse_line("a -> b #12"),
            Err(StatementError::MissingAmount("b".to_string()))
        );
    }

    #[test]
    fn test_malformed_lines() {
        assert_eq!(
            Statement::parse_line("a b c 10"),
            Err(StatementError::MissingArrow)
        );
        assert_eq!(
            Statement::parse_line("-> b 10"),
            Err(StatementError::MissingPayers)
        );
        assert_eq!(
            Statement::parse_line("a ->"),
            Err(StatementError::MissingRecipient)
        );
        assert!(matches!(
            Statement::parse_line("a -> b ten"),
            Err(StatementError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_trailing_tokens_ignored() {
        let st = Statement::parse_line("a -> b 1.00 and more").unwrap().unwrap();
        assert_eq!(st.amount, 100);
    }

    #[test]
    fn test_amount_truncates_to_cents() {
        assert_eq!(parse_amount("0.019"), Ok(1));
        assert_eq!(parse_amount("19.999"), Ok(1_999));
        assert_eq!(parse_amount("7"), Ok(700));
        assert_eq!(parse_amount("0"), Ok(0));
    }

    #[test]
    fn test_amount_in_exponent_notation() {
        assert_eq!(parse_amount("1e2"), Ok(10_000));
        assert_eq!(parse_amount("2.5E1"), Ok(2_500));
        assert_eq!(parse_amount("5e-1"), Ok(50));
        assert_eq!(parse_amount("1e-3"), Ok(0));
        assert!(matches!(
            parse_amount("-1e2"),
            Err(StatementError::NegativeAmount(_))
        ));
        assert!(matches!(
            parse_amount("1e"),
            Err(StatementError::InvalidAmount { .. })
        ));
        let st = Statement::parse_line("a b -> c 1.5e1").unwrap().unwrap();
        assert_eq!(st.amount, 1_500);
    }

    #[test]
    fn test_amount_rejects_negative_and_huge() {
        assert!(matches!(
            parse_amount("-5"),
            Err(StatementError::NegativeAmount(_))
        ));
        assert!(matches!(
            parse_amount("99999999999999999999"),
            Err(StatementError::AmountOutOfRange(_))
        ));
    }
}
