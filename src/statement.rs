// Statement parsing for the SQL-like front end.
//
// Three statements exist: `insert <id> <username> <email>`, `select`, and
// `delete <id>`, all whitespace-separated. Anything else is reported with
// the exact messages the prompt prints.

use thiserror::Error;

use crate::row::{Row, COLUMN_EMAIL_SIZE, COLUMN_USERNAME_SIZE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Insert(Row),
    Select,
    Delete(u32),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrepareError {
    #[error("Syntax error. Could not parse statement.")]
    Syntax,

    #[error("Unrecognized keyword at start of '{0}'.")]
    UnrecognizedKeyword(String),

    #[error("ID must be positive.")]
    NegativeId,

    #[error("String is too long.")]
    StringTooLong,
}

/// Parse one input line into a statement.
pub fn prepare(input: &str) -> Result<Statement, PrepareError> {
    let mut parts = input.split_whitespace();
    match parts.next() {
        Some("insert") => {
            let id = parts.next().ok_or(PrepareError::Syntax)?;
            let username = parts.next().ok_or(PrepareError::Syntax)?;
            let email = parts.next().ok_or(PrepareError::Syntax)?;
            if parts.next().is_some() {
                return Err(PrepareError::Syntax);
            }
            if id.starts_with('-') {
                return Err(PrepareError::NegativeId);
            }
            let id: u32 = id.parse().map_err(|_| PrepareError::Syntax)?;
            if username.len() > COLUMN_USERNAME_SIZE || email.len() > COLUMN_EMAIL_SIZE {
                return Err(PrepareError::StringTooLong);
            }
            Ok(Statement::Insert(Row::new(id, username, email)))
        }
        Some("select") => {
            if parts.next().is_some() {
                return Err(PrepareError::Syntax);
            }
            Ok(Statement::Select)
        }
        Some("delete") => {
            let id = parts.next().ok_or(PrepareError::Syntax)?;
            if parts.next().is_some() {
                return Err(PrepareError::Syntax);
            }
            if id.starts_with('-') {
                return Err(PrepareError::NegativeId);
            }
            let id: u32 = id.parse().map_err(|_| PrepareError::Syntax)?;
            Ok(Statement::Delete(id))
        }
        _ => Err(PrepareError::UnrecognizedKeyword(input.trim().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prepare_insert() {
        let stmt = prepare("insert 1 alice alice@example.com").unwrap();
        assert_eq!(
            stmt,
            Statement::Insert(Row::new(1, "alice", "alice@example.com"))
        );
    }

    #[test]
    fn test_prepare_select_and_delete() {
        assert_eq!(prepare("select").unwrap(), Statement::Select);
        assert_eq!(prepare("delete 7").unwrap(), Statement::Delete(7));
    }

    #[test]
    fn test_insert_missing_fields() {
        assert_eq!(prepare("insert 1 alice"), Err(PrepareError::Syntax));
        assert_eq!(prepare("insert"), Err(PrepareError::Syntax));
    }

    #[test]
    fn test_insert_bad_id() {
        assert_eq!(prepare("insert abc u e"), Err(PrepareError::Syntax));
        assert_eq!(prepare("insert -1 u e"), Err(PrepareError::NegativeId));
    }

    #[test]
    fn test_insert_string_limits() {
        let long_user = "u".repeat(COLUMN_USERNAME_SIZE + 1);
        assert_eq!(
            prepare(&format!("insert 1 {long_user} e@x")),
            Err(PrepareError::StringTooLong)
        );
        let max_user = "u".repeat(COLUMN_USERNAME_SIZE);
        assert!(prepare(&format!("insert 1 {max_user} e@x")).is_ok());

        let long_email = "e".repeat(COLUMN_EMAIL_SIZE + 1);
        assert_eq!(
            prepare(&format!("insert 1 u {long_email}")),
            Err(PrepareError::StringTooLong)
        );
    }

    #[test]
    fn test_unrecognized_keyword() {
        assert_eq!(
            prepare("update 1 foo bar"),
            Err(PrepareError::UnrecognizedKeyword("update 1 foo bar".into()))
        );
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PrepareError::Syntax.to_string(),
            "Syntax error. Could not parse statement."
        );
        assert_eq!(
            PrepareError::UnrecognizedKeyword("foo".into()).to_string(),
            "Unrecognized keyword at start of 'foo'."
        );
    }
}
