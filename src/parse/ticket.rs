use std::sync::LazyLock;

use regex::Regex;

static TICKET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]+-\d+$").unwrap());

/// Error returned when a ticket id is not `LETTERS-DIGITS`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid ticket id '{0}'. Use: ABC-123 (letters-numbers)")]
pub struct TicketError(pub String);

/// Normalize a ticket id to upper case (`api-42` -> `API-42`).
/// Empty input stays empty.
pub fn normalize_ticket(raw: &str) -> Result<String, TicketError> {
    let upper = raw.trim().to_uppercase();
    if upper.is_empty() {
        return Ok(upper);
    }
    if TICKET_RE.is_match(&upper) {
        Ok(upper)
    } else {
        Err(TicketError(raw.trim().to_string()))
    }
}

pub fn is_valid_ticket(raw: &str) -> bool {
    normalize_ticket(raw).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_case() {
        assert_eq!(normalize_ticket(" app-123 ").unwrap(), "APP-123");
        assert_eq!(normalize_ticket("PROJ-42").unwrap(), "PROJ-42");
        assert_eq!(normalize_ticket("").unwrap(), "");
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(!is_valid_ticket("123-ABC"));
        assert!(!is_valid_ticket("API42"));
        assert!(!is_valid_ticket("API-"));
        assert_eq!(
            normalize_ticket("a1-2"),
            Err(TicketError("a1-2".to_string()))
        );
    }
}
