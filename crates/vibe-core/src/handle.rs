use crate::error::{BadgeError, Result};
use regex::Regex;
use std::sync::OnceLock;

static HANDLE_RE: OnceLock<Regex> = OnceLock::new();

fn handle_re() -> &'static Regex {
    HANDLE_RE.get_or_init(|| Regex::new(r"^[a-z0-9][a-z0-9_\-]*$").unwrap())
}

/// Normalize a user handle to its canonical store key.
///
/// The source data mixes `@alice` and `alice` for the same person; every
/// entry point funnels through here so both spellings land on one record.
/// Strips a single leading `@`, trims whitespace, and lowercases.
pub fn normalize(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let bare = trimmed.strip_prefix('@').unwrap_or(trimmed);
    let handle = bare.to_lowercase();
    validate(&handle)?;
    Ok(handle)
}

pub fn validate(handle: &str) -> Result<()> {
    if handle.is_empty() || handle.len() > 32 || !handle_re().is_match(handle) {
        return Err(BadgeError::InvalidHandle(handle.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_at_prefix_and_lowercases() {
        assert_eq!(normalize("@Alice").unwrap(), "alice");
        assert_eq!(normalize("alice").unwrap(), "alice");
        assert_eq!(normalize("  @bob_99  ").unwrap(), "bob_99");
    }

    #[test]
    fn at_and_bare_spellings_collapse() {
        assert_eq!(normalize("@maker-dan").unwrap(), normalize("maker-dan").unwrap());
    }

    #[test]
    fn valid_handles() {
        for h in ["alice", "a", "streaks-agent", "user_42", "9lives"] {
            normalize(h).unwrap_or_else(|_| panic!("expected valid: {h}"));
        }
    }

    #[test]
    fn invalid_handles() {
        for h in ["", "@", "-dash-start", "_under_start", "has space", &"x".repeat(33)] {
            assert!(normalize(h).is_err(), "expected invalid: {h}");
        }
    }
}
