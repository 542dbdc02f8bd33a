//! Account rules: username shape, password length, and the creator-role
//! transition that stamps `creator_since`.

use crate::error::CoreError;
use crate::types::Timestamp;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum username length in characters.
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Check that a username is 1..=150 characters of letters, digits and `@.+-_`.
pub fn validate_username(username: &str) -> Result<(), CoreError> {
    if username.is_empty() {
        return Err(CoreError::Validation("Username must not be empty".into()));
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Username must be at most {MAX_USERNAME_LENGTH} characters"
        )));
    }
    if let Some(bad) = username
        .chars()
        .find(|c| !(c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_')))
    {
        return Err(CoreError::Validation(format!(
            "Username contains invalid character '{bad}'. \
             Letters, digits and @/./+/-/_ only"
        )));
    }
    Ok(())
}

/// `creator_since` for a freshly registered account.
pub fn creator_since_on_register(is_creator: bool, now: Timestamp) -> Option<Timestamp> {
    is_creator.then_some(now)
}

/// Compute the `creator_since` value to persist after a profile update.
///
/// The stamp is written only on a false -> true transition of `is_creator`
/// and only if the account has never been stamped. Existing stamps are never
/// moved or cleared, including when the role is dropped and re-acquired.
pub fn creator_since_on_update(
    was_creator: bool,
    current: Option<Timestamp>,
    requested_is_creator: Option<bool>,
    now: Timestamp,
) -> Option<Timestamp> {
    match (current, requested_is_creator) {
        (Some(stamp), _) => Some(stamp),
        (None, Some(true)) if !was_creator => Some(now),
        (None, _) => None,
    }
}
