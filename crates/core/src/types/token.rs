//! Session token type.

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`SessionToken`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum SessionTokenError {
    /// The token has the wrong length.
    #[error("session token must be exactly {expected} characters")]
    WrongLength {
        /// Required length.
        expected: usize,
    },
    /// The token contains characters outside the URL-safe base64 alphabet.
    #[error("session token contains invalid characters")]
    InvalidCharacters,
}

/// An opaque session credential.
///
/// Tokens are 32 random bytes encoded as URL-safe base64 without padding
/// (43 characters). Parsing only checks shape, never authenticity - a
/// well-formed token still has to be found in the session store.
///
/// `Debug` shows a short prefix only; tokens are credentials and must not
/// end up in logs.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Exact length of an encoded token.
    pub const LENGTH: usize = 43;

    /// Parse a `SessionToken` from an inbound credential string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input has the wrong length or contains
    /// characters outside `[A-Za-z0-9_-]`.
    pub fn parse(s: &str) -> Result<Self, SessionTokenError> {
        if s.len() != Self::LENGTH {
            return Err(SessionTokenError::WrongLength {
                expected: Self::LENGTH,
            });
        }

        if !s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
        {
            return Err(SessionTokenError::InvalidCharacters);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the token and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix = self.0.get(..6).unwrap_or("");
        write!(f, "SessionToken({prefix}..)")
    }
}

impl std::str::FromStr for SessionToken {
    type Err = SessionTokenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for SessionToken {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for SessionToken {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for SessionToken {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const VALID: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA-_3";

    #[test]
    fn test_parse_valid() {
        let token = SessionToken::parse(VALID).unwrap();
        assert_eq!(token.as_str(), VALID);
    }

    #[test]
    fn test_parse_wrong_length() {
        assert!(matches!(
            SessionToken::parse("short"),
            Err(SessionTokenError::WrongLength { expected: 43 })
        ));
        let long = "A".repeat(44);
        assert!(SessionToken::parse(&long).is_err());
    }

    #[test]
    fn test_parse_invalid_characters() {
        let bad = format!("{}+", "A".repeat(42));
        assert!(matches!(
            SessionToken::parse(&bad),
            Err(SessionTokenError::InvalidCharacters)
        ));
    }

    #[test]
    fn test_debug_redacts() {
        let token = SessionToken::parse(VALID).unwrap();
        let debug = format!("{token:?}");
        assert!(!debug.contains(VALID));
        assert!(debug.starts_with("SessionToken(AAAAAA"));
    }
}
