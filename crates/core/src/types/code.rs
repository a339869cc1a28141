//! Public-facing dairy code type.

use core::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Alphabet a dairy code is drawn from: uppercase letters and digits.
const ALPHABET: &[u8; 36] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Errors that can occur when parsing a [`DairyCode`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum DairyCodeError {
    /// The input is not exactly six characters long.
    #[error("dairy code must be exactly {expected} characters")]
    WrongLength {
        /// Required code length.
        expected: usize,
    },
    /// The input contains a character outside `[A-Z0-9]`.
    #[error("dairy code may only contain A-Z and 0-9")]
    InvalidCharacter,
}

/// A short public-facing dairy identifier.
///
/// Six characters drawn uniformly from `[A-Z0-9]` (36 symbols, ~31 bits of
/// entropy). Uniqueness across all dairy records is NOT a property of the
/// code itself; it is enforced by the store's unique index and the
/// allocation retry loop in the dairy service.
///
/// ## Examples
///
/// ```
/// use godairy_core::DairyCode;
///
/// assert!(DairyCode::parse("AB12CD").is_ok());
/// assert!(DairyCode::parse("ab12cd").is_err()); // lowercase
/// assert!(DairyCode::parse("AB12C").is_err());  // too short
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct DairyCode(String);

impl DairyCode {
    /// Length of every dairy code.
    pub const LENGTH: usize = 6;

    /// Parse a `DairyCode` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not exactly six characters of
    /// `[A-Z0-9]`.
    pub fn parse(s: &str) -> Result<Self, DairyCodeError> {
        if s.len() != Self::LENGTH {
            return Err(DairyCodeError::WrongLength {
                expected: Self::LENGTH,
            });
        }

        if !s.bytes().all(|b| ALPHABET.contains(&b)) {
            return Err(DairyCodeError::InvalidCharacter);
        }

        Ok(Self(s.to_owned()))
    }

    /// Draw a random code uniformly from the alphabet.
    #[must_use]
    // idx < ALPHABET.len() by construction
    #[allow(clippy::indexing_slicing)]
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..Self::LENGTH)
            .map(|_| {
                let idx = rng.random_range(0..ALPHABET.len());
                char::from(ALPHABET[idx])
            })
            .collect();
        Self(code)
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `DairyCode` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DairyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for DairyCode {
    type Err = DairyCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for DairyCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for DairyCode {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for DairyCode {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for DairyCode {
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

    #[test]
    fn test_parse_valid() {
        assert!(DairyCode::parse("ABCDEF").is_ok());
        assert!(DairyCode::parse("A1B2C3").is_ok());
        assert!(DairyCode::parse("000000").is_ok());
    }

    #[test]
    fn test_parse_wrong_length() {
        assert!(matches!(
            DairyCode::parse("ABC"),
            Err(DairyCodeError::WrongLength { expected: 6 })
        ));
        assert!(matches!(
            DairyCode::parse("ABCDEFG"),
            Err(DairyCodeError::WrongLength { expected: 6 })
        ));
    }

    #[test]
    fn test_parse_invalid_characters() {
        assert!(matches!(
            DairyCode::parse("abcdef"),
            Err(DairyCodeError::InvalidCharacter)
        ));
        assert!(matches!(
            DairyCode::parse("AB-12C"),
            Err(DairyCodeError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_generate_matches_alphabet() {
        let mut rng = rand::rng();
        for _ in 0..100 {
            let code = DairyCode::generate(&mut rng);
            assert_eq!(code.as_str().len(), DairyCode::LENGTH);
            // Generated codes always re-parse
            assert!(DairyCode::parse(code.as_str()).is_ok());
        }
    }

    #[test]
    fn test_serde_transparent() {
        let code = DairyCode::parse("XY42ZW").unwrap();
        let json = serde_json::to_string(&code).unwrap();
        assert_eq!(json, "\"XY42ZW\"");

        let parsed: DairyCode = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, code);
    }
}
