//! Validated primitive types shared across the CDX crates.
//!
//! Each type validates on construction and on deserialisation, so a value that exists is a
//! value that passed the rules.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,

    /// The input was not a plausible email address
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// The input was not a plausible phone number
    #[error("invalid phone number: {0}")]
    InvalidPhone(String),
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is automatically trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` if the trimmed input is non-empty,
    /// or `Err(TextError::Empty)` if it's empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// An email address that passed a structural check.
///
/// The check is deliberately shallow: one `@`, a non-empty local part, and a dotted domain
/// with no leading or trailing dot. Deliverability is the mail sender's concern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Parses and trims an email address.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::InvalidEmail`] if the address is structurally invalid.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        let invalid = || TextError::InvalidEmail(trimmed.to_owned());

        if trimmed.chars().any(char::is_whitespace) {
            return Err(invalid());
        }

        let (local, domain) = trimmed.split_once('@').ok_or_else(invalid)?;
        if local.is_empty() || domain.contains('@') {
            return Err(invalid());
        }
        if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
            return Err(invalid());
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A phone number normalised to an optional leading `+` followed by 7 to 15 digits.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parses a phone number, discarding spaces, dashes, dots and parentheses.
    ///
    /// # Errors
    ///
    /// Returns [`TextError::InvalidPhone`] if anything other than digits remains (after an
    /// optional leading `+`) or the digit count is outside 7..=15.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, TextError> {
        let raw = input.as_ref().trim();
        let cleaned: String = raw
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '.' | '(' | ')'))
            .collect();

        let (plus, digits) = match cleaned.strip_prefix('+') {
            Some(rest) => ("+", rest),
            None => ("", cleaned.as_str()),
        };

        if !(7..=15).contains(&digits.len()) || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TextError::InvalidPhone(raw.to_owned()));
        }

        Ok(Self(format!("{plus}{digits}")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! string_newtype_impls {
    ($ty:ident, $ctor:path) => {
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl serde::Serialize for $ty {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.0)
            }
        }

        impl<'de> serde::Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let s = String::deserialize(deserializer)?;
                $ctor(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

string_newtype_impls!(NonEmptyText, NonEmptyText::new);
string_newtype_impls!(EmailAddress, EmailAddress::parse);
string_newtype_impls!(PhoneNumber, PhoneNumber::parse);
