//! Composite resource identifiers.
//!
//! Every Storyblok entity lives inside a space, so the identifier stored in
//! state pairs the space id with the entity id: `"<space_id>/<resource_id>"`.
//! The format is persisted and must stay stable.

use std::fmt;
use std::str::FromStr;

use crate::error::ProviderError;

const SEPARATOR: char = '/';

/// A space-scoped resource identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompositeId {
    /// The id of the space the resource belongs to.
    pub space_id: i64,
    /// The id of the resource inside the space.
    pub resource_id: i64,
}

impl CompositeId {
    /// Create a new identifier.
    pub fn new(space_id: i64, resource_id: i64) -> Self {
        Self {
            space_id,
            resource_id,
        }
    }
}

impl fmt::Display for CompositeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.space_id, SEPARATOR, self.resource_id)
    }
}

impl FromStr for CompositeId {
    type Err = ProviderError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            ProviderError::InvalidIdentifier(format!(
                "expected \"<space_id>/<resource_id>\", got {:?}",
                token
            ))
        };

        let (space, resource) = token.split_once(SEPARATOR).ok_or_else(invalid)?;
        let space_id = space.parse::<i64>().map_err(|_| invalid())?;
        let resource_id = resource.parse::<i64>().map_err(|_| invalid())?;
        Ok(Self::new(space_id, resource_id))
    }
}

/// Encode a space id and a resource id into a composite identifier.
pub fn encode(space_id: i64, resource_id: i64) -> String {
    CompositeId::new(space_id, resource_id).to_string()
}

/// Decode a composite identifier into `(space_id, resource_id)`.
///
/// # Errors
///
/// Returns [`ProviderError::InvalidIdentifier`] when the separator is missing
/// or either part is not a base-10 integer.
pub fn decode(token: &str) -> Result<(i64, i64), ProviderError> {
    let id: CompositeId = token.parse()?;
    Ok((id.space_id, id.resource_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_encode() {
        assert_eq!(encode(233252, 456), "233252/456");
        assert_eq!(encode(0, 0), "0/0");
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode("233252/456").unwrap(), (233252, 456));
    }

    #[test]
    fn test_decode_negative_values() {
        assert_eq!(decode("-1/-2").unwrap(), (-1, -2));
    }

    #[test]
    fn test_decode_rejects_malformed_tokens() {
        for token in ["", "233252", "233252/", "/456", "abc/456", "233252/x", "1/2/3", " 1/2"] {
            let err = decode(token).unwrap_err();
            assert!(
                matches!(err, ProviderError::InvalidIdentifier(_)),
                "token {:?} gave {:?}",
                token,
                err
            );
        }
    }

    #[test]
    fn test_display_and_parse() {
        let id = CompositeId::new(12, 34);
        assert_eq!(id.to_string(), "12/34");
        assert_eq!("12/34".parse::<CompositeId>().unwrap(), id);
    }

    proptest! {
        #[test]
        fn prop_round_trip(space_id in 0i64.., resource_id in 0i64..) {
            let token = encode(space_id, resource_id);
            prop_assert_eq!(decode(&token).unwrap(), (space_id, resource_id));
        }
    }
}
