//! Conversions between configuration values and API values.

use uuid::Uuid;

use crate::error::ProviderError;

/// Parse an optional UUID string from configuration.
pub fn parse_uuid(attribute: &str, value: Option<&str>) -> Result<Option<Uuid>, ProviderError> {
    value
        .map(|s| {
            Uuid::parse_str(s).map_err(|e| {
                ProviderError::Validation(format!(
                    "{} is not a valid uuid ({:?}): {}",
                    attribute, s, e
                ))
            })
        })
        .transpose()
}

/// Render an API UUID for state. The nil UUID means "no value".
pub fn format_uuid(value: Option<&Uuid>) -> Option<String> {
    value.filter(|u| !u.is_nil()).map(Uuid::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_uuid() {
        let parsed = parse_uuid("uuid", Some("0f9ce1b4-3c7c-4fa6-9a1c-6d9c3fd0a4a1")).unwrap();
        assert_eq!(
            parsed.map(|u| u.to_string()).as_deref(),
            Some("0f9ce1b4-3c7c-4fa6-9a1c-6d9c3fd0a4a1")
        );
        assert_eq!(parse_uuid("uuid", None).unwrap(), None);

        let err = parse_uuid("component_group_uuid", Some("nope")).unwrap_err();
        assert!(err.to_string().contains("component_group_uuid"));
    }

    #[test]
    fn test_format_uuid() {
        assert_eq!(format_uuid(None), None);
        assert_eq!(format_uuid(Some(&Uuid::nil())), None);
        let id = Uuid::parse_str("0f9ce1b4-3c7c-4fa6-9a1c-6d9c3fd0a4a1").unwrap();
        assert_eq!(
            format_uuid(Some(&id)).as_deref(),
            Some("0f9ce1b4-3c7c-4fa6-9a1c-6d9c3fd0a4a1")
        );
    }
}
