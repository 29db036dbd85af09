use crate::utils::error::{Result, TransformError};

/// Longest delimiter accepted. Delimiters are appended to every record, so
/// anything longer is almost certainly a misconfiguration.
pub const MAX_DELIMITER_BYTES: usize = 8;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(TransformError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(TransformError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_delimiter(field_name: &str, delimiter: &str) -> Result<()> {
    if delimiter.is_empty() {
        return Err(TransformError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: delimiter.escape_default().to_string(),
            reason: "Delimiter cannot be empty".to_string(),
        });
    }

    if delimiter.len() > MAX_DELIMITER_BYTES {
        return Err(TransformError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: delimiter.escape_default().to_string(),
            reason: format!("Delimiter must be at most {} bytes", MAX_DELIMITER_BYTES),
        });
    }

    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(TransformError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Parses the boolean spellings accepted in environment variables.
pub fn parse_bool_flag(field_name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(TransformError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: other.to_string(),
            reason: "Expected true or false".to_string(),
        }),
    }
}

/// Expands the `\n`, `\r` and `\t` escapes used when a delimiter is passed
/// through a shell argument or an environment variable.
pub fn unescape_delimiter(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_delimiter() {
        assert!(validate_delimiter("delimiter", "\n").is_ok());
        assert!(validate_delimiter("delimiter", "\r\n").is_ok());
        assert!(validate_delimiter("delimiter", "").is_err());
        assert!(validate_delimiter("delimiter", "0123456789").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output_path", "./output").is_ok());
        assert!(validate_path("output_path", "").is_err());
        assert!(validate_path("output_path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("deadline_margin_ms", 500u64, 0, 60_000).is_ok());
        assert!(validate_range("deadline_margin_ms", 90_000u64, 0, 60_000).is_err());
    }

    #[test]
    fn test_parse_bool_flag() {
        assert!(parse_bool_flag("VALIDATE_JSON", "TRUE").unwrap());
        assert!(!parse_bool_flag("VALIDATE_JSON", "off").unwrap());
        assert!(parse_bool_flag("VALIDATE_JSON", "maybe").is_err());
    }

    #[test]
    fn test_unescape_delimiter() {
        assert_eq!(unescape_delimiter("\\n"), "\n");
        assert_eq!(unescape_delimiter("\\r\\n"), "\r\n");
        assert_eq!(unescape_delimiter("|"), "|");
        assert_eq!(unescape_delimiter("\\x"), "\\x");
    }
}
