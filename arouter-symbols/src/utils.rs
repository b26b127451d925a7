//! Utility functions

/// `com.example.MainActivity` -> `MainActivity`
pub fn simple_name(qualified: &str) -> &str {
    match qualified.rfind('.') {
        Some(index) => &qualified[index + 1..],
        None => qualified,
    }
}

/// `com.example.MainActivity` -> `com.example`
pub fn package_name(qualified: &str) -> &str {
    match qualified.rfind('.') {
        Some(index) => &qualified[..index],
        None => "",
    }
}

/// Strip everything outside `[0-9A-Za-z_]`, the character set allowed in
/// generated unit names.
pub fn sanitize_identifier(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_split() {
        assert_eq!(simple_name("com.example.MainActivity"), "MainActivity");
        assert_eq!(package_name("com.example.MainActivity"), "com.example");
        assert_eq!(simple_name("Bare"), "Bare");
        assert_eq!(package_name("Bare"), "");
    }

    #[test]
    fn test_sanitize_identifier() {
        assert_eq!(sanitize_identifier("module-java"), "modulejava");
        assert_eq!(sanitize_identifier("app_2"), "app_2");
        assert_eq!(sanitize_identifier(":feature:login"), "featurelogin");
    }
}
