//! Simple text rules: case folding and name synthesis.

/// Lowercase a value.
pub fn lowercase(value: &str) -> String {
    value.to_lowercase()
}

/// Join first and last name with `separator`. Parts are used as-is.
pub fn full_name(first: &str, last: &str, separator: &str) -> String {
    let mut name = String::with_capacity(first.len() + separator.len() + last.len());
    name.push_str(first);
    name.push_str(separator);
    name.push_str(last);
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase_gender() {
        assert_eq!(lowercase("Male"), "male");
        assert_eq!(lowercase("FEMALE"), "female");
        assert_eq!(lowercase(""), "");
    }

    #[test]
    fn test_full_name() {
        assert_eq!(full_name("Jane", "Doe", " "), "Jane Doe");
    }

    #[test]
    fn test_full_name_does_not_trim() {
        assert_eq!(full_name("Jane", "", " "), "Jane ");
        assert_eq!(full_name(" Jane", "Doe ", " "), " Jane Doe ");
    }
}
