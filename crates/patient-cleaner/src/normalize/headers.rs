//! Column header standardization.

use indexmap::IndexMap;

use crate::record::columns;

/// The renames applied before case normalization.
pub fn default_renames() -> IndexMap<String, String> {
    IndexMap::from([
        ("PID".to_string(), columns::PATIENT_ID.to_string()),
        ("DOB".to_string(), columns::DATE_OF_BIRTH.to_string()),
    ])
}

/// Rename a header through `renames` (exact match), then lowercase it and
/// replace spaces with underscores.
pub fn normalize_header(header: &str, renames: &IndexMap<String, String>) -> String {
    let renamed = renames.get(header).map(String::as_str).unwrap_or(header);
    renamed.to_lowercase().replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_renames() {
        let renames = default_renames();
        assert_eq!(normalize_header("PID", &renames), "patient_id");
        assert_eq!(normalize_header("DOB", &renames), "date_of_birth");
    }

    #[test]
    fn test_case_and_spaces() {
        let renames = default_renames();
        assert_eq!(normalize_header("Full Name", &renames), "full_name");
        assert_eq!(normalize_header("Phone Number", &renames), "phone_number");
        assert_eq!(normalize_header("gender", &renames), "gender");
    }

    #[test]
    fn test_rename_is_exact_match() {
        // Lowercasing runs after renaming, so 'pid' is not recognized.
        let renames = default_renames();
        assert_eq!(normalize_header("pid", &renames), "pid");
        assert_eq!(normalize_header("PID ", &renames), "pid_");
    }
}
