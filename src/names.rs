//! XML name validation
//!
//! Declared component and type names end up as markup tags and attribute
//! names, so they have to be valid NCNames (XML names without a colon).

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static NCNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}\u{37F}-\u{1FFF}][A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\u{370}-\u{37D}\u{37F}-\u{1FFF}\-\.0-9\u{B7}\u{300}-\u{36F}]*$",
    )
    .expect("NCName pattern is valid")
});

/// Check if a string is a valid NCName (non-colonized name)
pub fn is_valid_ncname(name: &str) -> bool {
    !name.is_empty() && NCNAME.is_match(name)
}

/// Validate an NCName and return an error if invalid
pub fn validate_ncname(name: &str) -> Result<()> {
    if is_valid_ncname(name) {
        Ok(())
    } else {
        Err(Error::Name(format!("Invalid NCName: '{}'", name)))
    }
}

/// Validate the name of a declaration.
///
/// A missing name is a declaration error; a present but malformed one is a
/// name error.
pub fn validate_declared_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::Declaration("Name must be provided".to_string()));
    }
    validate_ncname(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_ncname() {
        assert!(is_valid_ncname("element"));
        assert!(is_valid_ncname("my-element"));
        assert!(is_valid_ncname("my_element"));
        assert!(is_valid_ncname("element123"));
        assert!(is_valid_ncname("_element"));
        assert!(is_valid_ncname("straße"));

        assert!(!is_valid_ncname(""));
        assert!(!is_valid_ncname("123element"));
        assert!(!is_valid_ncname("-element"));
        assert!(!is_valid_ncname("prefix:element"));
        assert!(!is_valid_ncname("A string"));
    }

    #[test]
    fn test_validate_declared_name() {
        assert!(validate_declared_name("lastname").is_ok());
        assert!(matches!(
            validate_declared_name(""),
            Err(Error::Declaration(_))
        ));
        assert!(matches!(validate_declared_name("1st"), Err(Error::Name(_))));
    }
}
