use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// The admin access code is exactly four digits
    static ref ACCESS_CODE_REGEX: Regex = Regex::new(r"^\d{4}$").expect("regex compiles");
}

/// Client-side format check run before the code is sent for validation.
/// Whether the code is actually correct is the server's call.
pub fn is_valid_access_code(code: &str) -> bool {
    ACCESS_CODE_REGEX.is_match(code)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_access_code_format() {
        assert!(is_valid_access_code("1234"));
        assert!(is_valid_access_code("0000"));

        assert!(!is_valid_access_code("123"));
        assert!(!is_valid_access_code("12345"));
        assert!(!is_valid_access_code("12a4"));
        assert!(!is_valid_access_code(""));
    }
}
