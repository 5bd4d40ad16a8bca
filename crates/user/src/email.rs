/// Lower-cases the domain part of an email address.
///
/// The local part is kept as typed: some mail servers treat it as case
/// sensitive. Input without an `@` is returned trimmed but otherwise untouched.
pub fn normalize_email(email: &str) -> String {
    let email = email.trim();

    match email.rsplit_once('@') {
        Some((local, domain)) => format!("{local}@{}", domain.to_lowercase()),
        None => email.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_is_lowercased() {
        let samples = [
            ("test1@EXAMPLE.com", "test1@example.com"),
            ("Test2@Example.com", "Test2@example.com"),
            ("TEST3@EXAMPLE.COM", "TEST3@example.com"),
            ("test4@example.COM", "test4@example.com"),
        ];

        for (email, expected) in samples {
            assert_eq!(normalize_email(email), expected);
        }
    }

    #[test]
    fn test_only_last_at_sign_splits() {
        assert_eq!(normalize_email("\"a@b\"@EXAMPLE.org"), "\"a@b\"@example.org");
    }

    #[test]
    fn test_without_domain() {
        assert_eq!(normalize_email("  NoDomain "), "NoDomain");
        assert_eq!(normalize_email(""), "");
    }
}
