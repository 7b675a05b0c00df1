/// Behavior of every built-in format through the public composer API.

#[cfg(test)]
mod tests {
    use validated_attrs::constants::*;
    use validated_attrs::prelude::*;

    fn check(format: &str, value: Option<&str>) -> ValidationOutcome {
        Composer::builtin()
            .compose("attr", format, FieldOptions::new())
            .unwrap()
            .evaluate(value)
    }

    fn assert_allows(format: &str, values: &[&str]) {
        for value in values {
            let outcome = check(format, Some(*value));
            assert!(outcome.is_valid(), "{} should allow {:?}, got {:?}", format, value, outcome.messages());
        }
    }

    fn assert_rejects(format: &str, values: &[&str], message: Option<&str>) {
        for value in values {
            let outcome = check(format, Some(*value));
            assert!(!outcome.is_valid(), "{} should reject {:?}", format, value);
            if let Some(message) = message {
                assert!(
                    outcome.messages().contains(&message),
                    "{} rejected {:?} with {:?}",
                    format,
                    value,
                    outcome.messages()
                );
            }
        }
    }

    #[test]
    fn test_reference_scenarios() {
        assert!(check("username", Some("kansascity")).is_valid());
        assert_eq!(
            check("username", Some("test")).messages(),
            vec!["is too short (minimum is 5 characters)"]
        );
        assert_eq!(check("zipcode", Some("5555")).messages(), vec!["must contain 5 or 9 numbers"]);
        assert_eq!(
            check("dollar", Some("0.2222")).messages(),
            vec!["accepts only numeric characters, period, and negative sign"]
        );
        assert_eq!(
            check("ssn", Some("111-111-111")).messages(),
            vec![
                "is the wrong length (should be 9 characters)",
                "must be in the format 111-11-1111"
            ]
        );
        assert_eq!(
            check("age", Some("111")).messages(),
            vec!["must contain only 3 numbers and less than 110"]
        );
    }

    #[test]
    fn test_name() {
        assert_allows("name", &["A", "z", "!", "@", "#", "k c", "- H-", " t", "& u", "21 ", "brok"]);
        assert_rejects(
            "name",
            &["\u{1b}1B", "\u{6}", "Hello\nWorld", "\u{1b}Hey", "a<b", "back\\slash"],
            Some(MESSAGE_CONTROL_CHARS),
        );
        assert!(check("name", None).is_valid());
        assert_eq!(
            check("name", Some("a".repeat(64).as_str())).messages(),
            vec!["is too long (maximum is 63 characters)"]
        );
    }

    #[test]
    fn test_safe_text() {
        assert_allows("safe_text", &[">*", "< test", "Hey\tWorld", "new\nline", "new\r\nline"]);
        assert_rejects(
            "safe_text",
            &["\u{1b}Hey", "Oh\u{6}No, it's a control char!"],
            Some(MESSAGE_CONTROL_CHARS),
        );
        assert_rejects("safe_text", &["<b>bold</b>"], Some(MESSAGE_CONTAINS_HTML));
        assert_eq!(
            check("safe_text", Some("\u{1b}<b>x</b>")).messages(),
            vec![MESSAGE_CONTROL_CHARS, MESSAGE_CONTAINS_HTML]
        );
    }

    #[test]
    fn test_username() {
        assert_allows(
            "username",
            &["kansascity", "kansascity@org1", "kansas.city@org1", "kansas_city@org1", "kansas-city", "1kc.-_@"],
        );
        assert_rejects(
            "username",
            &[">*,.<><", "<<< test", "Kansas City", "-- Hey --", "& youuuu", "21 Jump"],
            Some(MESSAGE_USERNAME),
        );
        assert_rejects("username", &["a".repeat(128).as_str()], Some("is too long (maximum is 127 characters)"));
    }

    #[test]
    fn test_email() {
        assert_allows(
            "email",
            &[
                "abc@example.com",
                "Abc@example.com",
                "aBC@example.com",
                "abc.123@example.com",
                "mo’reilly@example.com",
                "ro'sullivan@example.com",
                "abc@example.comar",
                "name@example.com",
                "gladyce@senger.io",
                "\"test\\\rblah\"@example.com",
                "customer/department@example.com",
                "$A12345@example.com",
                "!def!xyz%abc@example.com",
                "_Yosemite.Sam@example.com",
                "~@example.com",
                "Ima.Fool@example.com",
            ],
        );
        assert_rejects(
            "email",
            &[
                "Abc.example.com",
                "A@b@c@example.com",
                "()[]\\;:,<>@example.com",
                "herp@derp",
                "NotAnEmail",
                "@NotAnEmail",
                "\"test\rblah\"@example.com",
                ".wooly@example.com",
                "wo..oly@example.com",
                "pootietang.@example.com",
                ".@example.com",
                "Ima Fool@example.com",
            ],
            Some(MESSAGE_EMAIL),
        );
    }

    #[test]
    fn test_phone_number() {
        assert_allows("phone_number", &["9134456677", "5444456677", "9134466677 ", " 2134456677 "]);
        assert_rejects(
            "phone_number",
            &[">*", "< test", "www.test..com", "abc", "123", "&*()", "913 345 6677", "613-445-6677", "(888)8888888", "555.555.8888"],
            Some(MESSAGE_PHONE_NUMBER),
        );
        assert!(check("phone_number", None).is_valid());
    }

    #[test]
    fn test_phone_extension() {
        assert_allows("phone_extension", &["123", "123456", "0", "99999999"]);
        assert_rejects(
            "phone_extension",
            &["-1", "qwert", "x123", "123x", "X123", "100000000", "1.5"],
            Some(MESSAGE_PHONE_EXTENSION),
        );
    }

    #[test]
    fn test_domain() {
        assert_allows("domain", &["test.com", "hey.com", "dynamicadvisorsgroup.com", "advisorsexcel.com", "example.io"]);
        assert_rejects("domain", &[">*", "<test", "test-er"], Some(MESSAGE_DOMAIN));
    }

    #[test]
    fn test_zipcode() {
        assert_allows("zipcode", &["11111", "333333333"]);
        assert_rejects("zipcode", &["5555", "5555555555", "-99999"], Some(MESSAGE_ZIPCODE));
        assert!(check("zipcode", Some("")).is_valid());
    }

    #[test]
    fn test_middle_initial() {
        assert_allows("middle_initial", &["a", "A", ""]);
        assert_rejects(
            "middle_initial",
            &["k c", "55555", "55555-5555", "(888)88-9999", " ,-99999"],
            Some(MESSAGE_MIDDLE_INITIAL),
        );
    }

    #[test]
    fn test_dollar() {
        assert_allows(
            "dollar",
            &["0", "1", "100", "1000", "1000.99", "-0", "-1", "-100", "-1000", "-1000.99"],
        );
        assert_rejects("dollar", &["0.2222", "ewrt", "1,000,000", "-$1,000.00", "1 000 000.01"], None);
        assert!(check("dollar", None).is_valid());
    }

    #[test]
    fn test_positive_dollar() {
        assert_allows("positive_dollar", &["0", "1", "100", "1000", "1000.99"]);
        assert_rejects("positive_dollar", &["-1", "0.2222", "ewrt", "$1,000.00"], None);
        assert!(check("positive_dollar", None).is_valid());
    }

    #[test]
    fn test_percent() {
        assert_allows(
            "percent",
            &["100", "99", "1", "44", "99.999", "0.001", "-100", "-99", "-1", "-44", "-99.999", "-0.001"],
        );
        assert_rejects("percent", &["100.001", "0.22222", "-100.001", "abc", "&"], None);
        assert_rejects("percent", &["0.22222"], Some(MESSAGE_PERCENT));
    }

    #[test]
    fn test_positive_percent() {
        assert_allows("positive_percent", &["100", "99", "1", "44", "99.999", "0.001"]);
        assert_rejects(
            "positive_percent",
            &["100.001", "0.22222", "abc", "&", "-44", "-44.4"],
            None,
        );
        assert!(check("positive_percent", None).is_valid());
    }

    #[test]
    fn test_url() {
        assert_allows(
            "url",
            &[
                "http://www.example.com",
                "http://www.example.com:8001",
                "http://www.exmple.com/1/abc?test=test",
                "http://finane.example.com",
                "https://fiance.example.com",
                "ftp://finance.example.com.ag",
            ],
        );
        assert_rejects(
            "url",
            &["finance.example.com", "www.example.com", ">*", "< test", "abc", "123", "&*()"],
            Some(MESSAGE_URL),
        );
    }

    #[test]
    fn test_social_security_number() {
        assert_allows("social_security_number", &["515998488", " "]);
        assert_rejects(
            "ssn",
            &["ab-444fgh", "abc", "56599858>", "33445<", "3456356&", "/23452", "515-99-8888", "444.33.6666"],
            Some(MESSAGE_SSN),
        );
        assert_rejects(
            "ssn",
            &[" 514998888 "],
            Some("is the wrong length (should be 9 characters)"),
        );
    }

    #[test]
    fn test_taxid() {
        assert_allows("taxid", &["010000000", " ", "545998888"]);
        assert_rejects(
            "taxid",
            &["ab-cdefgh", "001000000", "abc", "<", "&", "51-5998888", "44.5559999"],
            Some(MESSAGE_TAXID),
        );
        assert_rejects(
            "taxid",
            &[" 514998888 "],
            Some("is the wrong length (should be 9 characters)"),
        );
    }

    #[test]
    fn test_age() {
        assert_allows("age", &["100", "99", "1 ", "44", "110", "0"]);
        assert_rejects("age", &["111", "-1", "abc", "&", "1e30"], Some(MESSAGE_AGE));
    }

    #[test]
    fn test_number() {
        assert_allows(
            "number",
            &["0", "1", "100", "1000", "-1", "1.5", "100000000000000000000000000000", "1e30", "-2.5E-40"],
        );
        assert_rejects("number", &["werq", "1,000.00", "1,000,000", "1 000 000"], Some(MESSAGE_NUMBER));
    }

    #[test]
    fn test_rails_name() {
        assert_allows("rails_name", &["kc_s", "hey", "yo_", "_jmp", "kc_star_what", "_jump_street"]);
        assert_rejects("rails_name", &[">*", "< test", "test-er", "yo dude"], Some(MESSAGE_RAILS_NAME));
    }
}
