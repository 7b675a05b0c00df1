// Messages
pub const MESSAGE_CONTROL_CHARS: &str = "avoid non-printing characters and \\&gt;&lt;/ please.";
pub const MESSAGE_CONTAINS_HTML: &str = "may not contain HTML";
pub const MESSAGE_TAKEN: &str = "has already been taken";
pub const MESSAGE_NOT_A_NUMBER: &str = "is not a number";
pub const MESSAGE_NOT_AN_INTEGER: &str = "must be an integer";

pub const MESSAGE_USERNAME: &str = "use only letters, numbers, and .-_@ please.";
pub const MESSAGE_RAILS_NAME: &str = "should only include underscores and letters.";
pub const MESSAGE_EMAIL: &str = "should look like an email address.";
pub const MESSAGE_PHONE_NUMBER: &str =
    "accepts only 10 numbers and (),.- characters and must not be all 0s";
pub const MESSAGE_PHONE_EXTENSION: &str = "accepts only numbers (0-9)";
pub const MESSAGE_DOMAIN: &str = "should look like a domain name.";
pub const MESSAGE_ZIPCODE: &str = "must contain 5 or 9 numbers";
pub const MESSAGE_MIDDLE_INITIAL: &str = "accepts only one letter";
pub const MESSAGE_DOLLAR: &str = "accepts only numeric characters, period, and negative sign";
pub const MESSAGE_POSITIVE_DOLLAR: &str = "accepts only numeric characters, period";
pub const MESSAGE_PERCENT: &str = "accepts only numeric characters, period, negative sign, and must be equal/less/greater than +/- 100";
pub const MESSAGE_POSITIVE_PERCENT: &str =
    "accepts only numeric characters, period, and must be less than 100";
pub const MESSAGE_URL: &str = "web address isnt valid";
pub const MESSAGE_SSN: &str = "must be in the format 111-11-1111";
pub const MESSAGE_TAXID: &str = "must be in the format 11-1111111";
pub const MESSAGE_AGE: &str = "must contain only 3 numbers and less than 110";
pub const MESSAGE_NUMBER: &str = "accepts only numbers (0-9)";

// Top-level domains accepted besides the generic letter-count rule
pub const FIXED_TLDS: &str = "com|org|net|edu|gov|mil|biz|info|pro|mobi|name|aero|jobs|museum";

// Environment
pub const ENV_FAIL_FAST: &str = "VALIDATION_FAIL_FAST";
pub const ENV_MAX_ERRORS: &str = "VALIDATION_MAX_ERRORS";
pub const ENV_LOG_FORMAT: &str = "VALIDATION_LOG_FORMAT";
