//! Regression coverage for user identity, credentials and permissions.

use super::*;
use rstest::rstest;

#[rstest]
#[case("test@Example.com", "test@example.com")]
#[case("Test@EXAMPLE.COM", "Test@example.com")]
#[case("  chef@kitchen.io  ", "chef@kitchen.io")]
#[case("odd\"@\"local@Mail.Example.org", "odd\"@\"local@mail.example.org")]
fn email_lowercases_only_the_domain(#[case] raw: &str, #[case] expected: &str) {
    let email = Email::parse(raw).expect("valid email");
    assert_eq!(email.as_str(), expected);
}

#[rstest]
fn email_exposes_both_halves() {
    let email = Email::parse("Ada@Example.com").expect("valid email");
    assert_eq!(email.local_part(), "Ada");
    assert_eq!(email.domain(), "example.com");
}

#[rstest]
#[case("", UserValidationError::MissingEmail)]
#[case("   ", UserValidationError::MissingEmail)]
#[case("no-at-sign", UserValidationError::InvalidEmail)]
#[case("@example.com", UserValidationError::InvalidEmail)]
#[case("cook@", UserValidationError::InvalidEmail)]
#[case("two words@example.com", UserValidationError::InvalidEmail)]
fn email_rejects_malformed_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Email::parse(raw), Err(expected));
}

#[rstest]
fn email_rejects_overlong_addresses() {
    let raw = format!("{}@example.com", "a".repeat(EMAIL_MAX_LENGTH));
    assert_eq!(
        Email::parse(&raw),
        Err(UserValidationError::EmailTooLong {
            max: EMAIL_MAX_LENGTH
        })
    );
}

#[rstest]
fn email_deserialises_through_normalisation() {
    let email: Email = serde_json::from_str("\"user@EXAMPLE.com\"").expect("valid json");
    assert_eq!(email.as_str(), "user@example.com");
    assert!(serde_json::from_str::<Email>("\"broken\"").is_err());
}

#[rstest]
#[case("", "")]
#[case("  Ada Lovelace ", "Ada Lovelace")]
fn display_name_allows_blank_and_trims(#[case] raw: &str, #[case] expected: &str) {
    let name = DisplayName::new(raw).expect("valid name");
    assert_eq!(name.as_str(), expected);
}

#[rstest]
fn display_name_rejects_overlong_values() {
    let raw = "n".repeat(DISPLAY_NAME_MAX_LENGTH + 1);
    assert_eq!(
        DisplayName::new(raw),
        Err(UserValidationError::DisplayNameTooLong {
            max: DISPLAY_NAME_MAX_LENGTH
        })
    );
}

#[rstest]
#[case("four", false)]
#[case("fives", true)]
fn new_passwords_need_minimum_length(#[case] password: &str, #[case] accepted: bool) {
    assert_eq!(validate_new_password(password).is_ok(), accepted);
}

#[rstest]
fn permissions_default_to_active_regular_user() {
    let permissions = Permissions::default();
    assert!(permissions.is_active);
    assert!(!permissions.is_staff);
    assert!(!permissions.is_superuser);
}

#[rstest]
fn superuser_permissions_raise_both_flags() {
    let permissions = Permissions::superuser();
    assert!(permissions.is_staff && permissions.is_superuser);
}

#[rstest]
fn credentials_without_password_never_verify() {
    let credentials =
        Credentials::from_plaintext(None, &HashingPolicy::fast()).expect("no hashing needed");
    assert!(!credentials.has_usable_password());
    assert!(!credentials.check_password(""));
}

#[rstest]
fn user_checks_password_through_credentials() {
    let credentials = Credentials::from_plaintext(Some("testpass123"), &HashingPolicy::fast())
        .expect("hashing succeeds");
    let user = User::from_new(
        UserId::new(1),
        NewUser {
            email: Email::parse("test@example.com").expect("valid email"),
            name: DisplayName::new("Test").expect("valid name"),
            credentials,
            permissions: Permissions::default(),
        },
    );

    assert!(user.check_password("testpass123"));
    assert!(!user.check_password("wrong"));
    assert_eq!(user.to_string(), "test@example.com");
}

#[rstest]
fn registration_debug_output_hides_password() {
    let registration = UserRegistration::new("cook@example.com", "hunter22");
    let rendered = format!("{registration:?}");
    assert!(!rendered.contains("hunter22"));
    assert!(rendered.contains("cook@example.com"));
}

#[rstest]
fn empty_profile_update_is_detected() {
    assert!(ProfileUpdate::default().is_empty());
    let update = ProfileUpdate {
        name: Some(DisplayName::new("New").expect("valid name")),
        ..ProfileUpdate::default()
    };
    assert!(!update.is_empty());
}
