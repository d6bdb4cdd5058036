//! Validation coverage for user identifiers and display names.

use rstest::rstest;

use super::{DISPLAY_NAME_MAX, DisplayName, User, UserId, UserValidationError};

#[rstest]
fn user_id_round_trips_canonical_form() {
    let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid uuid");
    assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
}

#[rstest]
#[case("", UserValidationError::EmptyId)]
#[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
#[case("3fa85f64-5717-4562-b3fc", UserValidationError::InvalidId)]
#[case("not-a-uuid", UserValidationError::InvalidId)]
fn user_id_rejects_bad_input(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(UserId::new(raw), Err(expected));
}

#[rstest]
fn user_id_serialises_as_bare_string() {
    let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid uuid");
    let encoded = serde_json::to_string(&id).expect("id serialises");
    assert_eq!(encoded, "\"3fa85f64-5717-4562-b3fc-2c963f66afa6\"");
}

#[rstest]
#[case("A")]
#[case("Night Owl_99")]
fn display_name_accepts_allowed_characters(#[case] raw: &str) {
    let name = DisplayName::new(raw).expect("name accepted");
    assert_eq!(name.as_ref(), raw);
}

#[rstest]
fn display_name_accepts_the_length_boundary() {
    let raw = "n".repeat(DISPLAY_NAME_MAX);
    assert!(DisplayName::new(raw).is_ok());
    let too_long = "n".repeat(DISPLAY_NAME_MAX + 1);
    assert_eq!(
        DisplayName::new(too_long),
        Err(UserValidationError::DisplayNameTooLong {
            max: DISPLAY_NAME_MAX
        })
    );
}

#[rstest]
#[case("")]
#[case("   ")]
fn display_name_rejects_blank(#[case] raw: &str) {
    assert_eq!(
        DisplayName::new(raw),
        Err(UserValidationError::EmptyDisplayName)
    );
}

#[rstest]
#[case("emoji 😴 name")]
#[case("semi;colon")]
#[case("new\nline")]
fn display_name_rejects_disallowed_characters(#[case] raw: &str) {
    assert_eq!(
        DisplayName::new(raw),
        Err(UserValidationError::DisplayNameInvalidCharacters)
    );
}

#[rstest]
fn user_round_trips_through_serde() {
    let user = User::from_strings("3fa85f64-5717-4562-b3fc-2c963f66afa6", "Night Owl");
    let encoded = serde_json::to_string(&user).expect("user serialises");
    assert!(encoded.contains("displayName"));
    let decoded: User = serde_json::from_str(&encoded).expect("user deserialises");
    assert_eq!(decoded, user);
}

#[rstest]
fn user_accepts_snake_case_alias() {
    let decoded: User = serde_json::from_str(
        r#"{"id":"3fa85f64-5717-4562-b3fc-2c963f66afa6","display_name":"Night Owl"}"#,
    )
    .expect("alias accepted");
    assert_eq!(decoded.display_name().as_ref(), "Night Owl");
}

#[rstest]
fn user_deserialisation_enforces_name_rules() {
    let decoded = serde_json::from_str::<User>(
        r#"{"id":"3fa85f64-5717-4562-b3fc-2c963f66afa6","displayName":"   "}"#,
    );
    assert!(decoded.is_err());
}
