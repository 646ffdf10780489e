use crate::HttpStatusCode;

#[test]
fn given_duplicate_registration_status_when_classified_then_is_client_error() {
    let status = HttpStatusCode::from(400);

    assert!(status.is_client_error());
    assert!(!status.is_server_error());
    assert!(!status.is_success());
}

#[test]
fn given_store_failure_status_when_classified_then_is_server_error() {
    let status = HttpStatusCode(500);

    assert!(status.is_server_error());
    assert_eq!(status.to_string(), "HTTP 500");
}

#[test]
fn given_ok_status_when_classified_then_is_success() {
    assert!(HttpStatusCode(200).is_success());
    assert!(HttpStatusCode(204).is_success());
    assert!(!HttpStatusCode(302).is_success());
}
