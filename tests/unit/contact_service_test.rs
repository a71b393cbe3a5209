//! Unit tests for ContactService: validation, configuration, delivery.

use mockito::{Matcher, Server};
use rstest::rstest;

use bookwise::services::contact_service::ContactService;
use bookwise::types::contact::ContactMessage;
use bookwise::types::errors::ContactError;
use bookwise::types::settings::ContactSettings;

fn message() -> ContactMessage {
    ContactMessage {
        name: "Layla".to_string(),
        email: "layla@example.com".to_string(),
        subject: "Suggestion".to_string(),
        message: "Please add more history books.".to_string(),
    }
}

fn configured(endpoint: String) -> ContactSettings {
    ContactSettings {
        endpoint,
        service_id: "service_x".to_string(),
        template_id: "template_y".to_string(),
        public_key: "pk_z".to_string(),
    }
}

#[rstest]
#[case::blank_name(ContactMessage { name: "  ".into(), ..message() })]
#[case::no_at(ContactMessage { email: "layla.example.com".into(), ..message() })]
#[case::empty_local_part(ContactMessage { email: "@example.com".into(), ..message() })]
#[case::blank_message(ContactMessage { message: "\n".into(), ..message() })]
fn test_validate_rejects(#[case] msg: ContactMessage) {
    assert!(matches!(
        ContactService::validate(&msg),
        Err(ContactError::InvalidField(_))
    ));
}

#[test]
fn test_validate_accepts_complete_message() {
    assert!(ContactService::validate(&message()).is_ok());
}

#[tokio::test]
async fn test_send_without_credentials_is_not_configured() {
    let service = ContactService::new(ContactSettings::default(), 5).unwrap();
    assert!(!service.is_configured());
    match service.send(&message()).await {
        Err(ContactError::NotConfigured(missing)) => {
            assert!(missing.contains("serviceId"));
            assert!(missing.contains("publicKey"));
        }
        other => panic!("expected NotConfigured, got {:?}", other),
    }
}

#[tokio::test]
async fn test_send_posts_emailjs_payload() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v1.0/email/send")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "service_id": "service_x",
            "template_id": "template_y",
            "user_id": "pk_z",
            "template_params": {
                "from_name": "Layla",
                "from_email": "layla@example.com"
            }
        })))
        .with_status(200)
        .with_body("OK")
        .create_async()
        .await;

    let endpoint = format!("{}/api/v1.0/email/send", server.url());
    let service = ContactService::new(configured(endpoint), 5).unwrap();
    assert!(service.is_configured());
    service.send(&message()).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_send_reports_rejection() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/send")
        .with_status(400)
        .with_body("The Public Key is invalid")
        .create_async()
        .await;

    let service = ContactService::new(configured(format!("{}/send", server.url())), 5).unwrap();
    let err = service.send(&message()).await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "Contact delivery failed: The Public Key is invalid"
    );
}
