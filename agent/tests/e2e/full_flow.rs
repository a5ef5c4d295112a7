//! E2E test: one request through every real client

use content_flow::{MergedItem, Route};
use serde_json::json;
use wiremock::{MockServer, ResponseTemplate};

use crate::support::*;

#[tokio::test]
async fn test_text_with_image_is_generated_and_delivered() {
    let server = MockServer::start().await;
    mock_classifier(&server, "text_with_image").await;
    mock_text_writer(&server, r#"{"blogs": [{"content_of_blog": "AI is changing care."}]}"#).await;
    mock_image_designer(&server, "```json\n{\"prompts\": [\"abstract hospital\"]}\n```").await;
    mock_images(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"data": [{"url": "https://img.example/1.png"}]})),
    )
    .await;
    mock_twilio(&server, ResponseTemplate::new(201).set_body_json(json!({"sid": "SM1"}))).await;

    let flow = context(&server, Some("+15550001111")).build_flow().unwrap();
    let state = flow.kickoff("A LinkedIn post with an image about AI in healthcare").await;

    assert_eq!(state.route, Some(Route::TextWithImage));
    assert_eq!(
        state.combined_results(),
        &[MergedItem::new(
            Some("AI is changing care.".into()),
            Some("https://img.example/1.png".into())
        )]
    );
    assert_eq!(state.whatsapp_send_output, vec!["sent: SM1"]);

    let bodies = twilio_bodies(&server).await;
    assert_eq!(bodies.len(), 1);
    assert!(bodies[0].contains("To=whatsapp%3A%2B15550001111"));
    assert!(bodies[0].contains("MediaUrl="));
}

#[tokio::test]
async fn test_rejected_image_is_filtered_from_delivery() {
    let server = MockServer::start().await;
    mock_classifier(&server, "text_with_image").await;
    mock_text_writer(&server, r#"{"blogs": [{"content_of_blog": "Hello"}]}"#).await;
    mock_image_designer(&server, r#"{"prompts": ["edgy"]}"#).await;
    mock_images(
        &server,
        ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": "content_policy_violation", "message": "Rejected by our safety system"}
        })),
    )
    .await;
    mock_twilio(&server, ResponseTemplate::new(201).set_body_json(json!({"sid": "SM2"}))).await;

    let flow = context(&server, Some("+15550001111")).build_flow().unwrap();
    let state = flow.kickoff("post with image").await;

    assert_eq!(
        state.combined_results(),
        &[MergedItem::new(Some("Hello".into()), None)]
    );
    // The diagnostic stays in the raw image output only
    let raw = state.image_generation_output.as_ref().unwrap().parsed().unwrap();
    assert!(raw.images[0]
        .as_ref()
        .and_then(|i| i.image_url.as_deref())
        .unwrap()
        .starts_with("Error: CONTENT_POLICY_VIOLATION"));

    assert_eq!(state.whatsapp_send_output, vec!["sent: SM2"]);
    let bodies = twilio_bodies(&server).await;
    assert!(!bodies[0].contains("MediaUrl"));
}

#[tokio::test]
async fn test_invalid_text_json_still_delivers_images() {
    let server = MockServer::start().await;
    mock_classifier(&server, "text_with_image").await;
    mock_text_writer(&server, "Sorry, here is your post: Hello!").await;
    mock_image_designer(&server, r#"{"prompts": ["calm"]}"#).await;
    mock_images(
        &server,
        ResponseTemplate::new(200).set_body_json(json!({"data": [{"url": "https://img.example/2.png"}]})),
    )
    .await;
    mock_twilio(&server, ResponseTemplate::new(201).set_body_json(json!({"sid": "SM3"}))).await;

    let flow = context(&server, Some("+15550001111")).build_flow().unwrap();
    let state = flow.kickoff("post with image").await;

    assert!(state.text_generation_output.as_ref().unwrap().is_invalid());
    assert_eq!(
        state.combined_results(),
        &[MergedItem::new(None, Some("https://img.example/2.png".into()))]
    );
    assert_eq!(state.whatsapp_send_output, vec!["sent: SM3"]);
}

#[tokio::test]
async fn test_invalid_sender_is_reported() {
    let server = MockServer::start().await;
    mock_classifier(&server, "text_only").await;
    mock_text_writer(&server, r#"{"blogs": [{"content_of_blog": "Hello"}]}"#).await;
    mock_twilio(
        &server,
        ResponseTemplate::new(400).set_body_json(json!({"code": 63007, "message": "bad from"})),
    )
    .await;

    let flow = context(&server, Some("+15550001111")).build_flow().unwrap();
    let state = flow.kickoff("text only please").await;

    assert_eq!(state.whatsapp_send_output.len(), 1);
    assert!(state.whatsapp_send_output[0].starts_with("Error: Twilio error 63007"));
}

#[tokio::test]
async fn test_no_recipient_skips_twilio() {
    let server = MockServer::start().await;
    mock_classifier(&server, "text_only").await;
    mock_text_writer(&server, r#"{"blogs": [{"content_of_blog": "Hello"}]}"#).await;

    let flow = context(&server, None).build_flow().unwrap();
    let state = flow.kickoff("text only please").await;

    assert_eq!(state.combined_results().len(), 1);
    assert!(state.whatsapp_send_output.is_empty());
    assert!(twilio_bodies(&server).await.is_empty());
}

#[tokio::test]
async fn test_unknown_content_type_generates_nothing() {
    let server = MockServer::start().await;
    mock_classifier(&server, "video").await;

    let flow = context(&server, Some("+15550001111")).build_flow().unwrap();
    let state = flow.kickoff("make me a video").await;

    assert_eq!(state.route, None);
    assert!(state.combined_results().is_empty());
    assert!(state.text_generation_output.is_none());
    assert!(twilio_bodies(&server).await.is_empty());
}
