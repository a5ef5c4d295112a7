//! Shared mock server wiring

use content_agent::config::AppConfig;
use content_agent::handlers::CommandContext;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const ACCOUNT_SID: &str = "AC_e2e";
pub const MESSAGES_PATH: &str = "/2010-04-01/Accounts/AC_e2e/Messages.json";

/// Chat completion response wrapping `content`
fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    }))
}

/// Answer chat requests whose body contains `marker` with `content`
pub async fn mock_chat(server: &MockServer, marker: &str, content: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_string_contains(marker))
        .respond_with(completion(content))
        .mount(server)
        .await;
}

pub async fn mock_classifier(server: &MockServer, content_type: &str) {
    let reply = json!({"content_type": content_type, "tone": "professional", "platform": "linkedin"});
    mock_chat(server, "extracts social media platform", &reply.to_string()).await;
}

pub async fn mock_text_writer(server: &MockServer, content: &str) {
    mock_chat(server, "Social Media Content Writer", content).await;
}

pub async fn mock_image_designer(server: &MockServer, content: &str) {
    mock_chat(server, "Image Prompt Designer", content).await;
}

pub async fn mock_images(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/images/generations"))
        .respond_with(response)
        .mount(server)
        .await;
}

pub async fn mock_twilio(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(MESSAGES_PATH))
        .respond_with(response)
        .mount(server)
        .await;
}

/// Config pointing every client at the mock server
pub fn config(server: &MockServer, recipient: Option<&str>) -> AppConfig {
    let toml = format!(
        r#"
[llm]
base_url = "{uri}"
api_key = "sk-e2e"

[twilio]
base_url = "{uri}"
account_sid = "{sid}"
auth_token = "token"
whatsapp_number = "+14155238886"
"#,
        uri = server.uri(),
        sid = ACCOUNT_SID,
    );
    let mut config = AppConfig::from_toml(&toml).unwrap();
    config.twilio.whatsapp_to = recipient.map(String::from);
    config
}

pub fn context(server: &MockServer, recipient: Option<&str>) -> CommandContext {
    CommandContext::new(None, None, config(server, recipient))
}

/// Form bodies of every Twilio send the server received
pub async fn twilio_bodies(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.url.path() == MESSAGES_PATH)
        .map(|r| String::from_utf8_lossy(&r.body).into_owned())
        .collect()
}
