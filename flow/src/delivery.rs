//! Best-effort delivery of merged results over a messaging channel

use crate::collaborators::{DeliveryError, Messenger, OutboundMessage};
use crate::state::MergedItem;

/// True when a value looks like an error string leaked from a tool
pub fn looks_like_error(value: &str) -> bool {
    value
        .trim_start()
        .get(..5)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("error"))
}

fn clean(value: Option<&String>) -> Option<String> {
    match value {
        Some(v) if v.is_empty() || looks_like_error(v) => None,
        Some(v) => Some(v.clone()),
        None => None,
    }
}

/// Build one outbound message per merged record.
///
/// Fields holding embedded error strings are nulled, and records left with
/// neither text nor image are dropped.
pub fn build_messages(items: &[MergedItem]) -> Vec<OutboundMessage> {
    items
        .iter()
        .filter_map(|item| {
            let text = clean(item.text.as_ref());
            let image = clean(item.image.as_ref());
            if text.is_none() && image.is_none() {
                None
            } else {
                Some(OutboundMessage { text, image })
            }
        })
        .collect()
}

/// Deliver merged results and return the per-message status list.
///
/// Never fails: a missing destination or unconfigured messenger yields an
/// empty list, and a provider failure yields a single `"Error: ..."` entry.
pub async fn deliver(
    messenger: Option<&dyn Messenger>,
    destination: Option<&str>,
    items: &[MergedItem],
) -> Vec<String> {
    let Some(destination) = destination.filter(|d| !d.trim().is_empty()) else {
        tracing::info!("No delivery destination configured, skipping send");
        return Vec::new();
    };

    let Some(messenger) = messenger else {
        tracing::info!("No messaging backend configured, skipping send");
        return Vec::new();
    };

    let messages = build_messages(items);
    if messages.is_empty() {
        tracing::info!("Nothing to deliver after filtering {} result(s)", items.len());
        return Vec::new();
    }

    tracing::info!("Delivering {} message(s) to {}", messages.len(), destination);

    match messenger.send(destination, &messages).await {
        Ok(ids) => ids.into_iter().map(|id| format!("sent: {}", id)).collect(),
        Err(DeliveryError::NotConfigured(reason)) => {
            tracing::info!("Delivery skipped: {}", reason);
            Vec::new()
        }
        Err(e) => {
            tracing::error!("Delivery failed: {}", e);
            vec![format!("Error: {}", e)]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct RecordingMessenger {
        sent: Mutex<Vec<(String, Vec<OutboundMessage>)>>,
        fail_with: Option<fn() -> DeliveryError>,
    }

    impl RecordingMessenger {
        fn ok() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_with: None,
            }
        }

        fn failing(fail_with: fn() -> DeliveryError) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_with: Some(fail_with),
            }
        }

        fn calls(&self) -> usize {
            self.sent.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl Messenger for RecordingMessenger {
        async fn send(
            &self,
            destination: &str,
            messages: &[OutboundMessage],
        ) -> Result<Vec<String>, DeliveryError> {
            self.sent
                .lock()
                .unwrap()
                .push((destination.to_string(), messages.to_vec()));
            if let Some(fail) = self.fail_with {
                return Err(fail());
            }
            Ok((0..messages.len()).map(|i| format!("SM{}", i)).collect())
        }
    }

    fn item(text: Option<&str>, image: Option<&str>) -> MergedItem {
        MergedItem::new(text.map(str::to_string), image.map(str::to_string))
    }

    #[test]
    fn test_looks_like_error() {
        assert!(looks_like_error("Error: CONTENT_POLICY_VIOLATION"));
        assert!(looks_like_error("ERROR occurred"));
        assert!(looks_like_error("  error"));
        assert!(!looks_like_error("Errands to run"));
        assert!(!looks_like_error("An error happened"));
        assert!(!looks_like_error("err"));
    }

    #[test]
    fn test_error_text_is_nulled() {
        let messages = build_messages(&[item(Some("error: boom"), Some("http://x"))]);
        assert_eq!(
            messages,
            vec![OutboundMessage {
                text: None,
                image: Some("http://x".into())
            }]
        );
    }

    #[test]
    fn test_records_left_empty_are_dropped() {
        let messages = build_messages(&[
            item(Some("Error: no image"), Some("ERROR: failed")),
            item(None, None),
            item(Some(""), None),
            item(Some("Hello"), None),
        ]);
        assert_eq!(
            messages,
            vec![OutboundMessage {
                text: Some("Hello".into()),
                image: None
            }]
        );
    }

    #[tokio::test]
    async fn test_no_destination_skips_send() {
        let messenger = RecordingMessenger::ok();
        let statuses = deliver(Some(&messenger), None, &[item(Some("Hi"), None)]).await;

        assert!(statuses.is_empty());
        assert_eq!(messenger.calls(), 0);
    }

    #[tokio::test]
    async fn test_blank_destination_skips_send() {
        let messenger = RecordingMessenger::ok();
        let statuses = deliver(Some(&messenger), Some("  "), &[item(Some("Hi"), None)]).await;

        assert!(statuses.is_empty());
        assert_eq!(messenger.calls(), 0);
    }

    #[tokio::test]
    async fn test_nothing_to_send_skips_send() {
        let messenger = RecordingMessenger::ok();
        let statuses = deliver(Some(&messenger), Some("+15550001"), &[item(Some("Error"), None)]).await;

        assert!(statuses.is_empty());
        assert_eq!(messenger.calls(), 0);
    }

    #[tokio::test]
    async fn test_success_records_one_status_per_message() {
        let messenger = RecordingMessenger::ok();
        let statuses = deliver(
            Some(&messenger),
            Some("+15550001"),
            &[item(Some("A"), Some("http://x")), item(None, Some("http://y"))],
        )
        .await;

        assert_eq!(statuses, vec!["sent: SM0", "sent: SM1"]);
        let sent = messenger.sent.lock().unwrap();
        assert_eq!(sent[0].0, "+15550001");
        assert_eq!(sent[0].1.len(), 2);
    }

    #[tokio::test]
    async fn test_provider_failure_records_single_error() {
        let messenger = RecordingMessenger::failing(|| DeliveryError::Provider {
            code: 21211,
            message: "Invalid 'To' Phone Number".into(),
        });
        let statuses = deliver(
            Some(&messenger),
            Some("+15550001"),
            &[item(Some("A"), None), item(Some("B"), None)],
        )
        .await;

        assert_eq!(statuses.len(), 1);
        assert!(statuses[0].starts_with("Error: "));
        assert!(statuses[0].contains("21211"));
    }

    #[tokio::test]
    async fn test_not_configured_is_a_skip() {
        let messenger =
            RecordingMessenger::failing(|| DeliveryError::NotConfigured("missing auth token".into()));
        let statuses = deliver(Some(&messenger), Some("+15550001"), &[item(Some("A"), None)]).await;

        assert!(statuses.is_empty());
    }
}
