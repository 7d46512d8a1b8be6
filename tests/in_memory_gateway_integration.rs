//! End-to-end flows through [`MessageGateway`] backed by the in-memory store.
//!
//! These tests check that what a caller writes through the gateway is what
//! it later reads back, with the inbox sentinel resolving to the store's
//! session-less messages.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

use std::sync::Arc;

use courier::message::{
    adapters::memory::InMemoryMessageStore,
    domain::{
        ClearOr, CreateMessageParams, ErrorPayload, MessageId, MessageItem, MessageUpdate,
        PluginPayload, Role, SessionId, TopicId, Translation, TtsRecord,
    },
    services::MessageGateway,
};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::json;

type Gateway = MessageGateway<InMemoryMessageStore<DefaultClock>>;

#[fixture]
fn gateway() -> Gateway {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
    MessageGateway::new(Arc::new(InMemoryMessageStore::default()))
}

async fn post(gateway: &Gateway, session: &str, content: &str) -> MessageId {
    gateway
        .create_message(CreateMessageParams::new(Role::User, content).with_session(session))
        .await
        .expect("create should succeed")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn inbox_messages_are_stored_without_session(gateway: Gateway) {
    let id = post(&gateway, "inbox", "hi").await;

    let via_sentinel = gateway
        .get_messages(Some(SessionId::inbox()), None)
        .await
        .expect("query should succeed");
    let via_none = gateway
        .get_messages(None, None)
        .await
        .expect("query should succeed");

    let stored = via_sentinel.first().expect("inbox message");
    assert_eq!(stored.id, id);
    assert_eq!(stored.session_id, None);
    assert_eq!(via_sentinel, via_none);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn session_queries_do_not_leak_into_inbox(gateway: Gateway) {
    post(&gateway, "inbox", "inbox message").await;
    let in_session = post(&gateway, "sess-1", "session message").await;

    let session = gateway
        .get_all_messages_in_session(SessionId::new("sess-1"))
        .await
        .expect("query should succeed");
    let everything = gateway
        .get_all_messages()
        .await
        .expect("query should succeed");

    assert_eq!(session.len(), 1);
    assert_eq!(session.first().map(|m| &m.id), Some(&in_session));
    assert_eq!(everything.len(), 2);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn counts_drive_derived_predicates(gateway: Gateway) {
    assert!(!gateway.has_messages().await.expect("count"));
    assert!(!gateway.message_count_to_check_trace().await.expect("count"));

    for n in 0..4 {
        post(&gateway, "sess-1", &format!("message {n}")).await;
    }

    assert!(gateway.has_messages().await.expect("count"));
    assert!(gateway.message_count_to_check_trace().await.expect("count"));
    assert_eq!(gateway.count_messages().await.expect("count"), 4);
    assert_eq!(gateway.count_today_messages().await.expect("count today"), 4);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn updates_round_trip_through_the_store(gateway: Gateway) {
    let id = gateway
        .create_message(
            CreateMessageParams::new(Role::Assistant, "")
                .with_session("sess-1")
                .with_plugin(PluginPayload {
                    identifier: "weather".to_owned(),
                    api_name: "forecast".to_owned(),
                    arguments: "{}".to_owned(),
                    plugin_type: "default".to_owned(),
                }),
        )
        .await
        .expect("create should succeed");

    let arguments = json!({"city": "Lyon"})
        .as_object()
        .cloned()
        .expect("object literal");
    gateway
        .update_message_plugin_arguments(id.clone(), arguments)
        .await
        .expect("arguments update");
    gateway
        .update_message_plugin_state(id.clone(), json!({"loading": false}))
        .await
        .expect("state update");
    gateway
        .update_message_error(id.clone(), ErrorPayload::new("Timeout").with_message("slow"))
        .await
        .expect("error update");
    gateway
        .update_message(id.clone(), MessageUpdate::content("Sunny"))
        .await
        .expect("content update");
    gateway
        .update_message_translate(
            id.clone(),
            Translation {
                to: Some("fr".to_owned()),
                content: Some("Ensoleillé".to_owned()),
                ..Translation::default()
            }
            .into(),
        )
        .await
        .expect("translate update");
    gateway
        .update_message_tts(id.clone(), ClearOr::Value(TtsRecord::default()))
        .await
        .expect("tts update");
    gateway
        .update_message_tts(id.clone(), ClearOr::Clear)
        .await
        .expect("tts clear");

    let messages = gateway
        .get_messages(Some(SessionId::new("sess-1")), None)
        .await
        .expect("query should succeed");
    let message = messages.first().expect("stored message");

    assert_eq!(message.content, "Sunny");
    assert_eq!(
        message.plugin.as_ref().map(|p| p.arguments.as_str()),
        Some(r#"{"city":"Lyon"}"#)
    );
    assert_eq!(message.plugin_state, Some(json!({"loading": false})));
    assert_eq!(
        message.error.as_ref().and_then(|e| e.message.as_deref()),
        Some("slow")
    );
    assert_eq!(
        message.translate.as_ref().and_then(|t| t.to.as_deref()),
        Some("fr")
    );
    assert!(message.tts.is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn batch_import_and_removal(gateway: Gateway) {
    let now = chrono::Utc::now();
    let rows = ["a", "b", "c"].map(|id| MessageItem {
        id: MessageId::new(id),
        role: Role::User,
        content: format!("row {id}"),
        session_id: Some(SessionId::new("sess-1")),
        topic_id: Some(TopicId::new("topic-1")),
        parent_id: None,
        model: None,
        provider: None,
        error: None,
        created_at: now,
        updated_at: now,
    });

    let outcome = gateway
        .batch_create_messages(rows.to_vec())
        .await
        .expect("import should succeed");
    assert_eq!(outcome.added, 3);

    gateway
        .remove_message(MessageId::new("a"))
        .await
        .expect("single removal");
    gateway
        .remove_messages(vec![MessageId::new("b")])
        .await
        .expect("batch removal");
    assert_eq!(gateway.count_messages().await.expect("count"), 1);

    post(&gateway, "inbox", "keep me").await;
    gateway
        .remove_messages_by_assistant(SessionId::new("sess-1"), Some(TopicId::new("topic-1")))
        .await
        .expect("topic removal");
    assert_eq!(gateway.count_messages().await.expect("count"), 1);

    gateway
        .remove_messages_by_assistant(SessionId::inbox(), None)
        .await
        .expect("inbox removal");
    assert!(!gateway.has_messages().await.expect("count"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn remove_all_messages_empties_the_store(gateway: Gateway) {
    post(&gateway, "inbox", "one").await;
    post(&gateway, "sess-1", "two").await;

    gateway
        .remove_all_messages()
        .await
        .expect("remove all should succeed");

    assert_eq!(gateway.count_messages().await.expect("count"), 0);
    assert!(gateway.client().is_empty());
}
