use std::sync::Arc;

use chatty::models::FromRecord;
use chatty::store::{Query, RemoteStoreExt};
use chatty::{
    AuthInfo, ChatClient, Contact, ConversationId, MemoryStore, Message, MessageStatus, RemoteStore,
    StorePath,
};
use pretty_assertions::assert_eq;
use serde_json::json;

fn client(store: &Arc<MemoryStore>, uid: &str) -> ChatClient {
    ChatClient::builder()
        .store(store.clone())
        .session(AuthInfo::new(uid).with_name(uid.to_uppercase()))
        .build()
        .unwrap()
}

async fn stored_messages(store: &MemoryStore, conversation: &ConversationId) -> Vec<Message> {
    store
        .get_once(Query::new(StorePath::messages(conversation)).order_by("timestamp"))
        .await
        .unwrap()
        .parse_children()
}

#[tokio::test]
async fn send_appends_message_under_canonical_conversation() {
    let store = Arc::new(MemoryStore::new());
    let u1 = client(&store, "u1");
    let u2 = client(&store, "u2");

    let from_u1 = u1.chats().conversation_with(&"u2".into()).unwrap();
    let from_u2 = u2.chats().conversation_with(&"u1".into()).unwrap();
    assert_eq!(from_u1, from_u2);
    assert_eq!(from_u1, "u1 u2");

    let sent = u1
        .chats()
        .send_to("u2")
        .text("hello")
        .send()
        .await
        .unwrap()
        .unwrap();

    let stored = stored_messages(&store, &from_u1).await;
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0], sent);
    assert_eq!(stored[0].status, MessageStatus::Sent);
    assert!(!stored[0].is_seen);
    assert_eq!(stored[0].receiver_id, "u2");
    assert_eq!(stored[0].sender_id, "u1");
    assert!(!stored[0].id.is_empty());
}

#[tokio::test]
async fn blank_send_issues_no_append() {
    let store = Arc::new(MemoryStore::new());
    let u1 = client(&store, "u1");

    assert!(u1.chats().send_to("u2").text("").send().await.unwrap().is_none());
    assert!(u1.chats().send_to("u2").text(" \t").send().await.unwrap().is_none());

    assert_eq!(store.snapshot(), json!({}));
}

#[tokio::test]
async fn session_delivers_full_collection_on_each_change() {
    let store = Arc::new(MemoryStore::new());
    let u1 = client(&store, "u1");

    let mut session = u1.chats().open("u2").await.unwrap();
    let initial = session.next().await.unwrap();
    assert!(initial.timeline.is_empty());

    u1.chats().send_to("u2").text("first").at(2_000).send().await.unwrap();
    u1.chats().send_to("u2").text("second").at(1_000).send().await.unwrap();

    let view = session.latest().unwrap();
    let texts: Vec<&str> = view.messages.iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, vec!["second", "first"]);
    assert_eq!(view.timeline.len(), 2);
    assert!(view.timeline.groups[0].entries.iter().all(|e| e.is_own));
    assert_eq!(view.receipts_requested, 0);
}

#[tokio::test]
async fn receiver_marks_unseen_messages_read() {
    let store = Arc::new(MemoryStore::new());
    let u1 = client(&store, "u1");
    let u2 = client(&store, "u2");

    u1.chats().send_to("u2").text("one").at(1_000).send().await.unwrap();
    u1.chats().send_to("u2").text("two").at(2_000).send().await.unwrap();
    u2.chats().send_to("u1").text("reply").at(3_000).send().await.unwrap();

    let mut session = u2.chats().open("u1").await.unwrap();
    let view = session.next().await.unwrap();
    assert_eq!(view.receipts_requested, 2);
    assert!(view.timeline.groups[0].entries[2].is_own);

    session.flush_receipts().await;

    let conversation = session.conversation().clone();
    let stored = stored_messages(&store, &conversation).await;
    let seen: Vec<bool> = stored.iter().map(|m| m.is_seen).collect();
    assert_eq!(seen, vec![true, true, false]);

    // The receipt writes themselves notify the session; the refreshed
    // collection has nothing left to acknowledge.
    let refreshed = session.latest().unwrap();
    assert_eq!(refreshed.receipts_requested, 0);
}

#[tokio::test]
async fn receipt_targets_store_key_not_uid_field() {
    let store = Arc::new(MemoryStore::new());
    let conversation = ConversationId::from("u1 u2");
    store
        .set(
            &StorePath::messages(&conversation).child("-k1"),
            json!({
                "uid": "legacy-id",
                "senderId": "u1",
                "receiverId": "u2",
                "text": "hi",
                "timestamp": 1_000,
                "status": "sent",
                "isSeen": false,
            }),
        )
        .await
        .unwrap();
    let u2 = client(&store, "u2");

    let mut session = u2.chats().open("u1").await.unwrap();
    let view = session.next().await.unwrap();
    assert_eq!(view.messages[0].id, "-k1");
    assert_eq!(view.receipts_requested, 1);
    session.flush_receipts().await;

    let snapshot = store
        .get_once(Query::new(StorePath::messages(&conversation)))
        .await
        .unwrap();
    let keys: Vec<&str> = snapshot.children.iter().map(|d| d.key.as_str()).collect();
    assert_eq!(keys, vec!["-k1"]);
    assert_eq!(snapshot.children[0].value["isSeen"], json!(true));
    assert_eq!(snapshot.children[0].value["text"], json!("hi"));

    let refreshed = session.latest().unwrap();
    assert_eq!(refreshed.receipts_requested, 0);
}

#[tokio::test]
async fn sender_does_not_issue_receipts() {
    let store = Arc::new(MemoryStore::new());
    let u1 = client(&store, "u1");

    u1.chats().send_to("u2").text("one").send().await.unwrap();

    let mut session = u1.chats().open("u2").await.unwrap();
    assert_eq!(session.next().await.unwrap().receipts_requested, 0);
}

#[tokio::test]
async fn closing_session_releases_subscription() {
    let store = Arc::new(MemoryStore::new());
    let u1 = client(&store, "u1");

    let session = u1.chats().open("u2").await.unwrap();
    let preview = u1.chats().last_message("u2").await.unwrap();
    let contacts = u1.contacts().subscribe_all().await.unwrap();
    assert_eq!(store.listener_count(), 3);

    session.close();
    preview.close();
    drop(contacts);
    assert_eq!(store.listener_count(), 0);
}

#[tokio::test]
async fn denied_conversation_shows_empty_timeline() {
    let store = Arc::new(MemoryStore::new());
    store.deny(StorePath::parse("chats"));
    let u1 = client(&store, "u1");

    let mut session = u1.chats().open("u2").await.unwrap();
    let view = session.next().await.unwrap();

    assert!(view.timeline.is_empty());
    assert!(session.next().await.is_none());
}

#[tokio::test]
async fn last_message_preview_follows_newest() {
    let store = Arc::new(MemoryStore::new());
    let u1 = client(&store, "u1");
    let u2 = client(&store, "u2");

    let mut preview = u1.chats().last_message("u2").await.unwrap();
    assert_eq!(preview.next().await.unwrap(), None);

    u1.chats().send_to("u2").text("older").at(1_000).send().await.unwrap();
    u2.chats().send_to("u1").text("newest").at(5_000).send().await.unwrap();

    assert_eq!(preview.latest().unwrap().as_deref(), Some("newest"));
}

#[tokio::test]
async fn contact_list_tolerates_partial_records() {
    let store = Arc::new(MemoryStore::new());
    let u1 = client(&store, "u1");
    u1.users().register().await.unwrap();
    store
        .set(&StorePath::parse("users/u9"), json!({ "email": null }))
        .await
        .unwrap();
    store
        .set(&StorePath::parse("users/broken"), json!("not a record"))
        .await
        .unwrap();

    let mut feed = u1.contacts().subscribe_all().await.unwrap();
    let contacts = feed.next().await.unwrap();

    assert_eq!(contacts.len(), 2);
    assert_eq!(contacts[0], Contact::new("u1").with_name("U1"));
    assert_eq!(contacts[1].display_name_or_default(), "Unknown");
}

#[tokio::test]
async fn profile_feed_sees_renames() {
    let store = Arc::new(MemoryStore::new());
    let u1 = client(&store, "u1");
    let u2 = client(&store, "u2");
    u2.users().register().await.unwrap();

    let mut profile = u1.contacts().profile("u2").await.unwrap();
    let before = profile.next().await.unwrap().unwrap();
    assert_eq!(before.display_name.as_deref(), Some("U2"));

    let update = u2.users().rename("Grace").await.unwrap();
    assert!(!update.mirrored);

    let after = profile.next().await.unwrap().unwrap();
    assert_eq!(after.display_name.as_deref(), Some("Grace"));
}

#[tokio::test]
async fn stored_record_uses_expected_field_names() {
    let store = Arc::new(MemoryStore::new());
    let u1 = client(&store, "u1");
    let sent = u1
        .chats()
        .send_to("u2")
        .text("hello")
        .at(42)
        .send()
        .await
        .unwrap()
        .unwrap();

    let path = StorePath::message(&ConversationId::from("u1 u2"), &sent.id);
    let snapshot = store.get_once(Query::new(path)).await.unwrap();
    let record = snapshot.value.unwrap();

    assert_eq!(
        record,
        json!({
            "uid": sent.id.as_str(),
            "senderId": "u1",
            "receiverId": "u2",
            "text": "hello",
            "timestamp": 42,
            "status": "sent",
            "isSeen": false,
        })
    );
    assert_eq!(
        Message::from_record(sent.id.as_str(), &record).unwrap(),
        sent
    );
}
