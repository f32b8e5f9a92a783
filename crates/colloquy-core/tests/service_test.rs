mod support;

use std::sync::Arc;
use std::time::Duration;

use bson::oid::ObjectId;

use colloquy_core::prompts::{
    CONVERSATION_SUMMARY_PREFIX, DEFAULT_TITLE, EMPTY_REPLY_PLACEHOLDER,
    GENERATE_CONVERSATION_SUMMARY,
};
use colloquy_core::{ChatConfig, ChatError, ChatService};
use colloquy_persist::{ConversationStore, TurnRole, TurnStore};

use support::{InMemoryConversationStore, InMemoryTurnStore, ScriptedClient};

struct Harness {
    conversations: Arc<InMemoryConversationStore>,
    turns: Arc<InMemoryTurnStore>,
    provider: Arc<ScriptedClient>,
    service: ChatService,
}

fn harness(provider: Arc<ScriptedClient>, config: ChatConfig) -> Harness {
    let conversations = InMemoryConversationStore::new();
    let turns = InMemoryTurnStore::new();
    let service = ChatService::new(
        conversations.clone(),
        turns.clone(),
        provider.clone(),
        config,
    );
    Harness {
        conversations,
        turns,
        provider,
        service,
    }
}

async fn wait_for_summary(
    conversations: &InMemoryConversationStore,
    id: ObjectId,
) -> Option<String> {
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if let Some(summary) = conversations.summary_of(id) {
                return summary;
            }
            tokio::task::yield_now().await;
        }
    })
    .await
    .ok()
}

#[tokio::test]
async fn hello_starts_a_fresh_conversation() {
    let provider = ScriptedClient::new();
    provider.push_reply("Rust Basics"); // title call
    provider.push_reply("Hi! How can I help?"); // reply call
    let h = harness(provider, ChatConfig::default());

    let reply = h.service.send_message("Hello", None).await.unwrap();

    assert!(!reply.text.is_empty());
    let conversation = h
        .conversations
        .get(reply.conversation_id)
        .await
        .unwrap()
        .expect("conversation was created");
    assert_eq!(conversation.title, "Rust Basics");
    assert_eq!(conversation.summary, None);

    let turns = h.turns.all_turns(reply.conversation_id).await.unwrap();
    assert_eq!(turns.len(), 2);
    assert_eq!(turns[0].role, TurnRole::User);
    assert_eq!(turns[0].content, "Hello");
    assert_eq!(turns[1].role, TurnRole::Assistant);
    assert_eq!(turns[1].content, "Hi! How can I help?");
}

#[tokio::test]
async fn exchange_appends_user_then_assistant() {
    let h = harness(ScriptedClient::always("ok"), ChatConfig::default());

    let reply = h.service.send_message("first", None).await.unwrap();
    h.service
        .send_message("second", Some(reply.conversation_id))
        .await
        .unwrap();

    let turns = h.turns.all_turns(reply.conversation_id).await.unwrap();
    let tail = &turns[turns.len() - 2..];
    assert_eq!(tail[0].role, TurnRole::User);
    assert_eq!(tail[0].content, "second");
    assert_eq!(tail[1].role, TurnRole::Assistant);
    assert!(tail[1].created_at >= tail[0].created_at);
}

#[tokio::test]
async fn empty_title_falls_back_to_default() {
    let provider = ScriptedClient::new();
    provider.push_empty(); // title call returns nothing
    provider.push_reply("answer");
    let h = harness(provider, ChatConfig::default());

    let reply = h.service.send_message("Hello", None).await.unwrap();

    let conversation = h
        .conversations
        .get(reply.conversation_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(conversation.title, DEFAULT_TITLE);
    assert!(!conversation.title.is_empty());
}

#[tokio::test]
async fn title_failure_does_not_block_creation() {
    let provider = ScriptedClient::new();
    provider.push_failure("quota exceeded"); // title call fails
    provider.push_reply("answer");
    let h = harness(provider, ChatConfig::default());

    let reply = h.service.send_message("Hello", None).await.unwrap();

    let conversation = h
        .conversations
        .get(reply.conversation_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(conversation.title, DEFAULT_TITLE);
    assert_eq!(reply.text, "answer");
}

#[tokio::test]
async fn unknown_conversation_is_not_found() {
    let h = harness(ScriptedClient::always("ok"), ChatConfig::default());

    let err = h
        .service
        .send_message("hi", Some(ObjectId::new()))
        .await
        .unwrap_err();

    assert!(matches!(err, ChatError::NotFound(_)));
}

#[tokio::test]
async fn provider_failure_keeps_user_turn_and_no_assistant_turn() {
    let provider = ScriptedClient::always("ok");
    let h = harness(provider.clone(), ChatConfig::default());

    let reply = h.service.send_message("setup", None).await.unwrap();
    let id = reply.conversation_id;
    let before = h.turns.count_for(id);

    provider.push_failure("model overloaded");
    let err = h
        .service
        .send_message("does this work?", Some(id))
        .await
        .unwrap_err();

    assert!(matches!(err, ChatError::Provider(_)));

    // The question stays on record; no answer was appended.
    let turns = h.turns.all_turns(id).await.unwrap();
    assert_eq!(turns.len(), before + 1);
    let last = turns.last().unwrap();
    assert_eq!(last.role, TurnRole::User);
    assert_eq!(last.content, "does this work?");
}

#[tokio::test]
async fn empty_reply_is_recorded_as_placeholder() {
    let provider = ScriptedClient::new();
    provider.push_reply("Title");
    provider.push_empty(); // reply call returns nothing
    let h = harness(provider, ChatConfig::default());

    let reply = h.service.send_message("Hello", None).await.unwrap();

    assert_eq!(reply.text, EMPTY_REPLY_PLACEHOLDER);
    let turns = h.turns.all_turns(reply.conversation_id).await.unwrap();
    assert_eq!(turns.last().unwrap().content, EMPTY_REPLY_PLACEHOLDER);
}

#[tokio::test]
async fn provider_sees_bounded_context() {
    let provider = ScriptedClient::always("ok");
    let h = harness(provider.clone(), ChatConfig::default());

    let reply = h.service.send_message("start", None).await.unwrap();
    let id = reply.conversation_id;
    h.turns.seed(id, 100);

    h.service.send_message("latest", Some(id)).await.unwrap();

    let last_request = h.provider.requests().last().cloned().unwrap();
    assert!(last_request.messages.len() <= 11); // W + optional preface
    assert_eq!(last_request.messages.last().unwrap().text(), Some("latest"));
}

#[tokio::test]
async fn summary_refresh_fires_on_cadence_and_overwrites() {
    // W = S = 20 so the assembled length can actually reach the cadence:
    // 18 seeded turns, the next exchange brings the stored total to 20, and
    // the exchange after that assembles exactly 20 messages.
    let config = ChatConfig {
        window_size: 20,
        summary_interval: 20,
        ..ChatConfig::default()
    };
    let provider = ScriptedClient::always("a concise digest");
    let h = harness(provider.clone(), config);

    let conversation = h.conversations.create("Long chat").await.unwrap();
    let id = conversation.id;
    h.turns.seed(id, 18);

    // 10th exchange: 19 assembled, below the cadence
    h.service.send_message("tenth", Some(id)).await.unwrap();
    assert_eq!(h.turns.count_for(id), 20);
    assert_eq!(h.conversations.summary_of(id), None);

    // 11th exchange: 20 assembled, trigger fires
    h.service.send_message("eleventh", Some(id)).await.unwrap();

    let summary = wait_for_summary(&h.conversations, id)
        .await
        .expect("summary refresh should have fired");
    assert_eq!(summary, "a concise digest");

    // The refresh call carries the digest instruction plus the assembled set
    let refresh_request = h
        .provider
        .requests()
        .into_iter()
        .find(|r| r.messages.first().and_then(|m| m.text()) == Some(GENERATE_CONVERSATION_SUMMARY))
        .expect("summarization request was sent");
    assert_eq!(refresh_request.messages.len(), 21);

    // Next assembly carries the summary preface
    h.service.send_message("twelfth", Some(id)).await.unwrap();
    let last_request = h.provider.requests().last().cloned().unwrap();
    let first = &last_request.messages[0];
    assert_eq!(first.role(), "system");
    assert!(first
        .text()
        .unwrap()
        .starts_with(CONVERSATION_SUMMARY_PREFIX));
}

#[tokio::test]
async fn summary_refresh_failure_never_fails_the_reply() {
    let config = ChatConfig {
        window_size: 20,
        summary_interval: 20,
        ..ChatConfig::default()
    };
    let provider = ScriptedClient::new();
    provider.push_reply("the reply"); // primary completion
    provider.push_failure("summarizer down"); // refresh call
    let h = harness(provider, config);

    let conversation = h.conversations.create("Long chat").await.unwrap();
    let id = conversation.id;
    h.turns.seed(id, 19);

    let reply = h.service.send_message("twentieth", Some(id)).await.unwrap();

    assert_eq!(reply.text, "the reply");
    // Give the spawned refresh a chance to run and fail
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
    assert_eq!(h.conversations.summary_of(id), None);
    // The failed refresh did not block the assistant turn either
    let turns = h.turns.all_turns(id).await.unwrap();
    assert_eq!(turns.last().unwrap().role, TurnRole::Assistant);
}

#[tokio::test]
async fn recent_turns_are_chronological_and_limited() {
    let h = harness(ScriptedClient::always("ok"), ChatConfig::default());

    let conversation = h.conversations.create("History").await.unwrap();
    h.turns.seed(conversation.id, 30);

    let turns = h.service.recent_turns(conversation.id, 20).await.unwrap();

    assert_eq!(turns.len(), 20);
    assert_eq!(turns.first().unwrap().content, "turn 10");
    assert_eq!(turns.last().unwrap().content, "turn 29");
}

#[tokio::test]
async fn recent_turns_of_unknown_conversation_is_not_found() {
    let h = harness(ScriptedClient::always("ok"), ChatConfig::default());

    let err = h
        .service
        .recent_turns(ObjectId::new(), 20)
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::NotFound(_)));
}

#[tokio::test]
async fn delete_cascades_to_turns() {
    let h = harness(ScriptedClient::always("ok"), ChatConfig::default());

    let reply = h.service.send_message("hello", None).await.unwrap();
    let keep = h.service.send_message("other", None).await.unwrap();
    let id = reply.conversation_id;
    assert!(h.turns.count_for(id) > 0);

    h.service.delete_conversation(id).await.unwrap();

    assert_eq!(h.turns.count_for(id), 0);
    assert!(h.conversations.get(id).await.unwrap().is_none());
    // Unrelated conversation untouched
    assert!(h.turns.count_for(keep.conversation_id) > 0);
}

#[tokio::test]
async fn delete_of_unknown_conversation_is_not_found() {
    let h = harness(ScriptedClient::always("ok"), ChatConfig::default());

    let err = h
        .service
        .delete_conversation(ObjectId::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ChatError::NotFound(_)));
}

#[tokio::test]
async fn list_conversations_orders_by_most_recent_activity() {
    let h = harness(ScriptedClient::always("ok"), ChatConfig::default());

    let first = h.service.send_message("one", None).await.unwrap();
    let second = h.service.send_message("two", None).await.unwrap();

    let listed = h.service.list_conversations().await.unwrap();
    assert_eq!(listed[0].id, second.conversation_id);
    assert_eq!(listed[1].id, first.conversation_id);

    // Activity on the older conversation moves it to the front
    h.service
        .send_message("again", Some(first.conversation_id))
        .await
        .unwrap();
    let listed = h.service.list_conversations().await.unwrap();
    assert_eq!(listed[0].id, first.conversation_id);
}
