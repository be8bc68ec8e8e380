// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Mull App Developers

use mull::journal::Entry;
use mull::session::{is_valid_intention, ChatIntention, ChatMessage, ChatSession, Role};

#[test]
fn test_every_known_intention_validates() {
    for name in [
        "reflect",
        "help-see-differently",
        "proactive",
        "thinking-traps",
        "custom",
    ] {
        assert!(is_valid_intention(name));
    }
}

#[test]
fn test_near_misses_do_not_validate() {
    for name in ["Reflect", "reflect ", " custom", "thinking traps", "", "REFLECT"] {
        assert!(!is_valid_intention(name), "{name:?} validated unexpectedly");
    }
}

#[test]
fn test_custom_prompt_invariant() {
    let with_prompt = ChatSession::new("e", ChatIntention::Custom, Some("my prompt"));
    assert_eq!(with_prompt.custom_prompt.as_deref(), Some("my prompt"));

    let without_prompt = ChatSession::new("e", ChatIntention::Custom, None);
    assert!(without_prompt.custom_prompt.is_none());

    let wrong_intention = ChatSession::new("e", ChatIntention::Reflect, Some("ignored"));
    assert!(wrong_intention.custom_prompt.is_none());
}

#[test]
fn test_message_constructors_stamp_roles() {
    assert_eq!(ChatMessage::user("a").role, Role::User);
    assert_eq!(ChatMessage::assistant("b").role, Role::Assistant);
}

#[test]
fn test_session_ids_are_unique() {
    let ids: Vec<String> = (0..50)
        .map(|_| ChatSession::new("e", ChatIntention::Reflect, None).id)
        .collect();
    let mut deduped = ids.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), ids.len());
}

#[test]
fn test_persisted_session_round_trips_inside_an_entry() {
    let mut session = ChatSession::new("entry-7", ChatIntention::ThinkingTraps, None);
    session.messages.push(ChatMessage::user("Hello"));
    session.messages.push(ChatMessage::assistant("Hi"));

    let entry = Entry {
        id: "entry-7".to_string(),
        title: None,
        content: "body".to_string(),
        emotion_ids: vec![],
        people_tag_ids: vec![],
        context_tag_ids: vec![],
        chat_sessions: Some(vec![session.clone()]),
    };

    let json = serde_json::to_string(&entry).unwrap();
    assert!(json.contains("\"intention\":\"thinking-traps\""));
    assert!(json.contains("\"journalEntryId\":\"entry-7\""));

    let back: Entry = serde_json::from_str(&json).unwrap();
    let stored = &back.sessions()[0];
    assert_eq!(stored.id, session.id);
    assert_eq!(stored.messages, session.messages);
    assert_eq!(stored.intention, ChatIntention::ThinkingTraps);
}
