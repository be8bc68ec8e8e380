// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Mull App Developers

//! Prompt resolution
//!
//! Maps each chat intention to its system instruction and renders the
//! journal-entry context block that opens a conversation. The context block
//! has a fixed section order so transcripts stay comparable across sessions.

use std::sync::Arc;

use crate::journal::{Entry, NameResolver};
use crate::session::ChatIntention;

const REFLECT_PROMPT: &str = "You are a thoughtful journaling companion. The user has written \
a journal entry and wants to reflect on it. Mirror back what you notice, ask one gentle \
open-ended question at a time, and let the user lead. Stay warm and curious, never clinical. \
Keep responses short and conversational.";

const HELP_SEE_DIFFERENTLY_PROMPT: &str = "You are a thoughtful journaling companion. The user \
has written a journal entry and wants help seeing the situation differently. Offer alternative \
perspectives and reframings with kindness, acknowledging how they currently see it before \
suggesting another angle. Never dismiss their feelings. Keep responses short and conversational.";

const PROACTIVE_PROMPT: &str = "You are a thoughtful journaling companion. The user has written \
a journal entry and wants to move forward. Help them identify small, concrete, realistic steps \
they could take, grounded in what they actually wrote. Suggest at most one or two things at a \
time and check how they land. Keep responses short and conversational.";

const THINKING_TRAPS_PROMPT: &str = "You are a thoughtful journaling companion. The user has \
written a journal entry and wants help noticing thinking traps. Look for patterns like \
all-or-nothing thinking, catastrophizing, mind reading, and overgeneralization in what they \
wrote. Name what you notice tentatively and ask whether it rings true, rather than diagnosing. \
Keep responses short and conversational.";

const DEFAULT_CUSTOM_PROMPT: &str = "You are a supportive journaling companion. The user has \
written a journal entry and will tell you what they want from this conversation. Respond with \
warmth and honesty, staying grounded in what they wrote. Keep responses short and \
conversational.";

/// Fallback shown in the context block when an entry has no title
const UNTITLED_FALLBACK: &str = "Untitled entry";

/// Resolve the system instruction for an intention
///
/// Custom sessions use the caller-supplied prompt when one is present and
/// non-empty, otherwise the generic companion instruction.
pub fn system_prompt(intention: ChatIntention, custom_prompt: Option<&str>) -> String {
    match intention {
        ChatIntention::Reflect => REFLECT_PROMPT.to_string(),
        ChatIntention::HelpSeeDifferently => HELP_SEE_DIFFERENTLY_PROMPT.to_string(),
        ChatIntention::Proactive => PROACTIVE_PROMPT.to_string(),
        ChatIntention::ThinkingTraps => THINKING_TRAPS_PROMPT.to_string(),
        ChatIntention::Custom => match custom_prompt {
            Some(p) if !p.is_empty() => p.to_string(),
            _ => DEFAULT_CUSTOM_PROMPT.to_string(),
        },
    }
}

/// Renders entry context for the first message of a session
///
/// Holds the emotion and tag name resolvers so the controller can be handed
/// one collaborator instead of two.
pub struct PromptResolver {
    emotions: Arc<dyn NameResolver>,
    tags: Arc<dyn NameResolver>,
}

impl PromptResolver {
    /// Create a resolver over the host application's emotion and tag lookups
    pub fn new(emotions: Arc<dyn NameResolver>, tags: Arc<dyn NameResolver>) -> Self {
        Self { emotions, tags }
    }

    /// Build the deterministic context block for an entry
    ///
    /// Section order is fixed: title, emotions, people tags, context tags,
    /// content. Ids that no longer resolve are skipped silently; a section
    /// whose ids all fail to resolve renders as "None".
    pub fn entry_context(&self, entry: &Entry) -> String {
        let title = match entry.title.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => UNTITLED_FALLBACK,
        };

        let emotions = resolve_names(&entry.emotion_ids, self.emotions.as_ref());
        let people = resolve_names(&entry.people_tag_ids, self.tags.as_ref());
        let contexts = resolve_names(&entry.context_tag_ids, self.tags.as_ref());

        format!(
            "Journal Entry Context:\n\
             Title: {title}\n\
             Emotions: {emotions}\n\
             People Tags: {people}\n\
             Context Tags: {contexts}\n\
             Content:\n{content}",
            content = entry.content,
        )
    }
}

/// Resolve a list of ids to a comma-joined name list, or "None"
fn resolve_names(ids: &[String], resolver: &dyn NameResolver) -> String {
    let names: Vec<String> = ids.iter().filter_map(|id| resolver.name_of(id)).collect();
    if names.is_empty() {
        "None".to_string()
    } else {
        names.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapResolver(HashMap<String, String>);

    impl MapResolver {
        fn new(pairs: &[(&str, &str)]) -> Arc<Self> {
            Arc::new(Self(
                pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ))
        }
    }

    impl NameResolver for MapResolver {
        fn name_of(&self, id: &str) -> Option<String> {
            self.0.get(id).cloned()
        }
    }

    fn entry() -> Entry {
        Entry {
            id: "e1".to_string(),
            title: Some("Rough Monday".to_string()),
            content: "Everything went sideways before lunch.".to_string(),
            emotion_ids: vec!["em-1".to_string(), "em-2".to_string()],
            people_tag_ids: vec!["p-1".to_string()],
            context_tag_ids: vec!["c-1".to_string()],
            chat_sessions: None,
        }
    }

    fn resolver() -> PromptResolver {
        PromptResolver::new(
            MapResolver::new(&[("em-1", "Frustrated"), ("em-2", "Tired")]),
            MapResolver::new(&[("p-1", "Sam"), ("c-1", "Work")]),
        )
    }

    // ===== System prompts =====

    #[test]
    fn test_each_intention_gets_a_distinct_prompt() {
        let prompts: Vec<String> = [
            ChatIntention::Reflect,
            ChatIntention::HelpSeeDifferently,
            ChatIntention::Proactive,
            ChatIntention::ThinkingTraps,
        ]
        .into_iter()
        .map(|i| system_prompt(i, None))
        .collect();

        for (i, a) in prompts.iter().enumerate() {
            assert!(!a.is_empty());
            for b in &prompts[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_custom_prompt_used_when_present() {
        let prompt = system_prompt(ChatIntention::Custom, Some("Be a pirate"));
        assert_eq!(prompt, "Be a pirate");
    }

    #[test]
    fn test_custom_falls_back_to_default_when_empty_or_missing() {
        assert_eq!(system_prompt(ChatIntention::Custom, Some("")), DEFAULT_CUSTOM_PROMPT);
        assert_eq!(system_prompt(ChatIntention::Custom, None), DEFAULT_CUSTOM_PROMPT);
    }

    #[test]
    fn test_non_custom_intentions_ignore_supplied_prompt() {
        let prompt = system_prompt(ChatIntention::Reflect, Some("ignored"));
        assert_eq!(prompt, REFLECT_PROMPT);
    }

    // ===== Context block =====

    #[test]
    fn test_context_block_sections_in_order() {
        let ctx = resolver().entry_context(&entry());

        let positions: Vec<usize> = [
            "Journal Entry Context:",
            "Title: Rough Monday",
            "Emotions: Frustrated, Tired",
            "People Tags: Sam",
            "Context Tags: Work",
            "Content:\nEverything went sideways before lunch.",
        ]
        .iter()
        .map(|s| ctx.find(s).unwrap_or_else(|| panic!("missing section {s:?}")))
        .collect();

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_missing_title_uses_fallback() {
        let mut e = entry();
        e.title = None;
        assert!(resolver().entry_context(&e).contains("Title: Untitled entry"));

        e.title = Some(String::new());
        assert!(resolver().entry_context(&e).contains("Title: Untitled entry"));
    }

    #[test]
    fn test_empty_id_lists_render_none() {
        let mut e = entry();
        e.emotion_ids.clear();
        e.people_tag_ids.clear();
        e.context_tag_ids.clear();

        let ctx = resolver().entry_context(&e);
        assert!(ctx.contains("Emotions: None"));
        assert!(ctx.contains("People Tags: None"));
        assert!(ctx.contains("Context Tags: None"));
    }

    #[test]
    fn test_unresolved_ids_skipped_silently() {
        let mut e = entry();
        e.emotion_ids.push("em-deleted".to_string());

        let ctx = resolver().entry_context(&e);
        assert!(ctx.contains("Emotions: Frustrated, Tired"));
        assert!(!ctx.contains("em-deleted"));
    }

    #[test]
    fn test_all_ids_unresolvable_renders_none() {
        let mut e = entry();
        e.emotion_ids = vec!["gone-1".to_string(), "gone-2".to_string()];

        let ctx = resolver().entry_context(&e);
        assert!(ctx.contains("Emotions: None"));
    }

    #[test]
    fn test_empty_content_keeps_section_header() {
        let mut e = entry();
        e.content = String::new();

        let ctx = resolver().entry_context(&e);
        assert!(ctx.ends_with("Content:\n"));
    }
}
