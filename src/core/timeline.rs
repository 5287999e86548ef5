//! Timeline ordering and the two transition signals: which individuals
//! may have become part of a collective.

use rustc_hash::FxHashMap;

use crate::core::normalize::canonicalize;
use crate::core::patterns::NAME_TOKEN;
use crate::schema::entity::EntityKind;
use crate::schema::event::{TimelineEvent, Transition, Transitions};
use crate::schema::mention::NamedMention;

/// Stable sort by position; events at the same offset keep the order in
/// which they were recorded.
pub fn sort_timeline(events: &mut [TimelineEvent]) {
    events.sort_by_key(|e| e.position);
}

/// Positional signal: for each collective event, every character whose
/// last mention anywhere in the text comes strictly before it, in order of
/// first appearance. A character still acting alone after the group shows
/// up is not a candidate.
///
/// `events` must already be sorted.
pub fn positional_transitions(events: &[TimelineEvent]) -> Vec<Transition> {
    let mut last_seen: Vec<(&str, usize)> = Vec::new();
    let mut slots: FxHashMap<&str, usize> = FxHashMap::default();
    for event in events.iter().filter(|e| e.kind == EntityKind::Character) {
        let name = event.canonical_name.as_str();
        match slots.get(name).copied() {
            Some(slot) => last_seen[slot].1 = event.position,
            None => {
                slots.insert(name, last_seen.len());
                last_seen.push((name, event.position));
            }
        }
    }

    events
        .iter()
        .filter(|e| e.kind == EntityKind::Collective)
        .filter_map(|event| {
            let members: Vec<String> = last_seen
                .iter()
                .filter(|(_, last)| *last < event.position)
                .map(|(name, _)| name.to_string())
                .collect();
            if members.is_empty() {
                return None;
            }
            Some(Transition {
                collective_name: event.canonical_name.clone(),
                member_candidate_names: members,
                position: event.position,
                section_index: event.section_index,
                context: None,
            })
        })
        .collect()
}

/// Textual signal: known characters named inside a collective mention's
/// own surface text ("Tom and Jerry").
pub fn textual_transitions(
    collective_mentions: &[NamedMention],
    is_character: impl Fn(&str) -> bool,
) -> Vec<Transition> {
    collective_mentions
        .iter()
        .filter_map(|named| {
            let mut members: Vec<String> = Vec::new();
            for token in NAME_TOKEN.find_iter(&named.mention.surface_text) {
                let name = canonicalize(token.as_str());
                if is_character(&name) && !members.contains(&name) {
                    members.push(name);
                }
            }
            if members.is_empty() {
                return None;
            }
            Some(Transition {
                collective_name: named.name.clone(),
                member_candidate_names: members,
                position: named.mention.position,
                section_index: named.mention.section_index,
                context: Some(named.mention.surface_text.clone()),
            })
        })
        .collect()
}

/// Both signals, side by side.
pub fn analyze(
    events: &[TimelineEvent],
    collective_mentions: &[NamedMention],
    is_character: impl Fn(&str) -> bool,
) -> Transitions {
    Transitions {
        positional: positional_transitions(events),
        textual: textual_transitions(collective_mentions, is_character),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::mention::{DetectionMethod, Mention};

    fn event(kind: EntityKind, name: &str, position: usize) -> TimelineEvent {
        TimelineEvent {
            kind,
            canonical_name: name.to_string(),
            position,
            section_index: 0,
            detection_method: DetectionMethod::ProperName,
        }
    }

    #[test]
    fn sort_is_stable() {
        let mut events = vec![
            event(EntityKind::Character, "Tom", 10),
            event(EntityKind::Collective, "Pack", 4),
            event(EntityKind::Character, "Jerry", 10),
        ];
        sort_timeline(&mut events);
        let names: Vec<&str> = events.iter().map(|e| e.canonical_name.as_str()).collect();
        assert_eq!(names, vec!["Pack", "Tom", "Jerry"]);
    }

    #[test]
    fn positional_needs_last_mention_before_the_group() {
        let events = vec![
            event(EntityKind::Character, "Tom", 0),
            event(EntityKind::Character, "Jerry", 20),
            event(EntityKind::Collective, "Pack", 20),
            event(EntityKind::Character, "Spike", 30),
            event(EntityKind::Collective, "They", 40),
        ];
        let transitions = positional_transitions(&events);
        assert_eq!(transitions.len(), 2);
        assert_eq!(transitions[0].collective_name, "Pack");
        assert_eq!(transitions[0].member_candidate_names, vec!["Tom"]);
        assert_eq!(
            transitions[1].member_candidate_names,
            vec!["Tom", "Jerry", "Spike"]
        );
    }

    #[test]
    fn character_seen_after_the_group_is_not_a_member() {
        let events = vec![
            event(EntityKind::Character, "Tom", 0),
            event(EntityKind::Character, "Jerry", 5),
            event(EntityKind::Collective, "Pack", 14),
            event(EntityKind::Character, "Tom", 29),
        ];
        let transitions = positional_transitions(&events);
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].member_candidate_names, vec!["Jerry"]);
    }

    #[test]
    fn positional_skips_collectives_before_any_character() {
        let events = vec![
            event(EntityKind::Collective, "Pack", 0),
            event(EntityKind::Character, "Tom", 5),
        ];
        assert!(positional_transitions(&events).is_empty());
    }

    #[test]
    fn textual_matches_known_characters_only() {
        let mention = NamedMention {
            name: "Tom and jerry".to_string(),
            mention: Mention {
                surface_text: "Tom and Jerry".to_string(),
                position: 3,
                section_index: 0,
                detection_method: DetectionMethod::ActingTogether,
                confidence: 1.0,
            },
        };
        let transitions = textual_transitions(&[mention], |name| name == "Tom");
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].member_candidate_names, vec!["Tom"]);
        assert_eq!(transitions[0].context.as_deref(), Some("Tom and Jerry"));
    }
}
