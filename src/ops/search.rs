use std::borrow::Cow;

use crate::model::task::Task;

/// Match strength, strongest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Exact,
    Prefix,
    Suffix,
    Fuzzy,
}

/// Which field of a task matched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchField {
    Id,
    Title,
    Project,
    Ticket,
    Note,
    Tag,
    Priority,
    Status,
}

impl MatchField {
    pub fn label(self) -> &'static str {
        match self {
            MatchField::Id => "id",
            MatchField::Title => "title",
            MatchField::Project => "project",
            MatchField::Ticket => "ticket",
            MatchField::Note => "note",
            MatchField::Tag => "tag",
            MatchField::Priority => "priority",
            MatchField::Status => "status",
        }
    }
}

/// The best match found in one task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchHit {
    pub tier: Tier,
    /// First field (in search order) that reached `tier`
    pub field: MatchField,
}

/// A position in the input slice together with how it matched.
/// `hit` is `None` only for an empty query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranked {
    pub index: usize,
    pub hit: Option<SearchHit>,
}

/// Normalize a raw query: trimmed and lower-cased
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Fields searched for a task, in evaluation order. Empty fields are skipped.
pub fn searchable_fields(task: &Task) -> Vec<(MatchField, Cow<'_, str>)> {
    let mut fields: Vec<(MatchField, Cow<'_, str>)> = vec![
        (MatchField::Id, Cow::Owned(task.id.to_string())),
        (MatchField::Title, Cow::Borrowed(task.title.as_str())),
        (MatchField::Project, Cow::Borrowed(task.project.as_str())),
        (MatchField::Ticket, Cow::Borrowed(task.ticket.as_str())),
        (MatchField::Note, Cow::Borrowed(task.note.as_str())),
    ];
    for tag in &task.tags {
        fields.push((MatchField::Tag, Cow::Borrowed(tag.as_str())));
    }
    for word in task.priority.search_words() {
        fields.push((MatchField::Priority, Cow::Borrowed(*word)));
    }
    fields.push((MatchField::Status, Cow::Borrowed(task.status.as_str())));
    fields.retain(|(_, value)| !value.is_empty());
    fields
}

fn tier_of(field: &str, query: &str) -> Option<Tier> {
    let field = field.to_lowercase();
    if field == query {
        Some(Tier::Exact)
    } else if field.starts_with(query) {
        Some(Tier::Prefix)
    } else if field.ends_with(query) {
        Some(Tier::Suffix)
    } else if field.contains(query) {
        Some(Tier::Fuzzy)
    } else {
        None
    }
}

/// Classify a task against an already normalized, non-empty query
pub fn classify(task: &Task, query: &str) -> Option<SearchHit> {
    let mut best: Option<SearchHit> = None;
    for (field, value) in searchable_fields(task) {
        let Some(tier) = tier_of(&value, query) else {
            continue;
        };
        if best.is_none_or(|b| tier < b.tier) {
            best = Some(SearchHit { tier, field });
            if tier == Tier::Exact {
                break;
            }
        }
    }
    best
}

/// Rank tasks by match tier, stable within a tier. An empty query keeps
/// every task in its original order.
pub fn rank(tasks: &[Task], query: &str) -> Vec<Ranked> {
    let query = normalize_query(query);
    if query.is_empty() {
        return (0..tasks.len())
            .map(|index| Ranked { index, hit: None })
            .collect();
    }

    let mut ranked: Vec<Ranked> = tasks
        .iter()
        .enumerate()
        .filter_map(|(index, task)| {
            classify(task, &query).map(|hit| Ranked {
                index,
                hit: Some(hit),
            })
        })
        .collect();
    // sort_by_key is stable, so original order survives within a tier
    ranked.sort_by_key(|r| r.hit.map(|h| h.tier));
    ranked
}

/// Ranked search returning owned tasks
pub fn search(tasks: &[Task], query: &str) -> Vec<Task> {
    rank(tasks, query)
        .into_iter()
        .map(|r| tasks[r.index].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Priority, TaskStatus};
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn task(id: u64, title: &str) -> Task {
        Task::new(id, title, Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap())
    }

    fn sample() -> Vec<Task> {
        let mut a = task(1, "Update API docs");
        a.ticket = "DOC-7".into();
        let mut b = task(2, "Fix pagination");
        b.ticket = "api-100".into();
        let mut c = task(3, "Investigate crash");
        c.ticket = "API-1".into();
        c.priority = Priority::High;
        let mut d = task(4, "Plan sprint");
        d.tags = vec!["planning".into()];
        d.status = TaskStatus::Done;
        let mut e = task(5, "Rapid prototype");
        e.project = "mobile-api".into();
        vec![a, b, c, d, e]
    }

    fn ids(tasks: &[Task]) -> Vec<u64> {
        tasks.iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_empty_query_is_identity() {
        let tasks = sample();
        assert_eq!(ids(&search(&tasks, "")), vec![1, 2, 3, 4, 5]);
        assert_eq!(ids(&search(&tasks, "   ")), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_exact_ticket_ranks_before_substring() {
        let tasks = sample();
        let result = ids(&search(&tasks, "API-1"));
        assert_eq!(result[0], 3);
        let pos_100 = result.iter().position(|&id| id == 2).unwrap();
        assert!(pos_100 > 0);
    }

    #[test]
    fn test_stable_within_tier() {
        let tasks = sample();
        // "api" is a prefix of task 2's ticket and task 3's ticket
        let ranked = rank(&tasks, "api");
        let prefix: Vec<usize> = ranked
            .iter()
            .filter(|r| r.hit.map(|h| h.tier) == Some(Tier::Prefix))
            .map(|r| r.index)
            .collect();
        assert_eq!(prefix, vec![1, 2]);
    }

    #[test]
    fn test_priority_and_status_words() {
        let tasks = sample();
        assert_eq!(ids(&search(&tasks, "high")), vec![3]);
        let done = rank(&tasks, "DONE");
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].hit.unwrap().field, MatchField::Status);
    }

    #[test]
    fn test_id_field_matches_exactly() {
        let tasks = sample();
        let ranked = rank(&tasks, "4");
        assert_eq!(ranked[0].index, 3);
        assert_eq!(ranked[0].hit.unwrap().tier, Tier::Exact);
        assert_eq!(ranked[0].hit.unwrap().field, MatchField::Id);
    }

    #[test]
    fn test_each_task_appears_once() {
        let mut tasks = sample();
        tasks[0].tags = vec!["api".into(), "api-docs".into()];
        let result = ids(&search(&tasks, "api"));
        assert_eq!(result.iter().filter(|&&id| id == 1).count(), 1);
    }

    #[test]
    fn test_best_tier_wins_over_first_field() {
        let mut t = task(9, "backend cleanup");
        t.tags = vec!["backend".into()];
        let hit = classify(&t, "backend").unwrap();
        assert_eq!(hit.tier, Tier::Exact);
        assert_eq!(hit.field, MatchField::Tag);
    }

    fn arb_task() -> impl Strategy<Value = (String, String, Vec<String>, String, u8, u8)> {
        (
            "[a-z ]{0,12}",
            "[a-z]{0,5}",
            prop::collection::vec("[a-z]{1,5}", 0..3),
            prop_oneof![Just(String::new()), "[A-Z]{2,3}-[0-9]{1,3}"],
            0u8..4,
            0u8..3,
        )
    }

    fn arb_tasks() -> impl Strategy<Value = Vec<Task>> {
        prop::collection::vec(arb_task(), 0..25).prop_map(|fields| {
            fields
                .into_iter()
                .enumerate()
                .map(|(i, (title, project, tags, ticket, priority, status))| {
                    let mut t = task(i as u64 + 1, &title);
                    t.project = project;
                    t.tags = tags;
                    t.ticket = ticket;
                    t.priority = [Priority::None, Priority::Low, Priority::Medium, Priority::High]
                        [usize::from(priority)];
                    t.status = [TaskStatus::Todo, TaskStatus::Done, TaskStatus::Archived]
                        [usize::from(status)];
                    t
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_blank_query_keeps_order(tasks in arb_tasks(), blanks in " {0,3}") {
            prop_assert_eq!(ids(&search(&tasks, &blanks)), ids(&tasks));
        }

        #[test]
        fn prop_tiers_never_decrease(tasks in arb_tasks(), query in "[a-z0-9-]{1,4}") {
            let ranked = rank(&tasks, &query);
            for pair in ranked.windows(2) {
                let (a, b) = (pair[0].hit.unwrap(), pair[1].hit.unwrap());
                prop_assert!(a.tier <= b.tier);
                if a.tier == b.tier {
                    prop_assert!(pair[0].index < pair[1].index);
                }
            }
        }

        #[test]
        fn prop_every_match_listed_once(tasks in arb_tasks(), query in "[a-z0-9]{1,3}") {
            let normalized = normalize_query(&query);
            let mut listed: Vec<usize> = rank(&tasks, &query).iter().map(|r| r.index).collect();
            listed.sort_unstable();
            let expected: Vec<usize> = tasks
                .iter()
                .enumerate()
                .filter(|(_, t)| classify(t, &normalized).is_some())
                .map(|(i, _)| i)
                .collect();
            prop_assert_eq!(listed, expected);
        }

        #[test]
        fn prop_dropping_last_char_broadens(tasks in arb_tasks(), query in "[a-z0-9 ]{1,5}") {
            let longer = ids(&search(&tasks, &query));
            let shorter = ids(&search(&tasks, &query[..query.len() - 1]));
            prop_assert!(longer.iter().all(|id| shorter.contains(id)));
        }
    }
}
