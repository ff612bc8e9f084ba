//! Display ordering for task collections.
//!
//! Tasks are presented in a deterministic multi-key order: priority rank,
//! then deadline (earliest first, tasks without one last), then normalized
//! time estimate (shortest first, tasks without one last), then title
//! case-insensitively. Ties beyond all four keys keep their incoming order;
//! the sort is stable.

use crate::models::Task;
use std::cmp::Ordering;
use std::collections::HashMap;
use uuid::Uuid;

/// Total order over tasks for display.
pub fn compare(a: &Task, b: &Task) -> Ordering {
    a.priority
        .rank()
        .cmp(&b.priority.rank())
        .then_with(|| compare_deadlines(a.deadline.as_ref(), b.deadline.as_ref()))
        .then_with(|| normalized_minutes(a).cmp(&normalized_minutes(b)))
        .then_with(|| a.title.to_lowercase().cmp(&b.title.to_lowercase()))
}

fn compare_deadlines<T: Ord>(a: Option<&T>, b: Option<&T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// An absent estimate compares as infinitely large.
fn normalized_minutes(task: &Task) -> i64 {
    task.estimate().map_or(i64::MAX, |e| e.minutes())
}

/// Sorts a task collection in place. Stable, so insertion order is the final
/// tiebreak.
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(compare);
}

pub fn sorted(mut tasks: Vec<Task>) -> Vec<Task> {
    sort_tasks(&mut tasks);
    tasks
}

/// Groups an already-sorted sequence by category, preserving the established
/// order within each group. Groups appear in order of first appearance.
pub fn group_by_category(tasks: &[Task]) -> Vec<(Uuid, Vec<Task>)> {
    let mut order: Vec<Uuid> = Vec::new();
    let mut groups: HashMap<Uuid, Vec<Task>> = HashMap::new();

    for task in tasks {
        if !groups.contains_key(&task.category_id) {
            order.push(task.category_id);
        }
        groups
            .entry(task.category_id)
            .or_default()
            .push(task.clone());
    }

    order
        .into_iter()
        .map(|id| {
            let group = groups.remove(&id).unwrap_or_default();
            (id, group)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EstimateUnit, TaskPriority};
    use chrono::{Duration, TimeZone, Utc};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn task(title: &str) -> Task {
        Task {
            title: title.to_string(),
            ..Default::default()
        }
    }

    fn with_priority(title: &str, priority: TaskPriority) -> Task {
        Task {
            priority,
            ..task(title)
        }
    }

    fn with_estimate(title: &str, value: i64, unit: EstimateUnit) -> Task {
        Task {
            estimate_value: Some(value),
            estimate_unit: Some(unit),
            ..task(title)
        }
    }

    #[test]
    fn sorts_by_priority_high_to_none() {
        let tasks = vec![
            with_priority("A", TaskPriority::None),
            with_priority("B", TaskPriority::Low),
            with_priority("C", TaskPriority::High),
            with_priority("D", TaskPriority::Medium),
        ];

        let sorted = sorted(tasks);
        let priorities: Vec<TaskPriority> = sorted.iter().map(|t| t.priority).collect();
        assert_eq!(
            priorities,
            vec![
                TaskPriority::High,
                TaskPriority::Medium,
                TaskPriority::Low,
                TaskPriority::None
            ]
        );
    }

    #[test]
    fn sorts_by_deadline_within_same_priority() {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let tasks = vec![
            with_priority("A", TaskPriority::High),
            Task {
                deadline: Some(base + Duration::days(14)),
                ..with_priority("B", TaskPriority::High)
            },
            Task {
                deadline: Some(base + Duration::days(9)),
                ..with_priority("C", TaskPriority::High)
            },
        ];

        let sorted = sorted(tasks);
        let titles: Vec<&str> = sorted.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "B", "A"]);
    }

    #[test]
    fn deadline_compares_by_instant_not_date() {
        let morning = Utc.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap();
        let evening = Utc.with_ymd_and_hms(2024, 1, 15, 20, 0, 0).unwrap();
        let tasks = vec![
            Task {
                deadline: Some(evening),
                ..task("A")
            },
            Task {
                deadline: Some(morning),
                ..task("B")
            },
        ];

        let sorted = sorted(tasks);
        assert_eq!(sorted[0].title, "B");
    }

    #[test]
    fn normalizes_estimates_to_minutes() {
        // 90 min < 3 hours (180 min) < 2 days (2880 min)
        let tasks = vec![
            with_estimate("A", 2, EstimateUnit::Days),
            with_estimate("B", 3, EstimateUnit::Hours),
            with_estimate("C", 90, EstimateUnit::Minutes),
        ];

        let sorted = sorted(tasks);
        let titles: Vec<&str> = sorted.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["C", "B", "A"]);
    }

    #[test]
    fn missing_estimate_sorts_last() {
        let tasks = vec![
            task("A"),
            with_estimate("B", 5, EstimateUnit::Days),
        ];

        let sorted = sorted(tasks);
        assert_eq!(sorted[0].title, "B");
    }

    #[test]
    fn title_tiebreak_is_case_insensitive() {
        let tasks = vec![task("Zebra"), task("apple"), task("Banana")];

        let sorted = sorted(tasks);
        let titles: Vec<&str> = sorted.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["apple", "Banana", "Zebra"]);
    }

    #[test]
    fn stable_on_full_ties() {
        let first = task("same");
        let second = task("same");
        let (first_id, second_id) = (first.id, second.id);

        let sorted = sorted(vec![first, second]);
        assert_eq!(sorted[0].id, first_id);
        assert_eq!(sorted[1].id, second_id);
    }

    #[test]
    fn groups_preserve_sorted_order_within_category() {
        let cat_a = Uuid::now_v7();
        let cat_b = Uuid::now_v7();
        let tasks = sorted(vec![
            Task {
                category_id: cat_a,
                ..with_priority("low in a", TaskPriority::Low)
            },
            Task {
                category_id: cat_b,
                ..with_priority("high in b", TaskPriority::High)
            },
            Task {
                category_id: cat_a,
                ..with_priority("high in a", TaskPriority::High)
            },
        ]);

        let groups = group_by_category(&tasks);
        assert_eq!(groups.len(), 2);
        // cat_b's high-priority task comes first overall, so it opens the list
        assert_eq!(groups[0].0, cat_b);
        assert_eq!(groups[1].0, cat_a);
        let titles: Vec<&str> = groups[1].1.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["high in a", "low in a"]);
    }

    fn arb_task() -> impl Strategy<Value = Task> {
        (
            "[a-zA-Z]{0,8}",
            0u8..4,
            proptest::option::of(0i64..100_000),
            proptest::option::of((1i64..500, 0u8..3)),
        )
            .prop_map(|(title, priority, deadline_offset, estimate)| {
                let priority = match priority {
                    0 => TaskPriority::High,
                    1 => TaskPriority::Medium,
                    2 => TaskPriority::Low,
                    _ => TaskPriority::None,
                };
                let unit = |u| match u {
                    0 => EstimateUnit::Minutes,
                    1 => EstimateUnit::Hours,
                    _ => EstimateUnit::Days,
                };
                Task {
                    title,
                    priority,
                    deadline: deadline_offset.map(|m| {
                        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(m)
                    }),
                    estimate_value: estimate.map(|(v, _)| v),
                    estimate_unit: estimate.map(|(_, u)| unit(u)),
                    ..Default::default()
                }
            })
    }

    proptest! {
        #[test]
        fn output_is_a_permutation_of_input(tasks in proptest::collection::vec(arb_task(), 0..40)) {
            let input_ids: Vec<Uuid> = tasks.iter().map(|t| t.id).collect();
            let sorted = sorted(tasks);

            prop_assert_eq!(sorted.len(), input_ids.len());
            let sorted_ids: HashSet<Uuid> = sorted.iter().map(|t| t.id).collect();
            let input_ids: HashSet<Uuid> = input_ids.into_iter().collect();
            prop_assert_eq!(sorted_ids, input_ids);
        }

        #[test]
        fn sorting_twice_yields_same_order(tasks in proptest::collection::vec(arb_task(), 0..40)) {
            let once = sorted(tasks);
            let once_ids: Vec<Uuid> = once.iter().map(|t| t.id).collect();
            let twice = sorted(once);
            let twice_ids: Vec<Uuid> = twice.iter().map(|t| t.id).collect();
            prop_assert_eq!(once_ids, twice_ids);
        }

        #[test]
        fn higher_priority_always_precedes(tasks in proptest::collection::vec(arb_task(), 2..40)) {
            let sorted = sorted(tasks);
            for pair in sorted.windows(2) {
                prop_assert!(pair[0].priority.rank() <= pair[1].priority.rank());
            }
        }

        #[test]
        fn deadline_present_precedes_absent_within_priority(tasks in proptest::collection::vec(arb_task(), 2..40)) {
            let sorted = sorted(tasks);
            for pair in sorted.windows(2) {
                if pair[0].priority == pair[1].priority {
                    prop_assert!(!(pair[0].deadline.is_none() && pair[1].deadline.is_some()));
                }
            }
        }
    }
}
