use crate::models::{AnnotatedEntry, ChartSeries, Dashboard, Entry, GoalStatus};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Builds the full view-model for one page render. `entries` are newest first.
pub fn build_dashboard(entries: &[Entry], goal: Option<i64>) -> Dashboard {
    Dashboard {
        entries: annotate(entries, goal),
        calorie_goal: goal,
        over_goal_flags: build_over_goal_flags(entries, goal),
        chart: build_chart_series(entries),
    }
}

pub fn annotate(entries: &[Entry], goal: Option<i64>) -> Vec<AnnotatedEntry> {
    entries
        .iter()
        .map(|entry| AnnotatedEntry {
            entry: entry.clone(),
            status: goal_status(entry.calories, goal),
        })
        .collect()
}

pub fn goal_status(calories: Option<i64>, goal: Option<i64>) -> GoalStatus {
    match (calories, goal) {
        (Some(calories), Some(goal)) if calories > goal => GoalStatus::OverGoal,
        (Some(_), Some(_)) => GoalStatus::WithinGoal,
        _ => GoalStatus::NotApplicable,
    }
}

/// Missing weights stay `None` so charts can leave a gap; missing calories and
/// steps are plotted as zero.
pub fn build_chart_series(entries: &[Entry]) -> ChartSeries {
    let mut series = ChartSeries {
        labels: Vec::with_capacity(entries.len()),
        weights: Vec::with_capacity(entries.len()),
        calories: Vec::with_capacity(entries.len()),
        steps: Vec::with_capacity(entries.len()),
    };

    for entry in entries.iter().rev() {
        series.labels.push(date_label(entry.date));
        series.weights.push(entry.weight);
        series.calories.push(entry.calories.unwrap_or(0));
        series.steps.push(entry.steps.unwrap_or(0));
    }

    series
}

/// Days sharing a label are OR-merged: one over-goal entry flags the whole day.
pub fn build_over_goal_flags(entries: &[Entry], goal: Option<i64>) -> BTreeMap<String, bool> {
    let mut flags = BTreeMap::new();
    let Some(goal) = goal else {
        return flags;
    };

    for entry in entries {
        let is_over = entry.calories.is_some_and(|calories| calories > goal);
        let flag = flags.entry(date_label(entry.date)).or_insert(false);
        *flag = *flag || is_over;
    }

    flags
}

pub fn date_label(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(date: &str, calories: Option<i64>) -> Entry {
        Entry {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            weight: None,
            calories,
            steps: None,
        }
    }

    fn statuses(annotated: &[AnnotatedEntry]) -> Vec<GoalStatus> {
        annotated.iter().map(|item| item.status).collect()
    }

    #[test]
    fn annotate_classifies_against_goal() {
        let entries = vec![
            entry("2024-01-03", Some(2200)),
            entry("2024-01-02", Some(1800)),
            entry("2024-01-01", None),
        ];

        let annotated = annotate(&entries, Some(2000));
        assert_eq!(
            statuses(&annotated),
            vec![GoalStatus::OverGoal, GoalStatus::WithinGoal, GoalStatus::NotApplicable]
        );
        assert_eq!(annotated[0].entry, entries[0]);

        let flags = build_over_goal_flags(&entries, Some(2000));
        assert_eq!(flags.len(), 3);
        assert_eq!(flags["2024-01-03"], true);
        assert_eq!(flags["2024-01-02"], false);
        assert_eq!(flags["2024-01-01"], false);
    }

    #[test]
    fn calories_equal_to_goal_are_within() {
        let entries = vec![entry("2024-03-10", Some(2000))];
        let annotated = annotate(&entries, Some(2000));
        assert_eq!(annotated[0].status, GoalStatus::WithinGoal);
        assert_eq!(annotated[0].status.as_str(), "Within Goal");
    }

    #[test]
    fn missing_goal_marks_everything_not_applicable() {
        let entries = vec![entry("2024-01-01", Some(1500)), entry("2023-12-31", Some(9000))];
        let annotated = annotate(&entries, None);
        assert!(annotated.iter().all(|item| item.status == GoalStatus::NotApplicable));
        assert!(build_over_goal_flags(&entries, None).is_empty());
    }

    #[test]
    fn missing_calories_is_not_applicable_with_goal() {
        let entries = vec![entry("2024-01-01", None)];
        assert_eq!(annotate(&entries, Some(0))[0].status, GoalStatus::NotApplicable);
        assert_eq!(annotate(&entries, Some(-5))[0].status, GoalStatus::NotApplicable);
    }

    #[test]
    fn duplicate_dates_are_or_merged() {
        let entries = vec![
            entry("2024-02-01", Some(1000)),
            entry("2024-02-01", Some(2500)),
            entry("2024-01-31", Some(1000)),
        ];
        let flags = build_over_goal_flags(&entries, Some(2000));
        assert_eq!(flags.len(), 2);
        assert_eq!(flags["2024-02-01"], true);
        assert_eq!(flags["2024-01-31"], false);

        let reordered = vec![entries[1].clone(), entries[0].clone()];
        assert_eq!(build_over_goal_flags(&reordered, Some(2000))["2024-02-01"], true);
    }

    #[test]
    fn chart_series_is_oldest_first() {
        let entries = vec![
            Entry {
                date: NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
                weight: Some(80.5),
                calories: Some(2200),
                steps: Some(9000),
            },
            Entry {
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                weight: None,
                calories: None,
                steps: None,
            },
            Entry {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                weight: Some(81.0),
                calories: Some(0),
                steps: Some(400),
            },
        ];

        let series = build_chart_series(&entries);
        assert_eq!(series.labels, vec!["2024-01-01", "2024-01-02", "2024-01-03"]);
        assert_eq!(series.weights, vec![Some(81.0), None, Some(80.5)]);
        assert_eq!(series.calories, vec![0, 0, 2200]);
        assert_eq!(series.steps, vec![400, 0, 9000]);
    }

    #[test]
    fn chart_series_of_empty_input_is_empty() {
        let series = build_chart_series(&[]);
        assert_eq!(series, ChartSeries::default());
    }

    #[test]
    fn date_labels_are_zero_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(date_label(date), "2024-03-07");
    }

    #[test]
    fn annotate_is_repeatable() {
        let entries = vec![entry("2024-01-02", Some(2100)), entry("2024-01-01", Some(1900))];
        assert_eq!(annotate(&entries, Some(2000)), annotate(&entries, Some(2000)));
        assert_eq!(build_dashboard(&entries, Some(2000)), build_dashboard(&entries, Some(2000)));
    }

    #[test]
    fn dashboard_serializes_status_labels_and_missing_weight() {
        let entries = vec![entry("2024-01-01", Some(2500))];
        let value = serde_json::to_value(build_dashboard(&entries, Some(2000))).unwrap();
        assert_eq!(value["entries"][0]["status"], "Over Goal");
        assert_eq!(value["entries"][0]["date"], "2024-01-01");
        assert_eq!(value["chart"]["weights"][0], serde_json::Value::Null);
        assert_eq!(value["over_goal_flags"]["2024-01-01"], true);
        assert_eq!(value["calorie_goal"], 2000);
    }
}
