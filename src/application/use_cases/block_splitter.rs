// ============================================================
// BLOCK SPLITTER
// ============================================================
// Assign shutdown / maintenance / startup blocks to outline activities

use crate::domain::csv::{Activity, ActivityType};

/// Blocks in the order they are filled when walking from the end
const BLOCKS_FROM_END: [ActivityType; 3] = [
    ActivityType::Startup,
    ActivityType::Maintenance,
    ActivityType::Shutdown,
];

/// Set `activity_type` on every activity.
///
/// The schedule lists the same work fronts three times, each pass opened by
/// the `marker` activity. Walking backwards, activities belong to startup
/// until a marker is passed, then maintenance, then shutdown. Everything
/// before the third pass stays in shutdown.
pub fn assign_blocks(activities: &mut [Activity], marker: &str) {
    let marker = marker.trim();
    let mut block = 0;

    for activity in activities.iter_mut().rev() {
        activity.activity_type = BLOCKS_FROM_END[block];
        if activity.name.trim() == marker && block + 1 < BLOCKS_FROM_END.len() {
            block += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MARKER: &str = "Pátio de Alimentação";

    fn named(names: &[&str]) -> Vec<Activity> {
        names.iter().map(|name| Activity::new(*name, 0.0, 0.0)).collect()
    }

    fn types(activities: &[Activity]) -> Vec<ActivityType> {
        activities.iter().map(|a| a.activity_type).collect()
    }

    #[test]
    fn test_three_passes() {
        let mut activities = named(&[MARKER, "Forno", MARKER, "Forno", MARKER, "Forno"]);
        assign_blocks(&mut activities, MARKER);

        use ActivityType::*;
        assert_eq!(
            types(&activities),
            vec![Shutdown, Shutdown, Maintenance, Maintenance, Startup, Startup]
        );
    }

    #[test]
    fn test_extra_leading_rows_stay_in_shutdown() {
        let mut activities = named(&["Preparação", MARKER, "A", MARKER, "B", MARKER, "C"]);
        assign_blocks(&mut activities, MARKER);

        assert_eq!(activities[0].activity_type, ActivityType::Shutdown);
        assert_eq!(activities[1].activity_type, ActivityType::Shutdown);
        assert_eq!(activities[6].activity_type, ActivityType::Startup);
    }

    #[test]
    fn test_without_marker_everything_is_startup() {
        let mut activities = named(&["A", "B"]);
        assign_blocks(&mut activities, MARKER);

        assert_eq!(types(&activities), vec![ActivityType::Startup, ActivityType::Startup]);
    }

    #[test]
    fn test_order_preserved() {
        let mut activities = named(&[MARKER, "A", "B", MARKER, "C"]);
        assign_blocks(&mut activities, MARKER);

        let names: Vec<_> = activities.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec![MARKER, "A", "B", MARKER, "C"]);
        assert_eq!(activities[2].activity_type, ActivityType::Maintenance);
    }
}
