// ============================================================
// OUTLINE ASSEMBLER
// ============================================================
// Fold leveled outline rows into activities with sub-activities

use crate::domain::csv::{Activity, MapperConfig, OutlineRow, SkipTally, SubActivity};
use crate::infrastructure::csv::clean_name;

/// Level that opens an activity
pub const ACTIVITY_LEVEL: u32 = 3;

/// Level of sub-activity rows
pub const SUB_ACTIVITY_LEVEL: u32 = 4;

const PROJECT_LEVEL: u32 = 1;

/// Activities recovered from an outline
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineAssembly {
    /// Name of the first level-1 row
    pub title: Option<String>,
    pub activities: Vec<Activity>,
    pub skipped: SkipTally,
}

pub struct OutlineAssembler<'a> {
    config: &'a MapperConfig,
}

impl<'a> OutlineAssembler<'a> {
    pub fn new(config: &'a MapperConfig) -> Self {
        Self { config }
    }

    /// Level 3 opens an activity, flagged level 4 rows become its
    /// sub-activities, every other level is structure only.
    pub fn assemble(&self, rows: &[OutlineRow]) -> OutlineAssembly {
        let mut title = None;
        let mut activities = Vec::new();
        let mut skipped = SkipTally::default();
        let mut current: Option<Activity> = None;
        // an activity whose name was filtered away still owns its rows
        let mut inside_dropped_activity = false;

        for row in rows {
            match row.level {
                PROJECT_LEVEL => {
                    if title.is_none() {
                        title = self.name(&row.name, &mut skipped);
                    }
                }
                ACTIVITY_LEVEL => {
                    self.flush(current.take(), &mut activities);
                    match self.name(&row.name, &mut skipped) {
                        Some(name) => {
                            current = Some(Activity::new(name, row.progress, row.baseline));
                            inside_dropped_activity = false;
                        }
                        None => inside_dropped_activity = true,
                    }
                }
                SUB_ACTIVITY_LEVEL if row.dashboard => match current.as_mut() {
                    Some(activity) => {
                        if let Some(name) = self.name(&row.name, &mut skipped) {
                            activity
                                .sub_activities
                                .push(SubActivity::new(name, row.progress, row.baseline));
                        }
                    }
                    None if inside_dropped_activity => {}
                    None => {
                        tracing::debug!("Sub-activity {:?} has no enclosing activity", row.name);
                        skipped.orphan_rows += 1;
                    }
                },
                _ => {}
            }
        }
        self.flush(current, &mut activities);

        OutlineAssembly {
            title,
            activities,
            skipped,
        }
    }

    fn flush(&self, activity: Option<Activity>, activities: &mut Vec<Activity>) {
        let Some(activity) = activity else {
            return;
        };

        if activity.sub_activities.is_empty() && !self.config.keep_empty_activities {
            tracing::debug!("Dropping activity {:?} without dashboard sub-activities", activity.name);
            return;
        }
        activities.push(activity);
    }

    fn name(&self, raw: &str, skipped: &mut SkipTally) -> Option<String> {
        if !self.config.clean_outline_names {
            return Some(raw.trim().to_string());
        }

        let cleaned = clean_name(raw);
        if cleaned.is_empty() {
            tracing::debug!("Name filter emptied {:?}", raw);
            skipped.filtered_names += 1;
            return None;
        }
        Some(cleaned)
    }
}

/// Outline rows for a project: level 1 title, level 3 activities, level 4 sub-activities
pub fn activities_to_outline(title: Option<&str>, activities: &[Activity]) -> Vec<OutlineRow> {
    let mut rows = Vec::new();

    if let Some(title) = title {
        let count = activities.len().max(1) as f64;
        let progress = activities.iter().map(|a| a.progress).sum::<f64>() / count;
        let baseline = activities.iter().map(|a| a.baseline).sum::<f64>() / count;
        rows.push(OutlineRow::new(PROJECT_LEVEL, title, true, progress, baseline));
    }

    for activity in activities {
        rows.push(OutlineRow::new(
            ACTIVITY_LEVEL,
            activity.name.clone(),
            true,
            activity.progress,
            activity.baseline,
        ));
        for sub in &activity.sub_activities {
            rows.push(OutlineRow::new(
                SUB_ACTIVITY_LEVEL,
                sub.name.clone(),
                true,
                sub.progress,
                sub.baseline,
            ));
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<OutlineRow> {
        vec![
            OutlineRow::new(1, "Parada 2025", true, 40.0, 50.0),
            OutlineRow::new(4, "Órfã", true, 1.0, 1.0),
            OutlineRow::new(2, "Frente A", false, 40.0, 50.0),
            OutlineRow::new(3, "Pátio de Alimentação", true, 30.0, 35.0),
            OutlineRow::new(4, "Correia C1", true, 10.0, 12.0),
            OutlineRow::new(4, "Correia C2", false, 5.0, 6.0),
            OutlineRow::new(4, "Correia (BH128; BH129)", true, 7.0, 8.0),
            OutlineRow::new(3, "Sem subatividades", true, 1.0, 2.0),
            OutlineRow::new(3, "Forno", true, 50.0, 60.0),
            OutlineRow::new(5, "Detalhe", true, 0.0, 0.0),
            OutlineRow::new(4, "Refratário disponível", true, 20.0, 25.0),
        ]
    }

    #[test]
    fn test_assemble_outline() {
        let config = MapperConfig::default();
        let assembly = OutlineAssembler::new(&config).assemble(&rows());

        assert_eq!(assembly.title.as_deref(), Some("Parada 2025"));
        assert_eq!(assembly.activities.len(), 2);

        let patio = &assembly.activities[0];
        assert_eq!(patio.name, "Pátio de Alimentação");
        assert_eq!(
            patio.sub_activities,
            vec![
                SubActivity::new("Correia C1", 10.0, 12.0),
                SubActivity::new("Correia BH128 BH129", 7.0, 8.0),
            ]
        );

        let forno = &assembly.activities[1];
        assert_eq!(forno.sub_activities, vec![SubActivity::new("Refratário", 20.0, 25.0)]);
        assert_eq!(assembly.skipped.orphan_rows, 1);
    }

    #[test]
    fn test_keep_empty_activities() {
        let config = MapperConfig {
            keep_empty_activities: true,
            ..Default::default()
        };
        let assembly = OutlineAssembler::new(&config).assemble(&rows());

        let names: Vec<_> = assembly.activities.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Pátio de Alimentação", "Sem subatividades", "Forno"]);
    }

    #[test]
    fn test_filtered_activity_takes_its_rows_along() {
        let config = MapperConfig::default();
        let assembly = OutlineAssembler::new(&config).assemble(&[
            OutlineRow::new(3, "( / )", true, 1.0, 1.0),
            OutlineRow::new(4, "Filha", true, 1.0, 1.0),
        ]);

        assert!(assembly.activities.is_empty());
        assert_eq!(assembly.skipped.filtered_names, 1);
        assert_eq!(assembly.skipped.orphan_rows, 0);
    }

    #[test]
    fn test_outline_round_trip_through_rows() {
        let activities = vec![
            Activity::new("Forno", 50.0, 60.0).with_sub_activities(vec![
                SubActivity::new("Refratário", 20.0, 25.0),
                SubActivity::new("Queimador", 0.0, 10.5),
            ]),
            Activity::new("Secagem", 0.0, 0.0),
        ];

        let rows = activities_to_outline(Some("EPU"), &activities);
        assert_eq!(rows[0], OutlineRow::new(1, "EPU", true, 25.0, 30.0));
        assert_eq!(rows.len(), 5);

        let config = MapperConfig::verbatim();
        let assembly = OutlineAssembler::new(&config).assemble(&rows);
        assert_eq!(assembly.title.as_deref(), Some("EPU"));
        assert_eq!(assembly.activities, activities);
    }
}
