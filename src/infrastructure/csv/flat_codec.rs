// ============================================================
// FLAT ACTIVITY CODEC
// ============================================================
// `name,value,baseline,subName:real|planned; ...` rows <-> activities

use csv::StringRecord;

use super::name_filter::clean_name;
use super::number::{format_percentage, parse_percentage};
use super::CsvParser;
use crate::domain::csv::{
    Activity, ActivityType, DecimalSeparator, Dialect, MapperConfig, ParseOutcome, SkipTally,
    SubActivity, FLAT_HEADER,
};
use crate::domain::error::Result;

/// Separator written between serialized sub-activities
const SUB_ACTIVITY_SEPARATOR: &str = "; ";

/// Codec for the flat dialect
pub struct FlatActivityCodec<'a> {
    config: &'a MapperConfig,
}

impl<'a> FlatActivityCodec<'a> {
    pub fn new(config: &'a MapperConfig) -> Self {
        Self { config }
    }

    /// Parse flat CSV text; every activity gets `activity_type`
    pub fn parse(&self, content: &str, activity_type: ActivityType) -> Result<ParseOutcome<Activity>> {
        // untrimmed: whitespace inside the rejoined sub-activity tail is significant
        let records = CsvParser::for_dialect(Dialect::FlatWithSubActivities)
            .with_trim(false)
            .read_records(content)?;

        let mut skipped = SkipTally {
            rows: records.unreadable,
            ..Default::default()
        };
        let mut activities = Vec::with_capacity(records.records.len());

        for (index, record) in records.records.iter().enumerate() {
            if let Some(activity) = self.parse_record(index, record, activity_type, &mut skipped) {
                activities.push(activity);
            }
        }

        Ok(ParseOutcome {
            items: activities,
            skipped,
            data_lines: records.data_lines(),
        })
    }

    fn parse_record(
        &self,
        index: usize,
        record: &StringRecord,
        activity_type: ActivityType,
        skipped: &mut SkipTally,
    ) -> Option<Activity> {
        if record.len() < 3 {
            tracing::debug!("Skipping flat row {}: {} field(s), need at least 3", index + 1, record.len());
            skipped.rows += 1;
            return None;
        }

        let raw_name = record.get(0).unwrap_or("").trim();
        if raw_name.is_empty() {
            tracing::debug!("Skipping flat row {}: empty name", index + 1);
            skipped.rows += 1;
            return None;
        }
        let name = self.normalize_name(raw_name, skipped)?;

        // Sub-activity text may itself contain commas; rejoin the tail as written
        let sub_activities_raw = record.iter().skip(3).collect::<Vec<_>>().join(",");

        Some(Activity {
            name,
            progress: self.percentage(record.get(1).unwrap_or("").trim()),
            baseline: self.percentage(record.get(2).unwrap_or("").trim()),
            activity_type,
            sub_activities: self.parse_sub_activities(&sub_activities_raw, skipped),
        })
    }

    /// Parse `subName:real|planned; ...`, dropping malformed entries
    pub fn parse_sub_activities(&self, raw: &str, skipped: &mut SkipTally) -> Vec<SubActivity> {
        let mut sub_activities = Vec::new();

        for entry in raw.split(';') {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }

            let Some((name, values)) = entry.rsplit_once(':') else {
                tracing::debug!("Dropping sub-activity entry without ':' : {:?}", entry);
                skipped.sub_entries += 1;
                continue;
            };

            let (name, values) = (name.trim(), values.trim());
            if name.is_empty() || values.is_empty() {
                tracing::debug!("Dropping incomplete sub-activity entry: {:?}", entry);
                skipped.sub_entries += 1;
                continue;
            }

            let Some(name) = self.normalize_name(name, skipped) else {
                continue;
            };

            let (real, planned) = values.split_once('|').unwrap_or((values, ""));
            sub_activities.push(SubActivity {
                name,
                progress: self.percentage(real),
                baseline: self.percentage(planned),
            });
        }

        sub_activities
    }

    /// Serialize activities, canonical header first
    pub fn write(&self, activities: &[Activity], decimal: DecimalSeparator) -> Result<String> {
        let rows = activities.iter().map(|activity| {
            [
                activity.name.clone(),
                format_percentage(activity.progress, decimal),
                format_percentage(activity.baseline, decimal),
                self.write_sub_activities(&activity.sub_activities, decimal),
            ]
        });

        CsvParser::for_dialect(Dialect::FlatWithSubActivities).write_rows(&FLAT_HEADER, rows)
    }

    /// `name:real|planned` entries joined with `; `
    pub fn write_sub_activities(&self, sub_activities: &[SubActivity], decimal: DecimalSeparator) -> String {
        sub_activities
            .iter()
            .map(|sub| {
                format!(
                    "{}:{}|{}",
                    sanitize_sub_name(&sub.name),
                    format_percentage(sub.progress, decimal),
                    format_percentage(sub.baseline, decimal)
                )
            })
            .collect::<Vec<_>>()
            .join(SUB_ACTIVITY_SEPARATOR)
    }

    fn percentage(&self, raw: &str) -> f64 {
        parse_percentage(raw, self.config.parse_decimal, self.config.out_of_range)
    }

    fn normalize_name(&self, name: &str, skipped: &mut SkipTally) -> Option<String> {
        if !self.config.clean_flat_names {
            return Some(name.to_string());
        }
        let cleaned = clean_name(name);
        if cleaned.is_empty() {
            tracing::debug!("Name filter emptied {:?}", name);
            skipped.filtered_names += 1;
            return None;
        }
        Some(cleaned)
    }
}

/// `;` and line breaks would split the entry on re-import
fn sanitize_sub_name(name: &str) -> String {
    let sanitized = name.replace([';', '\r', '\n'], " ").trim().to_string();
    if sanitized != name {
        tracing::debug!("Sub-activity name {:?} exported as {:?}", name, sanitized);
    }
    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec_parse(content: &str) -> ParseOutcome<Activity> {
        let config = MapperConfig::default();
        FlatActivityCodec::new(&config)
            .parse(content, ActivityType::Shutdown)
            .unwrap()
    }

    #[test]
    fn test_parse_row_with_sub_activities() {
        let outcome = codec_parse("name,value,baseline,sub_activities\nSecagem,40,50,SubA:10|5; SubB:20|15\n");

        assert_eq!(outcome.len(), 1);
        let activity = &outcome.items[0];
        assert_eq!(activity.name, "Secagem");
        assert_eq!(activity.progress, 40.0);
        assert_eq!(activity.baseline, 50.0);
        assert_eq!(activity.activity_type, ActivityType::Shutdown);
        assert_eq!(
            activity.sub_activities,
            vec![SubActivity::new("SubA", 10.0, 5.0), SubActivity::new("SubB", 20.0, 15.0)]
        );
        assert!(outcome.skipped.is_empty());
    }

    #[test]
    fn test_quoted_decimal_commas() {
        let outcome = codec_parse(
            "name,value,baseline,sub_activities\nSistema X,\"75,5\",\"70,2\",SubA:10|5; SubB:20|15\n",
        );

        let activity = &outcome.items[0];
        assert_eq!(activity.name, "Sistema X");
        assert_eq!(activity.progress, 75.5);
        assert_eq!(activity.baseline, 70.2);
        assert_eq!(activity.sub_activities.len(), 2);
    }

    #[test]
    fn test_unquoted_decimal_commas_read_positionally() {
        let outcome = codec_parse("name,value,baseline,sub_activities\nSistema X,75,5,70,2,SubA:10|5; SubB:20|15\n");

        let activity = &outcome.items[0];
        assert_eq!(activity.progress, 75.0);
        assert_eq!(activity.baseline, 5.0);
        // the tail is rejoined, so the stray "70,2," sticks to the first name
        assert_eq!(activity.sub_activities[0].name, "70,2,SubA");
        assert_eq!(activity.sub_activities[1], SubActivity::new("SubB", 20.0, 15.0));
    }

    #[test]
    fn test_unquoted_tail_keeps_spacing_after_commas() {
        let outcome = codec_parse("h\nForno , 1 , 2 ,Correia, linha 2:10|5; Rolo:1|2\n");

        let activity = &outcome.items[0];
        assert_eq!(activity.name, "Forno");
        assert_eq!(activity.progress, 1.0);
        assert_eq!(activity.baseline, 2.0);
        assert_eq!(
            activity.sub_activities,
            vec![SubActivity::new("Correia, linha 2", 10.0, 5.0), SubActivity::new("Rolo", 1.0, 2.0)]
        );
    }

    #[test]
    fn test_sanitized_sub_name_reimports_without_separator() {
        let config = MapperConfig::default();
        let codec = FlatActivityCodec::new(&config);
        let activities = vec![Activity::new("Forno", 1.0, 2.0)
            .with_sub_activities(vec![SubActivity::new("x;", 3.0, 4.0), SubActivity::new("a\nb", 5.0, 6.0)])];

        let text = codec.write(&activities, DecimalSeparator::Dot).unwrap();
        assert_eq!(text, "name,value,baseline,sub_activities\nForno,1,2,x:3|4; a b:5|6\n");

        let outcome = codec.parse(&text, ActivityType::General).unwrap();
        assert_eq!(
            outcome.items[0].sub_activities,
            vec![SubActivity::new("x", 3.0, 4.0), SubActivity::new("a b", 5.0, 6.0)]
        );
    }

    #[test]
    fn test_sub_activity_values_with_decimal_comma() {
        let outcome = codec_parse("h\nForno,1,2,Refratário:10,5|3,25\n");
        assert_eq!(
            outcome.items[0].sub_activities,
            vec![SubActivity::new("Refratário", 10.5, 3.25)]
        );
    }

    #[test]
    fn test_malformed_sub_entries_dropped_and_counted() {
        let outcome = codec_parse("h\nForno,1,2,Malformed; :1|2; Nome:; Ok:3|4;  ;\n");

        assert_eq!(outcome.items[0].sub_activities, vec![SubActivity::new("Ok", 3.0, 4.0)]);
        assert_eq!(outcome.skipped.sub_entries, 3);
    }

    #[test]
    fn test_sub_name_may_contain_colon() {
        let outcome = codec_parse("h\nForno,1,2,Etapa: limpeza:7|8\n");
        assert_eq!(outcome.items[0].sub_activities[0].name, "Etapa: limpeza");
    }

    #[test]
    fn test_missing_planned_defaults_to_zero() {
        let outcome = codec_parse("h\nForno,1,2,SubA:10\n");
        assert_eq!(outcome.items[0].sub_activities[0], SubActivity::new("SubA", 10.0, 0.0));
    }

    #[test]
    fn test_bad_rows_skipped() {
        let outcome = codec_parse("h\n,1,2,A:1|2\nSó nome\nForno,abc,150\n");

        assert_eq!(outcome.len(), 1);
        assert_eq!(outcome.items[0].name, "Forno");
        assert_eq!(outcome.items[0].progress, 0.0);
        assert_eq!(outcome.items[0].baseline, 0.0);
        assert!(outcome.items[0].sub_activities.is_empty());
        assert_eq!(outcome.skipped.rows, 2);
        assert_eq!(outcome.data_lines, 3);
    }

    #[test]
    fn test_header_only_is_malformed() {
        let config = MapperConfig::default();
        let result = FlatActivityCodec::new(&config).parse("name,value,baseline,sub_activities\n", ActivityType::General);
        assert!(matches!(result, Err(crate::domain::error::AppError::MalformedInput(_))));
    }

    #[test]
    fn test_write_starts_with_header() {
        let config = MapperConfig::default();
        let text = FlatActivityCodec::new(&config)
            .write(&[Activity::new("Forno", 75.5, 70.0)], DecimalSeparator::Dot)
            .unwrap();

        assert_eq!(text, "name,value,baseline,sub_activities\nForno,75.5,70,\n");
    }

    #[test]
    fn test_write_sub_activities_format() {
        let config = MapperConfig::default();
        let codec = FlatActivityCodec::new(&config);
        let subs = vec![SubActivity::new("SubA", 10.0, 5.0), SubActivity::new("Sub;B", 20.5, 15.0)];

        assert_eq!(codec.write_sub_activities(&subs, DecimalSeparator::Dot), "SubA:10|5; Sub B:20.5|15");
        assert_eq!(codec.write_sub_activities(&subs, DecimalSeparator::Comma), "SubA:10|5; Sub B:20,5|15");
    }

    #[test]
    fn test_round_trip_both_decimal_conventions() {
        let config = MapperConfig::default();
        let codec = FlatActivityCodec::new(&config);
        let activities = vec![
            Activity::new("Pátio de Alimentação, linha 1", 75.5, 70.25)
                .with_type(ActivityType::Maintenance)
                .with_sub_activities(vec![
                    SubActivity::new("Correia: troca", 10.0, 5.5),
                    SubActivity::new("Rolos", 0.0, 100.0),
                ]),
            Activity::new("Secagem", 0.0, 0.0).with_type(ActivityType::Maintenance),
        ];

        for decimal in [DecimalSeparator::Dot, DecimalSeparator::Comma] {
            let text = codec.write(&activities, decimal).unwrap();
            let outcome = codec.parse(&text, ActivityType::Maintenance).unwrap();
            assert_eq!(outcome.items, activities, "{}", text);
            assert!(outcome.skipped.is_empty());
        }
    }

    #[test]
    fn test_clean_flat_names_when_enabled() {
        let config = MapperConfig {
            clean_flat_names: true,
            ..Default::default()
        };
        let outcome = FlatActivityCodec::new(&config)
            .parse("h\nBomba (BH129); disponível,1,2,()/:1|2; Motor/2:3|4\n", ActivityType::General)
            .unwrap();

        assert_eq!(outcome.items[0].name, "Bomba BH129");
        assert_eq!(outcome.items[0].sub_activities, vec![SubActivity::new("Motor2", 3.0, 4.0)]);
        assert_eq!(outcome.skipped.filtered_names, 1);
    }
}
