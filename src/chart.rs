use crate::filter::FilteredView;
use crate::util::format_number;
use serde::Serialize;
use std::collections::BTreeSet;
use tabled::{builder::Builder, settings::Style};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub time_label: String,
    pub sector: String,
    pub metric: String,
    pub value: f64,
}

/// Line-chart input: one series per sector over a categorical time axis.
///
/// `time_order` is the axis order and follows `(year, quarter_order)`;
/// labels must never be ordered as plain strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub title: String,
    pub x_title: String,
    pub y_title: String,
    pub time_order: Vec<String>,
    pub points: Vec<ChartPoint>,
}

/// `None` for an empty view so callers show a "no data" state instead of
/// an empty chart.
pub fn chart_data(view: &FilteredView<'_>) -> Option<ChartData> {
    if view.is_empty() {
        return None;
    }
    let time_order = view
        .periods()
        .into_iter()
        .map(|(_, label)| label.to_string())
        .collect();
    let points = view
        .rows()
        .iter()
        .map(|r| ChartPoint {
            time_label: r.time_label.clone(),
            sector: r.sector.clone(),
            metric: r.metric.clone(),
            value: r.value,
        })
        .collect();
    Some(ChartData {
        title: format!("{} trend", view.metric()),
        x_title: "Period (year-quarter)".to_string(),
        y_title: "Value".to_string(),
        time_order,
        points,
    })
}

impl ChartData {
    /// Pivot the series into a text table: one row per period in axis
    /// order, one column per sector.
    pub fn to_table(&self) -> String {
        let sectors: BTreeSet<&str> = self.points.iter().map(|p| p.sector.as_str()).collect();
        let mut builder = Builder::default();
        let mut header = vec!["Period".to_string()];
        header.extend(sectors.iter().map(|s| s.to_string()));
        builder.push_record(header);
        for label in &self.time_order {
            let mut row = vec![label.clone()];
            for sector in &sectors {
                let cell = self
                    .points
                    .iter()
                    .find(|p| &p.time_label == label && p.sector == *sector)
                    .map(|p| format_number(p.value, 2))
                    .unwrap_or_else(|| "-".to_string());
                row.push(cell);
            }
            builder.push_record(row);
        }
        builder.build().with(Style::markdown()).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter;
    use crate::types::{test_support::rec, Record};

    fn labelled(year: i32, q: u32, sector: &str, value: f64, label: &str) -> Record {
        let mut r = rec(year, q, "ADHB", sector, value);
        r.time_label = label.to_string();
        r
    }

    #[test]
    fn axis_follows_period_order_not_string_order() {
        // As strings "Q10 2022" < "Q2 2022" < "Q9 2021".
        let records = vec![
            labelled(2021, 9, "A", 1.0, "Q9 2021"),
            labelled(2022, 2, "A", 2.0, "Q2 2022"),
            labelled(2022, 10, "A", 3.0, "Q10 2022"),
        ];
        let view = filter(&records, "ADHB", &["A".to_string()]);
        let chart = chart_data(&view).unwrap();
        assert_eq!(chart.time_order, vec!["Q9 2021", "Q2 2022", "Q10 2022"]);
        assert_eq!(chart.points.len(), 3);
        assert_eq!(chart.title, "ADHB trend");
    }

    #[test]
    fn empty_view_has_no_chart() {
        let records = vec![rec(2023, 1, "ADHB", "A", 1.0)];
        let view = filter(&records, "ADHB", &[]);
        assert!(chart_data(&view).is_none());
    }

    #[test]
    fn pivot_table_marks_missing_cells() {
        let records = vec![
            rec(2023, 1, "ADHB", "A", 1.0),
            rec(2023, 1, "ADHB", "B", 2.5),
            rec(2023, 2, "ADHB", "A", 1234.5),
        ];
        let view = filter(&records, "ADHB", &["A".to_string(), "B".to_string()]);
        let table = chart_data(&view).unwrap().to_table();
        assert!(table.contains("Period"));
        assert!(table.contains("1,234.50"));
        assert!(table.contains("2.50"));
        let q2_line = table.lines().find(|l| l.contains("2023 Q2")).unwrap();
        assert!(q2_line.trim_end_matches('|').trim_end().ends_with('-'));
        let q1 = table.find("2023 Q1").unwrap();
        let q2 = table.find("2023 Q2").unwrap();
        assert!(q1 < q2);
    }
}
