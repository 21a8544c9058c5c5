//! Period-over-period narrative.
//!
//! Compares the two most recent distinct periods of a filtered view, sector
//! by sector, and renders a short textual report. Every outcome, including
//! the ones where no comparison is possible, has a defined text.

use crate::error::DashboardError;
use crate::filter::FilteredView;
use crate::types::{Period, Record};
use crate::util::{average, format_number, format_signed};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorDelta {
    pub sector: String,
    pub delta: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub metric: String,
    /// Every sector present in the view, sorted.
    pub sectors: Vec<String>,
    pub latest_label: String,
    pub prev_label: String,
    pub avg_latest: f64,
    /// Per-sector change over the sectors present in both periods, sorted
    /// by sector name.
    pub deltas: Vec<SectorDelta>,
    pub max_up: SectorDelta,
    pub max_down: SectorDelta,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Narrative {
    /// Fewer than two distinct periods in the view.
    InsufficientHistory { metric: String },
    /// The two latest periods share no sector.
    NoComparableSectors { metric: String, latest_label: String },
    Comparison(Comparison),
}

/// Build the narrative for `view`.
///
/// The only error is a sector appearing twice within one compared period,
/// which the loader already rejects for data read from disk.
pub fn narrate(view: &FilteredView<'_>) -> Result<Narrative, DashboardError> {
    let metric = view.metric().to_string();
    let periods = view.periods();
    let [.., (prev, prev_label), (last, last_label)] = periods.as_slice() else {
        return Ok(Narrative::InsufficientHistory { metric });
    };

    let latest = values_by_sector(&view.rows_at(*last), *last)?;
    let previous = values_by_sector(&view.rows_at(*prev), *prev)?;

    // BTreeMap keys are sorted, so iteration order is the tie-break order.
    let common: Vec<(&str, f64, f64)> = latest
        .iter()
        .filter_map(|(sector, now)| previous.get(sector).map(|before| (*sector, *now, *before)))
        .collect();
    let latest_values: Vec<f64> = common.iter().map(|(_, now, _)| *now).collect();
    let Some(avg_latest) = average(&latest_values) else {
        return Ok(Narrative::NoComparableSectors {
            metric,
            latest_label: last_label.to_string(),
        });
    };
    let deltas: Vec<SectorDelta> = common
        .iter()
        .map(|(sector, now, before)| SectorDelta {
            sector: sector.to_string(),
            delta: now - before,
        })
        .collect();

    let [first, rest @ ..] = deltas.as_slice() else {
        return Ok(Narrative::NoComparableSectors {
            metric,
            latest_label: last_label.to_string(),
        });
    };
    let mut max_up = first;
    let mut max_down = first;
    for d in rest {
        // Strict comparisons keep the first sector on ties.
        if d.delta > max_up.delta {
            max_up = d;
        }
        if d.delta < max_down.delta {
            max_down = d;
        }
    }
    let (max_up, max_down) = (max_up.clone(), max_down.clone());

    Ok(Narrative::Comparison(Comparison {
        metric,
        sectors: view.sectors().into_iter().map(str::to_string).collect(),
        latest_label: last_label.to_string(),
        prev_label: prev_label.to_string(),
        avg_latest,
        deltas,
        max_up,
        max_down,
    }))
}

fn values_by_sector<'r>(
    rows: &[&'r Record],
    period: Period,
) -> Result<BTreeMap<&'r str, f64>, DashboardError> {
    let mut out = BTreeMap::new();
    for r in rows {
        if out.insert(r.sector.as_str(), r.value).is_some() {
            return Err(DashboardError::DuplicateRow {
                sector: r.sector.clone(),
                period,
            });
        }
    }
    Ok(out)
}

impl fmt::Display for Narrative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Narrative::InsufficientHistory { metric } => write!(
                f,
                "The chart shows the {} trend for the selected sectors, but there are too few \
                 periods to analyse change over time.",
                metric
            ),
            Narrative::NoComparableSectors {
                metric,
                latest_label,
            } => write!(
                f,
                "The chart shows {} for period {}, but no direct comparison with the previous \
                 period is available for the selected sectors.",
                metric, latest_label
            ),
            Narrative::Comparison(c) => {
                writeln!(
                    f,
                    "The chart shows the {} trend by sector for: {}.",
                    c.metric,
                    c.sectors.join(", ")
                )?;
                writeln!(
                    f,
                    "In period {}, the average {} was about {}.",
                    c.latest_label,
                    c.metric,
                    format_number(c.avg_latest, 2)
                )?;
                writeln!(f, "Compared with the previous period ({}):", c.prev_label)?;
                if c.max_up.sector == c.max_down.sector {
                    write!(
                        f,
                        "- Change for {}: {}",
                        c.max_up.sector,
                        format_signed(c.max_up.delta, 2)
                    )
                } else {
                    writeln!(
                        f,
                        "- Largest increase: {} ({})",
                        c.max_up.sector,
                        format_signed(c.max_up.delta, 2)
                    )?;
                    write!(
                        f,
                        "- Largest decrease: {} ({})",
                        c.max_down.sector,
                        format_signed(c.max_down.delta, 2)
                    )
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{filter, FilteredView};
    use crate::types::test_support::rec;

    fn view<'a>(records: &'a [Record], sectors: &[&str]) -> FilteredView<'a> {
        let sectors: Vec<String> = sectors.iter().map(|s| s.to_string()).collect();
        filter(records, "ADHB", &sectors)
    }

    fn comparison(n: Narrative) -> Comparison {
        match n {
            Narrative::Comparison(c) => c,
            other => panic!("expected a comparison, got {other:?}"),
        }
    }

    #[test]
    fn two_periods_with_clear_winner() {
        let records = vec![
            rec(2023, 1, "ADHB", "A", 100.0),
            rec(2023, 1, "ADHB", "B", 200.0),
            rec(2023, 2, "ADHB", "A", 150.0),
            rec(2023, 2, "ADHB", "B", 180.0),
        ];
        let c = comparison(narrate(&view(&records, &["A", "B"])).unwrap());
        assert_eq!(c.max_up.sector, "A");
        assert_eq!(c.max_up.delta, 50.0);
        assert_eq!(c.max_down.sector, "B");
        assert_eq!(c.max_down.delta, -20.0);
        assert_eq!(c.avg_latest, 165.0);
        assert_eq!(c.latest_label, "2023 Q2");
        assert_eq!(c.prev_label, "2023 Q1");

        let text = Narrative::Comparison(c).to_string();
        assert!(text.contains("ADHB"));
        assert!(text.contains("A, B"));
        assert!(text.contains("165.00"));
        assert!(text.contains("Largest increase: A (+50.00)"));
        assert!(text.contains("Largest decrease: B (-20.00)"));
        assert!(text.contains("2023 Q1"));
    }

    #[test]
    fn single_period_falls_back() {
        let records = vec![
            rec(2023, 1, "ADHB", "A", 100.0),
            rec(2023, 1, "ADHB", "B", 200.0),
        ];
        let n = narrate(&view(&records, &["A", "B"])).unwrap();
        assert_eq!(
            n,
            Narrative::InsufficientHistory {
                metric: "ADHB".into()
            }
        );
        assert!(n.to_string().contains("too few periods"));
    }

    #[test]
    fn empty_view_is_insufficient_history() {
        let records = vec![rec(2023, 1, "ADHB", "A", 100.0)];
        let n = narrate(&view(&records, &[])).unwrap();
        assert!(matches!(n, Narrative::InsufficientHistory { .. }));
    }

    #[test]
    fn disjoint_sectors_fall_back() {
        let records = vec![
            rec(2023, 1, "ADHB", "A", 100.0),
            rec(2023, 2, "ADHB", "B", 200.0),
        ];
        let n = narrate(&view(&records, &["A", "B"])).unwrap();
        assert_eq!(
            n,
            Narrative::NoComparableSectors {
                metric: "ADHB".into(),
                latest_label: "2023 Q2".into()
            }
        );
        assert!(n.to_string().contains("no direct comparison"));
    }

    #[test]
    fn single_common_sector_reported_once() {
        let records = vec![
            rec(2023, 1, "ADHB", "A", 10.0),
            rec(2023, 2, "ADHB", "A", 12.0),
        ];
        let c = comparison(narrate(&view(&records, &["A"])).unwrap());
        assert_eq!(c.max_up, c.max_down);
        assert_eq!(c.max_up.sector, "A");
        assert_eq!(c.max_up.delta, 2.0);

        let text = Narrative::Comparison(c).to_string();
        assert!(text.contains("Change for A: +2.00"));
        assert!(!text.contains("Largest increase"));
        assert!(!text.contains("Largest decrease"));
    }

    #[test]
    fn ties_go_to_the_alphabetically_first_sector() {
        // B is listed before A in the input on purpose.
        let records = vec![
            rec(2023, 1, "ADHB", "B", 0.0),
            rec(2023, 1, "ADHB", "A", 0.0),
            rec(2023, 1, "ADHB", "C", 0.0),
            rec(2023, 2, "ADHB", "B", 5.0),
            rec(2023, 2, "ADHB", "A", 5.0),
            rec(2023, 2, "ADHB", "C", -1.0),
        ];
        let c = comparison(narrate(&view(&records, &["A", "B", "C"])).unwrap());
        assert_eq!(c.max_up.sector, "A");
        assert_eq!(c.max_up.delta, 5.0);
        assert_eq!(c.max_down.sector, "C");
    }

    #[test]
    fn decrease_ties_go_to_the_alphabetically_first_sector() {
        let records = vec![
            rec(2023, 1, "ADHB", "C", 10.0),
            rec(2023, 1, "ADHB", "B", 10.0),
            rec(2023, 1, "ADHB", "A", 10.0),
            rec(2023, 2, "ADHB", "C", 12.0),
            rec(2023, 2, "ADHB", "B", 7.0),
            rec(2023, 2, "ADHB", "A", 7.0),
        ];
        let c = comparison(narrate(&view(&records, &["C", "B", "A"])).unwrap());
        assert_eq!(c.max_down.sector, "A");
        assert_eq!(c.max_down.delta, -3.0);
        assert_eq!(c.max_up.sector, "C");
        let text = Narrative::Comparison(c).to_string();
        assert!(text.contains("Largest decrease: A (-3.00)"));
    }

    #[test]
    fn only_common_sectors_are_compared() {
        let records = vec![
            rec(2022, 4, "ADHB", "A", 1.0),
            rec(2022, 4, "ADHB", "B", 1.0),
            rec(2023, 1, "ADHB", "B", 3.0),
            rec(2023, 1, "ADHB", "C", 100.0),
        ];
        let c = comparison(narrate(&view(&records, &["A", "B", "C"])).unwrap());
        let compared: Vec<&str> = c.deltas.iter().map(|d| d.sector.as_str()).collect();
        assert_eq!(compared, vec!["B"]);
        assert_eq!(c.avg_latest, 3.0);
        // The sector list names everything in the view.
        assert_eq!(c.sectors, vec!["A", "B", "C"]);
    }

    #[test]
    fn compares_latest_two_periods_even_across_gaps() {
        let records = vec![
            rec(2021, 1, "ADHB", "A", 1.0),
            rec(2021, 3, "ADHB", "A", 4.0),
            rec(2023, 2, "ADHB", "A", 10.0),
        ];
        let c = comparison(narrate(&view(&records, &["A"])).unwrap());
        assert_eq!(c.prev_label, "2021 Q3");
        assert_eq!(c.latest_label, "2023 Q2");
        assert_eq!(c.max_up.delta, 6.0);
    }

    #[test]
    fn duplicate_sector_in_period_is_an_error() {
        let records = vec![
            rec(2023, 1, "ADHB", "A", 1.0),
            rec(2023, 2, "ADHB", "A", 2.0),
            rec(2023, 2, "ADHB", "A", 3.0),
        ];
        let err = narrate(&view(&records, &["A"])).unwrap_err();
        assert!(matches!(err, DashboardError::DuplicateRow { .. }));
    }
}
