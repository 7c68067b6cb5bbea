// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Net-worth trend built from independently dated asset histories.
//!
//! The trend is evaluated on the union of every snapshot date. At each date
//! an asset contributes the value of its latest snapshot on or before that
//! date, and nothing before its first snapshot. Liabilities subtract.

use crate::error::Result;
use crate::models::{Asset, HistoryPoint};
use crate::money;
use crate::utils::parse_history_date;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: Decimal,
}

/// A history with parsed dates, sorted by date. Snapshots sharing a date
/// keep their append order, so the last one wins on lookup.
#[derive(Debug, Clone, Default)]
pub struct Series(Vec<(NaiveDate, Decimal)>);

impl Series {
    pub fn from_history(history: &[HistoryPoint], today: NaiveDate) -> Self {
        let mut points: Vec<(NaiveDate, Decimal)> = history
            .iter()
            .filter_map(|p| match parse_history_date(&p.date, today) {
                Some(d) => Some((d, p.value)),
                None => {
                    warn!(date = %p.date, "skipping history point with unparseable date");
                    None
                }
            })
            .collect();
        points.sort_by_key(|(d, _)| *d);
        Series(points)
    }

    /// Carry-forward lookup: latest value dated on or before `date`.
    pub fn value_at(&self, date: NaiveDate) -> Option<Decimal> {
        let idx = self.0.partition_point(|(d, _)| *d <= date);
        idx.checked_sub(1).map(|i| self.0[i].1)
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.0.iter().map(|(d, _)| *d)
    }
}

pub fn net_worth_trend<F>(
    assets: &[Asset],
    is_liability: F,
    today: NaiveDate,
) -> Result<Vec<TrendPoint>>
where
    F: Fn(&str) -> bool,
{
    let series: Vec<(bool, Series)> = assets
        .iter()
        .map(|a| {
            (
                is_liability(&a.category),
                Series::from_history(&a.history, today),
            )
        })
        .collect();

    let dates: BTreeSet<NaiveDate> = series.iter().flat_map(|(_, s)| s.dates()).collect();

    dates
        .into_iter()
        .map(|date| {
            let value = series
                .iter()
                .try_fold(Decimal::ZERO, |acc, (liability, s)| {
                    let v = s.value_at(date).unwrap_or(Decimal::ZERO);
                    if *liability {
                        money::sub(acc, v)
                    } else {
                        money::add(acc, v)
                    }
                })?;
            Ok(TrendPoint { date, value })
        })
        .collect()
}

/// Headline numbers over a trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendSummary {
    pub current: Decimal,
    pub highest: Decimal,
    pub lowest: Decimal,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Change from the first to the last point.
    pub change: Decimal,
}

impl TrendSummary {
    pub fn from_points(points: &[TrendPoint]) -> Result<Self> {
        let (Some(first), Some(last)) = (points.first(), points.last()) else {
            return Ok(TrendSummary {
                current: Decimal::ZERO,
                highest: Decimal::ZERO,
                lowest: Decimal::ZERO,
                start_date: None,
                end_date: None,
                change: Decimal::ZERO,
            });
        };
        let highest = points.iter().map(|p| p.value).max().unwrap_or(last.value);
        let lowest = points.iter().map(|p| p.value).min().unwrap_or(last.value);
        Ok(TrendSummary {
            current: last.value,
            highest,
            lowest,
            start_date: Some(first.date),
            end_date: Some(last.date),
            change: money::sub(last.value, first.value)?,
        })
    }
}
