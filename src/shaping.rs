//! Derived views over fetched collections: totals, top-N subsets, chart rows.
//!
//! Everything here is a pure function of its input slice; nothing is sorted or
//! mutated in place.

use crate::chart::ChartDatum;
use crate::models::{CountryRecord, StateRecord};
use serde::Serialize;

/// Size of the "Top 10" chart datasets.
pub const TOP_N: usize = 10;

/// Dashboard totals summed across all states.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Totals {
    pub cases: f64,
    pub deaths: f64,
    pub suspects: f64,
    pub refuses: f64,
}

pub fn overview_totals(states: &[StateRecord]) -> Totals {
    states.iter().fold(Totals::default(), |acc, s| Totals {
        cases: acc.cases + s.confirmed_cases,
        deaths: acc.deaths + s.deaths,
        suspects: acc.suspects + s.suspected_cases,
        refuses: acc.refuses + s.discarded_cases,
    })
}

/// Sort descending by `key` and keep the first `n`.
///
/// The sort is stable, but callers should not rely on the order of ties.
pub fn top_n_by<T, F>(records: &[T], n: usize, key: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> f64,
{
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| key(b).total_cmp(&key(a)));
    sorted.truncate(n);
    sorted
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateMetric {
    Cases,
    Deaths,
    Suspects,
    Refuses,
}

impl StateMetric {
    pub fn value(self, s: &StateRecord) -> f64 {
        match self {
            StateMetric::Cases => s.confirmed_cases,
            StateMetric::Deaths => s.deaths,
            StateMetric::Suspects => s.suspected_cases,
            StateMetric::Refuses => s.discarded_cases,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountryMetric {
    Cases,
    Confirmed,
    Deaths,
    Recovered,
}

impl CountryMetric {
    pub fn value(self, c: &CountryRecord) -> f64 {
        match self {
            CountryMetric::Cases => c.reported_cases,
            CountryMetric::Confirmed => c.confirmed_cases,
            CountryMetric::Deaths => c.deaths,
            CountryMetric::Recovered => c.recovered,
        }
    }
}

/// Minimal chart shape for a state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateChartRow {
    pub state: String,
    pub cases: f64,
    pub deaths: f64,
}

impl From<&StateRecord> for StateChartRow {
    fn from(s: &StateRecord) -> Self {
        Self {
            state: s.state_name.clone(),
            cases: s.confirmed_cases,
            deaths: s.deaths,
        }
    }
}

impl ChartDatum for StateChartRow {
    fn category(&self) -> &str {
        &self.state
    }

    fn value(&self, field: &str) -> Option<f64> {
        match field {
            "cases" => Some(self.cases),
            "deaths" => Some(self.deaths),
            _ => None,
        }
    }
}

/// Minimal chart shape for a country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryChartRow {
    pub country: String,
    pub cases: f64,
    pub deaths: f64,
    pub recovered: f64,
}

impl From<&CountryRecord> for CountryChartRow {
    fn from(c: &CountryRecord) -> Self {
        let country = if c.country_name.trim().is_empty() {
            "Unknown".to_string()
        } else {
            c.country_name.clone()
        };
        Self {
            country,
            cases: c.reported_cases,
            deaths: c.deaths,
            recovered: c.recovered,
        }
    }
}

impl ChartDatum for CountryChartRow {
    fn category(&self) -> &str {
        &self.country
    }

    fn value(&self, field: &str) -> Option<f64> {
        match field {
            "cases" => Some(self.cases),
            "deaths" => Some(self.deaths),
            "recovered" => Some(self.recovered),
            _ => None,
        }
    }
}

/// Top [`TOP_N`] states by `metric`, as chart rows.
pub fn top_states_by(states: &[StateRecord], metric: StateMetric) -> Vec<StateChartRow> {
    top_n_by(states, TOP_N, |s| metric.value(s))
        .iter()
        .map(StateChartRow::from)
        .collect()
}

/// Top [`TOP_N`] countries by `metric`, as chart rows.
pub fn top_countries_by(countries: &[CountryRecord], metric: CountryMetric) -> Vec<CountryChartRow> {
    top_n_by(countries, TOP_N, |c| metric.value(c))
        .iter()
        .map(CountryChartRow::from)
        .collect()
}
