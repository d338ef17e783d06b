//! Page views: what each dashboard page shows, derived from raw fetch results.
//!
//! Every view is built by a pure `shape` function from the latest snapshot, so
//! there is no separate state to keep in sync with the data.

use crate::chart::{ChartDatum, ChartSpec, Series, render_chart_text};
use crate::format::{format_count, format_timestamp};
use crate::models::{CountryRecord, StateRecord, StateSelection};
use crate::shaping::{
    CountryChartRow, CountryMetric, StateChartRow, StateMetric, Totals, overview_totals,
    top_countries_by, top_states_by,
};
use crate::table::{Cell, Column, DataTable, FieldValue, Fields, Tone};
use num_format::Locale;

pub const BLUE: &str = "#3b82f6";
pub const RED: &str = "#ef4444";
pub const YELLOW: &str = "#eab308";
pub const GREEN: &str = "#22c55e";

impl Fields for StateRecord {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "uid" => FieldValue::Number(self.id as f64),
            "uf" => FieldValue::Text(&self.state_code),
            "state" => FieldValue::Text(&self.state_name),
            "cases" => FieldValue::Number(self.confirmed_cases),
            "deaths" => FieldValue::Number(self.deaths),
            "suspects" => FieldValue::Number(self.suspected_cases),
            "refuses" => FieldValue::Number(self.discarded_cases),
            "datetime" => FieldValue::Text(&self.updated_at),
            _ => FieldValue::Missing,
        }
    }
}

impl Fields for CountryRecord {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "country" => FieldValue::Text(&self.country_name),
            "cases" => FieldValue::Number(self.reported_cases),
            "confirmed" => FieldValue::Number(self.confirmed_cases),
            "deaths" => FieldValue::Number(self.deaths),
            "recovered" => FieldValue::Number(self.recovered),
            "updated_at" => FieldValue::Text(&self.updated_at),
            _ => FieldValue::Missing,
        }
    }
}

/// A headline number ("stat card").
#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub title: &'static str,
    pub value: f64,
    /// Accent color, `#rrggbb`.
    pub accent: &'static str,
}

impl StatCard {
    pub fn to_text(&self, locale: &Locale, loading: bool) -> String {
        let value = if loading {
            "░░░░░░".to_string()
        } else {
            format_count(self.value, locale)
        };
        format!("{}: {}", self.title, value)
    }
}

fn stat_cards(cases: f64, deaths: f64, suspects: f64, refuses: f64) -> Vec<StatCard> {
    vec![
        StatCard {
            title: "Casos Confirmados",
            value: cases,
            accent: BLUE,
        },
        StatCard {
            title: "Óbitos",
            value: deaths,
            accent: RED,
        },
        StatCard {
            title: "Casos Suspeitos",
            value: suspects,
            accent: YELLOW,
        },
        StatCard {
            title: "Casos Descartados",
            value: refuses,
            accent: GREEN,
        },
    ]
}

fn count_cell(v: f64, locale: &Locale, tone: Tone) -> Cell {
    Cell::toned(format_count(v, locale), tone)
}

/// Columns of the States table.
pub fn state_columns() -> Vec<Column<StateRecord>> {
    vec![
        Column::new("Estado", "state"),
        Column::new("UF", "uf"),
        Column::with_cell("Casos", "cases", |s: &StateRecord, l: &Locale| count_cell(s.confirmed_cases, l, Tone::Strong)),
        Column::with_cell("Óbitos", "deaths", |s: &StateRecord, l: &Locale| count_cell(s.deaths, l, Tone::Danger)),
        Column::with_cell("Suspeitos", "suspects", |s: &StateRecord, l: &Locale| {
            // zero suspects is shown as unavailable
            if s.suspected_cases == 0.0 {
                Cell::plain("N/A")
            } else {
                count_cell(s.suspected_cases, l, Tone::Plain)
            }
        }),
        Column::with_cell("Data Atualização", "datetime", |s: &StateRecord, _: &Locale| {
            Cell::plain(format_timestamp(&s.updated_at))
        }),
    ]
}

/// Columns of the Countries table.
pub fn country_columns() -> Vec<Column<CountryRecord>> {
    vec![
        Column::new("País", "country"),
        Column::with_cell("Casos", "cases", |c: &CountryRecord, l: &Locale| count_cell(c.reported_cases, l, Tone::Strong)),
        Column::with_cell("Confirmados", "confirmed", |c: &CountryRecord, l: &Locale| {
            count_cell(c.confirmed_cases, l, Tone::Strong)
        }),
        Column::with_cell("Óbitos", "deaths", |c: &CountryRecord, l: &Locale| count_cell(c.deaths, l, Tone::Danger)),
        Column::with_cell("Recuperados", "recovered", |c: &CountryRecord, l: &Locale| {
            count_cell(c.recovered, l, Tone::Success)
        }),
        Column::with_cell("Atualização", "updated_at", |c: &CountryRecord, _: &Locale| {
            Cell::plain(format_timestamp(&c.updated_at))
        }),
    ]
}

/// Overview ("Dashboard COVID-19"): national totals and the top states.
#[derive(Debug, Clone, PartialEq)]
pub struct OverviewView {
    pub totals: Totals,
    /// Top 10 states by confirmed cases; feeds both overview charts.
    pub top_states: Vec<StateChartRow>,
}

impl OverviewView {
    pub const TITLE: &'static str = "Dashboard COVID-19";

    pub fn shape(states: &[StateRecord]) -> Self {
        Self {
            totals: overview_totals(states),
            top_states: top_states_by(states, StateMetric::Cases),
        }
    }

    pub fn stat_cards(&self) -> Vec<StatCard> {
        let t = &self.totals;
        stat_cards(t.cases, t.deaths, t.suspects, t.refuses)
    }

    pub fn charts() -> [ChartSpec; 2] {
        [
            ChartSpec::bar(
                "Top 10 Estados - Casos Confirmados",
                "state",
                vec![Series {
                    field: "cases",
                    color: BLUE,
                    label: "Casos",
                }],
            ),
            ChartSpec::bar(
                "Top 10 Estados - Óbitos",
                "state",
                vec![Series {
                    field: "deaths",
                    color: RED,
                    label: "Óbitos",
                }],
            ),
        ]
    }

    pub fn to_text(&self, locale: &Locale, loading: bool, color: bool) -> String {
        let mut out = format!("{}\n\n", Self::TITLE);
        for card in self.stat_cards() {
            out.push_str(&card.to_text(locale, loading));
            out.push('\n');
        }
        for spec in Self::charts() {
            out.push('\n');
            out.push_str(&render_chart_text(&self.top_states, &spec, locale, loading, color));
        }
        out
    }
}

/// An entry of the state selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: StateSelection,
    pub label: String,
}

/// States page ("Dados por Estado").
#[derive(Debug, Clone, PartialEq)]
pub struct StatesView {
    pub options: Vec<SelectOption>,
    /// Stat cards for the selected state, once loaded.
    pub detail: Option<StateDetail>,
    pub rows: Vec<StateRecord>,
    pub table_title: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StateDetail {
    pub cards: Vec<StatCard>,
    pub updated_at: String,
}

impl StatesView {
    pub const TITLE: &'static str = "Dados por Estado";

    /// `all` is the full collection, `detail` the fetched record for a specific selection.
    pub fn shape(
        all: &[StateRecord],
        selection: Option<&StateSelection>,
        detail: Option<&StateRecord>,
    ) -> Self {
        let mut options = vec![SelectOption {
            value: StateSelection::AllStates,
            label: "Todos os estados".into(),
        }];
        options.extend(all.iter().map(|s| SelectOption {
            value: StateSelection::Specific(s.state_code.to_ascii_uppercase()),
            label: format!("{} ({})", s.state_name, s.state_code),
        }));

        let (rows, table_title, detail) = match selection {
            Some(StateSelection::AllStates) => (all.to_vec(), "Todos os Estados".to_string(), None),
            Some(StateSelection::Specific(code)) => {
                let name = all
                    .iter()
                    .find(|s| s.state_code.eq_ignore_ascii_case(code))
                    .map(|s| s.state_name.as_str())
                    .unwrap_or(code.as_str());
                let cards = detail.map(|d| StateDetail {
                    cards: stat_cards(
                        d.confirmed_cases,
                        d.deaths,
                        d.suspected_cases,
                        d.discarded_cases,
                    ),
                    updated_at: format_timestamp(&d.updated_at),
                });
                (
                    detail.cloned().into_iter().collect(),
                    format!("Dados de {name}"),
                    cards,
                )
            }
            None => (Vec::new(), "Selecione um estado".to_string(), None),
        };

        Self {
            options,
            detail,
            rows,
            table_title,
        }
    }

    /// The table waits on the collection, and on the detail fetch unless showing all states.
    pub fn table_loading(
        selection: Option<&StateSelection>,
        all_loading: bool,
        detail_loading: bool,
    ) -> bool {
        all_loading || (selection != Some(&StateSelection::AllStates) && detail_loading)
    }

    pub fn table(&self) -> DataTable<StateRecord> {
        DataTable::new(state_columns(), self.rows.clone())
            .with_search_field("state")
            .with_title(self.table_title.clone())
    }
}

/// Countries page ("Dados Globais").
#[derive(Debug, Clone, PartialEq)]
pub struct CountriesView {
    pub rows: Vec<CountryRecord>,
    /// Top 10 countries by deaths.
    pub top_deaths: Vec<CountryChartRow>,
}

impl CountriesView {
    pub const TITLE: &'static str = "Dados Globais";
    pub const TABLE_TITLE: &'static str = "Todos os Países";

    pub fn shape(countries: &[CountryRecord]) -> Self {
        Self {
            rows: countries.to_vec(),
            top_deaths: top_countries_by(countries, CountryMetric::Deaths),
        }
    }

    pub fn chart() -> ChartSpec {
        ChartSpec::bar(
            "Top 10 Países - Óbitos",
            "country",
            vec![Series {
                field: "deaths",
                color: RED,
                label: "Óbitos",
            }],
        )
    }

    pub fn table(&self) -> DataTable<CountryRecord> {
        DataTable::new(country_columns(), self.rows.clone())
            .with_search_field("country")
            .with_title(Self::TABLE_TITLE)
    }
}

/// Category labels in chart order; handy for checking what a chart will show.
pub fn chart_categories<D: ChartDatum>(rows: &[D]) -> Vec<&str> {
    rows.iter().map(|r| r.category()).collect()
}
