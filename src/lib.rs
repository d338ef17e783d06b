//! covid_painel
//!
//! A small dashboard library for COVID-19 figures in Brazil and worldwide, fed by
//! the public `covid19-brazil-api`. Pairs with the `covid-painel` CLI.
//!
//! ### Features
//! - Fetch every Brazilian state, a single state, a past day's national totals,
//!   or the per-country list
//! - Normalize messy upstream counts (missing, `null`, text) to plain numbers
//! - Shape page views: overview totals, top-10 rankings, paginated searchable tables
//! - Render bar/line charts to SVG/PNG, or as text for terminals
//! - Validate and (simulated) submit a manual data-entry form
//! - Save states or countries as CSV or JSON
//!
//! ### Example
//! ```no_run
//! use covid_painel::{Client, Service, notify::LogNotifier, pages::OverviewView};
//!
//! let service = Service::new(Client::default(), LogNotifier);
//! let states = service.fetch_all_states();
//! let view = OverviewView::shape(&states);
//! println!("{}", view.totals.cases);
//! covid_painel::storage::save_states_csv(&states, "estados.csv")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod api;
pub mod chart;
pub mod error;
pub mod form;
pub mod format;
pub mod models;
pub mod notify;
pub mod pages;
pub mod query;
pub mod service;
pub mod shaping;
pub mod storage;
pub mod table;

pub use api::Client;
pub use error::{ApiError, FormError};
pub use models::{
    CountryRecord, HistoricalRecord, StateRecord, StateSelection, SubmitReceipt, SubmittedForm,
};
pub use service::Service;
