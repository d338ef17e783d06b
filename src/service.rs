//! Fetches that always hand back *something*.
//!
//! Pages only ever render "data present" or "data absent". [`Service`] turns the
//! client's tagged results into exactly that: on failure it logs the error,
//! raises one error notification, and returns an empty collection or `None`.

use crate::api::Client;
use crate::error::ApiError;
use crate::models::{
    CountryRecord, HistoricalRecord, StateRecord, StateSelection, SubmitReceipt, SubmittedForm,
};
use crate::notify::{Notification, Notifier};
use chrono::NaiveDate;

pub struct Service<N: Notifier> {
    client: Client,
    notifier: N,
}

impl<N: Notifier> Service<N> {
    pub fn new(client: Client, notifier: N) -> Self {
        Self { client, notifier }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    fn or_notify<T>(&self, result: Result<T, ApiError>, fallback: T, message: String) -> T {
        match result {
            Ok(v) => v,
            Err(e) => {
                if e.is_timeout() {
                    log::error!("API timeout: {e}");
                } else {
                    log::error!("API error: {e}");
                }
                self.notifier.notify(Notification::error(message));
                fallback
            }
        }
    }

    pub fn fetch_all_states(&self) -> Vec<StateRecord> {
        self.or_notify(
            self.client.fetch_all_states(),
            Vec::new(),
            "Falha ao buscar dados dos estados".into(),
        )
    }

    /// `None` for [`StateSelection::AllStates`], unknown codes, and failures alike.
    pub fn fetch_state_data(&self, selection: &StateSelection) -> Option<StateRecord> {
        self.or_notify(
            self.client.fetch_state_data(selection),
            None,
            format!("Falha ao buscar dados para {selection}"),
        )
    }

    pub fn fetch_historical_by_date(&self, date: NaiveDate) -> Option<HistoricalRecord> {
        self.or_notify(
            self.client.fetch_historical_by_date(date),
            None,
            format!("Falha ao buscar dados para a data {}", date.format("%Y-%m-%d")),
        )
    }

    pub fn fetch_countries(&self) -> Vec<CountryRecord> {
        self.or_notify(
            self.client.fetch_countries(),
            Vec::new(),
            "Falha ao buscar dados dos países".into(),
        )
    }

    pub fn submit_form(&self, form: SubmittedForm) -> SubmitReceipt {
        let receipt = self.client.submit_form(form);
        self.notifier
            .notify(Notification::success("Dados enviados com sucesso!"));
        receipt
    }
}
