use anyhow::{Result, anyhow};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use covid_painel::chart::{ChartSpec, render_chart, render_chart_text};
use covid_painel::form::FormInput;
use covid_painel::format::{DEFAULT_LOCALE_TAG, format_count, format_long_date, map_locale};
use covid_painel::notify::LogNotifier;
use covid_painel::pages::{CountriesView, OverviewView, StatesView};
use covid_painel::query::{QueryCache, QueryKey};
use covid_painel::{Client, CountryRecord, Service, StateRecord, StateSelection, storage};
use num_format::Locale;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    name = "covid-painel",
    version,
    about = "COVID-19 figures for Brazil and the world, from covid19-brazil-api"
)]
struct Cli {
    /// API base URL.
    #[arg(long, env = "COVID_API_BASE_URL", global = true)]
    base_url: Option<String>,
    /// Locale for number formatting (pt, en, de, fr, es, it, nl).
    #[arg(long, default_value = DEFAULT_LOCALE_TAG, global = true)]
    locale: String,
    /// Disable ANSI colors.
    #[arg(long, default_value_t = false, global = true)]
    no_color: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// National totals and the top 10 states.
    Overview(OverviewArgs),
    /// Per-state table, or one state's figures.
    States(StatesArgs),
    /// Per-country table and the top 10 by deaths.
    Countries(CountriesArgs),
    /// Brazil-wide figures for a past day.
    Historical(HistoricalArgs),
    /// Validate and submit a manual entry (simulated).
    Submit(SubmitArgs),
}

#[derive(ValueEnum, Clone, Debug)]
enum OutFormat {
    Csv,
    Json,
}

#[derive(Args, Debug)]
struct ChartArgs {
    /// Write a chart to the given path (.svg or .png).
    #[arg(long)]
    chart: Option<PathBuf>,
    /// Width of the chart (default 1000).
    #[arg(long, default_value_t = 1000)]
    width: u32,
    /// Height of the chart (default 600).
    #[arg(long, default_value_t = 600)]
    height: u32,
}

#[derive(Args, Debug)]
struct OverviewArgs {
    #[command(flatten)]
    chart: ChartArgs,
}

#[derive(Args, Debug)]
struct TableArgs {
    /// Filter rows by name (case-insensitive substring).
    #[arg(short, long)]
    search: Option<String>,
    /// Page to show (1-based, clamped).
    #[arg(short, long, default_value_t = 1)]
    page: usize,
    /// Save the rows to file (format inferred by --format or extension).
    #[arg(long)]
    out: Option<PathBuf>,
    /// Output format (csv or json). If omitted, inferred from --out extension.
    #[arg(long, value_enum)]
    format: Option<OutFormat>,
}

#[derive(Args, Debug)]
struct StatesArgs {
    /// Two-letter state code, e.g. SP.
    #[arg(long, conflicts_with = "all")]
    uf: Option<String>,
    /// Show every state.
    #[arg(long, default_value_t = false)]
    all: bool,
    #[command(flatten)]
    table: TableArgs,
}

#[derive(Args, Debug)]
struct CountriesArgs {
    #[command(flatten)]
    table: TableArgs,
    #[command(flatten)]
    chart: ChartArgs,
}

#[derive(Args, Debug)]
struct HistoricalArgs {
    /// Day to look up (YYYY-MM-DD).
    #[arg(short = 'd', long)]
    date: String,
}

#[derive(Args, Debug)]
struct SubmitArgs {
    #[arg(long, default_value = "")]
    state: String,
    #[arg(long, default_value = "")]
    cases: String,
    #[arg(long, default_value = "")]
    confirmed: String,
    #[arg(long, default_value = "")]
    deaths: String,
    #[arg(long, default_value = "")]
    recovered: String,
    /// YYYY-MM-DD or DD/MM/YYYY.
    #[arg(long, default_value = "")]
    date: String,
}

/// Service plus the per-process request caches.
struct Session {
    service: Service<LogNotifier>,
    states: QueryCache<Vec<StateRecord>>,
    state: QueryCache<Option<StateRecord>>,
    countries: QueryCache<Vec<CountryRecord>>,
    locale: &'static Locale,
    color: bool,
}

impl Session {
    fn all_states(&mut self) -> Vec<StateRecord> {
        let service = &self.service;
        self.states
            .fetch(QueryKey::States, || service.fetch_all_states())
    }

    fn state_detail(&mut self, selection: &StateSelection) -> Option<StateRecord> {
        let code = selection.code()?;
        let service = &self.service;
        self.state
            .fetch(QueryKey::state(code), || service.fetch_state_data(selection))
    }

    fn countries(&mut self) -> Vec<CountryRecord> {
        let service = &self.service;
        self.countries
            .fetch(QueryKey::Countries, || service.fetch_countries())
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();
    let cli = Cli::parse();

    let mut client = Client::default();
    if let Some(url) = cli.base_url.as_deref() {
        client = client.with_base_url(url);
    }
    let mut session = Session {
        service: Service::new(client, LogNotifier),
        states: QueryCache::new(),
        state: QueryCache::new(),
        countries: QueryCache::new(),
        locale: map_locale(&cli.locale),
        color: !cli.no_color && std::io::stdout().is_terminal(),
    };

    match cli.cmd {
        Command::Overview(args) => cmd_overview(&mut session, args, &cli.locale),
        Command::States(args) => cmd_states(&mut session, args),
        Command::Countries(args) => cmd_countries(&mut session, args, &cli.locale),
        Command::Historical(args) => cmd_historical(&session, args),
        Command::Submit(args) => cmd_submit(&session, args),
    }
}

fn cmd_overview(session: &mut Session, args: OverviewArgs, locale_tag: &str) -> Result<()> {
    let states = session.all_states();
    let view = OverviewView::shape(&states);
    print!("{}", view.to_text(session.locale, false, session.color));

    if let Some(path) = args.chart.chart.as_ref() {
        let [cases, deaths] = OverviewView::charts();
        let spec = ChartSpec::bar(
            "Top 10 Estados",
            "state",
            [cases.series, deaths.series].concat(),
        );
        render_chart(
            &view.top_states,
            &spec,
            path,
            args.chart.width,
            args.chart.height,
            locale_tag,
            false,
        )?;
        eprintln!("Wrote chart to {}", path.display());
    }
    Ok(())
}

fn cmd_states(session: &mut Session, args: StatesArgs) -> Result<()> {
    let selection = if args.all {
        Some(StateSelection::AllStates)
    } else {
        args.uf
            .as_deref()
            .map(|s| s.parse::<StateSelection>().map_err(|e| anyhow!(e)))
            .transpose()?
    };

    let all = session.all_states();
    let detail = match selection.as_ref() {
        Some(sel) => session.state_detail(sel),
        None => None,
    };
    let view = StatesView::shape(&all, selection.as_ref(), detail.as_ref());

    println!("{}\n", StatesView::TITLE);
    if selection.is_none() {
        println!("Estados disponíveis:");
        for opt in &view.options {
            println!("  {:<4} {}", opt.value.to_string(), opt.label);
        }
        println!();
    }
    if let Some(d) = &view.detail {
        for card in &d.cards {
            println!("{}", card.to_text(session.locale, false));
        }
        println!("Última atualização: {}\n", d.updated_at);
    }

    let mut table = view.table();
    apply_table_args(&mut table, &args.table);
    print!("{}", table.render(false, session.locale).to_text(session.color));

    if let Some(path) = args.table.out.as_ref() {
        match out_format(path, args.table.format.as_ref())? {
            OutFormat::Csv => storage::save_states_csv(&view.rows, path)?,
            OutFormat::Json => storage::save_states_json(&view.rows, path)?,
        }
        eprintln!("Saved {} rows to {}", view.rows.len(), path.display());
    }
    Ok(())
}

fn cmd_countries(session: &mut Session, args: CountriesArgs, locale_tag: &str) -> Result<()> {
    let countries = session.countries();
    let view = CountriesView::shape(&countries);
    let spec = CountriesView::chart();

    println!("{}\n", CountriesView::TITLE);
    println!(
        "{}",
        render_chart_text(&view.top_deaths, &spec, session.locale, false, session.color)
    );

    let mut table = view.table();
    apply_table_args(&mut table, &args.table);
    print!("{}", table.render(false, session.locale).to_text(session.color));

    if let Some(path) = args.chart.chart.as_ref() {
        render_chart(
            &view.top_deaths,
            &spec,
            path,
            args.chart.width,
            args.chart.height,
            locale_tag,
            false,
        )?;
        eprintln!("Wrote chart to {}", path.display());
    }

    if let Some(path) = args.table.out.as_ref() {
        match out_format(path, args.table.format.as_ref())? {
            OutFormat::Csv => storage::save_countries_csv(&view.rows, path)?,
            OutFormat::Json => storage::save_countries_json(&view.rows, path)?,
        }
        eprintln!("Saved {} rows to {}", view.rows.len(), path.display());
    }
    Ok(())
}

fn cmd_historical(session: &Session, args: HistoricalArgs) -> Result<()> {
    let date = NaiveDate::parse_from_str(args.date.trim(), "%Y-%m-%d")
        .map_err(|_| anyhow!("invalid --date, expected YYYY-MM-DD"))?;
    match session.service.fetch_historical_by_date(date) {
        Some(day) => {
            println!("Brasil em {}\n", format_long_date(date));
            for (label, v) in [
                ("Casos", day.cases),
                ("Confirmados", day.confirmed_cases),
                ("Óbitos", day.deaths),
                ("Recuperados", day.recovered),
            ] {
                println!("{label}: {}", format_count(v, session.locale));
            }
        }
        None => println!("Sem dados para {}", format_long_date(date)),
    }
    Ok(())
}

fn cmd_submit(session: &Session, args: SubmitArgs) -> Result<()> {
    let input = FormInput {
        state: args.state,
        cases: args.cases,
        confirmed: args.confirmed,
        deaths: args.deaths,
        recovered: args.recovered,
        date: args.date,
    };
    let form = match input.validate() {
        Ok(form) => form,
        Err(e) => {
            for err in &e.errors {
                eprintln!("{err}");
            }
            return Err(e.into());
        }
    };
    let receipt = session.service.submit_form(form);
    println!("{}", serde_json::to_string_pretty(&receipt)?);
    Ok(())
}

fn apply_table_args<T: covid_painel::table::Fields>(
    table: &mut covid_painel::table::DataTable<T>,
    args: &TableArgs,
) {
    if let Some(q) = args.search.as_deref() {
        table.set_query(q);
    }
    table.go_to_page(args.page);
}

fn out_format(path: &Path, format: Option<&OutFormat>) -> Result<OutFormat> {
    if let Some(f) = format {
        return Ok(f.clone());
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("csv")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => Ok(OutFormat::Csv),
        "json" => Ok(OutFormat::Json),
        other => anyhow::bail!("unsupported format: {}", other),
    }
}
