use crate::infra::{command_service, open_store, parse_date};
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use user_registry::config::AppConfig;
use user_registry::error::AppError;
use user_registry::registration::{
    import_candidates, Candidate, ImportReport, RegistrationOutcome, UserRecord,
};
use user_registry::telemetry;

#[derive(Args, Debug)]
pub(crate) struct RegisterArgs {
    /// User name (5 to 16 characters)
    #[arg(long)]
    pub(crate) name: String,
    /// Date of birth, D/M/YYYY or YYYY-MM-DD
    #[arg(long)]
    pub(crate) dob: String,
    /// Email address
    #[arg(long)]
    pub(crate) email: String,
    /// Password (5 to 16 characters, one uppercase letter, two digits)
    #[arg(long)]
    pub(crate) password: String,
    /// Evaluation date for the age check (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Override the configured user data file
    #[arg(long)]
    pub(crate) store: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// CSV file with name,date_of_birth,email,password columns
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Evaluation date for the age check (defaults to today)
    #[arg(long, value_parser = parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Override the configured user data file
    #[arg(long)]
    pub(crate) store: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ListUsersArgs {
    /// Emit JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
    /// Override the configured user data file
    #[arg(long)]
    pub(crate) store: Option<PathBuf>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub(crate) struct UserSummary {
    pub(crate) name: String,
    pub(crate) email: String,
}

impl From<&UserRecord> for UserSummary {
    fn from(record: &UserRecord) -> Self {
        Self {
            name: record.name.clone(),
            email: record.email.clone(),
        }
    }
}

fn load_config() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

pub(crate) fn run_register(args: RegisterArgs) -> Result<(), AppError> {
    let RegisterArgs {
        name,
        dob,
        email,
        password,
        today,
        store,
    } = args;

    let config = load_config()?;
    let service = command_service(open_store(&config, store), today);
    let outcome = service.register(Candidate::new(name, dob, email, password));

    let mut stdout = io::stdout().lock();
    render_outcome(&mut stdout, outcome)?;

    if outcome.is_success() {
        Ok(())
    } else {
        Err(AppError::Rejected(outcome))
    }
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let ImportArgs { csv, today, store } = args;

    let config = load_config()?;
    let service = command_service(open_store(&config, store), today);
    let reader = BufReader::new(File::open(&csv)?);
    let report = import_candidates(reader, &service)?;

    tracing::info!(
        file = %csv.display(),
        registered = report.registered(),
        rejected = report.rejected(),
        "import finished"
    );

    let mut stdout = io::stdout().lock();
    render_import_report(&mut stdout, &report)?;
    Ok(())
}

pub(crate) fn run_list_users(args: ListUsersArgs) -> Result<(), AppError> {
    let ListUsersArgs { json, store } = args;

    let config = load_config()?;
    let records = command_service(open_store(&config, store), None).users()?;
    let users: Vec<UserSummary> = records.iter().map(UserSummary::from).collect();

    let mut stdout = io::stdout().lock();
    if json {
        let payload = serde_json::to_string_pretty(&users).map_err(io::Error::from)?;
        writeln!(stdout, "{payload}")?;
    } else {
        render_users(&mut stdout, &users)?;
    }
    Ok(())
}

pub(crate) fn render_outcome<W: Write>(
    out: &mut W,
    outcome: RegistrationOutcome,
) -> io::Result<()> {
    writeln!(out, "{}: {}", outcome.label(), outcome.message())
}

pub(crate) fn render_import_report<W: Write>(out: &mut W, report: &ImportReport) -> io::Result<()> {
    for row in &report.rows {
        writeln!(out, "{:>4}  {:<16}  {}", row.line, row.name, row.outcome.label())?;
    }
    writeln!(
        out,
        "{} registered, {} rejected",
        report.registered(),
        report.rejected()
    )
}

pub(crate) fn render_users<W: Write>(out: &mut W, users: &[UserSummary]) -> io::Result<()> {
    if users.is_empty() {
        return writeln!(out, "no users registered");
    }
    for user in users {
        writeln!(out, "{:<16}  {}", user.name, user.email)?;
    }
    Ok(())
}
