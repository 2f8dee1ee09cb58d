// Composition root for the `timesheet` command line client.
//
// Responsibilities:
// - Read config from the environment (and `.env`).
// - Wire the reqwest transport and the file token store into the API facades.
// - Run one command, report failures through tracing and a non-zero exit status.

mod cli;
mod render;

use anyhow::{Context, bail};
use chrono::{Local, NaiveDate};
use cli::{Command, Period, USAGE};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, fmt};

use timesheet_client::adapters::file::file_token_store::FileTokenStore;
use timesheet_client::adapters::reqwest::reqwest_transport::ReqwestTransport;
use timesheet_client::application::config::ClientConfig;
use timesheet_client::application::facades::api::TimesheetApi;
use timesheet_client::application::forms::hotel_form::HotelForm;
use timesheet_client::application::forms::project_form::ProjectForm;
use timesheet_client::application::pages::admin::AdminPage;
use timesheet_client::application::pages::earnings::EarningsPage;
use timesheet_client::application::pages::expenses::ExpensesPage;
use timesheet_client::application::pages::hotels::HotelsPage;
use timesheet_client::application::pages::projects::ProjectsPage;
use timesheet_client::application::pages::receipts::{PeriodFilter, ReceiptsPage};
use timesheet_client::application::pages::week_view::WeekViewPage;
use timesheet_client::application::transfer::export::export_owned;
use timesheet_client::application::transfer::import::{ImportPlan, SourceFile};
use timesheet_client::core::entities::receipt::UploadFile;
use timesheet_client::core::entities::user::Role;

#[tokio::main]
async fn main() -> ExitCode {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(error = %format!("{error:#}"), "command failed");
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn connect() -> anyhow::Result<TimesheetApi> {
    let config = ClientConfig::from_env()?;
    let tokens = FileTokenStore::open(&config.token_file)
        .with_context(|| format!("opening session file {}", config.token_file.display()))?;
    let transport = ReqwestTransport::new()?;
    tracing::debug!(api_base = %config.api_base, "client configured");
    Ok(TimesheetApi::connect(config, Arc::new(transport), Arc::new(tokens)))
}

/// Asks before destructive commands unless `--yes` was given.
fn confirm(prompt: &str, yes: bool) -> anyhow::Result<bool> {
    if yes {
        return Ok(true);
    }
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    let confirmed = matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes");
    if !confirmed {
        println!("Cancelled.");
    }
    Ok(confirmed)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

async fn read_upload(path: &Path) -> anyhow::Result<UploadFile> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    Ok(UploadFile::new(file_name(path), bytes))
}

async fn run(args: &[String]) -> anyhow::Result<()> {
    let command = cli::parse(args)?;
    if command == Command::Help {
        print!("{USAGE}");
        return Ok(());
    }

    let api = connect()?;
    let today = Local::now().date_naive();

    match command {
        Command::Help => {}
        Command::Login { return_to } => {
            println!("Open this URL to sign in, then run `timesheet token <redirect-url>`:");
            println!("{}", api.auth.login_url(&return_to)?);
        }
        Command::Token { redirect } => {
            if !api.auth.complete_login(&redirect)? {
                bail!("no access_token found in that URL");
            }
            println!("Signed in.");
        }
        Command::Logout => {
            api.auth.logout().await?;
            println!("Signed out.");
        }
        Command::Me => render::user(&api.auth.me().await?),
        Command::Week { date } => {
            let page = WeekViewPage::new(api, date.unwrap_or(today));
            page.refresh().await?;
            render::week(&page.view().await);
        }
        Command::EntryAdd {
            date,
            project_id,
            hours,
            travel,
            hotel_id,
            notes,
        } => {
            let page = WeekViewPage::new(api, date);
            page.refresh().await?;
            let mut form = page.new_entry_form(date);
            match page.view().await.projects.iter().find(|p| p.id == project_id) {
                Some(project) => form.select_project(project),
                None => form.project_id = Some(project_id),
            }
            if let Some(hours) = hours {
                form.hours_worked = hours;
            }
            if let Some(travel) = travel {
                form.travel_time = travel;
            }
            form.select_hotel(hotel_id);
            form.notes = notes.unwrap_or_default();
            let saved = page.save_entry(&mut form).await?;
            println!("Saved entry #{} on {}.", saved.id, saved.date);
        }
        Command::EntryDelete { id, yes } => {
            if confirm(&format!("Delete time entry #{id}?"), yes)? {
                let page = WeekViewPage::new(api, today);
                page.delete_entry(id).await?;
                println!("Deleted.");
            }
        }
        Command::Projects => {
            let mut page = ProjectsPage::new(&api);
            render::projects(page.load().await?);
        }
        Command::ProjectAdd { name, client } => {
            let mut page = ProjectsPage::new(&api);
            let mut form = ProjectForm {
                name,
                client: client.unwrap_or_default(),
                ..ProjectForm::create()
            };
            let saved = page.save(&mut form).await?;
            println!("Saved project #{} {}.", saved.id, saved.name);
        }
        Command::ProjectDelete { id, yes } => {
            if confirm(&format!("Delete project #{id}?"), yes)? {
                ProjectsPage::new(&api).delete(id).await?;
                println!("Deleted.");
            }
        }
        Command::Hotels => {
            let mut page = HotelsPage::new(&api);
            render::hotels(page.load().await?);
        }
        Command::HotelAdd { name, address } => {
            let mut page = HotelsPage::new(&api);
            let mut form = HotelForm {
                name,
                address: address.unwrap_or_default(),
                ..HotelForm::create()
            };
            let saved = page.save(&mut form).await?;
            println!("Saved hotel #{} {}.", saved.id, saved.name);
        }
        Command::HotelDelete { id, yes } => {
            if confirm(&format!("Delete hotel #{id}?"), yes)? {
                HotelsPage::new(&api).delete(id).await?;
                println!("Deleted.");
            }
        }
        Command::Receipts { period, date } => {
            let day = date.unwrap_or(today);
            let mut page = ReceiptsPage::new(&api, today);
            page.set_filter(period_filter(period, day));
            page.load().await?;
            render::receipts(page.receipts(), |r| page.file(r.id).map(<[u8]>::len));
        }
        Command::ReceiptsUpload { date, files } => {
            let mut uploads = Vec::with_capacity(files.len());
            for path in &files {
                uploads.push(read_upload(path).await?);
            }
            let mut page = ReceiptsPage::new(&api, date);
            page.upload(date, uploads).await?;
            println!("Uploaded {} file(s).", files.len());
            render::receipts(page.receipts(), |r| page.file(r.id).map(<[u8]>::len));
        }
        Command::Expenses => {
            let mut page = ExpensesPage::new(&api);
            page.load(today).await?;
            render::expenses(page.expenses(), page.this_week(), page.this_month());
        }
        Command::Earnings => {
            let mut page = EarningsPage::new(&api);
            render::earnings(page.load().await?);
        }
        Command::Payslip { week_start, file } => match file {
            Some(path) => {
                let payslip = api.payslips.upload(week_start, read_upload(&path).await?).await?;
                render::payslip(Some(&payslip));
            }
            None => render::payslip(api.payslips.for_week(week_start).await?.as_ref()),
        },
        Command::Users => {
            let mut page = AdminPage::new(&api);
            render::users(page.load().await?);
        }
        Command::UserRole { id, role } => {
            let role: Role = role.parse().map_err(anyhow::Error::msg)?;
            let saved = AdminPage::new(&api).change_role(id, role).await?;
            println!("{} is now {}.", saved.email, saved.role.as_str());
        }
        Command::UserDelete { id, yes } => {
            if confirm(&format!("Delete user #{id} and all their data?"), yes)? {
                AdminPage::new(&api).delete(id).await?;
                println!("Deleted.");
            }
        }
        Command::Export {
            kind,
            format,
            out_dir,
        } => {
            let file = export_owned(&api, kind, format, today).await?;
            let path = out_dir.unwrap_or_else(|| PathBuf::from(".")).join(&file.file_name);
            tokio::fs::write(&path, file.content.as_bytes())
                .await
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote {} ({}).", path.display(), file.content_type);
        }
        Command::Import { kind, yes, files } => {
            let mut sources = Vec::with_capacity(files.len());
            for path in &files {
                let text = tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("reading {}", path.display()))?;
                sources.push(SourceFile::new(file_name(path), text));
            }
            let mut plan = ImportPlan::from_files(&sources)?;
            if let Some(kind) = kind {
                let forced: Vec<usize> = plan
                    .batches()
                    .iter()
                    .enumerate()
                    .filter(|(_, b)| !b.time_entries_only)
                    .map(|(index, _)| index)
                    .collect();
                for index in forced {
                    plan.assign(index, kind)?;
                }
            }
            let unassigned = plan.confirm_suggested();
            println!("Import plan:");
            render::import_plan(plan.batches());
            if unassigned > 0 {
                bail!("{unassigned} batch(es) have no record kind; rerun with --as <kind>");
            }
            if confirm("Import these batches?", yes)? {
                render::import_report(&plan.run(&api).await?);
            }
        }
    }
    Ok(())
}

fn period_filter(period: Period, day: NaiveDate) -> PeriodFilter {
    match period {
        Period::Day => PeriodFilter::Specific(day),
        Period::Week => PeriodFilter::Week(day),
        Period::Month => PeriodFilter::Month(day),
        Period::Year => PeriodFilter::Year(day),
    }
}
