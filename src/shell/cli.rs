// Command line parsing for the `timesheet` binary.
//
// Boundaries
// - Pure: turns argument strings into a `Command`. Nothing here talks to the backend.

use chrono::NaiveDate;
use std::path::PathBuf;
use thiserror::Error;
use timesheet_client::application::errors::TransferError;
use timesheet_client::application::transfer::kind::{ExportFormat, RecordKind};
use timesheet_client::core::entities::date::parse_calendar_date;
use timesheet_client::core::entities::id::Id;

pub const USAGE: &str = "\
usage: timesheet <command> [args]

  login [return-to]                 print the sign-in URL
  token <redirect-url>              store the token from the sign-in redirect
  logout
  me
  week [yyyy-mm-dd]                 entries and totals for the week containing the date
  entry add <date> <project-id> [--hours H] [--travel T] [--hotel ID] [--notes TEXT]
  entry delete <id> [--yes]
  projects [add <name> [--client C] | delete <id> [--yes]]
  hotels [add <name> [--address A] | delete <id> [--yes]]
  receipts [day|week|month|year] [yyyy-mm-dd]
  receipts upload <date> <files>...
  expenses
  earnings
  payslip <week-start> [file]       show the payslip, or upload one
  users [role <id> <user|admin> | delete <id> [--yes]]
  export <timeentry|project|hotel> <json|csv> [--out DIR]
  import [--as KIND] [--yes] <files>...
";

#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    #[error("{0}\n\n{usage}", usage = USAGE)]
    Usage(String),

    #[error("invalid date {0:?}, expected yyyy-mm-dd")]
    Date(String),

    #[error("invalid id {0:?}")]
    Id(String),

    #[error("{0}")]
    Value(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day,
    Week,
    Month,
    Year,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Login { return_to: String },
    Token { redirect: String },
    Logout,
    Me,
    Week { date: Option<NaiveDate> },
    EntryAdd {
        date: NaiveDate,
        project_id: Id,
        hours: Option<String>,
        travel: Option<String>,
        hotel_id: Option<Id>,
        notes: Option<String>,
    },
    EntryDelete { id: Id, yes: bool },
    Projects,
    ProjectAdd { name: String, client: Option<String> },
    ProjectDelete { id: Id, yes: bool },
    Hotels,
    HotelAdd { name: String, address: Option<String> },
    HotelDelete { id: Id, yes: bool },
    Receipts { period: Period, date: Option<NaiveDate> },
    ReceiptsUpload { date: NaiveDate, files: Vec<PathBuf> },
    Expenses,
    Earnings,
    Payslip { week_start: NaiveDate, file: Option<PathBuf> },
    Users,
    UserRole { id: Id, role: String },
    UserDelete { id: Id, yes: bool },
    Export { kind: RecordKind, format: ExportFormat, out_dir: Option<PathBuf> },
    Import { kind: Option<RecordKind>, yes: bool, files: Vec<PathBuf> },
}

/// Splits `--flag value` options and the `--yes` switch from positional words.
struct Args {
    positional: Vec<String>,
    options: Vec<(String, String)>,
    yes: bool,
}

impl Args {
    fn split(raw: &[String]) -> Result<Self, CliError> {
        let mut positional = Vec::new();
        let mut options = Vec::new();
        let mut yes = false;
        let mut iter = raw.iter();
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--yes" | "-y" => yes = true,
                flag if flag.starts_with("--") => {
                    let value = iter
                        .next()
                        .ok_or_else(|| CliError::Usage(format!("{flag} needs a value")))?;
                    options.push((flag.trim_start_matches("--").to_string(), value.clone()));
                }
                _ => positional.push(arg.clone()),
            }
        }
        Ok(Self {
            positional,
            options,
            yes,
        })
    }

    fn option(&self, name: &str) -> Option<String> {
        self.options
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
    }

    fn word(&self, index: usize) -> Option<&str> {
        self.positional.get(index).map(String::as_str)
    }

    fn required(&self, index: usize, what: &str) -> Result<&str, CliError> {
        self.word(index)
            .ok_or_else(|| CliError::Usage(format!("missing {what}")))
    }
}

fn date(raw: &str) -> Result<NaiveDate, CliError> {
    parse_calendar_date(raw).ok_or_else(|| CliError::Date(raw.to_string()))
}

fn id(raw: &str) -> Result<Id, CliError> {
    raw.trim().parse().map_err(|_| CliError::Id(raw.to_string()))
}

pub fn parse(raw: &[String]) -> Result<Command, CliError> {
    let args = Args::split(raw)?;
    let Some(command) = args.word(0) else {
        return Ok(Command::Help);
    };

    let parsed = match command {
        "help" | "-h" | "--help" => Command::Help,
        "login" => Command::Login {
            return_to: args.word(1).unwrap_or("/").to_string(),
        },
        "token" => Command::Token {
            redirect: args.required(1, "redirect url")?.to_string(),
        },
        "logout" => Command::Logout,
        "me" => Command::Me,
        "week" => Command::Week {
            date: args.word(1).map(date).transpose()?,
        },
        "entry" => match args.required(1, "entry action")? {
            "add" => Command::EntryAdd {
                date: date(args.required(2, "date")?)?,
                project_id: id(args.required(3, "project id")?)?,
                hours: args.option("hours"),
                travel: args.option("travel"),
                hotel_id: args.option("hotel").as_deref().map(id).transpose()?,
                notes: args.option("notes"),
            },
            "delete" => Command::EntryDelete {
                id: id(args.required(2, "entry id")?)?,
                yes: args.yes,
            },
            other => return Err(CliError::Usage(format!("unknown entry action {other:?}"))),
        },
        "projects" => match args.word(1) {
            None => Command::Projects,
            Some("add") => Command::ProjectAdd {
                name: args.required(2, "project name")?.to_string(),
                client: args.option("client"),
            },
            Some("delete") => Command::ProjectDelete {
                id: id(args.required(2, "project id")?)?,
                yes: args.yes,
            },
            Some(other) => return Err(CliError::Usage(format!("unknown projects action {other:?}"))),
        },
        "hotels" => match args.word(1) {
            None => Command::Hotels,
            Some("add") => Command::HotelAdd {
                name: args.required(2, "hotel name")?.to_string(),
                address: args.option("address"),
            },
            Some("delete") => Command::HotelDelete {
                id: id(args.required(2, "hotel id")?)?,
                yes: args.yes,
            },
            Some(other) => return Err(CliError::Usage(format!("unknown hotels action {other:?}"))),
        },
        "receipts" => match args.word(1) {
            Some("upload") => {
                let files: Vec<PathBuf> = args.positional.iter().skip(3).map(PathBuf::from).collect();
                if files.is_empty() {
                    return Err(CliError::Usage("receipts upload needs at least one file".into()));
                }
                Command::ReceiptsUpload {
                    date: date(args.required(2, "date")?)?,
                    files,
                }
            }
            word => {
                let (period, date_word) = match word {
                    Some("day") => (Period::Day, args.word(2)),
                    Some("week") => (Period::Week, args.word(2)),
                    Some("month") => (Period::Month, args.word(2)),
                    Some("year") => (Period::Year, args.word(2)),
                    other => (Period::Day, other),
                };
                Command::Receipts {
                    period,
                    date: date_word.map(date).transpose()?,
                }
            }
        },
        "expenses" => Command::Expenses,
        "earnings" => Command::Earnings,
        "payslip" => Command::Payslip {
            week_start: date(args.required(1, "week start")?)?,
            file: args.word(2).map(PathBuf::from),
        },
        "users" => match args.word(1) {
            None => Command::Users,
            Some("role") => Command::UserRole {
                id: id(args.required(2, "user id")?)?,
                role: args.required(3, "role")?.to_string(),
            },
            Some("delete") => Command::UserDelete {
                id: id(args.required(2, "user id")?)?,
                yes: args.yes,
            },
            Some(other) => return Err(CliError::Usage(format!("unknown users action {other:?}"))),
        },
        "export" => Command::Export {
            kind: args
                .required(1, "record kind")?
                .parse()
                .map_err(|e: TransferError| CliError::Value(e.to_string()))?,
            format: args
                .required(2, "format")?
                .parse()
                .map_err(|e: TransferError| CliError::Value(e.to_string()))?,
            out_dir: args.option("out").map(PathBuf::from),
        },
        "import" => {
            let files: Vec<PathBuf> = args.positional.iter().skip(1).map(PathBuf::from).collect();
            if files.is_empty() {
                return Err(CliError::Usage("import needs at least one file".into()));
            }
            Command::Import {
                kind: args
                    .option("as")
                    .map(|k| k.parse::<RecordKind>())
                    .transpose()
                    .map_err(|e| CliError::Value(e.to_string()))?,
                yes: args.yes,
                files,
            }
        }
        other => return Err(CliError::Usage(format!("unknown command {other:?}"))),
    };
    Ok(parsed)
}
