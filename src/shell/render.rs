// Plain text rendering of page state for the terminal.

use timesheet_client::application::pages::earnings::EarningsView;
use timesheet_client::application::pages::week_view::WeekView;
use timesheet_client::application::transfer::import::{ImportBatch, ImportReport};
use timesheet_client::core::entities::earnings::{PayFigures, Payslip};
use timesheet_client::core::entities::expense::Expense;
use timesheet_client::core::entities::hotel::Hotel;
use timesheet_client::core::entities::project::Project;
use timesheet_client::core::entities::receipt::Receipt;
use timesheet_client::core::entities::time_entry::TimeEntry;
use timesheet_client::core::entities::user::User;

pub fn money(value: f64) -> String {
    format!("£{value:.2}")
}

fn hours(value: f64) -> String {
    format!("{value:.1}h")
}

pub fn user(user: &User) {
    println!("{} <{}>", user.display_name(), user.email);
    println!("  role:    {}", user.role.as_str());
    println!("  company: {}", user.company.as_deref().unwrap_or("-"));
    match user.wage {
        Some(wage) => println!("  wage:    {}/h", money(wage)),
        None => println!("  wage:    -"),
    }
}

fn entry_line(entry: &TimeEntry) -> String {
    let mut line = format!(
        "    #{:<5} {:<24} {} work",
        entry.id,
        entry.project_name.as_deref().unwrap_or("(no project)"),
        hours(entry.hours_worked),
    );
    if entry.travel_time > 0.0 {
        line.push_str(&format!(" + {} travel", hours(entry.travel_time)));
    }
    if let Some(hotel) = &entry.hotel_name {
        line.push_str(&format!(" @ {hotel}"));
    }
    if let Some(notes) = &entry.notes {
        line.push_str(&format!("  ({notes})"));
    }
    line
}

pub fn week(view: &WeekView) {
    println!("{}", view.label);
    for day in &view.days {
        println!("  {} {}", day.date.format("%a %d %b"), hours(day.total_hours));
        for entry in &day.entries {
            println!("{}", entry_line(entry));
        }
    }
    let summary = &view.summary;
    println!(
        "total {} ({} work, {} travel)",
        hours(view.total_hours),
        hours(summary.hours_worked),
        hours(summary.travel_hours)
    );
    if let Some(wage) = &summary.wage {
        println!(
            "estimate at {}/h: gross {}, tax {}, net {}",
            money(wage.hourly_wage),
            money(wage.gross),
            money(wage.tax),
            money(wage.net)
        );
    }
}

pub fn projects(projects: &[Project]) {
    if projects.is_empty() {
        println!("No projects yet.");
    }
    for p in projects {
        println!(
            "#{:<5} {:<24} {:<16} defaults {} / {}",
            p.id,
            p.name,
            p.client.as_deref().unwrap_or("-"),
            hours(p.default_hours_worked),
            hours(p.default_travel_time)
        );
    }
}

pub fn hotels(hotels: &[Hotel]) {
    if hotels.is_empty() {
        println!("No hotels yet.");
    }
    for h in hotels {
        println!("#{:<5} {:<24} {}", h.id, h.name, h.address.as_deref().unwrap_or(""));
    }
}

pub fn receipts(receipts: &[Receipt], cached: impl Fn(&Receipt) -> Option<usize>) {
    if receipts.is_empty() {
        println!("No receipts for this period.");
    }
    for r in receipts {
        let date = r.entry_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
        match cached(r) {
            Some(size) => println!("#{:<5} {date} {} ({size} bytes)", r.id, r.label()),
            None => println!("#{:<5} {date} {}", r.id, r.label()),
        }
    }
}

pub fn expenses(expenses: &[Expense], this_week: Option<f64>, this_month: Option<f64>) {
    let total = |v: Option<f64>| v.map(money).unwrap_or_else(|| "-".into());
    println!("This week: {}   This month: {}", total(this_week), total(this_month));
    if expenses.is_empty() {
        println!("No expenses yet.");
    }
    for e in expenses {
        println!(
            "{} {:<24} {:>10} {} {}",
            e.entry_date,
            e.vendor.as_deref().unwrap_or("-"),
            e.total_amount.map(money).unwrap_or_else(|| "-".into()),
            e.currency_or_default(),
            e.status.as_deref().unwrap_or("")
        );
    }
}

fn figures(figures: &PayFigures) {
    println!("  gross pay:          {}", money(figures.gross_pay));
    println!("  PAYE tax:           {}", money(figures.paye_tax));
    println!("  national insurance: {}", money(figures.national_insurance));
    println!("  pension:            {}", money(figures.pension));
    println!("  net pay:            {}", money(figures.net_pay));
}

pub fn earnings(view: &EarningsView) {
    match view {
        EarningsView::NoData => println!("No data available. Please upload a payslip first."),
        EarningsView::YearToDate(ytd) => {
            println!("Year-to-date earnings");
            figures(ytd);
        }
    }
}

pub fn payslip(payslip: Option<&Payslip>) {
    match payslip {
        None => println!("No payslip for this week."),
        Some(p) => {
            println!(
                "Payslip {}",
                p.original_filename.as_deref().unwrap_or("(unnamed)")
            );
            figures(&p.figures);
        }
    }
}

pub fn users(users: &[User]) {
    for u in users {
        println!(
            "#{:<5} {:<28} {:<20} {:<16} {}",
            u.id,
            u.email,
            u.full_name.as_deref().unwrap_or("-"),
            u.company.as_deref().unwrap_or("-"),
            u.role.as_str()
        );
    }
}

pub fn import_plan(batches: &[ImportBatch]) {
    for (index, batch) in batches.iter().enumerate() {
        let kind = batch
            .assigned
            .or(batch.suggested)
            .map(|k| k.as_str())
            .unwrap_or("?");
        let note = match (batch.assigned, batch.suggested) {
            (Some(_), _) => "",
            (None, Some(_)) => " (suggested)",
            (None, None) => " (needs --as)",
        };
        println!(
            "  [{index}] {}: {} record(s) as {kind}{note}",
            batch.source,
            batch.records.len()
        );
    }
}

pub fn import_report(report: &ImportReport) {
    println!("Import complete:");
    println!("  projects created {}, updated {}", report.projects_created, report.projects_updated);
    println!("  hotels created {}, updated {}", report.hotels_created, report.hotels_updated);
    println!(
        "  time entries created {}, already present {}",
        report.entries_created, report.entries_skipped
    );
    if report.records_ignored > 0 {
        println!("  ignored {} record(s) missing a name or date", report.records_ignored);
    }
}
