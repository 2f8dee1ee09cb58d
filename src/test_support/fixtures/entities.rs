// Shared builders for backend records used across unit tests.
// Only compiled for tests, exposed as `crate::test_support::fixtures::entities`.

use crate::core::entities::hotel::Hotel;
use crate::core::entities::id::Id;
use crate::core::entities::project::Project;
use crate::core::entities::time_entry::TimeEntry;
use crate::core::entities::user::{Role, User};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value as Json;

pub const OWNER_EMAIL: &str = "ana@example.com";

pub fn to_json<T: Serialize>(value: &T) -> Json {
    serde_json::to_value(value).unwrap()
}

pub struct TimeEntryBuilder {
    inner: TimeEntry,
}

#[allow(dead_code)]
impl TimeEntryBuilder {
    pub fn new(id: Id) -> Self {
        Self {
            inner: TimeEntry {
                id,
                date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
                project_id: Some(1),
                project_name: Some("Alpha".to_string()),
                hours_worked: 8.0,
                travel_time: 0.0,
                hotel_id: None,
                hotel_name: None,
                notes: None,
                created_by: Some(OWNER_EMAIL.to_string()),
                created_date: Some("2024-03-04T09:15:00Z".to_string()),
                updated_date: Some("2024-03-04T09:15:00Z".to_string()),
            },
        }
    }

    pub fn date(mut self, v: NaiveDate) -> Self {
        self.inner.date = v;
        self
    }

    pub fn hours(mut self, v: f64) -> Self {
        self.inner.hours_worked = v;
        self
    }

    pub fn travel(mut self, v: f64) -> Self {
        self.inner.travel_time = v;
        self
    }

    pub fn project(mut self, id: Id, name: &str) -> Self {
        self.inner.project_id = Some(id);
        self.inner.project_name = Some(name.to_string());
        self
    }

    pub fn no_project(mut self) -> Self {
        self.inner.project_id = None;
        self.inner.project_name = None;
        self
    }

    pub fn hotel(mut self, id: Id, name: &str) -> Self {
        self.inner.hotel_id = Some(id);
        self.inner.hotel_name = Some(name.to_string());
        self
    }

    pub fn notes(mut self, v: &str) -> Self {
        self.inner.notes = Some(v.to_string());
        self
    }

    pub fn created_by(mut self, v: &str) -> Self {
        self.inner.created_by = Some(v.to_string());
        self
    }

    pub fn build(self) -> TimeEntry {
        self.inner
    }
}

pub struct ProjectBuilder {
    inner: Project,
}

#[allow(dead_code)]
impl ProjectBuilder {
    pub fn new(id: Id, name: &str) -> Self {
        Self {
            inner: Project {
                id,
                name: name.to_string(),
                client: None,
                contract: None,
                default_hours_worked: 8.0,
                default_travel_time: 0.0,
                archived: false,
                created_by: Some(OWNER_EMAIL.to_string()),
                created_date: Some("2024-01-02T08:00:00Z".to_string()),
                updated_date: None,
            },
        }
    }

    pub fn client(mut self, v: &str) -> Self {
        self.inner.client = Some(v.to_string());
        self
    }

    pub fn defaults(mut self, hours: f64, travel: f64) -> Self {
        self.inner.default_hours_worked = hours;
        self.inner.default_travel_time = travel;
        self
    }

    pub fn build(self) -> Project {
        self.inner
    }
}

pub struct HotelBuilder {
    inner: Hotel,
}

#[allow(dead_code)]
impl HotelBuilder {
    pub fn new(id: Id, name: &str) -> Self {
        Self {
            inner: Hotel {
                id,
                name: name.to_string(),
                address: None,
                created_by: Some(OWNER_EMAIL.to_string()),
                created_date: Some("2024-01-02T08:00:00Z".to_string()),
                updated_date: None,
            },
        }
    }

    pub fn address(mut self, v: &str) -> Self {
        self.inner.address = Some(v.to_string());
        self
    }

    pub fn build(self) -> Hotel {
        self.inner
    }
}

pub struct UserBuilder {
    inner: User,
}

#[allow(dead_code)]
impl UserBuilder {
    pub fn new(id: Id, email: &str) -> Self {
        Self {
            inner: User {
                id,
                email: email.to_string(),
                full_name: Some("Ana Example".to_string()),
                company: None,
                wage: None,
                role: Role::User,
            },
        }
    }

    pub fn full_name(mut self, v: &str) -> Self {
        self.inner.full_name = Some(v.to_string());
        self
    }

    pub fn wage(mut self, v: f64) -> Self {
        self.inner.wage = Some(v);
        self
    }

    pub fn admin(mut self) -> Self {
        self.inner.role = Role::Admin;
        self
    }

    pub fn build(self) -> User {
        self.inner
    }
}
