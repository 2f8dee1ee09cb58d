use crate::core::entities::id::Id;
use crate::core::entities::project::Project;
use crate::core::entities::time_entry::TimeEntry;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Orders projects for the entry form picker.
///
/// Projects with entries come first, most recently used at the top. Projects
/// that were never used follow in alphabetical order.
pub fn order_projects_by_last_use(projects: &[Project], entries: &[TimeEntry]) -> Vec<Project> {
    let mut last_used: HashMap<Id, NaiveDate> = HashMap::new();
    for entry in entries {
        let Some(project_id) = entry.project_id else {
            continue;
        };
        last_used
            .entry(project_id)
            .and_modify(|latest| {
                if entry.date > *latest {
                    *latest = entry.date;
                }
            })
            .or_insert(entry.date);
    }

    let mut ordered = projects.to_vec();
    ordered.sort_by(|a, b| match (last_used.get(&a.id), last_used.get(&b.id)) {
        (Some(da), Some(db)) => db.cmp(da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    });
    ordered
}
