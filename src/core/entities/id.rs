/// Backend primary keys are integers on every resource.
pub type Id = i64;
