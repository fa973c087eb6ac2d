pub mod search;
pub mod timesheet;
