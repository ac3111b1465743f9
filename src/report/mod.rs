mod collector;
mod format;
mod humanize;
mod repository;

pub use collector::collect_report_data;
pub use format::generate_report;
pub use humanize::humanize_age;
