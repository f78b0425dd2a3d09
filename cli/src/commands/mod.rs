//! CLI command implementations

pub mod check;
pub mod schema;
pub mod show;

pub use check::check_command;
pub use schema::schema_command;
pub use show::show_command;
