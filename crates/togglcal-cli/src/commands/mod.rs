pub mod auth;
pub mod calendars;
pub mod current;
pub mod sync;
pub mod version;
