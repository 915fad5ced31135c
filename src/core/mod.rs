pub mod aggregate;
pub mod calendar;
pub mod log;
pub mod reconcile;
pub mod users;
pub mod window;
