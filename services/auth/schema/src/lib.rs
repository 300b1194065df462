//! sea-orm entities owned by the auth service.

pub mod mail_jobs;
pub mod users;
