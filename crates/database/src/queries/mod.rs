pub mod observation;
pub mod schedule;

pub type Result<O> = core::result::Result<O, sqlx::Error>;
