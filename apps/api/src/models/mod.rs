pub mod entries;
pub mod record;
pub mod resume;
