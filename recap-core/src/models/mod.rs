pub mod meeting;
pub mod status;
