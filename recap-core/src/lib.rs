pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod patch;
pub mod rpc;
pub mod validate;

pub use config::RecapConfig;
pub use error::RecapError;
pub use models::meeting::{
    CreateMeetingInput, DashboardComponents, DashboardData, Meeting, UpdateMeetingInput,
};
pub use models::status::{ProcessingStatus, StatusResult};
pub use patch::Patch;
