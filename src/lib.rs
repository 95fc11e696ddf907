//! EduBrew Sponsorship Client Library

pub mod config;
pub mod gateway;
pub mod notify;
pub mod observability;
pub mod view;
pub mod wallet;

pub use config::ClientConfig;
pub use gateway::{ContractGateway, Sponsorship, SponsorshipGateway};
pub use view::{SponsorshipView, ViewState};
