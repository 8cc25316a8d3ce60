#![warn(warnings)]
#![deny(clippy::all)]

pub mod client;
pub mod config;
pub mod edit;
pub mod error;
pub mod feedback;
pub mod filter;
pub mod join;
pub mod normalize;
pub mod order;
pub mod pipeline;
pub mod record;
pub mod render;
pub mod screen;
pub mod storage;
pub mod tenant;

pub use client::ResourceClient;
pub use config::{ConsoleConfig, ScreenConfig};
pub use error::{ClientError, ConsoleError, Notice, NoticeLevel};
pub use feedback::FeedbackScreen;
pub use pipeline::Snapshot;
pub use record::{FieldValue, Record};
pub use screen::ResourceScreen;
pub use storage::{create_operator_from_uri, StoreClient};
pub use tenant::TenantContext;
