//! Thin client for the ZoomEye web search.
//! Logs in through the CAS handshake, pages through search results
//! and flattens them into a `host, port, banner` CSV report.

pub mod config;
mod error;
mod macros;
pub mod parse;
pub mod process;
pub mod request;
pub mod session;

pub use config::{ClientConfig, Credentials};
pub use error::{Error, LoginError, LoginStep, Result};
pub use process::Report;
pub use request::ZoomEyeClient;

pub const DEFAULT_BASE_URL: &str = "https://www.zoomeye.ai";
/// Results requested per page.
pub const DEFAULT_PAGE_SIZE: u64 = 50;
/// Pages past this number are never requested.
pub const DEFAULT_PAGE_LIMIT: u64 = 5;
/// Value of the `encode-X` header the login endpoint expects.
pub const DEFAULT_ENCODE_X: &str = "change_it";

pub const REPORT_HEADER: &str = "host, port, banner\n";
pub const NO_BANNER: &str = "NoBannerSorry";
pub const REPORT_TIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
