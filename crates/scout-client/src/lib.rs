//! Transport for opportunity search.
//!
//! Opens one WebSocket per query attempt and feeds what it receives into a
//! [`scout_core::SearchSession`] through a [`StreamController`]. Also wraps
//! the backend's request/response endpoints and a browser launcher for the
//! bulk-open action.

pub mod controller;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod launcher;
pub mod transport;

pub use controller::StreamController;
pub use endpoint::Endpoint;
pub use error::{ClientError, Result};
pub use http::SearchClient;
pub use launcher::BrowserNavigator;
pub use transport::{AttemptConnection, Tagged};
