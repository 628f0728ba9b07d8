//! Blocking SDK for the M-PESA payment gateway.
//!
//! STK push and C2B calls share one authenticated-request pipeline with a cached bearer token and
//! fixed-delay retries.
//!
//! ```no_run
//! use mpesa_sdk::{
//! 	client::MpesaClient,
//! 	config::{Config, Environment},
//! 	services::StkPushRequest,
//! };
//!
//! # fn main() -> mpesa_sdk::error::Result<()> {
//! let config = Config::new("consumer-key", "consumer-secret", Environment::Sandbox)?;
//! let client = MpesaClient::new(config)?;
//! let response = client.stk_push().initiate(StkPushRequest {
//! 	business_short_code: "554433".into(),
//! 	amount: "10.00".into(),
//! 	party_a: "251700404789".into(),
//! 	..Default::default()
//! })?;
//!
//! println!("checkout request: {}", response.checkout_request_id);
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod models;
pub mod obs;
pub mod services;

mod _prelude {
	pub use std::{
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	pub use reqwest::{Method, StatusCode};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _};
