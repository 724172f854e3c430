#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(missing_docs, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]

//! # shelf
//!
//! shelf is a library for searching books with the Google Books API and presenting the results as
//! expandable cards. A [`SearchController`] holds the state of a search session, the requests it
//! issues are performed by a [`Client`](api::Client) and the session is rendered with the
//! [`view`] types.

pub mod api;
mod controller;
mod error;
mod model;
pub mod view;

pub use api::GOOGLE_BOOKS_URL;
pub use controller::{Key, SearchController, SearchRequest, Settlement};
pub use error::{Error, ErrorKind};
pub use model::BookRecord;

/// The client used to perform requests against the real API.
pub type HttpClient = reqwest::blocking::Client;
