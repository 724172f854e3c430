//! The seam between the search logic and the network.
use serde::de::DeserializeOwned;

pub(crate) mod google_books;

pub use google_books::{volumes_url, GOOGLE_BOOKS_URL};

use crate::{Error, ErrorKind};

/// A blocking HTTP client able to fetch and deserialize JSON documents.
///
/// Searches are generic over the client so the network can be replaced in tests, a new client is
/// created with [`Default`] for every request.
pub trait Client
where
    Self: Default,
{
    /// Sends a GET request to `url` and deserializes the JSON body of a successful response.
    ///
    /// # Errors
    ///
    /// An [`Err`] is returned when the request cannot be sent, the response has a non-success
    /// status or the body cannot be deserialized into `T`.
    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned;
}

impl Client for reqwest::blocking::Client {
    fn get_json<T>(&self, url: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        self.get(url)
            .send()
            .map_err(|e| Error::wrap(ErrorKind::IO, e))?
            .error_for_status()
            .map_err(|e| Error::wrap(ErrorKind::Status, e))?
            .json()
            .map_err(|e| Error::wrap(ErrorKind::Deserialize, e))
    }
}

#[cfg(test)]
pub(crate) use test::{
    assert_requested_url, canned_bodies, CannedBody, MockClient, UnreachableBody, LAST_URL,
};
