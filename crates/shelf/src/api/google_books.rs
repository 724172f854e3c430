use std::collections::HashSet;

use log::{info, trace, warn};
use reqwest::Url;
use serde::Deserialize;

use crate::{BookRecord, Error, ErrorKind};

use super::Client;

/// The Google Books volumes endpoint used when no other endpoint is given.
pub const GOOGLE_BOOKS_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Builds the request URL for searching `query` at `endpoint`.
///
/// The query is sent as the `q` parameter and is URL-encoded, an empty query is still sent.
///
/// # Errors
///
/// An [`Err`] is returned when `endpoint` is not a valid absolute URL.
pub fn volumes_url(endpoint: &str, query: &str) -> Result<Url, Error> {
    Url::parse_with_params(endpoint, &[("q", query)]).map_err(|e| {
        Error::new(
            ErrorKind::IO,
            format!("'{endpoint}' is not a valid endpoint URL - {e}"),
        )
    })
}

pub(crate) fn search_volumes<C: Client>(
    endpoint: &str,
    query: &str,
) -> Result<Vec<BookRecord>, Error> {
    info!("Searching for '{query}' using Google Books API");
    let url = volumes_url(endpoint, query)?;

    let client = C::default();
    let VolumesModel { items } = client.get_json(url.as_str())?;

    trace!("Request was successful - {} item(s) returned", items.len());

    Ok(into_records(items))
}

/// Maps the items in response order, dropping any item that repeats an earlier id.
fn into_records(items: Vec<Item>) -> Vec<BookRecord> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .into_iter()
        .filter(|item| {
            let first = seen.insert(item.id.clone());
            if !first {
                warn!("Dropping repeated volume with the id '{}'", item.id);
            }
            first
        })
        .map(BookRecord::from)
        .collect()
}

/// A response without `items` fails to deserialize, the API omits it when nothing matched.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct VolumesModel {
    items: Vec<Item>,
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct Item {
    id: String,
    #[serde(rename = "volumeInfo", default)]
    volume_info: VolumeInfo,
}

/// Volume information from the Google Book API
#[derive(Default, Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct VolumeInfo {
    title: Option<String>,
    authors: Option<Vec<String>>,
    #[serde(rename = "publishedDate")]
    published_date: Option<String>,
    description: Option<String>,
}

impl From<Item> for BookRecord {
    fn from(item: Item) -> Self {
        // Deconstruct item to take ownership of fields (avoids cloning).
        let Item {
            id,
            volume_info:
                VolumeInfo {
                    title,
                    authors,
                    published_date,
                    description,
                },
        } = item;

        Self {
            id,
            title,
            authors,
            published_date,
            description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{assert_requested_url, canned_bodies, MockClient, UnreachableBody};

    canned_bodies! {
        ValidJsonBody => Ok(include_str!("../../../../tests/data/google_books_volumes.json").to_owned()),
        SingleItemBody => Ok(r#"{"items": [{"id": "A", "volumeInfo": {"title": "T", "authors": ["X", "Y"], "publishedDate": "2020", "description": "D"}}]}"#.to_owned()),
        EmptyItemsBody => Ok(r#"{"kind": "books#volumes", "totalItems": 0, "items": []}"#.to_owned()),
        MissingItemsBody => Ok(r#"{"kind": "books#volumes", "totalItems": 0}"#.to_owned()),
        MalformedJsonBody => Ok(r#"{"items": [{"id": "A""#.to_owned()),
        MissingIdBody => Ok(r#"{"items": [{"volumeInfo": {"title": "T"}}]}"#.to_owned()),
        RepeatedIdBody => Ok(r#"{"items": [{"id": "A", "volumeInfo": {"title": "First"}}, {"id": "B"}, {"id": "A", "volumeInfo": {"title": "Second"}}]}"#.to_owned()),
    }

    #[test]
    fn item_is_mapped_field_by_field() {
        let records = search_volumes::<MockClient<SingleItemBody>>(GOOGLE_BOOKS_URL, "T")
            .expect("SingleItemBody always answers with a volumes response");

        let expected = BookRecord {
            id: "A".to_owned(),
            title: Some("T".to_owned()),
            authors: Some(vec!["X".to_owned(), "Y".to_owned()]),
            published_date: Some("2020".to_owned()),
            description: Some("D".to_owned()),
        };
        assert_eq!(vec![expected], records);
    }

    #[test]
    fn valid_json_keeps_response_order_and_absent_fields() {
        let records =
            search_volumes::<MockClient<ValidJsonBody>>(GOOGLE_BOOKS_URL, "code complete")
                .expect("ValidJsonBody always answers with a volumes response");

        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(vec!["QnghAQAAIAAJ", "LpVCAwAAQBAJ", "9mRnAAAAMAAJ"], ids);

        assert_eq!(Some("Code Complete"), records[0].title.as_deref());
        assert_eq!(
            Some("Steve McConnell".to_owned()),
            records[0].authors_line()
        );

        // the last volume has no authors, date or description
        assert_eq!(None, records[2].authors);
        assert_eq!(None, records[2].published_date);
        assert_eq!(None, records[2].description);
    }

    #[test]
    fn empty_items_is_an_empty_result_set() {
        let records = search_volumes::<MockClient<EmptyItemsBody>>(GOOGLE_BOOKS_URL, "zzzz")
            .expect("an empty items array is a successful search");
        assert!(records.is_empty());
    }

    #[test]
    fn missing_items_is_a_deserialize_error() {
        let err = search_volumes::<MockClient<MissingItemsBody>>(GOOGLE_BOOKS_URL, "zzzz")
            .unwrap_err();
        assert_eq!(ErrorKind::Deserialize, err.kind());
    }

    #[test]
    fn malformed_json_is_a_deserialize_error() {
        let err = search_volumes::<MockClient<MalformedJsonBody>>(GOOGLE_BOOKS_URL, "A")
            .unwrap_err();
        assert_eq!(ErrorKind::Deserialize, err.kind());
    }

    #[test]
    fn item_without_id_is_a_deserialize_error() {
        let err =
            search_volumes::<MockClient<MissingIdBody>>(GOOGLE_BOOKS_URL, "T").unwrap_err();
        assert_eq!(ErrorKind::Deserialize, err.kind());
    }

    #[test]
    fn network_error_is_passed_through() {
        let err =
            search_volumes::<MockClient<UnreachableBody>>(GOOGLE_BOOKS_URL, "T").unwrap_err();
        assert_eq!(ErrorKind::IO, err.kind());
    }

    #[test]
    fn repeated_ids_keep_the_first_volume() {
        let records = search_volumes::<MockClient<RepeatedIdBody>>(GOOGLE_BOOKS_URL, "A")
            .expect("RepeatedIdBody always answers with a volumes response");

        let ids: Vec<_> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(vec!["A", "B"], ids);
        assert_eq!(Some("First"), records[0].title.as_deref());
    }

    #[test]
    fn query_is_encoded_into_the_q_parameter() {
        let _ = search_volumes::<MockClient<EmptyItemsBody>>(GOOGLE_BOOKS_URL, "rust & c++");
        assert_requested_url!("https://www.googleapis.com/books/v1/volumes?q=rust+%26+c%2B%2B");
    }

    #[test]
    fn empty_query_is_still_requested() {
        let _ = search_volumes::<MockClient<EmptyItemsBody>>(GOOGLE_BOOKS_URL, "");
        assert_requested_url!("https://www.googleapis.com/books/v1/volumes?q=");
    }

    #[test]
    fn invalid_endpoint_is_an_error() {
        let err = volumes_url("not a url", "rust").unwrap_err();
        assert_eq!(ErrorKind::IO, err.kind());
    }
}
