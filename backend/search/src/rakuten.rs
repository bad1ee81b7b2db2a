//! Rakuten Travel keyword hotel search client.
//!
//! Issues one GET per query and reads only the first page of results.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use tracing::{debug, warn};

use hotelbot_core::{Hotel, HotelSearch, SearchError, SearchResult};
use hotelbot_logging::redact_sensitive_data;

pub const DEFAULT_ENDPOINT: &str =
    "https://app.rakuten.co.jp/services/api/Travel/KeywordHotelSearch/20170426";

/// Query string sent to the keyword search endpoint.
///
/// Everything but the keyword is pinned: five hits, the small response
/// shape, format version 2 and decimal-degree coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub keyword: String,
    pub hits: u32,
    pub datum_type: u32,
    pub response_type: &'static str,
    pub format_version: u32,
}

impl SearchQuery {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            hits: 5,
            datum_type: 1,
            response_type: "small",
            format_version: 2,
        }
    }
}

pub struct RakutenClient {
    http: Client,
    endpoint: String,
    application_id: String,
}

impl RakutenClient {
    pub fn new(application_id: impl Into<String>, timeout: Duration) -> reqwest::Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            application_id: application_id.into(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[derive(Deserialize)]
struct KeywordSearchResponse {
    #[serde(default)]
    hotels: Vec<Vec<HotelPart>>,
}

/// One element of a hotel entry; only the basic-info element is read.
#[derive(Deserialize)]
struct HotelPart {
    #[serde(rename = "hotelBasicInfo")]
    hotel_basic_info: Option<HotelBasicInfo>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HotelBasicInfo {
    hotel_name: Option<String>,
    hotel_image_url: Option<String>,
    hotel_information_url: Option<String>,
    address1: Option<String>,
    address2: Option<String>,
    hotel_min_charge: Option<Number>,
    telephone_no: Option<String>,
    latitude: Option<Number>,
    longitude: Option<Number>,
}

impl From<HotelBasicInfo> for Hotel {
    fn from(info: HotelBasicInfo) -> Self {
        Hotel {
            name: info.hotel_name.unwrap_or_default(),
            image_url: info.hotel_image_url.unwrap_or_default(),
            information_url: info.hotel_information_url.unwrap_or_default(),
            address1: info.address1.unwrap_or_default(),
            address2: info.address2.unwrap_or_default(),
            min_charge: info.hotel_min_charge,
            telephone_no: info.telephone_no.unwrap_or_default(),
            latitude: info.latitude,
            longitude: info.longitude,
        }
    }
}

fn request_error(err: reqwest::Error) -> SearchError {
    if err.is_timeout() {
        SearchError::Timeout
    } else {
        SearchError::Request(err.to_string())
    }
}

/// Interpret a decoded response document.
///
/// An `error` key wins over everything else, including the HTTP status:
/// the API answers unknown keywords with 404 and an error body.
fn interpret(status: reqwest::StatusCode, document: Value) -> Result<SearchResult, SearchError> {
    if let Some(error) = document.get("error") {
        let description = document
            .get("error_description")
            .and_then(Value::as_str)
            .unwrap_or_default();
        debug!(error = %error, description, "Search API reported no matches");
        return Ok(SearchResult::Error);
    }
    if !status.is_success() {
        return Err(SearchError::Status {
            status: status.as_u16(),
        });
    }

    let response: KeywordSearchResponse =
        serde_json::from_value(document).map_err(|e| SearchError::Decode(e.to_string()))?;
    let hotels: Vec<Hotel> = response
        .hotels
        .into_iter()
        .filter_map(|parts| parts.into_iter().find_map(|part| part.hotel_basic_info))
        .map(Hotel::from)
        .collect();

    if hotels.is_empty() {
        return Ok(SearchResult::Error);
    }
    Ok(SearchResult::HotelList(hotels))
}

#[async_trait]
impl HotelSearch for RakutenClient {
    fn name(&self) -> &str {
        "rakuten"
    }

    async fn search(&self, keyword: &str) -> Result<SearchResult, SearchError> {
        let query = SearchQuery::new(keyword);
        let resp = self
            .http
            .get(&self.endpoint)
            .query(&query)
            .query(&[("applicationId", self.application_id.as_str())])
            .send()
            .await
            .map_err(request_error)?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(request_error)?;
        let document: Value = serde_json::from_slice(&body).map_err(|e| {
            warn!(
                status = status.as_u16(),
                keyword = %redact_sensitive_data(keyword),
                "Search API returned a non-JSON body"
            );
            SearchError::Decode(e.to_string())
        })?;

        let result = interpret(status, document)?;
        debug!(hits = result.hotels().len(), "Search API answered");
        Ok(result)
    }
}
