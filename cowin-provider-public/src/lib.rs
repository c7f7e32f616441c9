//! Provider implementation for the public Co-WIN appointment API.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, ClientBuilder, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use cowin_core::{
    model::{CenterMap, CenterRecord, LocationQuery},
    ports::{PortError, SlotPort},
};

const BASE_URL: &str = "https://cdn-api.co-vin.in/api";

const BY_PIN_ENDPOINT: &str = "/v2/appointment/sessions/public/calendarByPin";
const BY_DISTRICT_ENDPOINT: &str = "/v2/appointment/sessions/public/calendarByDistrict";
const BY_CENTER_ENDPOINT: &str = "/v2/appointment/sessions/public/calendarByCenter";

const USER_AGENT: &str = concat!(
    "cowin-cowboy/",
    env!("CARGO_PKG_VERSION"),
    " (vaccination slot checker)"
);

/// Response from the calendarByPin and calendarByDistrict endpoints
#[derive(Debug, Deserialize)]
struct CentersResponse {
    #[serde(default)]
    centers: Vec<Value>,
}

/// Client builder preset with the headers the API expects.
///
/// The cookie store stays disabled, so cookies set by one response are never sent again.
#[must_use]
pub fn client_builder() -> ClientBuilder {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
}

/// Build the HTTP client shared by all lookups.
///
/// # Errors
///
/// Returns [`PortError::Network`] when the TLS backend cannot be initialized.
pub fn client() -> Result<Client, PortError> {
    client_builder().build().map_err(PortError::from)
}

/// Slot lookups against the public appointment API.
pub struct PublicSlotPort {
    client: Client,
    base_url: String,
}

impl PublicSlotPort {
    /// Create a new port bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: BASE_URL.to_owned(),
        }
    }

    /// Point the port at another deployment of the API.
    #[must_use]
    pub fn with_base_url<S: Into<String>>(mut self, base_url: S) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    fn get(&self, endpoint: &str, key: (&str, &str), date: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{endpoint}", self.base_url))
            .query(&[key, ("date", date)])
    }

    async fn centers(&self, req: RequestBuilder, query: &LocationQuery) -> CenterMap {
        match fetch_json::<CentersResponse>(req).await {
            Ok(resp) => centers_by_id(resp.centers),
            Err(err) => {
                warn!("{err}: error response for {query}");
                CenterMap::new()
            }
        }
    }
}

#[async_trait]
impl SlotPort for PublicSlotPort {
    async fn by_pincode(&self, date: &str, pincode: &str) -> CenterMap {
        let req = self.get(BY_PIN_ENDPOINT, ("pincode", pincode), date);
        self.centers(req, &LocationQuery::Pincode(pincode.to_owned()))
            .await
    }

    async fn by_district(&self, date: &str, district_id: i64) -> CenterMap {
        let district = district_id.to_string();
        let req = self.get(
            BY_DISTRICT_ENDPOINT,
            ("district_id", district.as_str()),
            date,
        );
        self.centers(req, &LocationQuery::District(district_id))
            .await
    }

    async fn by_center(&self, date: &str, center_id: i64) -> Option<CenterRecord> {
        let center = center_id.to_string();
        let req = self.get(BY_CENTER_ENDPOINT, ("center_id", center.as_str()), date);

        match fetch_json::<CenterRecord>(req).await {
            Ok(record) => Some(record),
            Err(err) => {
                warn!("{err}: error response for center ID {center_id}");
                None
            }
        }
    }
}

// Decodes each center on its own so one malformed entry does not hide the others.
fn centers_by_id(raw: Vec<Value>) -> CenterMap {
    let mut centers = CenterMap::new();

    for value in raw {
        let center = match serde_json::from_value::<CenterRecord>(value) {
            Ok(center) => center,
            Err(err) => {
                warn!("Skipping undecodable center: {err}");
                continue;
            }
        };
        let Some(center_id) = center.center_id() else {
            warn!("Skipping center without a numeric center_id");
            continue;
        };
        centers.insert(center_id, center);
    }

    centers
}

// Small helper to fetch and decode JSON with status handling.
async fn fetch_json<T: DeserializeOwned>(req: RequestBuilder) -> Result<T, PortError> {
    let resp = req.send().await?;
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        debug!("Response:\n{body}");
        return Err(PortError::Status(status));
    }

    serde_json::from_str(&body).map_err(|err| {
        debug!("Response:\n{body}");
        PortError::from(err)
    })
}
