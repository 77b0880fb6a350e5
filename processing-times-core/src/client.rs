//! HTTP implementation of [`ProcessingTimesApi`] against the USCIS processing-times API.
//!
//! Every response is wrapped in an envelope of the form `data.<resource>.<resource>`;
//! only the fields the report needs are decoded and anything else is ignored.
//! All requests share one `reqwest::Client` built with the configured timeout.

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ApiConfig;
use crate::contract::{ApiError, Form, Office, ProcessingTimesApi, SubType, TimeBound, TimeRange};

#[derive(Deserialize)]
struct FormsResponse {
    data: FormsData,
}

#[derive(Deserialize)]
struct FormsData {
    forms: FormsList,
}

#[derive(Deserialize)]
struct FormsList {
    forms: Vec<WireForm>,
}

#[derive(Deserialize)]
struct WireForm {
    form_name: String,
    #[serde(default, alias = "form_description")]
    form_description_en: String,
}

#[derive(Deserialize)]
struct OfficesResponse {
    data: OfficesData,
}

#[derive(Deserialize)]
struct OfficesData {
    form_offices: OfficesList,
}

#[derive(Deserialize)]
struct OfficesList {
    offices: Vec<WireOffice>,
}

#[derive(Deserialize)]
struct WireOffice {
    office_code: String,
    office_description: String,
}

#[derive(Deserialize)]
struct ProcessingTimeResponse {
    data: ProcessingTimeData,
}

#[derive(Deserialize)]
struct ProcessingTimeData {
    processing_time: WireProcessingTime,
}

#[derive(Deserialize)]
struct WireProcessingTime {
    #[serde(default, alias = "sub_types")]
    subtypes: Vec<WireSubType>,
}

#[derive(Deserialize)]
struct WireSubType {
    #[serde(default)]
    form_type: String,
    range: Vec<WireBound>,
    #[serde(default)]
    service_request_date: String,
    #[serde(default)]
    subtype_info_en: String,
}

#[derive(Deserialize)]
struct WireBound {
    unit: String,
    value: f64,
}

impl From<WireBound> for TimeBound {
    fn from(b: WireBound) -> Self {
        TimeBound {
            value: b.value,
            unit: b.unit,
        }
    }
}

/// Index 0 of `range` is the lower bound, index 1 the upper; further entries are ignored.
fn into_sub_type(raw: WireSubType) -> Result<SubType, String> {
    let count = raw.range.len();
    let mut bounds = raw.range.into_iter();
    let (lower, upper) = match (bounds.next(), bounds.next()) {
        (Some(lower), Some(upper)) => (lower, upper),
        _ => {
            return Err(format!(
                "sub type {:?} has {count} range bounds, expected at least 2",
                raw.form_type
            ))
        }
    };
    Ok(SubType {
        form_type: raw.form_type,
        range: TimeRange {
            lower: lower.into(),
            upper: upper.into(),
        },
        sub_type_info: raw.subtype_info_en,
        service_request_date: raw.service_request_date,
    })
}

/// Client for the public processing-times API.
pub struct UscisClient {
    http: reqwest::Client,
    base_url: Url,
}

impl UscisClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| ApiError::InvalidBaseUrl {
            base_url: config.base_url.clone(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl {
                base_url: config.base_url.clone(),
                reason: "URL cannot have path segments".to_string(),
            });
        }
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ApiError::Client)?;
        tracing::info!(
            base_url = %base_url,
            timeout_secs = config.timeout_secs,
            "Initialized processing-times client"
        );
        Ok(UscisClient { http, base_url })
    }

    /// Base URL with `segments` appended as escaped path segments.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: "URL cannot have path segments".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let url_str = url.to_string();
        debug!(url = %url_str, "GET");

        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| ApiError::Network {
                url: url_str.clone(),
                source,
            })?;

        let status = resp.status();
        if status != StatusCode::OK {
            warn!(url = %url_str, status = status.as_u16(), "Non-200 response");
            return Err(ApiError::Status {
                url: url_str,
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(|source| ApiError::Network {
            url: url_str.clone(),
            source,
        })?;
        serde_json::from_str(&body).map_err(|e| ApiError::Decode {
            url: url_str,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl ProcessingTimesApi for UscisClient {
    async fn list_forms(&self) -> Result<Vec<Form>, ApiError> {
        let url = self.endpoint(&["forms"])?;
        let resp: FormsResponse = self.get_json(url).await?;
        let forms: Vec<Form> = resp
            .data
            .forms
            .forms
            .into_iter()
            .map(|f| Form {
                name: f.form_name,
                description: f.form_description_en,
            })
            .collect();
        debug!(count = forms.len(), "Fetched forms");
        Ok(forms)
    }

    async fn list_offices(&self, form_name: &str) -> Result<Vec<Office>, ApiError> {
        let url = self.endpoint(&["formoffices", form_name])?;
        let resp: OfficesResponse = self.get_json(url).await?;
        Ok(resp
            .data
            .form_offices
            .offices
            .into_iter()
            .map(|o| Office {
                code: o.office_code,
                description: o.office_description,
            })
            .collect())
    }

    async fn get_processing_time(
        &self,
        form_name: &str,
        office_code: &str,
    ) -> Result<Vec<SubType>, ApiError> {
        let url = self.endpoint(&["processingtime", form_name, office_code])?;
        let url_str = url.to_string();
        let resp: ProcessingTimeResponse = self.get_json(url).await?;
        resp.data
            .processing_time
            .subtypes
            .into_iter()
            .map(into_sub_type)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|reason| ApiError::Decode {
                url: url_str,
                reason,
            })
    }
}
