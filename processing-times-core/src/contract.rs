//! # contract: domain types and the seams of the fetch/report pipeline
//!
//! This module defines the plain data fetched from the processing-times API,
//! the error taxonomy for API access, and the capability traits the
//! traversal is written against:
//!
//! - [`ProcessingTimesApi`]: the three read requests (forms, offices, processing times).
//! - [`ReportSink`]: where report lines go (`write_header`, `write_row`).
//! - [`OfficeFilter`]: optional allow-list of (form, office) pairs.
//! - [`Progress`]: operator-facing progress callbacks; purely observational.
//!
//! ## Mocking & Testing
//! - `ProcessingTimesApi` and `ReportSink` are annotated for `mockall` so the
//!   traversal can be driven deterministically without a network or a disk.

use async_trait::async_trait;
use std::io;

use mockall::automock;

/// A form type known to the API, e.g. `I-130`.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub name: String,
    pub description: String,
}

/// An office (field office or service center) that processes a given form.
#[derive(Debug, Clone, PartialEq)]
pub struct Office {
    /// Machine code used in the processing-time request.
    pub code: String,
    /// Display name used in the report and for filter matching.
    pub description: String,
}

/// One bound of a processing-time range.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeBound {
    pub value: f64,
    pub unit: String,
}

/// Processing-time range of a sub type. The API sends it as a two element
/// array: index 0 is the lower (faster) bound, index 1 the upper one.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeRange {
    pub lower: TimeBound,
    pub upper: TimeBound,
}

/// A processing-time bucket within a (form, office) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct SubType {
    pub form_type: String,
    pub range: TimeRange,
    pub sub_type_info: String,
    /// Free-form date string, passed through untouched.
    pub service_request_date: String,
}

/// Errors from talking to the processing-times API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid API base URL {base_url:?}: {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("unexpected response body from {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// Read access to the processing-times API.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ProcessingTimesApi: Send + Sync {
    /// All forms, in the order the API returns them.
    async fn list_forms(&self) -> Result<Vec<Form>, ApiError>;

    /// Offices handling `form_name`.
    async fn list_offices(&self, form_name: &str) -> Result<Vec<Office>, ApiError>;

    /// Processing-time sub types for one (form, office) pair.
    async fn get_processing_time(
        &self,
        form_name: &str,
        office_code: &str,
    ) -> Result<Vec<SubType>, ApiError>;
}

/// What a report row carries after the form and office columns.
#[derive(Debug, Clone, PartialEq)]
pub enum RowCells {
    Times {
        range: TimeRange,
        sub_type_info: String,
        service_request_date: String,
    },
    /// The processing-time fetch for the pair failed.
    Error,
}

/// One line of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub form: String,
    pub office: String,
    pub cells: RowCells,
}

impl ReportRow {
    pub fn times(form: &str, office: &str, sub_type: &SubType) -> Self {
        ReportRow {
            form: form.to_string(),
            office: office.to_string(),
            cells: RowCells::Times {
                range: sub_type.range.clone(),
                sub_type_info: sub_type.sub_type_info.clone(),
                service_request_date: sub_type.service_request_date.clone(),
            },
        }
    }

    pub fn error(form: &str, office: &str) -> Self {
        ReportRow {
            form: form.to_string(),
            office: office.to_string(),
            cells: RowCells::Error,
        }
    }
}

/// Destination for report lines. Every call must leave its line durable
/// before returning.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
pub trait ReportSink {
    fn write_header(&mut self) -> io::Result<()>;
    fn write_row(&mut self, row: &ReportRow) -> io::Result<()>;
}

/// Allow-list over (form, office description) pairs.
pub trait OfficeFilter {
    /// `true` when nothing was configured, i.e. every office passes.
    fn is_empty(&self) -> bool;
    fn contains(&self, form_name: &str, office_description: &str) -> bool;
}

/// Result of one (form, office) attempt, as shown to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairOutcome {
    Done { rows: usize },
    Failed,
}

/// Operator-facing progress. None of this ends up in the report.
pub trait Progress {
    fn form_skipped(&mut self, _form: &str, _error: &ApiError) {}
    fn pair_started(&mut self, _form: &str, _office: &str) {}
    fn pair_finished(&mut self, _form: &str, _office: &str, _outcome: PairOutcome) {}
}

/// Progress that reports nothing.
pub struct NoProgress;

impl Progress for NoProgress {}
