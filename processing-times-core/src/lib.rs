#![doc = "processing-times-core: core logic library for processing-times."]

//! Fetches form, office and processing-time data from the USCIS processing-times
//! API and writes it as a tab-separated report.
//!
//! # Usage
//! Build a [`client::UscisClient`] (or any [`contract::ProcessingTimesApi`]),
//! optionally a [`filter::FilterSet`], a [`report::ReportWriter`], and hand
//! them to [`traverse::traverse`].

pub mod client;
pub mod config;
pub mod contract;
pub mod filter;
pub mod report;
pub mod traverse;
