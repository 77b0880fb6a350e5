//! High-level pipeline: forms → offices → processing times → report rows.
//!
//! [`traverse`] walks the API strictly in order, one request at a time:
//!   - Fetches every form. Failing here aborts the run: there is nothing to report without forms.
//!   - For each form, fetches its offices. A failure skips that form only.
//!   - For each office that passes the filter, fetches processing times and
//!     writes one row per sub type. A failure writes a single `ERROR` row for the pair.
//!
//! Forms and offices are visited in the order the API returns them.
//!
//! # Error Handling
//! Only two outcomes are fatal, see [`TraverseError`]. Everything else is logged,
//! recorded in the returned [`TraversalReport`], and the walk continues.

use tracing::{error, info, warn};

use crate::contract::{
    ApiError, OfficeFilter, PairOutcome, ProcessingTimesApi, Progress, ReportRow, ReportSink,
};

#[derive(Debug, thiserror::Error)]
pub enum TraverseError {
    #[error("unable to fetch forms: {0}")]
    ListForms(#[source] ApiError),

    #[error("unable to write report: {0}")]
    Sink(#[source] std::io::Error),
}

#[derive(Debug)]
pub struct FormFailure {
    pub form: String,
    pub error: ApiError,
}

#[derive(Debug)]
pub struct PairFailure {
    pub form: String,
    pub office: String,
    pub error: ApiError,
}

/// What a traversal did.
#[derive(Debug, Default)]
pub struct TraversalReport {
    pub forms: usize,
    pub forms_skipped: Vec<FormFailure>,
    pub offices_filtered: usize,
    pub pairs_fetched: usize,
    pub pairs_failed: Vec<PairFailure>,
    pub rows_written: usize,
}

fn emit(
    sink: &mut Option<&mut dyn ReportSink>,
    row: &ReportRow,
    report: &mut TraversalReport,
) -> Result<(), TraverseError> {
    if let Some(sink) = sink.as_deref_mut() {
        sink.write_row(row).map_err(TraverseError::Sink)?;
    }
    report.rows_written += 1;
    Ok(())
}

/// Runs the whole fetch/report pass.
///
/// `filter` of `None`, or an empty filter, lets every office through. Without a
/// `sink` the walk still happens and rows are only counted.
pub async fn traverse<A>(
    api: &A,
    filter: Option<&dyn OfficeFilter>,
    mut sink: Option<&mut dyn ReportSink>,
    progress: &mut dyn Progress,
) -> Result<TraversalReport, TraverseError>
where
    A: ProcessingTimesApi + ?Sized,
{
    info!("[TRAVERSE] Starting processing-times traversal");
    let mut report = TraversalReport::default();

    if let Some(sink) = sink.as_deref_mut() {
        sink.write_header().map_err(TraverseError::Sink)?;
    }

    let forms = match api.list_forms().await {
        Ok(forms) => forms,
        Err(e) => {
            error!(error = %e, "[TRAVERSE][FATAL] Unable to fetch forms");
            return Err(TraverseError::ListForms(e));
        }
    };
    info!(count = forms.len(), "[TRAVERSE] Fetched forms");
    let filter = filter.filter(|f| !f.is_empty());

    for form in &forms {
        report.forms += 1;

        let offices = match api.list_offices(&form.name).await {
            Ok(offices) => offices,
            Err(e) => {
                warn!(form = %form.name, error = %e, "[TRAVERSE] Unable to get offices, skipping form");
                progress.form_skipped(&form.name, &e);
                report.forms_skipped.push(FormFailure {
                    form: form.name.clone(),
                    error: e,
                });
                continue;
            }
        };

        for office in &offices {
            if let Some(f) = filter {
                if !f.contains(&form.name, &office.description) {
                    report.offices_filtered += 1;
                    continue;
                }
            }

            progress.pair_started(&form.name, &office.description);
            match api.get_processing_time(&form.name, &office.code).await {
                Ok(sub_types) => {
                    report.pairs_fetched += 1;
                    for sub_type in &sub_types {
                        let row = ReportRow::times(&form.name, &office.description, sub_type);
                        emit(&mut sink, &row, &mut report)?;
                    }
                    progress.pair_finished(
                        &form.name,
                        &office.description,
                        PairOutcome::Done {
                            rows: sub_types.len(),
                        },
                    );
                }
                Err(e) => {
                    warn!(
                        form = %form.name,
                        office = %office.description,
                        error = %e,
                        "[TRAVERSE] Unable to get processing time, writing error row"
                    );
                    let row = ReportRow::error(&form.name, &office.description);
                    emit(&mut sink, &row, &mut report)?;
                    progress.pair_finished(&form.name, &office.description, PairOutcome::Failed);
                    report.pairs_failed.push(PairFailure {
                        form: form.name.clone(),
                        office: office.description.clone(),
                        error: e,
                    });
                }
            }
        }
    }

    info!(
        forms = report.forms,
        forms_skipped = report.forms_skipped.len(),
        pairs_fetched = report.pairs_fetched,
        pairs_failed = report.pairs_failed.len(),
        rows = report.rows_written,
        "[TRAVERSE] Traversal complete"
    );
    Ok(report)
}
