use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};

use crate::error::CatalogError;
use crate::models::{NewReviewInput, ReviewRatings};
use crate::store::CatalogStore;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Submits every CSV row as a review in one batch. Rows the store rejects are
/// skipped; unreadable CSV aborts the import before anything is inserted.
pub async fn import_reviews(store: &mut CatalogStore, csv_path: &Path) -> anyhow::Result<ImportSummary> {
    #[derive(serde::Deserialize)]
    struct CsvRow {
        university_id: u32,
        reviewer_name: String,
        program: String,
        review_text: String,
        academic_quality: f64,
        campus_facilities: f64,
        student_life: f64,
        career_services: f64,
        research_opportunities: f64,
        date: Option<DateTime<Utc>>,
    }

    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("failed to open {}", csv_path.display()))?;

    let mut inputs = Vec::new();
    for (line, result) in reader.deserialize::<CsvRow>().enumerate() {
        let row = result.with_context(|| format!("malformed row {}", line + 1))?;
        inputs.push(NewReviewInput {
            university_id: row.university_id,
            reviewer_name: row.reviewer_name,
            program: row.program,
            review_text: row.review_text,
            ratings: ReviewRatings {
                academic_quality: row.academic_quality,
                campus_facilities: row.campus_facilities,
                student_life: row.student_life,
                career_services: row.career_services,
                research_opportunities: row.research_opportunities,
            },
            date: row.date,
        });
    }

    let mut summary = ImportSummary::default();
    for (line, result) in store.submit_reviews(inputs).await.into_iter().enumerate() {
        match result {
            Ok(_) => summary.inserted += 1,
            Err(err @ (CatalogError::Validation { .. }
            | CatalogError::InvalidRating { .. }
            | CatalogError::NotFound { .. })) => {
                tracing::warn!(row = line + 1, error = %err, "skipping review row");
                summary.skipped += 1;
            }
        }
    }

    Ok(summary)
}
