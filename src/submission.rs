use chrono::{DateTime, Utc};
use rand::Rng;

use crate::error::CatalogError;
use crate::models::{NewReviewInput, Review, ReviewRatings};
use crate::reviews::overall_rating;

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Decides whether a freshly submitted review is marked verified.
pub trait VerificationPolicy {
    fn is_verified(&mut self, input: &NewReviewInput) -> bool;
}

pub struct RandomVerification {
    probability: f64,
}

impl RandomVerification {
    pub fn new(probability: f64) -> Self {
        Self {
            probability: probability.clamp(0.0, 1.0),
        }
    }
}

impl VerificationPolicy for RandomVerification {
    fn is_verified(&mut self, _input: &NewReviewInput) -> bool {
        rand::thread_rng().gen_bool(self.probability)
    }
}

pub struct AlwaysVerified;

impl VerificationPolicy for AlwaysVerified {
    fn is_verified(&mut self, _input: &NewReviewInput) -> bool {
        true
    }
}

pub struct NeverVerified;

impl VerificationPolicy for NeverVerified {
    fn is_verified(&mut self, _input: &NewReviewInput) -> bool {
        false
    }
}

pub trait IdAllocator {
    fn next_id(&self, existing_ids: &mut dyn Iterator<Item = u32>) -> u32;
}

/// Current maximum plus one, or 1 for an empty collection. Not safe if the
/// collection is mutated between allocation and insert.
pub struct MaxPlusOne;

impl IdAllocator for MaxPlusOne {
    fn next_id(&self, existing_ids: &mut dyn Iterator<Item = u32>) -> u32 {
        existing_ids.max().map_or(1, |max| max + 1)
    }
}

pub fn validate_review(input: &NewReviewInput) -> Result<(), CatalogError> {
    if input.review_text.trim().is_empty() {
        return Err(CatalogError::Validation {
            field: "reviewText",
        });
    }
    if input.program.is_empty() {
        return Err(CatalogError::Validation { field: "program" });
    }
    if input.reviewer_name.trim().is_empty() {
        return Err(CatalogError::Validation {
            field: "reviewerName",
        });
    }
    validate_ratings(&input.ratings)
}

pub fn validate_ratings(ratings: &ReviewRatings) -> Result<(), CatalogError> {
    for (criterion, value) in ratings.entries() {
        if !(1.0..=5.0).contains(&value) {
            return Err(CatalogError::InvalidRating { criterion, value });
        }
    }
    Ok(())
}

/// Builds a new review record without touching `existing`; the caller appends it.
pub fn create_review(
    existing: &[Review],
    ids: &dyn IdAllocator,
    input: NewReviewInput,
    clock: &dyn Clock,
    verifier: &mut dyn VerificationPolicy,
) -> Result<Review, CatalogError> {
    validate_review(&input)?;

    let id = ids.next_id(&mut existing.iter().map(|review| review.id));
    let is_verified = verifier.is_verified(&input);
    let date = input.date.unwrap_or_else(|| clock.now());

    Ok(Review {
        id,
        university_id: input.university_id,
        reviewer_name: input.reviewer_name,
        program: input.program,
        review_text: input.review_text,
        overall_rating: overall_rating(&input.ratings),
        ratings: input.ratings,
        date,
        is_verified,
    })
}

/// Bundles the collaborators review creation depends on.
pub struct ReviewFactory {
    clock: Box<dyn Clock + Send>,
    verifier: Box<dyn VerificationPolicy + Send>,
    ids: Box<dyn IdAllocator + Send>,
}

impl ReviewFactory {
    pub fn new(
        clock: Box<dyn Clock + Send>,
        verifier: Box<dyn VerificationPolicy + Send>,
        ids: Box<dyn IdAllocator + Send>,
    ) -> Self {
        Self {
            clock,
            verifier,
            ids,
        }
    }

    pub fn system(verification_probability: f64) -> Self {
        Self::new(
            Box::new(SystemClock),
            Box::new(RandomVerification::new(verification_probability)),
            Box::new(MaxPlusOne),
        )
    }

    pub fn create(&mut self, existing: &[Review], input: NewReviewInput) -> Result<Review, CatalogError> {
        create_review(
            existing,
            self.ids.as_ref(),
            input,
            self.clock.as_ref(),
            self.verifier.as_mut(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reviews::tests::sample_review;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn input() -> NewReviewInput {
        NewReviewInput {
            university_id: 2,
            reviewer_name: "Omar Mohamed".to_string(),
            program: "Business Administration".to_string(),
            review_text: "Vibrant campus life".to_string(),
            ratings: ReviewRatings {
                academic_quality: 4.0,
                campus_facilities: 5.0,
                student_life: 5.0,
                career_services: 3.0,
                research_opportunities: 3.0,
            },
            date: None,
        }
    }

    fn existing() -> Vec<Review> {
        (1..=4)
            .map(|id| sample_review(id, 1, 4.0, fixed_time()))
            .collect()
    }

    #[test]
    fn assigns_next_id_and_derived_fields() {
        let reviews = existing();
        let review = create_review(
            &reviews,
            &MaxPlusOne,
            input(),
            &FixedClock(fixed_time()),
            &mut AlwaysVerified,
        )
        .unwrap();

        assert_eq!(review.id, 5);
        assert_eq!(review.overall_rating, 4.0);
        assert_eq!(review.date, fixed_time());
        assert!(review.is_verified);
        assert_eq!(reviews.len(), 4);
    }

    #[test]
    fn first_review_gets_id_one_and_keeps_supplied_date() {
        let supplied = Utc.with_ymd_and_hms(2023, 12, 31, 8, 0, 0).unwrap();
        let mut submission = input();
        submission.date = Some(supplied);

        let review = create_review(
            &[],
            &MaxPlusOne,
            submission,
            &FixedClock(fixed_time()),
            &mut NeverVerified,
        )
        .unwrap();

        assert_eq!(review.id, 1);
        assert_eq!(review.date, supplied);
        assert!(!review.is_verified);
    }

    #[test]
    fn rejects_blank_review_text() {
        let mut submission = input();
        submission.review_text = "   ".to_string();
        let result = create_review(
            &existing(),
            &MaxPlusOne,
            submission,
            &FixedClock(fixed_time()),
            &mut AlwaysVerified,
        );
        assert_eq!(
            result,
            Err(CatalogError::Validation {
                field: "reviewText"
            })
        );
    }

    #[test]
    fn rejects_missing_program_and_name() {
        let mut no_program = input();
        no_program.program = String::new();
        assert_eq!(
            validate_review(&no_program),
            Err(CatalogError::Validation { field: "program" })
        );

        let mut no_name = input();
        no_name.reviewer_name = " \t".to_string();
        assert_eq!(
            validate_review(&no_name),
            Err(CatalogError::Validation {
                field: "reviewerName"
            })
        );
    }

    #[test]
    fn rejects_out_of_range_scores() {
        let mut submission = input();
        submission.ratings.career_services = 0.5;
        assert_eq!(
            validate_review(&submission),
            Err(CatalogError::InvalidRating {
                criterion: "Career Services",
                value: 0.5
            })
        );
    }

    #[test]
    fn factory_uses_injected_collaborators() {
        let mut factory = ReviewFactory::new(
            Box::new(FixedClock(fixed_time())),
            Box::new(NeverVerified),
            Box::new(MaxPlusOne),
        );
        let review = factory.create(&existing(), input()).unwrap();
        assert_eq!(review.id, 5);
        assert!(!review.is_verified);
    }

    #[test]
    fn random_policy_honours_extremes() {
        assert!(RandomVerification::new(1.0).is_verified(&input()));
        assert!(!RandomVerification::new(0.0).is_verified(&input()));
    }
}
