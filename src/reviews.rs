use crate::models::{RatingHistogram, Review, ReviewRatings, ReviewStats};

/// Mean of the five criterion scores of a review.
pub fn overall_rating(ratings: &ReviewRatings) -> f64 {
    let entries = ratings.entries();
    entries.iter().map(|(_, score)| score).sum::<f64>() / entries.len() as f64
}

/// Rounds half away from zero to one decimal place.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn aggregate_reviews(reviews: &[Review], university_id: u32) -> ReviewStats {
    let selected: Vec<&Review> = reviews
        .iter()
        .filter(|review| review.university_id == university_id)
        .collect();

    if selected.is_empty() {
        return ReviewStats {
            total_reviews: 0,
            average_rating: 0.0,
            rating_distribution: RatingHistogram::default(),
            criteria_averages: ReviewRatings::default(),
        };
    }

    let count = selected.len() as f64;
    let mut histogram = RatingHistogram::default();
    let mut overall_total = 0.0;
    let mut sums = ReviewRatings::default();

    for review in &selected {
        overall_total += review.overall_rating;
        histogram.record(review.overall_rating.round() as i64);

        sums.academic_quality += review.ratings.academic_quality;
        sums.campus_facilities += review.ratings.campus_facilities;
        sums.student_life += review.ratings.student_life;
        sums.career_services += review.ratings.career_services;
        sums.research_opportunities += review.ratings.research_opportunities;
    }

    ReviewStats {
        total_reviews: selected.len(),
        average_rating: round_to_tenth(overall_total / count),
        rating_distribution: histogram,
        criteria_averages: ReviewRatings {
            academic_quality: sums.academic_quality / count,
            campus_facilities: sums.campus_facilities / count,
            student_life: sums.student_life / count,
            career_services: sums.career_services / count,
            research_opportunities: sums.research_opportunities / count,
        },
    }
}

/// Reviews for one university, newest first. Equal timestamps keep their
/// original relative order.
pub fn reviews_for_university(reviews: &[Review], university_id: u32) -> Vec<Review> {
    let mut matching: Vec<Review> = reviews
        .iter()
        .filter(|review| review.university_id == university_id)
        .cloned()
        .collect();
    matching.sort_by(|a, b| b.date.cmp(&a.date));
    matching
}

pub fn search_reviews(reviews: &[Review], query: &str) -> Vec<Review> {
    let term = query.to_lowercase();
    reviews
        .iter()
        .filter(|review| {
            review.review_text.to_lowercase().contains(&term)
                || review.program.to_lowercase().contains(&term)
                || review.reviewer_name.to_lowercase().contains(&term)
        })
        .cloned()
        .collect()
}

pub fn reviews_by_program(reviews: &[Review], program: &str) -> Vec<Review> {
    if program.is_empty() {
        return reviews.to_vec();
    }
    let program = program.to_lowercase();
    reviews
        .iter()
        .filter(|review| review.program.to_lowercase() == program)
        .cloned()
        .collect()
}

pub fn reviews_with_min_rating(reviews: &[Review], min_rating: f64) -> Vec<Review> {
    reviews
        .iter()
        .filter(|review| review.overall_rating >= min_rating)
        .cloned()
        .collect()
}
