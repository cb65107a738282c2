use std::collections::HashMap;
use std::time::Duration;

use crate::catalog::filter_universities;
use crate::config::Config;
use crate::error::CatalogError;
use crate::fixtures::{self, Fixtures};
use crate::models::{
    default_ranking_year, FilterCriteria, NewReviewInput, RankedUniversity, Ranking,
    RankingUpdate, Review, ReviewPatch, ReviewStats, University, UniversityDetail,
    UniversityDetails, UniversityPatch,
};
use crate::rankings::join_rankings;
use crate::reviews::{self, overall_rating};
use crate::submission::{validate_ratings, validate_review, ReviewFactory};

/// In-memory catalog state for one process. Every operation waits out a
/// simulated latency before running; reads hand back copies.
pub struct CatalogStore {
    universities: Vec<University>,
    rankings: Vec<Ranking>,
    reviews: Vec<Review>,
    details: HashMap<u32, UniversityDetails>,
    factory: ReviewFactory,
    read_latency: Duration,
    write_latency: Duration,
}

impl CatalogStore {
    pub fn new(fixtures: Fixtures, factory: ReviewFactory) -> Self {
        Self {
            universities: fixtures.universities,
            rankings: fixtures.rankings,
            reviews: fixtures.reviews,
            details: fixtures
                .details
                .into_iter()
                .map(|row| (row.university_id, row))
                .collect(),
            factory,
            read_latency: Duration::ZERO,
            write_latency: Duration::ZERO,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let fixtures = fixtures::load(&config.fixtures)?;
        Ok(Self::new(fixtures, ReviewFactory::system(config.verification_probability))
            .with_latency(config.read_latency, config.write_latency))
    }

    pub fn with_latency(mut self, read: Duration, write: Duration) -> Self {
        self.read_latency = read;
        self.write_latency = write;
        self
    }

    /// Catalog records without simulated latency, for facet listings.
    pub fn universities(&self) -> &[University] {
        &self.universities
    }

    async fn pause(latency: Duration) {
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
    }

    pub async fn list_universities(&self, criteria: &FilterCriteria) -> Vec<University> {
        Self::pause(self.read_latency).await;
        let universities = filter_universities(&self.universities, criteria);
        tracing::debug!(matched = universities.len(), "listed universities");
        universities
    }

    pub async fn get_university(&self, id: u32) -> Result<University, CatalogError> {
        Self::pause(self.read_latency).await;
        tracing::debug!(university_id = id, "get university");
        self.find_university(id).cloned()
    }

    fn find_university(&self, id: u32) -> Result<&University, CatalogError> {
        self.universities
            .iter()
            .find(|university| university.id == id)
            .ok_or_else(|| CatalogError::not_found("University", id))
    }

    pub async fn university_detail(&self, id: u32) -> Result<UniversityDetail, CatalogError> {
        Self::pause(self.read_latency).await;
        let university = self.find_university(id)?.clone();
        let details = self.details.get(&id).cloned().unwrap_or_else(|| UniversityDetails {
            university_id: id,
            ..Default::default()
        });
        tracing::debug!(
            university_id = id,
            has_details = self.details.contains_key(&id),
            "university detail"
        );
        Ok(UniversityDetail {
            university,
            details,
        })
    }

    pub async fn create_university(&mut self, mut university: University) -> University {
        Self::pause(self.write_latency).await;
        university.id = self
            .universities
            .iter()
            .map(|existing| existing.id)
            .max()
            .map_or(1, |max| max + 1);
        self.universities.push(university.clone());
        tracing::info!(university_id = university.id, "university created");
        university
    }

    /// Merges the supplied fields into an existing university; the id never changes.
    pub async fn update_university(
        &mut self,
        id: u32,
        patch: UniversityPatch,
    ) -> Result<University, CatalogError> {
        Self::pause(self.write_latency).await;
        let university = self
            .universities
            .iter_mut()
            .find(|university| university.id == id)
            .ok_or_else(|| CatalogError::not_found("University", id))?;

        if let Some(name) = patch.name {
            university.name = name;
        }
        if let Some(name_ar) = patch.name_ar {
            university.name_ar = name_ar;
        }
        if let Some(location) = patch.location {
            university.location = location;
        }
        if let Some(governorate) = patch.governorate {
            university.governorate = governorate;
        }
        if let Some(kind) = patch.kind {
            university.kind = kind;
        }
        if let Some(year) = patch.established_year {
            university.established_year = year;
        }
        if let Some(count) = patch.student_count {
            university.student_count = count;
        }
        if let Some(programs) = patch.programs {
            university.programs = programs;
        }
        if let Some(ratings) = patch.ratings {
            university.ratings = ratings;
        }
        if let Some(logo_url) = patch.logo_url {
            university.logo_url = Some(logo_url);
        }

        tracing::debug!(university_id = id, "university updated");
        Ok(university.clone())
    }

    /// Reviews and rankings naming the removed university are left in place.
    pub async fn delete_university(&mut self, id: u32) -> Result<University, CatalogError> {
        Self::pause(self.write_latency).await;
        let index = self
            .universities
            .iter()
            .position(|university| university.id == id)
            .ok_or_else(|| CatalogError::not_found("University", id))?;
        tracing::debug!(university_id = id, "university deleted");
        Ok(self.universities.remove(index))
    }

    pub async fn all_reviews(&self) -> Vec<Review> {
        Self::pause(self.read_latency).await;
        tracing::debug!(count = self.reviews.len(), "listed reviews");
        self.reviews.clone()
    }

    pub async fn get_review(&self, id: u32) -> Result<Review, CatalogError> {
        Self::pause(self.read_latency).await;
        tracing::debug!(review_id = id, "get review");
        self.reviews
            .iter()
            .find(|review| review.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found("Review", id))
    }

    pub async fn reviews_for(&self, university_id: u32) -> Vec<Review> {
        Self::pause(self.read_latency).await;
        let matching = reviews::reviews_for_university(&self.reviews, university_id);
        tracing::debug!(university_id, count = matching.len(), "reviews for university");
        matching
    }

    pub async fn review_stats(&self, university_id: u32) -> ReviewStats {
        Self::pause(self.read_latency).await;
        let stats = reviews::aggregate_reviews(&self.reviews, university_id);
        tracing::debug!(university_id, total = stats.total_reviews, "review stats");
        stats
    }

    pub async fn search_reviews(&self, query: &str) -> Vec<Review> {
        Self::pause(self.read_latency).await;
        let matching = reviews::search_reviews(&self.reviews, query);
        tracing::debug!(query, count = matching.len(), "searched reviews");
        matching
    }

    pub async fn reviews_by_program(&self, program: &str) -> Vec<Review> {
        Self::pause(self.read_latency).await;
        let matching = reviews::reviews_by_program(&self.reviews, program);
        tracing::debug!(program, count = matching.len(), "reviews by program");
        matching
    }

    pub async fn reviews_with_min_rating(&self, min_rating: f64) -> Vec<Review> {
        Self::pause(self.read_latency).await;
        let matching = reviews::reviews_with_min_rating(&self.reviews, min_rating);
        tracing::debug!(min_rating, count = matching.len(), "reviews above rating");
        matching
    }

    /// Validates, checks the university exists, then appends the new review.
    pub async fn submit_review(&mut self, input: NewReviewInput) -> Result<Review, CatalogError> {
        Self::pause(self.write_latency).await;
        self.accept_review(input)
    }

    /// Submits several reviews behind a single write latency. Each input is
    /// accepted or rejected on its own, in order.
    pub async fn submit_reviews(
        &mut self,
        inputs: Vec<NewReviewInput>,
    ) -> Vec<Result<Review, CatalogError>> {
        Self::pause(self.write_latency).await;
        let results: Vec<_> = inputs
            .into_iter()
            .map(|input| self.accept_review(input))
            .collect();
        tracing::debug!(count = results.len(), "batch of reviews submitted");
        results
    }

    fn accept_review(&mut self, input: NewReviewInput) -> Result<Review, CatalogError> {
        validate_review(&input)?;
        self.find_university(input.university_id)?;

        let review = self.factory.create(&self.reviews, input)?;
        self.reviews.push(review.clone());
        tracing::info!(
            review_id = review.id,
            university_id = review.university_id,
            verified = review.is_verified,
            "review submitted"
        );
        Ok(review)
    }

    pub async fn update_review(&mut self, id: u32, patch: ReviewPatch) -> Result<Review, CatalogError> {
        Self::pause(self.write_latency).await;
        if let Some(text) = &patch.review_text {
            if text.trim().is_empty() {
                return Err(CatalogError::Validation {
                    field: "reviewText",
                });
            }
        }
        if let Some(program) = &patch.program {
            if program.is_empty() {
                return Err(CatalogError::Validation { field: "program" });
            }
        }
        if let Some(ratings) = &patch.ratings {
            validate_ratings(ratings)?;
        }

        let review = self
            .reviews
            .iter_mut()
            .find(|review| review.id == id)
            .ok_or_else(|| CatalogError::not_found("Review", id))?;

        if let Some(text) = patch.review_text {
            review.review_text = text;
        }
        if let Some(program) = patch.program {
            review.program = program;
        }
        if let Some(ratings) = patch.ratings {
            review.ratings = ratings;
            review.overall_rating = overall_rating(&ratings);
        }
        tracing::debug!(review_id = id, "review updated");
        Ok(review.clone())
    }

    pub async fn delete_review(&mut self, id: u32) -> Result<Review, CatalogError> {
        Self::pause(self.write_latency).await;
        let index = self
            .reviews
            .iter()
            .position(|review| review.id == id)
            .ok_or_else(|| CatalogError::not_found("Review", id))?;
        tracing::debug!(review_id = id, "review deleted");
        Ok(self.reviews.remove(index))
    }

    pub async fn rankings(&self) -> Vec<RankedUniversity> {
        Self::pause(self.read_latency).await;
        let rows = join_rankings(&self.rankings, &self.universities);
        tracing::debug!(joined = rows.len(), stored = self.rankings.len(), "joined rankings");
        rows
    }

    pub async fn top_universities(&self, limit: usize) -> Vec<RankedUniversity> {
        let mut rows = self.rankings().await;
        rows.truncate(limit);
        rows
    }

    pub async fn ranking_for(&self, university_id: u32) -> Result<Ranking, CatalogError> {
        Self::pause(self.read_latency).await;
        tracing::debug!(university_id, "get ranking");
        self.rankings
            .iter()
            .find(|ranking| ranking.university_id == university_id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found("Ranking for university", university_id))
    }

    /// Updates the row for `university_id` in place, or appends a new one.
    pub async fn upsert_ranking(&mut self, university_id: u32, update: RankingUpdate) -> Ranking {
        Self::pause(self.write_latency).await;
        if let Some(ranking) = self
            .rankings
            .iter_mut()
            .find(|ranking| ranking.university_id == university_id)
        {
            apply_ranking_update(ranking, &update);
            tracing::debug!(university_id, ranking_id = ranking.id, "ranking updated");
            return ranking.clone();
        }

        let mut ranking = Ranking {
            id: self.rankings.iter().map(|r| r.id).max().map_or(1, |max| max + 1),
            university_id,
            rank: self.rankings.len() as u32 + 1,
            year: default_ranking_year(),
            academic_score: 0.0,
            research_score: 0.0,
            facilities_score: 0.0,
        };
        apply_ranking_update(&mut ranking, &update);
        self.rankings.push(ranking.clone());
        tracing::debug!(university_id, ranking_id = ranking.id, "ranking created");
        ranking
    }
}

fn apply_ranking_update(ranking: &mut Ranking, update: &RankingUpdate) {
    if let Some(rank) = update.rank {
        ranking.rank = rank;
    }
    if let Some(score) = update.academic_score {
        ranking.academic_score = score;
    }
    if let Some(score) = update.research_score {
        ranking.research_score = score;
    }
    if let Some(score) = update.facilities_score {
        ranking.facilities_score = score;
    }
}
