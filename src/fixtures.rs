use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::de::DeserializeOwned;

use crate::models::{Ranking, Review, University, UniversityDetails};
use crate::reviews::overall_rating;

const UNIVERSITIES: &str = include_str!("../fixtures/universities.json");
const RANKINGS: &str = include_str!("../fixtures/rankings.json");
const REVIEWS: &str = include_str!("../fixtures/reviews.json");
const DETAILS: &str = include_str!("../fixtures/details.json");

#[derive(Debug, Clone, PartialEq)]
pub enum FixtureSource {
    Embedded,
    Directory(PathBuf),
}

#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    pub universities: Vec<University>,
    pub rankings: Vec<Ranking>,
    pub reviews: Vec<Review>,
    pub details: Vec<UniversityDetails>,
}

pub fn load(source: &FixtureSource) -> anyhow::Result<Fixtures> {
    let mut fixtures = match source {
        FixtureSource::Embedded => Fixtures {
            universities: parse("universities.json", UNIVERSITIES)?,
            rankings: parse("rankings.json", RANKINGS)?,
            reviews: parse("reviews.json", REVIEWS)?,
            details: parse("details.json", DETAILS)?,
        },
        FixtureSource::Directory(dir) => Fixtures {
            universities: read(dir, "universities.json")?,
            rankings: read(dir, "rankings.json")?,
            reviews: read(dir, "reviews.json")?,
            details: read_optional(dir, "details.json")?,
        },
    };

    ensure_unique_ids("universities.json", fixtures.universities.iter().map(|u| u.id))?;
    ensure_unique_ids("rankings.json", fixtures.rankings.iter().map(|r| r.id))?;
    ensure_unique_ids("reviews.json", fixtures.reviews.iter().map(|r| r.id))?;

    normalize_reviews(&mut fixtures.reviews);
    tracing::debug!(
        universities = fixtures.universities.len(),
        rankings = fixtures.rankings.len(),
        reviews = fixtures.reviews.len(),
        "fixtures loaded"
    );
    Ok(fixtures)
}

fn parse<T: DeserializeOwned>(name: &str, raw: &str) -> anyhow::Result<Vec<T>> {
    serde_json::from_str(raw).with_context(|| format!("invalid fixture {name}"))
}

fn read<T: DeserializeOwned>(dir: &Path, name: &str) -> anyhow::Result<Vec<T>> {
    let path = dir.join(name);
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse(name, &raw)
}

fn read_optional<T: DeserializeOwned>(dir: &Path, name: &str) -> anyhow::Result<Vec<T>> {
    if dir.join(name).exists() {
        read(dir, name)
    } else {
        Ok(Vec::new())
    }
}

fn ensure_unique_ids(name: &str, ids: impl Iterator<Item = u32>) -> anyhow::Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            anyhow::bail!("duplicate Id {id} in fixture {name}");
        }
    }
    Ok(())
}

/// Recomputes every stored overall rating from its criteria.
fn normalize_reviews(reviews: &mut [Review]) {
    for review in reviews.iter_mut() {
        let derived = overall_rating(&review.ratings);
        if (derived - review.overall_rating).abs() > 0.05 {
            tracing::debug!(
                review_id = review.id,
                stored = review.overall_rating,
                derived,
                "replacing stale overall rating"
            );
        }
        review.overall_rating = derived;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_fixtures_are_consistent() {
        let fixtures = load(&FixtureSource::Embedded).unwrap();
        assert_eq!(fixtures.universities.len(), 10);
        assert_eq!(fixtures.reviews.len(), 4);

        let ids: HashSet<u32> = fixtures.universities.iter().map(|u| u.id).collect();
        assert_eq!(ids.len(), fixtures.universities.len());

        for review in &fixtures.reviews {
            assert_eq!(review.overall_rating, overall_rating(&review.ratings));
        }
    }

    #[test]
    fn loads_directory_without_details() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("universities.json"), UNIVERSITIES).unwrap();
        std::fs::write(dir.path().join("rankings.json"), "[]").unwrap();
        std::fs::write(
            dir.path().join("reviews.json"),
            r#"[{
                "Id": 1,
                "universityId": 1,
                "reviewerName": "Mona",
                "program": "Law",
                "reviewText": "Solid",
                "ratings": {"academicQuality": 5, "campusFacilities": 5, "studentLife": 5, "careerServices": 5, "researchOpportunities": 5},
                "overallRating": 1.0,
                "date": "2024-02-01T00:00:00Z"
            }]"#,
        )
        .unwrap();

        let fixtures = load(&FixtureSource::Directory(dir.path().to_path_buf())).unwrap();
        assert!(fixtures.rankings.is_empty());
        assert!(fixtures.details.is_empty());
        assert_eq!(fixtures.reviews[0].overall_rating, 5.0);
        assert!(!fixtures.reviews[0].is_verified);
    }

    #[test]
    fn duplicate_university_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut universities: Vec<serde_json::Value> = serde_json::from_str(UNIVERSITIES).unwrap();
        universities.push(universities[0].clone());
        std::fs::write(
            dir.path().join("universities.json"),
            serde_json::to_string(&universities).unwrap(),
        )
        .unwrap();
        std::fs::write(dir.path().join("rankings.json"), RANKINGS).unwrap();
        std::fs::write(dir.path().join("reviews.json"), REVIEWS).unwrap();

        let err = load(&FixtureSource::Directory(dir.path().to_path_buf())).unwrap_err();
        assert_eq!(err.to_string(), "duplicate Id 1 in fixture universities.json");
    }

    #[test]
    fn duplicate_review_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut reviews: Vec<serde_json::Value> = serde_json::from_str(REVIEWS).unwrap();
        reviews[1]["Id"] = serde_json::json!(1);
        std::fs::write(dir.path().join("universities.json"), UNIVERSITIES).unwrap();
        std::fs::write(dir.path().join("rankings.json"), RANKINGS).unwrap();
        std::fs::write(
            dir.path().join("reviews.json"),
            serde_json::to_string(&reviews).unwrap(),
        )
        .unwrap();

        let err = load(&FixtureSource::Directory(dir.path().to_path_buf())).unwrap_err();
        assert!(err.to_string().contains("reviews.json"));
    }

    #[test]
    fn missing_directory_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(&FixtureSource::Directory(dir.path().to_path_buf())).unwrap_err();
        assert!(err.to_string().contains("universities.json"));
    }
}
