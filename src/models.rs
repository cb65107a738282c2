use std::fmt;

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UniversityType {
    Public,
    Private,
}

impl UniversityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UniversityType::Public => "public",
            UniversityType::Private => "private",
        }
    }
}

impl fmt::Display for UniversityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Criterion scores attached to a university record, each in 0..=5.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversityRatings {
    pub academic_quality: f64,
    pub campus_facilities: f64,
    pub student_life: f64,
    pub career_services: f64,
    pub faculty_quality: f64,
}

impl UniversityRatings {
    pub fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("Academic Quality", self.academic_quality),
            ("Campus Facilities", self.campus_facilities),
            ("Student Life", self.student_life),
            ("Career Services", self.career_services),
            ("Faculty Quality", self.faculty_quality),
        ]
    }
}

/// Criterion scores submitted with a review, each in 1..=5. Also used for
/// per-criterion means, which are not rounded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRatings {
    pub academic_quality: f64,
    pub campus_facilities: f64,
    pub student_life: f64,
    pub career_services: f64,
    pub research_opportunities: f64,
}

impl ReviewRatings {
    pub fn uniform(score: f64) -> Self {
        ReviewRatings {
            academic_quality: score,
            campus_facilities: score,
            student_life: score,
            career_services: score,
            research_opportunities: score,
        }
    }

    pub fn entries(&self) -> [(&'static str, f64); 5] {
        [
            ("Academic Quality", self.academic_quality),
            ("Campus Facilities", self.campus_facilities),
            ("Student Life", self.student_life),
            ("Career Services", self.career_services),
            ("Research Opportunities", self.research_opportunities),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct University {
    #[serde(rename = "Id")]
    pub id: u32,
    pub name: String,
    pub name_ar: String,
    /// City.
    pub location: String,
    pub governorate: String,
    #[serde(rename = "type")]
    pub kind: UniversityType,
    pub established_year: i32,
    pub student_count: u64,
    #[serde(default)]
    pub programs: Vec<String>,
    pub ratings: UniversityRatings,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
}

impl University {
    pub fn overall_rating(&self) -> f64 {
        let entries = self.ratings.entries();
        entries.iter().map(|(_, score)| score).sum::<f64>() / entries.len() as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "Id")]
    pub id: u32,
    pub university_id: u32,
    pub reviewer_name: String,
    pub program: String,
    pub review_text: String,
    pub ratings: ReviewRatings,
    /// Always derived from `ratings`; fixtures are normalized on load.
    #[serde(default)]
    pub overall_rating: f64,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub is_verified: bool,
}

/// Counts of reviews per rounded overall rating, buckets 1 through 5.
/// Serializes as an object keyed `"1"` through `"5"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RatingHistogram {
    counts: [usize; 5],
}

impl RatingHistogram {
    /// Buckets outside 1..=5 are clamped into range.
    pub fn record(&mut self, bucket: i64) {
        let index = bucket.clamp(1, 5) as usize - 1;
        self.counts[index] += 1;
    }

    pub fn count(&self, bucket: u8) -> usize {
        match bucket {
            1..=5 => self.counts[bucket as usize - 1],
            _ => 0,
        }
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

impl Serialize for RatingHistogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (index, count) in self.counts.iter().enumerate() {
            map.serialize_entry(&(index + 1).to_string(), count)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewStats {
    pub total_reviews: usize,
    pub average_rating: f64,
    pub rating_distribution: RatingHistogram,
    pub criteria_averages: ReviewRatings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ranking {
    #[serde(rename = "Id")]
    pub id: u32,
    pub university_id: u32,
    pub rank: u32,
    #[serde(default = "default_ranking_year")]
    pub year: i32,
    pub academic_score: f64,
    pub research_score: f64,
    pub facilities_score: f64,
}

pub fn default_ranking_year() -> i32 {
    2024
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingUpdate {
    pub rank: Option<u32>,
    pub academic_score: Option<f64>,
    pub research_score: Option<f64>,
    pub facilities_score: Option<f64>,
}

/// A ranking row joined with its university record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedUniversity {
    pub ranking: Ranking,
    pub university: University,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Contact {
    pub phone: String,
    pub email: String,
    pub website: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Statistics {
    pub student_count: u64,
    pub faculty_count: u64,
    pub international_students: u64,
    pub graduation_rate: f64,
    pub employment_rate: f64,
    pub research_projects: u64,
}

/// Static descriptive row keyed by university id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UniversityDetails {
    pub university_id: u32,
    pub description: String,
    pub facilities: Vec<String>,
    pub achievements: Vec<String>,
    pub contact: Contact,
    pub statistics: Statistics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UniversityDetail {
    pub university: University,
    pub details: UniversityDetails,
}

/// Optional catalog predicates; `None` or an empty string means no restriction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub search_text: Option<String>,
    pub governorate: Option<String>,
    pub kind: Option<String>,
    pub program: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewReviewInput {
    pub university_id: u32,
    pub reviewer_name: String,
    pub program: String,
    pub review_text: String,
    pub ratings: ReviewRatings,
    pub date: Option<DateTime<Utc>>,
}

/// Fields to overwrite on an existing university; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversityPatch {
    pub name: Option<String>,
    pub name_ar: Option<String>,
    pub location: Option<String>,
    pub governorate: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<UniversityType>,
    pub established_year: Option<i32>,
    pub student_count: Option<u64>,
    pub programs: Option<Vec<String>>,
    pub ratings: Option<UniversityRatings>,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewPatch {
    pub review_text: Option<String>,
    pub program: Option<String>,
    pub ratings: Option<ReviewRatings>,
}
