use serde::Serialize;

use crate::models::{RankedUniversity, University, UniversityType};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_universities: usize,
    pub public_universities: usize,
    pub private_universities: usize,
    pub total_students: u64,
    pub average_rating: f64,
    /// Name of the rank-one university, if any ranking rows joined.
    pub top_ranked: Option<String>,
}

/// `ranked` is expected in rank order, as returned by the rankings join.
pub fn dashboard_stats(universities: &[University], ranked: &[RankedUniversity]) -> DashboardStats {
    let count_kind = |kind: UniversityType| {
        universities
            .iter()
            .filter(|university| university.kind == kind)
            .count()
    };

    let average_rating = if universities.is_empty() {
        0.0
    } else {
        universities
            .iter()
            .map(University::overall_rating)
            .sum::<f64>()
            / universities.len() as f64
    };

    DashboardStats {
        total_universities: universities.len(),
        public_universities: count_kind(UniversityType::Public),
        private_universities: count_kind(UniversityType::Private),
        total_students: universities.iter().map(|u| u.student_count).sum(),
        average_rating,
        top_ranked: ranked.first().map(|row| row.university.name.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample_university;
    use crate::models::Ranking;

    #[test]
    fn counts_types_and_students() {
        let mut universities = vec![
            sample_university(1, "A", "Cairo", UniversityType::Public, &[]),
            sample_university(2, "B", "Giza", UniversityType::Private, &[]),
            sample_university(3, "C", "Giza", UniversityType::Public, &[]),
        ];
        universities[1].ratings.academic_quality = 1.5;
        universities[1].student_count = 5_500;

        let stats = dashboard_stats(&universities, &[]);
        assert_eq!(stats.total_universities, 3);
        assert_eq!(stats.public_universities, 2);
        assert_eq!(stats.private_universities, 1);
        assert_eq!(stats.total_students, 25_500);
        assert!((stats.average_rating - (4.0 + 3.5 + 4.0) / 3.0).abs() < 1e-9);
    }

    #[test]
    fn empty_catalog_has_zero_average() {
        let stats = dashboard_stats(&[], &[]);
        assert_eq!(stats.total_universities, 0);
        assert_eq!(stats.average_rating, 0.0);
        assert_eq!(stats.top_ranked, None);
    }

    #[test]
    fn top_ranked_comes_from_first_ranking_row() {
        let universities = vec![
            sample_university(1, "Cairo University", "Giza", UniversityType::Public, &[]),
            sample_university(3, "AUC", "Cairo", UniversityType::Private, &[]),
        ];
        let ranked = vec![RankedUniversity {
            ranking: Ranking {
                id: 1,
                university_id: 3,
                rank: 1,
                year: 2024,
                academic_score: 9.0,
                research_score: 8.5,
                facilities_score: 9.2,
            },
            university: universities[1].clone(),
        }];
        let stats = dashboard_stats(&universities, &ranked);
        assert_eq!(stats.top_ranked.as_deref(), Some("AUC"));

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["topRanked"], "AUC");
    }
}
