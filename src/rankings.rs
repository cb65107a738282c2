use std::cmp::Ordering;
use std::collections::HashMap;

use clap::ValueEnum;

use crate::models::{RankedUniversity, Ranking, University};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RankingSort {
    Rank,
    Name,
    Overall,
    Academic,
    Research,
    Facilities,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankingSummary {
    pub ranked_count: usize,
    pub highest_academic_score: f64,
}

/// Joins ranking rows to their universities, ordered by rank. Rows naming an
/// unknown university are dropped with a warning.
pub fn join_rankings(rankings: &[Ranking], universities: &[University]) -> Vec<RankedUniversity> {
    let by_id: HashMap<u32, &University> = universities
        .iter()
        .map(|university| (university.id, university))
        .collect();

    let mut joined: Vec<RankedUniversity> = rankings
        .iter()
        .filter_map(|ranking| match by_id.get(&ranking.university_id) {
            Some(university) => Some(RankedUniversity {
                ranking: ranking.clone(),
                university: (*university).clone(),
            }),
            None => {
                tracing::warn!(
                    ranking_id = ranking.id,
                    university_id = ranking.university_id,
                    "dropping ranking for unknown university"
                );
                None
            }
        })
        .collect();

    joined.sort_by_key(|row| row.ranking.rank);
    joined
}

pub fn sort_rankings(rows: &mut [RankedUniversity], key: RankingSort, order: SortOrder) {
    rows.sort_by(|a, b| {
        let ordering = match key {
            RankingSort::Rank => a.ranking.rank.cmp(&b.ranking.rank),
            RankingSort::Name => a.university.name.cmp(&b.university.name),
            RankingSort::Overall => compare_scores(
                a.university.overall_rating(),
                b.university.overall_rating(),
            ),
            RankingSort::Academic => {
                compare_scores(a.ranking.academic_score, b.ranking.academic_score)
            }
            RankingSort::Research => {
                compare_scores(a.ranking.research_score, b.ranking.research_score)
            }
            RankingSort::Facilities => {
                compare_scores(a.ranking.facilities_score, b.ranking.facilities_score)
            }
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn compare_scores(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

pub fn summarize(rows: &[RankedUniversity]) -> RankingSummary {
    RankingSummary {
        ranked_count: rows.len(),
        highest_academic_score: rows
            .iter()
            .map(|row| row.ranking.academic_score)
            .fold(0.0, f64::max),
    }
}
