use std::collections::BTreeSet;

use crate::models::{FilterCriteria, University};

fn active(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}

/// Keeps the universities matching every supplied criterion, in input order.
///
/// Search text is matched case-insensitively against the English name, city
/// and governorate, and as an exact substring against the Arabic name.
pub fn filter_universities(all: &[University], criteria: &FilterCriteria) -> Vec<University> {
    let search = active(&criteria.search_text).map(|text| (text, text.to_lowercase()));
    let governorate = active(&criteria.governorate).map(str::to_lowercase);
    let kind = active(&criteria.kind).map(str::to_lowercase);
    let program = active(&criteria.program);

    all.iter()
        .filter(|university| match &search {
            Some((raw, folded)) => {
                university.name.to_lowercase().contains(folded.as_str())
                    || university.name_ar.contains(*raw)
                    || university.location.to_lowercase().contains(folded.as_str())
                    || university.governorate.to_lowercase().contains(folded.as_str())
            }
            None => true,
        })
        .filter(|university| match &governorate {
            Some(value) => university.governorate.to_lowercase() == *value,
            None => true,
        })
        .filter(|university| match &kind {
            Some(value) => university.kind.as_str() == value.as_str(),
            None => true,
        })
        .filter(|university| match program {
            Some(value) => university.programs.iter().any(|offered| offered == value),
            None => true,
        })
        .cloned()
        .collect()
}

pub fn governorates(universities: &[University]) -> Vec<String> {
    universities
        .iter()
        .map(|university| university.governorate.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn university_types(universities: &[University]) -> Vec<String> {
    universities
        .iter()
        .map(|university| university.kind.as_str().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn programs(universities: &[University]) -> Vec<String> {
    universities
        .iter()
        .flat_map(|university| university.programs.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{UniversityRatings, UniversityType};

    pub(crate) fn sample_university(
        id: u32,
        name: &str,
        governorate: &str,
        kind: UniversityType,
        programs: &[&str],
    ) -> University {
        University {
            id,
            name: name.to_string(),
            name_ar: format!("جامعة {id}"),
            location: format!("{governorate} City"),
            governorate: governorate.to_string(),
            kind,
            established_year: 1950,
            student_count: 10_000,
            programs: programs.iter().map(|p| p.to_string()).collect(),
            ratings: UniversityRatings {
                academic_quality: 4.0,
                campus_facilities: 4.0,
                student_life: 4.0,
                career_services: 4.0,
                faculty_quality: 4.0,
            },
            logo_url: None,
        }
    }

    fn ten_universities() -> Vec<University> {
        (1..=10)
            .map(|id| {
                let kind = if id % 3 == 0 {
                    UniversityType::Private
                } else {
                    UniversityType::Public
                };
                let governorate = if id % 2 == 0 { "Cairo" } else { "Alexandria" };
                sample_university(id, &format!("University {id}"), governorate, kind, &["Law"])
            })
            .collect()
    }

    #[test]
    fn empty_criteria_returns_equal_copy() {
        let all = ten_universities();
        let filtered = filter_universities(&all, &FilterCriteria::default());
        assert_eq!(filtered, all);
        assert_ne!(filtered.as_ptr(), all.as_ptr());
    }

    #[test]
    fn type_filter_keeps_private_in_order() {
        let all = ten_universities();
        let criteria = FilterCriteria {
            kind: Some("private".to_string()),
            ..Default::default()
        };
        let ids: Vec<u32> = filter_universities(&all, &criteria)
            .iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec![3, 6, 9]);
    }

    #[test]
    fn governorate_and_type_match_case_insensitively() {
        let all = ten_universities();
        let criteria = FilterCriteria {
            governorate: Some("cAIRO".to_string()),
            kind: Some("PRIVATE".to_string()),
            ..Default::default()
        };
        let ids: Vec<u32> = filter_universities(&all, &criteria)
            .iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec![6]);
    }

    #[test]
    fn search_matches_name_city_and_arabic_name() {
        let mut all = ten_universities();
        all[4].name = "Ain Shams University".to_string();
        all[4].name_ar = "جامعة عين شمس".to_string();

        let by_name = FilterCriteria {
            search_text: Some("ain shams".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_universities(&all, &by_name)[0].id, 5);

        let by_arabic = FilterCriteria {
            search_text: Some("عين".to_string()),
            ..Default::default()
        };
        let ids: Vec<u32> = filter_universities(&all, &by_arabic)
            .iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(ids, vec![5]);

        let by_city = FilterCriteria {
            search_text: Some("alexandria city".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_universities(&all, &by_city).len(), 5);
    }

    #[test]
    fn program_requires_exact_membership() {
        let mut all = ten_universities();
        all[1].programs.push("Medicine".to_string());
        let criteria = FilterCriteria {
            program: Some("Medicine".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_universities(&all, &criteria).len(), 1);

        let lowercase = FilterCriteria {
            program: Some("medicine".to_string()),
            ..Default::default()
        };
        assert!(filter_universities(&all, &lowercase).is_empty());
    }

    #[test]
    fn filtering_is_idempotent() {
        let all = ten_universities();
        let criteria = FilterCriteria {
            governorate: Some("Cairo".to_string()),
            search_text: Some("university".to_string()),
            ..Default::default()
        };
        let once = filter_universities(&all, &criteria);
        let twice = filter_universities(&once, &criteria);
        assert_eq!(once, twice);
    }

    #[test]
    fn empty_strings_do_not_restrict() {
        let all = ten_universities();
        let criteria = FilterCriteria {
            search_text: Some(String::new()),
            governorate: Some(String::new()),
            kind: Some(String::new()),
            program: Some(String::new()),
        };
        assert_eq!(filter_universities(&all, &criteria).len(), 10);
    }

    #[test]
    fn facets_are_distinct_and_sorted() {
        let mut all = ten_universities();
        all[0].programs = vec!["Medicine".to_string(), "Law".to_string()];
        assert_eq!(governorates(&all), vec!["Alexandria", "Cairo"]);
        assert_eq!(university_types(&all), vec!["private", "public"]);
        assert_eq!(programs(&all), vec!["Law", "Medicine"]);
    }
}
