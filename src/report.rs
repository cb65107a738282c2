use std::fmt::Write;

use crate::models::{Review, ReviewStats, University, UniversityDetail, UniversityRatings};

pub fn build_university_report(
    detail: &UniversityDetail,
    stats: &ReviewStats,
    reviews: &[Review],
) -> String {
    let university = &detail.university;
    let mut output = String::new();

    let _ = writeln!(output, "# {} ({})", university.name, university.name_ar);
    let _ = writeln!(
        output,
        "{}, {} - {} university founded {}, {} students",
        university.location,
        university.governorate,
        university.kind,
        university.established_year,
        university.student_count
    );
    if !detail.details.description.is_empty() {
        let _ = writeln!(output);
        let _ = writeln!(output, "{}", detail.details.description);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Review Summary");

    if stats.total_reviews == 0 {
        let _ = writeln!(output, "No reviews submitted yet.");
    } else {
        let _ = writeln!(
            output,
            "Average rating {:.1} across {} reviews",
            stats.average_rating, stats.total_reviews
        );
        let _ = writeln!(output);
        let _ = writeln!(output, "### Rating Distribution");
        for bucket in (1..=5).rev() {
            let _ = writeln!(
                output,
                "- {} stars: {}",
                bucket,
                stats.rating_distribution.count(bucket)
            );
        }
        let _ = writeln!(output);
        let _ = writeln!(output, "### Criteria");
        for (label, mean) in stats.criteria_averages.entries() {
            let _ = writeln!(output, "- {}: {:.1}", label, mean);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Reviews");

    if reviews.is_empty() {
        let _ = writeln!(output, "No reviews submitted yet.");
    } else {
        for review in reviews.iter().take(5) {
            let verified = if review.is_verified { ", verified" } else { "" };
            let _ = writeln!(
                output,
                "- {} ({}{}) on {}, {:.1}/5: {}",
                review.reviewer_name,
                review.program,
                verified,
                review.date.date_naive(),
                review.overall_rating,
                review.review_text
            );
        }
    }

    output
}

pub fn build_comparison_report(universities: &[University]) -> String {
    let cells = |cell: &dyn Fn(&University) -> String| -> Vec<String> {
        universities.iter().map(cell).collect()
    };

    let mut rows: Vec<(&str, Vec<String>)> = vec![(
        "Overall Rating",
        cells(&|u: &University| format!("{:.1}/5", u.overall_rating())),
    )];
    for index in 0..5 {
        let label = UniversityRatings::default().entries()[index].0;
        rows.push((
            label,
            cells(&|u: &University| format!("{:.1}/5", u.ratings.entries()[index].1)),
        ));
    }
    rows.push(("Type", cells(&|u: &University| u.kind.to_string())));
    rows.push(("Students", cells(&|u: &University| u.student_count.to_string())));
    rows.push(("Founded", cells(&|u: &University| u.established_year.to_string())));
    rows.push(("Programs", cells(&|u: &University| u.programs.join(", "))));

    let mut output = String::new();
    let _ = writeln!(output, "# University Comparison");
    let _ = writeln!(output);

    let _ = write!(output, "| |");
    for university in universities {
        let _ = write!(output, " {} |", university.name);
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "|---|{}", "---|".repeat(universities.len()));

    for (label, values) in rows {
        let _ = writeln!(output, "| {} | {} |", label, values.join(" | "));
    }

    output
}
