use std::path::PathBuf;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use uni_catalog::compare::ComparisonSelection;
use uni_catalog::config::{Config, DEFAULT_READ_LATENCY_MS, DEFAULT_WRITE_LATENCY_MS};
use uni_catalog::models::{FilterCriteria, NewReviewInput, ReviewRatings};
use uni_catalog::rankings::{RankingSort, SortOrder};
use uni_catalog::store::CatalogStore;
use uni_catalog::{catalog, dashboard, import, rankings, report, reviews};

#[derive(Parser)]
#[command(name = "uni-catalog")]
#[command(about = "Browse, compare and review Egyptian universities", long_about = None)]
struct Cli {
    /// Directory holding universities.json, rankings.json, reviews.json and details.json
    #[arg(long, global = true)]
    fixtures: Option<PathBuf>,
    /// Simulated latency for read operations
    #[arg(long, global = true, default_value_t = DEFAULT_READ_LATENCY_MS)]
    latency_ms: u64,
    /// Simulated latency for write operations
    #[arg(long, global = true, default_value_t = DEFAULT_WRITE_LATENCY_MS)]
    write_latency_ms: u64,
    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List universities matching the given filters
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        governorate: Option<String>,
        #[arg(long = "type")]
        kind: Option<String>,
        #[arg(long)]
        program: Option<String>,
        /// Print the available filter values instead
        #[arg(long)]
        facets: bool,
    },
    /// Show one university with its descriptive details
    Show { id: u32 },
    /// List a university's reviews, newest first
    Reviews { id: u32 },
    /// Aggregate review statistics for a university
    Stats { id: u32 },
    /// Search all reviews
    SearchReviews {
        query: String,
        #[arg(long)]
        program: Option<String>,
        #[arg(long)]
        min_rating: Option<f64>,
    },
    /// Submit a review
    Review {
        #[arg(long)]
        university: u32,
        #[arg(long)]
        name: String,
        #[arg(long)]
        program: String,
        #[arg(long)]
        text: String,
        #[arg(long, default_value_t = 3.0)]
        academic_quality: f64,
        #[arg(long, default_value_t = 3.0)]
        campus_facilities: f64,
        #[arg(long, default_value_t = 3.0)]
        student_life: f64,
        #[arg(long, default_value_t = 3.0)]
        career_services: f64,
        #[arg(long, default_value_t = 3.0)]
        research_opportunities: f64,
        #[arg(long)]
        date: Option<DateTime<Utc>>,
    },
    /// Show the rankings table
    Rankings {
        #[arg(long, value_enum, default_value_t = RankingSort::Rank)]
        sort: RankingSort,
        #[arg(long, value_enum, default_value_t = SortOrder::Asc)]
        order: SortOrder,
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Compare two or more universities side by side
    Compare {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<u32>,
    },
    /// Platform statistics
    Admin,
    /// Write a markdown report for a university
    Report {
        id: u32,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Import reviews from a CSV file
    Import {
        #[arg(long)]
        csv: PathBuf,
    },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "uni_catalog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::from_env(cli.fixtures, cli.latency_ms, cli.write_latency_ms);
    tracing::debug!(fixtures = ?config.fixtures, "configuration loaded");

    let mut store = CatalogStore::from_config(&config).context("failed to load catalog fixtures")?;

    match cli.command {
        Commands::List {
            search,
            governorate,
            kind,
            program,
            facets,
        } => {
            if facets {
                let all = store.universities();
                println!("Governorates: {}", catalog::governorates(all).join(", "));
                println!("Types: {}", catalog::university_types(all).join(", "));
                println!("Programs: {}", catalog::programs(all).join(", "));
                return Ok(());
            }

            let criteria = FilterCriteria {
                search_text: search,
                governorate,
                kind,
                program,
            };
            let universities = store.list_universities(&criteria).await;
            if cli.json {
                return print_json(&universities);
            }

            if universities.is_empty() {
                println!("No universities match these filters.");
                return Ok(());
            }

            println!(
                "Showing {} of {} universities:",
                universities.len(),
                store.universities().len()
            );
            for university in &universities {
                println!(
                    "- [{}] {} ({}, {}) {} rated {:.1}",
                    university.id,
                    university.name,
                    university.location,
                    university.governorate,
                    university.kind,
                    university.overall_rating()
                );
            }
        }
        Commands::Show { id } => {
            let detail = store.university_detail(id).await?;
            if cli.json {
                return print_json(&detail);
            }

            let university = &detail.university;
            println!("{} ({})", university.name, university.name_ar);
            println!(
                "{}, {} | {} | founded {} | {} students",
                university.location,
                university.governorate,
                university.kind,
                university.established_year,
                university.student_count
            );
            if !detail.details.description.is_empty() {
                println!("{}", detail.details.description);
            }
            println!("Programs: {}", university.programs.join(", "));
            for (label, score) in university.ratings.entries() {
                println!("  {label}: {score:.1}");
            }
            if !detail.details.facilities.is_empty() {
                println!("Facilities: {}", detail.details.facilities.join(", "));
            }
            let contact = &detail.details.contact;
            if !contact.website.is_empty() {
                println!("Contact: {} | {} | {}", contact.phone, contact.email, contact.website);
            }
        }
        Commands::Reviews { id } => {
            store.get_university(id).await?;
            let reviews = store.reviews_for(id).await;
            if cli.json {
                return print_json(&reviews);
            }

            if reviews.is_empty() {
                println!("No reviews for this university yet.");
                return Ok(());
            }
            for review in &reviews {
                println!(
                    "- #{} {} ({}) {:.1}/5 on {}{}: {}",
                    review.id,
                    review.reviewer_name,
                    review.program,
                    review.overall_rating,
                    review.date.date_naive(),
                    if review.is_verified { " [verified]" } else { "" },
                    review.review_text
                );
            }
        }
        Commands::Stats { id } => {
            let stats = store.review_stats(id).await;
            if cli.json {
                return print_json(&stats);
            }

            println!(
                "{} reviews, average rating {:.1}",
                stats.total_reviews, stats.average_rating
            );
            for bucket in (1..=5).rev() {
                println!("  {} stars: {}", bucket, stats.rating_distribution.count(bucket));
            }
            for (label, mean) in stats.criteria_averages.entries() {
                println!("  {label}: {mean:.2}");
            }
        }
        Commands::SearchReviews {
            query,
            program,
            min_rating,
        } => {
            let mut matches = store.search_reviews(&query).await;
            if let Some(program) = program {
                matches = reviews::reviews_by_program(&matches, &program);
            }
            if let Some(min_rating) = min_rating {
                matches = reviews::reviews_with_min_rating(&matches, min_rating);
            }
            if cli.json {
                return print_json(&matches);
            }

            println!("{} matching reviews:", matches.len());
            for review in &matches {
                println!(
                    "- #{} university {} by {} ({}): {}",
                    review.id,
                    review.university_id,
                    review.reviewer_name,
                    review.program,
                    review.review_text
                );
            }
        }
        Commands::Review {
            university,
            name,
            program,
            text,
            academic_quality,
            campus_facilities,
            student_life,
            career_services,
            research_opportunities,
            date,
        } => {
            let input = NewReviewInput {
                university_id: university,
                reviewer_name: name,
                program,
                review_text: text,
                ratings: ReviewRatings {
                    academic_quality,
                    campus_facilities,
                    student_life,
                    career_services,
                    research_opportunities,
                },
                date,
            };
            let review = store.submit_review(input).await?;
            if cli.json {
                return print_json(&review);
            }

            println!(
                "Review #{} submitted ({:.1}/5{}).",
                review.id,
                review.overall_rating,
                if review.is_verified { ", verified" } else { "" }
            );
            let stats = store.review_stats(university).await;
            println!(
                "University now has {} reviews averaging {:.1}.",
                stats.total_reviews, stats.average_rating
            );
        }
        Commands::Rankings { sort, order, limit } => {
            let mut rows = store.rankings().await;
            rankings::sort_rankings(&mut rows, sort, order);
            if let Some(limit) = limit {
                rows.truncate(limit);
            }
            if cli.json {
                return print_json(&rows);
            }

            if rows.is_empty() {
                println!("No rankings available.");
                return Ok(());
            }
            let summary = rankings::summarize(&rows);
            println!(
                "{} ranked universities, highest academic score {:.1}",
                summary.ranked_count, summary.highest_academic_score
            );
            for row in &rows {
                println!(
                    "#{:<3} {:<40} overall {:.1} academic {:.1} research {:.1} facilities {:.1}",
                    row.ranking.rank,
                    row.university.name,
                    row.university.overall_rating(),
                    row.ranking.academic_score,
                    row.ranking.research_score,
                    row.ranking.facilities_score
                );
            }
        }
        Commands::Compare { ids } => {
            let selection: ComparisonSelection = ids.into_iter().collect();
            if !selection.is_ready() {
                anyhow::bail!(
                    "select at least {} distinct universities to compare",
                    ComparisonSelection::MINIMUM
                );
            }
            let all = store.list_universities(&FilterCriteria::default()).await;
            let chosen = selection.selected(&all);
            if chosen.len() < selection.len() {
                tracing::warn!(
                    requested = selection.len(),
                    found = chosen.len(),
                    "some selected universities are not in the catalog"
                );
            }
            if cli.json {
                return print_json(&chosen);
            }
            print!("{}", report::build_comparison_report(&chosen));
        }
        Commands::Admin => {
            let all = store.list_universities(&FilterCriteria::default()).await;
            let ranked = store.top_universities(5).await;
            let stats = dashboard::dashboard_stats(&all, &ranked);
            if cli.json {
                return print_json(&stats);
            }

            println!("Total universities: {}", stats.total_universities);
            println!(
                "Public: {} | Private: {}",
                stats.public_universities, stats.private_universities
            );
            println!("Total students: {}", stats.total_students);
            println!("Average rating: {:.1}", stats.average_rating);
            if let Some(name) = &stats.top_ranked {
                println!("Top ranked university: {name}");
            }
            println!("Top ranked:");
            for row in &ranked {
                println!("  #{} {}", row.ranking.rank, row.university.name);
            }
        }
        Commands::Report { id, out } => {
            let detail = store.university_detail(id).await?;
            let stats = store.review_stats(id).await;
            let reviews = store.reviews_for(id).await;
            let report = report::build_university_report(&detail, &stats, &reviews);
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Import { csv } => {
            let summary = import::import_reviews(&mut store, &csv).await?;
            println!(
                "Imported {} reviews from {} ({} skipped).",
                summary.inserted,
                csv.display(),
                summary.skipped
            );
        }
    }

    Ok(())
}
