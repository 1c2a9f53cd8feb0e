use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rand::Rng;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;

use catalog::{CandidateKind, Catalog, Profile};
use matching::{AttributeCategory, Matchable};
use pipeline::{DiscoveryMode, Filters, MatchResult, RankingControls, ShownHistory};
use server::{Comparison, DiscoveryService, EngineConfig};

/// Style Match - profile-driven product and style twin discovery
#[derive(Parser)]
#[command(name = "style-match")]
#[command(about = "Rank products and style twins against a shopping profile", long_about = None)]
struct Cli {
    /// Directory holding profiles.json, products.json and people.json
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Engine config (JSON); defaults are used when omitted
    #[arg(short, long, env = "STYLE_MATCH_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Ranking controls shared by `recommend` and `refresh`.
#[derive(Args)]
struct ControlArgs {
    /// Profile to rank for
    #[arg(long, default_value = "me")]
    profile: String,

    /// Candidate pool: products or people
    #[arg(long, default_value = "products")]
    kind: CandidateKind,

    /// Personalization level, 0 (pure novelty) to 100 (pure match)
    #[arg(long)]
    personalization: Option<f64>,

    /// Discovery mode: balanced, trending, similar or diverse
    #[arg(long, default_value = "balanced")]
    mode: DiscoveryMode,

    /// Session seed for the novelty factor
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Lowest acceptable price
    #[arg(long)]
    min_price: Option<f64>,

    /// Highest acceptable price
    #[arg(long)]
    max_price: Option<f64>,

    /// Category to keep (repeatable)
    #[arg(long = "category")]
    categories: Vec<String>,

    /// Case-insensitive search over titles and bios
    #[arg(long)]
    search: Option<String>,

    /// Number of results to show
    #[arg(long, default_value = "10")]
    limit: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank a candidate pool for a profile
    Recommend {
        #[command(flatten)]
        controls: ControlArgs,

        /// Show the match reasons and matched tags for each result
        #[arg(long)]
        explain: bool,
    },

    /// Show the ranked list, then refresh it one or more times
    Refresh {
        #[command(flatten)]
        controls: ControlArgs,

        /// Number of consecutive refreshes
        #[arg(long, default_value = "1")]
        rounds: usize,
    },

    /// Show a profile's attributes
    Profile {
        /// Profile ID to display
        #[arg(long, default_value = "me")]
        profile: String,
    },

    /// List all profiles
    Profiles,

    /// Compare two candidates against a profile
    Compare {
        /// Profile to compare for
        #[arg(long, default_value = "me")]
        profile: String,

        /// Candidate pool: products or people
        #[arg(long, default_value = "products")]
        kind: CandidateKind,

        /// First candidate ID
        left: String,

        /// Second candidate ID
        right: String,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Number of concurrent requests
        #[arg(long, default_value = "10")]
        concurrent: usize,

        /// Candidate pool to rank
        #[arg(long, default_value = "products")]
        kind: CandidateKind,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let config = EngineConfig::load(cli.config.as_deref()).context("Failed to load engine config")?;

    let start = Instant::now();
    let catalog = Catalog::load_from_dir(&cli.data_dir)
        .with_context(|| format!("Failed to load catalog from {}", cli.data_dir.display()))?;
    let (profiles, products, people) = catalog.counts();
    println!(
        "{} Loaded {} profiles, {} products, {} people in {:?}",
        "✓".green(),
        profiles,
        products,
        people,
        start.elapsed()
    );

    let service = DiscoveryService::new(Arc::new(catalog), config);

    match cli.command {
        Commands::Recommend { controls, explain } => handle_recommend(&service, controls, explain).await?,
        Commands::Refresh { controls, rounds } => handle_refresh(&service, controls, rounds).await?,
        Commands::Profile { profile } => handle_profile(&service, &profile)?,
        Commands::Profiles => handle_profiles(&service),
        Commands::Compare {
            profile,
            kind,
            left,
            right,
        } => handle_compare(&service, &profile, kind, &left, &right).await?,
        Commands::Benchmark {
            requests,
            concurrent,
            kind,
        } => handle_benchmark(service, requests, concurrent, kind).await?,
    }

    Ok(())
}

impl ControlArgs {
    fn to_controls(&self, service: &DiscoveryService) -> Result<RankingControls> {
        let mut filters = Filters::new().with_categories(self.categories.clone());
        match (self.min_price, self.max_price) {
            (None, None) => {}
            (min, max) => {
                let min = min.unwrap_or(0.0);
                let max = max.unwrap_or(f64::MAX);
                if min.is_nan() || max.is_nan() {
                    bail!("Price bounds must be numbers");
                }
                filters = filters.with_price_range(min, max);
            }
        }
        if let Some(search) = &self.search {
            filters = filters.with_search_query(search.clone());
        }

        let personalization = self
            .personalization
            .unwrap_or(service.config().default_personalization);
        Ok(RankingControls::new()
            .with_personalization(personalization)
            .with_mode(self.mode)
            .with_filters(filters)
            .with_seed(self.seed))
    }
}

/// Handle the 'recommend' command
async fn handle_recommend(service: &DiscoveryService, args: ControlArgs, explain: bool) -> Result<()> {
    let controls = args.to_controls(service)?;
    let profile = service.profile(&args.profile)?;

    let results = service
        .recommend(&args.profile, args.kind, controls.clone(), args.limit)
        .await?;

    println!(
        "{}",
        format!(
            "Top {} for {} (personalization {}, {} mode):",
            args.kind,
            profile.name,
            controls.personalization.value(),
            controls.mode
        )
        .bold()
        .blue()
    );
    print_results(&results, explain);
    Ok(())
}

/// Handle the 'refresh' command
async fn handle_refresh(service: &DiscoveryService, args: ControlArgs, rounds: usize) -> Result<()> {
    let mut controls = args.to_controls(service)?;
    let mut history = ShownHistory::new();

    let mut current = service
        .recommend(&args.profile, args.kind, controls.clone(), args.limit)
        .await?;
    println!("{}", format!("Current list (seed {}):", controls.seed).bold().blue());
    print_results(&current, false);

    for round in 1..=rounds {
        let outcome = service
            .refresh(&args.profile, args.kind, controls.clone(), current, history, args.limit)
            .await?;
        println!();
        println!(
            "{}",
            format!("Refresh {} (seed {}):", round, outcome.seed).bold().blue()
        );
        print_results(&outcome.results, false);
        tracing::debug!("{} candidates seen so far", outcome.history.len());

        controls.seed = outcome.seed;
        current = outcome.results;
        history = outcome.history;
    }
    Ok(())
}

/// Handle the 'profile' command
fn handle_profile(service: &DiscoveryService, profile_id: &str) -> Result<()> {
    let profile = service.profile(profile_id)?;

    println!("{}", format!("Profile: {} ({})", profile.name, profile.id).bold().blue());
    println!("{}Relationship: {}", "• ".green(), profile.relationship);
    for category in AttributeCategory::TAGGED {
        let tags = profile.tags(category);
        let shown = if tags.is_empty() {
            "-".dimmed().to_string()
        } else {
            tags.display_values().collect::<Vec<_>>().join(", ")
        };
        println!("{}{}: {}", "• ".green(), category.label(), shown);
    }

    if profile.price_affinity.is_empty() {
        println!("{}budget: {}", "• ".cyan(), "-".dimmed());
    } else {
        for (category, range) in profile.price_affinity.iter() {
            println!("{}budget {}: ${:.2} - ${:.2}", "• ".cyan(), category, range.min, range.max);
        }
    }
    if profile.is_blank() {
        println!("{}", "This profile has no attributes yet; every match will score 0.".yellow());
    }
    Ok(())
}

/// Handle the 'profiles' command
fn handle_profiles(service: &DiscoveryService) {
    println!("{}", "Profiles:".bold().blue());
    for profile in service.profiles() {
        println!(
            "  {} {} ({}){}",
            profile.id.green(),
            profile.name,
            profile.relationship,
            if profile.is_blank() { " [empty]".dimmed().to_string() } else { String::new() }
        );
    }
}

/// Handle the 'compare' command
async fn handle_compare(
    service: &DiscoveryService,
    profile_id: &str,
    kind: CandidateKind,
    left: &str,
    right: &str,
) -> Result<()> {
    let comparison = service.compare(profile_id, kind, left, right).await?;
    print_comparison(&comparison);
    Ok(())
}

/// Handle the 'benchmark' command
async fn handle_benchmark(
    service: DiscoveryService,
    requests: usize,
    concurrent: usize,
    kind: CandidateKind,
) -> Result<()> {
    let profiles: Vec<Profile> = service.profiles();
    if profiles.is_empty() {
        bail!("Benchmark needs at least one profile");
    }

    // Random profile, mode, personalization and seed per request
    let plans: Vec<(String, RankingControls)> = {
        let mut rng = rand::rng();
        (0..requests)
            .map(|_| {
                let profile = profiles[rng.random_range(0..profiles.len())].id.clone();
                let controls = RankingControls::new()
                    .with_personalization(rng.random_range(0.0..=100.0))
                    .with_mode(DiscoveryMode::ALL[rng.random_range(0..DiscoveryMode::ALL.len())])
                    .with_seed(rng.random());
                (profile, controls)
            })
            .collect()
    };

    let semaphore = Arc::new(Semaphore::new(concurrent.max(1)));
    let start = Instant::now();
    let mut handles = Vec::with_capacity(requests);
    for (profile, controls) in plans {
        let service = service.clone();
        let semaphore = semaphore.clone();
        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            let started = Instant::now();
            service.recommend(&profile, kind, controls, 20).await?;
            Ok::<_, anyhow::Error>(started.elapsed())
        }));
    }

    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    for handle in handles {
        timings.push(handle.await??);
    }
    let wall_time = start.elapsed();

    if timings.is_empty() {
        println!("No requests were made.");
        return Ok(());
    }
    timings.sort();
    let total: Duration = timings.iter().sum();
    let avg_latency = total / timings.len() as u32;
    let percentile = |p: f64| timings[((timings.len() as f64 * p) as usize).min(timings.len() - 1)];
    let throughput = timings.len() as f64 / wall_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Requests: {} ({} concurrent, {} pool)", timings.len(), concurrent, kind);
    println!("Total time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(0.50));
    println!("P95 latency: {:?}", percentile(0.95));
    println!("P99 latency: {:?}", percentile(0.99));
    println!("Throughput: {:.2} requests/second", throughput);

    Ok(())
}

fn print_results(results: &[MatchResult], explain: bool) {
    if results.is_empty() {
        println!("  {}", "No matches. Try widening your filters.".yellow());
        return;
    }

    for (i, result) in results.iter().enumerate() {
        let candidate = &result.candidate;
        let price = candidate
            .display
            .price
            .map(|p| format!(" ${:.2}", p))
            .unwrap_or_default();
        let trending = if candidate.trending {
            format!(" {}", "trending".yellow())
        } else {
            String::new()
        };
        println!(
            "{}. {}{}{} [{}] - Match: {:.0}% (adjusted {:.3})",
            (i + 1).to_string().green(),
            candidate.display.title.bold(),
            price,
            trending,
            candidate.id.dimmed(),
            result.score * 100.0,
            result.adjusted_score
        );
        if explain {
            for reason in &result.reasons {
                println!("   {} {}", "→".cyan(), reason);
            }
            for (category, tags) in &result.matched_attributes {
                println!("   {} {}: {}", "•".dimmed(), category.label(), tags.join(", "));
            }
        }
    }
}

fn print_comparison(comparison: &Comparison) {
    println!(
        "{}",
        format!(
            "Comparing {} vs {} for profile {}:",
            comparison.left.candidate.display.title,
            comparison.right.candidate.display.title,
            comparison.profile_id
        )
        .bold()
        .blue()
    );
    for result in [&comparison.left, &comparison.right] {
        println!(
            "  {} - Match: {:.0}%",
            result.candidate.display.title.bold(),
            result.score * 100.0
        );
        for reason in &result.reasons {
            println!("     {} {}", "→".cyan(), reason);
        }
    }
    println!("  Similarity between them: {:.0}%", comparison.similarity * 100.0);
    if comparison.shared_matches.is_empty() {
        println!("  {}", "No profile tags in common.".dimmed());
    } else {
        for (category, tags) in &comparison.shared_matches {
            println!("  Both match your {}: {}", category.label(), tags.join(", "));
        }
    }
}
