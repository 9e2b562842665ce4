//! `enroute` command-line host.
//!
//! # Responsibility
//! - Drive the core catalog the way a UI shell would: list, search, add,
//!   seed samples and reset.
//! - Keep output line-oriented and deterministic for scripting.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use enroute_core::service::insights::total_payout;
use enroute_core::{
    init_from_config, paginate, search_activities, ActivityInput, ActivityQuery, Catalog,
    CoreConfig, SampleRequest, SortKey,
};
use log::info;
use std::path::PathBuf;

const DEFAULT_PAGE_SIZE: usize = 8;

#[derive(Parser, Debug)]
#[command(author, version, about = "enroute: local activity catalog", long_about = None)]
struct Cli {
    /// JSON config file; defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show record counts per store.
    Status,

    /// Search and page through activities.
    Activities {
        /// Case-insensitive text matched against name, description and category.
        #[arg(long, default_value = "")]
        query: String,

        /// Restrict to one or more categories.
        #[arg(long = "category")]
        categories: Vec<String>,

        /// relevance, price-asc, price-desc, name-asc, name-desc, rating-desc.
        #[arg(long, default_value = "relevance")]
        sort: String,

        #[arg(long, default_value_t = 1)]
        page: usize,

        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },

    /// Add one activity; equivalent activities are not added twice.
    AddActivity {
        #[arg(long)]
        name: String,

        #[arg(long)]
        price: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Star rating; clamped to 0..=5 by the core.
        #[arg(long)]
        rating: Option<f64>,
    },

    /// Generate sample bookings and payouts.
    SeedSample {
        /// Overrides the configured booking count.
        #[arg(long)]
        bookings: Option<usize>,

        /// Overrides the configured payout count.
        #[arg(long)]
        payouts: Option<usize>,

        /// Discard existing bookings and payouts first.
        #[arg(long)]
        replace: bool,
    },

    /// Remove every stored record; activities re-seed on next read.
    Reset,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CoreConfig::load(path)
            .with_context(|| format!("loading config `{}`", path.display()))?,
        None => CoreConfig::default(),
    };
    init_from_config(&config.logging).context("initializing logging")?;

    let catalog = Catalog::open(&config).context("opening catalog storage")?;
    info!(
        "event=cli_command module=cli backend={} command={:?}",
        config.storage.backend_name(),
        cli.command
    );

    match cli.command {
        Commands::Status => print_status(&catalog),
        Commands::Activities {
            query,
            categories,
            sort,
            page,
            page_size,
        } => {
            let sort = SortKey::parse(&sort)
                .with_context(|| format!("unknown sort key `{sort}`"))?;
            let query = ActivityQuery {
                categories: categories.into_iter().collect(),
                sort,
                ..ActivityQuery::text(query)
            };
            let hits = search_activities(&catalog.activities().list(), &query);
            let page = paginate(&hits, page, page_size);
            for activity in &page.items {
                println!(
                    "{}\t{}\t{}\t{}\t{:.1}",
                    activity.id, activity.name, activity.category, activity.price, activity.rating
                );
            }
            println!(
                "page={}/{} total={}",
                page.page, page.total_pages, page.total_items
            );
        }
        Commands::AddActivity {
            name,
            price,
            category,
            description,
            rating,
        } => {
            let input = activity_input(name, price, category, description, rating);
            let activity = catalog.activities().add(&input);
            println!("{}\t{}\t{}", activity.id, activity.name, activity.price);
        }
        Commands::SeedSample {
            bookings,
            payouts,
            replace,
        } => {
            let request = SampleRequest {
                bookings: bookings.unwrap_or(config.sample.bookings),
                payouts: payouts.unwrap_or(config.sample.payouts),
                replace: replace || config.sample.replace,
            };
            catalog.seed_sample(&request);
            print_status(&catalog);
        }
        Commands::Reset => {
            catalog.reset_all();
            println!("reset=ok");
        }
    }

    Ok(())
}

fn activity_input(
    name: String,
    price: Option<String>,
    category: Option<String>,
    description: Option<String>,
    rating: Option<f64>,
) -> ActivityInput {
    let mut input = ActivityInput::named(name);
    if let Some(price) = price {
        input = input.with_price(price);
    }
    if let Some(category) = category {
        input = input.with_category(category);
    }
    if let Some(description) = description {
        input = input.with_description(description);
    }
    if let Some(rating) = rating {
        input = input.with_rating(rating);
    }
    input
}

fn print_status(catalog: &Catalog) {
    let payouts = catalog.payouts().list();
    println!("enroute_core version={}", enroute_core::core_version());
    println!("activities={}", catalog.activities().list().len());
    println!("bookings={}", catalog.bookings().list().len());
    println!(
        "payouts={} total={}",
        payouts.len(),
        total_payout(&payouts)
    );
}

#[cfg(test)]
mod tests {
    use super::{activity_input, Cli, Commands};
    use clap::Parser;
    use enroute_core::{Activity, Catalog};

    fn parse_add(args: &[&str]) -> Activity {
        let cli = Cli::try_parse_from(args).unwrap();
        let input = match cli.command {
            Commands::AddActivity {
                name,
                price,
                category,
                description,
                rating,
            } => activity_input(name, price, category, description, rating),
            other => panic!("expected add-activity, got {other:?}"),
        };
        Catalog::in_memory().activities().add(&input)
    }

    #[test]
    fn add_activity_rating_reaches_the_record() {
        let activity = parse_add(&[
            "enroute",
            "add-activity",
            "--name",
            "Sunrise Yoga",
            "--price",
            "600",
            "--rating",
            "4.5",
        ]);

        assert_eq!(activity.rating, 4.5);
        assert_eq!(activity.price, 600.0);
    }

    #[test]
    fn add_activity_rating_is_clamped() {
        let activity = parse_add(&["enroute", "add-activity", "--name", "X", "--rating", "9"]);
        assert_eq!(activity.rating, 5.0);
    }

    #[test]
    fn non_numeric_rating_is_rejected_by_the_parser() {
        let parsed = Cli::try_parse_from(["enroute", "add-activity", "--name", "X", "--rating", "great"]);
        assert!(parsed.is_err());
    }
}
