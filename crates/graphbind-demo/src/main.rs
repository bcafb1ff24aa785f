//! CLI entry point for the graphbind movie walkthrough.
//!
//! Expects the Neo4j movies dataset (`:play movies`) to be loaded.

mod models;
mod settings;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use graphbind_core::{Direction, Edge, RelationshipModel};
use graphbind_graph::{GraphClient, Mapper};

use models::{Movie, Role, User};

#[derive(Parser)]
#[command(name = "graphbind-demo")]
#[command(about = "Walk movie reviews and acting roles through the graphbind mapper")]
struct Cli {
    /// Config file prefix (default: graphbind).
    #[arg(short, long, default_value = "graphbind")]
    config: String,

    /// Title of the movie whose reviews are refreshed.
    #[arg(long, default_value = "The Replacements")]
    title: String,

    /// Release year of the movie.
    #[arg(long, default_value_t = 2000)]
    released: i64,

    /// Person whose acting roles are listed.
    #[arg(long, default_value = "Keanu Reeves")]
    person: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).json().init();

    let cli = Cli::parse();
    let cfg = settings::load(&cli.config)?;

    let client = GraphClient::connect(&cfg.neo4j).await?;
    let mapper = Mapper::new(cfg.mapper);

    let mut movie = Movie::key(&cli.title, cli.released);
    mapper
        .refresh_relationship(&client, &mut movie, "reviews")
        .await?;
    tracing::info!(
        title = %movie.title,
        released = movie.released,
        reviews = movie.reviews.len(),
        "Refreshed movie reviews"
    );
    for review in &movie.reviews {
        tracing::info!(
            reviewer = %review.node.name,
            rating = review.properties.rating,
            summary = %review.properties.summary,
            "Review"
        );
    }

    let person = User::named(&cli.person);
    let roles: Vec<Edge<Movie, Role>> = mapper
        .retrieve_relationship_edges(
            &client,
            &person,
            &Role::relationship_type(),
            Direction::Outgoing,
        )
        .await?;
    tracing::info!(person = %person.name, movies = roles.len(), "Retrieved acting roles");
    for role in &roles {
        tracing::info!(
            movie = %role.node.title,
            released = role.node.released,
            roles = ?role.properties.roles,
            "Acted in"
        );
    }

    Ok(())
}
