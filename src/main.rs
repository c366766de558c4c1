use anyhow::{Result, anyhow};
use chrono::Local;
use clap::Parser;
use flagquiz::application::{QuizSession, UseCaseContainer};
use flagquiz::domain::entities::{Coordinate, GameMode};
use flagquiz::domain::filter::{FilterState, PredicateRegistry};
use flagquiz::domain::repositories::{CountryLocator, CountryRepository, KeyValueStore};
use flagquiz::domain::services::scoring::format_distance;
use flagquiz::domain::services::{Difficulty, Guess};
use flagquiz::infrastructure::{
    ConfigRepository, JsonCountryRepository, JsonFileStore, NearestCountryLocator,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "flagquiz", version, about = "Find the country on the map")]
struct Cli {
    /// JSON country list (`code`, `name`, `latlng` records)
    #[arg(long)]
    countries: Option<PathBuf>,

    /// Filter to apply, e.g. `europe,asia|middle-east`
    #[arg(long)]
    filter: Option<String>,

    /// all, easy, medium, hard or expert
    #[arg(long)]
    difficulty: Option<Difficulty>,

    /// classic, practice, daily or endless
    #[arg(long, default_value = "classic")]
    mode: GameMode,

    #[arg(long)]
    rounds: Option<u32>,

    /// Print every filter key and exit
    #[arg(long)]
    list_filters: bool,

    /// Forget the saved filter and difficulty
    #[arg(long)]
    reset: bool,

    /// Keep --countries and --rounds in config.json for later runs
    #[arg(long)]
    save_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config_repository = ConfigRepository::new();
    let mut config = config_repository.load()?;
    if let Some(path) = &cli.countries {
        config.countries_path = Some(path.clone());
    }
    if let Some(rounds) = cli.rounds {
        config.total_rounds = rounds;
    }
    if cli.save_config {
        config_repository.save(&config)?;
    }
    let registry = Arc::new(PredicateRegistry::builtin()?);

    if cli.list_filters {
        for key in registry.keys() {
            println!("{:<28} {}", key, registry.label(key));
        }
        return Ok(());
    }

    let store: Arc<dyn KeyValueStore> = match &config.storage_path {
        Some(path) => Arc::new(JsonFileStore::with_path(path.clone())),
        None => Arc::new(JsonFileStore::new()),
    };
    let countries_path = config
        .countries_path
        .clone()
        .ok_or_else(|| anyhow!("No country list: pass --countries or set it in config.json"))?;
    let repository: Arc<dyn CountryRepository> =
        Arc::new(JsonCountryRepository::new(countries_path));
    let use_cases =
        UseCaseContainer::new(repository, Arc::clone(&store), config.daily_challenge_size);

    let mut session = QuizSession::new(registry, store, config.total_rounds as usize);
    session.restore()?;
    if cli.reset {
        session.factory_reset()?;
    }

    let countries = use_cases.load_countries.execute().await?;
    if let Err(e) = session.load_countries(countries) {
        eprintln!("Saved filter '{}' cannot be used: {}", session.filter(), e);
    }

    if let Some(encoded) = &cli.filter {
        session.set_draft(FilterState::parse(encoded));
        session.apply_filter()?;
    }
    if let Some(difficulty) = cli.difficulty {
        session.set_difficulty(difficulty)?;
    }

    if cli.mode == GameMode::Daily {
        let challenge = use_cases
            .daily_challenge
            .execute(Local::now().date_naive(), session.countries())?;
        session.set_daily_challenge(&challenge.codes);
    }
    session.set_mode(cli.mode);

    println!("{} mode, {}", session.mode(), session.label());
    println!("{}", flagquiz::domain::filter::describe_count(session.eligible_count()));

    let locator = NearestCountryLocator::new(session.countries().to_vec());
    play(&mut session, &locator).await
}

async fn play(session: &mut QuizSession, locator: &dyn CountryLocator) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    'game: while !session.is_over() {
        let target = session.next_round()?;
        let round = match session.total_rounds() {
            Some(total) => format!("{}/{}", session.round(), total),
            None => session.round().to_string(),
        };
        println!("\nRound {}: where is {}?", round, target.name);

        let outcome = loop {
            let Some(line) = lines.next_line().await? else {
                break 'game;
            };
            match parse_guess(line.trim(), session, locator) {
                Some(guess) => break session.submit_guess(&guess)?,
                None => println!("Enter 'lat,lon' or a two-letter country code"),
            }
        };

        if outcome.correct {
            println!(
                "Correct! +{} points ({}x), {} from the reference point",
                outcome.points,
                outcome.multiplier,
                format_distance(outcome.distance_km)
            );
        } else {
            println!(
                "Wrong, that was {}. {} away",
                outcome.target,
                format_distance(outcome.distance_km)
            );
        }
    }

    let board = session.scoreboard();
    println!(
        "\nScore {} | {} of {} correct | best streak {} | {} XP",
        board.score,
        board.correct,
        board.rounds_played(),
        board.best_streak,
        board.xp
    );
    if let Some(average) = board.average_distance_km() {
        println!("Average distance {}", format_distance(average));
    }
    Ok(())
}

fn parse_guess(input: &str, session: &QuizSession, locator: &dyn CountryLocator) -> Option<Guess> {
    if let Some((lat, lon)) = input.split_once(',') {
        let coordinate = Coordinate::new(lat.trim().parse().ok()?, lon.trim().parse().ok()?);
        if !coordinate.is_valid() {
            return None;
        }
        return Some(match locator.locate(&coordinate) {
            Some(country) => Guess::at(coordinate)
                .with_country_code(country.code)
                .with_country_name(country.name),
            None => Guess::at(coordinate),
        });
    }

    let code = input.to_ascii_lowercase();
    session
        .countries()
        .iter()
        .find(|country| country.code == code)
        .map(|country| Guess::at(country.coordinate).with_country_code(country.code.clone()))
}
