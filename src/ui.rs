// UI layer: the interactive menu loop using `dialoguer`. Each handler maps
// one menu choice to a storage/stats call and prints the outcome; storage
// failures are rendered as messages, never propagated. Only prompt I/O
// errors bubble up.

use std::collections::BTreeMap;
use std::time::Duration;

use anyhow::Result;
use dialoguer::{Input, Select};
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;

use crate::api::OmdbClient;
use crate::html;
use crate::stats;
use crate::storage::{AddOutcome, MovieInfo, Storage};

/// Main interactive menu. Runs a select loop over the numbered actions
/// until the user chooses "Exit". Blocks for the lifetime of the program.
pub fn main_menu(storage: &Storage, api: &OmdbClient) -> Result<()> {
    let items = vec![
        "0. Exit",
        "1. List movies",
        "2. Add movie",
        "3. Delete movie",
        "4. Update movie",
        "5. Stats",
        "6. Random movie",
        "7. Search movie",
        "8. Movies sorted by rating",
        "9. Movies sorted by year",
        "10. Generate landing page",
    ];

    loop {
        println!();
        println!("********** My Movies Database **********");
        println!();
        let selection = Select::new().items(&items).default(0).interact()?;
        println!();
        match selection {
            0 => {
                println!("Bye!");
                break;
            }
            1 => list_movies(storage),
            2 => add_movie(storage, api)?,
            3 => delete_movie(storage)?,
            4 => update_movie(storage)?,
            5 => show_stats(storage),
            6 => random_movie(storage),
            7 => search_movies(storage)?,
            8 => sorted_by_rating(storage),
            9 => sorted_by_year(storage)?,
            10 => generate_landing_page(storage),
            _ => {}
        }
        if selection != 0 {
            pause()?;
        }
    }
    Ok(())
}

fn list_movies(storage: &Storage) {
    match storage.get_movies() {
        Ok(movies) if movies.is_empty() => {
            println!("Database is empty, add movies to database.");
        }
        Ok(movies) => {
            for (title, info) in &movies {
                println!("{}", format_movie(title, info));
            }
        }
        Err(e) => println!("Database error: {e}"),
    }
}

fn add_movie(storage: &Storage, api: &OmdbClient) -> Result<()> {
    let title: String = Input::new()
        .with_prompt("Enter new movie name (empty = back to menu)")
        .allow_empty(true)
        .interact_text()?;
    if title.is_empty() {
        return Ok(());
    }

    // Spinner while the remote lookup is in flight.
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    spinner.set_message("Fetching movie data...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let outcome = storage.add_movie(api, &title);
    spinner.finish_and_clear();

    match outcome {
        AddOutcome::Added {
            title,
            year,
            rating,
        } => println!("Movie \"{title}\" ({year}) added successfully with rating {rating}."),
        AddOutcome::NotFound { title } => {
            println!("Error: Movie \"{title}\" not found in catalog.");
        }
        AddOutcome::Duplicate { title } => {
            println!("Error: Movie \"{title}\" already exists in database.");
        }
        AddOutcome::ApiConnection => println!("Error: OMDb API connection problem."),
        AddOutcome::DatabaseError { detail } => println!("Database error: {detail}"),
    }
    Ok(())
}

fn delete_movie(storage: &Storage) -> Result<()> {
    let title: String = Input::new()
        .with_prompt("Enter movie name to delete (empty = back to menu)")
        .allow_empty(true)
        .interact_text()?;
    if title.is_empty() {
        return Ok(());
    }

    match storage.delete_movie(&title) {
        Ok(true) => println!("Movie \"{title}\" deleted successfully."),
        Ok(false) => println!("Movie \"{title}\" doesn't exist!"),
        Err(e) => println!("Database error: {e}"),
    }
    Ok(())
}

fn update_movie(storage: &Storage) -> Result<()> {
    let title: String = Input::new()
        .with_prompt("Enter movie name (empty = back to menu)")
        .allow_empty(true)
        .interact_text()?;
    if title.is_empty() {
        return Ok(());
    }
    let rating: f64 = Input::new().with_prompt("Enter new rating").interact_text()?;

    match storage.update_movie(&title, rating) {
        Ok(true) => println!("Movie \"{title}\" updated successfully."),
        Ok(false) => println!("Movie \"{title}\" doesn't exist!"),
        Err(e) => println!("Database error: {e}"),
    }
    Ok(())
}

fn show_stats(storage: &Storage) {
    let movies = match storage.get_movies() {
        Ok(movies) => movies,
        Err(e) => {
            println!("Database error: {e}");
            return;
        }
    };
    if movies.is_empty() {
        println!("Database is empty, add movies to database.");
        return;
    }

    if let Some(average) = stats::average_rating(&movies) {
        println!("Average rating: {average:.1}");
    }
    if let Some(median) = stats::median_rating(&movies) {
        println!("Median rating: {median}");
    }
    println!("Best movie: {}", format_rated_list(&stats::best_movies(&movies)));
    println!("Worst movie: {}", format_rated_list(&stats::worst_movies(&movies)));
}

fn random_movie(storage: &Storage) {
    let movies = match storage.get_movies() {
        Ok(movies) => movies,
        Err(e) => {
            println!("Database error: {e}");
            return;
        }
    };
    if movies.is_empty() {
        println!("Database is empty, add movies to database.");
        return;
    }

    if let Some((title, info)) = pick_random(&movies) {
        println!(
            "Your movie for tonight: {title} with a rating of {}",
            info.rating
        );
    }
}

/// Uniform pick from the collection. `None` only when it is empty.
fn pick_random(movies: &BTreeMap<String, MovieInfo>) -> Option<(&str, &MovieInfo)> {
    if movies.is_empty() {
        return None;
    }
    let index = rand::rng().random_range(0..movies.len());
    movies
        .iter()
        .nth(index)
        .map(|(title, info)| (title.as_str(), info))
}

fn search_movies(storage: &Storage) -> Result<()> {
    let query: String = Input::new()
        .with_prompt("Enter part of movie name")
        .allow_empty(true)
        .interact_text()?;

    let movies = match storage.get_movies() {
        Ok(movies) => movies,
        Err(e) => {
            println!("Database error: {e}");
            return Ok(());
        }
    };

    let matches = stats::search_movies(&movies, &query);
    if matches.is_empty() {
        println!("Couldn't find movies with '{query}'");
    } else {
        for (title, info) in matches {
            println!("{}", format_movie(title, info));
        }
    }
    Ok(())
}

fn sorted_by_rating(storage: &Storage) {
    let movies = match storage.get_movies() {
        Ok(movies) => movies,
        Err(e) => {
            println!("Database error: {e}");
            return;
        }
    };
    if movies.is_empty() {
        println!("Database is empty, add movies to database.");
        return;
    }

    for (title, info) in stats::sort_by_rating(&movies) {
        println!("{}", format_movie(title, info));
    }
}

fn sorted_by_year(storage: &Storage) -> Result<()> {
    let movies = match storage.get_movies() {
        Ok(movies) => movies,
        Err(e) => {
            println!("Database error: {e}");
            return Ok(());
        }
    };
    if movies.is_empty() {
        println!("Database is empty, add movies to database.");
        return Ok(());
    }

    let order = Select::new()
        .items(&["Newest movies first", "Oldest movies first"])
        .default(0)
        .interact()?;

    let mut sorted = stats::sort_by_year(&movies);
    if order == 1 {
        sorted.reverse();
    }
    for (title, info) in sorted {
        println!("{}", format_movie(title, info));
    }
    Ok(())
}

fn generate_landing_page(storage: &Storage) {
    match html::generate_landing_page(storage) {
        Ok(path) => println!("Landing page written to {}", path.display()),
        Err(e) => println!("Landing page generation failed: {e}"),
    }
}

fn pause() -> Result<()> {
    println!();
    let _: String = Input::new()
        .with_prompt("Press Enter to continue")
        .allow_empty(true)
        .interact_text()?;
    Ok(())
}

fn format_movie(title: &str, info: &MovieInfo) -> String {
    format!("{title} ({}): {}", info.year, info.rating)
}

fn format_rated_list(entries: &[(&str, &MovieInfo)]) -> String {
    entries
        .iter()
        .map(|(title, info)| format!("{title} ({}), {}", info.year, info.rating))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(titles: &[&str]) -> BTreeMap<String, MovieInfo> {
        titles
            .iter()
            .map(|title| {
                (
                    title.to_string(),
                    MovieInfo {
                        year: 2000,
                        rating: 7.0,
                        poster: "N/A".to_string(),
                    },
                )
            })
            .collect()
    }

    #[test]
    fn pick_random_from_empty_collection_is_none() {
        assert!(pick_random(&BTreeMap::new()).is_none());
    }

    #[test]
    fn pick_random_always_returns_a_stored_movie() {
        let movies = collection(&["Alien", "Heat", "Zodiac"]);
        for _ in 0..50 {
            let (title, _) = pick_random(&movies).unwrap();
            assert!(movies.contains_key(title));
        }
    }
}
