// Statistics and sorting over the in-memory snapshot. Everything here is a
// pure function: the caller fetches the collection once and these helpers
// never touch storage.
//
// The snapshot is a BTreeMap, so input order is alphabetical by title. That
// fixes tie-break behavior for best/worst and makes the stable sorts fully
// deterministic.

use std::collections::BTreeMap;

use crate::storage::MovieInfo;

/// Arithmetic mean of all ratings. `None` on an empty collection.
pub fn average_rating(movies: &BTreeMap<String, MovieInfo>) -> Option<f64> {
    if movies.is_empty() {
        return None;
    }
    let sum: f64 = movies.values().map(|info| info.rating).sum();
    Some(sum / movies.len() as f64)
}

/// Median rating using the middle-index policy: ratings are sorted ascending
/// and the element at `len / 2` is returned. For even counts this is the
/// upper-middle element, not the mean of the two middle values. That matches
/// the original application and is kept on purpose; the median of
/// {1, 2, 3, 4} is 3.0 here.
pub fn median_rating(movies: &BTreeMap<String, MovieInfo>) -> Option<f64> {
    if movies.is_empty() {
        return None;
    }
    let mut ratings: Vec<f64> = movies.values().map(|info| info.rating).collect();
    ratings.sort_by(f64::total_cmp);
    Some(ratings[ratings.len() / 2])
}

/// All movies sharing the highest rating, in alphabetical title order.
pub fn best_movies(movies: &BTreeMap<String, MovieInfo>) -> Vec<(&str, &MovieInfo)> {
    extremes(movies, |candidate, best| candidate > best)
}

/// All movies sharing the lowest rating, in alphabetical title order.
pub fn worst_movies(movies: &BTreeMap<String, MovieInfo>) -> Vec<(&str, &MovieInfo)> {
    extremes(movies, |candidate, worst| candidate < worst)
}

fn extremes(
    movies: &BTreeMap<String, MovieInfo>,
    beats: impl Fn(f64, f64) -> bool,
) -> Vec<(&str, &MovieInfo)> {
    // Ratings are not validated on input, so a NaN can reach storage via
    // the update prompt. NaN never wins a comparison and would wedge the
    // running extreme, so such entries are skipped outright.
    let mut extreme: Option<f64> = None;
    for info in movies.values() {
        if info.rating.is_nan() {
            continue;
        }
        match extreme {
            Some(current) if !beats(info.rating, current) => {}
            _ => extreme = Some(info.rating),
        }
    }
    let Some(extreme) = extreme else {
        return Vec::new();
    };
    movies
        .iter()
        .filter(|(_, info)| info.rating == extreme)
        .map(|(title, info)| (title.as_str(), info))
        .collect()
}

/// Case-insensitive substring search against titles. Returns every match in
/// alphabetical order.
pub fn search_movies<'a>(
    movies: &'a BTreeMap<String, MovieInfo>,
    query: &str,
) -> Vec<(&'a str, &'a MovieInfo)> {
    let needle = query.to_lowercase();
    movies
        .iter()
        .filter(|(title, _)| title.to_lowercase().contains(&needle))
        .map(|(title, info)| (title.as_str(), info))
        .collect()
}

/// Movies sorted by rating, highest first. Ties keep alphabetical order.
pub fn sort_by_rating(movies: &BTreeMap<String, MovieInfo>) -> Vec<(&str, &MovieInfo)> {
    insertion_sort_descending(movies, |info| info.rating)
}

/// Movies sorted by year, newest first. Ties keep alphabetical order.
pub fn sort_by_year(movies: &BTreeMap<String, MovieInfo>) -> Vec<(&str, &MovieInfo)> {
    insertion_sort_descending(movies, |info| info.year as f64)
}

/// Explicit insertion sort, descending by `key`. Stable: each entry is
/// placed after every already-sorted entry whose key is greater or equal,
/// so equal keys preserve the alphabetical input order.
fn insertion_sort_descending(
    movies: &BTreeMap<String, MovieInfo>,
    key: impl Fn(&MovieInfo) -> f64,
) -> Vec<(&str, &MovieInfo)> {
    let mut sorted: Vec<(&str, &MovieInfo)> = Vec::with_capacity(movies.len());
    for (title, info) in movies {
        let k = key(info);
        let pos = sorted
            .iter()
            .position(|&(_, placed)| key(placed) < k)
            .unwrap_or(sorted.len());
        sorted.insert(pos, (title.as_str(), info));
    }
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(year: i32, rating: f64) -> MovieInfo {
        MovieInfo {
            year,
            rating,
            poster: "N/A".to_string(),
        }
    }

    fn collection(entries: &[(&str, i32, f64)]) -> BTreeMap<String, MovieInfo> {
        entries
            .iter()
            .map(|(title, year, rating)| (title.to_string(), info(*year, *rating)))
            .collect()
    }

    #[test]
    fn average_of_empty_collection_is_none() {
        assert_eq!(average_rating(&BTreeMap::new()), None);
    }

    #[test]
    fn average_is_the_arithmetic_mean() {
        let movies = collection(&[("A", 2000, 8.0), ("B", 2001, 6.0), ("C", 2002, 7.0)]);
        assert_eq!(average_rating(&movies), Some(7.0));
    }

    #[test]
    fn median_of_even_count_takes_the_upper_middle() {
        let movies = collection(&[
            ("A", 2000, 1.0),
            ("B", 2001, 2.0),
            ("C", 2002, 3.0),
            ("D", 2003, 4.0),
        ]);
        // Middle-index policy: not 2.5.
        assert_eq!(median_rating(&movies), Some(3.0));
    }

    #[test]
    fn median_of_odd_count_is_the_middle_element() {
        let movies = collection(&[("A", 2000, 9.0), ("B", 2001, 1.0), ("C", 2002, 5.0)]);
        assert_eq!(median_rating(&movies), Some(5.0));
    }

    #[test]
    fn median_of_empty_collection_is_none() {
        assert_eq!(median_rating(&BTreeMap::new()), None);
    }

    #[test]
    fn best_returns_all_tied_movies_alphabetically() {
        let movies = collection(&[("Zodiac", 2007, 9.0), ("Alien", 1979, 9.0), ("Heat", 1995, 8.3)]);
        let best = best_movies(&movies);
        let titles: Vec<&str> = best.iter().map(|(title, _)| *title).collect();
        assert_eq!(titles, vec!["Alien", "Zodiac"]);
    }

    #[test]
    fn worst_returns_all_tied_movies_alphabetically() {
        let movies = collection(&[("Zodiac", 2007, 2.0), ("Alien", 1979, 2.0), ("Heat", 1995, 8.3)]);
        let worst = worst_movies(&movies);
        let titles: Vec<&str> = worst.iter().map(|(title, _)| *title).collect();
        assert_eq!(titles, vec!["Alien", "Zodiac"]);
    }

    #[test]
    fn nan_ratings_do_not_wedge_best_or_worst() {
        let movies = collection(&[
            ("Aardvark", 2010, f64::NAN),
            ("Heat", 1995, 8.3),
            ("Zodiac", 2007, 7.7),
        ]);
        let best: Vec<&str> = best_movies(&movies).iter().map(|(t, _)| *t).collect();
        let worst: Vec<&str> = worst_movies(&movies).iter().map(|(t, _)| *t).collect();
        assert_eq!(best, vec!["Heat"]);
        assert_eq!(worst, vec!["Zodiac"]);
    }

    #[test]
    fn all_nan_ratings_yield_no_best_movie() {
        let movies = collection(&[("Aardvark", 2010, f64::NAN)]);
        assert!(best_movies(&movies).is_empty());
    }

    #[test]
    fn search_is_case_insensitive_and_returns_all_substring_matches() {
        let movies = collection(&[
            ("The Matrix", 1999, 8.7),
            ("The Matrix Reloaded", 2003, 7.2),
            ("Heat", 1995, 8.3),
        ]);
        let found = search_movies(&movies, "matrix");
        let titles: Vec<&str> = found.iter().map(|(title, _)| *title).collect();
        assert_eq!(titles, vec!["The Matrix", "The Matrix Reloaded"]);
    }

    #[test]
    fn search_with_no_match_is_empty() {
        let movies = collection(&[("Heat", 1995, 8.3)]);
        assert!(search_movies(&movies, "matrix").is_empty());
    }

    #[test]
    fn sort_by_rating_is_descending_and_stable_for_duplicates() {
        let movies = collection(&[
            ("Blade Runner", 1982, 8.1),
            ("Alien", 1979, 8.1),
            ("Casablanca", 1942, 8.5),
            ("Dune", 2021, 8.0),
        ]);
        let sorted = sort_by_rating(&movies);
        let titles: Vec<&str> = sorted.iter().map(|(title, _)| *title).collect();
        // Tied 8.1 entries keep alphabetical order.
        assert_eq!(titles, vec!["Casablanca", "Alien", "Blade Runner", "Dune"]);
    }

    #[test]
    fn sort_by_year_is_descending_and_stable_for_duplicates() {
        let movies = collection(&[
            ("Se7en", 1995, 8.6),
            ("Heat", 1995, 8.3),
            ("Alien", 1979, 8.5),
            ("Dune", 2021, 8.0),
        ]);
        let sorted = sort_by_year(&movies);
        let titles: Vec<&str> = sorted.iter().map(|(title, _)| *title).collect();
        assert_eq!(titles, vec!["Dune", "Heat", "Se7en", "Alien"]);
    }
}
