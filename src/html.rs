// Static landing-page export. Builds one movie card per record, substitutes
// the placeholders in the shipped template and writes the finished page next
// to it. Paths are fixed and relative, matching the rest of the app's
// working-directory layout.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::storage::{Storage, StorageError};

const TEMPLATE_PATH: &str = "_static/index_template.html";
const OUTPUT_PATH: &str = "_static/index.html";
const PAGE_TITLE: &str = "MOVIE-DB";

const TITLE_PLACEHOLDER: &str = "__TEMPLATE_TITLE__";
const GRID_PLACEHOLDER: &str = "__TEMPLATE_MOVIE_GRID__";

#[derive(Debug, Error)]
pub enum HtmlError {
    #[error("could not read template {path}: {source}")]
    ReadTemplate {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not write page {path}: {source}")]
    WritePage {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Generate `_static/index.html` from the template and the current
/// collection. Returns the output path for the UI to report.
pub fn generate_landing_page(storage: &Storage) -> Result<PathBuf, HtmlError> {
    let movies = storage.get_movies()?;

    let cards: String = movies
        .iter()
        .map(|(title, info)| render_card(title, info.year, &info.poster))
        .collect();

    let template_path = Path::new(TEMPLATE_PATH);
    let template =
        std::fs::read_to_string(template_path).map_err(|source| HtmlError::ReadTemplate {
            path: template_path.to_path_buf(),
            source,
        })?;

    let page = render_page(&template, &cards);
    let output_path = Path::new(OUTPUT_PATH);
    std::fs::write(output_path, page).map_err(|source| HtmlError::WritePage {
        path: output_path.to_path_buf(),
        source,
    })?;

    Ok(output_path.to_path_buf())
}

/// One `<li>` card. Titles come from an external catalog, so they are
/// escaped before landing in markup.
fn render_card(title: &str, year: i32, poster: &str) -> String {
    let mut card = String::new();
    card.push_str("    <li class=\"movie\">\n");
    card.push_str(&format!(
        "        <img class=\"movie-poster\" src=\"{}\">\n",
        escape(poster)
    ));
    card.push_str(&format!(
        "        <p class=\"movie-title\">{}</p>\n",
        escape(title)
    ));
    card.push_str(&format!("        <p class=\"movie-year\">{year}</p>\n"));
    card.push_str("    </li>\n");
    card
}

fn render_page(template: &str, cards: &str) -> String {
    template
        .replace(TITLE_PLACEHOLDER, PAGE_TITLE)
        .replace(GRID_PLACEHOLDER, cards)
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_contains_title_year_and_poster() {
        let card = render_card("The Matrix", 1999, "http://example.com/matrix.jpg");
        assert!(card.contains("<p class=\"movie-title\">The Matrix</p>"));
        assert!(card.contains("<p class=\"movie-year\">1999</p>"));
        assert!(card.contains("src=\"http://example.com/matrix.jpg\""));
    }

    #[test]
    fn card_escapes_markup_in_titles() {
        let card = render_card("Fast & <Furious>", 2001, "N/A");
        assert!(card.contains("Fast &amp; &lt;Furious&gt;"));
        assert!(!card.contains("<Furious>"));
    }

    #[test]
    fn page_substitutes_both_placeholders() {
        let template = "<title>__TEMPLATE_TITLE__</title>\n<ol>\n__TEMPLATE_MOVIE_GRID__</ol>\n";
        let page = render_page(template, "CARDS");
        assert!(page.contains("<title>MOVIE-DB</title>"));
        assert!(page.contains("CARDS"));
        assert!(!page.contains("__TEMPLATE_"));
    }
}
