// Entrypoint for the movie CLI.
// - Keeps `main` small: configure logging, build the catalog client and the
//   storage handle, then hand both to the UI loop.
// - Returns `anyhow::Result` so startup failures (e.g. a missing API key)
//   print a clean message with exit code != 0.

use moviedb_cli::{api::OmdbClient, storage::Storage, ui::main_menu};

fn main() -> anyhow::Result<()> {
    // Diagnostics go through `log`; enable with RUST_LOG=debug etc.
    env_logger::init();

    // Catalog client configured by `OMDB_API_KEY` (required) and
    // `OMDB_API_URL` (optional). See `api::OmdbClient::from_env`.
    let api = OmdbClient::from_env()?;

    // Database path from `MOVIEDB_PATH`, default `data/movies.db`.
    let storage = Storage::from_env();

    // Start the interactive menu. This call blocks until the user exits;
    // a normal exit returns Ok and thus process exit code 0.
    main_menu(&storage, &api)?;
    Ok(())
}
