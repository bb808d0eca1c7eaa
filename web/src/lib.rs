use clap::Parser;
use wasm_bindgen::prelude::*;

mod chime;
mod game;
mod scratch;
mod snow;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(flatten)]
    game: game::GameProps,
}

/// Arguments come from the location hash, e.g. `#-vv&--seed=42&--muted`.
fn parse_hash(hash: &str) -> Result<Args, clap::Error> {
    Args::try_parse_from(hash.split(['#', '&']))
}

#[wasm_bindgen(start)]
pub fn run_app() {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window()
        .location()
        .hash()
        .unwrap_or_else(|_| "".to_string());

    let args = parse_hash(&location_hash).expect("Could not parse args");
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level).expect("Error initializing logger");
    }
    log::debug!("args: {:?}", args);

    let root = document()
        .get_element_by_id("tombola")
        .expect("Could not find id=\"tombola\" element");

    log::debug!("App started");
    yew::Renderer::<game::GameView>::with_root_and_props(root, args.game).render();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_hash_uses_defaults() {
        let args = parse_hash("").unwrap();

        assert_eq!(args.game.seed, None);
        assert!(!args.game.no_snow);
    }

    #[test]
    fn hash_arguments_are_split_on_ampersands() {
        let args = parse_hash("#-vv&--seed=42&--no-snow&--muted").unwrap();

        assert_eq!(args.game.seed, Some(42));
        assert!(args.game.no_snow);
        assert!(args.game.muted);
        assert_eq!(args.verbose.log_level(), Some(log::Level::Info));
    }

    #[test]
    fn unknown_hash_argument_is_an_error() {
        assert!(parse_hash("#--bogus").is_err());
    }
}
