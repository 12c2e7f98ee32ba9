mod cli;
mod commands;

use aoc_relay::error::RelayError;
use aoc_relay::{env_loader, logging};

fn main() {
    env_loader::load_dotenv();
    logging::init();

    match cli::run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(2),
        Err(err) => {
            match err.downcast_ref::<RelayError>() {
                Some(relay) => eprintln!("error[{}]: {err:#}", relay.code().as_str()),
                None => eprintln!("error: {err:#}"),
            }
            std::process::exit(1);
        }
    }
}
