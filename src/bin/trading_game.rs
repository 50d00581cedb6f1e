use std::io;

use clap::Parser;

use agora::config::GameConfig;
use agora::console::Console;
use agora::game::Game;
use agora::source::{OfflineQuoteSource, YahooQuoteSource};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = GameConfig::parse();
    let console = Console::new(io::stdin().lock(), io::stdout());

    if config.offline {
        return Game::new(config, console, OfflineQuoteSource).run();
    }

    match YahooQuoteSource::new() {
        Ok(source) => Game::new(config, console, source).run(),
        Err(e) => {
            log::warn!("Live quotes unavailable, continuing with mock prices: {}", e);
            Game::new(config, console, OfflineQuoteSource).run()
        }
    }
}
