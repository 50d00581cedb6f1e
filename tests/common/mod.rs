#![allow(dead_code)]

use std::io::Cursor;

use agora::config::GameConfig;
use agora::console::Console;
use agora::input::{PriceSnapshot, PriceSnapshotBuilder};
use agora::universe::Universe;

pub fn two_stock_universe() -> Universe {
    Universe::new(vec![("A", "AAA"), ("B", "BBB")])
}

pub fn snapshot(period: usize, prices: &[(&str, f64)]) -> PriceSnapshot {
    let mut builder = PriceSnapshotBuilder::new(period);
    for (name, price) in prices {
        builder.add_price(*name, *price);
    }
    builder.build()
}

pub fn scripted_console(lines: &[&str]) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
    let mut script = lines.join("\n");
    script.push('\n');
    Console::new(Cursor::new(script.into_bytes()), Vec::new())
}

pub fn offline_config(seed: u64) -> GameConfig {
    let mut config = GameConfig::default();
    config.seed = Some(seed);
    config.offline = true;
    config.no_charts = true;
    config
}
