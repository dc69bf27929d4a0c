use std::io;

use hashing::logger::initialize_logger;
use hashing::{run_all, CsvSink, SimConfig, SimError};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> Result<(), SimError> {
    initialize_logger();

    let config = SimConfig::from_env();
    info!("seeding key generators with {}", config.seed);
    let mut rng = StdRng::seed_from_u64(config.seed);

    let stdout = io::stdout();
    let mut sink = CsvSink::new(io::BufWriter::new(stdout.lock()), config.time_chaining);
    let summaries = run_all(&config, &mut rng, &mut sink)?;

    let overflows: u64 = summaries.iter().map(|s| s.overflows()).sum();
    info!("completed {} runs, {} open-addressing overflows", summaries.len(), overflows);
    Ok(())
}
