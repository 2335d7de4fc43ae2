use std::env;

use mcd43::config::Config;
use mcd43::utils::summarize;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "./data/config/mcd43.json".to_string());

    let config = Config::from_file(&config_path)?;
    let retriever = config.retriever()?;

    let dates = match config.dates() {
        Some(dates) => dates.to_vec(),
        None => retriever.dates().collect(),
    };

    println!(
        "Tile {} - Number of dates: {}, bands: {}",
        retriever.tile(),
        dates.len(),
        config.bands().len()
    );

    for date in dates {
        for band in config.bands() {
            let (kernels, mask) = retriever.get_brdf_descriptors(band.number(), date)?;
            println!("{} {}", date, band);
            println!("{}", summarize(&kernels, &mask)?);
        }
    }

    Ok(())
}
