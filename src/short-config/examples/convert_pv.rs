use short_config::ShortConfig;

const DEFAULT_DOCUMENT: &str = "data/pv.yaml";

fn main() -> anyhow::Result<()> {
    // Read the short config ($SHORT_CONFIG or $HOME/.short/config)
    // Decode the persistent volume document given as first argument
    // Print the decoded volume, then write it back out in short form

    fluvio_future::subscriber::init_tracer(None);
    let config = ShortConfig::load()?;
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_DOCUMENT.to_owned());

    let volume = config.read_volume(&path)?;
    println!("{volume:#?}");
    println!("{}", config.volume_to_yaml(&volume)?);
    Ok(())
}
