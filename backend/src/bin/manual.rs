//! Rain Risk Service - manual input console
//!
//! Trains the model, then scores one set of readings typed at the prompt.

use std::io::{self, Write};

use rainrisk_backend::{config::Config, console, services::shared_model};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rainrisk_backend=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    dotenvy::dotenv().ok();
    let config = Config::load()?;

    println!("Training model... please wait.");
    let model = shared_model(&config.model).await?;
    println!(
        "Model trained successfully on {} rows.\n",
        model.summary().training_rows
    );

    println!("{}", console::BANNER);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let entry = console::read_entry(&mut stdin.lock(), &mut stdout)?;
    writeln!(stdout, "{}", console::evaluate(&model, &entry))?;

    Ok(())
}
