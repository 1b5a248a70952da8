use azure_peering_probe::azure::ArmProvider;
use azure_peering_probe::output::print_report;
use azure_peering_probe::{run_demo, DemoPlan, Settings};
use std::error::Error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    // Do as little as possible in main.rs as it can't contain any tests
    log4rs::init_file("log4rs.yml", Default::default()).expect("Error initializing log4rs");
    dotenv::dotenv().ok();
    //
    log::info!("#Start main()");

    let settings = Settings::from_env()?;
    log::info!("Using subscription {}", settings.subscription_id);

    let plan = DemoPlan::demo()?;
    let provider = ArmProvider::new(&settings);

    let report = run_demo(&provider, &plan).await?;
    print_report(&report);

    Ok(())
}
