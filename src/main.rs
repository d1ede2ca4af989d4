use novelhub::{
    run,
    telemetry::{get_subscriber, init_subscriber},
};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("novelhub".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber)?;

    run().await
}
