use directus::{ClientConfig, DirectusClient, Endpoint};

pub fn main() -> directus::Result<()> {
    env_logger::init();

    let base_url =
        std::env::var("DIRECTUS_URL").unwrap_or_else(|_| "http://localhost:8080".to_owned());
    let project = std::env::var("DIRECTUS_PROJECT").unwrap_or_else(|_| "_".to_owned());
    let email = std::env::var("DIRECTUS_EMAIL").unwrap_or_default();
    let password = std::env::var("DIRECTUS_PASSWORD").unwrap_or_default();

    let mut client = ClientConfig::new(base_url).project(project).to_client()?;

    let auth = client.authenticate(&email, &password, None, None)?;
    if DirectusClient::is_error(&auth) {
        println!("Authentication failed: {}", auth["error"]);
        return Ok(());
    }

    // The token is kept for every following request.
    let collections = client
        .endpoint(Endpoint::Collections)
        .fields(["collection", "note"])
        .all()
        .get()?;

    println!("Collections: {}", collections["data"]);
    Ok(())
}
