use mistry::MistryConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    mistry::init_logger();

    let config = MistryConfig::from_env()?;
    if config.openai_api_key.is_none() && config.gemini_api_key.is_none() {
        log::warn!("No OPENAI_API_KEY or GEMINI_API_KEY set; only local math answers will work");
    }

    log::info!("Access the API at: http://localhost:{}", config.port);
    mistry::server::serve(config).await
}
