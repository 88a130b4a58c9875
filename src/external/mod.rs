pub mod api_client;
pub mod coingecko;
pub mod multi_provider;
pub mod price_provider;
pub mod translator;
pub mod wordpress;
pub mod worker;
