pub mod market_store;
pub mod portfolio_store;
pub mod search_store;
pub mod theme_store;
