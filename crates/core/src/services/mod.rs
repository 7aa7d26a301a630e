pub mod filter_service;
pub mod refresh_service;
pub mod valuation_service;
