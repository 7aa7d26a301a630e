pub mod analytics;
pub mod chart;
pub mod coin;
pub mod market;
pub mod portfolio;
pub mod search;
pub mod settings;
pub mod theme;
pub mod view;
