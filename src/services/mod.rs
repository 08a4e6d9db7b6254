pub mod league_api;
