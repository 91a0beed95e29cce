pub mod browser;
pub mod config;
pub mod crawler;
pub mod directory;
pub mod output;
pub mod parser;
