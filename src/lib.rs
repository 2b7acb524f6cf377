pub mod cli;
pub mod config;
pub mod extract;
pub mod llm;
pub mod notify;
pub mod report;
pub mod source;
pub mod table;
pub mod web;
