//! Social media content generation service
//!
//! Concrete clients (OpenAI-compatible chat, DALL-E 3 and Recraft images,
//! Twilio WhatsApp) plus the CLI and HTTP API around `content_flow`.

pub mod cli;
pub mod config;
pub mod handlers;
pub mod http;
pub mod images;
pub mod llm;
pub mod messaging;
pub mod pipelines;
pub mod prompts;
pub mod web;
