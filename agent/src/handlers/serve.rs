//! Serve command handler
//!
//! Run the content generation HTTP API.

use anyhow::Result;

use super::CommandContext;
use crate::web::{self, AppState};

/// Handle the `serve` command
pub async fn run_serve(ctx: &CommandContext, port: Option<u16>) -> Result<()> {
    let port = port.unwrap_or(ctx.config.server.port);
    let flow = ctx.build_flow()?;

    if !flow.delivery_enabled() {
        tracing::info!("TWILIO_WHATSAPP_TO not set; WhatsApp delivery disabled");
    }

    web::serve(port, AppState::new(flow, ctx.config.llm.model.clone())).await
}
