//! Run command handler
//!
//! Runs one request and prints the generated posts.

use anyhow::Result;
use content_flow::MergedItem;

use super::CommandContext;

const RULE: &str = "============================================================";

/// Handle the `run` command
pub async fn run_flow(ctx: &CommandContext, query: &str) -> Result<()> {
    let flow = ctx.build_flow()?;
    let state = flow.kickoff(query).await;

    print!("{}", format_posts(state.combined_results()));

    if !state.whatsapp_send_output.is_empty() {
        println!("Delivery:");
        for status in &state.whatsapp_send_output {
            println!("  {}", status);
        }
    }

    Ok(())
}

/// Render merged results as numbered posts
pub fn format_posts(items: &[MergedItem]) -> String {
    let mut out = format!("\n{}\nGENERATED POSTS\n{}\n", RULE, RULE);

    if items.is_empty() {
        out.push_str("No posts generated.\n");
    }

    for (i, item) in items.iter().enumerate() {
        out.push_str(&format!("\n--- Post {} ---\n", i + 1));
        let text = item.text.as_deref().filter(|t| !t.is_empty());
        let image = item.image.as_deref().filter(|i| !i.is_empty());

        if let Some(text) = text {
            out.push_str(&format!("Text: {}\n", text));
        }
        if let Some(image) = image {
            out.push_str(&format!("Image URL: {}\n", image));
        }
        if text.is_none() && image.is_none() {
            out.push_str("No content\n");
        }
        out.push('\n');
    }

    out.push_str(RULE);
    out.push('\n');
    out
}
