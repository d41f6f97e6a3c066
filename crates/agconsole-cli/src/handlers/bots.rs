use agconsole_runtime::BotProfileResolver;
use agconsole_types::BotProfile;
use anyhow::Result;
use serde::Serialize;

use super::HandlerContext;

#[derive(Serialize)]
struct BotListing {
    bot_name: String,
    selected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile: Option<BotProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn handle(ctx: &HandlerContext, json: bool) -> Result<()> {
    let catalog = ctx.catalog();
    let resolver = BotProfileResolver::new(&ctx.config, &catalog);
    let selected = ctx.config.selected_bot_name(None);

    let listings: Vec<BotListing> = ctx
        .config
        .bots
        .iter()
        .map(|bot| {
            let (profile, error) = match resolver.resolve(bot) {
                Ok(profile) => (Some(profile), None),
                Err(err) => (None, Some(err.to_string())),
            };
            BotListing {
                bot_name: bot.bot_name.clone(),
                selected: bot.bot_name == selected,
                profile,
                error,
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&listings)?);
        return Ok(());
    }

    if listings.is_empty() {
        println!("No bots configured in {}", ctx.config_path.display());
        return Ok(());
    }

    for listing in &listings {
        let marker = if listing.selected { "*" } else { " " };
        match (&listing.profile, &listing.error) {
            (Some(profile), _) => println!(
                "{} {}  {}/{}",
                marker, listing.bot_name, profile.agent_id, profile.agent_alias_id
            ),
            (None, Some(error)) => println!("{} {}  ({})", marker, listing.bot_name, error),
            (None, None) => println!("{} {}", marker, listing.bot_name),
        }
    }

    Ok(())
}
