mod events;
mod logging;

use std::collections::HashSet;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use poise::serenity_prelude as serenity;
use tracing::{debug, error, info, warn};

use rustls::crypto::ring::default_provider;

use slice_alt::AltService;
use slice_core::{DEFAULT_ALT_COOLDOWN, Data, Error, Settings};
use slice_store::{DEFAULT_KEY_PREFIX, RegistryStore};
use slice_utils::DEFAULT_COMMAND_PREFIX;
use slice_utils::embed::DEFAULT_EMBED_COLOR;
use slice_utils::parse::{parse_flag, parse_id_list};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let log_dir = env_bool("LOG_TO_FILE", true).then(|| {
        PathBuf::from(env::var("LOG_DIR").unwrap_or_else(|_| logging::DEFAULT_LOG_DIR.to_owned()))
    });
    logging::init(log_dir.as_deref());

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    let token = match env::var("DISCORD_TOKEN") {
        Ok(token) if !token.trim().is_empty() => token,
        _ => {
            error!("DISCORD_TOKEN is missing; refusing to start.");
            anyhow::bail!("DISCORD_TOKEN is not set");
        }
    };
    let dev_guild_id = env_u64_opt("DISCORD_GUILD_ID").map(serenity::GuildId::new);
    let prefix = env::var("COMMAND_PREFIX")
        .ok()
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_owned());

    let registry = select_registry().await;

    let settings = Settings {
        alt_enabled: env_bool("ALT_ENABLED", false),
        alt_cooldown: Duration::from_secs(env_u64(
            "ALT_COOLDOWN_SECONDS",
            DEFAULT_ALT_COOLDOWN.as_secs(),
        )),
    };

    let alt = match AltService::from_env_optional() {
        Ok(Some(service)) => {
            info!(url = service.url(), enabled = settings.alt_enabled, "Alt provider configured.");
            Some(service)
        }
        Ok(None) => {
            info!("Alt provider disabled (ALT_API_KEY is not set).");
            None
        }
        Err(err) => {
            warn!(?err, "Failed to initialize alt provider; alt lookups are unavailable.");
            None
        }
    };

    let blacklist: HashSet<u64> = env::var("GUILD_BLACKLIST")
        .map(|raw| parse_id_list(&raw))
        .unwrap_or_default();
    info!(count = blacklist.len(), "Guild blacklist loaded.");

    let data = Data::new(registry, settings, alt, blacklist, prefix);

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MEMBERS
        | serenity::GatewayIntents::GUILD_MODERATION
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: slice_commands::commands(),
            event_handler: |ctx, event, framework, data| {
                Box::pin(handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            post_command: |ctx| Box::pin(async move { logging::log_command_usage(ctx, true) }),
            command_check: Some(|ctx| {
                Box::pin(async move {
                    match ctx.guild_id() {
                        Some(guild_id) => Ok(!ctx.data().is_blacklisted(guild_id.get()).await),
                        None => Ok(true),
                    }
                })
            }),
            prefix_options: poise::PrefixFrameworkOptions {
                dynamic_prefix: Some(|ctx| {
                    Box::pin(async move { Ok(Some(ctx.data.current_prefix().await)) })
                }),
                mention_as_prefix: false,
                ..Default::default()
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!(user = %ready.user.name, guilds = ready.guilds.len(), "Slice is online.");

                match dev_guild_id {
                    Some(guild_id) => {
                        poise::builtins::register_in_guild(
                            ctx,
                            &framework.options().commands,
                            guild_id,
                        )
                        .await?;
                        info!(guild_id = guild_id.get(), "Commands registered in guild.");
                    }
                    None => {
                        poise::builtins::register_globally(ctx, &framework.options().commands)
                            .await?;
                        info!("Commands registered globally.");
                    }
                }

                ctx.set_presence(
                    Some(serenity::ActivityData::watching("for rule violations")),
                    serenity::OnlineStatus::Online,
                );

                Ok(data)
            })
        })
        .build();

    info!("Slice is connecting...");

    let mut client = match serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await
    {
        Ok(client) => client,
        Err(err) => {
            error!(?err, "Failed to build Discord client.");
            return Err(err.into());
        }
    };

    if let Err(err) = client.start().await {
        error!(?err, "Discord client stopped with an error.");
        return Err(err.into());
    }
    Ok(())
}

/// Pick the registry backend once. A broken Redis setup falls back to memory.
async fn select_registry() -> RegistryStore {
    let redis_enabled = env_bool("REDIS_ENABLED", false);
    let key_prefix =
        env::var("REDIS_KEY_PREFIX").unwrap_or_else(|_| DEFAULT_KEY_PREFIX.to_string());

    if !redis_enabled {
        info!("Redis registry disabled (set REDIS_ENABLED=true to persist whitelists).");
        return RegistryStore::memory(key_prefix);
    }

    let Ok(redis_url) = env::var("REDIS_URL") else {
        warn!(key_prefix = %key_prefix, "REDIS_ENABLED=true but REDIS_URL is missing; using in-memory registry.");
        return RegistryStore::memory(key_prefix);
    };

    let store = match RegistryStore::redis(&redis_url, key_prefix.clone()) {
        Ok(store) => store,
        Err(err) => {
            warn!(?err, key_prefix = %key_prefix, "Failed to initialize Redis registry; using in-memory registry.");
            return RegistryStore::memory(key_prefix);
        }
    };

    match store.ping().await {
        Ok(()) => {
            info!(key_prefix = %key_prefix, "Redis registry enabled.");
            store
        }
        Err(err) => {
            warn!(?err, key_prefix = %key_prefix, "Redis registry ping failed; using in-memory registry.");
            RegistryStore::memory(key_prefix)
        }
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(value) => parse_flag(&value),
        Err(_) => default,
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(value) => value.trim().parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}

fn env_u64_opt(key: &str) -> Option<u64> {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|value| *value > 0)
}

async fn reply_ephemeral(ctx: poise::Context<'_, Data, Error>, text: &str) {
    let _ = ctx
        .send(poise::CreateReply::default().content(text).ephemeral(true))
        .await;
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(?error, command = %ctx.command().name, "command error");
            logging::log_command_usage(ctx, false);

            let embed = serenity::CreateEmbed::new()
                .title("Command Error")
                .description("Something went wrong while running this command.")
                .color(DEFAULT_EMBED_COLOR);

            let _ = ctx
                .send(poise::CreateReply::default().ephemeral(true).embed(embed))
                .await;
        }
        poise::FrameworkError::ArgumentParse { ctx, input, .. } => {
            logging::log_command_usage(ctx, false);
            let name = ctx.command().name.as_str();
            let usage = slice_commands::COMMANDS
                .iter()
                .find(|meta| meta.name == name)
                .map_or_else(|| format!("!{}", name), |meta| meta.usage.to_owned());
            let description = if let Some(input) = input {
                format!("Invalid argument: `{}`\nUsage: `{}`", input, usage)
            } else {
                format!("Missing required argument.\nUsage: `{}`", usage)
            };

            let _ = ctx.say(description).await;
        }
        poise::FrameworkError::CommandCheckFailed { ctx, .. } => {
            debug!(command = %ctx.command().name, "command blocked by check");
            reply_ephemeral(ctx, "This bot isn't available in this server.").await;
        }
        poise::FrameworkError::NotAnOwner { ctx, .. } => {
            reply_ephemeral(ctx, "Only the bot owners can use this command.").await;
        }
        poise::FrameworkError::GuildOnly { ctx, .. } => {
            reply_ephemeral(ctx, "This command only works in servers.").await;
        }
        poise::FrameworkError::UnknownCommand { .. } => {
            debug!("unknown command invocation");
        }
        other => {
            error!(?other, "framework error");
        }
    }
}

async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    match event {
        serenity::FullEvent::Message { new_message } => {
            events::snipe::handle_message_create_snipe(data, new_message);
        }
        serenity::FullEvent::MessageDelete {
            channel_id,
            deleted_message_id,
            guild_id: Some(_),
        } => {
            events::snipe::handle_message_delete_snipe(data, *channel_id, *deleted_message_id);
        }
        serenity::FullEvent::MessageDeleteBulk {
            channel_id,
            multiple_deleted_messages_ids,
            guild_id: Some(_),
        } => {
            for message_id in multiple_deleted_messages_ids {
                events::snipe::handle_message_delete_snipe(data, *channel_id, *message_id);
            }
        }
        serenity::FullEvent::GuildCreate { guild, is_new } => {
            events::guild::handle_guild_create_log(guild, *is_new);
            events::guild::handle_guild_create_blacklist(ctx, data, guild).await;
        }
        serenity::FullEvent::GuildDelete { incomplete, full } => {
            events::guild::handle_guild_delete_log(incomplete, full.as_ref());
        }
        _ => {}
    }

    Ok(())
}
