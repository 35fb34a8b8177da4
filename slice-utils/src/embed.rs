use poise::serenity_prelude as serenity;

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x2E_CC_71;
/// Announcements, DMs and informational lookups.
pub const INFO_EMBED_COLOR: u32 = 0x34_98_DB;
/// Sniped messages.
pub const SNIPE_EMBED_COLOR: u32 = 0xE6_7E_22;
/// Alt profile cards.
pub const ALT_EMBED_COLOR: u32 = 0x00_B2_FF;

/// Embed colour for a role or member colour, falling back when it is unset.
pub fn colour_or_default(colour: serenity::Colour) -> u32 {
    if colour.0 == 0 {
        INFO_EMBED_COLOR
    } else {
        colour.0
    }
}

/// Build a titled lookup embed with the "Requested by" footer.
pub fn lookup_embed(
    title: impl Into<String>,
    colour: u32,
    requester: &serenity::User,
) -> serenity::CreateEmbed {
    serenity::CreateEmbed::new()
        .title(title)
        .color(colour)
        .timestamp(serenity::Timestamp::now())
        .footer(requested_by_footer(requester))
}

pub fn requested_by_footer(requester: &serenity::User) -> serenity::CreateEmbedFooter {
    serenity::CreateEmbedFooter::new(format!("Requested by {}", display_name(requester)))
        .icon_url(requester.face())
}

/// Global display name, falling back to the account name.
pub fn display_name(user: &serenity::User) -> String {
    user.global_name.clone().unwrap_or_else(|| user.name.clone())
}

/// Neutralise mass mentions in user-provided text.
pub fn sanitize_mentions(text: &str) -> String {
    text.replace('@', "@\u{200B}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_colour_falls_back() {
        assert_eq!(colour_or_default(serenity::Colour(0)), INFO_EMBED_COLOR);
        assert_eq!(colour_or_default(serenity::Colour(0xFF_00_00)), 0xFF_00_00);
    }

    #[test]
    fn mentions_are_broken_up() {
        assert_eq!(sanitize_mentions("hi @everyone"), "hi @\u{200B}everyone");
    }
}
