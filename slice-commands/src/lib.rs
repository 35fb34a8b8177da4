pub mod admin;
pub mod checks;
pub mod moderation;
pub mod owner;
pub mod utility;

use slice_core::{Data, Error};

pub struct CommandMeta {
    pub name: &'static str,
    pub desc: &'static str,
    pub category: &'static str,
    pub usage: &'static str,
}

pub const COMMANDS: &[CommandMeta] = &[
    utility::ping::META,
    utility::userinfo::META,
    utility::avatar::META,
    utility::serverinfo::META,
    utility::roleinfo::META,
    utility::uptime::META,
    utility::help::META,
    utility::usage::META,
    moderation::kick::META,
    moderation::ban::META,
    moderation::unban::META,
    moderation::timeout::META,
    moderation::untimeout::META,
    admin::say::META,
    admin::announce::META,
    admin::clear::META,
    admin::snipe::META,
    admin::dm::META,
    admin::setprefix::META,
    admin::modroles::ADDMOD_META,
    admin::modroles::REMOVEMOD_META,
    admin::modroles::LISTMODS_META,
    admin::altwhitelist::ALTWHITELIST_META,
    admin::altwhitelist::ALTUNWHITELIST_META,
    admin::altwhitelist::ALTWHITELISTED_META,
    admin::altrolewhitelist::ALTROLEWHITELIST_META,
    admin::altrolewhitelist::ALTROLEUNWHITELIST_META,
    admin::altrolewhitelist::ALTROLEWHITELISTED_META,
    admin::alt::META,
    owner::sync::META,
    owner::forceleave::META,
    owner::reloadblacklist::META,
];

pub fn commands() -> Vec<poise::Command<Data, Error>> {
    vec![
        utility::ping::ping(),
        utility::userinfo::userinfo(),
        utility::avatar::avatar(),
        utility::serverinfo::serverinfo(),
        utility::roleinfo::roleinfo(),
        utility::uptime::uptime(),
        utility::help::help(),
        utility::usage::usage(),
        moderation::kick::kick(),
        moderation::ban::ban(),
        moderation::unban::unban(),
        moderation::timeout::timeout(),
        moderation::untimeout::untimeout(),
        admin::say::say(),
        admin::announce::announce(),
        admin::clear::clear(),
        admin::snipe::snipe(),
        admin::dm::dm(),
        admin::setprefix::setprefix(),
        admin::modroles::addmod(),
        admin::modroles::removemod(),
        admin::modroles::listmods(),
        admin::altwhitelist::altwhitelist(),
        admin::altwhitelist::altunwhitelist(),
        admin::altwhitelist::altwhitelisted(),
        admin::altrolewhitelist::altrolewhitelist(),
        admin::altrolewhitelist::altroleunwhitelist(),
        admin::altrolewhitelist::altrolewhitelisted(),
        admin::alt::alt(),
        owner::sync::sync(),
        owner::forceleave::forceleave(),
        owner::reloadblacklist::reloadblacklist(),
    ]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn every_command_has_metadata() {
        let registered: HashSet<String> = commands().into_iter().map(|cmd| cmd.name).collect();
        let described: HashSet<String> = COMMANDS.iter().map(|meta| meta.name.to_owned()).collect();

        assert_eq!(registered, described);
        assert_eq!(described.len(), COMMANDS.len());
    }

    #[test]
    fn usage_strings_start_with_command_name() {
        for meta in COMMANDS {
            assert!(
                meta.usage.starts_with(&format!("!{}", meta.name)),
                "{} has usage {}",
                meta.name,
                meta.usage
            );
        }
    }
}
