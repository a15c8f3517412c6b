use platey_core::UserId;

/// One inbound event from the transport: a user pressed a menu button
/// or typed free text. What the text *means* is decided by the
/// dispatcher from the user's session mode, not here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InboundUpdate {
    pub update_id: u64,
    pub user: UserId,
    pub input: UserInput,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UserInput {
    Text(String),
    Menu(MenuCommand),
}

/// The fixed command surface. Every button maps 1:1 onto a session
/// transition; categories come from configuration, not from code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuCommand {
    MainMenu,
    Browse { category: String },
    NextPage,
    SearchByDigits,
    SearchByLetters,
    ReturnToMenu,
}

/// Parses a callback-data token into its command. Unknown tokens yield
/// `None`; the caller logs and drops them instead of guessing.
pub fn parse_menu_token(token: &str) -> Option<MenuCommand> {
    let token = token.trim();

    if let Some(category) = token.strip_prefix("browse:") {
        if category.is_empty() {
            return None;
        }
        return Some(MenuCommand::Browse { category: category.to_owned() });
    }

    match token {
        "menu" => Some(MenuCommand::MainMenu),
        "next" => Some(MenuCommand::NextPage),
        "digits" => Some(MenuCommand::SearchByDigits),
        "letters" => Some(MenuCommand::SearchByLetters),
        "back" => Some(MenuCommand::ReturnToMenu),
        _ => None,
    }
}

/// Inverse of `parse_menu_token`, used when building keyboards.
pub fn menu_token(command: &MenuCommand) -> String {
    match command {
        MenuCommand::MainMenu => "menu".to_owned(),
        MenuCommand::Browse { category } => format!("browse:{category}"),
        MenuCommand::NextPage => "next".to_owned(),
        MenuCommand::SearchByDigits => "digits".to_owned(),
        MenuCommand::SearchByLetters => "letters".to_owned(),
        MenuCommand::ReturnToMenu => "back".to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::{menu_token, parse_menu_token, MenuCommand};

    #[test]
    fn tokens_round_trip_through_parse_and_render() {
        let commands = [
            MenuCommand::MainMenu,
            MenuCommand::Browse { category: "moto".to_owned() },
            MenuCommand::NextPage,
            MenuCommand::SearchByDigits,
            MenuCommand::SearchByLetters,
            MenuCommand::ReturnToMenu,
        ];

        for command in commands {
            let token = menu_token(&command);
            assert_eq!(parse_menu_token(&token), Some(command), "token {token:?}");
        }
    }

    #[test]
    fn unknown_and_empty_tokens_are_rejected() {
        assert_eq!(parse_menu_token("show_moto"), None);
        assert_eq!(parse_menu_token("browse:"), None);
        assert_eq!(parse_menu_token(""), None);
    }

    #[test]
    fn tokens_are_trimmed_before_parsing() {
        assert_eq!(parse_menu_token(" next "), Some(MenuCommand::NextPage));
    }
}
