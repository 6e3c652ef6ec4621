use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Show this list")]
    Help,

    #[command(description = "Start or open the home menu")]
    Start,

    #[command(description = "Cancel profile creation")]
    Cancel,
}
