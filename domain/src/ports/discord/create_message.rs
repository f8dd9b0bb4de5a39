use crate::ports::discord::{CreateActionRow, CreateEmbed};

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct CreateMessage {
    pub content: Option<String>,
    pub embeds: Vec<CreateEmbed>,
    pub action_rows: Vec<CreateActionRow>,
    /// Only honoured when answering an interaction.
    pub ephemeral: bool,
}

impl CreateMessage {
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn embed(mut self, embed: CreateEmbed) -> Self {
        self.embeds.push(embed);
        self
    }

    pub fn action_row(mut self, action_row: CreateActionRow) -> Self {
        self.action_rows.push(action_row);
        self
    }

    pub fn ephemeral(mut self, ephemeral: bool) -> Self {
        self.ephemeral = ephemeral;
        self
    }
}
