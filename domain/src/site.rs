use crate::ports::discord::{CreateActionRow, CreateButton, CreateEmbed, CreateMessage};
use domain_shared::discord::UserId;
use tracing::instrument;

pub const SITE_LEFT_BUTTON_ID: &str = "site_left";
pub const SITE_RIGHT_BUTTON_ID: &str = "site_right";

const ENTRIES_PER_PAGE: usize = 10;
const SITE_COLOR: u32 = 0x5865F2;

/// A paged embed only its owner may flip through.
#[derive(Debug, Clone)]
pub struct Site {
    pages: Vec<CreateEmbed>,
    owner: UserId,
    index: usize,
}

impl Site {
    /// `None` for an empty page list.
    pub fn new(pages: Vec<CreateEmbed>, owner: UserId) -> Option<Self> {
        if pages.is_empty() {
            return None;
        }
        Some(Self {
            pages,
            owner,
            index: 0,
        })
    }

    pub fn owner(&self) -> UserId {
        self.owner
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn current(&self) -> &CreateEmbed {
        &self.pages[self.index]
    }

    #[instrument(level = "trace", skip(self))]
    pub fn move_left(&mut self) -> &CreateEmbed {
        self.index = (self.index + self.pages.len() - 1) % self.pages.len();
        self.current()
    }

    #[instrument(level = "trace", skip(self))]
    pub fn move_right(&mut self) -> &CreateEmbed {
        self.index = (self.index + 1) % self.pages.len();
        self.current()
    }

    /// The message showing the current page, with paging buttons when there is more than one.
    pub fn message(&self) -> CreateMessage {
        let message = CreateMessage::default().embed(self.current().clone());
        if self.pages.len() < 2 {
            return message;
        }

        message.action_row(CreateActionRow::buttons(vec![
            CreateButton::new("◀", SITE_LEFT_BUTTON_ID),
            CreateButton::new("▶", SITE_RIGHT_BUTTON_ID),
        ]))
    }
}

/// Numbered listing split into pages of ten entries.
pub fn paginate(title: &str, entries: &[String]) -> Vec<CreateEmbed> {
    let chunks: Vec<_> = entries.chunks(ENTRIES_PER_PAGE).collect();
    let total = chunks.len();

    chunks
        .into_iter()
        .enumerate()
        .map(|(page, chunk)| {
            let description = chunk
                .iter()
                .enumerate()
                .map(|(offset, entry)| format!("`{}` {}", page * ENTRIES_PER_PAGE + offset, entry))
                .collect::<Vec<_>>()
                .join("\n");

            CreateEmbed::default()
                .title(title)
                .description(description)
                .color(SITE_COLOR)
                .footer(format!("Page {}/{}", page + 1, total))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(count: usize) -> Vec<CreateEmbed> {
        (0..count)
            .map(|i| CreateEmbed::default().title(i.to_string()))
            .collect()
    }

    #[test]
    fn moving_wraps_around() {
        let mut site = Site::new(pages(3), UserId(1)).unwrap();

        assert_eq!(site.move_left().title.as_deref(), Some("2"));
        assert_eq!(site.move_right().title.as_deref(), Some("0"));
        assert_eq!(site.move_right().title.as_deref(), Some("1"));
    }

    #[test]
    fn empty_site_is_not_created() {
        assert!(Site::new(vec![], UserId(1)).is_none());
    }

    #[test]
    fn single_page_has_no_buttons() {
        let site = Site::new(pages(1), UserId(1)).unwrap();

        assert!(site.message().action_rows.is_empty());
    }

    #[test]
    fn paginate_numbers_entries_across_pages() {
        let entries: Vec<String> = (0..12).map(|i| format!("entry {i}")).collect();

        let pages = paginate("Blacklist", &entries);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1].footer.as_deref(), Some("Page 2/2"));
        assert_eq!(
            pages[1].description.as_deref(),
            Some("`10` entry 10\n`11` entry 11")
        );
    }
}
