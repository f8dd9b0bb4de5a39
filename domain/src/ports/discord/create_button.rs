#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateButton {
    pub label: String,
    pub data: ButtonKind,
}

impl CreateButton {
    pub fn new(label: impl Into<String>, button_id: impl Into<String>) -> Self {
        CreateButton {
            label: label.into(),
            data: ButtonKind::NonLink {
                button_id: ButtonId(button_id.into()),
            },
        }
    }

    pub fn new_link(label: impl Into<String>, url: impl Into<String>) -> Self {
        CreateButton {
            label: label.into(),
            data: ButtonKind::Link { url: url.into() },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonKind {
    NonLink { button_id: ButtonId },
    Link { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct ButtonId(pub String);
