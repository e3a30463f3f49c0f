//! Catalog of the toolkit's component kinds.
//!
//! Each kind knows its component name (the directory its resources live
//! in), its component group, and the typography step its text uses. Widget
//! constructors go through [`StyleKind::apply`] so registration and style
//! application stay in one place.

use std::sync::Arc;

use lumen_tokens::Value;

use crate::config::CONTROLS_GROUP;
use crate::manager::ThemeManager;
use crate::typography::TypographyStyle;
use crate::widget::Styleable;
use crate::ThemeError;

#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum StyleKind {
    Button,
    CheckBox,
    HyperlinkButton,
    ListBox,
    PasswordBox,
    RadioButton,
    RepeatButton,
    RichTextBlock,
    TextBlock,
    TextBox,
    ToggleButton,
    ToolButton,
}

impl StyleKind {
    pub const ALL: [StyleKind; 12] = [
        StyleKind::Button,
        StyleKind::CheckBox,
        StyleKind::HyperlinkButton,
        StyleKind::ListBox,
        StyleKind::PasswordBox,
        StyleKind::RadioButton,
        StyleKind::RepeatButton,
        StyleKind::RichTextBlock,
        StyleKind::TextBlock,
        StyleKind::TextBox,
        StyleKind::ToggleButton,
        StyleKind::ToolButton,
    ];

    /// The component name, as used in resource paths.
    pub fn name(self) -> &'static str {
        match self {
            StyleKind::Button => "button",
            StyleKind::CheckBox => "check_box",
            StyleKind::HyperlinkButton => "hyperlink_button",
            StyleKind::ListBox => "list_box",
            StyleKind::PasswordBox => "password_box",
            StyleKind::RadioButton => "radio_button",
            StyleKind::RepeatButton => "repeat_button",
            StyleKind::RichTextBlock => "richtext_block",
            StyleKind::TextBlock => "text_block",
            StyleKind::TextBox => "text_box",
            StyleKind::ToggleButton => "toggle_button",
            StyleKind::ToolButton => "tool_button",
        }
    }

    /// The component group the kind's resources live under.
    pub fn group(self) -> &'static str {
        CONTROLS_GROUP
    }

    /// The typography step for this kind's text. The stock controls all
    /// read at body size.
    pub fn typography(self) -> TypographyStyle {
        TypographyStyle::Body
    }

    /// Register `widget` under this kind and apply its stylesheet.
    pub fn apply(
        self,
        manager: &ThemeManager,
        widget: &Arc<dyn Styleable>,
    ) -> Result<(), ThemeError> {
        manager.register(widget, self.group(), self.name())
    }

    /// A resolved token value for this kind.
    pub fn resolved_value(self, manager: &ThemeManager, name: &str) -> Result<Value, ThemeError> {
        manager.resolved_value(name, self.group(), self.name())
    }
}
