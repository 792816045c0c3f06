//! Narration queue builder.
//!
//! Screens describe their readable text as a [`ScreenContent`] in reading
//! order (title → labels → question → options → action button). The builder
//! turns that into a [`NarrationQueue`]. It is a pure function of the content:
//! the same content always yields the same unit list, so rebuilding is
//! idempotent.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::unit::{NarrationQueue, NarrationUnit};

/// Role of a text element on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Title,
    Label,
    Question,
    Option,
    Action,
    Other,
}

/// One readable element of a screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenItem {
    pub id: String,
    pub text: String,
    pub kind: ItemKind,
}

/// The readable text of one screen, in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenContent {
    items: Vec<ScreenItem>,
}

impl ScreenContent {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element of any kind.
    #[must_use]
    pub fn item(mut self, kind: ItemKind, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.items.push(ScreenItem {
            id: id.into(),
            text: text.into(),
            kind,
        });
        self
    }

    #[must_use]
    pub fn title(self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.item(ItemKind::Title, id, text)
    }

    #[must_use]
    pub fn label(self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.item(ItemKind::Label, id, text)
    }

    #[must_use]
    pub fn question(self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.item(ItemKind::Question, id, text)
    }

    #[must_use]
    pub fn option(self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.item(ItemKind::Option, id, text)
    }

    /// Append a list of options with ids `{prefix}-{index}`.
    #[must_use]
    pub fn options<I, S>(mut self, prefix: &str, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for (index, text) in options.into_iter().enumerate() {
            self = self.option(format!("{prefix}-{index}"), text);
        }
        self
    }

    #[must_use]
    pub fn action(self, id: impl Into<String>, text: impl Into<String>) -> Self {
        self.item(ItemKind::Action, id, text)
    }

    #[must_use]
    pub fn items(&self) -> &[ScreenItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up the text shown for an element id.
    #[must_use]
    pub fn text_of(&self, id: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|item| item.id == id)
            .map(|item| item.text.as_str())
    }
}

/// Build the narration queue for a screen.
///
/// Blank elements are not narrated. When an id repeats, the first element
/// wins: the audio cache is keyed by id, so a second unit with the same id
/// would otherwise replay the first one's audio.
#[must_use]
pub fn build_queue(content: &ScreenContent) -> NarrationQueue {
    let mut seen = HashSet::new();

    content
        .items
        .iter()
        .filter(|item| !item.text.trim().is_empty())
        .filter(|item| {
            let first = seen.insert(item.id.as_str());
            if !first {
                tracing::warn!(id = %item.id, "Duplicate narration id, keeping first occurrence");
            }
            first
        })
        .map(|item| NarrationUnit::new(item.id.clone(), item.text.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_content_yields_empty_queue() {
        assert!(build_queue(&ScreenContent::new()).is_empty());
    }

    #[test]
    fn reading_order_is_insertion_order() {
        let content = ScreenContent::new()
            .title("app-title", "Dynamic Transitions")
            .label("name-label", "Student's Name")
            .question("question-text", "What do you enjoy?")
            .options("option", ["Art", "Music"])
            .action("start-button", "Start Survey");

        let queue = build_queue(&content);
        assert_eq!(
            queue.ids(),
            vec![
                "app-title",
                "name-label",
                "question-text",
                "option-0",
                "option-1",
                "start-button"
            ]
        );
    }

    #[test]
    fn same_content_builds_same_queue() {
        let content = ScreenContent::new()
            .question("question-text", "Pick one")
            .options("option", ["A", "B"]);
        assert_eq!(build_queue(&content), build_queue(&content.clone()));
    }

    #[test]
    fn blank_items_are_skipped() {
        let content = ScreenContent::new()
            .label("empty", "   ")
            .question("question-text", "Hello");
        assert_eq!(build_queue(&content).ids(), vec!["question-text"]);
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let content = ScreenContent::new()
            .option("option-0", "first")
            .option("option-0", "second");
        let queue = build_queue(&content);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.head().map(|u| u.text.as_str()), Some("first"));
    }

    #[test]
    fn text_lookup_by_id() {
        let content = ScreenContent::new().label("grade-label", "Grade");
        assert_eq!(content.text_of("grade-label"), Some("Grade"));
        assert_eq!(content.text_of("missing"), None);
    }
}
