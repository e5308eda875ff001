#![forbid(unsafe_code)]

//! Generic editor for tagged-variant trees (and JSON).
//!
//! A [`TreeItem`] is a leaf text value, an enumerated choice, an ordered
//! list, or a keyed map. The editor dispatches on the variant: leaves
//! open an [`InputPanel`], choices a pick list, and containers a
//! [`ScrollingPanel`] whose rows are rebuilt after every accepted edit.
//! Everything reuses the standard widget contracts; there is no
//! tree-specific rendering.

use serde_json::Value;

use shoji_core::error::Error;
use shoji_core::keys::Key;
use shoji_render::screen::Screen;

use crate::input::InputPanel;
use crate::scrolling::ScrollingPanel;

/// An editable node.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeItem {
    /// Free-form text leaf.
    Text(String),
    /// One value out of a fixed set.
    Choice {
        value: String,
        choices: Vec<String>,
    },
    /// Ordered children, labeled by index.
    List(Vec<TreeItem>),
    /// Keyed children, labeled by key.
    Map(Vec<(String, TreeItem)>),
}

impl TreeItem {
    /// Short display form used in container listings.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            TreeItem::Text(value) => value.clone(),
            TreeItem::Choice { value, .. } => value.clone(),
            TreeItem::List(_) => "[ ... ]".to_owned(),
            TreeItem::Map(_) => "{ ... }".to_owned(),
        }
    }

    /// Clear a leaf's value; containers are untouched.
    ///
    /// Returns whether anything changed.
    fn clear(&mut self) -> bool {
        match self {
            TreeItem::Text(value) | TreeItem::Choice { value, .. } => {
                let changed = !value.is_empty();
                value.clear();
                changed
            }
            TreeItem::List(_) | TreeItem::Map(_) => false,
        }
    }
}

/// Edit one item modally. Returns whether the tree changed.
pub fn edit_item(screen: &Screen, item: &mut TreeItem, prompt: &str) -> Result<bool, Error> {
    match item {
        TreeItem::Text(value) => edit_text(screen, value, prompt),
        TreeItem::Choice { value, choices } => edit_choice(screen, value, choices),
        TreeItem::List(children) => {
            let labels: Vec<String> = (0..children.len()).map(|i| i.to_string()).collect();
            edit_container(screen, children, &labels)
        }
        TreeItem::Map(entries) => {
            let labels: Vec<String> = entries.iter().map(|(k, _)| k.clone()).collect();
            let mut children: Vec<&mut TreeItem> =
                entries.iter_mut().map(|(_, v)| v).collect();
            edit_children(screen, &mut children, &labels)
        }
    }
}

fn edit_text(screen: &Screen, value: &mut String, prompt: &str) -> Result<bool, Error> {
    let mut input = InputPanel::new(screen, prompt, value.clone());
    match input.run()? {
        Some(new_value) => {
            let changed = *value != new_value;
            *value = new_value;
            Ok(changed)
        }
        None => Ok(false),
    }
}

fn edit_choice(screen: &Screen, value: &mut String, choices: &[String]) -> Result<bool, Error> {
    let current = choices.iter().position(|c| c == value).unwrap_or(0);
    let mut panel =
        ScrollingPanel::new(screen, choices.to_vec()).with_hilighted_row(Some(current));
    match panel.pick_a_line_or_cancel()? {
        Some(index) => {
            let changed = *value != choices[index];
            value.clone_from(&choices[index]);
            Ok(changed)
        }
        None => Ok(false),
    }
}

fn edit_container(
    screen: &Screen,
    children: &mut [TreeItem],
    labels: &[String],
) -> Result<bool, Error> {
    let mut refs: Vec<&mut TreeItem> = children.iter_mut().collect();
    edit_children(screen, &mut refs, labels)
}

/// Shared list/map editing loop.
///
/// Enter edits the highlighted child (recursing into containers);
/// Backspace/Delete clears a leaf; Escape returns to the parent level.
fn edit_children(
    screen: &Screen,
    children: &mut [&mut TreeItem],
    labels: &[String],
) -> Result<bool, Error> {
    if children.is_empty() {
        return Ok(false);
    }
    let stop_keys = [Key::Escape, Key::Enter, Key::Backspace, Key::Delete];
    let mut changed = false;
    let mut panel = ScrollingPanel::new(screen, container_rows(children, labels));
    loop {
        let result = panel.run(&stop_keys)?;
        match result.key {
            Key::Escape => {
                panel.hide()?;
                return Ok(changed);
            }
            Key::Backspace | Key::Delete => {
                if children[result.row].clear() {
                    changed = true;
                    panel.set_rows_keeping(container_rows(children, labels), result.row);
                }
            }
            Key::Enter => {
                let prompt = format!("{}: ", labels[result.row]);
                if edit_item(screen, &mut *children[result.row], &prompt)? {
                    changed = true;
                    panel.set_rows_keeping(container_rows(children, labels), result.row);
                }
            }
            _ => {}
        }
    }
}

fn container_rows(children: &[&mut TreeItem], labels: &[String]) -> Vec<String> {
    children
        .iter()
        .zip(labels)
        .map(|(child, label)| format!("{label}: {}", child.summary()))
        .collect()
}

/// Build an editable tree from JSON. Scalars become text leaves.
#[must_use]
pub fn from_json(value: &Value) -> TreeItem {
    match value {
        Value::Null => TreeItem::Text(String::new()),
        Value::Bool(b) => TreeItem::Choice {
            value: b.to_string(),
            choices: vec!["true".to_owned(), "false".to_owned()],
        },
        Value::Number(n) => TreeItem::Text(n.to_string()),
        Value::String(s) => TreeItem::Text(s.clone()),
        Value::Array(items) => TreeItem::List(items.iter().map(from_json).collect()),
        Value::Object(entries) => TreeItem::Map(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), from_json(v)))
                .collect(),
        ),
    }
}

/// Convert an edited tree back to JSON.
///
/// Text leaves that parse as numbers or booleans become JSON numbers and
/// booleans again; empty text becomes null. Everything else stays a
/// string.
#[must_use]
pub fn to_json(item: &TreeItem) -> Value {
    match item {
        TreeItem::Text(value) => scalar_to_json(value),
        TreeItem::Choice { value, .. } => scalar_to_json(value),
        TreeItem::List(children) => Value::Array(children.iter().map(to_json).collect()),
        TreeItem::Map(entries) => Value::Object(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), to_json(v)))
                .collect(),
        ),
    }
}

fn scalar_to_json(text: &str) -> Value {
    if text.is_empty() {
        return Value::Null;
    }
    if text == "true" || text == "false" {
        return Value::Bool(text == "true");
    }
    if let Ok(n) = text.parse::<i64>() {
        return Value::Number(n.into());
    }
    if let Ok(f) = text.parse::<f64>()
        && let Some(n) = serde_json::Number::from_f64(f)
    {
        return Value::Number(n);
    }
    Value::String(text.to_owned())
}

/// Edit a JSON value in place. Returns whether it changed.
pub fn edit_json(screen: &Screen, value: &mut Value) -> Result<bool, Error> {
    let mut tree = from_json(value);
    let changed = edit_item(screen, &mut tree, "")?;
    if changed {
        *value = to_json(&tree);
    }
    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shoji_render::backend::{TestBackend, TestProbe};

    fn screen() -> (Screen, TestProbe) {
        let (backend, probe) = TestBackend::new(80, 24);
        (Screen::new(Box::new(backend)).unwrap(), probe)
    }

    #[test]
    fn json_round_trips_through_the_tree() {
        let value = json!({
            "title": "The Movie",
            "year": 1987,
            "rating": 7.5,
            "seen": true,
            "genres": ["drama", "crime"],
        });
        let tree = from_json(&value);
        assert_eq!(to_json(&tree), value);
    }

    #[test]
    fn summaries_abbreviate_containers() {
        let tree = from_json(&json!({"a": [1, 2], "b": "x"}));
        let TreeItem::Map(entries) = &tree else {
            panic!("expected a map");
        };
        assert_eq!(entries[0].1.summary(), "[ ... ]");
        assert_eq!(entries[1].1.summary(), "x");
    }

    #[test]
    fn editing_a_text_leaf_through_the_input_panel() {
        let (screen, probe) = screen();
        let mut item = TreeItem::Text("old".to_owned());
        probe.push_keys(&[
            Key::End,
            Key::Backspace,
            Key::Backspace,
            Key::Backspace,
            Key::Char('n'),
            Key::Char('e'),
            Key::Char('w'),
            Key::Enter,
        ]);
        assert!(edit_item(&screen, &mut item, "value: ").unwrap());
        assert_eq!(item, TreeItem::Text("new".to_owned()));
    }

    #[test]
    fn cancelling_a_leaf_edit_changes_nothing() {
        let (screen, probe) = screen();
        let mut item = TreeItem::Text("keep".to_owned());
        probe.push_keys(&[Key::Char('x'), Key::Escape]);
        assert!(!edit_item(&screen, &mut item, "").unwrap());
        assert_eq!(item, TreeItem::Text("keep".to_owned()));
    }

    #[test]
    fn choice_editing_picks_from_the_list() {
        let (screen, probe) = screen();
        let mut item = TreeItem::Choice {
            value: "false".to_owned(),
            choices: vec!["true".to_owned(), "false".to_owned()],
        };
        // Highlight starts on "false" (index 1); move up and confirm.
        probe.push_keys(&[Key::Up, Key::Enter]);
        assert!(edit_item(&screen, &mut item, "").unwrap());
        let TreeItem::Choice { value, .. } = &item else {
            panic!("expected a choice");
        };
        assert_eq!(value, "true");
    }

    #[test]
    fn list_editing_recurses_into_a_child() {
        let (screen, probe) = screen();
        let mut item = TreeItem::List(vec![
            TreeItem::Text("first".to_owned()),
            TreeItem::Text("second".to_owned()),
        ]);
        probe.push_keys(&[
            // Select child 1 and open it.
            Key::Down,
            Key::Enter,
            // Append "!" in the input panel and commit.
            Key::End,
            Key::Char('!'),
            Key::Enter,
            // Leave the list editor.
            Key::Escape,
        ]);
        assert!(edit_item(&screen, &mut item, "").unwrap());
        let TreeItem::List(children) = &item else {
            panic!("expected a list");
        };
        assert_eq!(children[1], TreeItem::Text("second!".to_owned()));
    }

    #[test]
    fn delete_clears_a_leaf_inside_a_map() {
        let (screen, probe) = screen();
        let mut item = TreeItem::Map(vec![
            ("title".to_owned(), TreeItem::Text("Heat".to_owned())),
            ("plot".to_owned(), TreeItem::Text("robbery".to_owned())),
        ]);
        probe.push_keys(&[Key::Down, Key::Delete, Key::Escape]);
        assert!(edit_item(&screen, &mut item, "").unwrap());
        let TreeItem::Map(entries) = &item else {
            panic!("expected a map");
        };
        assert_eq!(entries[1].1, TreeItem::Text(String::new()));
    }

    #[test]
    fn edit_json_applies_changes() {
        let (screen, probe) = screen();
        let mut value = json!({"year": "1987"});
        probe.push_keys(&[
            // Open the single entry.
            Key::Enter,
            // Replace "1987" with "1995".
            Key::End,
            Key::Backspace,
            Key::Backspace,
            Key::Char('9'),
            Key::Char('5'),
            Key::Enter,
            Key::Escape,
        ]);
        assert!(edit_json(&screen, &mut value).unwrap());
        assert_eq!(value, json!({"year": 1995}));
    }
}
