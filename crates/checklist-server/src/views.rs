//! HTML rendering.
//!
//! Every index placed in a template is a storage position from
//! [`sorted_for_display`], so action URLs keep pointing at the right entry
//! even though completed entries are drawn last.

use checklist_core::display::sorted_for_display;
use checklist_core::lists::{List, ListCollection};
use checklist_store::Flash;
use minijinja::{context, Environment, UndefinedBehavior};
use serde::Serialize;

const TEMPLATES: &[(&str, &str)] = &[
    ("layout.html", include_str!("../templates/layout.html")),
    ("lists.html", include_str!("../templates/lists.html")),
    ("new_list.html", include_str!("../templates/new_list.html")),
    ("list.html", include_str!("../templates/list.html")),
    ("edit_list.html", include_str!("../templates/edit_list.html")),
];

#[derive(Debug, Serialize)]
struct ListSummary<'a> {
    index: usize,
    name: &'a str,
    remaining: usize,
    total: usize,
    complete: bool,
}

impl<'a> ListSummary<'a> {
    fn new(list: &'a List, index: usize) -> Self {
        Self {
            index,
            name: &list.name,
            remaining: list.remaining_count(),
            total: list.todos.len(),
            complete: list.is_complete(),
        }
    }
}

#[derive(Debug, Serialize)]
struct TodoRow<'a> {
    position: usize,
    id: u64,
    name: &'a str,
    completed: bool,
}

/// Compiled template set.
pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        for &(name, source) in TEMPLATES {
            env.add_template(name, source)?;
        }
        Ok(Self { env })
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> Result<String, minijinja::Error> {
        self.env.get_template(name)?.render(ctx)
    }

    /// All lists, incomplete first.
    pub fn lists_page(&self, lists: &ListCollection, flash: &Flash) -> Result<String, minijinja::Error> {
        let summaries: Vec<ListSummary<'_>> = sorted_for_display(lists.as_slice(), List::is_complete)
            .into_iter()
            .map(|(list, index)| ListSummary::new(list, index))
            .collect();
        self.render("lists.html", context! { flash => flash, lists => summaries })
    }

    pub fn new_list_page(&self, flash: &Flash, submitted: &str) -> Result<String, minijinja::Error> {
        self.render("new_list.html", context! { flash => flash, submitted => submitted })
    }

    /// One list with its todos, incomplete first.
    pub fn list_page(
        &self,
        index: usize,
        list: &List,
        flash: &Flash,
        submitted: &str,
    ) -> Result<String, minijinja::Error> {
        let todos: Vec<TodoRow<'_>> = sorted_for_display(&list.todos, |todo| todo.completed)
            .into_iter()
            .map(|(todo, position)| TodoRow {
                position,
                id: todo.id,
                name: &todo.name,
                completed: todo.completed,
            })
            .collect();
        self.render(
            "list.html",
            context! {
                flash => flash,
                list => ListSummary::new(list, index),
                todos => todos,
                submitted => submitted,
            },
        )
    }

    pub fn edit_list_page(
        &self,
        index: usize,
        list: &List,
        flash: &Flash,
        submitted: &str,
    ) -> Result<String, minijinja::Error> {
        self.render(
            "edit_list.html",
            context! {
                flash => flash,
                list => ListSummary::new(list, index),
                submitted => submitted,
            },
        )
    }
}
