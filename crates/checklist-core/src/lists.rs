//! Session-scoped lists and todos.
//!
//! Lists and todos are addressed by their position in storage order. Positions
//! shift when an earlier entry is deleted, so they are only meaningful against
//! the collection they were rendered from.

use serde::{Deserialize, Serialize};

use crate::errors::{ListError, Missing};
use crate::validate::{validate_list_name, validate_todo_name};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: u64,
    pub name: String,
    pub completed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub name: String,
    pub todos: Vec<Todo>,
}

impl List {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            todos: Vec::new(),
        }
    }

    /// An empty list is never complete.
    pub fn is_complete(&self) -> bool {
        !self.todos.is_empty() && self.todos.iter().all(|todo| todo.completed)
    }

    pub fn remaining_count(&self) -> usize {
        self.todos.iter().filter(|todo| !todo.completed).count()
    }

    /// Highest id currently in the list plus one, or 1 for an empty list.
    pub fn next_todo_id(&self) -> u64 {
        self.todos.iter().map(|todo| todo.id).max().unwrap_or(0) + 1
    }
}

/// How a rename treats the list's own current name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenamePolicy {
    /// The list being renamed is left out of the uniqueness check.
    #[default]
    ExcludeSelf,
    /// Every list counts, so renaming a list to its current name fails.
    Strict,
}

/// All lists belonging to one session, in storage order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListCollection {
    lists: Vec<List>,
}

impl ListCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, List> {
        self.lists.iter()
    }

    pub fn as_slice(&self) -> &[List] {
        &self.lists
    }

    pub fn get(&self, index: usize) -> Result<&List, ListError> {
        self.lists
            .get(index)
            .ok_or(ListError::NotFound(Missing::List(index)))
    }

    fn get_mut(&mut self, index: usize) -> Result<&mut List, ListError> {
        self.lists
            .get_mut(index)
            .ok_or(ListError::NotFound(Missing::List(index)))
    }

    pub fn create_list(&mut self, name: &str) -> Result<&List, ListError> {
        validate_list_name(name, self.lists.iter().map(|l| l.name.as_str()))?;
        self.lists.push(List::new(name));
        Ok(&self.lists[self.lists.len() - 1])
    }

    pub fn rename_list(
        &mut self,
        index: usize,
        new_name: &str,
        policy: RenamePolicy,
    ) -> Result<&List, ListError> {
        self.get(index)?;
        let others = self
            .lists
            .iter()
            .enumerate()
            .filter(|(i, _)| policy == RenamePolicy::Strict || *i != index)
            .map(|(_, l)| l.name.as_str());
        validate_list_name(new_name, others)?;

        let list = self.get_mut(index)?;
        list.name = new_name.to_owned();
        Ok(&*list)
    }

    /// Removes the list; every later list moves down one position.
    pub fn delete_list(&mut self, index: usize) -> Result<List, ListError> {
        self.get(index)?;
        Ok(self.lists.remove(index))
    }

    pub fn add_todo(&mut self, list_index: usize, name: &str) -> Result<&Todo, ListError> {
        let list = self.get_mut(list_index)?;
        validate_todo_name(name)?;
        let id = list.next_todo_id();
        list.todos.push(Todo {
            id,
            name: name.to_owned(),
            completed: false,
        });
        Ok(&list.todos[list.todos.len() - 1])
    }

    /// `position` is the storage position, not the todo id.
    pub fn delete_todo(&mut self, list_index: usize, position: usize) -> Result<Todo, ListError> {
        let list = self.get_mut(list_index)?;
        if position >= list.todos.len() {
            return Err(todo_missing(list_index, position));
        }
        Ok(list.todos.remove(position))
    }

    pub fn set_todo_completed(
        &mut self,
        list_index: usize,
        position: usize,
        completed: bool,
    ) -> Result<(), ListError> {
        let todo = self
            .get_mut(list_index)?
            .todos
            .get_mut(position)
            .ok_or_else(|| todo_missing(list_index, position))?;
        todo.completed = completed;
        Ok(())
    }

    pub fn complete_all(&mut self, list_index: usize) -> Result<(), ListError> {
        for todo in &mut self.get_mut(list_index)?.todos {
            todo.completed = true;
        }
        Ok(())
    }
}

fn todo_missing(list: usize, position: usize) -> ListError {
    ListError::NotFound(Missing::Todo { list, position })
}

impl From<Vec<List>> for ListCollection {
    fn from(lists: Vec<List>) -> Self {
        Self { lists }
    }
}

impl<'a> IntoIterator for &'a ListCollection {
    type Item = &'a List;
    type IntoIter = std::slice::Iter<'a, List>;

    fn into_iter(self) -> Self::IntoIter {
        self.lists.iter()
    }
}
