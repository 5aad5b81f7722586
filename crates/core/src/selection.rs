use serde::{Deserialize, Serialize};

use crate::domain::product::Category;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionState {
    #[default]
    NoneSelected,
    Vegetables,
    Flowers,
    Fruits,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionEvent {
    Choose(Category),
    Reset,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionTransition {
    pub from: SelectionState,
    pub to: SelectionState,
    pub event: SelectionEvent,
}

impl SelectionTransition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

impl SelectionState {
    pub fn category(&self) -> Option<Category> {
        match self {
            Self::NoneSelected => None,
            Self::Vegetables => Some(Category::Vegetables),
            Self::Flowers => Some(Category::Flowers),
            Self::Fruits => Some(Category::Fruits),
        }
    }

    /// Every event is accepted from every state; choosing the active
    /// category lands on the same state.
    pub fn apply(self, event: SelectionEvent) -> SelectionTransition {
        let to = match event {
            SelectionEvent::Choose(category) => Self::from(category),
            SelectionEvent::Reset => Self::NoneSelected,
        };
        SelectionTransition { from: self, to, event }
    }
}

impl From<Category> for SelectionState {
    fn from(category: Category) -> Self {
        match category {
            Category::Vegetables => Self::Vegetables,
            Category::Flowers => Self::Flowers,
            Category::Fruits => Self::Fruits,
        }
    }
}
