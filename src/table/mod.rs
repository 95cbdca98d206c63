//! Generic table layer: controller state machine and presentation model.

pub mod controller;
mod selection;
mod sort;
pub mod view;

pub use controller::{
    FetchOutcome, PageMeta, RelationLabels, TableController, TableSnapshot, TableStatus,
};
pub use selection::{Selection, SelectionPolicy};
pub use sort::SortState;
pub use view::{format_cell, TableView};
