//! Editable contract documents and their rendering.

pub mod derive;
pub mod editor;
pub mod form;
pub mod render;

pub use self::{
    editor::{Change, Editor, Field},
    form::{Form, ValidationErrors},
    render::{render, Document},
};
