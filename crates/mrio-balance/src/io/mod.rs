//! Delimited-text readers and writers for labelled matrices and margins.
pub mod table;

pub use table::{
    read_labelled_matrix, read_margins, write_labelled_matrix, LabelledMatrix, Margins,
};
