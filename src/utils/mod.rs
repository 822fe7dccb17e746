pub mod colors;
pub mod date;
pub mod path;
pub mod table;
pub mod text;
