pub mod media;
pub mod persistence;
pub mod style;
pub mod wall;
