pub mod backdrop;
pub mod sections;
