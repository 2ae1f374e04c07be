mod canvas;
mod component;
mod controller;

pub use component::NetworkBackdrop;
