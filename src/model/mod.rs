pub mod bar;
pub mod instrument;
pub mod quote;
pub mod tick;
