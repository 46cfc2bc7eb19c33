pub mod card_colors;
pub mod cards;
pub mod colors;
pub mod editions;

pub use colors::ColorCode;
