pub mod molecule;
pub mod patient;
pub mod recommendation;
pub mod risk;
