pub mod movies;
pub mod recommendations;
pub mod system;
pub mod watchlist;
