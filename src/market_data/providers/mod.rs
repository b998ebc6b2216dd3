pub mod boerse_frankfurt;

pub use boerse_frankfurt::BoerseFrankfurtSource;
