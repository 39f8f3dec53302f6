//! Currency directory adapters

pub mod rest_countries;
pub mod static_directory;

pub use rest_countries::RestCountriesAdapter;
pub use static_directory::StaticDirectory;
