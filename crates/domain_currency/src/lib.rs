//! Currency Domain
//!
//! Resolves display currencies and formats amounts for dashboards. The
//! code-to-symbol table is derived from an external country directory
//! reached through [`CurrencyDirectoryPort`].
//!
//! ```rust,ignore
//! let resolver = Arc::new(CurrencyResolver::new(Currency::USD));
//! let task = resolver.spawn_load(Arc::new(RestCountriesAdapter::new(url, timeout)?));
//! // formatting works immediately, with raw codes until the table arrives
//! resolver.format_amount(dec!(2500), "USD");
//! ```

pub mod adapters;
pub mod directory;
pub mod error;
pub mod ports;
pub mod resolver;

pub use adapters::{RestCountriesAdapter, StaticDirectory};
pub use directory::{CountryRecord, CurrencyDetail, CurrencyInfo, CurrencyTable};
pub use error::DirectoryError;
pub use ports::CurrencyDirectoryPort;
pub use resolver::CurrencyResolver;
