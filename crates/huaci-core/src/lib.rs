pub mod lookup;

pub use lookup::LookupService;
