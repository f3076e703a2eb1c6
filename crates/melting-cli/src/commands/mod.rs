pub mod compute;
pub mod sodium_equivalent;
