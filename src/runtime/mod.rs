pub mod lifetime;
