pub mod token;
pub mod seed;
pub mod walk;
pub mod store;

pub use token::{ Badge, TokenRecord };
pub use seed::SeedGenerator;
pub use store::{ PulseAction, PulseState, PulseStore, StoreChange };
