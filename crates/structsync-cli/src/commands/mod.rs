pub mod changes;
pub mod hash;
pub mod identity;
