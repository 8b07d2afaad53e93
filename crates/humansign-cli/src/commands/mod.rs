pub mod hash;
pub mod inspect;
pub mod seal;
pub mod verify;
