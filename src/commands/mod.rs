pub mod picnic;
pub mod quiz;
pub mod weather;
