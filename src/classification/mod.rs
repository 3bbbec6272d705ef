pub mod crop;
pub mod decode;
pub mod delivery;
pub mod error;
pub mod orientation;
pub mod pipeline;
pub mod result;
pub mod sample;

#[cfg(test)]
pub(crate) mod test;
