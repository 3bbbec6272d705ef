pub mod impl_directory;
#[cfg(test)]
pub mod impl_fake;
pub mod interface;
