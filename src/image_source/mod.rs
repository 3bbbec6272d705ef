pub mod impl_directory;
pub mod impl_fake;
pub mod interface;
