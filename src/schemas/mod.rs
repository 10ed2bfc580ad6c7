pub mod assignment;
pub mod directory;
pub mod material;
pub mod quiz;
pub mod stream;
pub mod submission;
