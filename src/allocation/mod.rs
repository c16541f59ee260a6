pub mod apportion;
pub mod draft;
pub mod split;
