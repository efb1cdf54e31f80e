pub mod banner;
pub mod interface;
pub mod tcp;

#[cfg(test)]
pub(crate) mod mock;
