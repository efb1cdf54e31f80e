//! # Sonar Core
//!
//! The scanning engine behind `sonar`.
//!
//! * **[`network`]**: single connection attempts ([`network::tcp`]) and banner reads
//!   ([`network::banner`]).
//! * **[`scanner`]**: the bounded worker pool sweeping a port range, and the
//!   [`scanner::prober`] that reconnects to open ports for banners.
//! * **[`system`]**: local OS and network facts.
//! * **[`profile`]**: the use case tying the above together.

pub mod network;
pub mod profile;
pub mod scanner;
pub mod system;
