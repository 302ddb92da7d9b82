#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

mod builder;
mod route;

pub use builder::MokaRouteBuilder;
pub use route::MokaRoute;
