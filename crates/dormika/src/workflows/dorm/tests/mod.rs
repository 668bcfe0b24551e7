mod common;

mod billing;
mod routing;
