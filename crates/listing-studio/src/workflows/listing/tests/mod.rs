mod availability;
mod common;
mod session;
