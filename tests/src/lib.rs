#![cfg(test)]

mod bgp;
mod inventory;
mod latency;
mod mock;
