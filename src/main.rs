//! Browser entry point.

// dependencies are used by the library crate
#![allow(unused_crate_dependencies)]

fn main() {
	network_explorer::init_logging();
	leptos::mount::mount_to_body(network_explorer::App);
}
