//! Query layer over the loaded database

pub mod evidence;
