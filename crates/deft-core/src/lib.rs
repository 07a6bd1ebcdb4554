//! Core library for deft, a YAML-driven record browser and editor.
//!
//! - [`filter`] compiles filter expressions into SQL predicates with bind
//!   parameters.
//! - [`recipe`] discovers recipe directories and parses view, form and source
//!   specs.
//! - [`datasource`] connects to a database and runs statements with named
//!   parameters.
//! - [`form`] and [`values`] build editor drafts and turn reviewed values
//!   into statement parameters.

pub mod datasource;
pub mod filter;
pub mod form;
pub mod recipe;
pub mod values;
