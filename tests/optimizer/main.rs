#![allow(clippy::cast_precision_loss)]


mod controllers;
mod errors;
mod pipeline;
