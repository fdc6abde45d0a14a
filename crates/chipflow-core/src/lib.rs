//! Chipflow Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Chipflow layout
//! engine and its rendering surfaces. It includes:
//!
//! - **Geometry**: Points, sizes, insets and spacing ([`geometry`] module)
//! - **Elements**: Identity-keyed opaque content and its placement ([`element`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Text**: Chip label styling and font-based measurement ([`text`] module)

pub mod color;
pub mod element;
pub mod geometry;
pub mod text;
