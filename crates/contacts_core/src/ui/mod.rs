//! Presentation layer for the contact list.
//!
//! # Responsibility
//! - Hold the visual tree (form, cards, banners) as a view model.
//! - Render that tree to text for terminal front ends.
//!
//! # Invariants
//! - Presentation never reads persisted state; records arrive from callers.
//! - Banners are addressed by `BannerId`, never by lookup order.

pub mod clock;
pub mod render;
pub mod view;
