//! Domain layer
//!
//! - `entities`: Re-exported domain models from `moderation-core`
//! - `ports`: Trait definitions for external dependencies

pub mod ports;

pub mod entities {
    pub use moderation_core::entities::*;
}
