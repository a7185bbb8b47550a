//! Service layer and shared helpers that sit between stored records and callers.

pub mod services;
pub mod utils;
