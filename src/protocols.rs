//! Protocol implementations.
//!
//! Each protocol lives behind its own cargo feature so applications compile
//! only what they use.

#[cfg(feature = "j1939")]
#[cfg_attr(docsrs, doc(cfg(feature = "j1939")))]
pub mod can;
