/// Presentation helpers
///
/// Widget-building code for the gallery column and the full-size
/// viewer, plus thumbnail decoding for the listing.

pub mod gallery_view;
pub mod thumbs;
pub mod viewer;
