pub mod id;
pub mod interest;
pub mod item;
pub mod scoring;
pub mod scrub;

pub use interest::{Collection, ItemReference, ItemReferenceData};
pub use item::{ItemDetail, ItemImage, ItemShop};
