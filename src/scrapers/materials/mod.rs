//! Fabric and notions stores

mod cleanersupply;
mod prestashop;
mod shopify;
mod the_fabric_club;

pub use cleanersupply::Cleanersupply;
pub use prestashop::PrestaShopStore;
pub use shopify::ShopifySuggestStore;
pub use the_fabric_club::TheFabricClub;
