pub mod app_store;
pub mod app_store_api;
pub mod registry;
pub mod render;
pub mod traits;

pub use app_store::{AppStorePage, AppStorePageInfo};
pub use app_store_api::{AppStoreCatalog, CatalogAppInfo, CredentialProvider, StaticToken};
pub use registry::StoreRegistry;
pub use traits::{AppRecord, StoreExtractor};
